//! Capital structure: the senior loan, sources and uses, and the exit.

pub mod debt_schedule;
pub mod exit;
pub mod sources_uses;

pub use debt_schedule::{build_debt_schedule, AnnualDebtService, DebtScheduleResult, DebtScheduleRow};
pub use exit::{
    calculate_exit_returns, calculate_exit_returns_with, reference_ebitda, ExitReturns,
    RefinanceProceeds, SaleProceeds,
};
pub use sources_uses::{build_sources_uses, FundingSource, SourcesUsesOutput};
