pub mod config;
pub mod deal;
pub mod error;
pub mod financing;
pub mod pl;
pub mod proforma;
pub mod projection;
pub mod reader;
pub mod time_value;
pub mod types;

pub use config::EngineConfig;
pub use deal::Deal;
pub use error::ProformaError;
pub use proforma::{build_proforma, build_proforma_for, ProformaOutput};
pub use reader::{DealReader, InMemoryDeals};
pub use types::*;

/// Standard result type for all pro-forma operations
pub type ProformaResult<T> = Result<T, ProformaError>;
