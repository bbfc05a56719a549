use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deal::{CapitalBudget, FinancingSettings, InvestmentOrder};
use crate::types::{safe_div, Money};

/// A source of funds and when it is drawn relative to the others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingSource {
    pub name: String,
    pub amount: Money,
    /// Share of total sources, as a decimal.
    pub share: Decimal,
    /// 1 = drawn first. Pro-rata sources share an order.
    pub draw_order: u32,
}

/// Output for Sources & Uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesUsesOutput {
    pub investment_order: InvestmentOrder,
    /// Sources in draw order
    pub sources: Vec<FundingSource>,
    /// Budget lines, then contingency when non-zero
    pub uses: Vec<(String, Money)>,
    pub total_sources: Money,
    pub total_uses: Money,
    /// Whether sources equal uses
    pub balanced: bool,
}

/// Sources & Uses of development funds. Uses come from the capital budget;
/// the senior loan and sponsor equity are both derived from project cost.
pub fn build_sources_uses(financing: &FinancingSettings, budget: &CapitalBudget) -> SourcesUsesOutput {
    let mut uses: Vec<(String, Money)> = budget
        .lines
        .iter()
        .map(|l| (l.category.clone(), l.amount.max(Decimal::ZERO)))
        .collect();
    let contingency = budget.contingency();
    if contingency > Decimal::ZERO {
        uses.push(("Contingency".into(), contingency));
    }
    let total_uses: Money = uses.iter().map(|(_, v)| *v).sum();

    let project_cost = budget.project_cost();
    let loan = financing.loan_amount(project_cost);
    let equity = financing.equity_required(project_cost);

    let (equity_order, debt_order) = match financing.investment_order {
        InvestmentOrder::EquityFirst => (1, 2),
        InvestmentOrder::DebtFirst => (2, 1),
        InvestmentOrder::ProRata => (1, 1),
    };

    let mut sources: Vec<FundingSource> = [
        ("Sponsor Equity", equity, equity_order),
        ("Senior Loan", loan, debt_order),
    ]
    .into_iter()
    .filter(|(_, amount, _)| *amount > Decimal::ZERO)
    .map(|(name, amount, draw_order)| FundingSource {
        name: name.into(),
        amount,
        share: safe_div(amount, project_cost),
        draw_order,
    })
    .collect();
    sources.sort_by_key(|s| s.draw_order);

    let total_sources: Money = sources.iter().map(|s| s.amount).sum();

    SourcesUsesOutput {
        investment_order: financing.investment_order,
        sources,
        uses,
        total_sources,
        total_uses,
        balanced: total_sources == total_uses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::BudgetLine;
    use rust_decimal_macros::dec;

    fn budget() -> CapitalBudget {
        CapitalBudget {
            lines: vec![
                BudgetLine {
                    category: "Land".into(),
                    amount: dec!(2000000),
                },
                BudgetLine {
                    category: "Construction".into(),
                    amount: dec!(6000000),
                },
            ],
            contingency_pct: dec!(5),
        }
    }

    fn financing(order: InvestmentOrder) -> FinancingSettings {
        FinancingSettings {
            ltc_pct: dec!(60),
            investment_order: order,
            ..FinancingSettings::default()
        }
    }

    #[test]
    fn test_balanced_sources_uses() {
        let out = build_sources_uses(&financing(InvestmentOrder::EquityFirst), &budget());
        assert_eq!(out.total_uses, dec!(8400000));
        assert_eq!(out.total_sources, dec!(8400000));
        assert!(out.balanced);
        assert_eq!(out.uses.last().unwrap(), &("Contingency".to_string(), dec!(400000)));
    }

    #[test]
    fn test_equity_first_order() {
        let out = build_sources_uses(&financing(InvestmentOrder::EquityFirst), &budget());
        assert_eq!(out.sources[0].name, "Sponsor Equity");
        assert_eq!(out.sources[0].amount, dec!(3360000));
        assert_eq!(out.sources[0].share, dec!(0.4));
        assert_eq!(out.sources[1].name, "Senior Loan");
        assert_eq!(out.sources[1].draw_order, 2);
    }

    #[test]
    fn test_debt_first_and_pro_rata() {
        let out = build_sources_uses(&financing(InvestmentOrder::DebtFirst), &budget());
        assert_eq!(out.sources[0].name, "Senior Loan");

        let out = build_sources_uses(&financing(InvestmentOrder::ProRata), &budget());
        assert!(out.sources.iter().all(|s| s.draw_order == 1));
    }

    #[test]
    fn test_all_equity_deal() {
        let out = build_sources_uses(&FinancingSettings::default(), &budget());
        assert_eq!(out.sources.len(), 1);
        assert_eq!(out.sources[0].share, Decimal::ONE);
        assert!(out.balanced);
    }

    #[test]
    fn test_empty_budget() {
        let out = build_sources_uses(&financing(InvestmentOrder::EquityFirst), &CapitalBudget::default());
        assert!(out.sources.is_empty());
        assert!(out.uses.is_empty());
        assert!(out.balanced);
    }
}
