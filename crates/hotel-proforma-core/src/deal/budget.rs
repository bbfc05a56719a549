use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{non_negative, pct_to_rate, safe_div, Money};

pub const TOTAL_PROJECT_COST_LABEL: &str = "Total Project Cost";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category: String,
    pub amount: Money,
}

/// Development budget. Line items are the canonical form; the single-figure
/// view is derived from them and expands back into one line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BudgetRecord")]
pub struct CapitalBudget {
    pub lines: Vec<BudgetLine>,
    pub contingency_pct: Decimal,
}

/// Single-figure budget view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalBudgetSimple {
    pub total: Money,
}

/// Either shape accepted on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum BudgetRecord {
    Detailed {
        lines: Vec<BudgetLine>,
        #[serde(default)]
        contingency_pct: Decimal,
    },
    Simple(CapitalBudgetSimple),
}

impl From<BudgetRecord> for CapitalBudget {
    fn from(record: BudgetRecord) -> Self {
        match record {
            BudgetRecord::Detailed {
                lines,
                contingency_pct,
            } => CapitalBudget {
                lines,
                contingency_pct,
            },
            BudgetRecord::Simple(simple) => simple.expand(),
        }
    }
}

impl CapitalBudgetSimple {
    pub fn expand(self) -> CapitalBudget {
        CapitalBudget {
            lines: vec![BudgetLine {
                category: TOTAL_PROJECT_COST_LABEL.into(),
                amount: self.total,
            }],
            contingency_pct: Decimal::ZERO,
        }
    }
}

impl CapitalBudget {
    /// Sum of line items before contingency; negative lines count as zero.
    pub fn hard_and_soft_costs(&self) -> Money {
        self.lines.iter().map(|l| non_negative(l.amount)).sum()
    }

    pub fn contingency(&self) -> Money {
        self.hard_and_soft_costs() * pct_to_rate(self.contingency_pct)
    }

    pub fn project_cost(&self) -> Money {
        self.hard_and_soft_costs() + self.contingency()
    }

    pub fn to_simple(&self) -> CapitalBudgetSimple {
        CapitalBudgetSimple {
            total: self.project_cost(),
        }
    }

    pub fn cost_per_key(&self, total_rooms: Decimal) -> Money {
        safe_div(self.project_cost(), total_rooms)
    }

    pub fn cost_per_sqm(&self, gross_floor_area: Decimal) -> Money {
        safe_div(self.project_cost(), gross_floor_area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn detailed() -> CapitalBudget {
        CapitalBudget {
            lines: vec![
                BudgetLine {
                    category: "Land".into(),
                    amount: dec!(2000000),
                },
                BudgetLine {
                    category: "Construction".into(),
                    amount: dec!(8000000),
                },
                BudgetLine {
                    category: "Typo".into(),
                    amount: dec!(-50000),
                },
            ],
            contingency_pct: dec!(5),
        }
    }

    #[test]
    fn test_project_cost_with_contingency() {
        let budget = detailed();
        assert_eq!(budget.hard_and_soft_costs(), dec!(10000000));
        assert_eq!(budget.contingency(), dec!(500000));
        assert_eq!(budget.project_cost(), dec!(10500000));
    }

    #[test]
    fn test_simple_view_round_trips_total() {
        let simple = detailed().to_simple();
        assert_eq!(simple.total, dec!(10500000));
        assert_eq!(simple.expand().project_cost(), dec!(10500000));
    }

    #[test]
    fn test_both_wire_shapes() {
        let simple: CapitalBudget = serde_json::from_str(r#"{"total": "12000000"}"#).unwrap();
        assert_eq!(simple.lines.len(), 1);
        assert_eq!(simple.lines[0].category, TOTAL_PROJECT_COST_LABEL);
        assert_eq!(simple.project_cost(), dec!(12000000));

        let detailed: CapitalBudget = serde_json::from_str(
            r#"{"lines": [{"category": "FF&E", "amount": "400000"}], "contingency_pct": "10"}"#,
        )
        .unwrap();
        assert_eq!(detailed.project_cost(), dec!(440000));
    }

    #[test]
    fn test_ratios_guard_zero_denominators() {
        let budget = detailed();
        assert_eq!(budget.cost_per_key(dec!(0)), Decimal::ZERO);
        assert_eq!(budget.cost_per_key(dec!(100)), dec!(105000));
        assert_eq!(budget.cost_per_sqm(dec!(7000)), dec!(1500));
    }
}
