use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::department::Department;
use crate::types::{clamp_pct, non_negative, safe_div, Money};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRole {
    #[serde(default)]
    pub title: String,
    pub department: Department,
    pub fte: Decimal,
    pub base_salary: Money,
    /// Employer on-costs (social charges, benefits) as percent of salary.
    #[serde(default)]
    pub employer_cost_pct: Decimal,
}

impl PayrollRole {
    /// Fully loaded annual cost: FTE x salary x (1 + on-cost).
    pub fn annual_cost(&self) -> Money {
        self.base_payroll() * (Decimal::ONE + clamp_pct(self.employer_cost_pct) / dec!(100))
    }

    fn base_payroll(&self) -> Money {
        non_negative(self.fte) * non_negative(self.base_salary)
    }
}

/// Staffing plan. The role list is authoritative; [`PayrollSimple`] is
/// the per-department summary view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PayrollRecord")]
pub struct PayrollModel {
    pub roles: Vec<PayrollRole>,
}

/// Headcount and average pay for one department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentHeadcount {
    pub department: Department,
    pub fte: Decimal,
    pub average_salary: Money,
    #[serde(default)]
    pub employer_cost_pct: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollSimple {
    pub departments: Vec<DepartmentHeadcount>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PayrollRecord {
    Advanced { roles: Vec<PayrollRole> },
    Simple(PayrollSimple),
}

impl From<PayrollRecord> for PayrollModel {
    fn from(record: PayrollRecord) -> Self {
        match record {
            PayrollRecord::Advanced { roles } => PayrollModel { roles },
            PayrollRecord::Simple(simple) => simple.expand(),
        }
    }
}

impl PayrollSimple {
    /// One pooled role per department.
    pub fn expand(&self) -> PayrollModel {
        PayrollModel {
            roles: self
                .departments
                .iter()
                .map(|d| PayrollRole {
                    title: format!("{} team", d.department.label()),
                    department: d.department,
                    fte: d.fte,
                    base_salary: d.average_salary,
                    employer_cost_pct: d.employer_cost_pct,
                })
                .collect(),
        }
    }
}

impl PayrollModel {
    /// Stabilized annual cost per department. Unknown departments are
    /// dropped.
    pub fn cost_by_department(&self) -> BTreeMap<Department, Money> {
        let mut out = BTreeMap::new();
        for role in self.roles.iter().filter(|r| r.department != Department::Unknown) {
            *out.entry(role.department).or_insert(Decimal::ZERO) += role.annual_cost();
        }
        out
    }

    pub fn total_cost(&self) -> Money {
        self.cost_by_department().values().copied().sum()
    }

    pub fn total_fte(&self) -> Decimal {
        self.roles.iter().map(|r| non_negative(r.fte)).sum()
    }

    /// Collapse roles to per-department headcount. Average salary is FTE
    /// weighted and the on-cost is salary weighted, so each department's
    /// loaded cost is unchanged.
    pub fn to_simple(&self) -> PayrollSimple {
        let mut pooled: BTreeMap<Department, (Decimal, Money, Money)> = BTreeMap::new();
        for role in self.roles.iter().filter(|r| r.department != Department::Unknown) {
            let entry = pooled
                .entry(role.department)
                .or_insert((Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
            let base = role.base_payroll();
            entry.0 += non_negative(role.fte);
            entry.1 += base;
            entry.2 += base * clamp_pct(role.employer_cost_pct);
        }

        PayrollSimple {
            departments: pooled
                .into_iter()
                .map(|(department, (fte, base, weighted_pct))| DepartmentHeadcount {
                    department,
                    fte,
                    average_salary: safe_div(base, fte),
                    employer_cost_pct: safe_div(weighted_pct, base),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(department: Department, fte: Decimal, salary: Decimal, pct: Decimal) -> PayrollRole {
        PayrollRole {
            title: String::new(),
            department,
            fte,
            base_salary: salary,
            employer_cost_pct: pct,
        }
    }

    fn model() -> PayrollModel {
        PayrollModel {
            roles: vec![
                role(Department::Rooms, dec!(4), dec!(30000), dec!(20)),
                role(Department::Rooms, dec!(1), dec!(50000), dec!(30)),
                role(Department::AdminGeneral, dec!(2), dec!(60000), dec!(25)),
                role(Department::Unknown, dec!(9), dec!(99999), dec!(0)),
            ],
        }
    }

    #[test]
    fn test_loaded_cost() {
        let r = role(Department::Spa, dec!(2), dec!(40000), dec!(25));
        assert_eq!(r.annual_cost(), dec!(100000));
    }

    #[test]
    fn test_cost_by_department_skips_unknown() {
        let costs = model().cost_by_department();
        // Rooms: 4*30000*1.2 + 1*50000*1.3 = 144000 + 65000
        assert_eq!(costs[&Department::Rooms], dec!(209000));
        assert_eq!(costs[&Department::AdminGeneral], dec!(150000));
        assert!(!costs.contains_key(&Department::Unknown));
        assert_eq!(model().total_cost(), dec!(359000));
    }

    #[test]
    fn test_simple_view_preserves_department_cost() {
        let simple = model().to_simple();
        assert_eq!(simple.departments.len(), 2);
        let rooms = &simple.departments[0];
        assert_eq!(rooms.department, Department::Rooms);
        assert_eq!(rooms.fte, dec!(5));
        assert_eq!(rooms.average_salary, dec!(34000));

        let expanded = simple.expand();
        let diff = expanded.total_cost() - model().total_cost();
        assert!(diff.abs() < dec!(0.0001));
    }

    #[test]
    fn test_wire_accepts_simple_form() {
        let payroll: PayrollModel = serde_json::from_str(
            r#"{"departments": [{"department": "maintenance", "fte": "3", "average_salary": "40000"}]}"#,
        )
        .unwrap();
        assert_eq!(payroll.roles.len(), 1);
        assert_eq!(payroll.total_cost(), dec!(120000));
    }
}
