use serde::{Deserialize, Serialize};

/// USALI departments that carry payroll and operating expenses.
///
/// Operated departments feed direct costs; the rest are undistributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Rooms,
    FoodBeverage,
    Spa,
    OtherOperated,
    AdminGeneral,
    InformationTechnology,
    SalesMarketing,
    Maintenance,
    Utilities,
    /// Anything the engine does not recognise. Contributes nothing.
    #[serde(other)]
    Unknown,
}

impl Department {
    pub const OPERATED: [Department; 4] = [
        Department::Rooms,
        Department::FoodBeverage,
        Department::Spa,
        Department::OtherOperated,
    ];

    pub const UNDISTRIBUTED: [Department; 5] = [
        Department::AdminGeneral,
        Department::InformationTechnology,
        Department::SalesMarketing,
        Department::Maintenance,
        Department::Utilities,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Department::Rooms => "rooms",
            Department::FoodBeverage => "fnb",
            Department::Spa => "spa",
            Department::OtherOperated => "other",
            Department::AdminGeneral => "admin_general",
            Department::InformationTechnology => "it_telecom",
            Department::SalesMarketing => "sales_marketing",
            Department::Maintenance => "maintenance",
            Department::Utilities => "utilities",
            Department::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Department::Rooms => "Rooms",
            Department::FoodBeverage => "Food & Beverage",
            Department::Spa => "Spa",
            Department::OtherOperated => "Other Operated Departments",
            Department::AdminGeneral => "Administrative & General",
            Department::InformationTechnology => "Information & Telecommunications",
            Department::SalesMarketing => "Sales & Marketing",
            Department::Maintenance => "Property Operations & Maintenance",
            Department::Utilities => "Utilities",
            Department::Unknown => "Unknown",
        }
    }

    pub fn cost_group(self) -> Option<CostGroup> {
        match self {
            Department::Rooms
            | Department::FoodBeverage
            | Department::Spa
            | Department::OtherOperated => Some(CostGroup::Departmental),
            Department::AdminGeneral
            | Department::InformationTechnology
            | Department::SalesMarketing
            | Department::Maintenance
            | Department::Utilities => Some(CostGroup::Undistributed),
            Department::Unknown => None,
        }
    }
}

/// Cost buckets that the ramp toggles address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostGroup {
    Departmental,
    Undistributed,
    /// Management fee, property tax, insurance.
    FixedCharges,
    /// Never ramped or inflated.
    Rent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_department_deserializes() {
        let dept: Department = serde_json::from_str("\"casino\"").unwrap();
        assert_eq!(dept, Department::Unknown);
        assert_eq!(dept.cost_group(), None);
    }

    #[test]
    fn test_groups() {
        assert_eq!(Department::Spa.cost_group(), Some(CostGroup::Departmental));
        assert_eq!(Department::Utilities.cost_group(), Some(CostGroup::Undistributed));
    }
}
