use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::department::{CostGroup, Department};

/// How an opex item's `value` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    /// `value` is a percent of rooms revenue.
    PctRoomsRevenue,
    /// `value` is a percent of F&B revenue.
    PctFnbRevenue,
    /// `value` is a percent of spa + other revenue.
    PctOtherRevenue,
    /// `value` is a percent of total revenue.
    PctTotalRevenue,
    /// `value` is currency per occupied room-night.
    PerRoomNight,
    /// `value` is currency per month.
    FixedPerMonth,
    /// Unrecognised driver; contributes zero.
    #[serde(other)]
    Unknown,
}

impl DriverKind {
    pub fn is_percentage(self) -> bool {
        matches!(
            self,
            DriverKind::PctRoomsRevenue
                | DriverKind::PctFnbRevenue
                | DriverKind::PctOtherRevenue
                | DriverKind::PctTotalRevenue
        )
    }
}

/// One opex assumption as captured on the deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpexItem {
    pub id: String,
    pub value: Decimal,
    pub driver: DriverKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpexModel {
    pub items: Vec<OpexItem>,
}

impl OpexModel {
    /// Items for one catalog line. Several items may share an id.
    pub fn items_for(&self, line: OpexLine) -> impl Iterator<Item = &OpexItem> {
        self.items.iter().filter(move |i| i.id == line.id())
    }

    /// Items whose id is not in the catalog.
    pub fn unrecognised(&self) -> impl Iterator<Item = &OpexItem> {
        self.items.iter().filter(|i| OpexLine::from_id(&i.id).is_none())
    }
}

/// Known opex lines and where they sit in the P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpexLine {
    RoomsCommissions,
    RoomsGuestSupplies,
    RoomsLaundry,
    RoomsOther,
    FnbCostOfSales,
    FnbOther,
    SpaCostOfSales,
    SpaOther,
    OtherCostOfSales,
    AdminGeneral,
    ItTelecom,
    SalesMarketing,
    Maintenance,
    Utilities,
    ManagementFee,
    PropertyTax,
    Insurance,
    Rent,
}

impl OpexLine {
    pub const ALL: [OpexLine; 18] = [
        OpexLine::RoomsCommissions,
        OpexLine::RoomsGuestSupplies,
        OpexLine::RoomsLaundry,
        OpexLine::RoomsOther,
        OpexLine::FnbCostOfSales,
        OpexLine::FnbOther,
        OpexLine::SpaCostOfSales,
        OpexLine::SpaOther,
        OpexLine::OtherCostOfSales,
        OpexLine::AdminGeneral,
        OpexLine::ItTelecom,
        OpexLine::SalesMarketing,
        OpexLine::Maintenance,
        OpexLine::Utilities,
        OpexLine::ManagementFee,
        OpexLine::PropertyTax,
        OpexLine::Insurance,
        OpexLine::Rent,
    ];

    pub fn id(self) -> &'static str {
        match self {
            OpexLine::RoomsCommissions => "rooms_commissions",
            OpexLine::RoomsGuestSupplies => "rooms_guest_supplies",
            OpexLine::RoomsLaundry => "rooms_laundry",
            OpexLine::RoomsOther => "rooms_other",
            OpexLine::FnbCostOfSales => "fnb_cost_of_sales",
            OpexLine::FnbOther => "fnb_other",
            OpexLine::SpaCostOfSales => "spa_cost_of_sales",
            OpexLine::SpaOther => "spa_other",
            OpexLine::OtherCostOfSales => "other_cost_of_sales",
            OpexLine::AdminGeneral => "admin_general",
            OpexLine::ItTelecom => "it_telecom",
            OpexLine::SalesMarketing => "sales_marketing",
            OpexLine::Maintenance => "maintenance",
            OpexLine::Utilities => "utilities",
            OpexLine::ManagementFee => "management_fee",
            OpexLine::PropertyTax => "property_tax",
            OpexLine::Insurance => "insurance",
            OpexLine::Rent => "rent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OpexLine::RoomsCommissions => "Commissions",
            OpexLine::RoomsGuestSupplies => "Guest Supplies",
            OpexLine::RoomsLaundry => "Laundry & Linen",
            OpexLine::RoomsOther => "Other Rooms Expenses",
            OpexLine::FnbCostOfSales => "F&B Cost of Sales",
            OpexLine::FnbOther => "Other F&B Expenses",
            OpexLine::SpaCostOfSales => "Spa Cost of Sales",
            OpexLine::SpaOther => "Other Spa Expenses",
            OpexLine::OtherCostOfSales => "Other Operated Cost of Sales",
            OpexLine::AdminGeneral => "A&G Expenses",
            OpexLine::ItTelecom => "IT & Telecom Expenses",
            OpexLine::SalesMarketing => "Sales & Marketing Expenses",
            OpexLine::Maintenance => "Maintenance Expenses",
            OpexLine::Utilities => "Energy & Water",
            OpexLine::ManagementFee => "Management Fee",
            OpexLine::PropertyTax => "Property Tax",
            OpexLine::Insurance => "Insurance",
            OpexLine::Rent => "Rent",
        }
    }

    pub fn from_id(id: &str) -> Option<OpexLine> {
        OpexLine::ALL.into_iter().find(|line| line.id() == id)
    }

    /// Owning department for departmental and undistributed lines.
    pub fn department(self) -> Option<Department> {
        match self {
            OpexLine::RoomsCommissions
            | OpexLine::RoomsGuestSupplies
            | OpexLine::RoomsLaundry
            | OpexLine::RoomsOther => Some(Department::Rooms),
            OpexLine::FnbCostOfSales | OpexLine::FnbOther => Some(Department::FoodBeverage),
            OpexLine::SpaCostOfSales | OpexLine::SpaOther => Some(Department::Spa),
            OpexLine::OtherCostOfSales => Some(Department::OtherOperated),
            OpexLine::AdminGeneral => Some(Department::AdminGeneral),
            OpexLine::ItTelecom => Some(Department::InformationTechnology),
            OpexLine::SalesMarketing => Some(Department::SalesMarketing),
            OpexLine::Maintenance => Some(Department::Maintenance),
            OpexLine::Utilities => Some(Department::Utilities),
            OpexLine::ManagementFee
            | OpexLine::PropertyTax
            | OpexLine::Insurance
            | OpexLine::Rent => None,
        }
    }

    pub fn cost_group(self) -> CostGroup {
        match self {
            OpexLine::ManagementFee | OpexLine::PropertyTax | OpexLine::Insurance => {
                CostGroup::FixedCharges
            }
            OpexLine::Rent => CostGroup::Rent,
            _ => self
                .department()
                .and_then(Department::cost_group)
                .unwrap_or(CostGroup::Undistributed),
        }
    }

    /// Catalog lines owned by one department, in display order.
    pub fn for_department(department: Department) -> impl Iterator<Item = OpexLine> {
        OpexLine::ALL
            .into_iter()
            .filter(move |line| line.department() == Some(department))
    }
}
