pub mod financing;
pub mod projection;

use hotel_proforma_core::{EngineConfig, InMemoryDeals};

use crate::input;

/// Everything a command needs: the loaded deals, which one to run, and the
/// engine settings.
pub struct Session {
    pub deals: InMemoryDeals,
    pub deal_id: String,
    pub config: EngineConfig,
}

impl Session {
    pub fn open(
        input_path: Option<&str>,
        config_path: Option<&str>,
        deal_id: Option<&str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let deals = input::load_deals(input_path)?;
        let deal_id = input::select_deal_id(&deals, deal_id)?;
        let config = input::load_config(config_path)?;
        Ok(Session {
            deals,
            deal_id,
            config,
        })
    }
}
