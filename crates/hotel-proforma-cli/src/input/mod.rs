pub mod file;
pub mod stdin;

use serde::Deserialize;
use serde_json::Value;

use hotel_proforma_core::reader::require_deal;
use hotel_proforma_core::{Deal, EngineConfig, InMemoryDeals};

/// A deal document holds either one deal or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum DealDocument {
    One(Box<Deal>),
    Many(Vec<Deal>),
}

/// Load deals from `--input`, or from piped stdin when no file is given.
pub fn load_deals(path: Option<&str>) -> Result<InMemoryDeals, Box<dyn std::error::Error>> {
    let value: Value = if let Some(path) = path {
        file::read_value(path)?
    } else if let Some(data) = stdin::read_stdin()? {
        data
    } else {
        return Err("a deal is required: pass --input <file> or pipe JSON/YAML on stdin".into());
    };

    let store: InMemoryDeals = match serde_json::from_value(value)? {
        DealDocument::One(deal) => std::iter::once(*deal).collect(),
        DealDocument::Many(deals) => deals.into_iter().collect(),
    };
    tracing::debug!(deals = store.len(), "deal input loaded");
    Ok(store)
}

/// Engine settings from `--config`, or the defaults.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(file::read_input::<EngineConfig>(path)?.sanitized()),
        None => Ok(EngineConfig::default()),
    }
}

/// The deal to run: `--deal-id` when given (it must exist in the input),
/// otherwise the only deal in the input.
pub fn select_deal_id(store: &InMemoryDeals, deal_id: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(id) = deal_id {
        return Ok(require_deal(store, id)?.id);
    }
    let mut ids = store.ids();
    match (ids.next(), ids.next()) {
        (Some(only), None) => Ok(only.to_string()),
        (None, _) => Err("the input holds no deals".into()),
        (Some(_), Some(_)) => Err(format!(
            "the input holds {} deals; choose one with --deal-id",
            store.len()
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_deal_is_selected_implicitly() {
        let store: InMemoryDeals = std::iter::once(Deal::empty("solo")).collect();
        assert_eq!(select_deal_id(&store, None).unwrap(), "solo");
        assert_eq!(select_deal_id(&store, Some("solo")).unwrap(), "solo");
        assert!(select_deal_id(&store, Some("other")).is_err());
    }

    #[test]
    fn test_several_deals_need_an_id() {
        let store: InMemoryDeals = vec![Deal::empty("a"), Deal::empty("b")].into_iter().collect();
        let err = select_deal_id(&store, None).unwrap_err();
        assert!(err.to_string().contains("--deal-id"));
        assert!(select_deal_id(&InMemoryDeals::new(), None).is_err());
    }

    #[test]
    fn test_document_accepts_one_or_many() {
        let one: DealDocument = serde_json::from_value(serde_json::json!({ "id": "x" })).unwrap();
        assert!(matches!(one, DealDocument::One(_)));
        let many: DealDocument =
            serde_json::from_value(serde_json::json!([{ "id": "x" }, { "id": "y" }])).unwrap();
        assert!(matches!(many, DealDocument::Many(ref v) if v.len() == 2));
    }
}
