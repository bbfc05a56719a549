//! Read access to deal records.
//!
//! Calculation entry points take a [`DealReader`] rather than reaching into a
//! store, so the engine stays a pure function of the record it is handed.

use std::collections::BTreeMap;

use crate::deal::Deal;
use crate::error::ProformaError;
use crate::ProformaResult;

/// Contract for loading one deal by id.
pub trait DealReader: Send + Sync {
    /// `Ok(None)` when no deal has that id; `Err` only for reader failures.
    fn read_deal(&self, id: &str) -> ProformaResult<Option<Deal>>;
}

impl<R: DealReader + ?Sized> DealReader for &R {
    fn read_deal(&self, id: &str) -> ProformaResult<Option<Deal>> {
        (**self).read_deal(id)
    }
}

impl<R: DealReader + ?Sized> DealReader for Box<R> {
    fn read_deal(&self, id: &str) -> ProformaResult<Option<Deal>> {
        (**self).read_deal(id)
    }
}

/// Load a deal, substituting an empty record when it does not exist. An
/// empty record projects to all-zero output.
pub fn load_or_empty(reader: &impl DealReader, id: &str) -> ProformaResult<Deal> {
    match reader.read_deal(id)? {
        Some(deal) => Ok(deal),
        None => {
            tracing::warn!(deal_id = id, "deal not found; projecting an empty record");
            Ok(Deal::empty(id))
        }
    }
}

/// Load a deal, failing with [`ProformaError::DealNotFound`] when it does
/// not exist. For callers that treat an unknown id as a user mistake.
pub fn require_deal(reader: &impl DealReader, id: &str) -> ProformaResult<Deal> {
    reader
        .read_deal(id)?
        .ok_or_else(|| ProformaError::DealNotFound(id.to_string()))
}

/// Deals held in memory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeals {
    deals: BTreeMap<String, Deal>,
}

impl InMemoryDeals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id. Returns the previous record.
    pub fn insert(&mut self, deal: Deal) -> Option<Deal> {
        self.deals.insert(deal.id.clone(), deal)
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.deals.keys().map(String::as_str)
    }
}

impl FromIterator<Deal> for InMemoryDeals {
    fn from_iter<I: IntoIterator<Item = Deal>>(iter: I) -> Self {
        let mut store = InMemoryDeals::new();
        for deal in iter {
            store.insert(deal);
        }
        store
    }
}

impl DealReader for InMemoryDeals {
    fn read_deal(&self, id: &str) -> ProformaResult<Option<Deal>> {
        Ok(self.deals.get(id).cloned())
    }
}
