use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnlineStatus {
    InStock,
    OutOfStock,
    NotChecked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreStatus {
    InStore,
    NoStoreStock,
    NotChecked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackorderStatus {
    Available,
    Unavailable,
    NotChecked,
}

impl fmt::Display for OnlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnlineStatus::InStock => write!(f, "In stock"),
            OnlineStatus::OutOfStock => write!(f, "Out of stock"),
            OnlineStatus::NotChecked => write!(f, "Not checked"),
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreStatus::InStore => write!(f, "In store"),
            StoreStatus::NoStoreStock => write!(f, "No store stock"),
            StoreStatus::NotChecked => write!(f, "Not checked"),
        }
    }
}

impl fmt::Display for BackorderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackorderStatus::Available => write!(f, "Available for backorder"),
            BackorderStatus::Unavailable => write!(f, "Unavailable for backorder"),
            BackorderStatus::NotChecked => write!(f, "Not checked"),
        }
    }
}

/// Normalized stock state of one listing on one vendor page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub item_name: String,
    pub url: String,
    pub online_status: OnlineStatus,
    pub store_status: StoreStatus,
    pub store_locations: Vec<String>,
    pub backorder_status: BackorderStatus,
}

impl StockRecord {
    /// A record with every status unchecked; extractors fill in what they know.
    pub fn new(item_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            url: url.into(),
            online_status: OnlineStatus::NotChecked,
            store_status: StoreStatus::NotChecked,
            store_locations: Vec::new(),
            backorder_status: BackorderStatus::NotChecked,
        }
    }

    pub fn in_stock_online(item_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            online_status: OnlineStatus::InStock,
            ..Self::new(item_name, url)
        }
    }

    pub fn add_store_location(&mut self, location: impl Into<String>) {
        self.store_status = StoreStatus::InStore;
        self.store_locations.push(location.into());
    }

    pub fn has_stock(&self) -> bool {
        self.online_status == OnlineStatus::InStock
            || self.store_status == StoreStatus::InStore
            || self.backorder_status == BackorderStatus::Available
    }
}

/// Records from one vendor scan, keyed by item name in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReport {
    records: Vec<StockRecord>,
}

impl StockReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record; an existing record with the same item name is replaced
    /// in its original position.
    pub fn insert(&mut self, record: StockRecord) {
        match self
            .records
            .iter_mut()
            .find(|existing| existing.item_name == record.item_name)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    pub fn get(&self, item_name: &str) -> Option<&StockRecord> {
        self.records.iter().find(|r| r.item_name == item_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn in_stock_count(&self) -> usize {
        self.records.iter().filter(|r| r.has_stock()).count()
    }
}

impl FromIterator<StockRecord> for StockReport {
    fn from_iter<I: IntoIterator<Item = StockRecord>>(iter: I) -> Self {
        let mut report = StockReport::new();
        for record in iter {
            report.insert(record);
        }
        report
    }
}

impl<'a> IntoIterator for &'a StockReport {
    type Item = &'a StockRecord;
    type IntoIter = std::slice::Iter<'a, StockRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
