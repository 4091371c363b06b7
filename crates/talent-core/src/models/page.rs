use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A list response: one page of items plus the unpaged total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn of(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self { items, total }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}
