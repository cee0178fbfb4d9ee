// src/export/model.rs

use crate::models::claim::HistoryEntry;
use crate::utils::date::{format_date, format_time};
use serde::Serialize;

/// Flat row for claim exports; field order is the CSV column order.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimExport {
    pub id: i64,
    pub nrp: String,
    pub name: String,
    pub date: String,
    pub time: String,
}

impl From<&HistoryEntry> for ClaimExport {
    fn from(h: &HistoryEntry) -> Self {
        Self {
            id: h.id,
            nrp: h.nrp.clone(),
            name: h.name.clone(),
            date: format_date(&h.date),
            time: format_time(&h.time),
        }
    }
}
