use crate::utils::date::{format_date, format_time};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub id: i64,
    pub nrp: String,
    pub date: NaiveDate, // ⇔ claims.claim_date (TEXT "YYYY-MM-DD")
    pub time: NaiveTime, // ⇔ claims.claim_time (TEXT "HH:MM:SS")
}

impl Claim {
    pub fn date_str(&self) -> String {
        format_date(&self.date)
    }

    pub fn time_str(&self) -> String {
        format_time(&self.time)
    }
}

/// A claim joined with the claimant's display name, as shown in history views and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub nrp: String,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}
