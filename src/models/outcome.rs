//! Results of ledger transitions. Rejections are ordinary values: an
//! "already claimed" answer is the most common response of the system.

use super::claim::Claim;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Accepted(Claim),
    Rejected(Rejection),
}

impl ClaimOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ClaimOutcome::Accepted(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ClaimOutcome::Rejected(r) => Some(r),
            ClaimOutcome::Accepted(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No employee row for the identity key.
    UnknownEmployee,
    /// The employee's personal counter is at zero.
    QuotaExhausted,
    /// A claim for (identity, today) already exists.
    AlreadyClaimed(Claim),
    /// Every slot of today's shared pool is taken.
    PoolExhausted { pool_size: i64 },
}

impl Rejection {
    /// Short machine-friendly tag, used as the audit log target.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::UnknownEmployee => "unknown_employee",
            Rejection::QuotaExhausted => "quota_exhausted",
            Rejection::AlreadyClaimed(_) => "already_claimed",
            Rejection::PoolExhausted { .. } => "pool_exhausted",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownEmployee => write!(f, "unknown employee"),
            Rejection::QuotaExhausted => write!(f, "meal quota exhausted"),
            Rejection::AlreadyClaimed(c) => {
                write!(f, "already claimed today at {}", c.time_str())
            }
            Rejection::PoolExhausted { pool_size } => {
                write!(f, "all {} meals for today are taken", pool_size)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    Performed {
        previous: Option<NaiveDate>,
        today: NaiveDate,
        employees_reset: usize,
        claims_cleared: usize,
    },
    AlreadyDone(NaiveDate),
}

impl ResetOutcome {
    pub fn performed(&self) -> bool {
        matches!(self, ResetOutcome::Performed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub reset: ResetOutcome,
    pub swept: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub rows: usize,
    pub inserted: usize,
    pub skipped: usize,
}
