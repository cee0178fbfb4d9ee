use serde::Serialize;

/// Today's pool usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyAggregate {
    pub pool_size: i64,
    pub claimed: i64,
    pub remaining: i64,
}

impl DailyAggregate {
    pub fn new(pool_size: i64, claimed: i64) -> Self {
        Self {
            pool_size,
            claimed,
            remaining: (pool_size - claimed).max(0),
        }
    }
}

/// Percentages for the two-slice claimed/remaining chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClaimShare {
    pub claimed_pct: f64,
    pub remaining_pct: f64,
}

impl ClaimShare {
    pub fn of(claimed: i64, pool_size: i64) -> Self {
        if pool_size <= 0 {
            return Self {
                claimed_pct: 0.0,
                remaining_pct: 0.0,
            };
        }
        let claimed = claimed.clamp(0, pool_size);
        let claimed_pct = claimed as f64 * 100.0 / pool_size as f64;
        Self {
            claimed_pct,
            remaining_pct: 100.0 - claimed_pct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdminSummary {
    pub total_employees: i64,
    pub claimed_today: i64,
    pub not_claimed: i64,
    pub share: ClaimShare,
}
