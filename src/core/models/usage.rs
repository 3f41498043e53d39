use serde::{Deserialize, Serialize};

/// Capability shared by anything that carries the four token-count fields.
/// Any record shape qualifies; no common struct is required.
pub trait TokenBreakdown {
    fn input_tokens(&self) -> u64;
    fn output_tokens(&self) -> u64;
    fn cache_creation_tokens(&self) -> u64;
    fn cache_read_tokens(&self) -> u64;

    /// Combined token count across all four categories.
    fn total_tokens(&self) -> u64 {
        self.input_tokens()
            + self.output_tokens()
            + self.cache_creation_tokens()
            + self.cache_read_tokens()
    }
}

/// A token breakdown with a cost already attributed by whatever produced it.
/// Aggregation sums this cost as-is and never reprices the token counts.
pub trait UsageRecord: TokenBreakdown {
    fn total_cost(&self) -> f64;
}

/// Usage for one calendar day, keyed by a `YYYY-MM-DD` date string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyUsage {
    pub date: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_tokens: u64,
    pub cache_read_tokens: u64,
    pub total_cost: f64,
}

/// Usage for one session file, keyed by the session identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUsage {
    pub session_id: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_tokens: u64,
    pub cache_read_tokens: u64,
    pub total_cost: f64,
}

/// Field-wise sums of a set of usage records. `Default` is the zero
/// accumulator that an empty fold returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_tokens: u64,
    pub cache_read_tokens: u64,
    pub total_cost: f64,
}

/// `TokenTotals` plus the derived grand token count. Presentation-ready;
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsSummary {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_tokens: u64,
    pub cache_read_tokens: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
}

macro_rules! impl_usage_record {
    ($ty:ty) => {
        impl TokenBreakdown for $ty {
            fn input_tokens(&self) -> u64 {
                self.input_tokens
            }
            fn output_tokens(&self) -> u64 {
                self.output_tokens
            }
            fn cache_creation_tokens(&self) -> u64 {
                self.cache_creation_tokens
            }
            fn cache_read_tokens(&self) -> u64 {
                self.cache_read_tokens
            }
        }

        impl UsageRecord for $ty {
            fn total_cost(&self) -> f64 {
                self.total_cost
            }
        }
    };
}

impl_usage_record!(DailyUsage);
impl_usage_record!(SessionUsage);
// Totals are structurally a usage record themselves, so partial totals can
// be re-folded into a grand total.
impl_usage_record!(TokenTotals);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_tokens_sums_all_four_categories() {
        let daily = DailyUsage {
            date: "2026-08-28".to_string(),
            input_tokens: 1,
            output_tokens: 2,
            cache_creation_tokens: 3,
            cache_read_tokens: 4,
            total_cost: 0.0,
        };
        assert_eq!(daily.total_tokens(), 10);
    }

    #[test]
    fn total_tokens_works_on_totals() {
        let totals = TokenTotals {
            input_tokens: 100,
            output_tokens: 50,
            cache_creation_tokens: 25,
            cache_read_tokens: 25,
            total_cost: 1.5,
        };
        assert_eq!(totals.total_tokens(), 200);
    }

    #[test]
    fn default_totals_are_zero() {
        let totals = TokenTotals::default();
        assert_eq!(totals.total_tokens(), 0);
        assert_eq!(totals.total_cost, 0.0);
    }

    #[test]
    fn session_usage_serializes_round_trip() {
        let session = SessionUsage {
            session_id: "aaaa-bbbb".to_string(),
            input_tokens: 1000,
            output_tokens: 500,
            cache_creation_tokens: 0,
            cache_read_tokens: 0,
            total_cost: 0.05,
        };
        let json = serde_json::to_string(&session).unwrap();
        let back: SessionUsage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.session_id, "aaaa-bbbb");
        assert_eq!(back.input_tokens, 1000);
        assert!((back.total_cost - 0.05).abs() < f64::EPSILON);
    }
}
