use crate::core::models::usage::{TokenBreakdown, TokenTotals, TotalsSummary, UsageRecord};

/// Fold a set of usage records into combined totals. Each record's cost is
/// summed as attributed by its producer; token counts are never repriced.
/// The fold is commutative and associative, so partial totals folded again
/// give the same result, and an empty input yields the zero accumulator.
pub fn aggregate<R: UsageRecord>(records: &[R]) -> TokenTotals {
    records.iter().fold(TokenTotals::default(), |acc, record| TokenTotals {
        input_tokens: acc.input_tokens + record.input_tokens(),
        output_tokens: acc.output_tokens + record.output_tokens(),
        cache_creation_tokens: acc.cache_creation_tokens + record.cache_creation_tokens(),
        cache_read_tokens: acc.cache_read_tokens + record.cache_read_tokens(),
        total_cost: acc.total_cost + record.total_cost(),
    })
}

/// Project totals into the presentation shape, adding the derived grand
/// token count. Pure; equal inputs give equal outputs.
pub fn summarize(totals: &TokenTotals) -> TotalsSummary {
    TotalsSummary {
        input_tokens: totals.input_tokens,
        output_tokens: totals.output_tokens,
        cache_creation_tokens: totals.cache_creation_tokens,
        cache_read_tokens: totals.cache_read_tokens,
        total_tokens: totals.total_tokens(),
        total_cost: totals.total_cost,
    }
}
