/// Per-model token pricing in dollars per million tokens.
#[derive(Debug, Clone)]
pub struct ModelPricing {
    pub model: &'static str,
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
    pub cache_creation_per_mtok: f64,
    pub cache_read_per_mtok: f64,
}

/// Claude Opus pricing (as of June 2025). The single tier this meter
/// prices against.
pub const OPUS: ModelPricing = ModelPricing {
    model: "claude-opus-4",
    input_per_mtok: 15.0,
    output_per_mtok: 75.0,
    cache_creation_per_mtok: 18.75,
    cache_read_per_mtok: 1.5,
};

const TOKENS_PER_MTOK: f64 = 1_000_000.0;

impl ModelPricing {
    /// Price four raw token counts against this table. No validation:
    /// negative or non-finite counts flow straight through the arithmetic.
    pub fn cost(
        &self,
        input_tokens: f64,
        output_tokens: f64,
        cache_creation_tokens: f64,
        cache_read_tokens: f64,
    ) -> f64 {
        let input_cost = (input_tokens / TOKENS_PER_MTOK) * self.input_per_mtok;
        let output_cost = (output_tokens / TOKENS_PER_MTOK) * self.output_per_mtok;
        let cache_creation_cost =
            (cache_creation_tokens / TOKENS_PER_MTOK) * self.cache_creation_per_mtok;
        let cache_read_cost = (cache_read_tokens / TOKENS_PER_MTOK) * self.cache_read_per_mtok;

        input_cost + output_cost + cache_creation_cost + cache_read_cost
    }
}

/// Price token counts against the Opus table.
pub fn cost_from_tokens(
    input_tokens: f64,
    output_tokens: f64,
    cache_creation_tokens: f64,
    cache_read_tokens: f64,
) -> f64 {
    OPUS.cost(
        input_tokens,
        output_tokens,
        cache_creation_tokens,
        cache_read_tokens,
    )
}
