use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use common::config::DEFAULT_MIN_HISTORY_BARS;
use common::{AnalysisRequest, Error, EvaluationResult, IndicatorSnapshot, Quote, Result, UserCondition};

use crate::composite::{self, ScoringConfig};
use crate::condition;
use crate::registry::StrategyRegistry;

/// Runs every signal source over one quote/snapshot pair.
///
/// Holds only read-only state, so a single instance can be cloned or shared
/// across any number of concurrent evaluations.
#[derive(Debug, Clone)]
pub struct Evaluator {
    registry: Arc<StrategyRegistry>,
    scoring: ScoringConfig,
    min_history_bars: usize,
}

impl Evaluator {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self {
            registry,
            scoring: ScoringConfig::default(),
            min_history_bars: DEFAULT_MIN_HISTORY_BARS,
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_min_history_bars(mut self, bars: usize) -> Self {
        self.min_history_bars = bars;
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Composite verdict, first matching user condition and registry matches.
    /// Missing data only ever produces `None`/empty parts, never an error.
    pub fn evaluate(
        &self,
        quote: &Quote,
        snapshot: &IndicatorSnapshot,
        conditions: &[UserCondition],
    ) -> EvaluationResult {
        let score = composite::score(quote, snapshot);
        let recommended_signal = score.and_then(|s| s.verdict(&self.scoring));
        if let Some(s) = score {
            debug!(
                symbol = quote.symbol_or_unknown(),
                bullish = s.bullish,
                bearish = s.bearish,
                "Composite score"
            );
        }

        EvaluationResult {
            indicators: snapshot.clone(),
            recommended_signal,
            signal: user_signal(conditions, quote, snapshot),
            custom_strategy_matches: self.registry.matches(quote, snapshot),
        }
    }

    /// Validate a request and evaluate it.
    ///
    /// Too little history is not an error: it yields [`EvaluationResult::empty`].
    /// A request without a quote (or with an empty one), conditions, history or
    /// snapshot is rejected.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<EvaluationResult> {
        let quote = request
            .quote
            .as_ref()
            .filter(|q| !q.is_empty())
            .ok_or_else(|| Error::InvalidRequest("missing 'quote'".into()))?;
        let conditions = request
            .strategies
            .as_deref()
            .ok_or_else(|| Error::InvalidRequest("missing 'strategies'".into()))?;
        let symbol = quote.symbol_or_unknown();

        if request.history_bars == 0 {
            return Err(Error::InvalidRequest(format!(
                "historical data is empty for {symbol}"
            )));
        }

        info!(symbol, "Analyzing symbol");

        if request.history_bars < self.min_history_bars {
            warn!(
                symbol,
                has = request.history_bars,
                needs = self.min_history_bars,
                "Insufficient historical data, skipping analysis"
            );
            return Ok(EvaluationResult::empty());
        }

        let snapshot = request
            .indicators
            .as_ref()
            .ok_or_else(|| Error::InvalidRequest(format!("missing 'indicators' for {symbol}")))?;

        let result = self.evaluate(quote, snapshot, conditions);
        info!(
            symbol,
            recommended = ?result.recommended_signal,
            matches = result.custom_strategy_matches.len(),
            "Analyzed symbol"
        );
        Ok(result)
    }
}

/// Resolve a condition field to a number.
///
/// `price` and `change` read the quote; any other name is a top-level scalar
/// of the snapshot. Compound indicators and unknown names resolve to `None`.
pub fn resolve_field(field: &str, quote: &Quote, snapshot: &IndicatorSnapshot) -> Option<f64> {
    match field {
        "price" => quote.regular_market_price,
        "change" => quote.regular_market_change_percent,
        other => snapshot.scalar(other),
    }
}

/// The first condition, in caller order, that holds. Later conditions are not
/// looked at.
pub fn first_match<'a>(
    conditions: &'a [UserCondition],
    quote: &Quote,
    snapshot: &IndicatorSnapshot,
) -> Option<&'a UserCondition> {
    conditions.iter().find(|c| {
        let value = c
            .field
            .as_deref()
            .and_then(|field| resolve_field(field, quote, snapshot));
        condition::check(value, c.operator.as_deref(), c.value.as_ref())
    })
}

/// Label of the first matching condition, if any.
pub fn user_signal(
    conditions: &[UserCondition],
    quote: &Quote,
    snapshot: &IndicatorSnapshot,
) -> Option<Value> {
    first_match(conditions, quote, snapshot).and_then(|c| c.signal.clone())
}
