//! Composite trend/momentum/volatility/volume scoring model.
//!
//! Every rule adds points to the bullish or the bearish side. A verdict is only
//! issued when one side is both high in absolute terms and clearly ahead of
//! the other.

use serde::{Deserialize, Serialize};

use common::{IndicatorSnapshot, Quote, Recommendation};

/// Thresholds for turning a score pair into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum points on the winning side.
    pub min_score: u32,
    /// Minimum lead of the winning side over the losing side.
    pub min_margin: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_score: 8,
            min_margin: 4,
        }
    }
}

/// Points accumulated by each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeScore {
    pub bullish: u32,
    pub bearish: u32,
}

impl CompositeScore {
    /// `lhs > rhs` is bullish, `lhs < rhs` bearish. Skipped if either is missing.
    fn compare(&mut self, lhs: Option<f64>, rhs: Option<f64>, weight: u32) {
        if let (Some(lhs), Some(rhs)) = (lhs, rhs) {
            if lhs > rhs {
                self.bullish += weight;
            }
            if lhs < rhs {
                self.bearish += weight;
            }
        }
    }

    pub fn verdict(&self, config: &ScoringConfig) -> Option<Recommendation> {
        let lead = i64::from(self.bullish) - i64::from(self.bearish);
        let margin = i64::from(config.min_margin);

        if self.bullish >= config.min_score && lead >= margin {
            return Some(Recommendation::StrongBuy);
        }
        if self.bearish >= config.min_score && -lead >= margin {
            return Some(Recommendation::StrongSell);
        }
        None
    }
}

/// Score the snapshot against the quote's current price.
///
/// Returns `None` unless the price and all of `rsi`, `macd`, `sma20`, `sma50`,
/// `bbands`, `stochastic` and `obv` are present. Past that gate each rule
/// still skips itself when one of its own leaf values is missing.
pub fn score(quote: &Quote, s: &IndicatorSnapshot) -> Option<CompositeScore> {
    let price = quote.regular_market_price?;
    let (Some(rsi), Some(macd), Some(sma20), Some(sma50), Some(bbands), Some(stoch), Some(obv)) =
        (s.rsi, s.macd, s.sma20, s.sma50, s.bbands, s.stochastic, s.obv)
    else {
        return None;
    };

    let mut score = CompositeScore::default();

    // Trend
    score.compare(Some(price), Some(sma20), 1);
    score.compare(Some(price), Some(sma50), 1);
    score.compare(Some(sma20), Some(sma50), 2);

    // Momentum
    if rsi < 30.0 {
        score.bullish += 2;
    }
    if rsi > 70.0 {
        score.bearish += 2;
    }
    score.compare(macd.macd, macd.signal, 1);
    score.compare(stoch.k, stoch.d, 1);
    if let Some(k) = stoch.k {
        if k < 20.0 {
            score.bullish += 1;
        }
        if k > 80.0 {
            score.bearish += 1;
        }
    }

    // Volatility: closing outside a band points back towards the mean.
    if bbands.lower.is_some_and(|lower| price < lower) {
        score.bullish += 2;
    }
    if bbands.upper.is_some_and(|upper| price > upper) {
        score.bearish += 2;
    }

    // Volume
    score.compare(obv.obv, obv.prev_obv, 1);

    Some(score)
}

/// Composite verdict for one quote/snapshot pair.
pub fn recommend(
    quote: &Quote,
    snapshot: &IndicatorSnapshot,
    config: &ScoringConfig,
) -> Option<Recommendation> {
    score(quote, snapshot)?.verdict(config)
}
