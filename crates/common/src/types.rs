use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Live quote for one stock, as delivered by the market-data layer.
/// Every numeric field may be missing; absent keys deserialize as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Quote {
    pub symbol: Option<String>,
    /// Current price.
    pub regular_market_price: Option<f64>,
    /// Day's traded volume.
    pub regular_market_volume: Option<f64>,
    /// Percent change on the day.
    pub regular_market_change_percent: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

impl Quote {
    pub fn symbol_or_unknown(&self) -> &str {
        self.symbol.as_deref().unwrap_or("UNKNOWN")
    }

    /// True when no field at all was supplied, e.g. `"quote": {}`.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdValues {
    pub macd: Option<f64>,
    pub histogram: Option<f64>,
    pub signal: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerBands {
    pub lower: Option<f64>,
    pub middle: Option<f64>,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stochastic {
    pub k: Option<f64>,
    pub d: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObvValues {
    pub obv: Option<f64>,
    pub prev_obv: Option<f64>,
}

/// Indicator values for the latest bar (and the previous bar where a rule
/// needs a crossover), computed upstream from the price history.
///
/// Anything the upstream computation could not produce is `None`. A compound
/// record that is present always carries every leaf, possibly as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub atr: Option<f64>,
    pub sma5: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub prev_sma20: Option<f64>,
    pub prev_sma50: Option<f64>,
    pub macd: Option<MacdValues>,
    pub bbands: Option<BollingerBands>,
    pub stochastic: Option<Stochastic>,
    pub obv: Option<ObvValues>,
    /// Mean volume of the 20 bars before the latest one.
    #[serde(rename = "avgVolume20")]
    pub avg_volume20: Option<f64>,
    /// Mean volume of the 5 bars before the latest one.
    #[serde(rename = "avg5DayVolume")]
    pub avg5_day_volume: Option<f64>,
}

impl IndicatorSnapshot {
    /// Look up a top-level scalar indicator by its wire name.
    ///
    /// Compound records (`macd`, `bbands`, `stochastic`, `obv`) are not
    /// scalars and resolve to `None`, as do unknown names.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        match name {
            "rsi" => self.rsi,
            "atr" => self.atr,
            "sma5" => self.sma5,
            "sma20" => self.sma20,
            "sma50" => self.sma50,
            "prev_sma20" => self.prev_sma20,
            "prev_sma50" => self.prev_sma50,
            "avgVolume20" => self.avg_volume20,
            "avg5DayVolume" => self.avg5_day_volume,
            _ => None,
        }
    }
}

/// Direction a named strategy pattern points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Bullish => write!(f, "Bullish"),
            Classification::Bearish => write!(f, "Bearish"),
            Classification::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Verdict of the composite scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::StrongBuy => write!(f, "STRONG BUY"),
            Recommendation::StrongSell => write!(f, "STRONG SELL"),
        }
    }
}

/// One registry strategy whose predicate held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyMatch {
    pub name: String,
    #[serde(rename = "type")]
    pub classification: Classification,
}

/// A caller-defined comparison rule, e.g. `rsi < 30 => "Oversold"`.
///
/// Every member is optional on the wire; an incomplete condition never
/// matches. `value` is kept as raw JSON so that numeric strings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserCondition {
    pub field: Option<String>,
    pub operator: Option<String>,
    pub value: Option<Value>,
    /// Label reported back when this condition is the first to match.
    pub signal: Option<Value>,
}

/// Everything the engine produces for one stock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Echo of the snapshot the verdicts were computed from.
    pub indicators: IndicatorSnapshot,
    pub recommended_signal: Option<Recommendation>,
    pub signal: Option<Value>,
    pub custom_strategy_matches: Vec<StrategyMatch>,
}

impl EvaluationResult {
    /// Result returned when there is not enough history to analyse.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Request body accepted by the analysis layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub quote: Option<Quote>,
    /// Number of price bars the snapshot was computed from.
    pub history_bars: usize,
    pub indicators: Option<IndicatorSnapshot>,
    pub strategies: Option<Vec<UserCondition>>,
}
