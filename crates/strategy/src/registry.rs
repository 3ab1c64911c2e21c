use tracing::info;

use common::{Classification, IndicatorSnapshot, Quote, StrategyMatch};

/// Trigger condition of a named strategy. Must be pure and null-safe:
/// any missing input makes it return `false`.
pub type Predicate = fn(&Quote, &IndicatorSnapshot) -> bool;

/// One entry of the strategy table.
#[derive(Debug, Clone, Copy)]
pub struct StrategyDefinition {
    pub name: &'static str,
    pub classification: Classification,
    pub predicate: Predicate,
}

/// Ordered, read-only table of named strategies.
///
/// Build once at startup and share by reference; evaluation never mutates it.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<StrategyDefinition>,
}

impl StrategyRegistry {
    pub fn new(strategies: Vec<StrategyDefinition>) -> Self {
        for def in &strategies {
            info!(name = def.name, classification = %def.classification, "Registered strategy");
        }
        Self { strategies }
    }

    /// The built-in pattern set reported with every analysis.
    pub fn builtin() -> Self {
        use Classification::{Bearish, Bullish, Neutral};

        let table: [(&'static str, Classification, Predicate); 12] = [
            ("F&O Volume & Price Gainers", Bullish, fno_volume_price_gainers),
            ("Hitting 52-Week High", Bullish, hitting_52_week_high),
            ("SMA Bullish Crossover (20/50)", Bullish, sma_bullish_crossover),
            ("Bollinger Band Breakout (Bullish)", Bullish, bollinger_breakout_bullish),
            ("RSI Oversold (< 30)", Bullish, rsi_oversold),
            ("Mean Reversion Buy (RSI < 35 & on Lower BBand)", Bullish, mean_reversion_buy),
            ("Price Above 20-Day MA", Bullish, price_above_sma20),
            ("Hitting 52-Week Low", Bearish, hitting_52_week_low),
            ("SMA Bearish Crossover (20/50)", Bearish, sma_bearish_crossover),
            ("Bollinger Band Breakout (Bearish)", Bearish, bollinger_breakout_bearish),
            ("Mean Reversion Sell (RSI > 65 & on Upper BBand)", Bearish, mean_reversion_sell),
            ("Unusual Volume Spike", Neutral, unusual_volume_spike),
        ];

        Self::new(
            table
                .into_iter()
                .map(|(name, classification, predicate)| StrategyDefinition {
                    name,
                    classification,
                    predicate,
                })
                .collect(),
        )
    }

    /// Every strategy whose predicate holds, in table order.
    pub fn matches(&self, quote: &Quote, snapshot: &IndicatorSnapshot) -> Vec<StrategyMatch> {
        self.strategies
            .iter()
            .filter(|def| (def.predicate)(quote, snapshot))
            .map(|def| StrategyMatch {
                name: def.name.to_string(),
                classification: def.classification,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrategyDefinition> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

// ─── Predicates ───────────────────────────────────────────────────────────────

/// Present and non-zero. Only the 52-week rules use this looser test; a zero
/// price or bound counts as missing there.
fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn upper_band(snapshot: &IndicatorSnapshot) -> Option<f64> {
    snapshot.bbands.and_then(|b| b.upper)
}

fn lower_band(snapshot: &IndicatorSnapshot) -> Option<f64> {
    snapshot.bbands.and_then(|b| b.lower)
}

fn fno_volume_price_gainers(quote: &Quote, s: &IndicatorSnapshot) -> bool {
    let (Some(price), Some(sma5), Some(sma20), Some(avg5), Some(avg20)) = (
        quote.regular_market_price,
        s.sma5,
        s.sma20,
        s.avg5_day_volume,
        s.avg_volume20,
    ) else {
        return false;
    };
    if avg20 == 0.0 {
        return false;
    }
    price > sma5 && price > sma20 && avg5 > avg20 * 1.5
}

fn hitting_52_week_high(quote: &Quote, _: &IndicatorSnapshot) -> bool {
    matches!(
        (truthy(quote.regular_market_price), truthy(quote.fifty_two_week_high)),
        (Some(price), Some(high)) if price >= high
    )
}

fn hitting_52_week_low(quote: &Quote, _: &IndicatorSnapshot) -> bool {
    matches!(
        (truthy(quote.regular_market_price), truthy(quote.fifty_two_week_low)),
        (Some(price), Some(low)) if price <= low
    )
}

fn sma_bullish_crossover(_: &Quote, s: &IndicatorSnapshot) -> bool {
    matches!(
        (s.prev_sma20, s.prev_sma50, s.sma20, s.sma50),
        (Some(p20), Some(p50), Some(c20), Some(c50)) if p20 <= p50 && c20 > c50
    )
}

fn sma_bearish_crossover(_: &Quote, s: &IndicatorSnapshot) -> bool {
    matches!(
        (s.prev_sma20, s.prev_sma50, s.sma20, s.sma50),
        (Some(p20), Some(p50), Some(c20), Some(c50)) if p20 >= p50 && c20 < c50
    )
}

fn bollinger_breakout_bullish(quote: &Quote, s: &IndicatorSnapshot) -> bool {
    matches!(
        (quote.regular_market_price, upper_band(s)),
        (Some(price), Some(upper)) if price > upper
    )
}

fn bollinger_breakout_bearish(quote: &Quote, s: &IndicatorSnapshot) -> bool {
    matches!(
        (quote.regular_market_price, lower_band(s)),
        (Some(price), Some(lower)) if price < lower
    )
}

fn rsi_oversold(_: &Quote, s: &IndicatorSnapshot) -> bool {
    s.rsi.is_some_and(|rsi| rsi < 30.0)
}

fn mean_reversion_buy(quote: &Quote, s: &IndicatorSnapshot) -> bool {
    matches!(
        (quote.regular_market_price, lower_band(s), s.rsi),
        (Some(price), Some(lower), Some(rsi)) if price <= lower && rsi < 35.0
    )
}

fn mean_reversion_sell(quote: &Quote, s: &IndicatorSnapshot) -> bool {
    matches!(
        (quote.regular_market_price, upper_band(s), s.rsi),
        (Some(price), Some(upper), Some(rsi)) if price >= upper && rsi > 65.0
    )
}

fn price_above_sma20(quote: &Quote, s: &IndicatorSnapshot) -> bool {
    matches!(
        (quote.regular_market_price, s.sma20),
        (Some(price), Some(sma20)) if price > sma20
    )
}

fn unusual_volume_spike(quote: &Quote, s: &IndicatorSnapshot) -> bool {
    matches!(
        (quote.regular_market_volume, s.avg_volume20),
        (Some(volume), Some(avg20)) if volume > avg20 * 3.0
    )
}
