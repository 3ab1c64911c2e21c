use std::sync::Arc;

use common::{
    BollingerBands, IndicatorSnapshot, MacdValues, ObvValues, Quote, Recommendation, Stochastic,
    UserCondition,
};
use proptest::prelude::*;
use serde_json::json;
use strategy::{composite, Evaluator, ScoringConfig, StrategyRegistry};

fn leaf() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None::<f64>),
        1 => Just(Some(0.0)),
        6 => (-1_000.0f64..1_000.0).prop_map(Some),
    ]
}

fn quote() -> impl Strategy<Value = Quote> {
    (leaf(), leaf(), leaf(), leaf(), leaf()).prop_map(|(price, volume, change, high, low)| Quote {
        symbol: Some("PROP".into()),
        regular_market_price: price,
        regular_market_volume: volume,
        regular_market_change_percent: change,
        fifty_two_week_high: high,
        fifty_two_week_low: low,
    })
}

fn snapshot() -> impl Strategy<Value = IndicatorSnapshot> {
    let scalars = (leaf(), leaf(), leaf(), leaf(), leaf(), leaf(), leaf(), leaf(), leaf());
    let compounds = (
        proptest::option::of((leaf(), leaf(), leaf())),
        proptest::option::of((leaf(), leaf(), leaf())),
        proptest::option::of((leaf(), leaf())),
        proptest::option::of((leaf(), leaf())),
    );
    (scalars, compounds).prop_map(
        |(
            (rsi, atr, sma5, sma20, sma50, prev_sma20, prev_sma50, avg20, avg5),
            (macd, bbands, stoch, obv),
        )| IndicatorSnapshot {
            rsi,
            atr,
            sma5,
            sma20,
            sma50,
            prev_sma20,
            prev_sma50,
            macd: macd.map(|(macd, signal, histogram)| MacdValues { macd, signal, histogram }),
            bbands: bbands.map(|(lower, middle, upper)| BollingerBands { lower, middle, upper }),
            stochastic: stoch.map(|(k, d)| Stochastic { k, d }),
            obv: obv.map(|(obv, prev_obv)| ObvValues { obv, prev_obv }),
            avg_volume20: avg20,
            avg5_day_volume: avg5,
        },
    )
}

fn condition() -> impl Strategy<Value = UserCondition> {
    let field = prop_oneof![
        Just("price"),
        Just("change"),
        Just("rsi"),
        Just("sma20"),
        Just("macd"),
        Just("unknown"),
    ];
    let operator = prop_oneof![
        Just(">"),
        Just("<"),
        Just(">="),
        Just("<="),
        Just("=="),
        Just("~"),
    ];
    let value = prop_oneof![
        (-1_000.0f64..1_000.0).prop_map(|v| json!(v)),
        (-1_000i64..1_000).prop_map(|v| json!(v.to_string())),
        Just(json!("not-a-number")),
        Just(json!(null)),
    ];
    (
        proptest::option::of(field),
        proptest::option::of(operator),
        proptest::option::of(value),
        "[A-Z]{1,4}",
    )
        .prop_map(|(field, operator, value, signal)| UserCondition {
            field: field.map(String::from),
            operator: operator.map(String::from),
            value,
            signal: Some(json!(signal)),
        })
}

proptest! {
    /// Arbitrary gaps in the inputs must never panic, and the same inputs
    /// must always produce the same output.
    #[test]
    fn evaluation_is_total_and_deterministic(
        q in quote(),
        s in snapshot(),
        conditions in proptest::collection::vec(condition(), 0..6),
    ) {
        let evaluator = Evaluator::new(Arc::new(StrategyRegistry::builtin()));
        let first = evaluator.evaluate(&q, &s, &conditions);
        let second = evaluator.evaluate(&q, &s, &conditions);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first.indicators, &s);
        prop_assert!(first.custom_strategy_matches.len() <= evaluator.registry().len());
    }

    /// The verdict always agrees with the score pair and never names both sides.
    #[test]
    fn verdict_matches_score(q in quote(), s in snapshot()) {
        let cfg = ScoringConfig::default();
        let verdict = composite::recommend(&q, &s, &cfg);
        match composite::score(&q, &s) {
            None => prop_assert_eq!(verdict, None),
            Some(score) => {
                let buy = score.bullish >= 8 && score.bullish >= score.bearish + 4;
                let sell = score.bearish >= 8 && score.bearish >= score.bullish + 4;
                prop_assert!(!(buy && sell));
                let expected = if buy {
                    Some(Recommendation::StrongBuy)
                } else if sell {
                    Some(Recommendation::StrongSell)
                } else {
                    None
                };
                prop_assert_eq!(verdict, expected);
            }
        }
    }

    /// Registry matches come back in table order.
    #[test]
    fn matches_follow_registry_order(q in quote(), s in snapshot()) {
        let registry = StrategyRegistry::builtin();
        let order: Vec<&str> = registry.iter().map(|d| d.name).collect();
        let positions: Vec<usize> = registry
            .matches(&q, &s)
            .iter()
            .map(|m| order.iter().position(|n| *n == m.name).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
