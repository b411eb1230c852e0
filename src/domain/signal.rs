//! Trade signals produced by the strategy evaluator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a proposed trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
        }
    }
}

/// Actionable trade recommendation from the strategy evaluator.
///
/// Consumed as-is; the scheduler never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSignal {
    pub action: TradeAction,
    pub token_address: Option<String>,
    pub token_symbol: String,
    /// Trade size in native units
    pub amount: Decimal,
    /// Evaluator confidence in [0, 1]
    pub confidence: f64,
}

impl TradeSignal {
    /// Human-readable one-liner for cycle reporting,
    /// e.g. `buy FOO (confidence: 0.8)`.
    pub fn describe(&self) -> String {
        format!(
            "{} {} (confidence: {})",
            self.action, self.token_symbol, self.confidence
        )
    }

    /// Token identifier for downstream calls: address when known,
    /// symbol otherwise.
    pub fn token(&self) -> &str {
        self.token_address.as_deref().unwrap_or(&self.token_symbol)
    }
}

/// What one evaluator invocation produced for one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Evaluation {
    pub signal: Option<TradeSignal>,
    /// Set when the evaluator persisted a human-reviewable proposal
    pub proposal_id: Option<String>,
}

/// The action/amount/token triple handed to the risk guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedTrade {
    pub action: TradeAction,
    pub token: String,
    pub amount: Decimal,
}

impl ProposedTrade {
    pub fn from_signal(signal: &TradeSignal) -> Self {
        Self {
            action: signal.action,
            token: signal.token().to_string(),
            amount: signal.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_describe_format() {
        let signal = TradeSignal {
            action: TradeAction::Buy,
            token_address: None,
            token_symbol: "FOO".to_string(),
            amount: dec!(1),
            confidence: 0.8,
        };
        assert_eq!(signal.describe(), "buy FOO (confidence: 0.8)");
    }

    #[test]
    fn test_token_prefers_address() {
        let mut signal = TradeSignal {
            action: TradeAction::Sell,
            token_address: Some("0xdeadbeef".to_string()),
            token_symbol: "BAR".to_string(),
            amount: dec!(2.5),
            confidence: 0.6,
        };
        assert_eq!(signal.token(), "0xdeadbeef");

        signal.token_address = None;
        assert_eq!(signal.token(), "BAR");
    }
}
