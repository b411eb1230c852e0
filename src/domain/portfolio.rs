//! Per-agent portfolio views assembled once per cycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::agent::Agent;

/// One token position observed on-chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub token_address: String,
    pub symbol: String,
    pub balance: Decimal,
    /// Best-effort native-unit equivalent; zero when undeterminable
    pub native_value: Decimal,
}

/// Snapshot of one agent's wallet, built fresh per agent per cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub native_balance: Decimal,
    pub holdings: Vec<Holding>,
}

impl PortfolioSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Native balance plus the native-unit value of every holding.
    pub fn total_value(&self) -> Decimal {
        self.native_balance + self.holdings.iter().map(|h| h.native_value).sum::<Decimal>()
    }
}

/// Immutable view handed to the strategy evaluator.
///
/// Exists only for the duration of one agent's evaluation; `capital` is the
/// reconciled value for this cycle, which may differ from `agent.capital`.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub agent: Agent,
    pub portfolio: PortfolioSnapshot,
    pub capital: Decimal,
}

impl AgentContext {
    pub fn new(agent: &Agent, portfolio: PortfolioSnapshot, capital: Decimal) -> Self {
        Self {
            agent: agent.clone(),
            portfolio,
            capital,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_value_sums_native_and_holdings() {
        let snapshot = PortfolioSnapshot {
            native_balance: dec!(2.5),
            holdings: vec![
                Holding {
                    token_address: "0xaaa".to_string(),
                    symbol: "AAA".to_string(),
                    balance: dec!(100),
                    native_value: dec!(1.2),
                },
                Holding {
                    token_address: "0xbbb".to_string(),
                    symbol: "BBB".to_string(),
                    balance: dec!(7),
                    native_value: Decimal::ZERO,
                },
            ],
        };
        assert_eq!(snapshot.total_value(), dec!(3.7));
    }

    #[test]
    fn test_empty_snapshot_is_zero() {
        assert_eq!(PortfolioSnapshot::empty().total_value(), Decimal::ZERO);
    }
}
