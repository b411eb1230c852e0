//! Trading agent definitions shared across the scheduler.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::DEFAULT_SLIPPAGE_BPS;

/// Strategy family an agent trades with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Momentum,
    MeanReversion,
    Breakout,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Momentum => write!(f, "momentum"),
            StrategyKind::MeanReversion => write!(f, "mean_reversion"),
            StrategyKind::Breakout => write!(f, "breakout"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "momentum" => Ok(StrategyKind::Momentum),
            "mean_reversion" | "mean-reversion" => Ok(StrategyKind::MeanReversion),
            "breakout" => Ok(StrategyKind::Breakout),
            _ => Err("invalid strategy; expected momentum|mean_reversion|breakout"),
        }
    }
}

/// Risk appetite configured per agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Conservative,
    Balanced,
    Aggressive,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Conservative => write!(f, "conservative"),
            RiskLevel::Balanced => write!(f, "balanced"),
            RiskLevel::Aggressive => write!(f, "aggressive"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskLevel::Conservative),
            "balanced" => Ok(RiskLevel::Balanced),
            "aggressive" => Ok(RiskLevel::Aggressive),
            _ => Err("invalid risk level; expected conservative|balanced|aggressive"),
        }
    }
}

/// A configured trading agent.
///
/// Owned and persisted elsewhere; the scheduler reads it and conditionally
/// rewrites `capital` through the capital store during reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub strategy: StrategyKind,
    pub risk_level: RiskLevel,
    /// Persisted capital in native units
    pub capital: Decimal,
    /// Cumulative realized PnL in native units
    pub total_pnl: Decimal,
    /// Maximum tolerated drawdown as a fraction of capital
    pub max_drawdown: Decimal,
    pub wallet_address: Option<String>,
    /// When set, trades execute directly after a risk check; otherwise
    /// signals become human-reviewable proposals.
    pub auto_execute: bool,
    pub max_daily_trades: u32,
    /// Daily loss limit in native units
    pub daily_loss_limit: Decimal,
    /// Per-agent slippage override in basis points
    pub slippage_bps: Option<u32>,
}

impl Agent {
    /// Slippage to hand the executor, falling back to the platform default.
    pub fn slippage_bps(&self) -> u32 {
        self.slippage_bps.unwrap_or(DEFAULT_SLIPPAGE_BPS)
    }

    /// Static risk view handed to the risk guard.
    pub fn risk_profile(&self) -> RiskProfile {
        RiskProfile {
            risk_level: self.risk_level,
            capital: self.capital,
            max_drawdown: self.max_drawdown,
            max_daily_trades: self.max_daily_trades,
            daily_loss_limit: self.daily_loss_limit,
        }
    }
}

/// The slice of agent configuration the risk guard sees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    pub risk_level: RiskLevel,
    pub capital: Decimal,
    pub max_drawdown: Decimal,
    pub max_daily_trades: u32,
    pub daily_loss_limit: Decimal,
}
