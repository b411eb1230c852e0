//! Contracts the scheduler consumes.
//!
//! Implementations live elsewhere (chain adapters, strategy engines,
//! persistence); the scheduler only depends on these seams, so tests and
//! alternative deployments swap them freely.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Agent, AgentContext, Evaluation, Holding, ProposedTrade, RiskProfile, TradeAction,
};
use crate::error::Result;

use super::universe::TokenUniverse;

/// One token surfaced by discovery, with whatever metadata came back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredToken {
    pub address: String,
    pub created_at_block: Option<u64>,
}

/// Best-effort token discovery. Failures degrade to an empty result at the
/// call site; they never abort a cycle.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenDiscovery: Send + Sync {
    async fn discover(&self, seed_tokens: &[String]) -> Result<Vec<DiscoveredToken>>;
}

/// Strategy engine invoked once per evaluated agent.
///
/// With `auto_propose` set (manual agents), the evaluator persists any
/// actionable signal as a human-reviewable proposal and returns its id.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StrategyEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        context: &AgentContext,
        universe: &TokenUniverse,
        auto_propose: bool,
    ) -> Result<Evaluation>;
}

/// Verdict returned by the risk guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub ok: bool,
    pub reason: Option<String>,
}

impl RiskVerdict {
    pub fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

/// Pre-trade risk evaluation against an agent's static risk profile.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RiskGuard: Send + Sync {
    async fn check(&self, profile: &RiskProfile, trade: &ProposedTrade) -> Result<RiskVerdict>;
}

/// What the scheduler asks the executor to do
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub agent_id: String,
    pub token: String,
    pub action: TradeAction,
    pub amount: Decimal,
    pub slippage_bps: u32,
}

/// Executor outcome: `success = false` is a business rejection, an `Err`
/// from the call itself is a transport failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    pub success: bool,
    pub error: Option<String>,
}

/// Trade construction and submission. The scheduler bounds each call with
/// its own hard timeout; the executor does not need one.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TradeExecutor: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionReceipt>;
}

/// Native-unit balance of a wallet.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NativeBalanceSource: Send + Sync {
    async fn native_balance(&self, wallet: &str) -> Result<Decimal>;
}

/// One of the two independent holdings providers merged into a snapshot.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HoldingsProvider: Send + Sync {
    async fn holdings(&self, wallet: &str) -> Result<Vec<Holding>>;
}

/// Durable per-agent capital ledger. Writes may fail; the caller treats
/// that as non-fatal and keeps the previous value for the cycle.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CapitalStore: Send + Sync {
    async fn read_capital(&self, agent_id: &str) -> Result<Decimal>;
    async fn write_capital(&self, agent_id: &str, value: Decimal) -> Result<()>;
}

/// Source of the active-agent set. A failure here is the one error that
/// fails the whole cycle call.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    async fn active_agents(&self) -> Result<Vec<Agent>>;
}

/// Read side of the evaluator-persisted proposal queue, for status reporting.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProposalQueue: Send + Sync {
    async fn pending_count(&self) -> Result<usize>;
}
