//! Per-cycle results and the aggregate summary published to the run ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::agent::{Agent, StrategyKind};

/// Terminal status of one agent in one cycle.
///
/// Exactly one of these is recorded per agent per cycle; each variant
/// carries only the fields that matter for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AgentOutcome {
    /// Cooldown window not yet elapsed; nothing was called
    Skipped,
    /// Evaluated, but the strategy produced nothing actionable
    NoSignal,
    /// Manual agent: the evaluator persisted a human-reviewable proposal
    ProposalCreated { proposal_id: String },
    /// Auto agent: trade executed
    AutoExecuted,
    /// Auto agent: the risk guard rejected the trade
    RiskBlocked { reason: String },
    /// Auto agent: the executor ran and reported a business failure
    ExecutionFailed { reason: String },
    /// Auto agent: the execution call errored or timed out
    ExecutionError { message: String },
    /// Unclassified failure anywhere in the per-agent pipeline
    Error { message: String },
}

impl AgentOutcome {
    pub fn status_label(&self) -> &'static str {
        match self {
            AgentOutcome::Skipped => "skipped",
            AgentOutcome::NoSignal => "no_signal",
            AgentOutcome::ProposalCreated { .. } => "proposal_created",
            AgentOutcome::AutoExecuted => "auto_executed",
            AgentOutcome::RiskBlocked { .. } => "risk_blocked",
            AgentOutcome::ExecutionFailed { .. } => "execution_failed",
            AgentOutcome::ExecutionError { .. } => "execution_error",
            AgentOutcome::Error { .. } => "error",
        }
    }

    pub fn proposal_id(&self) -> Option<&str> {
        match self {
            AgentOutcome::ProposalCreated { proposal_id } => Some(proposal_id),
            _ => None,
        }
    }

    /// The failure text carried by blocking/failing outcomes.
    pub fn error(&self) -> Option<&str> {
        match self {
            AgentOutcome::RiskBlocked { reason } | AgentOutcome::ExecutionFailed { reason } => {
                Some(reason)
            }
            AgentOutcome::ExecutionError { message } | AgentOutcome::Error { message } => {
                Some(message)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.error() {
            Some(detail) => write!(f, "{}: {}", self.status_label(), detail),
            None => write!(f, "{}", self.status_label()),
        }
    }
}

/// One agent's record in a cycle summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent_id: String,
    pub agent_name: String,
    pub strategy: StrategyKind,
    /// Human-readable signal description, when one was produced
    pub signal: Option<String>,
    #[serde(flatten)]
    pub outcome: AgentOutcome,
}

impl AgentResult {
    pub fn new(agent: &Agent, signal: Option<String>, outcome: AgentOutcome) -> Self {
        Self {
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            strategy: agent.strategy,
            signal,
            outcome,
        }
    }

    pub fn skipped(agent: &Agent) -> Self {
        Self::new(agent, None, AgentOutcome::Skipped)
    }
}

/// Aggregate outcome of one scheduler cycle.
///
/// Created at cycle start, finalized at cycle end, then published as the
/// new run-ledger value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleSummary {
    pub cycle_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Effective cooldown interval used for this cycle
    pub interval_ms: u64,
    pub agents_evaluated: u64,
    pub agents_skipped: u64,
    pub signals_generated: u64,
    pub proposals_created: u64,
    pub auto_executed: u64,
    pub risk_blocked: u64,
    pub errors: u64,
    pub tokens_discovered: usize,
    pub tokens_analyzed: usize,
    pub results: Vec<AgentResult>,
}

impl CycleSummary {
    pub fn begin(
        started_at: DateTime<Utc>,
        interval_ms: u64,
        tokens_discovered: usize,
        tokens_analyzed: usize,
    ) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            started_at,
            finished_at: started_at,
            duration_ms: 0,
            interval_ms,
            agents_evaluated: 0,
            agents_skipped: 0,
            signals_generated: 0,
            proposals_created: 0,
            auto_executed: 0,
            risk_blocked: 0,
            errors: 0,
            tokens_discovered,
            tokens_analyzed,
            results: Vec::new(),
        }
    }

    /// Append one agent record and bump the matching counters.
    pub fn record(&mut self, result: AgentResult) {
        match &result.outcome {
            AgentOutcome::Skipped => self.agents_skipped += 1,
            other => {
                self.agents_evaluated += 1;
                match other {
                    AgentOutcome::ProposalCreated { .. } => self.proposals_created += 1,
                    AgentOutcome::AutoExecuted => self.auto_executed += 1,
                    AgentOutcome::RiskBlocked { .. } => self.risk_blocked += 1,
                    AgentOutcome::Error { .. } => self.errors += 1,
                    _ => {}
                }
            }
        }
        if result.signal.is_some() {
            self.signals_generated += 1;
        }
        self.results.push(result);
    }

    /// Stamp end time and duration once every agent has been processed.
    pub fn finalize(&mut self) {
        self.finished_at = Utc::now();
        self.duration_ms = self
            .finished_at
            .signed_duration_since(self.started_at)
            .num_milliseconds()
            .max(0) as u64;
    }
}

/// Read-only scheduler snapshot for operators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub active_agent_count: usize,
    pub auto_execute_agent_count: usize,
    pub pending_proposal_count: usize,
    pub min_interval_ms: u64,
    pub auto_loop_enabled: bool,
    pub last_run: Option<CycleSummary>,
}
