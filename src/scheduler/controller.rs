//! The evaluation cycle controller.
//!
//! One `run_cycle` call evaluates every eligible active agent exactly once:
//! cooldown gate, portfolio snapshot, capital reconciliation, strategy
//! evaluation, execution routing. Agents are processed strictly
//! sequentially so cooldown and capital writes stay race-free without
//! locking; a failure inside one agent's pipeline becomes its terminal
//! `error` record and never aborts the rest.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::SchedulerConfig;
use crate::domain::{
    Agent, AgentContext, AgentOutcome, AgentResult, CycleSummary, SchedulerStatus,
};
use crate::error::Result;

use super::portfolio::PortfolioFetcher;
use super::reconcile::ReconciliationEngine;
use super::router::ExecutionRouter;
use super::store::{CooldownStore, RunLedger};
use super::traits::{
    AgentDirectory, CapitalStore, HoldingsProvider, NativeBalanceSource, ProposalQueue, RiskGuard,
    StrategyEvaluator, TokenDiscovery, TradeExecutor,
};
use super::universe::{TokenUniverse, UniverseBuilder};

/// External collaborators the scheduler is wired to at startup.
pub struct Collaborators {
    pub directory: Arc<dyn AgentDirectory>,
    pub discovery: Arc<dyn TokenDiscovery>,
    pub evaluator: Arc<dyn StrategyEvaluator>,
    pub risk: Arc<dyn RiskGuard>,
    pub executor: Arc<dyn TradeExecutor>,
    pub native_balance: Arc<dyn NativeBalanceSource>,
    pub holdings_primary: Arc<dyn HoldingsProvider>,
    pub holdings_secondary: Arc<dyn HoldingsProvider>,
    pub capital: Arc<dyn CapitalStore>,
    pub proposals: Arc<dyn ProposalQueue>,
}

pub struct Scheduler {
    config: SchedulerConfig,
    directory: Arc<dyn AgentDirectory>,
    evaluator: Arc<dyn StrategyEvaluator>,
    proposals: Arc<dyn ProposalQueue>,
    universe: UniverseBuilder,
    portfolio: PortfolioFetcher,
    reconciler: ReconciliationEngine,
    router: ExecutionRouter,
    cooldowns: Arc<dyn CooldownStore>,
    ledger: Arc<dyn RunLedger>,
    /// Cycles never overlap: a concurrent trigger waits for the one in
    /// flight, then runs against the updated cooldown state.
    cycle_gate: tokio::sync::Mutex<()>,
}

impl Scheduler {
    pub fn new(
        config: SchedulerConfig,
        collaborators: Collaborators,
        cooldowns: Arc<dyn CooldownStore>,
        ledger: Arc<dyn RunLedger>,
    ) -> Self {
        let Collaborators {
            directory,
            discovery,
            evaluator,
            risk,
            executor,
            native_balance,
            holdings_primary,
            holdings_secondary,
            capital,
            proposals,
        } = collaborators;

        let universe = UniverseBuilder::new(
            discovery,
            config.default_tokens.clone(),
            config.diversity_tokens.clone(),
        );
        let portfolio = PortfolioFetcher::new(native_balance, holdings_primary, holdings_secondary);
        let reconciler = ReconciliationEngine::new(capital, config.drift_threshold);
        let router = ExecutionRouter::new(
            risk,
            executor,
            Duration::from_secs(config.execution_timeout_secs),
        );

        Self {
            config,
            directory,
            evaluator,
            proposals,
            universe,
            portfolio,
            reconciler,
            router,
            cooldowns,
            ledger,
            cycle_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Run one evaluation cycle over every active agent.
    ///
    /// Fails only when the active-agent list itself cannot be fetched;
    /// every per-agent failure surfaces as that agent's terminal status.
    pub async fn run_cycle(
        &self,
        tokens: Option<Vec<String>>,
        interval_ms: Option<u64>,
    ) -> Result<CycleSummary> {
        let _gate = self.cycle_gate.lock().await;

        let started_at = Utc::now();
        let interval_ms = self.config.effective_interval_ms(interval_ms);
        let cooldown = ChronoDuration::milliseconds(interval_ms as i64);

        let agents = self.directory.active_agents().await?;
        let universe = self.universe.build(tokens.as_deref()).await;

        let mut summary = CycleSummary::begin(
            started_at,
            interval_ms,
            universe.discovered_count(),
            universe.len(),
        );
        info!(
            "Cycle {} starting: {} active agents, {} tokens",
            summary.cycle_id,
            agents.len(),
            universe.len()
        );

        for agent in &agents {
            if let Some(last) = self.cooldowns.last_evaluated(&agent.id).await {
                if started_at.signed_duration_since(last) < cooldown {
                    debug!("Agent {} inside cooldown window, skipping", agent.id);
                    summary.record(AgentResult::skipped(agent));
                    continue;
                }
            }

            // Past the gate the agent counts as evaluated, whatever its
            // terminal status turns out to be.
            self.cooldowns.mark_evaluated(&agent.id, started_at).await;

            let result = match self.evaluate_agent(agent, &universe).await {
                Ok(result) => result,
                Err(e) => {
                    error!("Agent {} evaluation failed: {e}", agent.id);
                    AgentResult::new(
                        agent,
                        None,
                        AgentOutcome::Error {
                            message: e.to_string(),
                        },
                    )
                }
            };
            summary.record(result);
        }

        summary.finalize();
        info!(
            "Cycle {} complete in {}ms: {} evaluated, {} skipped, {} signals, {} proposals, {} auto-executed, {} blocked, {} errors",
            summary.cycle_id,
            summary.duration_ms,
            summary.agents_evaluated,
            summary.agents_skipped,
            summary.signals_generated,
            summary.proposals_created,
            summary.auto_executed,
            summary.risk_blocked,
            summary.errors
        );

        self.ledger.publish(summary.clone()).await;
        Ok(summary)
    }

    /// Steps 2–7 of one agent's evaluation; any error here is caught by
    /// the cycle loop and recorded as the agent's terminal `error`.
    async fn evaluate_agent(&self, agent: &Agent, universe: &TokenUniverse) -> Result<AgentResult> {
        let snapshot = self.portfolio.fetch(agent.wallet_address.as_deref()).await;

        // Reconciliation needs an observed wallet; with none, the empty
        // snapshot would "correct" capital to zero.
        let capital = if agent.wallet_address.is_some() {
            self.reconciler.reconcile(agent, &snapshot).await.capital
        } else {
            agent.capital
        };

        let context = AgentContext::new(agent, snapshot, capital);
        let evaluation = self
            .evaluator
            .evaluate(&context, universe, !agent.auto_execute)
            .await?;
        let signal_text = evaluation.signal.as_ref().map(|s| s.describe());

        let outcome = self.router.route(agent, &evaluation).await?;
        Ok(AgentResult::new(agent, signal_text, outcome))
    }

    /// Read-only operator snapshot.
    pub async fn status(&self) -> Result<SchedulerStatus> {
        let agents = self.directory.active_agents().await?;
        let pending = self.proposals.pending_count().await?;

        Ok(SchedulerStatus {
            active_agent_count: agents.len(),
            auto_execute_agent_count: agents.iter().filter(|a| a.auto_execute).count(),
            pending_proposal_count: pending,
            min_interval_ms: self.config.min_interval_ms,
            auto_loop_enabled: self.config.auto_loop,
            last_run: self.ledger.last().await,
        })
    }

    /// The most recent finalized cycle, if any.
    pub async fn last_run(&self) -> Option<CycleSummary> {
        self.ledger.last().await
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
