//! Continuous cycle trigger.
//!
//! A supervised recurring task rather than a fire-and-forget timer: the
//! next cycle is scheduled only after the current one returns (cycles
//! never overlap), failures are logged and observable, and the loop stops
//! cleanly on demand.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::controller::Scheduler;

/// Handle to a running evaluation loop.
pub struct LoopHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl LoopHandle {
    /// Signal the loop to stop and wait for it to finish. A cycle already
    /// in flight completes first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Evaluation loop task ended abnormally: {e}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the evaluation loop: run a cycle, sleep `delay`, repeat.
///
/// Cycle failures are logged only; the next scheduled cycle is the retry.
pub fn spawn_loop(scheduler: Arc<Scheduler>, delay: Duration) -> LoopHandle {
    let (shutdown, mut rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Evaluation loop started (delay {delay:?})");
        loop {
            match scheduler.run_cycle(None, None).await {
                Ok(summary) => info!(
                    "Loop cycle {}: {} evaluated, {} skipped",
                    summary.cycle_id, summary.agents_evaluated, summary.agents_skipped
                ),
                Err(e) => warn!("Loop cycle failed: {e}"),
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = rx.changed() => {
                    if changed.is_err() || *rx.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Evaluation loop stopped");
    });

    LoopHandle { shutdown, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use crate::error::StewardError;
    use crate::scheduler::controller::Collaborators;
    use crate::scheduler::store::{InMemoryCooldownStore, InMemoryRunLedger};
    use crate::scheduler::traits::{
        MockAgentDirectory, MockCapitalStore, MockHoldingsProvider, MockNativeBalanceSource,
        MockProposalQueue, MockRiskGuard, MockStrategyEvaluator, MockTokenDiscovery,
        MockTradeExecutor,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scheduler_with_cycle_counter(fail_cycles: bool) -> (Arc<Scheduler>, Arc<AtomicUsize>) {
        let cycles = Arc::new(AtomicUsize::new(0));

        let mut directory = MockAgentDirectory::new();
        let counter = cycles.clone();
        directory.expect_active_agents().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            if fail_cycles {
                Err(StewardError::AgentDirectory("db down".to_string()))
            } else {
                Ok(Vec::new())
            }
        });

        let mut discovery = MockTokenDiscovery::new();
        discovery.expect_discover().returning(|_| Ok(Vec::new()));

        let scheduler = Scheduler::new(
            SchedulerConfig::default(),
            Collaborators {
                directory: Arc::new(directory),
                discovery: Arc::new(discovery),
                evaluator: Arc::new(MockStrategyEvaluator::new()),
                risk: Arc::new(MockRiskGuard::new()),
                executor: Arc::new(MockTradeExecutor::new()),
                native_balance: Arc::new(MockNativeBalanceSource::new()),
                holdings_primary: Arc::new(MockHoldingsProvider::new()),
                holdings_secondary: Arc::new(MockHoldingsProvider::new()),
                capital: Arc::new(MockCapitalStore::new()),
                proposals: Arc::new(MockProposalQueue::new()),
            },
            Arc::new(InMemoryCooldownStore::new()),
            Arc::new(InMemoryRunLedger::new()),
        );

        (Arc::new(scheduler), cycles)
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_runs_then_stops_cleanly() {
        let (scheduler, cycles) = scheduler_with_cycle_counter(false);
        let handle = spawn_loop(scheduler.clone(), Duration::from_secs(60));

        // Give the spawned task a chance to run its first cycle.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(cycles.load(Ordering::SeqCst), 1);
        assert!(scheduler.last_run().await.is_some());
        assert!(!handle.is_finished());

        handle.stop().await;
        // Stopped mid-sleep: no extra cycle ran.
        assert_eq!(cycles.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_survives_cycle_failures() {
        let (scheduler, cycles) = scheduler_with_cycle_counter(true);
        let handle = spawn_loop(scheduler, Duration::from_secs(60));

        // Two full delays: the loop must keep rescheduling after failures.
        tokio::time::sleep(Duration::from_secs(130)).await;
        assert!(cycles.load(Ordering::SeqCst) >= 2);
        assert!(!handle.is_finished());

        handle.stop().await;
    }
}
