//! Execution decision routing.
//!
//! Small state machine turning one agent's evaluation into exactly one
//! terminal outcome: manual agents end at `proposal_created`/`no_signal`
//! without ever touching the risk guard or executor; auto-execute agents
//! run risk check then a hard-bounded execution call.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::domain::{Agent, AgentOutcome, Evaluation, ProposedTrade};
use crate::error::{Result, StewardError};

use super::traits::{ExecutionRequest, RiskGuard, TradeExecutor};

pub struct ExecutionRouter {
    risk: Arc<dyn RiskGuard>,
    executor: Arc<dyn TradeExecutor>,
    execution_timeout: Duration,
}

impl ExecutionRouter {
    pub fn new(
        risk: Arc<dyn RiskGuard>,
        executor: Arc<dyn TradeExecutor>,
        execution_timeout: Duration,
    ) -> Self {
        Self {
            risk,
            executor,
            execution_timeout,
        }
    }

    /// Route one evaluation to its terminal outcome.
    ///
    /// A risk-guard transport error propagates so the controller records
    /// the unclassified `error` status; a risk rejection is an expected
    /// outcome, not an error.
    pub async fn route(&self, agent: &Agent, evaluation: &Evaluation) -> Result<AgentOutcome> {
        if !agent.auto_execute {
            // Manual path: proposal persistence is the evaluator's job,
            // we only report what it did.
            return Ok(match &evaluation.proposal_id {
                Some(id) => AgentOutcome::ProposalCreated {
                    proposal_id: id.clone(),
                },
                None => AgentOutcome::NoSignal,
            });
        }

        let Some(signal) = &evaluation.signal else {
            return Ok(AgentOutcome::NoSignal);
        };

        let trade = ProposedTrade::from_signal(signal);
        let verdict = self.risk.check(&agent.risk_profile(), &trade).await?;
        if !verdict.ok {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "risk check rejected".to_string());
            warn!("Agent {} trade blocked: {reason}", agent.id);
            return Ok(AgentOutcome::RiskBlocked { reason });
        }

        let request = ExecutionRequest {
            agent_id: agent.id.clone(),
            token: signal.token().to_string(),
            action: signal.action,
            amount: signal.amount,
            slippage_bps: agent.slippage_bps(),
        };

        match timeout(self.execution_timeout, self.executor.execute(&request)).await {
            Err(_) => {
                let message = StewardError::ExecutionTimeout {
                    elapsed_secs: self.execution_timeout.as_secs(),
                }
                .to_string();
                error!("Agent {}: {message}", agent.id);
                Ok(AgentOutcome::ExecutionError { message })
            }
            Ok(Err(e)) => {
                error!("Agent {} execution errored: {e}", agent.id);
                Ok(AgentOutcome::ExecutionError {
                    message: e.to_string(),
                })
            }
            Ok(Ok(receipt)) => {
                if receipt.success {
                    info!(
                        "Agent {} auto-executed {} {}",
                        agent.id, signal.action, signal.token_symbol
                    );
                    Ok(AgentOutcome::AutoExecuted)
                } else {
                    let reason = receipt
                        .error
                        .unwrap_or_else(|| "execution rejected".to_string());
                    warn!("Agent {} execution failed: {reason}", agent.id);
                    Ok(AgentOutcome::ExecutionFailed { reason })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RiskLevel, StrategyKind, TradeAction, TradeSignal};
    use crate::scheduler::traits::{
        ExecutionReceipt, MockRiskGuard, MockTradeExecutor, RiskVerdict,
    };
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn agent(auto_execute: bool) -> Agent {
        Agent {
            id: "agent-1".to_string(),
            name: "One".to_string(),
            strategy: StrategyKind::Momentum,
            risk_level: RiskLevel::Balanced,
            capital: dec!(100),
            total_pnl: Decimal::ZERO,
            max_drawdown: dec!(0.2),
            wallet_address: Some("0xwallet".to_string()),
            auto_execute,
            max_daily_trades: 10,
            daily_loss_limit: dec!(25),
            slippage_bps: None,
        }
    }

    fn signal() -> TradeSignal {
        TradeSignal {
            action: TradeAction::Buy,
            token_address: Some("0xfoo".to_string()),
            token_symbol: "FOO".to_string(),
            amount: dec!(1),
            confidence: 0.8,
        }
    }

    fn evaluation(with_signal: bool, proposal_id: Option<&str>) -> Evaluation {
        Evaluation {
            signal: with_signal.then(signal),
            proposal_id: proposal_id.map(String::from),
        }
    }

    fn router(risk: MockRiskGuard, executor: MockTradeExecutor) -> ExecutionRouter {
        ExecutionRouter::new(Arc::new(risk), Arc::new(executor), Duration::from_secs(90))
    }

    #[tokio::test]
    async fn test_manual_agent_with_proposal() {
        // No expectations: a risk or executor call would panic.
        let router = router(MockRiskGuard::new(), MockTradeExecutor::new());
        let outcome = router
            .route(&agent(false), &evaluation(true, Some("p1")))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AgentOutcome::ProposalCreated {
                proposal_id: "p1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_manual_agent_without_proposal_is_no_signal() {
        let router = router(MockRiskGuard::new(), MockTradeExecutor::new());
        let outcome = router
            .route(&agent(false), &evaluation(true, None))
            .await
            .unwrap();
        assert_eq!(outcome, AgentOutcome::NoSignal);
    }

    #[tokio::test]
    async fn test_auto_agent_without_signal_is_no_signal() {
        let router = router(MockRiskGuard::new(), MockTradeExecutor::new());
        let outcome = router
            .route(&agent(true), &evaluation(false, None))
            .await
            .unwrap();
        assert_eq!(outcome, AgentOutcome::NoSignal);
    }

    #[tokio::test]
    async fn test_risk_rejection_blocks_without_execution() {
        let mut risk = MockRiskGuard::new();
        risk.expect_check()
            .times(1)
            .returning(|_, _| Ok(RiskVerdict::blocked("daily loss limit exceeded")));

        // Executor has no expectations: calling it would panic.
        let router = router(risk, MockTradeExecutor::new());
        let outcome = router
            .route(&agent(true), &evaluation(true, None))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AgentOutcome::RiskBlocked {
                reason: "daily loss limit exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_successful_execution() {
        let mut risk = MockRiskGuard::new();
        risk.expect_check().returning(|_, _| Ok(RiskVerdict::ok()));

        let mut executor = MockTradeExecutor::new();
        executor.expect_execute().times(1).returning(|request| {
            assert_eq!(request.slippage_bps, 100);
            assert_eq!(request.token, "0xfoo");
            Ok(ExecutionReceipt {
                success: true,
                error: None,
            })
        });

        let router = router(risk, executor);
        let outcome = router
            .route(&agent(true), &evaluation(true, None))
            .await
            .unwrap();
        assert_eq!(outcome, AgentOutcome::AutoExecuted);
    }

    #[tokio::test]
    async fn test_reported_failure_maps_to_execution_failed() {
        let mut risk = MockRiskGuard::new();
        risk.expect_check().returning(|_, _| Ok(RiskVerdict::ok()));

        let mut executor = MockTradeExecutor::new();
        executor.expect_execute().returning(|_| {
            Ok(ExecutionReceipt {
                success: false,
                error: Some("insufficient liquidity".to_string()),
            })
        });

        let outcome = router(risk, executor)
            .route(&agent(true), &evaluation(true, None))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AgentOutcome::ExecutionFailed {
                reason: "insufficient liquidity".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_executor_error_maps_to_execution_error() {
        let mut risk = MockRiskGuard::new();
        risk.expect_check().returning(|_, _| Ok(RiskVerdict::ok()));

        let mut executor = MockTradeExecutor::new();
        executor
            .expect_execute()
            .returning(|_| Err(StewardError::Execution("nonce too low".to_string())));

        let outcome = router(risk, executor)
            .route(&agent(true), &evaluation(true, None))
            .await
            .unwrap();
        match outcome {
            AgentOutcome::ExecutionError { message } => assert!(message.contains("nonce too low")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    struct SlowExecutor;

    #[async_trait]
    impl TradeExecutor for SlowExecutor {
        async fn execute(&self, _request: &ExecutionRequest) -> Result<ExecutionReceipt> {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Ok(ExecutionReceipt {
                success: true,
                error: None,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_execution_timeout_maps_to_execution_error() {
        let mut risk = MockRiskGuard::new();
        risk.expect_check().returning(|_, _| Ok(RiskVerdict::ok()));

        let router =
            ExecutionRouter::new(Arc::new(risk), Arc::new(SlowExecutor), Duration::from_secs(90));
        let outcome = router
            .route(&agent(true), &evaluation(true, None))
            .await
            .unwrap();
        match outcome {
            AgentOutcome::ExecutionError { message } => {
                assert!(message.contains("timed out after 90s"), "got: {message}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_risk_guard_transport_error_propagates() {
        let mut risk = MockRiskGuard::new();
        risk.expect_check()
            .returning(|_, _| Err(StewardError::RiskCheck("guard offline".to_string())));

        let result = router(risk, MockTradeExecutor::new())
            .route(&agent(true), &evaluation(true, None))
            .await;
        assert!(result.is_err());
    }
}
