//! Capital reconciliation against observed on-chain value.
//!
//! Direct transfers, gas costs, and external interactions drift the ledger
//! from ground truth; correcting it here keeps risk math and reporting
//! honest without every capital-affecting path having to update the store.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{Agent, PortfolioSnapshot};

use super::traits::CapitalStore;

/// The capital figure to use for the rest of one agent's evaluation.
#[derive(Debug, Clone)]
pub struct ReconciledCapital {
    pub capital: Decimal,
    pub drift: Decimal,
    pub corrected: bool,
}

pub struct ReconciliationEngine {
    store: Arc<dyn CapitalStore>,
    threshold: Decimal,
}

impl ReconciliationEngine {
    pub fn new(store: Arc<dyn CapitalStore>, threshold: Decimal) -> Self {
        Self { store, threshold }
    }

    /// Compare persisted capital with the snapshot's on-chain total and
    /// persist the corrected value when drift exceeds the threshold.
    ///
    /// Never fails: a failed read falls back to the directory's cached
    /// value, and a failed correction write keeps the old value for this
    /// cycle.
    pub async fn reconcile(&self, agent: &Agent, snapshot: &PortfolioSnapshot) -> ReconciledCapital {
        let persisted = match self.store.read_capital(&agent.id).await {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Capital read failed for agent {}, using cached value: {e}",
                    agent.id
                );
                agent.capital
            }
        };

        let on_chain = snapshot.total_value();
        let drift = (on_chain - persisted).abs();

        if drift <= self.threshold {
            debug!(
                "Agent {} capital within threshold (drift {drift}), keeping {persisted}",
                agent.id
            );
            return ReconciledCapital {
                capital: persisted,
                drift,
                corrected: false,
            };
        }

        match self.store.write_capital(&agent.id, on_chain).await {
            Ok(()) => {
                info!(
                    "Agent {} capital corrected: {persisted} -> {on_chain} (drift {drift})",
                    agent.id
                );
                ReconciledCapital {
                    capital: on_chain,
                    drift,
                    corrected: true,
                }
            }
            Err(e) => {
                warn!(
                    "Capital correction write failed for agent {}, keeping {persisted}: {e}",
                    agent.id
                );
                ReconciledCapital {
                    capital: persisted,
                    drift,
                    corrected: false,
                }
            }
        }
    }
}
