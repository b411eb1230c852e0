//! Process-wide scheduler state behind store interfaces.
//!
//! The cooldown registry and the run ledger are deliberately small traits
//! so tests substitute fakes and a multi-instance deployment can move them
//! out of process without touching controller logic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::domain::CycleSummary;

/// Last-evaluated timestamp per agent id.
///
/// Written only when an agent actually passes the cooldown gate, never
/// cleared; growth is bounded by the number of agents.
#[async_trait]
pub trait CooldownStore: Send + Sync {
    async fn last_evaluated(&self, agent_id: &str) -> Option<DateTime<Utc>>;
    async fn mark_evaluated(&self, agent_id: &str, at: DateTime<Utc>);
}

/// Default in-process cooldown registry.
#[derive(Debug, Default)]
pub struct InMemoryCooldownStore {
    inner: DashMap<String, DateTime<Utc>>,
}

impl InMemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CooldownStore for InMemoryCooldownStore {
    async fn last_evaluated(&self, agent_id: &str) -> Option<DateTime<Utc>> {
        self.inner.get(agent_id).map(|entry| *entry.value())
    }

    async fn mark_evaluated(&self, agent_id: &str, at: DateTime<Utc>) {
        self.inner.insert(agent_id.to_string(), at);
    }
}

/// Single-slot holder of the most recent cycle summary.
#[async_trait]
pub trait RunLedger: Send + Sync {
    /// Replace the held summary; the previous one is discarded.
    async fn publish(&self, summary: CycleSummary);
    async fn last(&self) -> Option<CycleSummary>;
}

/// Default in-process run ledger.
#[derive(Debug, Default)]
pub struct InMemoryRunLedger {
    slot: RwLock<Option<CycleSummary>>,
}

impl InMemoryRunLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunLedger for InMemoryRunLedger {
    async fn publish(&self, summary: CycleSummary) {
        *self.slot.write().await = Some(summary);
    }

    async fn last(&self) -> Option<CycleSummary> {
        self.slot.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cooldown_store_round_trip() {
        tokio_test::block_on(async {
            let store = InMemoryCooldownStore::new();
            assert!(store.last_evaluated("a").await.is_none());

            let now = Utc::now();
            store.mark_evaluated("a", now).await;
            assert_eq!(store.last_evaluated("a").await, Some(now));
            assert!(store.last_evaluated("b").await.is_none());

            let later = now + Duration::seconds(30);
            store.mark_evaluated("a", later).await;
            assert_eq!(store.last_evaluated("a").await, Some(later));
        });
    }

    #[tokio::test]
    async fn test_run_ledger_keeps_only_latest() {
        let ledger = InMemoryRunLedger::new();
        assert!(ledger.last().await.is_none());

        let first = CycleSummary::begin(Utc::now(), 60_000, 0, 0);
        let second = CycleSummary::begin(Utc::now(), 90_000, 2, 5);
        ledger.publish(first.clone()).await;
        ledger.publish(second.clone()).await;

        let held = ledger.last().await.unwrap();
        assert_eq!(held.cycle_id, second.cycle_id);
        assert_eq!(held.interval_ms, 90_000);
    }
}
