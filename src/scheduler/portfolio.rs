//! Portfolio snapshot assembly.
//!
//! The three wallet reads run concurrently and are joined only after all
//! settle; any single failing source degrades to its zero/empty default so
//! one flaky provider never hides the others.

use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use crate::domain::{Holding, PortfolioSnapshot};

use super::traits::{HoldingsProvider, NativeBalanceSource};

pub struct PortfolioFetcher {
    native: Arc<dyn NativeBalanceSource>,
    primary: Arc<dyn HoldingsProvider>,
    secondary: Arc<dyn HoldingsProvider>,
}

impl PortfolioFetcher {
    pub fn new(
        native: Arc<dyn NativeBalanceSource>,
        primary: Arc<dyn HoldingsProvider>,
        secondary: Arc<dyn HoldingsProvider>,
    ) -> Self {
        Self {
            native,
            primary,
            secondary,
        }
    }

    /// Fetch one agent's snapshot. No wallet means an empty snapshot and
    /// no read is attempted.
    pub async fn fetch(&self, wallet: Option<&str>) -> PortfolioSnapshot {
        let Some(wallet) = wallet else {
            return PortfolioSnapshot::empty();
        };

        let (native, primary, secondary) = tokio::join!(
            self.native.native_balance(wallet),
            self.primary.holdings(wallet),
            self.secondary.holdings(wallet),
        );

        let native_balance = native.unwrap_or_else(|e| {
            warn!("Native balance read failed for {wallet}: {e}");
            Decimal::ZERO
        });
        let primary = primary.unwrap_or_else(|e| {
            warn!("Primary holdings read failed for {wallet}: {e}");
            Vec::new()
        });
        let secondary = secondary.unwrap_or_else(|e| {
            warn!("Secondary holdings read failed for {wallet}: {e}");
            Vec::new()
        });

        PortfolioSnapshot {
            native_balance,
            holdings: merge_holdings(primary, secondary),
        }
    }
}

/// Merge the two holdings sources by token address (case-insensitive).
/// The primary source wins on conflict; secondary entries are appended
/// only when their address is absent.
fn merge_holdings(primary: Vec<Holding>, secondary: Vec<Holding>) -> Vec<Holding> {
    let mut merged: Vec<Holding> = Vec::with_capacity(primary.len() + secondary.len());
    let mut seen: HashSet<String> = HashSet::new();

    for holding in primary {
        if seen.insert(holding.token_address.to_lowercase()) {
            merged.push(holding);
        }
    }
    for holding in secondary {
        if seen.insert(holding.token_address.to_lowercase()) {
            merged.push(holding);
        }
    }
    merged
}
