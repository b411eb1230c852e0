//! Agent evaluation and execution scheduling.

pub mod autoloop;
pub mod controller;
pub mod portfolio;
pub mod reconcile;
pub mod router;
pub mod store;
pub mod traits;
pub mod universe;

pub use autoloop::{spawn_loop, LoopHandle};
pub use controller::{Collaborators, Scheduler};
pub use portfolio::PortfolioFetcher;
pub use reconcile::{ReconciledCapital, ReconciliationEngine};
pub use router::ExecutionRouter;
pub use store::{CooldownStore, InMemoryCooldownStore, InMemoryRunLedger, RunLedger};
pub use traits::{
    AgentDirectory, CapitalStore, DiscoveredToken, ExecutionReceipt, ExecutionRequest,
    HoldingsProvider, NativeBalanceSource, ProposalQueue, RiskGuard, RiskVerdict,
    StrategyEvaluator, TokenDiscovery, TradeExecutor,
};
pub use universe::{TokenUniverse, UniverseBuilder};
