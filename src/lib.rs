pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod scheduler;

pub use config::{AppConfig, LoggingConfig, SchedulerConfig};
pub use domain::{
    Agent, AgentContext, AgentOutcome, AgentResult, CycleSummary, Evaluation, Holding,
    PortfolioSnapshot, ProposedTrade, RiskLevel, RiskProfile, SchedulerStatus, StrategyKind,
    TradeAction, TradeSignal,
};
pub use error::{Result, StewardError};
pub use scheduler::{
    spawn_loop, AgentDirectory, CapitalStore, Collaborators, CooldownStore, DiscoveredToken,
    ExecutionReceipt, ExecutionRequest, HoldingsProvider, InMemoryCooldownStore, InMemoryRunLedger,
    LoopHandle, NativeBalanceSource, ProposalQueue, RiskGuard, RiskVerdict, RunLedger, Scheduler,
    StrategyEvaluator, TokenDiscovery, TokenUniverse, TradeExecutor, UniverseBuilder,
};
