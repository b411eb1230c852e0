pub mod agent;
pub mod portfolio;
pub mod signal;
pub mod summary;

pub use agent::{Agent, RiskLevel, RiskProfile, StrategyKind};
pub use portfolio::{AgentContext, Holding, PortfolioSnapshot};
pub use signal::{Evaluation, ProposedTrade, TradeAction, TradeSignal};
pub use summary::{AgentOutcome, AgentResult, CycleSummary, SchedulerStatus};
