//! Domain models: configurations, trades, derived metrics.

mod config;
mod metrics;
mod roster;
mod trade;

pub use config::{
    BotConfig, BotMode, ConfigError, EmaScalpingParams, GridParams, MacdRsiParams,
    RiskManagement, StrategyParams, StrategyType, Timeframe,
};
pub use metrics::{BotMetrics, LatestSignal, PortfolioMetrics};
pub use roster::BotRoster;
pub use trade::{TradeRecord, TradeSide};
