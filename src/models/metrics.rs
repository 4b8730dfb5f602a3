//! Derived performance metrics for bots and the portfolio as a whole.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::config::{BotConfig, StrategyType};
use super::trade::TradeSide;

/// The most recent bot-attributed trade, read as a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSignal {
    /// Side of the trade the signal came from
    pub side: TradeSide,
    pub timestamp: DateTime<Utc>,
}

/// Performance summary for one bot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMetrics {
    pub strategy_type: StrategyType,

    /// The configuration the metrics were derived for
    pub config: BotConfig,

    /// Whether the bot is currently in automated mode
    pub is_active: bool,

    /// Realized cashflow over the bot's trades: sells minus buys
    pub profit_loss: Decimal,

    /// `profit_loss` relative to buy-side investment, in percent;
    /// zero when the bot has no buys
    pub profit_loss_percent: Decimal,

    pub trade_count: usize,

    /// No position ledger exists, so this is always zero for now
    pub open_positions: u32,

    pub latest_signal: Option<LatestSignal>,
}

/// Ledger-wide summary across bot-attributed and manual trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    /// Realized cashflow over the entire ledger
    pub profit_loss: Decimal,

    pub trade_count: usize,

    /// Trades placed manually, outside any bot
    pub manual_trade_count: usize,
}
