//! Wire types for the account service API.
//!
//! The service speaks camelCase JSON with millisecond timestamps and
//! represents a configuration as a `botType` discriminator next to three
//! optional parameter blocks. Decoding converts that shape into the
//! sum-typed domain model and rejects payloads where the populated block
//! does not match the discriminator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    BotConfig, BotMode, ConfigError, EmaScalpingParams, GridParams, MacdRsiParams,
    RiskManagement, StrategyParams, StrategyType, TradeRecord, TradeSide,
};

/// Configuration record as the service stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfigDto {
    pub mode: BotMode,
    pub bot_type: StrategyType,
    pub risk_management: RiskManagement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_config: Option<GridParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_rsi_config: Option<MacdRsiParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_scalping_config: Option<EmaScalpingParams>,
}

impl TryFrom<BotConfigDto> for BotConfig {
    type Error = ConfigError;

    fn try_from(dto: BotConfigDto) -> Result<Self, Self::Error> {
        let BotConfigDto {
            mode,
            bot_type,
            risk_management,
            grid_config,
            macd_rsi_config,
            ema_scalping_config,
        } = dto;

        // Exactly the block named by the discriminator may be populated.
        let params = match (bot_type, grid_config, macd_rsi_config, ema_scalping_config) {
            (StrategyType::Grid, Some(p), None, None) => StrategyParams::Grid(p),
            (StrategyType::MacdRsi, None, Some(p), None) => StrategyParams::MacdRsi(p),
            (StrategyType::EmaScalping, None, None, Some(p)) => StrategyParams::EmaScalping(p),
            _ => return Err(ConfigError::InvalidVariant),
        };

        Ok(BotConfig {
            mode,
            risk_management,
            params,
        })
    }
}

impl From<&BotConfig> for BotConfigDto {
    fn from(config: &BotConfig) -> Self {
        let mut dto = BotConfigDto {
            mode: config.mode,
            bot_type: config.strategy_type(),
            risk_management: config.risk_management.clone(),
            grid_config: None,
            macd_rsi_config: None,
            ema_scalping_config: None,
        };

        match &config.params {
            StrategyParams::Grid(p) => dto.grid_config = Some(p.clone()),
            StrategyParams::MacdRsi(p) => dto.macd_rsi_config = Some(p.clone()),
            StrategyParams::EmaScalping(p) => dto.ema_scalping_config = Some(p.clone()),
        }

        dto
    }
}

/// Ledger entry as the service returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecordDto {
    pub trade_id: String,
    pub symbol: String,
    pub side: TradeSide,
    pub amount: Decimal,
    pub price: Decimal,
    pub trade_type: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_type: Option<StrategyType>,
}

impl From<TradeRecordDto> for TradeRecord {
    fn from(dto: TradeRecordDto) -> Self {
        TradeRecord {
            trade_id: dto.trade_id,
            symbol: dto.symbol,
            side: dto.side,
            amount: dto.amount,
            price: dto.price,
            trade_type: dto.trade_type,
            timestamp: dto.timestamp,
            bot_type: dto.bot_type,
        }
    }
}

/// Manual order submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: String,
    pub side: TradeSide,
    /// e.g. "spot-market", "futures-limit"
    pub order_type: String,
    /// Zero for market orders
    pub price: Decimal,
    pub amount: Decimal,
}

/// Credential handoff. The secret passes through; it is never stored on
/// this side of the boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCredentialsRequest {
    pub api_key: String,
    pub api_secret: String,
    pub enabled_bot_types: Vec<StrategyType>,
}
