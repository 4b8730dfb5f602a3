//! Bot configuration model: strategy variants, shared risk limits, mode.
//!
//! Strategy parameters live in a tagged sum type so a configuration can
//! never carry two populated parameter blocks at once; the strategy type
//! is derived from the populated variant rather than stored alongside it.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether the bot trades on its own or only records manual activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    Automated,
    Manual,
}

/// Strategy discriminator. Each variant has exactly one parameter shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyType {
    Grid,
    MacdRsi,
    EmaScalping,
}

impl StrategyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::Grid => "grid",
            StrategyType::MacdRsi => "macdRsi",
            StrategyType::EmaScalping => "emaScalping",
        }
    }

    /// Human-readable name for listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyType::Grid => "Grid Trading Bot",
            StrategyType::MacdRsi => "MACD + RSI Bot",
            StrategyType::EmaScalping => "EMA Scalping Bot",
        }
    }

    /// Grid bots trade spot; the indicator strategies trade futures.
    pub fn market_kind(&self) -> &'static str {
        match self {
            StrategyType::Grid => "Spot",
            StrategyType::MacdRsi | StrategyType::EmaScalping => "Futures",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(StrategyType::Grid),
            "macd-rsi" | "macdRsi" => Ok(StrategyType::MacdRsi),
            "ema-scalping" | "emaScalping" => Ok(StrategyType::EmaScalping),
            other => Err(format!(
                "unknown strategy '{other}' (expected grid, macd-rsi or ema-scalping)"
            )),
        }
    }
}

/// Candlestick timeframe the MACD+RSI strategy evaluates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
        }
    }
}

/// Risk limits shared by every strategy.
///
/// Take-profit and stop-loss are independent percentages; nothing forces
/// one above the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskManagement {
    /// Largest position the bot may hold, in quote currency
    pub max_position_size: Decimal,

    /// Close winners at this gain percentage
    pub take_profit_percent: Decimal,

    /// Close losers at this loss percentage
    pub stop_loss_percent: Decimal,

    /// Same-day loss cap in quote currency
    pub daily_loss_limit: Decimal,
}

impl Default for RiskManagement {
    fn default() -> Self {
        Self {
            max_position_size: dec!(1000),
            take_profit_percent: dec!(5),
            stop_loss_percent: dec!(2),
            daily_loss_limit: dec!(1000),
        }
    }
}

/// Grid strategy parameters: evenly spaced levels between two price bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridParams {
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    pub grid_levels: u32,
    pub investment_per_grid: Decimal,
}

impl GridParams {
    /// Reject inverted bounds and empty grids. Runs on every replacement
    /// and on wire decoding; out-of-range values are never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_levels == 0 {
            return Err(ConfigError::ZeroGridLevels);
        }
        if self.lower_bound >= self.upper_bound {
            return Err(ConfigError::BoundsOutOfOrder {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        Ok(())
    }

    /// Price distance between adjacent grid levels.
    pub fn price_step(&self) -> Decimal {
        if self.grid_levels == 0 {
            return Decimal::ZERO;
        }
        (self.upper_bound - self.lower_bound) / Decimal::from(self.grid_levels)
    }

    /// Capital committed if every level fills.
    pub fn total_investment(&self) -> Decimal {
        self.investment_per_grid * Decimal::from(self.grid_levels)
    }
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            lower_bound: dec!(40000),
            upper_bound: dec!(50000),
            grid_levels: 10,
            investment_per_grid: dec!(100),
        }
    }
}

/// MACD+RSI strategy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdRsiParams {
    pub timeframe: Timeframe,
    pub leverage: u32,
    pub position_size: Decimal,
}

impl MacdRsiParams {
    /// Notional exposure after leverage.
    pub fn effective_position(&self) -> Decimal {
        self.position_size * Decimal::from(self.leverage)
    }
}

impl Default for MacdRsiParams {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::H1,
            leverage: 5,
            position_size: dec!(100),
        }
    }
}

/// EMA scalping parameters. The 9/21 crossover periods are fixed; only the
/// exit thresholds are tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmaScalpingParams {
    pub ema9_period: u32,
    pub ema21_period: u32,
    pub stop_loss_percent: Decimal,
    pub take_profit_percent: Decimal,
}

impl Default for EmaScalpingParams {
    fn default() -> Self {
        Self {
            ema9_period: 9,
            ema21_period: 21,
            stop_loss_percent: dec!(1),
            take_profit_percent: dec!(1.5),
        }
    }
}

/// Strategy-specific parameter block, exactly one per configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategyType", content = "params", rename_all = "camelCase")]
pub enum StrategyParams {
    Grid(GridParams),
    MacdRsi(MacdRsiParams),
    EmaScalping(EmaScalpingParams),
}

impl StrategyParams {
    pub fn strategy_type(&self) -> StrategyType {
        match self {
            StrategyParams::Grid(_) => StrategyType::Grid,
            StrategyParams::MacdRsi(_) => StrategyType::MacdRsi,
            StrategyParams::EmaScalping(_) => StrategyType::EmaScalping,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StrategyParams::Grid(params) => params.validate(),
            StrategyParams::MacdRsi(_) | StrategyParams::EmaScalping(_) => Ok(()),
        }
    }

    fn default_for(strategy: StrategyType) -> Self {
        match strategy {
            StrategyType::Grid => StrategyParams::Grid(GridParams::default()),
            StrategyType::MacdRsi => StrategyParams::MacdRsi(MacdRsiParams::default()),
            StrategyType::EmaScalping => {
                StrategyParams::EmaScalping(EmaScalpingParams::default())
            }
        }
    }
}

/// Configuration update failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The replacement block's shape does not match the configuration's
    /// strategy. A caller bug, not a user input problem.
    #[error("parameter block does not match the configuration's strategy type")]
    InvalidVariant,

    #[error("grid lower bound {lower} must be below upper bound {upper}")]
    BoundsOutOfOrder { lower: Decimal, upper: Decimal },

    #[error("grid level count must be positive")]
    ZeroGridLevels,
}

/// One persisted trading-bot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    pub mode: BotMode,

    pub risk_management: RiskManagement,

    #[serde(flatten)]
    pub params: StrategyParams,
}

impl BotConfig {
    /// Default configuration for a strategy. New bots start in manual mode
    /// so they never trade before the user has reviewed their settings.
    pub fn default_for(strategy: StrategyType) -> Self {
        Self {
            mode: BotMode::Manual,
            risk_management: RiskManagement::default(),
            params: StrategyParams::default_for(strategy),
        }
    }

    pub fn strategy_type(&self) -> StrategyType {
        self.params.strategy_type()
    }

    pub fn is_automated(&self) -> bool {
        self.mode == BotMode::Automated
    }

    /// Flip between automated and manual. Involutive.
    pub fn toggle_mode(&self) -> Self {
        let mode = match self.mode {
            BotMode::Automated => BotMode::Manual,
            BotMode::Manual => BotMode::Automated,
        };
        Self {
            mode,
            ..self.clone()
        }
    }

    /// Replace the whole parameter block. The block must match this
    /// configuration's strategy; grid replacements are also range-checked.
    pub fn replace_params(&self, params: StrategyParams) -> Result<Self, ConfigError> {
        if params.strategy_type() != self.strategy_type() {
            return Err(ConfigError::InvalidVariant);
        }
        params.validate()?;

        Ok(Self {
            params,
            ..self.clone()
        })
    }

    /// Replace the risk block as a whole; individual fields are never
    /// patched in place.
    pub fn replace_risk(&self, risk_management: RiskManagement) -> Self {
        Self {
            risk_management,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shapes() {
        let grid = BotConfig::default_for(StrategyType::Grid);
        assert_eq!(grid.strategy_type(), StrategyType::Grid);
        assert!(!grid.is_automated());
        match &grid.params {
            StrategyParams::Grid(p) => {
                assert_eq!(p.lower_bound, dec!(40000));
                assert_eq!(p.upper_bound, dec!(50000));
                assert_eq!(p.grid_levels, 10);
            }
            other => panic!("unexpected params: {other:?}"),
        }

        let macd = BotConfig::default_for(StrategyType::MacdRsi);
        match &macd.params {
            StrategyParams::MacdRsi(p) => {
                assert_eq!(p.timeframe, Timeframe::H1);
                assert_eq!(p.leverage, 5);
            }
            other => panic!("unexpected params: {other:?}"),
        }

        let ema = BotConfig::default_for(StrategyType::EmaScalping);
        match &ema.params {
            StrategyParams::EmaScalping(p) => {
                assert_eq!(p.ema9_period, 9);
                assert_eq!(p.ema21_period, 21);
            }
            other => panic!("unexpected params: {other:?}"),
        }
    }

    #[test]
    fn test_toggle_mode_is_involutive() {
        let config = BotConfig::default_for(StrategyType::Grid);
        assert_eq!(config.toggle_mode().toggle_mode(), config);

        let toggled = config.toggle_mode();
        assert!(toggled.is_automated());
        assert_eq!(toggled.strategy_type(), StrategyType::Grid);
    }

    #[test]
    fn test_replace_params_matching_variant() {
        let config = BotConfig::default_for(StrategyType::Grid);
        let updated = config
            .replace_params(StrategyParams::Grid(GridParams {
                lower_bound: dec!(30000),
                upper_bound: dec!(60000),
                grid_levels: 20,
                investment_per_grid: dec!(50),
            }))
            .unwrap();

        match &updated.params {
            StrategyParams::Grid(p) => assert_eq!(p.grid_levels, 20),
            other => panic!("unexpected params: {other:?}"),
        }
        // Risk block and mode survive the replacement untouched.
        assert_eq!(updated.risk_management, config.risk_management);
        assert_eq!(updated.mode, config.mode);
    }

    #[test]
    fn test_replace_params_wrong_variant() {
        let config = BotConfig::default_for(StrategyType::Grid);
        let err = config
            .replace_params(StrategyParams::MacdRsi(MacdRsiParams::default()))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidVariant);
    }

    #[test]
    fn test_grid_bounds_must_be_ordered() {
        let config = BotConfig::default_for(StrategyType::Grid);
        let err = config
            .replace_params(StrategyParams::Grid(GridParams {
                lower_bound: dec!(50000),
                upper_bound: dec!(40000),
                grid_levels: 10,
                investment_per_grid: dec!(100),
            }))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::BoundsOutOfOrder {
                lower: dec!(50000),
                upper: dec!(40000),
            }
        );

        let err = GridParams {
            grid_levels: 0,
            ..GridParams::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ConfigError::ZeroGridLevels);
    }

    #[test]
    fn test_grid_price_step() {
        let params = GridParams::default();
        assert_eq!(params.price_step(), dec!(1000));
        assert_eq!(params.total_investment(), dec!(1000));
    }

    #[test]
    fn test_replace_risk_keeps_params() {
        let config = BotConfig::default_for(StrategyType::EmaScalping);
        let updated = config.replace_risk(RiskManagement {
            daily_loss_limit: dec!(250),
            ..RiskManagement::default()
        });
        assert_eq!(updated.risk_management.daily_loss_limit, dec!(250));
        assert_eq!(updated.params, config.params);
    }

    #[test]
    fn test_strategy_type_round_trip() {
        for strategy in [
            StrategyType::Grid,
            StrategyType::MacdRsi,
            StrategyType::EmaScalping,
        ] {
            assert_eq!(strategy.as_str().parse::<StrategyType>(), Ok(strategy));
        }
        assert!("martingale".parse::<StrategyType>().is_err());
    }
}
