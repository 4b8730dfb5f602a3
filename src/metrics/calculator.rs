//! Calculator turning the flat trade ledger into per-bot profitability.
//!
//! Pure transform: it never mutates its inputs and holds no state, so the
//! caller can rerun it whenever fresh data arrives from the account
//! service.

use rust_decimal::Decimal;

use crate::models::{BotConfig, BotMetrics, LatestSignal, PortfolioMetrics, TradeRecord, TradeSide};

/// Derives performance metrics from configurations and a trade ledger.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute one `BotMetrics` per configuration, in configuration order.
    ///
    /// Trades are attributed to a bot by matching `bot_type`; manual
    /// trades (no `bot_type`) belong to no bot. Two configurations with
    /// the same strategy see the same trades.
    pub fn calculate(configs: &[BotConfig], trades: &[TradeRecord]) -> Vec<BotMetrics> {
        configs
            .iter()
            .map(|config| Self::calculate_for(config, trades))
            .collect()
    }

    /// Metrics for a single configuration.
    pub fn calculate_for(config: &BotConfig, trades: &[TradeRecord]) -> BotMetrics {
        let strategy_type = config.strategy_type();

        let bot_trades: Vec<&TradeRecord> = trades
            .iter()
            .filter(|trade| trade.bot_type == Some(strategy_type))
            .collect();

        // Realized cashflow: sells add, buys subtract. A bot holding only
        // open buys reads negative until the matching sells land.
        let profit_loss: Decimal = bot_trades.iter().map(|t| t.signed_notional()).sum();

        let total_investment: Decimal = bot_trades
            .iter()
            .filter(|t| t.side == TradeSide::Buy)
            .map(|t| t.notional())
            .sum();

        let profit_loss_percent = if total_investment > Decimal::ZERO {
            profit_loss / total_investment * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        // Ledger order is authoritative here, not timestamp order.
        let latest_signal = bot_trades.last().map(|t| LatestSignal {
            side: t.side,
            timestamp: t.timestamp,
        });

        BotMetrics {
            strategy_type,
            config: config.clone(),
            is_active: config.is_automated(),
            profit_loss,
            profit_loss_percent,
            trade_count: bot_trades.len(),
            // No position ledger exists to reconcile buys into open lots.
            open_positions: 0,
            latest_signal,
        }
    }

    /// Ledger-wide cashflow summary, manual trades included.
    pub fn portfolio(trades: &[TradeRecord]) -> PortfolioMetrics {
        PortfolioMetrics {
            profit_loss: trades.iter().map(|t| t.signed_notional()).sum(),
            trade_count: trades.len(),
            manual_trade_count: trades.iter().filter(|t| t.is_manual()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StrategyType;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn trade(
        id: &str,
        bot_type: Option<StrategyType>,
        side: TradeSide,
        amount: Decimal,
        price: Decimal,
    ) -> TradeRecord {
        TradeRecord {
            trade_id: id.to_string(),
            symbol: "BTC/USDT".to_string(),
            side,
            amount,
            price,
            trade_type: "spot-market".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            bot_type,
        }
    }

    #[test]
    fn test_two_bot_scenario() {
        let configs = vec![
            BotConfig::default_for(StrategyType::Grid),
            BotConfig::default_for(StrategyType::MacdRsi),
        ];
        let trades = vec![
            trade(
                "t-1",
                Some(StrategyType::Grid),
                TradeSide::Buy,
                dec!(1),
                dec!(100),
            ),
            trade(
                "t-2",
                Some(StrategyType::Grid),
                TradeSide::Sell,
                dec!(1),
                dec!(110),
            ),
            trade(
                "t-3",
                Some(StrategyType::MacdRsi),
                TradeSide::Buy,
                dec!(2),
                dec!(50),
            ),
        ];

        let metrics = MetricsCalculator::calculate(&configs, &trades);
        assert_eq!(metrics.len(), 2);

        let grid = &metrics[0];
        assert_eq!(grid.strategy_type, StrategyType::Grid);
        assert_eq!(grid.profit_loss, dec!(10));
        assert_eq!(grid.profit_loss_percent, dec!(10));
        assert_eq!(grid.trade_count, 2);
        assert_eq!(grid.open_positions, 0);

        // Only open buys: fully negative until a sell lands.
        let macd = &metrics[1];
        assert_eq!(macd.profit_loss, dec!(-100));
        assert_eq!(macd.profit_loss_percent, dec!(-100));
        assert_eq!(macd.trade_count, 1);
    }

    #[test]
    fn test_manual_trades_are_never_attributed() {
        let configs = vec![BotConfig::default_for(StrategyType::Grid)];
        let trades = vec![
            trade("t-1", None, TradeSide::Sell, dec!(5), dec!(100)),
            trade(
                "t-2",
                Some(StrategyType::Grid),
                TradeSide::Sell,
                dec!(1),
                dec!(50),
            ),
        ];

        let metrics = MetricsCalculator::calculate(&configs, &trades);
        assert_eq!(metrics[0].trade_count, 1);
        assert_eq!(metrics[0].profit_loss, dec!(50));
    }

    #[test]
    fn test_percent_is_zero_without_buys() {
        let configs = vec![BotConfig::default_for(StrategyType::EmaScalping)];
        let trades = vec![trade(
            "t-1",
            Some(StrategyType::EmaScalping),
            TradeSide::Sell,
            dec!(1),
            dec!(200),
        )];

        let metrics = MetricsCalculator::calculate(&configs, &trades);
        assert_eq!(metrics[0].profit_loss, dec!(200));
        assert_eq!(metrics[0].profit_loss_percent, dec!(0));
    }

    #[test]
    fn test_reversed_pair_nets_to_zero() {
        let configs = vec![BotConfig::default_for(StrategyType::Grid)];
        let trades = vec![
            trade(
                "t-1",
                Some(StrategyType::Grid),
                TradeSide::Buy,
                dec!(3),
                dec!(75),
            ),
            trade(
                "t-2",
                Some(StrategyType::Grid),
                TradeSide::Sell,
                dec!(3),
                dec!(75),
            ),
        ];

        let metrics = MetricsCalculator::calculate(&configs, &trades);
        assert_eq!(metrics[0].profit_loss, dec!(0));
        assert_eq!(metrics[0].profit_loss_percent, dec!(0));
    }

    #[test]
    fn test_latest_signal_follows_ledger_order() {
        let configs = vec![BotConfig::default_for(StrategyType::Grid)];

        // The later timestamp comes first in the ledger; the signal must
        // still be taken from the last element, not the newest one.
        let mut newer = trade(
            "t-1",
            Some(StrategyType::Grid),
            TradeSide::Sell,
            dec!(1),
            dec!(100),
        );
        newer.timestamp = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let older = trade(
            "t-2",
            Some(StrategyType::Grid),
            TradeSide::Buy,
            dec!(1),
            dec!(100),
        );

        let metrics = MetricsCalculator::calculate(&configs, &[newer, older.clone()]);
        let signal = metrics[0].latest_signal.unwrap();
        assert_eq!(signal.side, TradeSide::Buy);
        assert_eq!(signal.timestamp, older.timestamp);
    }

    #[test]
    fn test_no_trades_no_signal() {
        let configs = vec![BotConfig::default_for(StrategyType::Grid)];
        let metrics = MetricsCalculator::calculate(&configs, &[]);
        assert_eq!(metrics[0].trade_count, 0);
        assert_eq!(metrics[0].profit_loss, dec!(0));
        assert!(metrics[0].latest_signal.is_none());
    }

    #[test]
    fn test_portfolio_summary() {
        let trades = vec![
            trade(
                "t-1",
                Some(StrategyType::Grid),
                TradeSide::Buy,
                dec!(1),
                dec!(100),
            ),
            trade("t-2", None, TradeSide::Sell, dec!(2), dec!(80)),
        ];

        let portfolio = MetricsCalculator::portfolio(&trades);
        assert_eq!(portfolio.profit_loss, dec!(60));
        assert_eq!(portfolio.trade_count, 2);
        assert_eq!(portfolio.manual_trade_count, 1);
    }
}
