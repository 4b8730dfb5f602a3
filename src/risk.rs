//! Daily loss-limit evaluation over same-day trades.
//!
//! "Now" is an injected parameter rather than an implicit clock read, so
//! the evaluator stays a pure function of its inputs.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::TradeRecord;

/// Portfolio-wide cap applied when the user has not supplied one.
pub const DEFAULT_DAILY_LOSS_LIMIT: Decimal = dec!(1000);

/// Consumption of the daily loss limit as of the injected clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskStatus {
    /// Net realized cashflow over today's trades; negative means losses
    pub daily_profit_loss: Decimal,

    /// Loss headroom left today: the cap plus today's net cashflow,
    /// floored at zero. Only losses consume the cap.
    pub remaining_limit: Decimal,

    /// Share of the cap consumed, clamped to 0..=100
    pub limit_usage_percent: Decimal,

    pub trades_today: usize,
}

/// Evaluates same-day loss exposure against a configured cap.
pub struct RiskEvaluator;

impl RiskEvaluator {
    /// Compute the day's loss-limit status.
    ///
    /// A trade counts as "today" when its timestamp is at or after
    /// midnight of `now`'s calendar day.
    pub fn evaluate(
        trades: &[TradeRecord],
        daily_loss_limit: Decimal,
        now: DateTime<Utc>,
    ) -> RiskStatus {
        let today_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();

        let today_trades: Vec<&TradeRecord> = trades
            .iter()
            .filter(|trade| trade.timestamp >= today_start)
            .collect();

        let daily_profit_loss: Decimal =
            today_trades.iter().map(|t| t.signed_notional()).sum();

        let remaining_limit = (daily_loss_limit + daily_profit_loss).max(Decimal::ZERO);

        let limit_usage_percent = if daily_loss_limit > Decimal::ZERO {
            ((daily_loss_limit - remaining_limit) / daily_loss_limit * Decimal::ONE_HUNDRED)
                .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        } else if daily_profit_loss < Decimal::ZERO {
            // A zero cap is exhausted by the first loss.
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        RiskStatus {
            daily_profit_loss,
            remaining_limit,
            limit_usage_percent,
            trades_today: today_trades.len(),
        }
    }
}
