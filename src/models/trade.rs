//! Trade ledger records.
//!
//! The ledger is append-only: records are immutable once observed and the
//! engine only ever reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::config::StrategyType;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl std::str::FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            other => Err(format!("unknown side '{other}' (expected buy or sell)")),
        }
    }
}

/// One executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// Unique within a user's ledger
    pub trade_id: String,

    /// Trading pair, e.g. "BTC/USDT"
    pub symbol: String,

    pub side: TradeSide,

    /// Base-asset quantity
    pub amount: Decimal,

    /// Quote-currency price per unit
    pub price: Decimal,

    /// Order kind the trade came from, e.g. "spot-market"
    pub trade_type: String,

    pub timestamp: DateTime<Utc>,

    /// Strategy that placed the trade; `None` means it was placed manually
    /// and is never attributed to any bot.
    pub bot_type: Option<StrategyType>,
}

impl TradeRecord {
    /// Quote-currency value of the trade.
    pub fn notional(&self) -> Decimal {
        self.amount * self.price
    }

    /// Realized cashflow: buys are outflows (negative), sells inflows
    /// (positive). Not mark-to-market; a lone buy stays negative until a
    /// matching sell lands in the ledger.
    pub fn signed_notional(&self) -> Decimal {
        match self.side {
            TradeSide::Buy => -self.notional(),
            TradeSide::Sell => self.notional(),
        }
    }

    pub fn is_manual(&self) -> bool {
        self.bot_type.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn trade(side: TradeSide, amount: Decimal, price: Decimal) -> TradeRecord {
        TradeRecord {
            trade_id: "t-1".to_string(),
            symbol: "BTC/USDT".to_string(),
            side,
            amount,
            price,
            trade_type: "spot-market".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            bot_type: Some(StrategyType::Grid),
        }
    }

    #[test]
    fn test_signed_notional() {
        assert_eq!(
            trade(TradeSide::Buy, dec!(2), dec!(50)).signed_notional(),
            dec!(-100)
        );
        assert_eq!(
            trade(TradeSide::Sell, dec!(2), dec!(50)).signed_notional(),
            dec!(100)
        );
    }

    #[test]
    fn test_matched_pair_nets_to_zero() {
        let buy = trade(TradeSide::Buy, dec!(1), dec!(100));
        let sell = trade(TradeSide::Sell, dec!(1), dec!(100));
        assert_eq!(buy.signed_notional() + sell.signed_notional(), dec!(0));
    }

    #[test]
    fn test_manual_attribution() {
        let mut t = trade(TradeSide::Buy, dec!(1), dec!(100));
        assert!(!t.is_manual());
        t.bot_type = None;
        assert!(t.is_manual());
    }
}
