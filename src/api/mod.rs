//! Account service boundary: wire types and the HTTP client.

mod client;
mod types;

pub use client::AccountClient;
pub use types::{BotConfigDto, OrderRequest, SaveCredentialsRequest, TradeRecordDto};
