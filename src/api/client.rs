//! Account service client.
//!
//! The service owns persistence of configurations, the trade ledger, and
//! credential facts. Every call is a single round-trip: no retries, no
//! optimistic state. The caller identity token rides along as a bearer
//! header and is never inspected here.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use tracing::debug;

use crate::credentials;
use crate::error::{Error, Result};
use crate::models::{BotConfig, BotRoster, StrategyType, TradeRecord};

use super::types::{BotConfigDto, OrderRequest, SaveCredentialsRequest, TradeRecordDto};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the remote account service.
pub struct AccountClient {
    client: Client,
    base_url: String,
    identity: String,
}

impl AccountClient {
    /// Create a client for the given service, acting as `identity`.
    pub fn new(base_url: impl Into<String>, identity: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            identity: identity.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.identity)
    }

    /// Reject calls the service answered but refused. A 404 on an indexed
    /// operation means the index went stale after a delete.
    async fn check(response: Response, index: Option<usize>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            if let Some(index) = index {
                return Err(Error::IndexOutOfRange(index));
            }
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::Rejected(format!("{status} - {body}")))
    }

    /// Fetch the caller's configurations, in service order.
    pub async fn fetch_bot_configs(&self) -> Result<BotRoster> {
        let url = self.url("/bot-configs");
        debug!(url = %url, "Fetching bot configurations");

        let response = self.authed(self.client.get(&url)).send().await?;
        let dtos: Vec<BotConfigDto> = Self::check(response, None).await?.json().await?;

        let mut roster = BotRoster::default();
        for dto in dtos {
            roster.push(BotConfig::try_from(dto)?);
        }
        Ok(roster)
    }

    /// Append a new configuration.
    pub async fn save_bot_config(&self, config: &BotConfig) -> Result<()> {
        let url = self.url("/bot-configs");
        debug!(url = %url, strategy = %config.strategy_type(), "Saving bot configuration");

        let response = self
            .authed(self.client.post(&url))
            .json(&BotConfigDto::from(config))
            .send()
            .await?;
        Self::check(response, None).await?;
        Ok(())
    }

    /// Replace the configuration at `index` wholesale.
    pub async fn update_bot_config(&self, index: usize, config: &BotConfig) -> Result<()> {
        let url = self.url(&format!("/bot-configs/{index}"));
        debug!(url = %url, "Updating bot configuration");

        let response = self
            .authed(self.client.put(&url))
            .json(&BotConfigDto::from(config))
            .send()
            .await?;
        Self::check(response, Some(index)).await?;
        Ok(())
    }

    /// Delete the configuration at `index`. The service shifts every later
    /// configuration down by one position.
    pub async fn delete_bot_config(&self, index: usize) -> Result<()> {
        let url = self.url(&format!("/bot-configs/{index}"));
        debug!(url = %url, "Deleting bot configuration");

        let response = self.authed(self.client.delete(&url)).send().await?;
        Self::check(response, Some(index)).await?;
        Ok(())
    }

    /// Fetch the caller's trade ledger, oldest first.
    pub async fn fetch_trading_history(&self) -> Result<Vec<TradeRecord>> {
        let url = self.url("/trading-history");
        debug!(url = %url, "Fetching trading history");

        let response = self.authed(self.client.get(&url)).send().await?;
        let dtos: Vec<TradeRecordDto> = Self::check(response, None).await?.json().await?;

        Ok(dtos.into_iter().map(TradeRecord::from).collect())
    }

    /// Submit a manual order. Returns the service-assigned order id.
    pub async fn place_order(&self, request: &OrderRequest) -> Result<String> {
        let url = self.url("/orders");
        debug!(url = %url, symbol = %request.symbol, "Placing order");

        let response = self
            .authed(self.client.post(&url))
            .json(request)
            .send()
            .await?;
        let order_id = Self::check(response, None).await?.json().await?;
        Ok(order_id)
    }

    /// Current account balance in quote currency.
    pub async fn fetch_balance(&self) -> Result<Decimal> {
        let url = self.url("/balance");
        debug!(url = %url, "Fetching balance");

        let response = self.authed(self.client.get(&url)).send().await?;
        let balance = Self::check(response, None).await?.json().await?;
        Ok(balance)
    }

    /// Whether exchange credentials are on file for the caller.
    pub async fn has_api_credentials(&self) -> Result<bool> {
        let url = self.url("/credentials");
        debug!(url = %url, "Checking for stored credentials");

        let response = self.authed(self.client.get(&url)).send().await?;
        let exists = Self::check(response, None).await?.json().await?;
        Ok(exists)
    }

    /// Validate and store exchange credentials. Format violations are
    /// caught here, before anything crosses the network; the service may
    /// still reject the pair for provider-specific reasons.
    pub async fn save_api_credentials(
        &self,
        key: &str,
        secret: &str,
        enabled_bot_types: Vec<StrategyType>,
    ) -> Result<()> {
        credentials::validate(key, secret)?;

        let url = self.url("/credentials");
        debug!(url = %url, "Saving credentials");

        let request = SaveCredentialsRequest {
            api_key: key.to_string(),
            api_secret: secret.to_string(),
            enabled_bot_types,
        };
        let response = self
            .authed(self.client.put(&url))
            .json(&request)
            .send()
            .await?;
        Self::check(response, None).await?;
        Ok(())
    }

    /// Clear any stored credentials.
    pub async fn delete_api_credentials(&self) -> Result<()> {
        let url = self.url("/credentials");
        debug!(url = %url, "Deleting credentials");

        let response = self.authed(self.client.delete(&url)).send().await?;
        Self::check(response, None).await?;
        Ok(())
    }

    /// Ask the service to verify the stored credentials against the live
    /// exchange.
    pub async fn verify_api_credentials(&self) -> Result<bool> {
        let url = self.url("/credentials/verify");
        debug!(url = %url, "Verifying credentials");

        let response = self.authed(self.client.post(&url)).send().await?;
        let valid = Self::check(response, None).await?.json().await?;
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialError;

    #[tokio::test]
    async fn test_malformed_credentials_never_reach_the_wire() {
        // Unroutable base URL: if validation failed to short-circuit, the
        // call would surface Unavailable instead of the credential error.
        let client = AccountClient::new("http://127.0.0.1:0", "caller").unwrap();

        let err = client
            .save_api_credentials("bad key", &"y".repeat(32), vec![])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Credentials(CredentialError::KeyLengthOutOfRange)
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = AccountClient::new("http://localhost:8080/", "caller").unwrap();
        assert_eq!(client.url("/balance"), "http://localhost:8080/balance");
    }
}
