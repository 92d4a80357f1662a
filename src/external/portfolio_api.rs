use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::UpstreamError;
use crate::models::{Portfolio, PredictionRow};

/// Source of portfolios and per-portfolio predictions for one user.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    async fn list_portfolios(&self, user_id: Uuid) -> Result<Vec<Portfolio>, UpstreamError>;

    async fn list_predictions(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Vec<PredictionRow>, UpstreamError>;
}

// The listing endpoint wraps each record:
// [{ "portfolio": { "portfolio_id": "...", "name": "...", ... }, ... }]
#[derive(Debug, Deserialize)]
struct PortfolioEnvelope {
    portfolio: Portfolio,
}

pub struct HttpPredictionSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPredictionSource {
    /// `timeout` applies to every data-fetch call (10 seconds in production).
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Network(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        resp.json::<T>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PredictionSource for HttpPredictionSource {
    async fn list_portfolios(&self, user_id: Uuid) -> Result<Vec<Portfolio>, UpstreamError> {
        let url = format!(
            "{}/user_portfolio/list/get_by_user_id/{}",
            self.base_url, user_id
        );
        let envelopes: Vec<PortfolioEnvelope> = self.get_json(&url).await?;
        Ok(envelopes.into_iter().map(|e| e.portfolio).collect())
    }

    async fn list_predictions(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Vec<PredictionRow>, UpstreamError> {
        let url = format!(
            "{}/stock_predictions/list/get_by_portfolio_id/{}",
            self.base_url, portfolio_id
        );
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_portfolio_envelope_ignores_unknown_fields() {
        let envelopes: Vec<PortfolioEnvelope> = serde_json::from_value(json!([
            {
                "portfolio": {
                    "portfolio_id": "f772dc7d-7b53-4bec-9929-7f9774be00ff",
                    "name": "Growth",
                    "created_at": "2024-01-01T00:00:00Z"
                },
                "owner": "someone"
            }
        ]))
        .unwrap();

        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].portfolio.name, "Growth");
    }
}
