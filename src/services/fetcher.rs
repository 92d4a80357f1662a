use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::external::portfolio_api::PredictionSource;
use crate::models::{PortfolioTable, TaggedPrediction};
use crate::services::table_cache::TableCache;

/// Fetches and merges all of one user's prediction rows into a single flat
/// table. Upstream failures are logged and degrade to "no data for this
/// portfolio"; nothing here propagates a hard failure to the caller.
pub struct PredictionFetcher {
    source: Arc<dyn PredictionSource>,
    user_id: Uuid,
    cache: TableCache,
}

impl PredictionFetcher {
    pub fn new(source: Arc<dyn PredictionSource>, user_id: Uuid, cache_ttl: Duration) -> Self {
        Self {
            source,
            user_id,
            cache: TableCache::new(cache_ttl),
        }
    }

    /// The merged table, served from cache while fresh.
    pub async fn table(&self) -> PortfolioTable {
        if let Some(table) = self.cache.get().await {
            return table;
        }

        let table = self.fetch_all().await;
        self.cache.set(table.clone()).await;
        table
    }

    async fn fetch_all(&self) -> PortfolioTable {
        info!("Fetching portfolio and prediction data for user {}", self.user_id);

        let portfolios = match self.source.list_portfolios(self.user_id).await {
            Ok(portfolios) => portfolios,
            Err(e) => {
                warn!("Failed to list portfolios for user {}: {}", self.user_id, e);
                return PortfolioTable::default();
            }
        };

        if portfolios.is_empty() {
            warn!("No portfolios found for user {}", self.user_id);
            return PortfolioTable::default();
        }

        let mut rows = Vec::new();
        for portfolio in portfolios {
            match self.source.list_predictions(portfolio.portfolio_id).await {
                Ok(predictions) => {
                    for row in predictions {
                        rows.push(TaggedPrediction {
                            portfolio_id: portfolio.portfolio_id,
                            portfolio_name: portfolio.name.clone(),
                            row,
                        });
                    }
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch predictions for portfolio {} ({}): {}",
                        portfolio.portfolio_id, portfolio.name, e
                    );
                    continue;
                }
            }
        }

        info!("Merged prediction table has {} rows", rows.len());
        PortfolioTable::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UpstreamError;
    use crate::models::{Portfolio, PredictionRow};
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct MockSource {
        portfolios: Result<Vec<Portfolio>, UpstreamError>,
        // Predictions per portfolio id; missing ids fail with a network error.
        predictions: Vec<(Uuid, Vec<PredictionRow>)>,
    }

    fn row(purchase: f64, current: f64, quantity: f64) -> PredictionRow {
        PredictionRow {
            purchase_price: purchase,
            current_price: current,
            quantity,
            extra: BTreeMap::new(),
        }
    }

    #[async_trait]
    impl PredictionSource for MockSource {
        async fn list_portfolios(&self, _user_id: Uuid) -> Result<Vec<Portfolio>, UpstreamError> {
            match &self.portfolios {
                Ok(p) => Ok(p.clone()),
                Err(_) => Err(UpstreamError::Timeout),
            }
        }

        async fn list_predictions(
            &self,
            portfolio_id: Uuid,
        ) -> Result<Vec<PredictionRow>, UpstreamError> {
            self.predictions
                .iter()
                .find(|(id, _)| *id == portfolio_id)
                .map(|(_, rows)| rows.clone())
                .ok_or_else(|| UpstreamError::Network("connection refused".to_string()))
        }
    }

    fn fetcher(source: MockSource) -> PredictionFetcher {
        PredictionFetcher::new(Arc::new(source), Uuid::new_v4(), Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_merged_table_has_one_row_per_prediction_with_tags() {
        let growth = Uuid::new_v4();
        let income = Uuid::new_v4();
        let source = MockSource {
            portfolios: Ok(vec![
                Portfolio {
                    portfolio_id: growth,
                    name: "Growth".to_string(),
                },
                Portfolio {
                    portfolio_id: income,
                    name: "Income".to_string(),
                },
            ]),
            predictions: vec![
                (growth, vec![row(10.0, 12.0, 5.0), row(20.0, 18.0, 2.0)]),
                (income, vec![row(50.0, 55.0, 1.0)]),
            ],
        };

        let table = fetcher(source).table().await;

        assert_eq!(table.len(), 3);
        assert_eq!(
            table
                .rows()
                .iter()
                .filter(|t| t.portfolio_name == "Growth" && t.portfolio_id == growth)
                .count(),
            2
        );
        assert_eq!(table.portfolio_names(), vec!["Growth", "Income"]);
    }

    #[tokio::test]
    async fn test_failed_listing_yields_empty_table() {
        let source = MockSource {
            portfolios: Err(UpstreamError::Timeout),
            predictions: vec![],
        };

        let table = fetcher(source).table().await;
        assert!(table.is_empty());
        assert!(table.to_csv().contains("portfolio_name"));
    }

    #[tokio::test]
    async fn test_empty_portfolio_list_yields_empty_table() {
        let source = MockSource {
            portfolios: Ok(vec![]),
            predictions: vec![],
        };

        let table = fetcher(source).table().await;
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_failed_sub_fetch_skips_that_portfolio_only() {
        let good = Uuid::new_v4();
        let bad = Uuid::new_v4();
        let source = MockSource {
            portfolios: Ok(vec![
                Portfolio {
                    portfolio_id: bad,
                    name: "Broken".to_string(),
                },
                Portfolio {
                    portfolio_id: good,
                    name: "Growth".to_string(),
                },
            ]),
            predictions: vec![(good, vec![row(10.0, 12.0, 5.0)])],
        };

        let table = fetcher(source).table().await;
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].portfolio_name, "Growth");
    }
}
