use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::info;

use crate::models::PortfolioTable;

#[derive(Debug, Clone)]
struct CachedTable {
    table: PortfolioTable,
    fetched_at: Instant,
}

/// Single-entry cache for the merged prediction table, with an explicit
/// timestamp and an expiry check on every access. There is no write-path
/// invalidation because there are no writes; the table only refreshes when
/// the TTL lapses or the process restarts.
pub struct TableCache {
    entry: RwLock<Option<CachedTable>>,
    ttl: Duration,
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    pub async fn get(&self) -> Option<PortfolioTable> {
        let entry = self.entry.read().await;
        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                info!("Portfolio table cache hit ({} rows)", cached.table.len());
                return Some(cached.table.clone());
            }
        }
        None
    }

    pub async fn set(&self, table: PortfolioTable) {
        let mut entry = self.entry.write().await;
        info!("Caching portfolio table ({} rows)", table.len());
        *entry = Some(CachedTable {
            table,
            fetched_at: Instant::now(),
        });
    }
}
