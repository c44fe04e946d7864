//! BMS facade shared by the API and CLI.

use std::sync::Arc;

use buildlink_core::{BmsConfig, HttpTransport};

use crate::cache::MetadataCache;
use crate::client::BmsClient;
use crate::hierarchy::HierarchyIndex;
use crate::timeseries::TimeSeriesFetcher;

/// One client, one metadata cache, and the views built on them.
#[derive(Clone)]
pub struct BmsService {
    pub cache: Arc<MetadataCache>,
    pub index: HierarchyIndex,
    pub values: TimeSeriesFetcher,
}

impl BmsService {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &BmsConfig) -> Self {
        let client = BmsClient::new(transport, config);
        let cache = Arc::new(MetadataCache::new(Arc::new(client.clone())));
        Self {
            index: HierarchyIndex::new(cache.clone()),
            values: TimeSeriesFetcher::new(client),
            cache,
        }
    }
}
