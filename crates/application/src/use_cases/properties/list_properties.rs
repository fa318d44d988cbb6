use parcel_domain::{DomainError, Property};
use std::sync::Arc;
use tracing::instrument;

use crate::services::{PropertyCacheService, PropertyStore};
use crate::RequestContext;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyListing {
    pub items: Vec<Property>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
    pub cache_hit: bool,
}

pub struct ListPropertiesUseCase {
    store: Arc<PropertyStore>,
    cache: Arc<PropertyCacheService>,
}

impl ListPropertiesUseCase {
    pub fn new(store: Arc<PropertyStore>, cache: Arc<PropertyCacheService>) -> Self {
        Self { store, cache }
    }

    /// Lists properties ordered by street. A `limit` of zero selects the
    /// default page size; larger limits are capped.
    #[instrument(skip(self, ctx))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        offset: u64,
        limit: u64,
    ) -> Result<PropertyListing, DomainError> {
        let limit = match limit {
            0 => DEFAULT_PAGE_SIZE,
            l => l.min(MAX_PAGE_SIZE),
        };

        if let Some(page) = self.cache.cached_listing(ctx, offset, limit).await? {
            return Ok(PropertyListing {
                items: page.items,
                total: page.total,
                offset,
                limit,
                cache_hit: true,
            });
        }

        let page = self.store.find_with_pagination(ctx, offset, limit).await?;
        self.cache.write_listing(offset, limit, &page).await;

        Ok(PropertyListing {
            items: page.items,
            total: page.total,
            offset,
            limit,
            cache_hit: false,
        })
    }
}
