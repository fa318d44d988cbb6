use parcel_domain::{DomainError, ParsedAddress, Property};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::{PropertyPage, PropertyRepository};
use crate::services::RetryPolicy;
use crate::RequestContext;

/// Record store access with the pipeline's retry policy and request context
/// applied to every call.
pub struct PropertyStore {
    repo: Arc<dyn PropertyRepository>,
    retry: RetryPolicy,
}

impl PropertyStore {
    pub fn new(repo: Arc<dyn PropertyRepository>, retry: RetryPolicy) -> Self {
        Self { repo, retry }
    }

    pub async fn find_by_id(
        &self,
        ctx: &RequestContext,
        property_id: &str,
    ) -> Result<Option<Property>, DomainError> {
        self.retry
            .run(ctx, "find_by_id", || self.repo.find_by_id(property_id))
            .await
    }

    pub async fn find_by_address(
        &self,
        ctx: &RequestContext,
        address: &ParsedAddress,
    ) -> Result<Option<Property>, DomainError> {
        self.retry
            .run(ctx, "find_by_address", || self.repo.find_by_address(address))
            .await
    }

    pub async fn find_with_pagination(
        &self,
        ctx: &RequestContext,
        offset: u64,
        limit: u64,
    ) -> Result<PropertyPage, DomainError> {
        self.retry
            .run(ctx, "find_with_pagination", || {
                self.repo.find_with_pagination(offset, limit)
            })
            .await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        property: &Property,
    ) -> Result<Property, DomainError> {
        self.retry
            .run(ctx, "create", || self.repo.create(property))
            .await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        property: &Property,
    ) -> Result<Property, DomainError> {
        self.retry
            .run(ctx, "update", || self.repo.update(property))
            .await
    }

    pub async fn delete(&self, ctx: &RequestContext, property_id: &str) -> Result<(), DomainError> {
        self.retry
            .run(ctx, "delete", || self.repo.delete(property_id))
            .await
    }

    /// Persists a freshly fetched record that had no stored counterpart when
    /// the lookup started.
    ///
    /// Re-checks by `property_id` first; if a concurrent writer got there, or
    /// the unique constraint rejects the insert, the stored record is
    /// overwritten in place instead of duplicated.
    #[instrument(skip(self, ctx, property), fields(property_id = %property.property_id))]
    pub async fn insert_or_overwrite(
        &self,
        ctx: &RequestContext,
        mut property: Property,
    ) -> Result<Property, DomainError> {
        if let Some(existing) = self.find_by_id(ctx, &property.property_id).await? {
            info!("Record appeared concurrently, overwriting in place");
            property.adopt_identity(&existing);
            return self.update(ctx, &property).await;
        }

        match self.create(ctx, &property).await {
            Ok(created) => Ok(created),
            Err(DomainError::PropertyConflict(_)) => {
                info!("Insert lost a creation race, overwriting the winner");
                let existing = self
                    .find_by_id(ctx, &property.property_id)
                    .await?
                    .ok_or_else(|| DomainError::PropertyNotFound(property.property_id.clone()))?;
                property.adopt_identity(&existing);
                self.update(ctx, &property).await
            }
            Err(e) => Err(e),
        }
    }
}
