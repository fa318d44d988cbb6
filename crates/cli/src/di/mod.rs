use parcel_api::AppState;
use parcel_application::ports::{ExternalPropertySource, FallbackProducer, PropertyCache};
use parcel_application::services::{CacheTtls, PropertyCacheService, PropertyStore, RetryPolicy};
use parcel_application::use_cases::{
    CreatePropertyUseCase, DeletePropertyUseCase, ListPropertiesUseCase,
    ResolvePropertyByAddressUseCase, ResolvePropertyByIdUseCase, UpdatePropertyUseCase,
};
use parcel_domain::config::FallbackMode;
use parcel_domain::Config;
use parcel_infrastructure::external::HttpPropertySource;
use parcel_infrastructure::fallback::BootstrapDataset;
use parcel_infrastructure::repositories::SqlitePropertyRepository;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// Wires adapters into the use cases behind the HTTP surface.
pub fn build_app_state(
    config: &Config,
    pool: SqlitePool,
    cache: Arc<dyn PropertyCache>,
) -> anyhow::Result<AppState> {
    let resolution = &config.resolution;

    let store = Arc::new(PropertyStore::new(
        Arc::new(SqlitePropertyRepository::new(pool)),
        RetryPolicy::new(resolution.store_retry_attempts, resolution.store_retry_delay()),
    ));
    let cache = Arc::new(PropertyCacheService::new(
        cache,
        CacheTtls::from(&config.cache),
    ));

    let provider = Arc::new(HttpPropertySource::new(&config.external)?);
    let external: Arc<dyn ExternalPropertySource> = provider.clone();

    let fallback: Arc<dyn FallbackProducer> = match resolution.fallback {
        FallbackMode::External => provider,
        FallbackMode::Bootstrap => {
            let dataset = match resolution.bootstrap_path.as_deref() {
                Some(path) => BootstrapDataset::from_file(path)?,
                None => BootstrapDataset::builtin()?,
            };
            Arc::new(dataset)
        }
    };
    info!(fallback = %fallback.source(), "First-sight fallback selected");

    Ok(AppState {
        resolve_by_id: Arc::new(ResolvePropertyByIdUseCase::new(
            store.clone(),
            cache.clone(),
            fallback,
        )),
        resolve_by_address: Arc::new(ResolvePropertyByAddressUseCase::new(
            store.clone(),
            cache.clone(),
            external,
            resolution.staleness_threshold(),
        )),
        list_properties: Arc::new(ListPropertiesUseCase::new(store.clone(), cache.clone())),
        create_property: Arc::new(CreatePropertyUseCase::new(store.clone(), cache.clone())),
        update_property: Arc::new(UpdatePropertyUseCase::new(store.clone(), cache.clone())),
        delete_property: Arc::new(DeletePropertyUseCase::new(store, cache)),
        request_timeout: resolution.request_timeout(),
    })
}
