use parcel_application::use_cases::{
    CreatePropertyUseCase, DeletePropertyUseCase, ListPropertiesUseCase,
    ResolvePropertyByAddressUseCase, ResolvePropertyByIdUseCase, UpdatePropertyUseCase,
};
use parcel_application::RequestContext;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub resolve_by_id: Arc<ResolvePropertyByIdUseCase>,
    pub resolve_by_address: Arc<ResolvePropertyByAddressUseCase>,
    pub list_properties: Arc<ListPropertiesUseCase>,
    pub create_property: Arc<CreatePropertyUseCase>,
    pub update_property: Arc<UpdatePropertyUseCase>,
    pub delete_property: Arc<DeletePropertyUseCase>,
    pub request_timeout: Duration,
}

impl AppState {
    /// Fresh context bounded by the configured per-request deadline.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout)
    }
}
