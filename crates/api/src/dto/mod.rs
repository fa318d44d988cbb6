pub mod property;

pub use property::{
    AddressRequest, ListQuery, PropertyListResponse, PropertyRequest, ResolutionResponse,
    SearchQuery,
};
