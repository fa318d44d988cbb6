mod create_property;
mod delete_property;
mod list_properties;
mod resolve_by_address;
mod resolve_by_id;
mod update_property;

pub use create_property::CreatePropertyUseCase;
pub use delete_property::DeletePropertyUseCase;
pub use list_properties::{ListPropertiesUseCase, PropertyListing};
pub use resolve_by_address::ResolvePropertyByAddressUseCase;
pub use resolve_by_id::ResolvePropertyByIdUseCase;
pub use update_property::UpdatePropertyUseCase;
