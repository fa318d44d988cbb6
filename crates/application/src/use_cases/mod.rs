pub mod properties;

pub use properties::{
    CreatePropertyUseCase, DeletePropertyUseCase, ListPropertiesUseCase, PropertyListing,
    ResolvePropertyByAddressUseCase, ResolvePropertyByIdUseCase, UpdatePropertyUseCase,
};
