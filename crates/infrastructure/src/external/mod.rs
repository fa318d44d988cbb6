//! HTTP client for the external property data provider.

pub mod client;
pub mod credentials;
pub mod payload;

pub use client::HttpPropertySource;
pub use credentials::CredentialProvider;
