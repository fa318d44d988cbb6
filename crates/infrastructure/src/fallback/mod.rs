pub mod bootstrap;

pub use bootstrap::BootstrapDataset;
