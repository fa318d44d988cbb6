#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;
pub use harness::TestServer;
pub use provider::MockProvider;
