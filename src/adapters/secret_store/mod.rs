//! Secret store adapters
//!
//! Trait-based abstraction over the platform's per-account blob storage, with an
//! in-memory backend and a JSON file backend.

pub mod factory;
pub mod file;
pub mod memory;
pub mod traits;

pub use factory::create_secret_store;
pub use file::FileSecretStore;
pub use memory::InMemorySecretStore;
pub use traits::{SecretStore, StoreResult};
