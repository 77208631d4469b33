pub mod events;
pub mod hosted_provider;
pub mod memory_provider;
pub mod provider;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export from provider.rs so we can do "use crate::session::*;"
pub use events::{AuthEvent, AuthEvents, AuthStateChange, AuthSubscription, Delivery};
pub use provider::*;
pub use storage::{create_storage, FileStorage, MemoryStorage, SessionStorage, StorageConfig};
