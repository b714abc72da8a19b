mod error;
pub use error::StoreError;

mod store;
pub use store::DocumentStore;

mod memory;
pub use memory::MemoryStore;

#[cfg(feature = "firestore")]
mod firestore;

#[cfg(feature = "firestore")]
pub use firestore::{FirestoreConfig, FirestoreStore};
