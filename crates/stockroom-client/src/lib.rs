// Data access layer for stockroom: a single CRUD contract over a remote
// product API, with a local file-backed store standing in whenever the remote
// is unreachable.
pub mod config;
pub mod error;
pub mod store;

pub use config::ClientConfig;
pub use error::{StoreError, StoreResult};
pub use store::ProductStore;
pub use store::fallback::FallbackStore;
pub use store::local::LocalStore;
pub use store::remote::RemoteStore;
