//! # batchsync-client
//!
//! HTTP client for the remote object store: list/upload/fetch resources and
//! create/list processing jobs. Bearer-token auth, JSON `data` envelope on
//! list endpoints, cursor pagination via `has_more`/`after`.

pub mod config;
pub mod error;
pub mod store;

pub use config::RemoteConfig;
pub use error::ClientError;
pub use store::RemoteStore;
