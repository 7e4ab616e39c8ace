//! Client side of the Cirrus gallery.
//!
//! The centrepiece is the resource cache synchronizer: a shared
//! [`ResourceStore`] holding one collection per tag, fed by a
//! [`ResourceFetcher`] and read through [`ResourceSynchronizer`]s. Reads
//! never wait on the network, local additions show up immediately, and
//! every listing is reconciled with the server in the background.
//!
//! The [`gallery`] module carries the headless selection, dialog and viewer
//! state the gallery UI renders from.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod gallery;
pub mod store;
pub mod sync;

pub use config::ClientConfig;
pub use error::{FetchError, FetchResult};
pub use fetcher::{HttpResourceFetcher, ResourceFetcher};
pub use store::{
    EntryState, FetchTicket, InvalidationScope, ResourceStore, StoreEvent,
    SubscriptionId,
};
pub use sync::{ResourceSynchronizer, SyncOptions};
