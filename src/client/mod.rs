pub mod api_client;
pub mod listing_store;

pub use api_client::*;
pub use listing_store::*;

use crate::models::StorageObject;

/// Shared view of the storage bucket, keyed by object prefix.
pub type StorageListingStore = ListingStore<String, StorageObject>;
