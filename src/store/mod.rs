//! Remote collection stores.

mod collection;
mod error;

pub use collection::{CollectionStore, StoreSnapshot};
pub use error::{Operation, StoreError};
