mod db;
mod favorites;
mod state;

pub use db::{Database, StorageError};
pub use favorites::{FAVORITES_DATA_KEY, FAVORITES_IDS_KEY};
