//! # Storage Layer
//!
//! The [`DataStore`] trait abstracts persistence for categories and
//! listings so the command layer never touches the filesystem directly.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage — one JSON document per
//!   collection under the data directory, plus the listing-number counter.
//! - [`memory::InMemoryStore`]: no persistence; backs every command test.
//!
//! ## Atomicity model
//!
//! Every mutation the engine performs is a single-record read-modify-write
//! against one category or listing. The engine itself holds no locks;
//! operations that can race (purge sweep vs. manual restore) re-check the
//! record's current state immediately before mutating and treat "already
//! gone" as a no-op.

use crate::error::Result;
use crate::model::{Category, Listing};
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// Abstract interface for marketplace storage.
pub trait DataStore {
    /// Save a category (create or update)
    fn save_category(&mut self, category: &Category) -> Result<()>;

    /// Get a category by id
    fn get_category(&self, id: &Uuid) -> Result<Category>;

    /// List all categories
    fn list_categories(&self) -> Result<Vec<Category>>;

    /// Remove a category permanently
    fn remove_category(&mut self, id: &Uuid) -> Result<()>;

    /// Save a listing (create or update)
    fn save_listing(&mut self, listing: &Listing) -> Result<()>;

    /// Get a listing by id
    fn get_listing(&self, id: &Uuid) -> Result<Listing>;

    /// List all listings
    fn list_listings(&self) -> Result<Vec<Listing>>;

    /// Remove a listing permanently (the purge path)
    fn remove_listing(&mut self, id: &Uuid) -> Result<()>;

    /// Issue the next sequential listing number. Numbers are never reused.
    fn next_listing_number(&mut self) -> Result<u64>;
}
