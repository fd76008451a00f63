use crate::error::{MarketError, Result};
use crate::model::{Category, Listing};
use crate::store::DataStore;
use uuid::Uuid;

/// Fetch a listing, mapping "not found" to `None` instead of an error.
/// The restore/purge paths use this to treat already-gone records as
/// benign no-ops.
pub fn try_get_listing<S: DataStore>(store: &S, id: &Uuid) -> Result<Option<Listing>> {
    match store.get_listing(id) {
        Ok(listing) => Ok(Some(listing)),
        Err(MarketError::ListingNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn find_category_by_slug(categories: &[Category], slug: &str) -> Option<Category> {
    categories
        .iter()
        .find(|c| c.slug.eq_ignore_ascii_case(slug))
        .cloned()
}

pub fn require_category_by_slug<S: DataStore>(store: &S, slug: &str) -> Result<Category> {
    let categories = store.list_categories()?;
    find_category_by_slug(&categories, slug)
        .ok_or_else(|| MarketError::CategoryNotFound(slug.to_string()))
}

/// Resolve a listing by its human-facing sequential number.
pub fn listing_by_number<S: DataStore>(store: &S, number: u64) -> Result<Listing> {
    store
        .list_listings()?
        .into_iter()
        .find(|l| l.listing_number == number)
        .ok_or_else(|| MarketError::Api(format!("No listing with number {}", number)))
}
