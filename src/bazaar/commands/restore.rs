//! Restoring soft-deleted listings out of the recycle bin.

use crate::commands::{helpers, CmdMessage, CmdResult};
use crate::error::{MarketError, Result};
use crate::model::ListingStatus;
use crate::store::DataStore;
use uuid::Uuid;

/// SOFT_DELETED → ACTIVE, clearing the deletion metadata. A listing that a
/// competing purge already removed is a benign no-op; a listing that is not
/// deleted is an invalid transition.
pub fn restore<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let mut listing = match helpers::try_get_listing(store, id)? {
        Some(listing) => listing,
        None => {
            result.add_message(CmdMessage::info(
                "Listing is already gone; nothing to restore",
            ));
            return Ok(result);
        }
    };

    if listing.status != ListingStatus::SoftDeleted {
        return Err(MarketError::InvalidTransition {
            action: "restore",
            from: listing.status,
        });
    }

    listing.status = ListingStatus::Active;
    listing.deleted_at = None;
    listing.deleted_by = None;
    store.save_listing(&listing)?;

    result.add_message(CmdMessage::success(format!(
        "Listing #{} restored",
        listing.listing_number
    )));
    result.affected_listings.push(listing);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use chrono::Utc;

    #[test]
    fn restore_clears_deletion_metadata() {
        let fixture = StoreFixture::new()
            .with_root("Bikes", "bikes")
            .with_deleted_listing("Bike", "bikes", Utc::now());
        let id = fixture.listing_by_title("Bike").id;
        let mut store = fixture.store;

        restore(&mut store, &id).unwrap();

        let listing = store.get_listing(&id).unwrap();
        assert_eq!(listing.status, ListingStatus::Active);
        assert!(listing.deleted_at.is_none());
        assert!(listing.deleted_by.is_none());
    }

    #[test]
    fn restore_of_a_purged_listing_is_a_no_op() {
        let mut store = StoreFixture::new().store;
        let result = restore(&mut store, &Uuid::new_v4()).unwrap();
        assert!(result.affected_listings.is_empty());
    }

    #[test]
    fn restore_of_a_live_listing_is_an_invalid_transition() {
        let fixture = StoreFixture::new()
            .with_root("Bikes", "bikes")
            .with_active_listing("Bike", "bikes");
        let id = fixture.listing_by_title("Bike").id;
        let mut store = fixture.store;

        let err = restore(&mut store, &id).unwrap_err();
        assert!(matches!(err, MarketError::InvalidTransition { .. }));
    }
}
