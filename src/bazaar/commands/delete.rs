//! Soft deletion: listings leave public view but stay restorable for the
//! retention window.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MarketError, Result};
use crate::model::ListingStatus;
use crate::store::DataStore;
use chrono::Utc;
use uuid::Uuid;

/// Move a listing to SOFT_DELETED from any live state, recording who pulled
/// it and when. Deleting twice is an invalid transition, not a no-op, so a
/// moderator sees that someone else got there first.
pub fn soft_delete<S: DataStore>(store: &mut S, id: &Uuid, actor: &str) -> Result<CmdResult> {
    let mut listing = store.get_listing(id)?;

    if listing.status == ListingStatus::SoftDeleted {
        return Err(MarketError::InvalidTransition {
            action: "delete",
            from: listing.status,
        });
    }

    listing.status = ListingStatus::SoftDeleted;
    listing.deleted_at = Some(Utc::now());
    listing.deleted_by = Some(actor.to_string());
    store.save_listing(&listing)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Listing #{} moved to the recycle bin",
        listing.listing_number
    )));
    result.affected_listings.push(listing);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn soft_delete_records_actor_and_timestamp() {
        let fixture = StoreFixture::new()
            .with_root("Bikes", "bikes")
            .with_active_listing("Bike", "bikes");
        let id = fixture.listing_by_title("Bike").id;
        let mut store = fixture.store;

        soft_delete(&mut store, &id, "moderator-9").unwrap();

        let listing = store.get_listing(&id).unwrap();
        assert_eq!(listing.status, ListingStatus::SoftDeleted);
        assert_eq!(listing.deleted_by.as_deref(), Some("moderator-9"));
        assert!(listing.deleted_at.is_some());
    }

    #[test]
    fn pending_listings_can_be_deleted_too() {
        let fixture = StoreFixture::new()
            .with_root("Bikes", "bikes")
            .with_pending_listing("Bike", "bikes");
        let id = fixture.listing_by_title("Bike").id;
        let mut store = fixture.store;

        soft_delete(&mut store, &id, "seller-1").unwrap();
        assert_eq!(
            store.get_listing(&id).unwrap().status,
            ListingStatus::SoftDeleted
        );
    }

    #[test]
    fn double_delete_is_an_invalid_transition() {
        let fixture = StoreFixture::new()
            .with_root("Bikes", "bikes")
            .with_active_listing("Bike", "bikes");
        let id = fixture.listing_by_title("Bike").id;
        let mut store = fixture.store;

        soft_delete(&mut store, &id, "moderator-1").unwrap();
        let err = soft_delete(&mut store, &id, "moderator-2").unwrap_err();
        assert!(matches!(err, MarketError::InvalidTransition { .. }));
    }
}
