//! Read-side moderation tooling: the approval queue and the recycle bin.
//! Both are computed from listing state at read time; there are no stored
//! counters to drift out of sync.

use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{Listing, ListingStatus};
use crate::store::DataStore;

/// Listings waiting for a moderator, oldest submission first.
pub fn pending<S: DataStore>(store: &S) -> Result<CmdResult> {
    let mut queue: Vec<Listing> = store
        .list_listings()?
        .into_iter()
        .filter(|l| l.status == ListingStatus::PendingApproval)
        .collect();
    queue.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Ok(CmdResult::default().with_listed_listings(queue))
}

/// The recycle bin: soft-deleted listings with their deletion metadata,
/// most recently deleted first.
pub fn deleted<S: DataStore>(store: &S) -> Result<CmdResult> {
    let mut bin: Vec<Listing> = store
        .list_listings()?
        .into_iter()
        .filter(|l| l.status == ListingStatus::SoftDeleted)
        .collect();
    bin.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at).then(a.id.cmp(&b.id)));
    Ok(CmdResult::default().with_listed_listings(bin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use chrono::{Duration, Utc};

    #[test]
    fn pending_queue_is_oldest_first() {
        let fixture = StoreFixture::new()
            .with_root("Bikes", "bikes")
            .with_pending_listing("Second", "bikes")
            .with_pending_listing("First", "bikes")
            .with_active_listing("Live", "bikes");
        let mut first = fixture.listing_by_title("First");
        let mut store = fixture.store;
        first.created_at = Utc::now() - Duration::hours(2);
        store.save_listing(&first).unwrap();

        let result = pending(&store).unwrap();
        let titles: Vec<&str> = result
            .listed_listings
            .iter()
            .map(|l| l.title.as_str())
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn recycle_bin_lists_newest_deletions_first() {
        let fixture = StoreFixture::new()
            .with_root("Bikes", "bikes")
            .with_deleted_listing("Older", "bikes", Utc::now() - Duration::days(3))
            .with_deleted_listing("Newer", "bikes", Utc::now() - Duration::days(1))
            .with_active_listing("Live", "bikes");
        let store = fixture.store;

        let result = deleted(&store).unwrap();
        let titles: Vec<&str> = result
            .listed_listings
            .iter()
            .map(|l| l.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
        assert!(result.listed_listings[0].deleted_by.is_some());
    }
}
