//! Permanent removal of soft-deleted listings, single and batched. Purge is
//! the only operation that physically deletes records.

use crate::commands::{helpers, CmdMessage, CmdResult};
use crate::error::{MarketError, Result};
use crate::model::{Listing, ListingStatus};
use crate::store::DataStore;
use chrono::{Duration, Utc};
use uuid::Uuid;

/// Permanently remove one listing from the recycle bin. Requires the
/// retention window to have elapsed unless `force` (administrative
/// override). A listing a competing operation already removed or restored
/// is a benign no-op.
pub fn purge<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    retention_days: i64,
    force: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let listing = match helpers::try_get_listing(store, id)? {
        Some(listing) => listing,
        None => {
            result.add_message(CmdMessage::info("Listing is already gone; nothing to purge"));
            return Ok(result);
        }
    };

    if listing.status != ListingStatus::SoftDeleted {
        result.add_message(CmdMessage::info(format!(
            "Listing #{} is no longer in the recycle bin; nothing to purge",
            listing.listing_number
        )));
        return Ok(result);
    }

    if !force && !window_elapsed(&listing, retention_days) {
        return Err(MarketError::RetentionWindowNotElapsed(*id));
    }

    store.remove_listing(id)?;

    result.add_message(CmdMessage::success(format!(
        "Listing #{} permanently removed",
        listing.listing_number
    )));
    result.affected_listings.push(listing);
    Ok(result)
}

/// Sweep the recycle bin, removing every SOFT_DELETED listing whose
/// deletion is older than `days`. Each candidate is re-read immediately
/// before removal so a concurrent restore wins.
pub fn purge_older_than<S: DataStore>(store: &mut S, days: i64) -> Result<CmdResult> {
    let candidates: Vec<Uuid> = store
        .list_listings()?
        .iter()
        .filter(|l| l.status == ListingStatus::SoftDeleted && window_elapsed(l, days))
        .map(|l| l.id)
        .collect();

    let mut result = CmdResult::default();
    for id in candidates {
        let current = match helpers::try_get_listing(store, &id)? {
            Some(listing) => listing,
            None => continue,
        };
        if current.status != ListingStatus::SoftDeleted || !window_elapsed(&current, days) {
            continue;
        }
        store.remove_listing(&id)?;
        result.affected_listings.push(current);
    }

    result.add_message(CmdMessage::success(format!(
        "Purged {} listing(s) from the recycle bin",
        result.affected_listings.len()
    )));
    Ok(result)
}

fn window_elapsed(listing: &Listing, days: i64) -> bool {
    match listing.deleted_at {
        Some(deleted_at) => Utc::now() - deleted_at >= Duration::days(days),
        // No timestamp to measure from; treat as eligible rather than
        // keeping the record forever.
        None => true,
    }
}
