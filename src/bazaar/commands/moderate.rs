//! Moderation transitions. The state machine is small and explicit; any
//! edge not listed here is an invalid transition.

use crate::commands::{template, CmdMessage, CmdResult};
use crate::error::{MarketError, Result};
use crate::model::ListingStatus;
use crate::store::DataStore;
use uuid::Uuid;

/// PENDING_APPROVAL → ACTIVE, or REJECTED → ACTIVE. A rejected listing may
/// have sat while the category template changed, so re-approval validates
/// against the template as it stands now.
pub fn approve<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let mut listing = store.get_listing(id)?;

    match listing.status {
        ListingStatus::PendingApproval => {}
        ListingStatus::Rejected => {
            let categories = store.list_categories()?;
            template::validate(&categories, listing.bound_slug(), &listing.specifications)?;
        }
        from => {
            return Err(MarketError::InvalidTransition {
                action: "approve",
                from,
            })
        }
    }

    listing.status = ListingStatus::Active;
    store.save_listing(&listing)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Listing #{} is now live",
        listing.listing_number
    )));
    result.affected_listings.push(listing);
    Ok(result)
}

/// PENDING_APPROVAL → REJECTED.
pub fn reject<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let mut listing = store.get_listing(id)?;

    if listing.status != ListingStatus::PendingApproval {
        return Err(MarketError::InvalidTransition {
            action: "reject",
            from: listing.status,
        });
    }

    listing.status = ListingStatus::Rejected;
    store.save_listing(&listing)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(format!(
        "Listing #{} rejected",
        listing.listing_number
    )));
    result.affected_listings.push(listing);
    Ok(result)
}

/// ACTIVE → REJECTED, for pulling a live listing.
pub fn suspend<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let mut listing = store.get_listing(id)?;

    if listing.status != ListingStatus::Active {
        return Err(MarketError::InvalidTransition {
            action: "suspend",
            from: listing.status,
        });
    }

    listing.status = ListingStatus::Rejected;
    store.save_listing(&listing)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(format!(
        "Listing #{} suspended",
        listing.listing_number
    )));
    result.affected_listings.push(listing);
    Ok(result)
}
