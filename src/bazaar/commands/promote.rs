//! The promotion overlay. Promotion never changes lifecycle state; it is a
//! pair of fields whose effective value is recomputed on every read.

use crate::commands::{CmdMessage, CmdResult};
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::model::ListingStatus;
use crate::store::DataStore;
use chrono::{Duration, Utc};
use uuid::Uuid;

/// Attach a paid promotion to an ACTIVE listing. The package catalog
/// supplies the duration unless the caller overrides it. At most one live
/// promotion per listing; an expired one is silently replaced.
pub fn promote<S: DataStore>(
    store: &mut S,
    config: &MarketConfig,
    id: &Uuid,
    tier: &str,
    duration_days: Option<i64>,
) -> Result<CmdResult> {
    let mut listing = store.get_listing(id)?;

    if listing.status != ListingStatus::Active {
        return Err(MarketError::ListingNotActive(*id));
    }

    let now = Utc::now();
    if listing.is_effectively_promoted(now) {
        return Err(MarketError::AlreadyPromoted(*id));
    }

    let package = config
        .package(tier)
        .ok_or_else(|| MarketError::UnknownTier(tier.to_string()))?;
    let days = duration_days.unwrap_or(package.duration_days);
    let quote = config.quote(tier)?;

    listing.is_promoted = true;
    listing.promotion_tier = Some(package.tier.clone());
    listing.promotion_expires_at = Some(now + Duration::days(days));
    store.save_listing(&listing)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Listing #{} promoted ({}) for {} days — {:.2} {} incl. VAT",
        listing.listing_number, package.tier, days, quote.gross, quote.currency
    )));
    result.affected_listings.push(listing);
    Ok(result.with_quote(quote))
}

/// Drop a promotion early. No-op on a listing that is not promoted.
pub fn demote<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let mut listing = store.get_listing(id)?;

    let mut result = CmdResult::default();
    if !listing.is_promoted {
        result.add_message(CmdMessage::info(format!(
            "Listing #{} is not promoted",
            listing.listing_number
        )));
        return Ok(result);
    }

    listing.is_promoted = false;
    listing.promotion_tier = None;
    listing.promotion_expires_at = None;
    store.save_listing(&listing)?;

    result.add_message(CmdMessage::success(format!(
        "Promotion removed from listing #{}",
        listing.listing_number
    )));
    result.affected_listings.push(listing);
    Ok(result)
}
