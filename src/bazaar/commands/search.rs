//! The public browse query: category subtree expansion, fixed-field
//! filters, template-driven dynamic filters, and stable sorting.

use crate::commands::{category, helpers, template, CmdResult};
use crate::error::Result;
use crate::model::{Category, FieldKind, Listing, ListingStatus};
use crate::store::DataStore;
use chrono::{Duration, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Lower bound on `created_at`. There is deliberately no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Today,
    ThreeDays,
    SevenDays,
}

impl DateRange {
    fn days(self) -> i64 {
        match self {
            DateRange::Today => 1,
            DateRange::ThreeDays => 3,
            DateRange::SevenDays => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

/// Everything a browse request can narrow by. Empty criteria list all
/// ACTIVE listings.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub city: Option<String>,
    pub condition: Option<String>,
    pub date_range: Option<DateRange>,
    /// Template-field filters: scalar value → equality, array → "any of".
    pub dynamic_filters: BTreeMap<String, Value>,
    pub listing_number: Option<u64>,
    pub query: Option<String>,
    pub sort: SortOrder,
    /// Defaults to ACTIVE only; moderation tooling widens this.
    pub include_statuses: Option<Vec<ListingStatus>>,
}

pub fn search<S: DataStore>(store: &S, criteria: &SearchCriteria) -> Result<CmdResult> {
    // Exact-number lookup bypasses every other filter except status.
    if let Some(number) = criteria.listing_number {
        let listing = helpers::listing_by_number(store, number)?;
        let listed = if status_allowed(&listing, criteria) {
            vec![listing]
        } else {
            Vec::new()
        };
        return Ok(CmdResult::default().with_listed_listings(listed));
    }

    let categories = store.list_categories()?;

    // The most specific selection governs both the subtree and which
    // dynamic filter keys are eligible.
    let selection = criteria
        .sub_category
        .as_deref()
        .or(criteria.category.as_deref());
    let subtree = selection.map(|slug| category::subtree_slugs(&categories, slug));
    let eligible = match selection {
        Some(slug) => eligible_filter_keys(&categories, slug)?,
        None => Vec::new(),
    };

    let now = Utc::now();
    let mut listings: Vec<Listing> = store
        .list_listings()?
        .into_iter()
        .filter(|l| status_allowed(l, criteria))
        .filter(|l| match &subtree {
            None => true,
            Some(slugs) => {
                slugs.contains(&l.bound_slug().to_lowercase())
                    || slugs.contains(&l.category_slug.to_lowercase())
            }
        })
        .filter(|l| criteria.price_min.map_or(true, |min| l.price >= min))
        .filter(|l| criteria.price_max.map_or(true, |max| l.price <= max))
        .filter(|l| {
            criteria
                .city
                .as_ref()
                .map_or(true, |city| l.city.eq_ignore_ascii_case(city))
        })
        .filter(|l| {
            criteria.condition.as_ref().map_or(true, |cond| {
                l.condition
                    .as_deref()
                    .map_or(false, |c| c.eq_ignore_ascii_case(cond))
            })
        })
        .filter(|l| {
            criteria
                .date_range
                .map_or(true, |r| l.created_at >= now - Duration::days(r.days()))
        })
        .filter(|l| matches_query(l, criteria.query.as_deref()))
        .filter(|l| matches_dynamic_filters(l, &criteria.dynamic_filters, &eligible))
        .collect();

    sort_listings(&mut listings, criteria.sort, now);
    Ok(CmdResult::default().with_listed_listings(listings))
}

fn status_allowed(listing: &Listing, criteria: &SearchCriteria) -> bool {
    match &criteria.include_statuses {
        Some(statuses) => statuses.contains(&listing.status),
        None => listing.status == ListingStatus::Active,
    }
}

fn matches_query(listing: &Listing, query: Option<&str>) -> bool {
    let needle = match query {
        Some(q) if !q.trim().is_empty() => q.to_lowercase(),
        _ => return true,
    };
    listing.title.to_lowercase().contains(&needle)
        || listing.description.to_lowercase().contains(&needle)
}

/// Dynamic filtering is opt-in per field: a key counts only when the
/// governing template declares it as a select with between 2 and 20
/// options. Everything else in the filter map is ignored, not an error.
fn eligible_filter_keys(categories: &[Category], slug: &str) -> Result<Vec<String>> {
    let tpl = match template::effective_template(categories, slug)? {
        Some(t) => t,
        None => return Ok(Vec::new()),
    };
    Ok(tpl
        .fields
        .iter()
        .filter(|f| match &f.kind {
            FieldKind::Select { options } => options.len() > 1 && options.len() <= 20,
            _ => false,
        })
        .map(|f| f.key.clone())
        .collect())
}

fn matches_dynamic_filters(
    listing: &Listing,
    filters: &BTreeMap<String, Value>,
    eligible: &[String],
) -> bool {
    for (key, wanted) in filters {
        if !eligible.iter().any(|k| k == key) {
            continue;
        }
        let actual = match listing.specifications.get(key) {
            Some(v) => v,
            None => return false,
        };
        let hit = match wanted {
            Value::Array(options) => options.iter().any(|o| o == actual),
            scalar => scalar == actual,
        };
        if !hit {
            return false;
        }
    }
    true
}

/// Promoted listings float to the top regardless of the requested order.
/// The requested key leads a total order over (price, created_at, title),
/// and every chain ends in an id tie-break so pagination is stable.
fn sort_listings(listings: &mut [Listing], order: SortOrder, now: chrono::DateTime<Utc>) {
    listings.sort_by(|a, b| {
        let promoted = b
            .is_effectively_promoted(now)
            .cmp(&a.is_effectively_promoted(now));
        let ordered = match order {
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
            SortOrder::Oldest => a.created_at.cmp(&b.created_at),
            SortOrder::PriceAsc => a
                .price
                .partial_cmp(&b.price)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at)),
            SortOrder::PriceDesc => b
                .price
                .partial_cmp(&a.price)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at)),
        };
        promoted
            .then(ordered)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });
}
