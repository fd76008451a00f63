//! Listing submission: the single entry point into the lifecycle. Every
//! accepted draft lands in PENDING_APPROVAL with a freshly issued
//! sequential number.

use crate::commands::{helpers, template, CmdMessage, CmdResult};
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::model::{Listing, ListingDraft, ListingStatus};
use crate::store::DataStore;
use chrono::Utc;
use uuid::Uuid;

pub fn submit<S: DataStore>(
    store: &mut S,
    config: &MarketConfig,
    draft: ListingDraft,
) -> Result<CmdResult> {
    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(MarketError::Api("Price cannot be negative".to_string()));
    }

    // Retried submissions carry the same client nonce; the first accepted
    // one wins and later attempts get it back unchanged.
    if let Some(nonce) = &draft.client_nonce {
        let existing = store.list_listings()?.into_iter().find(|l| {
            l.seller_id == draft.seller_id && l.client_nonce.as_deref() == Some(nonce.as_str())
        });
        if let Some(listing) = existing {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(format!(
                "Submission already accepted as listing #{}",
                listing.listing_number
            )));
            result.affected_listings.push(listing);
            return Ok(result);
        }
    }

    let categories = store.list_categories()?;
    let category = helpers::find_category_by_slug(&categories, &draft.category_slug)
        .ok_or_else(|| MarketError::CategoryNotFound(draft.category_slug.clone()))?;

    if let Some(sub_slug) = &draft.sub_category_slug {
        let sub = helpers::find_category_by_slug(&categories, sub_slug)
            .ok_or_else(|| MarketError::CategoryNotFound(sub_slug.clone()))?;
        let chain = super::category::ancestor_chain(&categories, &sub.id)?;
        if !chain.iter().any(|c| c.id == category.id) {
            return Err(MarketError::Api(format!(
                "{} is not a subcategory of {}",
                sub.slug, category.slug
            )));
        }
    }

    let bound_slug = draft
        .sub_category_slug
        .as_deref()
        .unwrap_or(&draft.category_slug);
    template::validate(&categories, bound_slug, &draft.specifications)?;

    let listing = Listing {
        id: Uuid::new_v4(),
        listing_number: store.next_listing_number()?,
        category_slug: category.slug,
        sub_category_slug: draft.sub_category_slug,
        title: draft.title,
        description: draft.description,
        price: draft.price,
        currency: draft.currency.unwrap_or_else(|| config.currency.clone()),
        city: draft.city,
        condition: draft.condition,
        images: draft.images,
        specifications: draft.specifications,
        status: ListingStatus::PendingApproval,
        seller_id: draft.seller_id,
        client_nonce: draft.client_nonce,
        is_promoted: false,
        promotion_tier: None,
        promotion_expires_at: None,
        created_at: Utc::now(),
        deleted_at: None,
        deleted_by: None,
    };
    store.save_listing(&listing)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Listing #{} submitted for review",
        listing.listing_number
    )));
    result.affected_listings.push(listing);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Violations;
    use crate::store::memory::fixtures::{select_field, StoreFixture};
    use serde_json::json;

    fn draft(slug: &str) -> ListingDraft {
        ListingDraft {
            title: "Mountain bike".into(),
            description: "Barely used".into(),
            price: 250.0,
            currency: None,
            category_slug: slug.into(),
            sub_category_slug: None,
            city: "Skopje".into(),
            condition: Some("used".into()),
            images: Vec::new(),
            specifications: Default::default(),
            seller_id: "seller-1".into(),
            client_nonce: None,
        }
    }

    #[test]
    fn submission_enters_pending_with_a_sequential_number() {
        let fixture = StoreFixture::new().with_root("Bikes", "bikes");
        let mut store = fixture.store;
        let config = MarketConfig::default();

        let first = submit(&mut store, &config, draft("bikes")).unwrap();
        let second = submit(&mut store, &config, draft("bikes")).unwrap();

        let a = &first.affected_listings[0];
        let b = &second.affected_listings[0];
        assert_eq!(a.status, ListingStatus::PendingApproval);
        assert_eq!(a.listing_number, 1);
        assert_eq!(b.listing_number, 2);
        assert_eq!(a.currency, "EUR");
    }

    #[test]
    fn same_nonce_returns_the_original_listing() {
        let fixture = StoreFixture::new().with_root("Bikes", "bikes");
        let mut store = fixture.store;
        let config = MarketConfig::default();

        let mut d = draft("bikes");
        d.client_nonce = Some("nonce-abc".into());
        let first = submit(&mut store, &config, d.clone()).unwrap();
        let retry = submit(&mut store, &config, d).unwrap();

        assert_eq!(
            first.affected_listings[0].id,
            retry.affected_listings[0].id
        );
        assert_eq!(store.list_listings().unwrap().len(), 1);
    }

    #[test]
    fn same_nonce_from_another_seller_is_a_new_listing() {
        let fixture = StoreFixture::new().with_root("Bikes", "bikes");
        let mut store = fixture.store;
        let config = MarketConfig::default();

        let mut d = draft("bikes");
        d.client_nonce = Some("nonce-abc".into());
        submit(&mut store, &config, d.clone()).unwrap();
        d.seller_id = "seller-2".into();
        submit(&mut store, &config, d).unwrap();

        assert_eq!(store.list_listings().unwrap().len(), 2);
    }

    #[test]
    fn negative_price_is_rejected() {
        let fixture = StoreFixture::new().with_root("Bikes", "bikes");
        let mut store = fixture.store;
        let config = MarketConfig::default();

        let mut d = draft("bikes");
        d.price = -1.0;
        assert!(submit(&mut store, &config, d).is_err());
        assert!(store.list_listings().unwrap().is_empty());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut store = StoreFixture::new().store;
        let config = MarketConfig::default();
        let err = submit(&mut store, &config, draft("nowhere")).unwrap_err();
        assert!(matches!(err, MarketError::CategoryNotFound(_)));
    }

    #[test]
    fn subcategory_must_descend_from_the_category() {
        let fixture = StoreFixture::new()
            .with_root("Bikes", "bikes")
            .with_root("Cars", "cars")
            .with_child("Road", "road", "bikes");
        let mut store = fixture.store;
        let config = MarketConfig::default();

        let mut d = draft("cars");
        d.sub_category_slug = Some("road".into());
        assert!(submit(&mut store, &config, d).is_err());
    }

    #[test]
    fn invalid_specifications_block_submission_with_all_violations() {
        let fixture = StoreFixture::new()
            .with_root("Bikes", "bikes")
            .with_template("bikes", vec![select_field("frame", true, &["S", "M", "L"])]);
        let mut store = fixture.store;
        let config = MarketConfig::default();

        let mut d = draft("bikes");
        d.specifications.insert("frame".into(), json!("XXL"));
        d.specifications.insert("wheel".into(), json!(29));

        let err = submit(&mut store, &config, d).unwrap_err();
        match err {
            MarketError::Validation(Violations(found)) => assert_eq!(found.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(store.list_listings().unwrap().is_empty());
    }
}
