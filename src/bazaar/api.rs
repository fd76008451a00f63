//! # API Facade
//!
//! A thin facade over the command layer: the single entry point for every
//! marketplace operation, regardless of the client driving it.
//!
//! The facade dispatches to `commands/*.rs`, normalizes inputs (slugs to
//! category ids, listing numbers to UUIDs) and returns structured
//! `Result<CmdResult>` values. It holds no business logic, does no I/O and
//! never prints; that split keeps every command testable against
//! `InMemoryStore` and leaves presentation to the binary.

use crate::commands::{self, category::CategoryPatch, search::SearchCriteria, CmdResult};
use crate::config::MarketConfig;
use crate::error::Result;
use crate::model::{ListingDraft, TemplateField};
use crate::store::DataStore;

pub use crate::commands::{CmdMessage, MessageLevel};

/// The main API facade, generic over the storage backend: `FileStore` in
/// production, `InMemoryStore` in tests.
pub struct MarketApi<S: DataStore> {
    store: S,
    config: MarketConfig,
}

impl<S: DataStore> MarketApi<S> {
    pub fn new(store: S, config: MarketConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    // --- Categories ---

    pub fn create_category(
        &mut self,
        name: String,
        slug: String,
        parent_slug: Option<&str>,
    ) -> Result<CmdResult> {
        let parent_id = match parent_slug {
            Some(slug) => Some(commands::helpers::require_category_by_slug(&self.store, slug)?.id),
            None => None,
        };
        commands::category::create(&mut self.store, name, slug, parent_id)
    }

    /// Resolve a category slug to its stable id. Clients hold slugs; the
    /// command layer works in ids.
    pub fn category_id(&self, slug: &str) -> Result<uuid::Uuid> {
        Ok(commands::helpers::require_category_by_slug(&self.store, slug)?.id)
    }

    pub fn update_category(&mut self, slug: &str, patch: CategoryPatch) -> Result<CmdResult> {
        let id = commands::helpers::require_category_by_slug(&self.store, slug)?.id;
        commands::category::update(&mut self.store, &id, patch)
    }

    pub fn delete_category(&mut self, slug: &str) -> Result<CmdResult> {
        let id = commands::helpers::require_category_by_slug(&self.store, slug)?.id;
        commands::category::delete(&mut self.store, &id)
    }

    pub fn category_roots(&self) -> Result<CmdResult> {
        commands::category::get_roots(&self.store)
    }

    pub fn category_children(&self, slug: &str) -> Result<CmdResult> {
        let id = commands::helpers::require_category_by_slug(&self.store, slug)?.id;
        commands::category::get_children(&self.store, &id)
    }

    pub fn set_template(&mut self, slug: &str, fields: Vec<TemplateField>) -> Result<CmdResult> {
        let id = commands::helpers::require_category_by_slug(&self.store, slug)?.id;
        commands::template::set(&mut self.store, &id, fields)
    }

    // --- Lifecycle ---

    pub fn submit_listing(&mut self, draft: ListingDraft) -> Result<CmdResult> {
        commands::submit::submit(&mut self.store, &self.config, draft)
    }

    pub fn approve_listing(&mut self, number: u64) -> Result<CmdResult> {
        let id = commands::helpers::listing_by_number(&self.store, number)?.id;
        commands::moderate::approve(&mut self.store, &id)
    }

    pub fn reject_listing(&mut self, number: u64) -> Result<CmdResult> {
        let id = commands::helpers::listing_by_number(&self.store, number)?.id;
        commands::moderate::reject(&mut self.store, &id)
    }

    pub fn suspend_listing(&mut self, number: u64) -> Result<CmdResult> {
        let id = commands::helpers::listing_by_number(&self.store, number)?.id;
        commands::moderate::suspend(&mut self.store, &id)
    }

    pub fn delete_listing(&mut self, number: u64, actor: &str) -> Result<CmdResult> {
        let id = commands::helpers::listing_by_number(&self.store, number)?.id;
        commands::delete::soft_delete(&mut self.store, &id, actor)
    }

    pub fn restore_listing(&mut self, number: u64) -> Result<CmdResult> {
        let id = commands::helpers::listing_by_number(&self.store, number)?.id;
        commands::restore::restore(&mut self.store, &id)
    }

    pub fn purge_listing(&mut self, number: u64, force: bool) -> Result<CmdResult> {
        let id = commands::helpers::listing_by_number(&self.store, number)?.id;
        commands::purge::purge(&mut self.store, &id, self.config.retention_days, force)
    }

    pub fn purge_expired(&mut self) -> Result<CmdResult> {
        commands::purge::purge_older_than(&mut self.store, self.config.retention_days)
    }

    // --- Promotion ---

    pub fn promote_listing(
        &mut self,
        number: u64,
        tier: &str,
        duration_days: Option<i64>,
    ) -> Result<CmdResult> {
        let id = commands::helpers::listing_by_number(&self.store, number)?.id;
        commands::promote::promote(&mut self.store, &self.config, &id, tier, duration_days)
    }

    pub fn demote_listing(&mut self, number: u64) -> Result<CmdResult> {
        let id = commands::helpers::listing_by_number(&self.store, number)?.id;
        commands::promote::demote(&mut self.store, &id)
    }

    pub fn quote(&self, tier: &str) -> Result<CmdResult> {
        let quote = self.config.quote(tier)?;
        Ok(CmdResult::default().with_quote(quote))
    }

    // --- Queries ---

    pub fn search(&self, criteria: &SearchCriteria) -> Result<CmdResult> {
        commands::search::search(&self.store, criteria)
    }

    pub fn pending_listings(&self) -> Result<CmdResult> {
        commands::admin::pending(&self.store)
    }

    pub fn deleted_listings(&self) -> Result<CmdResult> {
        commands::admin::deleted(&self.store)
    }

    pub fn export(&self, out_dir: &std::path::Path) -> Result<CmdResult> {
        commands::export::run(&self.store, out_dir)
    }

    pub fn show_config(&self) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        result.config = Some(self.config.clone());
        Ok(result)
    }
}

impl<S: DataStore> MarketApi<S> {
    /// Convenience for clients that address a listing by number but need
    /// the full record.
    pub fn listing(&self, number: u64) -> Result<CmdResult> {
        let listing = commands::helpers::listing_by_number(&self.store, number)?;
        Ok(CmdResult::default().with_listed_listings(vec![listing]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use crate::store::memory::InMemoryStore;

    fn api() -> MarketApi<InMemoryStore> {
        MarketApi::new(InMemoryStore::new(), MarketConfig::default())
    }

    #[test]
    fn create_category_resolves_parent_by_slug() {
        let mut api = api();
        api.create_category("Vehicles".into(), "vehicles".into(), None)
            .unwrap();
        api.create_category("Cars".into(), "cars".into(), Some("vehicles"))
            .unwrap();

        let children = api.category_children("vehicles").unwrap();
        assert_eq!(children.categories.len(), 1);
        assert_eq!(children.categories[0].slug, "cars");
    }

    #[test]
    fn listing_operations_address_by_number() {
        let mut api = api();
        api.create_category("Bikes".into(), "bikes".into(), None)
            .unwrap();
        let result = api
            .submit_listing(ListingDraft {
                title: "Bike".into(),
                description: String::new(),
                price: 10.0,
                category_slug: "bikes".into(),
                city: "Skopje".into(),
                seller_id: "seller-1".into(),
                ..Default::default()
            })
            .unwrap();
        let number = result.affected_listings[0].listing_number;

        api.approve_listing(number).unwrap();
        let listing = api.listing(number).unwrap().listed_listings.remove(0);
        assert_eq!(listing.status, crate::model::ListingStatus::Active);
    }

    #[test]
    fn unknown_number_is_an_api_error() {
        let mut api = api();
        assert!(matches!(
            api.approve_listing(99),
            Err(MarketError::Api(_))
        ));
    }
}
