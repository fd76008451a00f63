use super::DataStore;
use crate::error::{MarketError, Result};
use crate::model::{Category, Listing};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    categories: HashMap<Uuid, Category>,
    listings: HashMap<Uuid, Listing>,
    next_number: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataStore for InMemoryStore {
    fn save_category(&mut self, category: &Category) -> Result<()> {
        self.categories.insert(category.id, category.clone());
        Ok(())
    }

    fn get_category(&self, id: &Uuid) -> Result<Category> {
        self.categories
            .get(id)
            .cloned()
            .ok_or_else(|| MarketError::CategoryNotFound(id.to_string()))
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.values().cloned().collect())
    }

    fn remove_category(&mut self, id: &Uuid) -> Result<()> {
        if self.categories.remove(id).is_none() {
            return Err(MarketError::CategoryNotFound(id.to_string()));
        }
        Ok(())
    }

    fn save_listing(&mut self, listing: &Listing) -> Result<()> {
        self.listings.insert(listing.id, listing.clone());
        Ok(())
    }

    fn get_listing(&self, id: &Uuid) -> Result<Listing> {
        self.listings
            .get(id)
            .cloned()
            .ok_or(MarketError::ListingNotFound(*id))
    }

    fn list_listings(&self) -> Result<Vec<Listing>> {
        Ok(self.listings.values().cloned().collect())
    }

    fn remove_listing(&mut self, id: &Uuid) -> Result<()> {
        if self.listings.remove(id).is_none() {
            return Err(MarketError::ListingNotFound(*id));
        }
        Ok(())
    }

    fn next_listing_number(&mut self) -> Result<u64> {
        self.next_number += 1;
        Ok(self.next_number)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{
        FieldKind, ListingStatus, Specifications, Template, TemplateField,
    };
    use chrono::Utc;

    /// Builder over `InMemoryStore` that seeds a small category tree and
    /// listings in various lifecycle states.
    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Root category with the given slug; returns its id through the
        /// closure-free builder style the commands tests use.
        pub fn with_root(mut self, name: &str, slug: &str) -> Self {
            let cat = Category::new(name.to_string(), slug.to_string(), None);
            self.store.save_category(&cat).unwrap();
            self
        }

        pub fn with_child(mut self, name: &str, slug: &str, parent_slug: &str) -> Self {
            let parent = self.category_by_slug(parent_slug);
            let cat = Category::new(name.to_string(), slug.to_string(), Some(parent.id));
            self.store.save_category(&cat).unwrap();
            self
        }

        pub fn with_template(mut self, slug: &str, fields: Vec<TemplateField>) -> Self {
            let mut cat = self.category_by_slug(slug);
            cat.template = Some(Template { fields });
            self.store.save_category(&cat).unwrap();
            self
        }

        pub fn with_active_listing(mut self, title: &str, slug: &str) -> Self {
            let listing = base_listing(title, slug, &mut self.store);
            self.store.save_listing(&listing).unwrap();
            self
        }

        pub fn with_pending_listing(mut self, title: &str, slug: &str) -> Self {
            let mut listing = base_listing(title, slug, &mut self.store);
            listing.status = ListingStatus::PendingApproval;
            self.store.save_listing(&listing).unwrap();
            self
        }

        pub fn with_deleted_listing(
            mut self,
            title: &str,
            slug: &str,
            deleted_at: chrono::DateTime<Utc>,
        ) -> Self {
            let mut listing = base_listing(title, slug, &mut self.store);
            listing.status = ListingStatus::SoftDeleted;
            listing.deleted_at = Some(deleted_at);
            listing.deleted_by = Some("moderator-1".to_string());
            self.store.save_listing(&listing).unwrap();
            self
        }

        pub fn category_by_slug(&self, slug: &str) -> Category {
            self.store
                .list_categories()
                .unwrap()
                .into_iter()
                .find(|c| c.slug == slug)
                .unwrap_or_else(|| panic!("fixture category {} not seeded", slug))
        }

        pub fn listing_by_title(&self, title: &str) -> Listing {
            self.store
                .list_listings()
                .unwrap()
                .into_iter()
                .find(|l| l.title == title)
                .unwrap_or_else(|| panic!("fixture listing {} not seeded", title))
        }
    }

    fn base_listing(title: &str, slug: &str, store: &mut InMemoryStore) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            listing_number: store.next_listing_number().unwrap(),
            category_slug: slug.to_string(),
            sub_category_slug: None,
            title: title.to_string(),
            description: format!("Description for {}", title),
            price: 100.0,
            currency: "EUR".to_string(),
            city: "Skopje".to_string(),
            condition: None,
            images: Vec::new(),
            specifications: Specifications::new(),
            status: ListingStatus::Active,
            seller_id: "seller-1".to_string(),
            client_nonce: None,
            is_promoted: false,
            promotion_tier: None,
            promotion_expires_at: None,
            created_at: Utc::now(),
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// Shorthand for a select field with the given options.
    pub fn select_field(key: &str, required: bool, options: &[&str]) -> TemplateField {
        TemplateField {
            key: key.to_string(),
            label: key.to_string(),
            kind: FieldKind::Select {
                options: options.iter().map(|s| s.to_string()).collect(),
            },
            required,
            placeholder: None,
        }
    }

    pub fn number_field(key: &str, required: bool) -> TemplateField {
        TemplateField {
            key: key.to_string(),
            label: key.to_string(),
            kind: FieldKind::Number,
            required,
            placeholder: None,
        }
    }

    pub fn text_field(key: &str, required: bool) -> TemplateField {
        TemplateField {
            key: key.to_string(),
            label: key.to_string(),
            kind: FieldKind::Text,
            required,
            placeholder: None,
        }
    }
}
