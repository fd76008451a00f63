use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// A node in the category tree. Roots have no `parent_id`; every other node
/// points at exactly one parent. Slugs are unique across the whole tree,
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String, parent_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            parent_id,
            template: None,
            is_active: true,
            is_featured: false,
            created_at: Utc::now(),
        }
    }
}

/// The field schema a category imposes on its listings. Replaced wholesale
/// on edit; there is no field-level versioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub fields: Vec<TemplateField>,
}

impl Template {
    pub fn field(&self, key: &str) -> Option<&TemplateField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// One field descriptor. Serializes to the wire contract
/// `{ key, label, type, options?, required?, placeholder? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// The tagged value space of a template field. Validation dispatches on the
/// tag, so the open-ended per-category schema stays typed at the engine
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select { options: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    PendingApproval,
    Active,
    Rejected,
    SoftDeleted,
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ListingStatus::PendingApproval => "PENDING_APPROVAL",
            ListingStatus::Active => "ACTIVE",
            ListingStatus::Rejected => "REJECTED",
            ListingStatus::SoftDeleted => "SOFT_DELETED",
        };
        f.write_str(s)
    }
}

/// Free-form per-category attribute values, keyed by template field key.
pub type Specifications = BTreeMap<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    /// Sequential human-facing number, issued at submission, never reused.
    pub listing_number: u64,
    pub category_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category_slug: Option<String>,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub specifications: Specifications,
    pub status: ListingStatus,
    pub seller_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_nonce: Option<String>,
    pub is_promoted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
}

impl Listing {
    /// The slug of the category whose template governs this listing — the
    /// most specific category the seller selected.
    pub fn bound_slug(&self) -> &str {
        self.sub_category_slug.as_deref().unwrap_or(&self.category_slug)
    }

    /// Promotion is a declarative overlay: effective status is always
    /// recomputed from stored fields, never cached as a boolean of record.
    pub fn is_effectively_promoted(&self, now: DateTime<Utc>) -> bool {
        self.is_promoted
            && match self.promotion_expires_at {
                None => true,
                Some(expires) => expires > now,
            }
    }
}

/// What a seller supplies when submitting a listing. Everything else on
/// [`Listing`] is engine-assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub category_slug: String,
    #[serde(default)]
    pub sub_category_slug: Option<String>,
    pub city: String,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub specifications: Specifications,
    pub seller_id: String,
    #[serde(default)]
    pub client_nonce: Option<String>,
}
