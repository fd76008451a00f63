//! Per-category dynamic attribute schemas and listing validation against
//! them. Validation is total: one pass reports every violation, so callers
//! can render all per-field messages at once.

use crate::commands::category::ancestor_chain;
use crate::commands::{helpers, CmdMessage, CmdResult};
use crate::error::{MarketError, Result, Violation, ViolationKind, Violations};
use crate::model::{Category, FieldKind, Specifications, Template, TemplateField};
use crate::store::DataStore;
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// Replace a category's template wholesale. An empty field list clears it.
pub fn set<S: DataStore>(
    store: &mut S,
    category_id: &Uuid,
    fields: Vec<TemplateField>,
) -> Result<CmdResult> {
    let mut seen = HashSet::new();
    for field in &fields {
        if !seen.insert(field.key.clone()) {
            return Err(MarketError::Api(format!(
                "Duplicate template field key: {}",
                field.key
            )));
        }
        if let FieldKind::Select { options } = &field.kind {
            if options.is_empty() {
                return Err(MarketError::Api(format!(
                    "Select field {} has no options",
                    field.key
                )));
            }
        }
    }

    let mut category = store.get_category(category_id)?;
    category.template = if fields.is_empty() {
        None
    } else {
        Some(Template { fields })
    };
    store.save_category(&category)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Template updated for category {}",
        category.slug
    )));
    result.categories.push(category);
    Ok(result)
}

/// Resolve the template that governs listings bound to `slug`: the nearest
/// category — itself or an ancestor — owning a non-empty template.
pub fn effective_template(categories: &[Category], slug: &str) -> Result<Option<Template>> {
    let category = helpers::find_category_by_slug(categories, slug)
        .ok_or_else(|| MarketError::CategoryNotFound(slug.to_string()))?;

    let chain = ancestor_chain(categories, &category.id)?;
    // chain is ordered root→target; the nearest owner wins.
    for node in chain.iter().rev() {
        if let Some(template) = &node.template {
            if !template.fields.is_empty() {
                return Ok(Some(template.clone()));
            }
        }
    }
    Ok(None)
}

/// Validate `specifications` against the template governing `slug`,
/// returning the complete violation set. No governing template means the
/// specifications must be empty.
pub fn violations(
    categories: &[Category],
    slug: &str,
    specifications: &Specifications,
) -> Result<Vec<Violation>> {
    let template = match effective_template(categories, slug)? {
        Some(t) => t,
        None => {
            return Ok(specifications
                .keys()
                .map(|key| Violation::new(key.clone(), ViolationKind::UnknownField))
                .collect());
        }
    };

    let mut found = Vec::new();

    for key in specifications.keys() {
        if template.field(key).is_none() {
            found.push(Violation::new(key.clone(), ViolationKind::UnknownField));
        }
    }

    for field in &template.fields {
        match specifications.get(&field.key) {
            None => {
                if field.required {
                    found.push(Violation::new(
                        field.key.clone(),
                        ViolationKind::MissingRequiredField,
                    ));
                }
            }
            Some(value) => {
                if let Some(kind) = check_value(field, value) {
                    found.push(Violation::new(field.key.clone(), kind));
                }
            }
        }
    }

    Ok(found)
}

pub fn validate(
    categories: &[Category],
    slug: &str,
    specifications: &Specifications,
) -> Result<()> {
    let found = violations(categories, slug, specifications)?;
    if found.is_empty() {
        Ok(())
    } else {
        Err(MarketError::Validation(Violations(found)))
    }
}

fn check_value(field: &TemplateField, value: &Value) -> Option<ViolationKind> {
    match &field.kind {
        FieldKind::Text => match value {
            Value::String(_) => None,
            _ => Some(ViolationKind::InvalidType),
        },
        // Sellers type numbers into text inputs; accept numeric strings too.
        FieldKind::Number => match value {
            Value::Number(_) => None,
            Value::String(s) if s.trim().parse::<f64>().is_ok() => None,
            _ => Some(ViolationKind::InvalidType),
        },
        FieldKind::Select { options } => match value {
            Value::String(s) if options.iter().any(|o| o == s) => None,
            Value::String(_) => Some(ViolationKind::InvalidOption),
            _ => Some(ViolationKind::InvalidType),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{
        number_field, select_field, text_field, StoreFixture,
    };
    use serde_json::json;

    fn specs(pairs: &[(&str, Value)]) -> Specifications {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn set_rejects_duplicate_keys() {
        let fixture = StoreFixture::new().with_root("Vehicles", "vehicles");
        let vehicles = fixture.category_by_slug("vehicles");
        let mut store = fixture.store;

        let err = set(
            &mut store,
            &vehicles.id,
            vec![text_field("brand", false), text_field("brand", true)],
        )
        .unwrap_err();
        assert!(matches!(err, MarketError::Api(_)));
    }

    #[test]
    fn set_rejects_select_without_options() {
        let fixture = StoreFixture::new().with_root("Vehicles", "vehicles");
        let vehicles = fixture.category_by_slug("vehicles");
        let mut store = fixture.store;

        let err = set(
            &mut store,
            &vehicles.id,
            vec![select_field("fuel", false, &[])],
        )
        .unwrap_err();
        assert!(matches!(err, MarketError::Api(_)));
    }

    #[test]
    fn validation_reports_every_violation_at_once() {
        // Size missing, color invalid, material unknown: all three must be
        // reported in one call.
        let fixture = StoreFixture::new()
            .with_root("Furniture", "furniture")
            .with_template(
                "furniture",
                vec![
                    number_field("size", true),
                    select_field("color", false, &["Red", "Blue"]),
                ],
            );
        let categories = fixture.store.list_categories().unwrap();

        let found = violations(
            &categories,
            "furniture",
            &specs(&[("color", json!("Green")), ("material", json!("X"))]),
        )
        .unwrap();

        assert_eq!(found.len(), 3);
        assert!(found.contains(&Violation::new("color", ViolationKind::InvalidOption)));
        assert!(found.contains(&Violation::new("material", ViolationKind::UnknownField)));
        assert!(found.contains(&Violation::new(
            "size",
            ViolationKind::MissingRequiredField
        )));
    }

    #[test]
    fn number_fields_accept_numeric_strings() {
        let fixture = StoreFixture::new()
            .with_root("Furniture", "furniture")
            .with_template("furniture", vec![number_field("size", true)]);
        let categories = fixture.store.list_categories().unwrap();

        assert!(validate(&categories, "furniture", &specs(&[("size", json!(42))])).is_ok());
        assert!(validate(&categories, "furniture", &specs(&[("size", json!("42.5"))])).is_ok());

        let found = violations(
            &categories,
            "furniture",
            &specs(&[("size", json!("large"))]),
        )
        .unwrap();
        assert_eq!(found, vec![Violation::new("size", ViolationKind::InvalidType)]);
    }

    #[test]
    fn template_is_inherited_from_nearest_ancestor() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_template("vehicles", vec![text_field("brand", true)])
            .with_child("Cars", "cars", "vehicles")
            .with_child("Oldtimers", "oldtimers", "cars");
        let categories = fixture.store.list_categories().unwrap();

        let template = effective_template(&categories, "oldtimers").unwrap().unwrap();
        assert_eq!(template.fields[0].key, "brand");

        // The ancestor template governs: a bare submission is missing brand.
        let found = violations(&categories, "oldtimers", &Specifications::new()).unwrap();
        assert_eq!(
            found,
            vec![Violation::new("brand", ViolationKind::MissingRequiredField)]
        );
    }

    #[test]
    fn no_template_anywhere_means_specs_must_be_empty() {
        let fixture = StoreFixture::new().with_root("Misc", "misc");
        let categories = fixture.store.list_categories().unwrap();

        assert!(validate(&categories, "misc", &Specifications::new()).is_ok());

        let found = violations(&categories, "misc", &specs(&[("anything", json!("x"))])).unwrap();
        assert_eq!(
            found,
            vec![Violation::new("anything", ViolationKind::UnknownField)]
        );
    }

    #[test]
    fn nearest_template_shadows_ancestor_template() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_template("vehicles", vec![text_field("brand", true)])
            .with_child("Boats", "boats", "vehicles")
            .with_template("boats", vec![number_field("length_m", true)]);
        let categories = fixture.store.list_categories().unwrap();

        let template = effective_template(&categories, "boats").unwrap().unwrap();
        assert_eq!(template.fields[0].key, "length_m");
    }
}
