//! Category tree management: flat records with `parent_id` pointers,
//! ancestor/descendant resolution as bounded iterative walks.

use crate::commands::{helpers, CmdMessage, CmdResult};
use crate::error::{MarketError, Result};
use crate::model::Category;
use crate::store::DataStore;
use std::collections::HashSet;
use uuid::Uuid;

/// Maximum nesting: root → subcategory → sub-subcategory.
pub const MAX_DEPTH: usize = 3;

/// Fields an update may change. `None` leaves the stored value untouched;
/// `parent_id` uses a double Option so "make this a root" is expressible.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

pub fn create<S: DataStore>(
    store: &mut S,
    name: String,
    slug: String,
    parent_id: Option<Uuid>,
) -> Result<CmdResult> {
    let categories = store.list_categories()?;

    check_slug_free(&categories, &slug, None)?;
    if let Some(parent) = parent_id {
        let chain = ancestor_chain(&categories, &parent)?;
        if chain.len() >= MAX_DEPTH {
            return Err(MarketError::CategoryTooDeep { max: MAX_DEPTH });
        }
    }

    let category = Category::new(name, slug, parent_id);
    store.save_category(&category)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Category created: {} ({})",
        category.name, category.slug
    )));
    result.categories.push(category);
    Ok(result)
}

pub fn update<S: DataStore>(store: &mut S, id: &Uuid, patch: CategoryPatch) -> Result<CmdResult> {
    let categories = store.list_categories()?;
    let mut category = store.get_category(id)?;
    let old_slug = category.slug.clone();

    if let Some(slug) = &patch.slug {
        check_slug_free(&categories, slug, Some(id))?;
    }
    if let Some(new_parent) = patch.parent_id {
        check_reparent(&categories, id, new_parent)?;
    }

    if let Some(name) = patch.name {
        category.name = name;
    }
    if let Some(slug) = patch.slug {
        category.slug = slug;
    }
    if let Some(parent_id) = patch.parent_id {
        category.parent_id = parent_id;
    }
    if let Some(is_active) = patch.is_active {
        category.is_active = is_active;
    }
    if let Some(is_featured) = patch.is_featured {
        category.is_featured = is_featured;
    }

    store.save_category(&category)?;

    // Listings bind to the category by slug; a rename must follow them or
    // they fall out of category search and re-approval validation.
    if !category.slug.eq_ignore_ascii_case(&old_slug) {
        for mut listing in store.list_listings()? {
            let mut touched = false;
            if listing.category_slug.eq_ignore_ascii_case(&old_slug) {
                listing.category_slug = category.slug.clone();
                touched = true;
            }
            let sub_matches = listing
                .sub_category_slug
                .as_deref()
                .map_or(false, |s| s.eq_ignore_ascii_case(&old_slug));
            if sub_matches {
                listing.sub_category_slug = Some(category.slug.clone());
                touched = true;
            }
            if touched {
                store.save_listing(&listing)?;
            }
        }
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Category updated: {}",
        category.slug
    )));
    result.categories.push(category);
    Ok(result)
}

/// Hard error on a non-empty category; callers must reparent children and
/// relocate listings first.
pub fn delete<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let category = store.get_category(id)?;
    let categories = store.list_categories()?;

    let has_children = categories.iter().any(|c| c.parent_id == Some(*id));
    let has_listings = store
        .list_listings()?
        .iter()
        .any(|l| l.bound_slug().eq_ignore_ascii_case(&category.slug));
    if has_children || has_listings {
        return Err(MarketError::CategoryNotEmpty(category.slug));
    }

    store.remove_category(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Category removed: {}",
        category.slug
    )));
    Ok(result)
}

pub fn get_roots<S: DataStore>(store: &S) -> Result<CmdResult> {
    let mut roots: Vec<Category> = store
        .list_categories()?
        .into_iter()
        .filter(|c| c.parent_id.is_none())
        .collect();
    roots.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(CmdResult::default().with_categories(roots))
}

pub fn get_children<S: DataStore>(store: &S, id: &Uuid) -> Result<CmdResult> {
    store.get_category(id)?;
    let mut children: Vec<Category> = store
        .list_categories()?
        .into_iter()
        .filter(|c| c.parent_id == Some(*id))
        .collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(CmdResult::default().with_categories(children))
}

/// Walk `parent_id` pointers iteratively until a root, returning the chain
/// ordered root→target. A revisited id means the stored tree is corrupt;
/// that surfaces as `CATEGORY_CYCLE` rather than looping forever.
pub fn ancestor_chain(categories: &[Category], id: &Uuid) -> Result<Vec<Category>> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = *id;

    loop {
        if !seen.insert(current) {
            return Err(MarketError::CategoryCycle(current));
        }
        let node = categories
            .iter()
            .find(|c| c.id == current)
            .ok_or_else(|| MarketError::CategoryNotFound(current.to_string()))?;
        chain.push(node.clone());
        match node.parent_id {
            Some(parent) => current = parent,
            None => break,
        }
    }

    chain.reverse();
    Ok(chain)
}

/// Collect the slugs of a category and all of its descendants, lowercased.
/// Iterative frontier expansion, no recursion.
pub fn subtree_slugs(categories: &[Category], root_slug: &str) -> HashSet<String> {
    let mut slugs = HashSet::new();
    let root = match helpers::find_category_by_slug(categories, root_slug) {
        Some(c) => c,
        None => return slugs,
    };

    let mut frontier = vec![root.id];
    slugs.insert(root.slug.to_lowercase());
    while let Some(id) = frontier.pop() {
        for child in categories.iter().filter(|c| c.parent_id == Some(id)) {
            if slugs.insert(child.slug.to_lowercase()) {
                frontier.push(child.id);
            }
        }
    }
    slugs
}

fn check_slug_free(categories: &[Category], slug: &str, own_id: Option<&Uuid>) -> Result<()> {
    let taken = categories
        .iter()
        .any(|c| c.slug.eq_ignore_ascii_case(slug) && own_id != Some(&c.id));
    if taken {
        return Err(MarketError::CategorySlugTaken(slug.to_string()));
    }
    Ok(())
}

/// Reparenting guard: the new parent must exist, its ancestor chain must not
/// pass through the node being moved, and the whole moved subtree must still
/// fit inside the depth limit (not just the moved node itself).
fn check_reparent(
    categories: &[Category],
    id: &Uuid,
    new_parent: Option<Uuid>,
) -> Result<()> {
    let parent = match new_parent {
        Some(p) => p,
        None => return Ok(()),
    };
    if parent == *id {
        return Err(MarketError::CategoryCycle(*id));
    }

    let chain = ancestor_chain(categories, &parent)?;
    if chain.iter().any(|c| c.id == *id) {
        return Err(MarketError::CategoryCycle(*id));
    }
    if chain.len() + subtree_height(categories, id) > MAX_DEPTH {
        return Err(MarketError::CategoryTooDeep { max: MAX_DEPTH });
    }
    Ok(())
}

/// Height of the subtree rooted at `id`, counting the root itself. The
/// deepest descendant lands at `parent depth + height` after a reparent.
fn subtree_height(categories: &[Category], id: &Uuid) -> usize {
    let mut height = 1;
    let mut seen = HashSet::new();
    let mut frontier = vec![(*id, 1)];
    while let Some((node, depth)) = frontier.pop() {
        if !seen.insert(node) {
            continue;
        }
        height = height.max(depth);
        for child in categories.iter().filter(|c| c.parent_id == Some(node)) {
            frontier.push((child.id, depth + 1));
        }
    }
    height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn create_rejects_slug_collision_case_insensitively() {
        let mut store = InMemoryStore::new();
        create(&mut store, "Vehicles".into(), "vehicles".into(), None).unwrap();
        let err = create(&mut store, "Other".into(), "VEHICLES".into(), None).unwrap_err();
        assert!(matches!(err, MarketError::CategorySlugTaken(_)));
    }

    #[test]
    fn create_rejects_missing_parent() {
        let mut store = InMemoryStore::new();
        let err = create(
            &mut store,
            "Cars".into(),
            "cars".into(),
            Some(Uuid::new_v4()),
        )
        .unwrap_err();
        assert!(matches!(err, MarketError::CategoryNotFound(_)));
    }

    #[test]
    fn depth_is_limited_to_three_levels() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_child("Cars", "cars", "vehicles")
            .with_child("Oldtimers", "oldtimers", "cars");
        let oldtimers = fixture.category_by_slug("oldtimers");
        let mut store = fixture.store;

        let err = create(
            &mut store,
            "Too deep".into(),
            "too-deep".into(),
            Some(oldtimers.id),
        )
        .unwrap_err();
        assert!(matches!(err, MarketError::CategoryTooDeep { .. }));
    }

    #[test]
    fn ancestor_chain_runs_root_to_target() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_child("Cars", "cars", "vehicles")
            .with_child("Oldtimers", "oldtimers", "cars");

        let categories = fixture.store.list_categories().unwrap();
        let target = fixture.category_by_slug("oldtimers");
        let chain = ancestor_chain(&categories, &target.id).unwrap();

        let slugs: Vec<&str> = chain.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["vehicles", "cars", "oldtimers"]);
    }

    #[test]
    fn reparenting_under_own_descendant_fails() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_child("Cars", "cars", "vehicles");
        let vehicles = fixture.category_by_slug("vehicles");
        let cars = fixture.category_by_slug("cars");
        let mut store = fixture.store;

        let patch = CategoryPatch {
            parent_id: Some(Some(cars.id)),
            ..Default::default()
        };
        let err = update(&mut store, &vehicles.id, patch).unwrap_err();
        assert!(matches!(err, MarketError::CategoryCycle(_)));
    }

    #[test]
    fn reparenting_under_itself_fails() {
        let fixture = StoreFixture::new().with_root("Vehicles", "vehicles");
        let vehicles = fixture.category_by_slug("vehicles");
        let mut store = fixture.store;

        let patch = CategoryPatch {
            parent_id: Some(Some(vehicles.id)),
            ..Default::default()
        };
        let err = update(&mut store, &vehicles.id, patch).unwrap_err();
        assert!(matches!(err, MarketError::CategoryCycle(_)));
    }

    #[test]
    fn reparenting_counts_the_moved_subtree_against_the_depth_limit() {
        let fixture = StoreFixture::new()
            .with_root("Garage", "garage")
            .with_child("Spot", "spot", "garage")
            .with_root("Vehicles", "vehicles")
            .with_child("Cars", "cars", "vehicles")
            .with_child("Oldtimers", "oldtimers", "cars");
        let garage = fixture.category_by_slug("garage");
        let spot = fixture.category_by_slug("spot");
        let cars = fixture.category_by_slug("cars");
        let oldtimers = fixture.category_by_slug("oldtimers");
        let mut store = fixture.store;

        // cars carries a child; under the depth-2 spot its grandchildren
        // would land at depth 4.
        let patch = CategoryPatch {
            parent_id: Some(Some(spot.id)),
            ..Default::default()
        };
        let err = update(&mut store, &cars.id, patch).unwrap_err();
        assert!(matches!(err, MarketError::CategoryTooDeep { .. }));

        // Under a root the same subtree fits exactly.
        let patch = CategoryPatch {
            parent_id: Some(Some(garage.id)),
            ..Default::default()
        };
        update(&mut store, &cars.id, patch).unwrap();

        let categories = store.list_categories().unwrap();
        let chain = ancestor_chain(&categories, &oldtimers.id).unwrap();
        assert_eq!(chain.len(), MAX_DEPTH);
    }

    #[test]
    fn delete_rejects_category_with_children() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_child("Cars", "cars", "vehicles");
        let vehicles = fixture.category_by_slug("vehicles");
        let mut store = fixture.store;

        let err = delete(&mut store, &vehicles.id).unwrap_err();
        assert!(matches!(err, MarketError::CategoryNotEmpty(_)));
    }

    #[test]
    fn delete_rejects_category_with_listings() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_active_listing("A car", "vehicles");
        let vehicles = fixture.category_by_slug("vehicles");
        let mut store = fixture.store;

        let err = delete(&mut store, &vehicles.id).unwrap_err();
        assert!(matches!(err, MarketError::CategoryNotEmpty(_)));
    }

    #[test]
    fn delete_removes_empty_leaf() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_child("Cars", "cars", "vehicles");
        let cars = fixture.category_by_slug("cars");
        let mut store = fixture.store;

        delete(&mut store, &cars.id).unwrap();
        assert_eq!(store.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn slug_rename_follows_bound_listings() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_child("Cars", "cars", "vehicles")
            .with_active_listing("Sedan", "cars")
            .with_active_listing("Truck", "vehicles");
        let cars = fixture.category_by_slug("cars");
        let sedan_id = fixture.listing_by_title("Sedan").id;
        let truck_id = fixture.listing_by_title("Truck").id;
        let mut store = fixture.store;

        let patch = CategoryPatch {
            slug: Some("automobiles".into()),
            ..Default::default()
        };
        update(&mut store, &cars.id, patch).unwrap();

        let sedan = store.get_listing(&sedan_id).unwrap();
        assert_eq!(sedan.bound_slug(), "automobiles");

        // Listings bound elsewhere are untouched.
        let truck = store.get_listing(&truck_id).unwrap();
        assert_eq!(truck.bound_slug(), "vehicles");
    }

    #[test]
    fn subtree_expansion_covers_all_descendants() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_child("Cars", "cars", "vehicles")
            .with_child("Bikes", "bikes", "vehicles")
            .with_child("Oldtimers", "oldtimers", "cars")
            .with_root("Real Estate", "real-estate");

        let categories = fixture.store.list_categories().unwrap();
        let slugs = subtree_slugs(&categories, "vehicles");
        assert_eq!(slugs.len(), 4);
        assert!(slugs.contains("oldtimers"));
        assert!(!slugs.contains("real-estate"));
    }

    #[test]
    fn roots_and_children_listing() {
        let fixture = StoreFixture::new()
            .with_root("Vehicles", "vehicles")
            .with_child("Cars", "cars", "vehicles")
            .with_root("Real Estate", "real-estate");
        let vehicles = fixture.category_by_slug("vehicles");
        let store = fixture.store;

        let roots = get_roots(&store).unwrap();
        assert_eq!(roots.categories.len(), 2);

        let children = get_children(&store, &vehicles.id).unwrap();
        assert_eq!(children.categories.len(), 1);
        assert_eq!(children.categories[0].slug, "cars");
    }
}
