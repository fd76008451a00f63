use super::DataStore;
use crate::error::{MarketError, Result};
use crate::model::{Category, Listing};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const CATEGORIES_FILE: &str = "categories.json";
const LISTINGS_FILE: &str = "listings.json";
const COUNTER_FILE: &str = "counter.json";

/// File-backed storage: one JSON document per collection under the data
/// directory. Each trait call loads, mutates, and rewrites exactly one
/// document, which keeps mutations single-record read-modify-writes.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(MarketError::Io)?;
        }
        Ok(())
    }

    fn load_map<T: DeserializeOwned>(&self, file: &str) -> Result<HashMap<Uuid, T>> {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path).map_err(MarketError::Io)?;
        serde_json::from_str(&content).map_err(MarketError::Serialization)
    }

    fn save_map<T: Serialize>(&self, file: &str, map: &HashMap<Uuid, T>) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(map).map_err(MarketError::Serialization)?;
        fs::write(self.root.join(file), content).map_err(MarketError::Io)?;
        Ok(())
    }

    fn load_counter(&self) -> Result<u64> {
        let path = self.root.join(COUNTER_FILE);
        if !path.exists() {
            return Ok(0);
        }
        let content = fs::read_to_string(path).map_err(MarketError::Io)?;
        serde_json::from_str(&content).map_err(MarketError::Serialization)
    }

    fn save_counter(&self, value: u64) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string(&value).map_err(MarketError::Serialization)?;
        fs::write(self.root.join(COUNTER_FILE), content).map_err(MarketError::Io)?;
        Ok(())
    }
}

impl DataStore for FileStore {
    fn save_category(&mut self, category: &Category) -> Result<()> {
        let mut map = self.load_map::<Category>(CATEGORIES_FILE)?;
        map.insert(category.id, category.clone());
        self.save_map(CATEGORIES_FILE, &map)
    }

    fn get_category(&self, id: &Uuid) -> Result<Category> {
        let map = self.load_map::<Category>(CATEGORIES_FILE)?;
        map.get(id)
            .cloned()
            .ok_or_else(|| MarketError::CategoryNotFound(id.to_string()))
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let map = self.load_map::<Category>(CATEGORIES_FILE)?;
        Ok(map.into_values().collect())
    }

    fn remove_category(&mut self, id: &Uuid) -> Result<()> {
        let mut map = self.load_map::<Category>(CATEGORIES_FILE)?;
        if map.remove(id).is_none() {
            return Err(MarketError::CategoryNotFound(id.to_string()));
        }
        self.save_map(CATEGORIES_FILE, &map)
    }

    fn save_listing(&mut self, listing: &Listing) -> Result<()> {
        let mut map = self.load_map::<Listing>(LISTINGS_FILE)?;
        map.insert(listing.id, listing.clone());
        self.save_map(LISTINGS_FILE, &map)
    }

    fn get_listing(&self, id: &Uuid) -> Result<Listing> {
        let map = self.load_map::<Listing>(LISTINGS_FILE)?;
        map.get(id).cloned().ok_or(MarketError::ListingNotFound(*id))
    }

    fn list_listings(&self) -> Result<Vec<Listing>> {
        let map = self.load_map::<Listing>(LISTINGS_FILE)?;
        Ok(map.into_values().collect())
    }

    fn remove_listing(&mut self, id: &Uuid) -> Result<()> {
        let mut map = self.load_map::<Listing>(LISTINGS_FILE)?;
        if map.remove(id).is_none() {
            return Err(MarketError::ListingNotFound(*id));
        }
        self.save_map(LISTINGS_FILE, &map)
    }

    fn next_listing_number(&mut self) -> Result<u64> {
        let next = self.load_counter()? + 1;
        self.save_counter(next)?;
        Ok(next)
    }
}
