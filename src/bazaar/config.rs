use crate::error::{MarketError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_VAT_RATE: f64 = 0.18;
const DEFAULT_RETENTION_DAYS: i64 = 30;
const DEFAULT_CURRENCY: &str = "EUR";

/// A named, priced visibility boost with a fixed duration. The catalog is
/// admin-configurable through `config.json`; prices here are net of VAT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionPackage {
    pub tier: String,
    pub name: String,
    pub price: f64,
    pub duration_days: i64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub position: u32,
}

fn default_true() -> bool {
    true
}

/// Net and gross amounts for a promotion purchase, handed to the billing
/// collaborator. Gross is always derived at quote time, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionQuote {
    pub tier: String,
    pub currency: String,
    pub net: f64,
    pub vat: f64,
    pub gross: f64,
}

/// Engine configuration, stored in `<data dir>/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_currency")]
    pub currency: String,

    /// VAT applied on top of package prices: gross = net × (1 + vat_rate).
    #[serde(default = "default_vat_rate")]
    pub vat_rate: f64,

    /// Days a soft-deleted listing stays restorable before it becomes
    /// eligible for permanent purge.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    #[serde(default = "default_packages")]
    pub packages: Vec<PromotionPackage>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_vat_rate() -> f64 {
    DEFAULT_VAT_RATE
}

fn default_retention_days() -> i64 {
    DEFAULT_RETENTION_DAYS
}

static DEFAULT_PACKAGES: Lazy<Vec<PromotionPackage>> = Lazy::new(|| {
    vec![
        PromotionPackage {
            tier: "GOLD".into(),
            name: "Gold Listing".into(),
            price: 599.0,
            duration_days: 14,
            features: vec!["Top of category".into(), "Homepage carousel".into()],
            is_active: true,
            position: 0,
        },
        PromotionPackage {
            tier: "SILVER".into(),
            name: "Silver Listing".into(),
            price: 299.0,
            duration_days: 14,
            features: vec!["Highlighted card".into()],
            is_active: true,
            position: 1,
        },
        PromotionPackage {
            tier: "BASIC".into(),
            name: "Basic Bump".into(),
            price: 99.0,
            duration_days: 7,
            features: vec!["Refreshed posting date".into()],
            is_active: true,
            position: 2,
        },
    ]
});

fn default_packages() -> Vec<PromotionPackage> {
    DEFAULT_PACKAGES.clone()
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            vat_rate: default_vat_rate(),
            retention_days: default_retention_days(),
            packages: default_packages(),
        }
    }
}

impl MarketConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(MarketError::Io)?;
        let config: MarketConfig =
            serde_json::from_str(&content).map_err(MarketError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MarketError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(MarketError::Serialization)?;
        fs::write(config_path, content).map_err(MarketError::Io)?;
        Ok(())
    }

    /// Look up an active package by tier, case-insensitively.
    pub fn package(&self, tier: &str) -> Option<&PromotionPackage> {
        self.packages
            .iter()
            .filter(|p| p.is_active)
            .find(|p| p.tier.eq_ignore_ascii_case(tier))
    }

    /// Price a package purchase, net and gross.
    pub fn quote(&self, tier: &str) -> Result<PromotionQuote> {
        let package = self
            .package(tier)
            .ok_or_else(|| MarketError::UnknownTier(tier.to_string()))?;
        let vat = package.price * self.vat_rate;
        Ok(PromotionQuote {
            tier: package.tier.clone(),
            currency: self.currency.clone(),
            net: package.price,
            vat,
            gross: package.price + vat,
        })
    }
}
