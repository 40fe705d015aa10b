use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    catalog::{CreativeWritingPackage, ItemId, StandaloneService, SubscriptionPlan},
    child::ChildProfile,
    instructor::Instructor,
};

const SEED_CATALOG: &str = include_str!("seed_catalog.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything the public pages read: packages, services, instructors,
/// the signed-in family's child profiles, plans and holidays.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub packages: Vec<CreativeWritingPackage>,
    #[serde(default)]
    pub services: Vec<StandaloneService>,
    #[serde(default)]
    pub instructors: Vec<Instructor>,
    #[serde(default)]
    pub child_profiles: Vec<ChildProfile>,
    #[serde(default)]
    pub subscription_plans: Vec<SubscriptionPlan>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

impl Catalog {
    pub fn seed() -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(SEED_CATALOG)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn package(&self, id: ItemId) -> Option<&CreativeWritingPackage> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub fn service(&self, id: ItemId) -> Option<&StandaloneService> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn instructor(&self, id: ItemId) -> Option<&Instructor> {
        self.instructors.iter().find(|i| i.id == id)
    }

    pub fn child_profile(&self, id: ItemId) -> Option<&ChildProfile> {
        self.child_profiles.iter().find(|c| c.id == id)
    }

    pub fn subscription_plan(&self, id: ItemId) -> Option<&SubscriptionPlan> {
        self.subscription_plans.iter().find(|p| p.id == id)
    }
}

/// Read-only catalog shared by every request, with an optional artificial
/// delay standing in for a remote data source.
#[derive(Clone)]
pub struct CatalogStore {
    catalog: Arc<Catalog>,
    latency: Duration,
}

impl CatalogStore {
    pub fn new(catalog: Catalog, latency: Duration) -> Self {
        Self {
            catalog: Arc::new(catalog),
            latency,
        }
    }

    /// Load from `path` when given, otherwise from the built-in seed.
    pub fn load(path: Option<&Path>, latency: Duration) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(path) => {
                log::info!("Loading catalog from {}", path.display());
                Catalog::from_file(path)?
            }
            None => {
                log::info!("Loading built-in seed catalog");
                Catalog::seed()?
            }
        };

        log::info!(
            "Catalog ready: {} packages, {} services, {} instructors",
            catalog.packages.len(),
            catalog.services.len(),
            catalog.instructors.len()
        );

        Ok(Self::new(catalog, latency))
    }

    pub async fn snapshot(&self) -> Arc<Catalog> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.catalog.clone()
    }

    /// The catalog without the simulated delay, for health checks.
    pub fn current(&self) -> Arc<Catalog> {
        self.catalog.clone()
    }
}
