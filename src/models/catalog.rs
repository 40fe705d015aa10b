use serde::{Deserialize, Serialize};

pub type ItemId = u64;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Package,
    Service,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreativeWritingPackage {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub sessions: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneService {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: ItemId,
    pub name: String,
    pub duration_months: u32,
    pub price: f64,
}

/// Anything with an administrator-set reference price.
pub trait CatalogItem {
    fn id(&self) -> ItemId;
    fn name(&self) -> &str;
    fn base_price(&self) -> f64;
    fn kind(&self) -> ItemKind;

    fn is_free(&self) -> bool {
        self.base_price() == 0.0
    }
}

impl CatalogItem for CreativeWritingPackage {
    fn id(&self) -> ItemId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn base_price(&self) -> f64 {
        self.price
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Package
    }
}

impl CatalogItem for StandaloneService {
    fn id(&self) -> ItemId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn base_price(&self) -> f64 {
        self.price
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Service
    }
}
