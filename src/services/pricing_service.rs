use serde::Serialize;

use crate::models::{
    catalog::{CatalogItem, ItemId, ItemKind},
    instructor::Instructor,
    pricing::{PriceRange, PricingConfig, PricingPolicy},
};

/// One instructor override as the admin price review lists it.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceReviewRow {
    pub instructor_id: ItemId,
    pub instructor_name: String,
    pub kind: ItemKind,
    pub item_id: ItemId,
    pub item_name: String,
    pub base_price: f64,
    pub net_rate: f64,
    pub customer_price: f64,
}

pub struct PricingService;

impl PricingService {
    /// Customer price for an instructor net rate (`net * percentage + fee`)
    pub fn apply_markup(net_rate: f64, config: &PricingConfig) -> f64 {
        net_rate * config.company_percentage + config.fixed_fee
    }

    /// Turn a net override into what the customer sees under a policy
    pub fn customer_price(net_rate: f64, policy: PricingPolicy, config: &PricingConfig) -> f64 {
        match policy {
            PricingPolicy::Net => net_rate,
            PricingPolicy::Markup => Self::apply_markup(net_rate, config),
        }
    }

    /// Collect every defined override for an item across instructors
    pub fn collect_overrides<I: CatalogItem + ?Sized>(
        item: &I,
        instructors: &[Instructor],
    ) -> Vec<f64> {
        instructors
            .iter()
            .filter_map(|instructor| instructor.rate_for(item.kind(), item.id()))
            .collect()
    }

    /// Min/max of the raw net overrides, falling back to the base price
    pub fn price_range<I: CatalogItem + ?Sized>(item: &I, instructors: &[Instructor]) -> PriceRange {
        Self::price_range_with(item, instructors, PricingPolicy::Net, &PricingConfig::default())
    }

    /// Same as `price_range` but every override goes through the policy first.
    /// The base price fallback is already a customer price and is left alone.
    pub fn price_range_with<I: CatalogItem + ?Sized>(
        item: &I,
        instructors: &[Instructor],
        policy: PricingPolicy,
        config: &PricingConfig,
    ) -> PriceRange {
        if item.is_free() {
            return PriceRange::single(0.0);
        }

        let prices: Vec<f64> = Self::collect_overrides(item, instructors)
            .into_iter()
            .map(|net| Self::customer_price(net, policy, config))
            .collect();

        if prices.is_empty() {
            return PriceRange::single(item.base_price());
        }

        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        PriceRange { min, max }
    }

    /// Price for a chosen item and instructor; `None` until both are known
    pub fn final_price<I: CatalogItem + ?Sized>(
        item: Option<&I>,
        instructor: Option<&Instructor>,
        policy: PricingPolicy,
        config: &PricingConfig,
    ) -> Option<f64> {
        let item = item?;
        if item.is_free() {
            return Some(0.0);
        }
        let instructor = instructor?;

        match instructor.rate_for(item.kind(), item.id()) {
            Some(net) => Some(Self::customer_price(net, policy, config)),
            None => Some(item.base_price()),
        }
    }

    /// Every defined override across `items`, with the marked-up customer
    /// price next to the instructor's net rate
    pub fn review_rows<I: CatalogItem>(
        items: &[I],
        instructors: &[Instructor],
        config: &PricingConfig,
    ) -> Vec<PriceReviewRow> {
        instructors
            .iter()
            .flat_map(|instructor| {
                items.iter().filter_map(move |item| {
                    instructor
                        .rate_for(item.kind(), item.id())
                        .map(|net_rate| PriceReviewRow {
                            instructor_id: instructor.id,
                            instructor_name: instructor.name.clone(),
                            kind: item.kind(),
                            item_id: item.id(),
                            item_name: item.name().to_string(),
                            base_price: item.base_price(),
                            net_rate,
                            customer_price: Self::apply_markup(net_rate, config),
                        })
                })
            })
            .collect()
    }
}
