use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{
    catalog::{CreativeWritingPackage, StandaloneService},
    pricing::{PriceRange, PricingPolicy},
};
use crate::services::pricing_service::PricingService;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageListing<'a> {
    #[serde(flatten)]
    package: &'a CreativeWritingPackage,
    price_range: PriceRange,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceListing<'a> {
    #[serde(flatten)]
    service: &'a StandaloneService,
    price_range: PriceRange,
    instructor_count: usize,
}

/*
    /api/creative-writing/packages
*/
pub async fn get_packages(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.snapshot().await;

    let listings: Vec<PackageListing> = catalog
        .packages
        .iter()
        .map(|package| PackageListing {
            package,
            price_range: PricingService::price_range_with(
                package,
                &catalog.instructors,
                state.config.booking_policy,
                &state.config.pricing,
            ),
        })
        .collect();

    Ok(HttpResponse::Ok().json(listings))
}

/*
    /api/creative-writing/services
*/
pub async fn get_services(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.snapshot().await;

    let listings: Vec<ServiceListing> = catalog
        .services
        .iter()
        .map(|service| ServiceListing {
            service,
            price_range: PricingService::price_range_with(
                service,
                &catalog.instructors,
                PricingPolicy::Markup,
                &state.config.pricing,
            ),
            instructor_count: PricingService::collect_overrides(service, &catalog.instructors)
                .len(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(listings))
}

/*
    /api/instructors
*/
pub async fn get_instructors(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.snapshot().await;
    Ok(HttpResponse::Ok().json(&catalog.instructors))
}
