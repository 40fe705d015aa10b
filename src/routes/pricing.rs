use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{
    catalog::{ItemId, ItemKind},
    pricing::PricingPolicy,
};
use crate::services::pricing_service::{PriceReviewRow, PricingService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    pub kind: ItemKind,
    pub item_id: ItemId,
    pub instructor_id: Option<ItemId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Quote {
    kind: ItemKind,
    item_id: ItemId,
    instructor_id: Option<ItemId>,
    policy: PricingPolicy,
    final_price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceReview {
    company_percentage: f64,
    fixed_fee: f64,
    rows: Vec<PriceReviewRow>,
}

/*
    /api/pricing/quote
*/
pub async fn quote(
    state: web::Data<AppState>,
    input: web::Json<QuoteInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    let catalog = state.catalog.snapshot().await;

    let instructor = match input.instructor_id {
        Some(id) => Some(
            catalog
                .instructor(id)
                .ok_or_else(|| AppError::NotFound(format!("instructor {}", id)))?,
        ),
        None => None,
    };

    // Bookings follow the configured policy, the marketplace always marks up
    let (policy, final_price) = match input.kind {
        ItemKind::Package => {
            let package = catalog
                .package(input.item_id)
                .ok_or_else(|| AppError::NotFound(format!("package {}", input.item_id)))?;
            let policy = state.config.booking_policy;
            (
                policy,
                PricingService::final_price(Some(package), instructor, policy, &state.config.pricing),
            )
        }
        ItemKind::Service => {
            let service = catalog
                .service(input.item_id)
                .ok_or_else(|| AppError::NotFound(format!("service {}", input.item_id)))?;
            let policy = PricingPolicy::Markup;
            (
                policy,
                PricingService::final_price(Some(service), instructor, policy, &state.config.pricing),
            )
        }
    };

    Ok(HttpResponse::Ok().json(Quote {
        kind: input.kind,
        item_id: input.item_id,
        instructor_id: input.instructor_id,
        policy,
        final_price,
    }))
}

/*
    /api/admin/price-review
*/
pub async fn price_review(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.snapshot().await;
    let config = &state.config.pricing;

    let mut rows = PricingService::review_rows(&catalog.packages, &catalog.instructors, config);
    rows.extend(PricingService::review_rows(
        &catalog.services,
        &catalog.instructors,
        config,
    ));

    Ok(HttpResponse::Ok().json(PriceReview {
        company_percentage: config.company_percentage,
        fixed_fee: config.fixed_fee,
        rows,
    }))
}
