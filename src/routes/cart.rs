use actix_web::{web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::session::BrowserSession;
use crate::models::cart::{CartEntry, CartItem, SubscriptionPayload};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartView {
    items: Vec<CartItem>,
    total: f64,
}

/*
    GET /api/cart
*/
pub async fn get_cart(
    state: web::Data<AppState>,
    session: BrowserSession,
) -> Result<HttpResponse, AppError> {
    let view = state.with_cart(&session.id, |cart| {
        Ok(CartView {
            items: cart.items().to_vec(),
            total: cart.total(),
        })
    })?;

    Ok(HttpResponse::Ok().json(view))
}

/*
    POST /api/cart/items
*/
pub async fn add_item(
    state: web::Data<AppState>,
    session: BrowserSession,
    input: web::Json<CartEntry>,
) -> Result<HttpResponse, AppError> {
    let entry = match input.into_inner() {
        CartEntry::Booking(_) => {
            return Err(AppError::BadRequest(
                "bookings are added by confirming a booking wizard".to_string(),
            ))
        }
        // Plan details and price come from the catalog, never the client
        CartEntry::Subscription(requested) => {
            let catalog = state.catalog.snapshot().await;
            let plan = catalog.subscription_plan(requested.plan_id).ok_or_else(|| {
                AppError::NotFound(format!("subscription plan {}", requested.plan_id))
            })?;
            CartEntry::Subscription(SubscriptionPayload {
                plan_id: plan.id,
                plan_name: plan.name.clone(),
                child_name: requested.child_name,
                duration_months: plan.duration_months,
                total: plan.price,
            })
        }
        CartEntry::Order(order) => {
            if order.total < 0.0 {
                return Err(AppError::BadRequest("total must not be negative".to_string()));
            }
            CartEntry::Order(order)
        }
    };

    let item = state.with_cart(&session.id, |cart| Ok(cart.add(entry)?))?;
    Ok(HttpResponse::Created().json(item))
}

/*
    DELETE /api/cart/items/{id}
*/
pub async fn remove_item(
    state: web::Data<AppState>,
    session: BrowserSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let removed = state.with_cart(&session.id, |cart| Ok(cart.remove(id)?))?;
    Ok(HttpResponse::Ok().json(removed))
}

/*
    DELETE /api/cart
*/
pub async fn clear_cart(
    state: web::Data<AppState>,
    session: BrowserSession,
) -> Result<HttpResponse, AppError> {
    state.with_cart(&session.id, |cart| {
        cart.clear();
        Ok(())
    })?;
    Ok(HttpResponse::NoContent().finish())
}

/*
    POST /api/cart/checkout
*/
pub async fn checkout(
    state: web::Data<AppState>,
    session: BrowserSession,
) -> Result<HttpResponse, AppError> {
    let summary = state.with_cart(&session.id, |cart| Ok(cart.checkout()?))?;
    Ok(HttpResponse::Ok().json(summary))
}
