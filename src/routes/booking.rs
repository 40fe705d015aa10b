use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::session::BrowserSession;
use crate::models::cart::{CartEntry, CartItem};
use crate::services::availability_service::{Slot, DEFAULT_HORIZON_DAYS};
use crate::services::booking_flow::{BookingAction, BookingFlow, BookingState};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WizardResponse {
    wizard_id: Uuid,
    #[serde(flatten)]
    state: BookingState,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotsResponse {
    wizard_id: Uuid,
    slots: Vec<Slot>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmResponse {
    cart_item: CartItem,
    cart_total: f64,
}

const MAX_HORIZON_DAYS: u64 = 90;

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub days: Option<u64>,
}

// Schedules are wall-clock times at the academy
fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/*
    POST /api/bookings/wizards
*/
pub async fn open_wizard(
    state: web::Data<AppState>,
    session: BrowserSession,
) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.snapshot().await;
    let flow = BookingFlow::new(catalog, state.config.booking_policy, state.config.pricing);
    let booking_state = flow.state();
    let wizard_id = state.open_wizard(&session.id, flow)?;

    log::info!("Opened booking wizard {} for session {}", wizard_id, session.id);

    Ok(HttpResponse::Created().json(WizardResponse {
        wizard_id,
        state: booking_state,
    }))
}

/*
    GET /api/bookings/wizards/{id}
*/
pub async fn get_wizard(
    state: web::Data<AppState>,
    session: BrowserSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let wizard_id = path.into_inner();
    let booking_state = state.with_wizard(&session.id, wizard_id, |flow| Ok(flow.state()))?;

    Ok(HttpResponse::Ok().json(WizardResponse {
        wizard_id,
        state: booking_state,
    }))
}

/*
    POST /api/bookings/wizards/{id}/actions
*/
pub async fn apply_action(
    state: web::Data<AppState>,
    session: BrowserSession,
    path: web::Path<Uuid>,
    input: web::Json<BookingAction>,
) -> Result<HttpResponse, AppError> {
    let wizard_id = path.into_inner();
    let action = input.into_inner();

    let booking_state = state.with_wizard(&session.id, wizard_id, |flow| {
        flow.apply(action, now())?;
        Ok(flow.state())
    })?;

    Ok(HttpResponse::Ok().json(WizardResponse {
        wizard_id,
        state: booking_state,
    }))
}

/*
    GET /api/bookings/wizards/{id}/slots?days=14
*/
pub async fn get_slots(
    state: web::Data<AppState>,
    session: BrowserSession,
    path: web::Path<Uuid>,
    query: web::Query<SlotsQuery>,
) -> Result<HttpResponse, AppError> {
    let wizard_id = path.into_inner();
    let days = query
        .days
        .unwrap_or(DEFAULT_HORIZON_DAYS)
        .min(MAX_HORIZON_DAYS);

    let slots = state.with_wizard(&session.id, wizard_id, |flow| {
        Ok(flow.available_slots(now(), days))
    })?;

    Ok(HttpResponse::Ok().json(SlotsResponse { wizard_id, slots }))
}

/*
    POST /api/bookings/wizards/{id}/confirm
*/
pub async fn confirm(
    state: web::Data<AppState>,
    session: BrowserSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let wizard_id = path.into_inner();

    // Taking the wizard out first means a second confirm cannot add it again
    let flow = state.close_wizard(&session.id, wizard_id)?;

    let added = flow.confirm(now()).map_err(AppError::from).and_then(|entry| {
        state.with_cart(&session.id, |cart| {
            let item = cart.add(entry)?;
            Ok((item, cart.total()))
        })
    });
    let (cart_item, cart_total) = match added {
        Ok(added) => added,
        Err(err) => {
            state.reopen_wizard(&session.id, wizard_id, flow)?;
            return Err(err);
        }
    };

    let child = match &cart_item.entry {
        CartEntry::Booking(booking) => booking.child.display_name(&flow.catalog().child_profiles),
        _ => None,
    };
    log::info!(
        "Booking wizard {} confirmed as cart item {} for {}",
        wizard_id,
        cart_item.id,
        child.as_deref().unwrap_or("the account holder")
    );

    Ok(HttpResponse::Created().json(ConfirmResponse {
        cart_item,
        cart_total,
    }))
}

/*
    DELETE /api/bookings/wizards/{id}
*/
pub async fn discard_wizard(
    state: web::Data<AppState>,
    session: BrowserSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let wizard_id = path.into_inner();
    state.close_wizard(&session.id, wizard_id)?;
    Ok(HttpResponse::NoContent().finish())
}
