use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, HttpRequest,
};

use crate::error::AppError;

pub mod ai;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod pricing;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Malformed {
        message: "Invalid JSON body",
        details: err.to_string(),
    }
    .into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Malformed {
        message: "Invalid query string",
        details: err.to_string(),
    }
    .into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Malformed {
        message: "Invalid path parameter",
        details: err.to_string(),
    }
    .into()
}

/// Register every route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/chat")
                        .route(web::post().to(ai::chat))
                        .default_service(web::to(ai::method_not_allowed)),
                )
                .service(
                    web::resource("/generateStoryIdeas")
                        .route(web::post().to(ai::generate_story_ideas))
                        .default_service(web::to(ai::method_not_allowed)),
                )
                .service(
                    web::scope("/creative-writing")
                        .route("/packages", web::get().to(catalog::get_packages))
                        .route("/services", web::get().to(catalog::get_services)),
                )
                .route("/instructors", web::get().to(catalog::get_instructors))
                .route("/pricing/quote", web::post().to(pricing::quote))
                .route("/admin/price-review", web::get().to(pricing::price_review))
                .service(
                    web::scope("/bookings/wizards")
                        .route("", web::post().to(booking::open_wizard))
                        .route("/{id}", web::get().to(booking::get_wizard))
                        .route("/{id}", web::delete().to(booking::discard_wizard))
                        .route("/{id}/actions", web::post().to(booking::apply_action))
                        .route("/{id}/slots", web::get().to(booking::get_slots))
                        .route("/{id}/confirm", web::post().to(booking::confirm)),
                )
                .service(
                    web::scope("/cart")
                        .route("", web::get().to(cart::get_cart))
                        .route("", web::delete().to(cart::clear_cart))
                        .route("/items", web::post().to(cart::add_item))
                        .route("/items/{id}", web::delete().to(cart::remove_item))
                        .route("/checkout", web::post().to(cart::checkout)),
                ),
        );
}
