use futures::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::error::AppError;

pub const SESSION_HEADER: &str = "X-Session-Id";

/// The browser session a request belongs to, taken from `X-Session-Id`.
/// Carts and booking wizards are scoped to it.
#[derive(Debug, Clone)]
pub struct BrowserSession {
    pub id: String,
}

impl FromRequest for BrowserSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match id {
            Some(id) => ready(Ok(BrowserSession { id: id.to_string() })),
            None => ready(Err(AppError::BadRequest(format!(
                "{} header is required",
                SESSION_HEADER
            )))),
        }
    }
}
