use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let catalog_result = check_catalog(&state);
    health
        .services
        .insert("catalog".to_string(), catalog_result.clone());

    let assistant_result = check_assistant(&state);
    health
        .services
        .insert("story_assistant".to_string(), assistant_result.clone());

    // A missing AI key only degrades the two assistant endpoints
    if catalog_result.status != "ok" || assistant_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_catalog(state: &AppState) -> ServiceStatus {
    let catalog = state.catalog.current();

    if catalog.packages.is_empty() {
        ServiceStatus {
            status: "error".to_string(),
            details: Some("Catalog has no packages".to_string()),
        }
    } else {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!(
                "{} packages, {} services, {} instructors",
                catalog.packages.len(),
                catalog.services.len(),
                catalog.instructors.len()
            )),
        }
    }
}

fn check_assistant(state: &AppState) -> ServiceStatus {
    if state.assistant.is_configured() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Model {} configured", state.config.ai.model)),
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some("GEMINI_API_KEY not configured".to_string()),
        }
    }
}
