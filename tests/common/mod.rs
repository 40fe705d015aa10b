#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App};
use async_trait::async_trait;
use serde_json::json;

use alrehla_api::config::AppConfig;
use alrehla_api::routes;
use alrehla_api::services::ai_service::{
    AiError, ChatReply, ChatRequest, StoryAssistant, StoryIdea, StoryIdeas, StoryIdeasRequest,
};
use alrehla_api::state::AppState;
use alrehla_api::store::catalog::{Catalog, CatalogStore};

pub const SESSION_HEADER: &str = "X-Session-Id";

/// Answers from canned data, or fails like an unreachable upstream.
pub struct MockAssistant {
    pub fail: bool,
}

#[async_trait]
impl StoryAssistant for MockAssistant {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AiError> {
        if self.fail {
            return Err(AiError::Upstream {
                status: 503,
                body: "model overloaded".to_string(),
            });
        }
        let last = request.validate()?.last().map(|m| m.text.clone()).unwrap_or_default();
        Ok(ChatReply {
            reply: format!("echo: {}", last),
            suggestions: vec!["الباقات".to_string()],
        })
    }

    async fn story_ideas(&self, request: &StoryIdeasRequest) -> Result<StoryIdeas, AiError> {
        if self.fail {
            return Err(AiError::EmptyResponse);
        }
        request.validate()?;
        Ok(StoryIdeas {
            ideas: vec![StoryIdea {
                title: format!("مغامرة {}", request.child_name.clone().unwrap_or_default()),
                goal: "الشجاعة".to_string(),
                summary: "قصة قصيرة.".to_string(),
            }],
        })
    }
}

/// Two packages (one free), one service, two instructors available every day.
pub fn test_catalog() -> Catalog {
    let every_day = json!({
        "sunday": ["10:00", "23:59"],
        "monday": ["10:00", "23:59"],
        "tuesday": ["10:00", "23:59"],
        "wednesday": ["10:00", "23:59"],
        "thursday": ["10:00", "23:59"],
        "friday": ["10:00", "23:59"],
        "saturday": ["10:00", "23:59"]
    });

    serde_json::from_value(json!({
        "packages": [
            { "id": 1, "name": "Intro session", "price": 0 },
            { "id": 2, "name": "Starter", "price": 400, "popular": true },
            { "id": 3, "name": "Unrated", "price": 600 }
        ],
        "services": [
            { "id": 101, "name": "Story review", "price": 250 }
        ],
        "instructors": [
            {
                "id": 10,
                "name": "Huda",
                "packageRates": { "2": 350 },
                "serviceRates": { "101": 100 },
                "weeklySchedule": every_day
            },
            {
                "id": 20,
                "name": "Omar",
                "packageRates": { "2": 450 },
                "weeklySchedule": every_day
            }
        ],
        "childProfiles": [
            { "id": 1, "name": "Salma", "birthDate": "2016-05-12", "gender": "female" }
        ],
        "subscriptionPlans": [
            { "id": 1, "name": "Monthly", "durationMonths": 1, "price": 150 }
        ]
    }))
    .expect("test catalog is valid")
}

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_assistant(MockAssistant { fail: false })
    }

    pub fn with_assistant(assistant: MockAssistant) -> Self {
        let catalog = CatalogStore::new(test_catalog(), Duration::ZERO);
        let state = AppState::new(AppConfig::default(), catalog, Arc::new(assistant));
        Self {
            state: web::Data::new(state),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(routes::configure)
    }
}

pub fn session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
