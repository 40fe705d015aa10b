use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::ai_service::StoryAssistant;
use crate::services::booking_flow::BookingFlow;
use crate::services::cart_service::CartStore;
use crate::store::catalog::CatalogStore;
use crate::store::session_storage::MemorySessionStorage;

struct OpenWizard {
    session_id: String,
    flow: BookingFlow,
    touched_at: Instant,
}

impl OpenWizard {
    fn new(session_id: &str, flow: BookingFlow) -> Self {
        Self {
            session_id: session_id.to_string(),
            flow,
            touched_at: Instant::now(),
        }
    }
}

/// Everything handlers share, built once at startup and handed to actix as
/// `web::Data<AppState>`.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: CatalogStore,
    pub assistant: Arc<dyn StoryAssistant>,
    sessions: Mutex<HashMap<String, MemorySessionStorage>>,
    wizards: Mutex<HashMap<Uuid, OpenWizard>>,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: CatalogStore, assistant: Arc<dyn StoryAssistant>) -> Self {
        Self {
            config,
            catalog,
            assistant,
            sessions: Mutex::new(HashMap::new()),
            wizards: Mutex::new(HashMap::new()),
        }
    }

    /// Run `f` against the session's cart, restored from its session storage.
    /// The sessions lock is held throughout so one session sees one writer.
    /// Sessions whose storage ends up empty are not kept.
    pub fn with_cart<T, F>(&self, session_id: &str, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut CartStore<MemorySessionStorage>) -> Result<T, AppError>,
    {
        let mut sessions = self.sessions.lock()?;
        let storage = sessions.get(session_id).cloned().unwrap_or_default();
        let mut cart = CartStore::restore(storage.clone());
        let result = f(&mut cart);

        if storage.is_empty() {
            sessions.remove(session_id);
        } else {
            sessions.insert(session_id.to_string(), storage);
        }
        result
    }

    pub fn open_wizard(&self, session_id: &str, flow: BookingFlow) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let mut wizards = self.wizards.lock()?;

        let ttl = self.config.wizard_ttl;
        let before = wizards.len();
        wizards.retain(|_, open| open.touched_at.elapsed() < ttl);
        if wizards.len() < before {
            log::debug!("Dropped {} expired booking wizards", before - wizards.len());
        }

        wizards.insert(id, OpenWizard::new(session_id, flow));
        Ok(id)
    }

    /// Run `f` against a live wizard opened by this session.
    pub fn with_wizard<T, F>(&self, session_id: &str, id: Uuid, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut BookingFlow) -> Result<T, AppError>,
    {
        let mut wizards = self.wizards.lock()?;
        match wizards.get_mut(&id) {
            Some(open) if self.is_live(open, session_id) => {
                open.touched_at = Instant::now();
                f(&mut open.flow)
            }
            _ => Err(AppError::NotFound(format!("booking wizard {}", id))),
        }
    }

    /// Remove a wizard and hand its flow to the caller. Only one caller can
    /// ever take a given wizard.
    pub fn close_wizard(&self, session_id: &str, id: Uuid) -> Result<BookingFlow, AppError> {
        let mut wizards = self.wizards.lock()?;
        match wizards.get(&id) {
            Some(open) if self.is_live(open, session_id) => {}
            _ => return Err(AppError::NotFound(format!("booking wizard {}", id))),
        }
        wizards
            .remove(&id)
            .map(|open| open.flow)
            .ok_or_else(|| AppError::NotFound(format!("booking wizard {}", id)))
    }

    /// Put back a flow taken with `close_wizard`.
    pub fn reopen_wizard(&self, session_id: &str, id: Uuid, flow: BookingFlow) -> Result<(), AppError> {
        self.wizards
            .lock()?
            .insert(id, OpenWizard::new(session_id, flow));
        Ok(())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn wizard_count(&self) -> usize {
        self.wizards.lock().map(|w| w.len()).unwrap_or(0)
    }

    fn is_live(&self, open: &OpenWizard, session_id: &str) -> bool {
        open.session_id == session_id && open.touched_at.elapsed() < self.config.wizard_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::models::cart::{CartEntry, OrderPayload};
    use crate::models::pricing::{PricingConfig, PricingPolicy};
    use crate::services::ai_service::{
        AiError, ChatReply, ChatRequest, StoryIdeas, StoryIdeasRequest,
    };
    use crate::store::catalog::Catalog;

    struct Offline;

    #[async_trait]
    impl StoryAssistant for Offline {
        async fn chat(&self, _: &ChatRequest) -> Result<ChatReply, AiError> {
            Err(AiError::EmptyResponse)
        }

        async fn story_ideas(&self, _: &StoryIdeasRequest) -> Result<StoryIdeas, AiError> {
            Err(AiError::EmptyResponse)
        }
    }

    fn state(wizard_ttl: Duration) -> AppState {
        let config = AppConfig {
            wizard_ttl,
            ..AppConfig::default()
        };
        AppState::new(
            config,
            CatalogStore::new(Catalog::default(), Duration::ZERO),
            Arc::new(Offline),
        )
    }

    fn flow() -> BookingFlow {
        BookingFlow::new(
            Arc::new(Catalog::default()),
            PricingPolicy::Net,
            PricingConfig::default(),
        )
    }

    fn order() -> CartEntry {
        CartEntry::Order(OrderPayload {
            product_key: "custom_story".to_string(),
            product_name: "Story".to_string(),
            child_name: "Adam".to_string(),
            format: None,
            customization: None,
            total: 90.0,
        })
    }

    #[test]
    fn test_reading_a_cart_keeps_no_session() {
        let state = state(Duration::from_secs(60));

        for i in 0..100 {
            let total = state
                .with_cart(&format!("visitor-{}", i), |cart| Ok(cart.total()))
                .unwrap();
            assert_eq!(total, 0.0);
        }
        assert_eq!(state.session_count(), 0);
    }

    #[test]
    fn test_session_dropped_once_cart_is_empty() {
        let state = state(Duration::from_secs(60));

        state
            .with_cart("abc", |cart| Ok(cart.add(order())?))
            .unwrap();
        assert_eq!(state.session_count(), 1);

        let kept = state.with_cart("abc", |cart| Ok(cart.items().len())).unwrap();
        assert_eq!(kept, 1);

        state.with_cart("abc", |cart| Ok(cart.checkout()?)).unwrap();
        assert_eq!(state.session_count(), 0);
    }

    #[test]
    fn test_wizard_can_be_taken_once() {
        let state = Arc::new(state(Duration::from_secs(60)));
        let id = state.open_wizard("abc", flow()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                thread::spawn(move || state.close_wizard("abc", id).is_ok())
            })
            .collect();
        let taken = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(taken, 1);
        assert_eq!(state.wizard_count(), 0);
    }

    #[test]
    fn test_reopened_wizard_is_usable() {
        let state = state(Duration::from_secs(60));
        let id = state.open_wizard("abc", flow()).unwrap();

        let taken = state.close_wizard("abc", id).unwrap();
        assert!(state.with_wizard("abc", id, |_| Ok(())).is_err());

        state.reopen_wizard("abc", id, taken).unwrap();
        assert!(state.with_wizard("abc", id, |_| Ok(())).is_ok());
    }

    #[test]
    fn test_expired_wizards_are_swept() {
        let state = state(Duration::ZERO);
        let stale = state.open_wizard("abc", flow()).unwrap();

        assert!(state.with_wizard("abc", stale, |_| Ok(())).is_err());

        state.open_wizard("abc", flow()).unwrap();
        // The stale wizard was dropped when the second one opened
        assert_eq!(state.wizard_count(), 1);
    }

    #[test]
    fn test_wizard_scoped_to_session() {
        let state = state(Duration::from_secs(60));
        let id = state.open_wizard("abc", flow()).unwrap();

        assert!(state.with_wizard("xyz", id, |_| Ok(())).is_err());
        assert!(state.close_wizard("xyz", id).is_err());
        assert_eq!(state.wizard_count(), 1);
    }
}
