//! Session registry: the code → session mapping.
//!
//! All registry state lives behind one `tokio::sync::Mutex`, so creation,
//! lookup, and removal are linearizable with respect to each other: a session
//! visible after `create_session` returns is immediately visible to `lookup`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::{
    CODE_ALPHABET, CODE_LENGTH, CODE_MAX_TRIES, GAME_LIFETIME, GAME_LIMIT, PRACTICE_CODE,
    REQUIRED_WINS_MAX, REQUIRED_WINS_MIN, TIME_LIMIT_MAX, TIME_LIMIT_MIN,
};
use crate::error::RegistryError;

use super::session::{GameSession, SessionHandle};

/// Creation result handed back to the HTTP boundary.
///
/// `required_wins` and `time_limit` are clamped and echoed but reserved:
/// round resolution does not consult them.
#[derive(Debug, Clone, Serialize)]
pub struct GameInfo {
    pub websocket_url: String,
    pub code: String,
    pub required_wins: i64,
    pub time_limit: i64,
    pub start_time: i64,
}

struct RegistryInner {
    sessions: HashMap<String, SessionHandle>,
    /// Monotonically increasing creation counter, used for code derivation.
    created: u64,
}

/// Mints and tracks live game sessions.
pub struct SessionRegistry {
    /// Advertised base (e.g. `ws://127.0.0.1:5000`) for `websocket_url`.
    ws_base: String,
    inner: Mutex<RegistryInner>,
}

impl SessionRegistry {
    pub fn new(ws_base: String) -> Arc<Self> {
        Arc::new(Self {
            ws_base,
            inner: Mutex::new(RegistryInner {
                sessions: HashMap::new(),
                created: 0,
            }),
        })
    }

    /// Register the fixed-code practice session. Idempotent.
    pub async fn seed_practice(self: &Arc<Self>) {
        let mut inner = self.inner.lock().await;
        if inner.sessions.contains_key(PRACTICE_CODE) {
            return;
        }
        let handle = GameSession::spawn(
            PRACTICE_CODE.to_string(),
            Arc::clone(self),
            Duration::from_secs(365 * 24 * 3600),
        );
        inner.sessions.insert(PRACTICE_CODE.to_string(), handle);
        tracing::info!("practice session {} seeded", PRACTICE_CODE);
    }

    /// Create a session: enforce the live-session ceiling, clamp the inputs,
    /// mint a unique code, and spawn the session task.
    pub async fn create_session(
        self: &Arc<Self>,
        required_wins: i64,
        time_limit: i64,
    ) -> Result<GameInfo, RegistryError> {
        let mut inner = self.inner.lock().await;
        if inner.sessions.len() >= GAME_LIMIT {
            return Err(RegistryError::GameLimitReached);
        }

        let code = generate_code(&inner)?;
        inner.created += 1;
        let handle = GameSession::spawn(code.clone(), Arc::clone(self), GAME_LIFETIME);
        inner.sessions.insert(code.clone(), handle);
        tracing::info!("session {} created ({} live)", code, inner.sessions.len());

        Ok(GameInfo {
            websocket_url: format!("{}/connect?gameId={}", self.ws_base, code),
            code,
            required_wins: required_wins.clamp(REQUIRED_WINS_MIN, REQUIRED_WINS_MAX),
            time_limit: time_limit.clamp(TIME_LIMIT_MIN, TIME_LIMIT_MAX),
            start_time: Utc::now().timestamp(),
        })
    }

    pub async fn lookup(&self, code: &str) -> Option<SessionHandle> {
        self.inner.lock().await.sessions.get(code).cloned()
    }

    /// Remove a session. Idempotent: removing an absent code is a silent
    /// no-op, so the live count can only go down once per session.
    pub async fn remove(&self, code: &str) -> bool {
        let removed = self.inner.lock().await.sessions.remove(code).is_some();
        if removed {
            tracing::info!("stopping game: {}", code);
        }
        removed
    }

    pub async fn live_sessions(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }
}

/// Generate a connect code not currently in the live mapping.
///
/// Codes are exactly [`CODE_LENGTH`] characters: one derived from the creation
/// counter, one from the unix-microsecond clock, the rest uniformly random.
/// Bounded retry loop; pathological collision rates surface as an error
/// instead of recursing.
fn generate_code(inner: &RegistryInner) -> Result<String, RegistryError> {
    let mut rng = rand::rng();
    for _ in 0..CODE_MAX_TRIES {
        let micros = Utc::now().timestamp_micros().unsigned_abs();
        let mut code = String::with_capacity(CODE_LENGTH);
        code.push(alphabet_char(inner.created as usize));
        code.push(alphabet_char(micros as usize));
        while code.len() < CODE_LENGTH {
            code.push(alphabet_char(rng.random_range(0..CODE_ALPHABET.len())));
        }
        if !inner.sessions.contains_key(&code) {
            return Ok(code);
        }
    }
    Err(RegistryError::CodeGenerationExhausted(CODE_MAX_TRIES))
}

fn alphabet_char(n: usize) -> char {
    CODE_ALPHABET[n % CODE_ALPHABET.len()] as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_created_codes_are_unique_and_well_formed() {
        // given:
        let registry = SessionRegistry::new("ws://127.0.0.1:5000".to_string());

        // when: creating many sessions below the ceiling
        let mut codes = HashSet::new();
        for _ in 0..50 {
            let info = registry.create_session(3, 5).await.expect("create");
            assert_eq!(info.code.len(), CODE_LENGTH);
            assert!(info.code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
            codes.insert(info.code);
        }

        // then: all codes are pairwise distinct
        assert_eq!(codes.len(), 50);
    }

    #[tokio::test]
    async fn test_creation_is_rejected_at_the_ceiling() {
        // given: a registry filled to the ceiling
        let registry = SessionRegistry::new("ws://127.0.0.1:5000".to_string());
        for _ in 0..GAME_LIMIT {
            registry.create_session(3, 5).await.expect("create");
        }

        // when:
        let overflow = registry.create_session(3, 5).await;

        // then:
        assert!(matches!(overflow, Err(RegistryError::GameLimitReached)));
        assert_eq!(registry.live_sessions().await, GAME_LIMIT);
    }

    #[tokio::test]
    async fn test_out_of_range_settings_are_clamped() {
        let registry = SessionRegistry::new("ws://127.0.0.1:5000".to_string());

        let high = registry.create_session(100, 50).await.expect("create");
        assert_eq!(high.required_wins, REQUIRED_WINS_MAX);
        assert_eq!(high.time_limit, TIME_LIMIT_MAX);

        let low = registry.create_session(-3, 0).await.expect("create");
        assert_eq!(low.required_wins, REQUIRED_WINS_MIN);
        assert_eq!(low.time_limit, TIME_LIMIT_MIN);

        let in_range = registry.create_session(3, 7).await.expect("create");
        assert_eq!(in_range.required_wins, 3);
        assert_eq!(in_range.time_limit, 7);
    }

    #[tokio::test]
    async fn test_created_session_is_immediately_visible_to_lookup() {
        let registry = SessionRegistry::new("ws://127.0.0.1:5000".to_string());
        let info = registry.create_session(3, 5).await.expect("create");

        let handle = registry.lookup(&info.code).await;
        assert!(handle.is_some());
        assert_eq!(handle.unwrap().code(), info.code);
        assert!(registry.lookup("NOPE!").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        // given:
        let registry = SessionRegistry::new("ws://127.0.0.1:5000".to_string());
        let info = registry.create_session(3, 5).await.expect("create");

        // when / then: first removal frees the slot, the second is a no-op
        assert!(registry.remove(&info.code).await);
        assert!(!registry.remove(&info.code).await);
        assert_eq!(registry.live_sessions().await, 0);
        assert!(registry.lookup(&info.code).await.is_none());
    }

    #[tokio::test]
    async fn test_websocket_url_points_at_the_connect_endpoint() {
        let registry = SessionRegistry::new("ws://example.test:5000".to_string());
        let info = registry.create_session(3, 5).await.expect("create");

        assert_eq!(
            info.websocket_url,
            format!("ws://example.test:5000/connect?gameId={}", info.code)
        );
        assert!(info.start_time > 0);
    }

    #[tokio::test]
    async fn test_seed_practice_registers_the_fixed_code_once() {
        let registry = SessionRegistry::new("ws://127.0.0.1:5000".to_string());

        registry.seed_practice().await;
        registry.seed_practice().await;

        assert_eq!(registry.live_sessions().await, 1);
        assert!(registry.lookup(PRACTICE_CODE).await.is_some());
    }
}
