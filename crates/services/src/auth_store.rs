use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use uuid::Uuid;

use prep_core::model::{Role, User, UserId};
use storage::{KeyValueStore, keys};

use crate::error::AuthError;
use crate::subject::{Subject, SubscriptionId};

/// Simulated network round-trip for login and signup.
const SIMULATED_LATENCY: Duration = Duration::from_secs(1);

/// The fixed credential table consumed by `login`.
struct Credential {
    email: &'static str,
    password: &'static str,
    id: &'static str,
    name: &'static str,
    role: Role,
}

const CREDENTIALS: [Credential; 2] = [
    Credential {
        email: "admin@test.com",
        password: "admin123",
        id: "1",
        name: "Admin User",
        role: Role::Admin,
    },
    Credential {
        email: "user@test.com",
        password: "user123",
        id: "2",
        name: "John Doe",
        role: Role::User,
    },
];

/// Owns the at-most-one authenticated session.
///
/// The session is mirrored across two persistence keys, token and identity;
/// both must be present to restore on startup. Login and signup complete
/// after a fixed delay; dropping the future before completion leaves the
/// store untouched.
#[derive(Clone)]
pub struct AuthStore {
    kv: Arc<dyn KeyValueStore>,
    current: Subject<Option<User>>,
    delay: Duration,
    degraded: Arc<AtomicBool>,
}

impl AuthStore {
    /// Build the store, restoring a persisted session when both keys are
    /// present and the identity parses; anything else starts logged out and
    /// clears both keys.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_delay(kv, SIMULATED_LATENCY)
    }

    /// Same as [`AuthStore::new`] with an explicit simulated latency.
    #[must_use]
    pub fn with_delay(kv: Arc<dyn KeyValueStore>, delay: Duration) -> Self {
        let initial = restore_session(kv.as_ref());
        Self {
            kv,
            current: Subject::new(initial),
            delay,
            degraded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Registers a subscriber; it immediately receives the current session.
    pub fn subscribe(
        &self,
        callback: impl Fn(&Option<User>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.current.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.current.unsubscribe(id);
    }

    /// The current session, `None` when logged out.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.current.latest()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current.latest().is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current.latest().is_some_and(|u| u.is_admin())
    }

    /// Authenticate against the fixed credential table.
    ///
    /// Resolves after the simulated delay. On success the session is
    /// persisted and published before this future completes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for any pair outside the
    /// table; the current session is left unchanged.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        _remember_me: bool,
    ) -> Result<User, AuthError> {
        tokio::time::sleep(self.delay).await;

        let matched = CREDENTIALS
            .iter()
            .find(|c| c.email == email && c.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let user = User {
            id: UserId::new(matched.id),
            name: matched.name.to_owned(),
            email: matched.email.to_owned(),
            role: matched.role,
        };
        self.establish(user.clone());
        Ok(user)
    }

    /// Create a fresh user-role session.
    ///
    /// The password check happens synchronously, before the simulated delay
    /// and before any persistence write. There is deliberately no uniqueness
    /// check against existing accounts; no account directory exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` when the passwords differ.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AuthError> {
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        tokio::time::sleep(self.delay).await;

        let user = User {
            id: UserId::generate(),
            name: name.to_owned(),
            email: email.to_owned(),
            role: Role::User,
        };
        self.establish(user.clone());
        Ok(user)
    }

    /// Clear the session synchronously and publish the logged-out state.
    ///
    /// Navigating back to the login entry point is the caller's side effect.
    pub fn logout(&self) {
        for key in [keys::AUTH_TOKEN, keys::USER_DATA] {
            if let Err(e) = self.kv.remove(key) {
                tracing::warn!(key, error = %e, "session key removal failed");
                self.degraded.store(true, Ordering::Relaxed);
            }
        }
        self.current.publish(None);
    }

    /// True once a persistence write has failed this session.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn establish(&self, user: User) {
        let token = Uuid::new_v4().to_string();
        if let Err(e) = self.kv.write(keys::AUTH_TOKEN, &token) {
            tracing::warn!(error = %e, "token write failed, session is memory-only");
            self.degraded.store(true, Ordering::Relaxed);
        }
        match serde_json::to_string(&user) {
            Ok(encoded) => {
                if let Err(e) = self.kv.write(keys::USER_DATA, &encoded) {
                    tracing::warn!(error = %e, "identity write failed, session is memory-only");
                    self.degraded.store(true, Ordering::Relaxed);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "identity encode failed");
                self.degraded.store(true, Ordering::Relaxed);
            }
        }
        tracing::debug!(role = %user.role, "session established");
        self.current.publish(Some(user));
    }
}

fn restore_session(kv: &dyn KeyValueStore) -> Option<User> {
    let token = kv.read(keys::AUTH_TOKEN).ok().flatten();
    let identity = kv.read(keys::USER_DATA).ok().flatten();

    if let (Some(_token), Some(raw)) = (token, identity) {
        match serde_json::from_str(&raw) {
            Ok(user) => return Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "persisted identity is corrupt, logging out");
            }
        }
    }

    // Half-present or unparsable state is treated as logged out.
    let _ = kv.remove(keys::AUTH_TOKEN);
    let _ = kv.remove(keys::USER_DATA);
    None
}
