//! In-memory implementations of the account and refresh token traits.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        opaque_token::TokenGenerator,
        use_cases::{
            token::{IdentityRepo, RefreshTokenStore},
            user::{NewUser, UserCredentials, UserRepo},
        },
    },
    domain::entities::{
        identity::{Identity, Role},
        refresh_token::RefreshRecord,
        user::User,
    },
};

// ============================================================================
// InMemoryUserRepo
// ============================================================================

struct StoredUser {
    user: User,
    password_hash: String,
}

/// Users seeded through `with_users` have no usable password.
pub struct InMemoryUserRepo {
    users: Mutex<HashMap<i64, StoredUser>>,
    next_id: AtomicI64,
}

impl Default for InMemoryUserRepo {
    fn default() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let map = users
            .into_iter()
            .map(|user| {
                (
                    user.id,
                    StoredUser {
                        user,
                        password_hash: String::new(),
                    },
                )
            })
            .collect();
        Self {
            users: Mutex::new(map),
            next_id: AtomicI64::new(next_id),
        }
    }

    pub fn remove(&self, id: i64) {
        self.users.lock().unwrap().remove(&id);
    }

    pub fn set_role(&self, id: i64, role: Role) {
        if let Some(stored) = self.users.lock().unwrap().get_mut(&id) {
            stored.user.role = role;
        }
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|s| s.user.email == new_user.email) {
            return Err(AppError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            phone: new_user.phone.clone(),
            avatar: String::new(),
            role: new_user.role,
            is_email_verified: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: new_user.password_hash.clone(),
            },
        );
        Ok(user)
    }

    async fn get_credentials_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|s| s.user.email == email)
            .map(|s| UserCredentials {
                user: s.user.clone(),
                password_hash: s.password_hash.clone(),
            }))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).map(|s| s.user.clone()))
    }

    async fn touch_last_login(&self, id: i64) -> AppResult<()> {
        if let Some(stored) = self.users.lock().unwrap().get_mut(&id) {
            stored.user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityRepo for InMemoryUserRepo {
    async fn lookup_identity_by_id(&self, id: i64) -> AppResult<Option<Identity>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&id)
            .map(|s| s.user.identity()))
    }
}

// ============================================================================
// InMemoryRefreshTokenStore
// ============================================================================

#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    records: Mutex<HashMap<String, RefreshRecord>>,
    /// Successful inserts.
    pub puts: AtomicUsize,
    pub fail_puts: AtomicBool,
    pub fail_deletes: AtomicBool,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: RefreshRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.value.clone(), record);
    }

    pub fn get(&self, value: &str) -> Option<RefreshRecord> {
        self.records.lock().unwrap().get(value).cloned()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn put(&self, record: &RefreshRecord) -> AppResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(AppError::Database("store unavailable".into()));
        }
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.value) {
            return Err(AppError::Conflict);
        }
        records.insert(record.value.clone(), record.clone());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn take(&self, value: &str) -> AppResult<Option<RefreshRecord>> {
        let mut records = self.records.lock().unwrap();
        let live = records
            .get(value)
            .is_some_and(|r| !r.is_expired_at(Utc::now()));
        Ok(if live { records.remove(value) } else { None })
    }

    async fn delete_by_value(&self, value: &str) -> AppResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Database("store unavailable".into()));
        }
        self.records.lock().unwrap().remove(value);
        Ok(())
    }
}

// ============================================================================
// Token generators
// ============================================================================

/// Always yields the same value, for collision paths.
pub struct FixedTokenGenerator {
    value: String,
}

impl FixedTokenGenerator {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

impl TokenGenerator for FixedTokenGenerator {
    fn generate(&self) -> AppResult<String> {
        Ok(self.value.clone())
    }
}

pub struct FailingTokenGenerator;

impl TokenGenerator for FailingTokenGenerator {
    fn generate(&self) -> AppResult<String> {
        Err(AppError::Entropy("entropy source unavailable".into()))
    }
}
