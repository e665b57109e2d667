use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::PortalError;
use crate::models::{Role, User, UserPatch};
use crate::store::{RecordStore, USERS_KEY};

pub const MIN_PASSWORD_LEN: usize = 6;

/// In-memory bearer-token sessions. Tokens map to user ids; user records
/// themselves live in the store.
#[derive(Default)]
pub struct SessionManager {
    tokens: Mutex<HashMap<String, String>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), user_id.to_string());
        token
    }

    pub fn user_id_for(&self, token: &str) -> Option<String> {
        self.tokens.lock().unwrap().get(token).cloned()
    }

    pub fn revoke(&self, token: &str) {
        self.tokens.lock().unwrap().remove(token);
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

pub fn list_users(store: &RecordStore) -> Vec<User> {
    store.load(USERS_KEY, vec![])
}

pub fn find_user(store: &RecordStore, id: &str) -> Option<User> {
    list_users(store).into_iter().find(|u| u.id == id)
}

/// Registers an account. Email is lowercased and must be unique.
pub fn register(
    store: &RecordStore,
    payload: RegisterPayload,
    role: Role,
    now: NaiveDateTime,
) -> Result<User, PortalError> {
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(PortalError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(PortalError::Validation("name is required".to_string()));
    }
    let email = payload.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(PortalError::Validation("invalid email".to_string()));
    }

    let mut users = list_users(store);
    if users.iter().any(|u| u.email == email) {
        return Err(PortalError::Validation(
            "a user with this email already exists".to_string(),
        ));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name,
        email,
        phone: payload.phone.trim().to_string(),
        password: payload.password,
        role,
        created_at: now,
    };
    users.push(user.clone());
    store.save(USERS_KEY, &users)?;
    Ok(user)
}

pub fn login(store: &RecordStore, email: &str, password: &str) -> Result<User, PortalError> {
    let email = email.trim().to_lowercase();
    list_users(store)
        .into_iter()
        .find(|u| u.email == email && u.password == password)
        .ok_or(PortalError::Unauthorized)
}

/// Admin profile edit; an email change is re-checked for uniqueness against
/// the other users.
pub fn update_user(store: &RecordStore, id: &str, patch: UserPatch) -> Result<User, PortalError> {
    let mut users = list_users(store);

    let email = match patch.email {
        Some(raw) => {
            let email = raw.trim().to_lowercase();
            if users.iter().any(|u| u.email == email && u.id != id) {
                return Err(PortalError::Validation(
                    "email is already in use".to_string(),
                ));
            }
            Some(email)
        }
        None => None,
    };

    let user = users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| PortalError::NotFound(format!("user {id}")))?;

    if let Some(name) = patch.name {
        user.name = name.trim().to_string();
    }
    if let Some(email) = email {
        user.email = email;
    }
    if let Some(phone) = patch.phone {
        user.phone = phone.trim().to_string();
    }
    if let Some(role) = patch.role {
        user.role = role;
    }

    let updated = user.clone();
    store.save(USERS_KEY, &users)?;
    Ok(updated)
}

pub fn reset_password(store: &RecordStore, id: &str, next: &str) -> Result<(), PortalError> {
    if next.len() < MIN_PASSWORD_LEN {
        return Err(PortalError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let mut users = list_users(store);
    let user = users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| PortalError::NotFound(format!("user {id}")))?;
    user.password = next.to_string();
    store.save(USERS_KEY, &users)?;
    Ok(())
}

pub fn change_own_password(
    store: &RecordStore,
    user_id: &str,
    current: &str,
    next: &str,
) -> Result<(), PortalError> {
    let user = find_user(store, user_id).ok_or(PortalError::Unauthorized)?;
    if user.password != current {
        return Err(PortalError::Validation(
            "current password is incorrect".to_string(),
        ));
    }
    reset_password(store, user_id, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> RecordStore {
        let store = RecordStore::open_in_memory().unwrap();
        store.save(USERS_KEY, &Vec::<User>::new()).unwrap();
        store
    }

    fn now() -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }

    fn payload(email: &str) -> RegisterPayload {
        RegisterPayload {
            name: "Иван".to_string(),
            email: email.to_string(),
            phone: "+7 (999) 111-22-33".to_string(),
            password: "secret123".to_string(),
        }
    }

    #[test]
    fn test_register_and_login() {
        let store = setup();
        let user = register(&store, payload("Ivan@Example.com"), Role::User, now()).unwrap();
        assert_eq!(user.email, "ivan@example.com");

        // Login is case-insensitive on email
        assert!(login(&store, "IVAN@example.COM", "secret123").is_ok());
        assert!(matches!(
            login(&store, "ivan@example.com", "wrong"),
            Err(PortalError::Unauthorized)
        ));
    }

    #[test]
    fn test_duplicate_email_rejected_case_insensitively() {
        let store = setup();
        register(&store, payload("ivan@example.com"), Role::User, now()).unwrap();
        let result = register(&store, payload("IVAN@EXAMPLE.COM"), Role::User, now());
        assert!(matches!(result, Err(PortalError::Validation(_))));
    }

    #[test]
    fn test_short_password_rejected() {
        let store = setup();
        let mut p = payload("a@b.ru");
        p.password = "12345".to_string();
        assert!(register(&store, p, Role::User, now()).is_err());
    }

    #[test]
    fn test_update_user_email_uniqueness() {
        let store = setup();
        register(&store, payload("first@example.com"), Role::User, now()).unwrap();
        let second = register(&store, payload("second@example.com"), Role::User, now()).unwrap();

        let patch = UserPatch {
            email: Some("first@example.com".to_string()),
            ..Default::default()
        };
        assert!(update_user(&store, &second.id, patch).is_err());

        // Keeping your own email is fine
        let patch = UserPatch {
            email: Some("SECOND@example.com".to_string()),
            role: Some(Role::Admin),
            ..Default::default()
        };
        let updated = update_user(&store, &second.id, patch).unwrap();
        assert_eq!(updated.email, "second@example.com");
        assert_eq!(updated.role, Role::Admin);
    }

    #[test]
    fn test_change_own_password_checks_current() {
        let store = setup();
        let user = register(&store, payload("ivan@example.com"), Role::User, now()).unwrap();

        assert!(change_own_password(&store, &user.id, "wrong", "newsecret").is_err());
        change_own_password(&store, &user.id, "secret123", "newsecret").unwrap();
        assert!(login(&store, "ivan@example.com", "newsecret").is_ok());
    }

    #[test]
    fn test_sessions() {
        let sessions = SessionManager::new();
        let token = sessions.create("u-1");
        assert_eq!(sessions.user_id_for(&token).as_deref(), Some("u-1"));
        sessions.revoke(&token);
        assert!(sessions.user_id_for(&token).is_none());
    }
}
