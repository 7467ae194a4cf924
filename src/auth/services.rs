use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use super::{
    dto::AuthResponse,
    jwt::JwtKeys,
    password::hash_password,
    repo_types::{NewUser, User},
};
use crate::{config::AdminBootstrap, store::Store};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Sign a fresh access/refresh pair for `user`.
pub fn issue_tokens(keys: &JwtKeys, user: User) -> anyhow::Result<AuthResponse> {
    Ok(AuthResponse {
        access_token: keys.sign_access(user.id)?,
        refresh_token: keys.sign_refresh(user.id)?,
        user: user.into(),
    })
}

/// Create the configured superuser unless an account with that email exists.
/// An existing account is left untouched.
pub async fn ensure_admin(store: &dyn Store, admin: &AdminBootstrap) -> anyhow::Result<User> {
    let email = normalize_email(&admin.email);
    anyhow::ensure!(is_valid_email(&email), "ADMIN_EMAIL is not a valid email");

    if let Some(existing) = store.find_user_by_email(&email).await? {
        if !existing.is_superuser {
            tracing::warn!(%email, "bootstrap admin email belongs to a regular user");
        }
        return Ok(existing);
    }

    let user = store
        .create_user(NewUser {
            email,
            password_hash: Some(hash_password(&admin.password)?),
            is_superuser: true,
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "superuser created");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::password::verify_password, store::MemoryStore};

    #[test]
    fn email_validation() {
        assert!(is_valid_email("test@user.com"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spaces in@mail.com"));
        assert!(!is_valid_email("user@localhost"));
        assert_eq!(normalize_email("  Test@User.COM "), "test@user.com");
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let store = MemoryStore::new();
        let admin = AdminBootstrap {
            email: "Admin@Shop.io".into(),
            password: "supersecret".into(),
        };

        let first = ensure_admin(&store, &admin).await.unwrap();
        assert!(first.is_superuser);
        assert_eq!(first.email, "admin@shop.io");
        let hash = first.password_hash.clone().unwrap();
        assert!(verify_password("supersecret", &hash).unwrap());

        let second = ensure_admin(&store, &admin).await.unwrap();
        assert_eq!(first.id, second.id);
    }
}
