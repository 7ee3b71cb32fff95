use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::auth_dto::{LoginRequest, RegisterRequest};
use crate::error::{Error, Result};
use crate::models::User;
use crate::stores::UserStore;
use crate::utils::crypto::{hash_password, verify_password};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    jwt_expiry_hours: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: String, jwt_expiry_hours: i64) -> Self {
        Self {
            users,
            jwt_secret,
            jwt_expiry_hours,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        if self.users.exists_by_email(&req.email).await? {
            return Err(Error::Conflict("email already exists".to_string()));
        }
        if self.users.exists_by_username(&req.username).await? {
            return Err(Error::Conflict("username already exists".to_string()));
        }

        let password_hash = hash_password(&req.password)?;
        let user = User::new(req.username, req.email, password_hash);
        self.users.create(&user).await?;
        Ok(user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<(String, User)> {
        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| Error::Unauthorized("invalid email or password".to_string()))?;

        let valid = verify_password(&req.password, &user.password_hash)?;
        if !valid {
            return Err(Error::Unauthorized("invalid email or password".to_string()));
        }

        let token = self.generate_token(&user)?;
        Ok((token, user))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| Error::Unauthorized("invalid or expired token".to_string()))
    }

    fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expires = now + Duration::hours(self.jwt_expiry_hours);
        let claims = Claims {
            sub: user.id.to_string(),
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.timestamp() as usize,
            exp: expires.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryUserStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserStore::new()),
            "test-secret".to_string(),
            1,
        )
    }

    fn register_req(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn register_login_and_validate_roundtrip() {
        let svc = service();
        let user = svc.register(register_req("alice", "alice@example.com")).await.unwrap();
        assert_ne!(user.password_hash, "password123");

        let (token, logged_in) = svc
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);

        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.sub, user.id.to_string());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_and_username() {
        let svc = service();
        svc.register(register_req("alice", "alice@example.com")).await.unwrap();

        let dup_email = svc.register(register_req("bob", "alice@example.com")).await;
        assert!(matches!(dup_email, Err(Error::Conflict(_))));

        let dup_username = svc.register(register_req("alice", "bob@example.com")).await;
        assert!(matches!(dup_username, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let svc = service();
        svc.register(register_req("alice", "alice@example.com")).await.unwrap();

        let wrong_password = svc
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await;
        assert!(matches!(wrong_password, Err(Error::Unauthorized(_))));

        let unknown_user = svc
            .login(LoginRequest {
                email: "carol@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await;
        assert!(matches!(unknown_user, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn validate_rejects_garbage_and_foreign_tokens() {
        let svc = service();
        assert!(svc.validate_token("not-a-token").is_err());

        let other = AuthService::new(
            Arc::new(MemoryUserStore::new()),
            "different-secret".to_string(),
            1,
        );
        let user = other.register(register_req("mallory", "m@example.com")).await.unwrap();
        let token = other.generate_token(&user).unwrap();
        assert!(svc.validate_token(&token).is_err());
    }
}
