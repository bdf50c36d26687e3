use std::sync::Arc;

use tracing::{info, warn};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::password;

/// A signed-in account and the bearer token that proves it.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) account: User,
    pub(crate) access_token: String,
    pub(crate) expires_in: i64,
}

/// Sign-up, sign-in and "who am I" for bearer-token clients.
pub(crate) struct AuthService<R: UserRepository> {
    users: R,
    tokens: Arc<JwtService>,
}

impl<R: UserRepository> AuthService<R> {
    pub(crate) fn new(users: R, tokens: Arc<JwtService>) -> Self {
        Self { users, tokens }
    }

    /// Creates the account and signs it in right away.
    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<Session, DomainError> {
        let RegisterRequest {
            username,
            email,
            password,
            ..
        } = req.validate()?;

        let account = self
            .users
            .create_user(NewUser {
                username,
                email,
                password_hash: password::hash_password(&password)?,
            })
            .await?;
        info!(user_id = account.id, username = %account.username, "account registered");

        self.open_session(account)
    }

    /// Unknown username and wrong password are indistinguishable to the caller.
    pub(crate) async fn login(&self, req: LoginRequest) -> Result<Session, DomainError> {
        let req = req.validate()?;

        let Some(credentials) = self.users.find_by_username(&req.username).await? else {
            password::spend_decoy_check(&req.password)?;
            warn!(username = %req.username, "sign-in for unknown username");
            return Err(DomainError::InvalidCredentials);
        };

        if !password::password_matches(&req.password, &credentials.password_hash)? {
            warn!(user_id = credentials.user.id, "sign-in with wrong password");
            return Err(DomainError::InvalidCredentials);
        }
        info!(user_id = credentials.user.id, "signed in");

        self.open_session(credentials.user)
    }

    pub(crate) async fn current_account(&self, user_id: i64) -> Result<User, DomainError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {user_id}")))
    }

    fn open_session(&self, account: User) -> Result<Session, DomainError> {
        let access_token = self
            .tokens
            .generate_token(account.id, &account.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(Session {
            account,
            access_token,
            expires_in: self.tokens.ttl_seconds(),
        })
    }
}
