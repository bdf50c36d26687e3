use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

/// Sign-up form. The password is typed twice and both copies must agree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) password_confirmation: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_username(&self.username)?;
        let email = normalize_email(&self.email)?;
        if !(8..=128).contains(&self.password.chars().count()) {
            return Err(DomainError::Validation {
                field: "password",
                message: "must be 8..128 chars",
            });
        }
        if self.password != self.password_confirmation {
            return Err(DomainError::Validation {
                field: "password_confirmation",
                message: "does not match password",
            });
        }
        Ok(Self {
            username,
            email,
            ..self
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = self.username.trim();
        if username.is_empty() || username.len() > 64 {
            return Err(DomainError::Validation {
                field: "username",
                message: "must be 1..64 chars",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

/// Editable part of the caller's own account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdateProfileRequest {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
}

impl UpdateProfileRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            first_name: normalize_person_name("first_name", &self.first_name)?,
            last_name: normalize_person_name("last_name", &self.last_name)?,
            email: normalize_email(&self.email)?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) is_staff: bool,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let username = normalize_username(&username.into())?;
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            created_at,
        })
    }

    pub(crate) fn with_names(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    pub(crate) fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }
}

/// The owning user of a post or comment, as embedded in read models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Author {
    pub(crate) id: i64,
    pub(crate) username: String,
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    if username.len() < 3 || username.len() > 64 {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 3..64 chars",
        });
    }
    if !username
        .chars()
        .all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | '@' | '+'))
    {
        return Err(DomainError::Validation {
            field: "username",
            message: "may contain only letters, digits and @/./+/-/_",
        });
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}

fn normalize_person_name(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.chars().count() > 150 {
        return Err(DomainError::Validation {
            field,
            message: "must be at most 150 chars",
        });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        RegisterRequest, UpdateProfileRequest, User, normalize_email, normalize_username,
    };
    use crate::domain::error::DomainError;
    use chrono::Utc;

    #[test]
    fn user_new_rejects_non_positive_id() {
        let result = User::new(0, "valid_user", "test@example.com", Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  TeSt@Example.COM ").expect("must be valid");
        assert_eq!(value, "test@example.com");
    }

    #[test]
    fn username_rules_are_applied() {
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("has space").is_err());
        assert!(normalize_username("valid_user").is_ok());
        assert!(normalize_username("alice.b+blog@home").is_ok());
    }

    fn sign_up(password: &str, confirmation: &str) -> RegisterRequest {
        RegisterRequest {
            username: " valid_user ".to_string(),
            email: "Test@Example.com".to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn register_password_length_is_checked() {
        let err = sign_up("short", "short").validate().expect_err("too short");
        assert!(matches!(err, DomainError::Validation { field: "password", .. }));

        let validated = sign_up("very-secure-password", "very-secure-password")
            .validate()
            .expect("must be valid");
        assert_eq!(validated.username, "valid_user");
        assert_eq!(validated.email, "test@example.com");
    }

    #[test]
    fn register_requires_matching_confirmation() {
        let err = sign_up("very-secure-password", "very-secure-passw0rd")
            .validate()
            .expect_err("confirmation differs");
        assert!(matches!(
            err,
            DomainError::Validation {
                field: "password_confirmation",
                ..
            }
        ));
    }

    #[test]
    fn update_profile_allows_empty_names_but_not_bad_email() {
        let ok = UpdateProfileRequest {
            first_name: "  ".to_string(),
            last_name: " Smith ".to_string(),
            email: "Alice@Example.com".to_string(),
        }
        .validate()
        .expect("must be valid");
        assert_eq!(ok.first_name, "");
        assert_eq!(ok.last_name, "Smith");
        assert_eq!(ok.email, "alice@example.com");

        let err = UpdateProfileRequest {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "not-an-email".to_string(),
        }
        .validate()
        .expect_err("email must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "email", .. }));
    }
}
