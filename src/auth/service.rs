use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::hasher::CredentialHasher;
use super::token::{TokenClaims, TokenIssuer};
use super::validation::{validate, Schema, ValidationOutcome};
use crate::db::{NewUser, UserStore};
use crate::error::{AuthFailure, StoreError};
use crate::response::{LoginPayload, ResponseEnvelope, ResponseNormalizer};

const REGISTER_FAILED: &str = "Internal Server Error";
const LOGIN_FAILED: &str = "Unexpected error";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration and login over an abstract user store.
///
/// Each call is an independent unit of work; the service holds no mutable
/// state and is shared behind an `Arc` by the transport.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    issuer: Arc<dyn TokenIssuer>,
    normalizer: ResponseNormalizer,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        issuer: Arc<dyn TokenIssuer>,
        normalizer: ResponseNormalizer,
    ) -> Self {
        Self {
            store,
            hasher,
            issuer,
            normalizer,
        }
    }

    /// Handles `auth/store`. Always yields exactly one envelope.
    pub async fn register(&self, payload: &Value) -> ResponseEnvelope {
        match self.try_register(payload).await {
            Ok(()) => self.normalizer.normalize(201, "Success"),
            Err(failure) => self.normalizer.failure(&failure),
        }
    }

    /// Handles `auth/login`. Always yields exactly one envelope.
    pub async fn login(&self, payload: &Value) -> ResponseEnvelope {
        match self.try_login(payload).await {
            Ok(session) => self.normalizer.normalize(200, session),
            Err(failure) => self.normalizer.failure(&failure),
        }
    }

    async fn try_register(&self, payload: &Value) -> Result<(), AuthFailure> {
        let request: RegistrationRequest = parse(Schema::CreateUser, payload, REGISTER_FAILED)?;

        // Checked before hashing; the store's uniqueness on save still decides races.
        let existing = self
            .store
            .find_by_email(&request.email)
            .await
            .map_err(|e| unexpected("looking up user", e, REGISTER_FAILED))?;
        if existing.is_some() {
            info!("Registration rejected: email already exists");
            return Err(AuthFailure::DuplicateAccount);
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .await
            .map_err(|e| unexpected("hashing password", e, REGISTER_FAILED))?;

        let user = self
            .store
            .create(NewUser {
                email: request.email,
                password_hash,
                full_name: request.full_name,
            })
            .await
            .map_err(|e| unexpected("building user record", e, REGISTER_FAILED))?;

        match self.store.save(user).await {
            Ok(user) => {
                info!("Registered user {}", user.id);
                Ok(())
            }
            Err(StoreError::Duplicate) => {
                info!("Registration rejected: email claimed concurrently");
                Err(AuthFailure::DuplicateAccount)
            }
            Err(e) => Err(unexpected("saving user", e, REGISTER_FAILED)),
        }
    }

    async fn try_login(&self, payload: &Value) -> Result<LoginPayload, AuthFailure> {
        let request: LoginRequest = parse(Schema::LoginUser, payload, LOGIN_FAILED)?;

        let user = self
            .store
            .find_by_email(&request.email)
            .await
            .map_err(|e| unexpected("looking up user", e, LOGIN_FAILED))?
            .ok_or(AuthFailure::NotFound)?;

        if !self.hasher.verify(&request.password, &user.password_hash).await {
            warn!("Invalid password for user {}", user.id);
            return Err(AuthFailure::InvalidCredentials);
        }

        let claims = TokenClaims {
            subject: user.id.to_string(),
            email: user.email.clone(),
        };
        let token = self.issuer.issue(&claims).map_err(|e| {
            error!("Token generation failed for user {}: {}", user.id, e);
            AuthFailure::TokenIssuance
        })?;

        info!("User {} logged in", user.id);
        Ok(LoginPayload {
            token,
            email: user.email,
            name: user.full_name,
        })
    }
}

fn parse<T: serde::de::DeserializeOwned>(
    schema: Schema,
    payload: &Value,
    fallback: &'static str,
) -> Result<T, AuthFailure> {
    if let ValidationOutcome::Invalid(messages) = validate(schema, payload) {
        info!("{} payload rejected with {} violation(s)", schema.name(), messages.len());
        return Err(AuthFailure::Validation(messages));
    }

    T::deserialize(payload).map_err(|e| unexpected("reading validated payload", e, fallback))
}

fn unexpected(step: &str, cause: impl std::fmt::Display, message: &'static str) -> AuthFailure {
    error!("Unexpected failure while {}: {}", step, cause);
    AuthFailure::Unexpected(message)
}
