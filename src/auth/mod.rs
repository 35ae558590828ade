//! Authentication pipeline
//!
//! Validation, password hashing, token issuance and the service that
//! sequences them for registration and login.

pub mod handlers;
pub mod hasher;
pub mod service;
pub mod token;
pub mod validation;

pub use hasher::{BcryptHasher, CredentialHasher};
pub use service::{AuthService, LoginRequest, RegistrationRequest};
pub use token::{Claims, JwtIssuer, TokenClaims, TokenIssuer};
pub use validation::{validate, Schema, ValidationOutcome};
