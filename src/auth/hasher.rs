use async_trait::async_trait;
use tracing::warn;

use crate::error::HashError;

pub const DEFAULT_HASH_COST: u32 = 10;

/// One-way hashing of plaintext secrets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// A malformed stored hash is a failed verification, not an error.
    async fn verify(&self, plaintext: &str, hashed: &str) -> bool;
}

/// bcrypt with a fixed cost. Work runs on the blocking pool so it does not
/// stall the async workers.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_COST)
    }
}

#[async_trait]
impl CredentialHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| HashError::Aborted(e.to_string()))?
            .map_err(HashError::from)
    }

    async fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let hashed = hashed.to_owned();

        match tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hashed)).await {
            Ok(Ok(valid)) => valid,
            Ok(Err(e)) => {
                warn!("Stored password hash could not be checked: {}", e);
                false
            }
            Err(e) => {
                warn!("Password verification task aborted: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast.
    fn hasher() -> BcryptHasher {
        BcryptHasher::new(4)
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hashed = hasher().hash("secret1").await.unwrap();

        assert_ne!(hashed, "secret1");
        assert!(hashed.starts_with("$2b$04$"));
        assert!(hasher().verify("secret1", &hashed).await);
        assert!(!hasher().verify("wrong1", &hashed).await);
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let first = hasher().hash("secret1").await.unwrap();
        let second = hasher().hash("secret1").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_hash_fails_verification() {
        assert!(!hasher().verify("secret1", "not-a-bcrypt-hash").await);
        assert!(!hasher().verify("secret1", "").await);
    }

    #[tokio::test]
    async fn test_invalid_cost_is_an_error() {
        let result = BcryptHasher::new(99).hash("secret1").await;
        assert!(matches!(result, Err(HashError::Bcrypt(_))));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(BcryptHasher::default().cost(), 10);
    }
}
