use crate::application_port::CredentialHasher;
use std::sync::Arc;
use tracing::debug;

/// Compares a submitted password against a stored hash. Fails closed: any
/// error out of the hash capability reads as "does not match", never as a
/// distinct outcome the caller could misinterpret. The plaintext is never
/// logged or retained.
pub struct CredentialVerifier {
    hasher: Arc<dyn CredentialHasher>,
}

impl CredentialVerifier {
    pub fn new(hasher: Arc<dyn CredentialHasher>) -> Self {
        CredentialVerifier { hasher }
    }

    pub async fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match self.hasher.verify_password(password, stored_hash).await {
            Ok(matches) => matches,
            Err(e) => {
                debug!(error = %e, "credential comparison failed, failing closed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::Argon2CredentialHasher;

    #[tokio::test]
    async fn matching_password_is_accepted() {
        let hasher = Arc::new(Argon2CredentialHasher);
        let hash = hasher.hash_password("swordfish").await.unwrap();
        let verifier = CredentialVerifier::new(hasher);

        assert!(verifier.verify("swordfish", &hash).await);
    }

    #[tokio::test]
    async fn mismatching_password_is_rejected() {
        let hasher = Arc::new(Argon2CredentialHasher);
        let hash = hasher.hash_password("swordfish").await.unwrap();
        let verifier = CredentialVerifier::new(hasher);

        assert!(!verifier.verify("trout", &hash).await);
    }

    #[tokio::test]
    async fn hasher_failure_reads_as_mismatch() {
        let verifier = CredentialVerifier::new(Arc::new(Argon2CredentialHasher));

        assert!(!verifier.verify("swordfish", "corrupted-hash").await);
    }
}
