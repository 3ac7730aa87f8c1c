use crate::application_impl::CredentialVerifier;
use crate::application_port::{
    AccessToken, AuthError, AuthService, CredentialHasher, LoginInput, LoginResult,
    RefreshToken, RegistrationInput, TokenPair, TokenService,
};
use crate::domain_model::{NewUser, UserId};
use crate::domain_port::UserDirectory;
use std::sync::Arc;
use tracing::debug;

/// Composes the directory, the hash capability and the token service into
/// the user-facing flows. Directory lookups always happen before any token
/// work, so no store lock is ever held across them.
pub struct RealAuthService {
    directory: Arc<dyn UserDirectory>,
    hasher: Arc<dyn CredentialHasher>,
    verifier: CredentialVerifier,
    tokens: Arc<dyn TokenService>,
}

impl RealAuthService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        let verifier = CredentialVerifier::new(hasher.clone());
        RealAuthService {
            directory,
            hasher,
            verifier,
            tokens,
        }
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput { email, password } = request;

        let user = self
            .directory
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.verifier.verify(&password, &user.password_hash).await {
            debug!(%email, "incorrect password");
            return Err(AuthError::Unauthorized);
        }

        let tokens = self.tokens.issue(user.id).await?;
        Ok(LoginResult {
            user_id: user.id,
            tokens,
        })
    }

    async fn registration(&self, request: RegistrationInput) -> Result<LoginResult, AuthError> {
        let RegistrationInput { email, password } = request;

        if self.directory.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserExists);
        }

        let password_hash = self.hasher.hash_password(&password).await?;
        let user = self
            .directory
            .create(NewUser {
                email,
                password_hash,
            })
            .await?;

        let tokens = self.tokens.issue(user.id).await?;
        Ok(LoginResult {
            user_id: user.id,
            tokens,
        })
    }

    async fn logout(&self, refresh_token: &RefreshToken) -> Result<(), AuthError> {
        match self.tokens.verify_refresh(refresh_token).await {
            Ok(user_id) => self.tokens.revoke(user_id).await,
            // An invalid, expired or already-rotated token still means "not
            // logged in", which is the end state logout promises.
            Err(AuthError::Unauthorized) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<TokenPair, AuthError> {
        self.tokens.rotate(refresh_token).await
    }

    async fn parse_authorization_header(&self, header: &str) -> Result<UserId, AuthError> {
        let mut parts = header.split_whitespace();
        let (Some("Bearer"), Some(credential)) = (parts.next(), parts.next()) else {
            debug!("incorrect auth headers");
            return Err(AuthError::Unauthorized);
        };

        self.tokens
            .verify_access(&AccessToken(credential.to_string()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{
        Argon2CredentialHasher, JwtHs256Signer, SessionTokenService, SignerConfig,
    };
    use crate::infra_memory::{MemoryTokenStore, MemoryUserDirectory};
    use std::time::Duration;

    fn auth_service() -> RealAuthService {
        let signer = Arc::new(JwtHs256Signer::new(SignerConfig {
            issuer: "gatehouse-test".to_string(),
            access_ttl: Duration::from_secs(60),
            refresh_ttl: Duration::from_secs(3600),
            access_secret: b"access-secret-for-tests".to_vec(),
            refresh_secret: b"refresh-secret-for-tests".to_vec(),
        }));
        let tokens = Arc::new(SessionTokenService::new(
            signer,
            Arc::new(MemoryTokenStore::new()),
        ));
        RealAuthService::new(
            Arc::new(MemoryUserDirectory::new()),
            Arc::new(Argon2CredentialHasher),
            tokens,
        )
    }

    fn registration(email: &str) -> RegistrationInput {
        RegistrationInput {
            email: email.to_string(),
            password: "swordfish".to_string(),
        }
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_not_found() {
        let auth = auth_service();

        let err = auth
            .login(LoginInput {
                email: "a@x.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let auth = auth_service();
        auth.registration(registration("a@x.com")).await.unwrap();

        let err = auth
            .login(LoginInput {
                email: "a@x.com".to_string(),
                password: "trout".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn duplicate_registration_is_reported_and_issues_nothing() {
        let auth = auth_service();
        let first = auth.registration(registration("a@x.com")).await.unwrap();

        let err = auth
            .registration(registration("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserExists));

        // The first session is untouched: no overwrite happened.
        assert!(
            auth.refresh_access_token(&first.tokens.refresh_token)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn login_issues_a_verifiable_pair() {
        let auth = auth_service();
        auth.registration(registration("a@x.com")).await.unwrap();

        let result = auth
            .login(LoginInput {
                email: "a@x.com".to_string(),
                password: "swordfish".to_string(),
            })
            .await
            .unwrap();

        let header = format!("Bearer {}", result.tokens.access_token.0);
        assert_eq!(
            auth.parse_authorization_header(&header).await.unwrap(),
            result.user_id
        );
    }

    #[tokio::test]
    async fn authorization_header_requires_bearer_scheme_and_credential() {
        let auth = auth_service();

        for header in ["Basic abc123", "Bearer ", "Bearer", "", "bearer token"] {
            let err = auth.parse_authorization_header(header).await.unwrap_err();
            assert!(matches!(err, AuthError::Unauthorized), "header: {header:?}");
        }
    }

    #[tokio::test]
    async fn refresh_returns_a_new_pair_and_retires_the_old_one() {
        let auth = auth_service();
        let registered = auth.registration(registration("a@x.com")).await.unwrap();

        let rotated = auth
            .refresh_access_token(&registered.tokens.refresh_token)
            .await
            .unwrap();

        let header = format!("Bearer {}", rotated.access_token.0);
        assert_eq!(
            auth.parse_authorization_header(&header).await.unwrap(),
            registered.user_id
        );
        assert!(
            auth.refresh_access_token(&registered.tokens.refresh_token)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn logout_swallows_invalid_tokens() {
        let auth = auth_service();

        auth.logout(&RefreshToken("garbage".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn logout_ends_the_session_and_repeats_cleanly() {
        let auth = auth_service();
        let registered = auth.registration(registration("a@x.com")).await.unwrap();

        auth.logout(&registered.tokens.refresh_token).await.unwrap();
        assert!(
            auth.refresh_access_token(&registered.tokens.refresh_token)
                .await
                .is_err()
        );

        // Second logout with the now-dead token is still a success.
        auth.logout(&registered.tokens.refresh_token).await.unwrap();
    }
}
