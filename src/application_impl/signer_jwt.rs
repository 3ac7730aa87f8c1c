use crate::application_port::{AccessToken, RefreshToken, TokenError, TokenSigner};
use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SignerConfig {
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Access and refresh secrets are independent: leaking one must not let
    /// an attacker forge the other token kind.
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id as string
    exp: i64,
    iat: i64,
    iss: String,
    jti: String, // per-token nonce; iat has second resolution, so two tokens
                 // signed in the same second would otherwise be identical
}

fn encode_token(
    uid: UserId,
    ttl: Duration,
    secret: &[u8],
    issuer: &str,
) -> Result<(String, DateTime<Utc>), TokenError> {
    let iat_dt = Utc::now();
    let exp_dt = iat_dt + ttl;
    let claims = Claims {
        sub: uid.to_string(),
        exp: exp_dt.timestamp(),
        iat: iat_dt.timestamp(),
        iss: issuer.to_string(),
        jti: uuid::Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Internal(e.to_string()))?;
    Ok((token, exp_dt))
}

fn decode_token(token: &str, secret: &[u8], issuer: &str) -> Result<UserId, TokenError> {
    let mut v = Validation::new(Algorithm::HS256);
    v.validate_exp = true;
    // Strict `now < exp`, no grace window.
    v.leeway = 0;
    v.set_issuer(&[issuer]);
    let data =
        decode::<Claims>(token, &DecodingKey::from_secret(secret), &v).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;
    data.claims
        .sub
        .parse::<UserId>()
        .map_err(|_| TokenError::Malformed)
}

/// HS256 signer over two independent secrets, one per token kind.
pub struct JwtHs256Signer {
    cfg: SignerConfig,
}

impl JwtHs256Signer {
    pub fn new(cfg: SignerConfig) -> Self {
        JwtHs256Signer { cfg }
    }
}

#[async_trait::async_trait]
impl TokenSigner for JwtHs256Signer {
    async fn sign_access(&self, user: UserId) -> Result<(AccessToken, DateTime<Utc>), TokenError> {
        let (token, exp_dt) = encode_token(
            user,
            self.cfg.access_ttl,
            &self.cfg.access_secret,
            &self.cfg.issuer,
        )?;
        Ok((AccessToken(token), exp_dt))
    }

    async fn sign_refresh(
        &self,
        user: UserId,
    ) -> Result<(RefreshToken, DateTime<Utc>), TokenError> {
        let (token, exp_dt) = encode_token(
            user,
            self.cfg.refresh_ttl,
            &self.cfg.refresh_secret,
            &self.cfg.issuer,
        )?;
        Ok((RefreshToken(token), exp_dt))
    }

    async fn verify_access(&self, token: &AccessToken) -> Result<UserId, TokenError> {
        decode_token(&token.0, &self.cfg.access_secret, &self.cfg.issuer)
    }

    async fn verify_refresh(&self, token: &RefreshToken) -> Result<UserId, TokenError> {
        decode_token(&token.0, &self.cfg.refresh_secret, &self.cfg.issuer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SignerConfig {
        SignerConfig {
            issuer: "gatehouse-test".to_string(),
            access_ttl: Duration::from_secs(60),
            refresh_ttl: Duration::from_secs(3600),
            access_secret: b"access-secret-for-tests".to_vec(),
            refresh_secret: b"refresh-secret-for-tests".to_vec(),
        }
    }

    fn new_user() -> UserId {
        UserId(uuid::Uuid::new_v4())
    }

    #[tokio::test]
    async fn access_token_round_trips_identity() {
        let signer = JwtHs256Signer::new(test_config());
        let user = new_user();

        let (token, _) = signer.sign_access(user).await.unwrap();
        assert_eq!(signer.verify_access(&token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn refresh_token_round_trips_identity() {
        let signer = JwtHs256Signer::new(test_config());
        let user = new_user();

        let (token, _) = signer.sign_refresh(user).await.unwrap();
        assert_eq!(signer.verify_refresh(&token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn tokens_signed_in_the_same_second_are_distinct() {
        let signer = JwtHs256Signer::new(test_config());
        let user = new_user();

        // iat/exp only have second resolution; the jti nonce must keep two
        // back-to-back tokens from coming out byte-identical.
        let (first, _) = signer.sign_refresh(user).await.unwrap();
        let (second, _) = signer.sign_refresh(user).await.unwrap();
        assert_ne!(first, second);

        let (first, _) = signer.sign_access(user).await.unwrap();
        let (second, _) = signer.sign_access(user).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn token_kinds_do_not_cross_verify() {
        let signer = JwtHs256Signer::new(test_config());
        let user = new_user();

        let (access, _) = signer.sign_access(user).await.unwrap();
        let (refresh, _) = signer.sign_refresh(user).await.unwrap();

        assert!(
            signer
                .verify_refresh(&RefreshToken(access.0))
                .await
                .is_err()
        );
        assert!(signer.verify_access(&AccessToken(refresh.0)).await.is_err());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let cfg = test_config();
        let signer = JwtHs256Signer::new(cfg.clone());

        let iat = Utc::now() - chrono::Duration::seconds(120);
        let claims = Claims {
            sub: new_user().to_string(),
            exp: (iat + chrono::Duration::seconds(60)).timestamp(),
            iat: iat.timestamp(),
            iss: cfg.issuer.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&cfg.access_secret),
        )
        .unwrap();

        let err = signer
            .verify_access(&AccessToken(token))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[tokio::test]
    async fn tampered_signature_is_rejected() {
        let signer = JwtHs256Signer::new(test_config());
        let (token, _) = signer.sign_access(new_user()).await.unwrap();

        let (head, sig) = token.0.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{}.{}{}", head, flipped, &sig[1..]);

        assert!(signer.verify_access(&AccessToken(tampered)).await.is_err());
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let signer = JwtHs256Signer::new(test_config());

        let err = signer
            .verify_access(&AccessToken("not-a-token".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }
}
