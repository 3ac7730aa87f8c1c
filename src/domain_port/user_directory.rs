use crate::application_port::AuthError;
use crate::domain_model::{NewUser, User};

/// User record storage, owned elsewhere. The auth core only ever looks up by
/// email and creates; uniqueness enforcement beyond the pre-check belongs to
/// the backing store.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
    async fn create(&self, user: NewUser) -> Result<User, AuthError>;
}
