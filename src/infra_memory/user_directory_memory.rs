use crate::application_port::AuthError;
use crate::domain_model::{NewUser, User, UserId};
use crate::domain_port::UserDirectory;
use dashmap::DashMap;

/// In-memory directory keyed by email, for tests and demos.
pub struct MemoryUserDirectory {
    users: DashMap<String, User>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        MemoryUserDirectory {
            users: DashMap::new(),
        }
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.get(email).map(|u| u.clone()))
    }

    async fn create(&self, user: NewUser) -> Result<User, AuthError> {
        let record = User {
            id: UserId(uuid::Uuid::new_v4()),
            email: user.email,
            password_hash: user.password_hash,
        };
        self.users.insert(record.email.clone(), record.clone());
        Ok(record)
    }
}
