use crate::application_port::AuthError;
use crate::domain_model::{NewUser, User, UserId};
use crate::domain_port::UserDirectory;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserDirectory {
    pool: MySqlPool,
}

impl MySqlUserDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserDirectory { pool }
    }
}

#[async_trait::async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            r#"
SELECT user_id, email, password_hash
FROM user
WHERE email = ?
"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(format!("query user by email: {e}")))?;

        Ok(row.map(|row| User {
            id: row.get::<UserId, _>("user_id"),
            email: row.get::<String, _>("email"),
            password_hash: row.get::<String, _>("password_hash"),
        }))
    }

    async fn create(&self, user: NewUser) -> Result<User, AuthError> {
        let user_id = UserId(uuid::Uuid::new_v4());

        sqlx::query(
            r#"
INSERT INTO user (user_id, email, password_hash)
VALUES (?, ?, ?)
"#,
        )
        .bind(user_id.0.as_bytes() as &[u8])
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(format!("insert user: {e}")))?;

        Ok(User {
            id: user_id,
            email: user.email,
            password_hash: user.password_hash,
        })
    }
}
