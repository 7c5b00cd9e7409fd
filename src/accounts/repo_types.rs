use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,                    // surrogate key, assigned on insert
    pub username: String,
    pub email: String,              // login identifier
    pub password_hash: String,      // Argon2 PHC string, never sent to clients
    pub created_at: OffsetDateTime,
}

/// Row to be inserted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
