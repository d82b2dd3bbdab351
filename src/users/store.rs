//! User Storage
//! Mission: Persist user accounts in SQLite with unique usernames and emails

use crate::error::{StoreError, UniqueField};
use crate::users::models::{NewUser, User};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

const USER_COLUMNS: &str = "id, username, email, password_digest, created_at";

/// User storage with SQLite backend
///
/// A single connection behind an async mutex: the existence checks and the
/// write of one operation run under the same lock, and the UNIQUE constraints
/// catch anything the checks miss.
#[derive(Clone)]
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
}

impl UserStore {
    /// Open (or create) the database file and initialize the schema
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(db_path)?)
    }

    /// Private in-memory database, used by tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_digest TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a new user. The username is checked before the email.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let conn = self.conn.lock().await;

        if let Some(field) = conflicting_field(&conn, &new_user.username, &new_user.email)? {
            return Err(StoreError::Duplicate(field));
        }

        let created_at = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO users (username, email, password_digest, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                new_user.username,
                new_user.email,
                new_user.password_digest,
                created_at,
            ],
        )
        .map_err(map_constraint)?;

        let user = User {
            id: conn.last_insert_rowid(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_digest: new_user.password_digest.clone(),
            created_at,
        };

        info!("✅ Created user: {} ({})", user.username, user.id);

        Ok(user)
    }

    /// First field already taken by some user, username before email
    pub async fn find_conflict(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<UniqueField>, StoreError> {
        let conn = self.conn.lock().await;
        conflicting_field(&conn, username, email)
    }

    /// Page through users ordered by id
    pub async fn list(&self, offset: u32, limit: u32) -> Result<Vec<User>, StoreError> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;

        let users = stmt
            .query_map(params![limit, offset], row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    pub async fn get(&self, id: i64) -> Result<Option<User>, StoreError> {
        let conn = self.conn.lock().await;
        find_by_id(&conn, id)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = self.conn.lock().await;

        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                params![username],
                row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    /// Replace username, email and digest. Returns `None` if no such user.
    pub async fn update(&self, id: i64, changes: &NewUser) -> Result<Option<User>, StoreError> {
        let conn = self.conn.lock().await;

        let rows_affected = conn
            .execute(
                "UPDATE users SET username = ?1, email = ?2, password_digest = ?3 WHERE id = ?4",
                params![
                    changes.username,
                    changes.email,
                    changes.password_digest,
                    id
                ],
            )
            .map_err(map_constraint)?;

        if rows_affected == 0 {
            return Ok(None);
        }

        info!("✏️  Updated user: {} ({})", changes.username, id);

        find_by_id(&conn, id)
    }

    /// Delete a user by id. Returns `false` if no such user.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;

        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        if rows_affected > 0 {
            info!("🗑️  Deleted user: {}", id);
        }

        Ok(rows_affected > 0)
    }
}

fn conflicting_field(
    conn: &Connection,
    username: &str,
    email: &str,
) -> Result<Option<UniqueField>, StoreError> {
    if exists(conn, "username", username)? {
        return Ok(Some(UniqueField::Username));
    }
    if exists(conn, "email", email)? {
        return Ok(Some(UniqueField::Email));
    }
    Ok(None)
}

fn exists(conn: &Connection, column: &str, value: &str) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM users WHERE {column} = ?1"),
            params![value],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn find_by_id(conn: &Connection, id: i64) -> Result<Option<User>, StoreError> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_digest: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Turn a UNIQUE constraint failure into the matching duplicate error
fn map_constraint(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            if message.contains("users.username") {
                return StoreError::Duplicate(UniqueField::Username);
            }
            if message.contains("users.email") {
                return StoreError::Duplicate(UniqueField::Email);
            }
        }
    }
    StoreError::Sqlite(err)
}
