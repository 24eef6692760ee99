//! SQLite Kitchen Store
//!
//! File-based persistent storage using SQLite. Ratings reference their
//! kitchen through a foreign key; kitchen deletion removes ratings
//! explicitly inside the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::domain::models::{
    AccountRole, GeoPoint, Kitchen, KitchenId, KitchenPatch, NewKitchen, NewUser, Rating,
    RatingId, RatingOp, RatingWrite, RatingWriteOutcome, StoreStats, User, UserId,
};
use crate::domain::ports::KitchenStore;
use crate::error::{Result, StorageError};

const KITCHEN_COLUMNS: &str = "id, name, address, contact_phone, latitude, longitude, \
     average_rating, operating_hours, operational_status, accessibility_features, \
     version, created_at, updated_at";

const RATING_COLUMNS: &str = "id, kitchen_id, user_id, user_name, score, comments, \
     wait_time_secs, comment_url, publish_time, relative_time, created_at";

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at";

/// SQLite-based KitchenStore implementation
#[derive(Clone)]
pub struct SqliteKitchenStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKitchenStore {
    /// Open (or create) a database file at the given path
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock()?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kitchens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                address TEXT NOT NULL,
                contact_phone TEXT,
                latitude REAL,
                longitude REAL,
                average_rating REAL,
                operating_hours TEXT,
                operational_status TEXT,
                accessibility_features TEXT,
                version INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS ratings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kitchen_id INTEGER NOT NULL,
                user_id INTEGER,
                user_name TEXT,
                score INTEGER NOT NULL CHECK (score BETWEEN 1 AND 5),
                comments TEXT,
                wait_time_secs INTEGER,
                comment_url TEXT,
                publish_time TEXT,
                relative_time TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (kitchen_id) REFERENCES kitchens(id),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_ratings_kitchen ON ratings(kitchen_id)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_ratings_user ON ratings(user_id)",
            [],
        )?;

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Row mapping
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn kitchen_from_row(row: &Row<'_>) -> rusqlite::Result<Kitchen> {
    let latitude: Option<f64> = row.get(4)?;
    let longitude: Option<f64> = row.get(5)?;
    let version: i64 = row.get(10)?;
    Ok(Kitchen {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        contact_phone: row.get(3)?,
        location: latitude.zip(longitude).map(|(lat, lng)| GeoPoint::new(lat, lng)),
        average_rating: row.get(6)?,
        operating_hours: row.get(7)?,
        operational_status: row.get(8)?,
        accessibility_features: row.get(9)?,
        version: version.max(0) as u64,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn rating_from_row(row: &Row<'_>) -> rusqlite::Result<Rating> {
    let wait: Option<i64> = row.get(6)?;
    Ok(Rating {
        id: row.get(0)?,
        kitchen_id: row.get(1)?,
        user_id: row.get(2)?,
        user_name: row.get(3)?,
        score: row.get(4)?,
        comments: row.get(5)?,
        wait_time_secs: wait.map(|w| w.max(0) as u64),
        comment_url: row.get(7)?,
        publish_time: row.get(8)?,
        relative_time: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<(User, String)> {
    let role: String = row.get(3)?;
    Ok((
        User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            role: AccountRole::default(),
            created_at: row.get(4)?,
        },
        role,
    ))
}

fn finish_user((mut user, role): (User, String)) -> Result<User> {
    user.role = AccountRole::parse(&role).ok_or_else(|| {
        StorageError::serialization(format!("Unknown role '{}' for user {}", role, user.id))
    })?;
    Ok(user)
}

fn load_kitchen(conn: &Connection, kitchen_id: KitchenId) -> Result<Option<Kitchen>> {
    let sql = format!("SELECT {} FROM kitchens WHERE id = ?1", KITCHEN_COLUMNS);
    Ok(conn
        .query_row(&sql, params![kitchen_id], kitchen_from_row)
        .optional()?)
}

fn load_rating(conn: &Connection, rating_id: RatingId) -> Result<Option<Rating>> {
    let sql = format!("SELECT {} FROM ratings WHERE id = ?1", RATING_COLUMNS);
    Ok(conn
        .query_row(&sql, params![rating_id], rating_from_row)
        .optional()?)
}

fn query_kitchens(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Kitchen>> {
    let mut stmt = conn.prepare(sql)?;
    let kitchens = stmt
        .query_map(params, kitchen_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(kitchens)
}

fn query_ratings(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Rating>> {
    let mut stmt = conn.prepare(sql)?;
    let ratings = stmt
        .query_map(params, rating_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ratings)
}

fn wait_to_sql(wait: Option<u64>) -> Option<i64> {
    wait.map(|w| i64::try_from(w).unwrap_or(i64::MAX))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[async_trait]
impl KitchenStore for SqliteKitchenStore {
    async fn insert_kitchen(&self, kitchen: &NewKitchen) -> Result<Kitchen> {
        let conn = self.conn.lock()?;
        let now: DateTime<Utc> = Utc::now();
        let result = conn.execute(
            "INSERT INTO kitchens (name, address, contact_phone, latitude, longitude,
                average_rating, operating_hours, operational_status, accessibility_features,
                version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?7, ?8, 0, ?9, ?9)",
            params![
                &kitchen.name,
                &kitchen.address,
                &kitchen.contact_phone,
                kitchen.location.map(|p| p.latitude),
                kitchen.location.map(|p| p.longitude),
                &kitchen.operating_hours,
                &kitchen.operational_status,
                &kitchen.accessibility_features,
                now,
            ],
        );
        match result {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(StorageError::duplicate(format!(
                    "Kitchen name already exists: {}",
                    kitchen.name
                ))
                .with_source(err));
            }
            Err(err) => return Err(err.into()),
        }

        let id = conn.last_insert_rowid();
        debug!(kitchen_id = id, name = %kitchen.name, "Inserted kitchen");
        load_kitchen(&conn, id)?.ok_or_else(|| StorageError::kitchen_not_found(id))
    }

    async fn get_kitchen(&self, kitchen_id: KitchenId) -> Result<Option<Kitchen>> {
        let conn = self.conn.lock()?;
        load_kitchen(&conn, kitchen_id)
    }

    async fn find_kitchen_by_name(&self, name: &str) -> Result<Option<Kitchen>> {
        let conn = self.conn.lock()?;
        let sql = format!("SELECT {} FROM kitchens WHERE name = ?1", KITCHEN_COLUMNS);
        Ok(conn
            .query_row(&sql, params![name], kitchen_from_row)
            .optional()?)
    }

    async fn find_kitchens_by_name_containing(&self, fragment: &str) -> Result<Vec<Kitchen>> {
        let conn = self.conn.lock()?;
        // instr instead of LIKE so '%' and '_' in the fragment stay literal
        let sql = format!(
            "SELECT {} FROM kitchens WHERE instr(lower(name), lower(?1)) > 0 ORDER BY id",
            KITCHEN_COLUMNS
        );
        query_kitchens(&conn, &sql, params![fragment])
    }

    async fn list_kitchens(&self) -> Result<Vec<Kitchen>> {
        let conn = self.conn.lock()?;
        let sql = format!("SELECT {} FROM kitchens ORDER BY id", KITCHEN_COLUMNS);
        query_kitchens(&conn, &sql, [])
    }

    async fn top_rated_kitchens(&self, limit: usize) -> Result<Vec<Kitchen>> {
        let conn = self.conn.lock()?;
        let sql = format!(
            "SELECT {} FROM kitchens
             ORDER BY average_rating IS NULL, average_rating DESC, id
             LIMIT ?1",
            KITCHEN_COLUMNS
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        query_kitchens(&conn, &sql, params![limit])
    }

    async fn update_kitchen(
        &self,
        kitchen_id: KitchenId,
        patch: &KitchenPatch,
    ) -> Result<Kitchen> {
        let conn = self.conn.lock()?;
        let mut kitchen = load_kitchen(&conn, kitchen_id)?
            .ok_or_else(|| StorageError::kitchen_not_found(kitchen_id))?;
        kitchen.apply_patch(patch);
        kitchen.updated_at = Utc::now();

        let result = conn.execute(
            "UPDATE kitchens SET name = ?1, address = ?2, contact_phone = ?3, latitude = ?4,
                longitude = ?5, operating_hours = ?6, operational_status = ?7,
                accessibility_features = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                &kitchen.name,
                &kitchen.address,
                &kitchen.contact_phone,
                kitchen.location.map(|p| p.latitude),
                kitchen.location.map(|p| p.longitude),
                &kitchen.operating_hours,
                &kitchen.operational_status,
                &kitchen.accessibility_features,
                kitchen.updated_at,
                kitchen_id,
            ],
        );
        match result {
            Ok(_) => Ok(kitchen),
            Err(err) if is_unique_violation(&err) => Err(StorageError::duplicate(format!(
                "Kitchen name already exists: {}",
                kitchen.name
            ))
            .with_source(err)),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_kitchen(&self, kitchen_id: KitchenId) -> Result<usize> {
        let conn = self.conn.lock()?;
        let tx = conn.unchecked_transaction()?;

        let removed = tx.execute(
            "DELETE FROM ratings WHERE kitchen_id = ?1",
            params![kitchen_id],
        )?;
        let deleted = tx.execute("DELETE FROM kitchens WHERE id = ?1", params![kitchen_id])?;
        if deleted == 0 {
            // Dropping the transaction rolls back
            return Err(StorageError::kitchen_not_found(kitchen_id));
        }

        tx.commit()?;
        debug!(kitchen_id, ratings_removed = removed, "Deleted kitchen");
        Ok(removed)
    }

    async fn get_rating(&self, rating_id: RatingId) -> Result<Option<Rating>> {
        let conn = self.conn.lock()?;
        load_rating(&conn, rating_id)
    }

    async fn list_ratings(&self) -> Result<Vec<Rating>> {
        let conn = self.conn.lock()?;
        let sql = format!("SELECT {} FROM ratings ORDER BY id", RATING_COLUMNS);
        query_ratings(&conn, &sql, [])
    }

    async fn list_ratings_for_kitchen(&self, kitchen_id: KitchenId) -> Result<Vec<Rating>> {
        let conn = self.conn.lock()?;
        let sql = format!(
            "SELECT {} FROM ratings WHERE kitchen_id = ?1 ORDER BY id",
            RATING_COLUMNS
        );
        query_ratings(&conn, &sql, params![kitchen_id])
    }

    async fn list_ratings_for_user(&self, user_id: UserId) -> Result<Vec<Rating>> {
        let conn = self.conn.lock()?;
        let sql = format!(
            "SELECT {} FROM ratings WHERE user_id = ?1 ORDER BY id",
            RATING_COLUMNS
        );
        query_ratings(&conn, &sql, params![user_id])
    }

    async fn commit_rating_write(&self, write: &RatingWrite) -> Result<RatingWriteOutcome> {
        let conn = self.conn.lock()?;
        let tx = conn.unchecked_transaction()?;

        let current: Option<i64> = tx
            .query_row(
                "SELECT version FROM kitchens WHERE id = ?1",
                params![write.kitchen_id],
                |row| row.get(0),
            )
            .optional()?;
        let current = current
            .map(|v| v.max(0) as u64)
            .ok_or_else(|| StorageError::kitchen_not_found(write.kitchen_id))?;
        if current != write.expected_version {
            return Err(StorageError::version_conflict(
                write.kitchen_id,
                write.expected_version,
                current,
            ));
        }

        let stored_id = match &write.op {
            RatingOp::Insert(new_rating) => {
                if new_rating.kitchen_id != write.kitchen_id {
                    return Err(StorageError::constraint(format!(
                        "Rating targets kitchen {} but write is for kitchen {}",
                        new_rating.kitchen_id, write.kitchen_id
                    )));
                }
                tx.execute(
                    "INSERT INTO ratings (kitchen_id, user_id, user_name, score, comments,
                        wait_time_secs, comment_url, publish_time, relative_time, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        new_rating.kitchen_id,
                        new_rating.user_id,
                        &new_rating.user_name,
                        new_rating.score,
                        &new_rating.comments,
                        wait_to_sql(new_rating.wait_time_secs),
                        &new_rating.comment_url,
                        &new_rating.publish_time,
                        &new_rating.relative_time,
                        Utc::now(),
                    ],
                )?;
                Some(tx.last_insert_rowid())
            }
            RatingOp::Replace(rating) => {
                let changed = tx.execute(
                    "UPDATE ratings SET user_id = ?1, user_name = ?2, score = ?3, comments = ?4,
                        wait_time_secs = ?5, comment_url = ?6, publish_time = ?7,
                        relative_time = ?8
                     WHERE id = ?9 AND kitchen_id = ?10",
                    params![
                        rating.user_id,
                        &rating.user_name,
                        rating.score,
                        &rating.comments,
                        wait_to_sql(rating.wait_time_secs),
                        &rating.comment_url,
                        &rating.publish_time,
                        &rating.relative_time,
                        rating.id,
                        write.kitchen_id,
                    ],
                )?;
                if changed == 0 || rating.kitchen_id != write.kitchen_id {
                    return Err(StorageError::rating_not_found(rating.id));
                }
                Some(rating.id)
            }
            RatingOp::Delete(rating_id) => {
                let changed = tx.execute(
                    "DELETE FROM ratings WHERE id = ?1 AND kitchen_id = ?2",
                    params![rating_id, write.kitchen_id],
                )?;
                if changed == 0 {
                    return Err(StorageError::rating_not_found(*rating_id));
                }
                None
            }
        };

        let bumped = tx.execute(
            "UPDATE kitchens SET average_rating = ?1, version = version + 1, updated_at = ?2
             WHERE id = ?3 AND version = ?4",
            params![
                write.average_rating,
                Utc::now(),
                write.kitchen_id,
                i64::try_from(write.expected_version).unwrap_or(i64::MAX),
            ],
        )?;
        if bumped == 0 {
            return Err(StorageError::transaction(format!(
                "Kitchen {} aggregate update matched no row",
                write.kitchen_id
            )));
        }

        let kitchen = load_kitchen(&tx, write.kitchen_id)?
            .ok_or_else(|| StorageError::kitchen_not_found(write.kitchen_id))?;
        let rating = match stored_id {
            Some(id) => Some(
                load_rating(&tx, id)?.ok_or_else(|| StorageError::rating_not_found(id))?,
            ),
            None => None,
        };

        tx.commit()?;
        Ok(RatingWriteOutcome { kitchen, rating })
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.conn.lock()?;
        let created_at = user.created_at.unwrap_or_else(Utc::now);
        let result = conn.execute(
            "INSERT INTO users (username, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![&user.username, &user.password_hash, user.role.as_str(), created_at],
        );
        match result {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(StorageError::duplicate(format!(
                    "Username already taken: {}",
                    user.username
                ))
                .with_source(err));
            }
            Err(err) => return Err(err.into()),
        }

        Ok(User {
            id: conn.last_insert_rowid(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at,
        })
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        let conn = self.conn.lock()?;
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        conn.query_row(&sql, params![user_id], user_from_row)
            .optional()?
            .map(finish_user)
            .transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn.lock()?;
        let sql = format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS);
        conn.query_row(&sql, params![username], user_from_row)
            .optional()?
            .map(finish_user)
            .transpose()
    }

    async fn delete_user(&self, user_id: UserId) -> Result<()> {
        let conn = self.conn.lock()?;
        let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
        if deleted == 0 {
            return Err(StorageError::user_not_found(user_id));
        }
        Ok(())
    }

    async fn count_ratings_by_user(&self, user_id: UserId) -> Result<usize> {
        let conn = self.conn.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM ratings WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    async fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock()?;

        let total_kitchens: i64 =
            conn.query_row("SELECT COUNT(*) FROM kitchens", [], |row| row.get(0))?;
        let total_ratings: i64 =
            conn.query_row("SELECT COUNT(*) FROM ratings", [], |row| row.get(0))?;
        let total_users: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;

        Ok(StoreStats {
            total_kitchens: total_kitchens as usize,
            total_ratings: total_ratings as usize,
            total_users: total_users as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::NewRating;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_schema_rejects_out_of_range_score() {
        let store = SqliteKitchenStore::in_memory().unwrap();
        let kitchen = store
            .insert_kitchen(&NewKitchen::new("Score Check", "1 St"))
            .await
            .unwrap();

        let err = store
            .commit_rating_write(&RatingWrite {
                kitchen_id: kitchen.id,
                expected_version: 0,
                average_rating: 6.0,
                op: RatingOp::Insert(NewRating::new(kitchen.id, 6)),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Constraint);

        // Rolled back: no rating, no version bump
        let kitchen = store.get_kitchen(kitchen.id).await.unwrap().unwrap();
        assert_eq!(kitchen.version, 0);
        assert!(store.list_ratings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_role_is_serialization_error() {
        let store = SqliteKitchenStore::in_memory().unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO users (username, password_hash, role, created_at)
                 VALUES ('ghost', 'x', 'overlord', ?1)",
                params![Utc::now()],
            )
            .unwrap();
        }

        let err = store.find_user_by_username("ghost").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[tokio::test]
    async fn test_location_round_trips_through_columns() {
        let store = SqliteKitchenStore::in_memory().unwrap();
        let kitchen = store
            .insert_kitchen(&NewKitchen::new("Geo", "2 St").with_location(40.7128, -74.006))
            .await
            .unwrap();
        let loaded = store.get_kitchen(kitchen.id).await.unwrap().unwrap();
        assert_eq!(loaded.location, Some(GeoPoint::new(40.7128, -74.006)));
    }
}
