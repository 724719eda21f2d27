use chrono::Utc;
use sqlx::{Row, SqliteConnection};

use crate::repository::StorageError;

use super::mapping::{conn_err, ser};

// Raw access to the `local_store` table. Callers own the key namespace and
// the value encoding.

pub(crate) async fn read_value(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<String>, StorageError> {
    let row = sqlx::query("SELECT value FROM local_store WHERE key = ?1")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(conn_err)?;

    row.map(|row| row.try_get::<String, _>("value").map_err(ser))
        .transpose()
}

pub(crate) async fn write_value(
    conn: &mut SqliteConnection,
    key: &str,
    value: &str,
) -> Result<(), StorageError> {
    sqlx::query(
        r"
        INSERT INTO local_store (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        ",
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(conn_err)?;
    Ok(())
}

pub(crate) async fn delete_value(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<(), StorageError> {
    sqlx::query("DELETE FROM local_store WHERE key = ?1")
        .bind(key)
        .execute(&mut *conn)
        .await
        .map_err(conn_err)?;
    Ok(())
}
