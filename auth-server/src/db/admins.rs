use sqlx::PgPool;

/// Whether any admin row exists.
///
/// Used both by the `checkAdmin` action and as the pre-check before an admin
/// registration. The pre-check is read-then-insert with no locking, so two
/// concurrent admin registrations can both pass it; closing that race needs
/// a uniqueness constraint at the schema level, not handler logic.
pub async fn admin_exists(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT admin_id FROM admins LIMIT 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}
