use sqlx::PgPool;

/// Account row joined with its user, as loaded for login.
#[derive(sqlx::FromRow)]
pub struct Account {
    pub account_id: i64,
    pub user_id: i64,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// Look up an account by email and verify the password.
///
/// Returns `Ok(None)` for both an unknown email and a wrong password, so the
/// response cannot distinguish the two. Timing still can.
pub async fn authenticate(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<Account>, sqlx::Error> {
    let account: Option<Account> = sqlx::query_as(
        "SELECT a.account_id, a.user_id, a.password, u.name, u.email, u.phone_number
            FROM accounts a
            INNER JOIN users u ON u.user_id = a.user_id
            WHERE u.email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    let Some(account) = account else {
        return Ok(None);
    };

    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let hash = match PasswordHash::new(&account.password) {
        Ok(h) => h,
        Err(_) => return Ok(None),
    };

    if Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
    {
        Ok(Some(account))
    } else {
        Ok(None)
    }
}

/// Hash a password into a PHC-format argon2 string for storage.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}
