//! User repository: accounts, credentials, profile updates.

use recipe_core::entities::User;
use recipe_core::normalize_email;
use recipe_core::payloads::{NewUser, UserPatch};

use crate::error::DatabaseError;
use crate::helpers::{get_flag, insert_returning, parse_datetime};
use crate::password::{check_password_async, hash_password_async};
use crate::service::RecipeService;

pub(super) const SELECT_COLS: &str =
    "id, email, name, is_active, is_staff, is_superuser, created_at";

pub(super) fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        is_active: get_flag(row, 3)?,
        is_staff: get_flag(row, 4)?,
        is_superuser: get_flag(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl RecipeService {
    /// Create a regular account. The email domain is lowercased.
    pub async fn create_user(&self, new: &NewUser) -> Result<User, DatabaseError> {
        self.insert_user(new, false).await
    }

    /// Create an account with staff and superuser flags set.
    pub async fn create_superuser(&self, new: &NewUser) -> Result<User, DatabaseError> {
        self.insert_user(new, true).await
    }

    async fn insert_user(&self, new: &NewUser, superuser: bool) -> Result<User, DatabaseError> {
        new.validate()?;
        let email = normalize_email(&new.email)?;
        let hash = hash_password_async(&new.password).await?;
        let flag = i64::from(superuser);

        let _guard = self.write_guard().await;
        let user = insert_returning(
            self.db().conn(),
            &format!(
                "INSERT INTO users (email, name, password_hash, is_staff, is_superuser)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {SELECT_COLS}"
            ),
            libsql::params![email.as_str(), new.name.as_str(), hash, flag, flag],
            || "user with this email already exists".to_string(),
            row_to_user,
        )
        .await?;
        tracing::info!(user_id = user.id, superuser, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NotFound { entity: "user", id })?;
        row_to_user(&row)
    }

    /// Check email and password against an active account.
    ///
    /// Unknown emails, wrong passwords, and inactive accounts all give the
    /// same `InvalidCredentials` error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DatabaseError> {
        let Ok(email) = normalize_email(email) else {
            return Err(DatabaseError::InvalidCredentials);
        };
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS}, password_hash FROM users WHERE email = ?1"),
                [email.as_str()],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(DatabaseError::InvalidCredentials);
        };
        let user = row_to_user(&row)?;
        let hash = row.get::<String>(7)?;
        if !user.is_active || !check_password_async(password, hash).await? {
            return Err(DatabaseError::InvalidCredentials);
        }

        let _guard = self.write_guard().await;
        self.db()
            .conn()
            .execute(
                "UPDATE users SET last_login = datetime('now') WHERE id = ?1",
                [user.id],
            )
            .await?;
        Ok(user)
    }

    /// True if `password` matches the stored hash for this user.
    pub async fn check_password(&self, user_id: i64, password: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT password_hash FROM users WHERE id = ?1", [user_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NotFound {
            entity: "user",
            id: user_id,
        })?;
        check_password_async(password, row.get::<String>(0)?).await
    }

    /// Apply a profile update. A new password is re-hashed.
    pub async fn update_user(&self, id: i64, patch: &UserPatch) -> Result<User, DatabaseError> {
        patch.validate()?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = patch.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref password) = patch.password {
            sets.push(format!("password_hash = ?{idx}"));
            params.push(hash_password_async(password).await?.into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_user(id).await;
        }

        params.push(id.into());
        let sql = format!(
            "UPDATE users SET {} WHERE id = ?{idx} RETURNING {SELECT_COLS}",
            sets.join(", ")
        );

        let _guard = self.write_guard().await;
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NotFound { entity: "user", id })?;
        row_to_user(&row)
    }

    /// Activate or deactivate an account. Inactive accounts cannot log in
    /// and their tokens stop resolving.
    pub async fn set_user_active(&self, id: i64, active: bool) -> Result<User, DatabaseError> {
        let _guard = self.write_guard().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("UPDATE users SET is_active = ?1 WHERE id = ?2 RETURNING {SELECT_COLS}"),
                libsql::params![i64::from(active), id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NotFound { entity: "user", id })?;
        row_to_user(&row)
    }
}
