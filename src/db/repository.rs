//! User repository.
//!
//! CRUD operations for users in the database.

use sqlx::{QueryBuilder, SqlitePool};

use super::user::{NewUser, User};
use crate::{MessagerieError, Result};

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query(
            "INSERT INTO utilisateurs (nom, prenom, email, mdp) VALUES (?, ?, ?, ?)",
        )
        .bind(&new_user.nom)
        .bind(&new_user.prenom)
        .bind(&new_user.email)
        .bind(&new_user.mdp)
        .execute(self.pool)
        .await
        .map_err(|e| MessagerieError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| MessagerieError::NotFound("utilisateur".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, nom, prenom, email, mdp, created_at
             FROM utilisateurs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| MessagerieError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Get a user by email address.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, nom, prenom, email, mdp, created_at
             FROM utilisateurs WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| MessagerieError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Look up several users by email in a single batched query.
    ///
    /// Emails with no matching user are simply absent from the result;
    /// callers compare the two sets to find unresolved addresses.
    pub async fn find_by_emails(&self, emails: &[String]) -> Result<Vec<User>> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(
            "SELECT id, nom, prenom, email, mdp, created_at FROM utilisateurs WHERE email IN (",
        );
        let mut separated = query.separated(", ");
        for email in emails {
            separated.push_bind(email);
        }
        query.push(")");

        let users = query
            .build_query_as::<User>()
            .fetch_all(self.pool)
            .await
            .map_err(|e| MessagerieError::Database(e.to_string()))?;

        Ok(users)
    }

    /// Count users in the database.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM utilisateurs")
            .fetch_one(self.pool)
            .await
            .map_err(|e| MessagerieError::Database(e.to_string()))?;
        Ok(count)
    }
}
