//! User account service
//!
//! CRUD for API accounts plus the bootstrap super-admin seed. Password
//! hashes never leave this module; the structs returned to handlers carry
//! only public fields.

use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::{validate_email, validate_password, Gender, UserRole};

use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};

/// User service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// User record without credentials
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub need_pass_change: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub image: Option<String>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Input for updating a user
#[derive(Debug, Deserialize)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub image: Option<String>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a user account. New accounts must change their password on
    /// first login.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<User> {
        validate_email(&input.email).map_err(|msg| AppError::validation("email", msg))?;
        validate_password(&input.password)
            .map_err(|msg| AppError::validation("password", msg))?;

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, image, gender, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, email, image, role, gender, phone, address,
                      need_pass_change, is_deleted, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(input.role.as_str())
        .bind(&input.image)
        .bind(input.gender.map(|g| g.as_str()))
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            AppError::on_unique_violation(e, AppError::DuplicateEntry("email".to_string()))
        })?;

        Ok(user)
    }

    /// List users
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, image, role, gender, phone, address,
                   need_pass_change, is_deleted, created_at, updated_at
            FROM users
            WHERE is_deleted = FALSE
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, image, role, gender, phone, address,
                   need_pass_change, is_deleted, created_at, updated_at
            FROM users
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(user)
    }

    /// Update a user's profile fields
    pub async fn update(&self, id: Uuid, input: UpdateUserInput) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                role = COALESCE($2, role),
                image = COALESCE($3, image),
                gender = COALESCE($4, gender),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                updated_at = NOW()
            WHERE id = $7 AND is_deleted = FALSE
            RETURNING id, name, email, image, role, gender, phone, address,
                      need_pass_change, is_deleted, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.role.map(|r| r.as_str()))
        .bind(&input.image)
        .bind(input.gender.map(|g| g.as_str()))
        .bind(&input.phone)
        .bind(&input.address)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(user)
    }

    /// Soft-delete a user
    pub async fn delete(&self, id: Uuid) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, name, email, image, role, gender, phone, address,
                      need_pass_change, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(user)
    }

    /// Seed the bootstrap super admin when the users table is empty
    pub async fn ensure_seed_admin(&self, admin: &AdminConfig) -> AppResult<()> {
        let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;

        if user_count > 0 {
            return Ok(());
        }

        tracing::info!("Seeding super admin account {}", admin.email);

        let password_hash = hash(&admin.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&password_hash)
        .bind(UserRole::SuperAdmin.as_str())
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
