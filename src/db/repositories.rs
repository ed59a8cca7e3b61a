//! Repositories: users and jobs.

use crate::error::{AppError, AppResult};
use crate::models::{Job, JobFilter, NewJob, Role, User};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use super::DbPool;

// ---- User ----

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Drop the hash and parse the stored role.
    pub fn into_user(self) -> AppResult<User> {
        let role: Role = self
            .role
            .parse()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("user {}: {}", self.id, e)))?;
        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            role,
            created_at: self.created_at,
        })
    }
}

/// True when the error is the store rejecting a duplicate key.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub async fn user_exists<'e, E>(executor: E, username: &str, email: &str) -> AppResult<bool>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
    )
    .bind(username)
    .bind(email)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

/// Inserts a user. A duplicate username or email surfaces as `AppError::Conflict`.
pub async fn user_create<'e, E>(
    executor: E,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> AppResult<UserRow>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (username, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, email, password_hash, role, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("User already exists".to_string())
        } else {
            AppError::Db(e)
        }
    })
}

pub async fn user_find_by_username(pool: &DbPool, username: &str) -> AppResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, role, created_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

// ---- Jobs ----

const JOB_COLUMNS: &str = "j.id, j.title, j.description, j.salary, j.category, j.company, \
     j.user_id, j.approved, j.created_at, u.username";

/// Escape LIKE wildcards so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub async fn job_create(pool: &DbPool, owner_id: i64, job: &NewJob) -> AppResult<Job> {
    let sql = format!(
        r#"
        WITH j AS (
            INSERT INTO jobs (title, description, salary, category, company, user_id, approved)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING *
        )
        SELECT {JOB_COLUMNS}
        FROM j
        JOIN users u ON u.id = j.user_id
        "#
    );
    let row = sqlx::query_as::<_, Job>(&sql)
        .bind(job.title.trim())
        .bind(job.description.trim())
        .bind(job.salary.trim())
        .bind(job.category.trim())
        .bind(job.company.trim())
        .bind(owner_id)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn jobs_list_approved(pool: &DbPool, filter: &JobFilter) -> AppResult<Vec<Job>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {JOB_COLUMNS} FROM jobs j JOIN users u ON u.id = j.user_id WHERE j.approved = TRUE"
    ));
    if let Some(search) = filter.search_term() {
        qb.push(" AND j.title ILIKE ")
            .push_bind(format!("%{}%", escape_like(search)));
    }
    if let Some(category) = filter.category_term() {
        qb.push(" AND j.category = ").push_bind(category.to_string());
    }
    qb.push(" ORDER BY j.created_at DESC, j.id DESC");

    let rows = qb.build_query_as::<Job>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn jobs_list_pending(pool: &DbPool) -> AppResult<Vec<Job>> {
    let sql = format!(
        "SELECT {JOB_COLUMNS} FROM jobs j JOIN users u ON u.id = j.user_id \
         WHERE j.approved = FALSE ORDER BY j.created_at DESC, j.id DESC"
    );
    let rows = sqlx::query_as::<_, Job>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Sets `approved`; `None` when no job has this id.
pub async fn job_approve(pool: &DbPool, id: i64) -> AppResult<Option<Job>> {
    let sql = format!(
        r#"
        WITH j AS (
            UPDATE jobs SET approved = TRUE WHERE id = $1
            RETURNING *
        )
        SELECT {JOB_COLUMNS}
        FROM j
        JOIN users u ON u.id = j.user_id
        "#
    );
    let row = sqlx::query_as::<_, Job>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Returns false when no job has this id.
pub async fn job_delete(pool: &DbPool, id: i64) -> AppResult<bool> {
    let r = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(r.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_quotes_wildcards() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\dir"), "c:\\\\dir");
    }

    #[test]
    fn stored_role_is_parsed() {
        let row = UserRow {
            id: 1,
            username: "admin".into(),
            email: "admin@example.com".into(),
            password_hash: "$argon2id$...".into(),
            role: "admin".into(),
            created_at: Utc::now(),
        };
        let user = row.into_user().unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn unknown_stored_role_is_internal_error() {
        let row = UserRow {
            id: 2,
            username: "x".into(),
            email: "x@example.com".into(),
            password_hash: String::new(),
            role: "superuser".into(),
            created_at: Utc::now(),
        };
        assert!(matches!(row.into_user(), Err(AppError::Internal(_))));
    }
}
