//! Job moderation workflow over the jobs table.

use tracing::info;
use validator::Validate;

use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{Job, JobFilter, NewJob};

/// Role checks happen in the guard; these operations trust their caller.
#[derive(Clone)]
pub struct JobBoard {
    db: DbPool,
}

fn job_not_found() -> AppError {
    AppError::NotFound("Job not found".to_string())
}

impl JobBoard {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Submit a listing for moderation. It starts unapproved.
    pub async fn create(&self, owner_id: i64, job: &NewJob) -> AppResult<Job> {
        if !job.is_complete() {
            return Err(AppError::fields_required());
        }
        job.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let job = db::job_create(&self.db, owner_id, job).await?;
        info!(job_id = job.id, owner_id, "job submitted for approval");
        Ok(job)
    }

    /// Public listing: approved jobs only, newest first.
    pub async fn list_approved(&self, filter: &JobFilter) -> AppResult<Vec<Job>> {
        db::jobs_list_approved(&self.db, filter).await
    }

    /// Moderation queue, newest first.
    pub async fn list_pending(&self) -> AppResult<Vec<Job>> {
        db::jobs_list_pending(&self.db).await
    }

    /// Approving an already-approved job is not an error.
    pub async fn approve(&self, id: i64) -> AppResult<Job> {
        let job = db::job_approve(&self.db, id)
            .await?
            .ok_or_else(job_not_found)?;
        info!(job_id = id, "job approved");
        Ok(job)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !db::job_delete(&self.db, id).await? {
            return Err(job_not_found());
        }
        info!(job_id = id, "job deleted");
        Ok(())
    }
}
