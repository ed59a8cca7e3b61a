//! Job listings and the moderation filter types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Category values that mean "no category filter".
const ALL_CATEGORIES: &[&str] = &["all", "Все"];

/// A job listing joined with its owner's username.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub salary: String,
    pub category: String,
    pub company: String,
    pub user_id: i64,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub username: String,
}

/// Fields a user submits when posting a job. The owner comes from the token.
/// Length caps mirror the `jobs` column widths.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewJob {
    #[validate(length(max = 100))]
    pub title: String,
    pub description: String,
    #[validate(length(max = 50))]
    pub salary: String,
    #[validate(length(max = 50))]
    pub category: String,
    #[validate(length(max = 100))]
    pub company: String,
}

impl NewJob {
    /// All five fields must be non-blank.
    pub fn is_complete(&self) -> bool {
        [
            &self.title,
            &self.description,
            &self.salary,
            &self.category,
            &self.company,
        ]
        .iter()
        .all(|f| !f.trim().is_empty())
    }
}

/// Public listing filter (`?search=&category=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl JobFilter {
    /// Title search term, if one was given.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Category to match exactly, or `None` for empty / "all".
    pub fn category_term(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .filter(|c| !ALL_CATEGORIES.iter().any(|all| all.eq_ignore_ascii_case(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> NewJob {
        NewJob {
            title: "Electrician".into(),
            description: "Wiring work".into(),
            salary: "90000".into(),
            category: "Electrical".into(),
            company: "Volt Ltd".into(),
        }
    }

    #[test]
    fn new_job_requires_every_field() {
        assert!(filled().is_complete());
        let mut job = filled();
        job.salary = "   ".into();
        assert!(!job.is_complete());
        assert!(!NewJob::default().is_complete());
    }

    #[test]
    fn new_job_rejects_values_wider_than_columns() {
        let mut job = filled();
        job.title = "T".repeat(100);
        assert!(job.validate().is_ok());
        job.title = "T".repeat(101);
        assert!(job.validate().is_err());

        let mut job = filled();
        job.salary = "9".repeat(51);
        assert!(job.validate().is_err());
        let mut job = filled();
        job.category = "c".repeat(51);
        assert!(job.validate().is_err());
        let mut job = filled();
        job.company = "c".repeat(101);
        assert!(job.validate().is_err());
    }

    #[test]
    fn new_job_missing_json_fields_become_empty() {
        let job: NewJob = serde_json::from_str(r#"{"title":"Painter"}"#).unwrap();
        assert_eq!(job.title, "Painter");
        assert!(job.company.is_empty());
        assert!(!job.is_complete());
    }

    #[test]
    fn all_sentinel_disables_category_filter() {
        for value in ["all", "ALL", "Все", "", "  "] {
            let filter = JobFilter {
                search: None,
                category: Some(value.into()),
            };
            assert_eq!(filter.category_term(), None, "{value:?}");
        }
        let filter = JobFilter {
            search: None,
            category: Some("Plumbing".into()),
        };
        assert_eq!(filter.category_term(), Some("Plumbing"));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = JobFilter {
            search: Some("  ".into()),
            category: None,
        };
        assert_eq!(filter.search_term(), None);
        let filter = JobFilter {
            search: Some(" build ".into()),
            category: None,
        };
        assert_eq!(filter.search_term(), Some("build"));
    }
}
