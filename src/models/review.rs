//! Review data models and API request/response types.
//!
//! This module defines:
//! - `Review`: a stored customer review (`reviews.json` is an array of these)
//! - `ModerationAction`: what an admin can do to a review
//! - `ReviewPartitions`: the admin view, split by status

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

/// Display name used when the submitter leaves the field blank.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Minimum review length, in characters, after trimming.
pub const MIN_REVIEW_CHARS: usize = 5;

/// Number of approved reviews served to the public page.
pub const PUBLIC_REVIEW_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
}

/// A customer review.
///
/// Always created as [`ReviewStatus::Pending`]; only an admin approves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub name: String,
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub status: ReviewStatus,
}

/// Admin moderation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Delete,
}

impl FromStr for ModerationAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::BadAction),
        }
    }
}

/// Reviews split by status, each newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewPartitions {
    pub pending: Vec<Review>,
    pub approved: Vec<Review>,
}

impl ReviewPartitions {
    pub fn from_reviews(mut reviews: Vec<Review>) -> Self {
        sort_newest_first(&mut reviews);
        let (pending, approved) = reviews
            .into_iter()
            .partition(|r| r.status == ReviewStatus::Pending);
        Self { pending, approved }
    }
}

pub fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
