//! Review moderation store (`reviews.json`).
//!
//! Public submissions always land as pending. Only an admin approves or
//! deletes them; the public page sees approved reviews only.

use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::review::{
    ANONYMOUS_NAME, MIN_REVIEW_CHARS, ModerationAction, Review, ReviewPartitions, ReviewStatus,
    sort_newest_first,
};
use crate::storage::{SharedStore, save_json};

pub const REVIEWS_DOC: &str = "reviews.json";

pub struct ReviewStore {
    docs: SharedStore,
    lock: Mutex<()>,
}

impl ReviewStore {
    pub fn new(docs: SharedStore) -> Self {
        Self {
            docs,
            lock: Mutex::new(()),
        }
    }

    /// Load every stored review.
    ///
    /// # Healing
    ///
    /// - missing or unparsable document: rewritten as `[]`
    /// - valid JSON that is not an array: read as empty, left on disk
    /// - array elements that are not reviews: skipped
    async fn read_all(&self) -> Result<Vec<Review>, AppError> {
        let raw = self.docs.load(REVIEWS_DOC).await?;

        let parsed = match raw.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(Value::Array(Vec::new())),
            Some(text) => serde_json::from_str::<Value>(text)
                .inspect_err(|e| tracing::warn!(error = %e, "reviews document is corrupt; resetting"))
                .ok(),
        };

        let Some(value) = parsed else {
            save_json(self.docs.as_ref(), REVIEWS_DOC, &Vec::<Review>::new()).await?;
            return Ok(Vec::new());
        };

        let Value::Array(items) = value else {
            tracing::warn!("reviews document is not an array; ignoring it");
            return Ok(Vec::new());
        };

        let total = items.len();
        let reviews: Vec<Review> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if reviews.len() != total {
            tracing::warn!(skipped = total - reviews.len(), "skipped malformed review entries");
        }
        Ok(reviews)
    }

    async fn write_all(&self, reviews: &[Review]) -> Result<(), AppError> {
        save_json(self.docs.as_ref(), REVIEWS_DOC, reviews).await?;
        Ok(())
    }

    /// Store a new pending review.
    ///
    /// # Errors
    ///
    /// `EmptyReview` when the trimmed text has fewer than
    /// [`MIN_REVIEW_CHARS`] characters.
    pub async fn submit(&self, name: &str, text: &str, now_millis: i64) -> Result<Review, AppError> {
        let text = text.trim();
        if text.chars().count() < MIN_REVIEW_CHARS {
            return Err(AppError::EmptyReview);
        }
        let name = match name.trim() {
            "" => ANONYMOUS_NAME,
            trimmed => trimmed,
        };

        let review = Review {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            text: text.to_string(),
            created_at: now_millis,
            status: ReviewStatus::Pending,
        };

        let _guard = self.lock.lock().await;
        let mut all = self.read_all().await?;
        all.push(review.clone());
        self.write_all(&all).await?;

        tracing::info!(review_id = %review.id, "review submitted");
        Ok(review)
    }

    /// Apply an admin action and return the updated partitions.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - `BadRequest`: empty id
    /// - `NotFound`: no review with that id
    /// - `BadAction`: action is neither `approve` nor `delete`
    pub async fn moderate(&self, action: &str, id: &str) -> Result<ReviewPartitions, AppError> {
        if id.is_empty() {
            return Err(AppError::BadRequest);
        }

        let _guard = self.lock.lock().await;
        let mut all = self.read_all().await?;
        let index = all
            .iter()
            .position(|r| r.id == id)
            .ok_or(AppError::NotFound)?;

        match action.parse::<ModerationAction>()? {
            ModerationAction::Approve => all[index].status = ReviewStatus::Approved,
            ModerationAction::Delete => {
                all.remove(index);
            }
        }
        self.write_all(&all).await?;

        tracing::info!(review_id = %id, action, "review moderated");
        Ok(ReviewPartitions::from_reviews(all))
    }

    pub async fn list_partitioned(&self) -> Result<ReviewPartitions, AppError> {
        let _guard = self.lock.lock().await;
        Ok(ReviewPartitions::from_reviews(self.read_all().await?))
    }

    /// Approved reviews, newest first, at most `limit`.
    pub async fn list_approved(&self, limit: usize) -> Result<Vec<Review>, AppError> {
        let _guard = self.lock.lock().await;
        let mut approved: Vec<Review> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|r| r.status == ReviewStatus::Approved)
            .collect();
        sort_newest_first(&mut approved);
        approved.truncate(limit);
        Ok(approved)
    }
}
