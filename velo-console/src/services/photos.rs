//! Photo evidence client
//!
//! Listing, exclusive lock (take/release), detail, processing decision and
//! discard against the evidence API.

use crate::controllers::listing::PAGE_SIZE;
use crate::models::photo::{PhotoDetail, PhotoPage, PhotoSummary};
use crate::models::review::SubmissionPayload;
use reqwest::StatusCode;
use serde::Deserialize;
use velo_common::{Error, Result};

use crate::services::gateway::ApiGateway;

/// Response of the processing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessOutcome {
    pub status: String,
    #[serde(rename = "photoProcessed", default)]
    pub photo_processed: Option<bool>,
}

impl ProcessOutcome {
    pub fn is_processed(&self) -> bool {
        self.status == "processed"
    }
}

/// Discard reason catalog entry
#[derive(Debug, Clone, Deserialize)]
pub struct RejectionReason {
    pub id: i64,
    pub description: String,
}

pub struct PhotosClient<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> PhotosClient<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// Fetch one page of photo summaries for (site, date).
    ///
    /// Tolerates both known response shapes (bare array, `{photos,total}`).
    pub async fn list(&self, cruise_id: i64, date: &str, page: u32) -> Result<Vec<PhotoSummary>> {
        let path = format!(
            "/photos?photo_date={date}&id_cruise={cruise_id}&page={page}&limit={PAGE_SIZE}"
        );
        let page: PhotoPage = self.gateway.get_json(&path).await?;
        Ok(page.into_photos())
    }

    pub async fn detail(&self, photo_id: i64) -> Result<PhotoDetail> {
        self.gateway.get_json(&format!("/photos/{photo_id}")).await
    }

    /// Acquire the exclusive review lock.
    ///
    /// A 409/423 answer means another session holds it and maps to the
    /// non-fatal `LockConflict`.
    pub async fn take(&self, photo_id: i64) -> Result<()> {
        let response = self.gateway.patch(&format!("/photos/{photo_id}/take")).await?;
        match response.status() {
            StatusCode::CONFLICT | StatusCode::LOCKED => Err(Error::LockConflict(photo_id)),
            _ => {
                ApiGateway::expect_success(response).await?;
                tracing::debug!(photo_id, "photo locked for review");
                Ok(())
            }
        }
    }

    /// Release the review lock
    pub async fn release(&self, photo_id: i64) -> Result<()> {
        let response = self
            .gateway
            .patch(&format!("/photos/{photo_id}/release"))
            .await?;
        ApiGateway::expect_success(response).await?;
        tracing::debug!(photo_id, "photo lock released");
        Ok(())
    }

    /// Submit the processing decision (issue fine)
    pub async fn process(&self, payload: &SubmissionPayload) -> Result<ProcessOutcome> {
        let body = serde_json::to_value(payload)
            .map_err(|e| Error::Service(format!("Encode submission failed: {e}")))?;
        self.gateway
            .post_json("/processed-photo/process-traffic-fine", &body)
            .await
    }

    /// Discard the photo with a rejection reason
    pub async fn reject(&self, photo_id: i64, rejection_reason_id: i64, user_id: i64) -> Result<()> {
        let body = serde_json::json!({
            "photoId": photo_id,
            "rejectionReasonId": rejection_reason_id,
            "userId": user_id,
        });
        let _: serde_json::Value = self
            .gateway
            .post_json("/processed-photo/reject-photo", &body)
            .await?;
        tracing::info!(photo_id, rejection_reason_id, "photo discarded");
        Ok(())
    }

    /// Catalog of discard reasons
    pub async fn rejection_reasons(&self) -> Result<Vec<RejectionReason>> {
        self.gateway.get_json("/rejection-reasons").await
    }
}
