//! Photo review workflow controller
//!
//! The I/O half of the review workflow: acquires and releases the exclusive
//! lock, loads the detail, runs manual registry lookups and submits the
//! processing or discard decision. Every outcome is fed into the
//! [`ReviewSession`] reducer, which owns all state transitions.

use crate::models::photo::PhotoDetail;
use crate::models::plate::PlateType;
use crate::models::review::{
    validate_lookup_input, ReviewEvent, ReviewField, ReviewSession, SubmissionPayload,
};
use crate::models::vehicle::VehicleRecord;
use crate::services::photos::{PhotosClient, ProcessOutcome};
use crate::services::vehicles::VehicleLookupClient;
use crate::store::SessionStore;
use velo_common::config::LockConflictPolicy;
use velo_common::{Error, Result};

/// Seam between the review controller and the photo evidence endpoints
#[allow(async_fn_in_trait)]
pub trait PhotoService {
    async fn take(&self, photo_id: i64) -> Result<()>;
    async fn detail(&self, photo_id: i64) -> Result<PhotoDetail>;
    async fn release(&self, photo_id: i64) -> Result<()>;
    async fn process(&self, payload: &SubmissionPayload) -> Result<ProcessOutcome>;
    async fn reject(&self, photo_id: i64, rejection_reason_id: i64, user_id: i64) -> Result<()>;
}

impl PhotoService for PhotosClient<'_> {
    async fn take(&self, photo_id: i64) -> Result<()> {
        PhotosClient::take(self, photo_id).await
    }
    async fn detail(&self, photo_id: i64) -> Result<PhotoDetail> {
        PhotosClient::detail(self, photo_id).await
    }
    async fn release(&self, photo_id: i64) -> Result<()> {
        PhotosClient::release(self, photo_id).await
    }
    async fn process(&self, payload: &SubmissionPayload) -> Result<ProcessOutcome> {
        PhotosClient::process(self, payload).await
    }
    async fn reject(&self, photo_id: i64, rejection_reason_id: i64, user_id: i64) -> Result<()> {
        PhotosClient::reject(self, photo_id, rejection_reason_id, user_id).await
    }
}

/// Seam between the review controller and the vehicle registry
#[allow(async_fn_in_trait)]
pub trait VehicleRegistry {
    async fn lookup(&self, plate_type: PlateType, plate_number: &str) -> Result<VehicleRecord>;
}

impl VehicleRegistry for VehicleLookupClient<'_> {
    async fn lookup(&self, plate_type: PlateType, plate_number: &str) -> Result<VehicleRecord> {
        VehicleLookupClient::lookup(self, plate_type, plate_number).await
    }
}

/// Drives one photo through the review workflow
#[derive(Debug)]
pub struct ReviewController<P: PhotoService, V: VehicleRegistry> {
    photos: P,
    registry: V,
    store: SessionStore,
    lock_conflict_policy: LockConflictPolicy,
    pub session: ReviewSession,
}

impl<P: PhotoService, V: VehicleRegistry> ReviewController<P, V> {
    /// Open a photo selected from the list: acquire the lock, load the
    /// detail and enter `Ready(view)`.
    ///
    /// A lock conflict either aborts or degrades to a read-only view,
    /// depending on the configured policy.
    pub async fn open(
        photos: P,
        registry: V,
        store: SessionStore,
        lock_conflict_policy: LockConflictPolicy,
        photo_id: i64,
        cruise: &str,
    ) -> Result<Self> {
        let mut controller = Self {
            photos,
            registry,
            store,
            lock_conflict_policy,
            session: ReviewSession::open(photo_id, cruise.to_string()),
        };

        // Back-navigation to the list triggers one auto-refetch
        controller.store.set_returning_from_detail().await?;

        let lock_held = match controller.photos.take(photo_id).await {
            Ok(()) => true,
            Err(Error::LockConflict(id))
                if controller.lock_conflict_policy == LockConflictPolicy::ReadOnly =>
            {
                tracing::warn!(photo_id = id, "lock held elsewhere, opening read-only");
                false
            }
            Err(e) => {
                controller.session.apply(ReviewEvent::OpenFailed {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        match controller.photos.detail(photo_id).await {
            Ok(detail) => {
                tracing::info!(
                    photo_id,
                    session_id = %controller.session.session_id,
                    lock_held,
                    "photo opened for review"
                );
                controller
                    .session
                    .apply(ReviewEvent::DetailLoaded { detail, lock_held });
                Ok(controller)
            }
            Err(e) => {
                // Never leave an orphaned lock behind a failed open
                if lock_held {
                    if let Err(release_err) = controller.photos.release(photo_id).await {
                        tracing::warn!(photo_id, error = %release_err, "release after failed open");
                    }
                }
                controller.session.apply(ReviewEvent::OpenFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub fn enter_edit(&mut self) {
        self.session.apply(ReviewEvent::EnterEdit);
    }

    pub fn edit_field(&mut self, field: ReviewField, value: impl Into<String>) {
        self.session.apply(ReviewEvent::FieldEdited {
            field,
            value: value.into(),
        });
    }

    pub fn save_edit(&mut self) {
        self.session.apply(ReviewEvent::SaveEdit);
    }

    /// Manual registry lookup. Incomplete inputs fail locally without
    /// touching the network; every network outcome returns the session to
    /// its prior mode with the result recorded.
    pub async fn manual_lookup(&mut self, plate_type: &str, plate_number: &str) -> Result<()> {
        let (plate_type, plate_number) = validate_lookup_input(plate_type, plate_number)?;

        self.session.apply(ReviewEvent::LookupStarted);
        match self.registry.lookup(plate_type, &plate_number).await {
            Ok(vehicle) => {
                self.session.apply(ReviewEvent::LookupMatched {
                    vehicle,
                    plate_type,
                    plate_number,
                });
                Ok(())
            }
            Err(Error::LookupNotFound(message)) => {
                self.session.apply(ReviewEvent::LookupNotFound {
                    message: message.clone(),
                });
                Err(Error::LookupNotFound(message))
            }
            Err(e) => {
                self.session.apply(ReviewEvent::LookupFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Validate and submit the processing decision.
    ///
    /// Validation failures abort before any network call. A rejected or
    /// failed submission returns to `Ready(view)` with the busy indicator
    /// cleared and the lock presumed still held.
    pub async fn submit(&mut self) -> Result<()> {
        let user_id = self
            .store
            .user_id()
            .await?
            .ok_or_else(|| Error::Validation("No operator identity in session".to_string()))?;

        let payload = self.session.prepare_submission(user_id)?;

        self.session.apply(ReviewEvent::SubmitStarted);
        match self.photos.process(&payload).await {
            Ok(outcome) if outcome.is_processed() => {
                tracing::info!(
                    photo_id = self.session.photo_id,
                    lp_number = %payload.lp_number,
                    "photo processed"
                );
                self.session.apply(ReviewEvent::SubmitAccepted);
                Ok(())
            }
            Ok(outcome) => {
                let err = Error::SubmissionRejected(format!(
                    "Processing endpoint returned status: {}",
                    outcome.status
                ));
                self.session.apply(ReviewEvent::SubmitRejected {
                    message: err.to_string(),
                });
                Err(err)
            }
            Err(e) => {
                self.session.apply(ReviewEvent::SubmitRejected {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Discard the photo with a rejection reason
    pub async fn discard(&mut self, rejection_reason_id: i64) -> Result<()> {
        let user_id = self
            .store
            .user_id()
            .await?
            .ok_or_else(|| Error::Validation("No operator identity in session".to_string()))?;

        match self
            .photos
            .reject(self.session.photo_id, rejection_reason_id, user_id)
            .await
        {
            Ok(()) => {
                self.session.apply(ReviewEvent::DiscardAccepted);
                Ok(())
            }
            Err(e) => {
                self.session.apply(ReviewEvent::DiscardFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Release the lock (when still held) and close the session. Release
    /// failure is a non-blocking message; the caller leaves regardless.
    pub async fn release_and_exit(&mut self) -> Result<()> {
        if !self.session.needs_release() {
            if !self.session.is_closed() {
                self.session.apply(ReviewEvent::Released { message: None });
            }
            return Ok(());
        }

        let photo_id = self.session.photo_id;
        match self.photos.release(photo_id).await {
            Ok(()) => self.session.apply(ReviewEvent::Released { message: None }),
            Err(e) => {
                tracing::warn!(photo_id, error = %e, "lock release failed, leaving anyway");
                self.session.apply(ReviewEvent::Released {
                    message: Some(format!("Could not release photo lock: {e}")),
                });
            }
        }
        Ok(())
    }
}
