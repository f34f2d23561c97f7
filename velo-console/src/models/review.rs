//! Photo review workflow state machine
//!
//! One `ReviewSession` value owns the lifecycle of a single photo from
//! "selected from list" through "locked for exclusive edit" to "submitted"
//! or "released". The session is a plain value object mutated by a reducer
//! (`apply`) over tagged events; all I/O lives in the review controller,
//! which feeds completion events back in. That keeps every transition
//! deterministic and unit-testable without a rendering framework.
//!
//! State progression:
//! Closed → Loading → Ready(view) ⇄ Ready(edit) → Submitting → Closed
//! with `lookup_pending` as an orthogonal in-flight flag.

use crate::models::photo::{PhotoDetail, PlateParts};
use crate::models::plate::{normalize_plate_number, PlateType};
use crate::models::vehicle::VehicleRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use velo_common::{time, Error, Result};

/// View or edit presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMode {
    View,
    Edit,
}

/// Review workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// No photo under review (initial and terminal)
    Closed,
    /// Lock acquired, detail fetch in flight
    Loading,
    /// Detail on screen, in view or edit mode
    Ready(ReviewMode),
    /// Processing decision in flight
    Submitting,
}

/// Editable field identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewField {
    Date,
    Time,
    Location,
    SpeedLimit,
    MeasuredSpeed,
}

/// Editable copies of the photo detail fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    /// Display form, `DD/MM/YYYY`
    pub date: String,
    /// `HH:MM` or `HH:MM:SS`
    pub time: String,
    pub location: String,
    pub speed_limit: String,
    pub measured_speed: String,
}

impl FieldValues {
    fn set(&mut self, field: ReviewField, value: String) {
        match field {
            ReviewField::Date => self.date = value,
            ReviewField::Time => self.time = value,
            ReviewField::Location => self.location = value,
            ReviewField::SpeedLimit => self.speed_limit = value,
            ReviewField::MeasuredSpeed => self.measured_speed = value,
        }
    }
}

/// Tagged workflow events, applied by [`ReviewSession::apply`]
#[derive(Debug, Clone)]
pub enum ReviewEvent {
    /// Detail fetch completed; `lock_held` is false on a read-only open
    /// after a lock conflict
    DetailLoaded {
        detail: PhotoDetail,
        lock_held: bool,
    },
    /// Lock or detail fetch failed; the screen never opened
    OpenFailed { message: String },
    EnterEdit,
    FieldEdited { field: ReviewField, value: String },
    SaveEdit,
    LookupStarted,
    /// Manual registry lookup matched; the entered plate parts become
    /// authoritative for submission
    LookupMatched {
        vehicle: VehicleRecord,
        plate_type: PlateType,
        plate_number: String,
    },
    /// Well-formed empty lookup result
    LookupNotFound { message: String },
    /// Lookup transport or service failure
    LookupFailed { message: String },
    SubmitStarted,
    SubmitAccepted,
    SubmitRejected { message: String },
    DiscardAccepted,
    DiscardFailed { message: String },
    /// Lock release completed (or failed, carrying a non-blocking message);
    /// the caller leaves the screen either way
    Released { message: Option<String> },
}

/// Assembled processing request for `POST /processed-photo/process-traffic-fine`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionPayload {
    pub cruise: String,
    pub timestamp: DateTime<Utc>,
    pub speed_limit_kmh: f64,
    pub current_speed_kmh: f64,
    #[serde(rename = "lpNumber")]
    pub lp_number: String,
    #[serde(rename = "lpType")]
    pub lp_type: String,
    #[serde(rename = "photoId")]
    pub photo_id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// Ephemeral per-photo review session
#[derive(Debug, Clone)]
pub struct ReviewSession {
    /// Session identity for log correlation
    pub session_id: Uuid,
    pub photo_id: i64,
    /// Site/location label carried into the submission payload
    pub cruise: String,
    pub state: ReviewState,
    /// Committed field values (pre-populated from the detail)
    pub fields: FieldValues,
    /// Uncommitted edits while in edit mode
    pub edit_buffer: Option<FieldValues>,
    /// Auto-extracted plate parts from the detail
    pub plate_parts: Option<PlateParts>,
    /// Automatic vehicle match attached to the detail
    pub auto_vehicle: Option<VehicleRecord>,
    /// Manual lookup result; authoritative over the automatic match
    pub manual_vehicle: Option<VehicleRecord>,
    /// Operator-entered plate parts behind the manual match
    pub manual_plate: Option<PlateParts>,
    /// Registry flag from the detail ("vehicle info found")
    pub vehicle_info_found: bool,
    /// True while this session holds the server-side lock
    pub lock_held: bool,
    /// Lock conflict resolved to a best-effort read-only view
    pub read_only: bool,
    /// Manual lookup request in flight (orthogonal to view/edit)
    pub lookup_pending: bool,
    /// Render per-field validation hints after a blocked submit
    pub show_validation: bool,
    /// Last user-visible inline message
    pub message: Option<String>,
}

impl ReviewSession {
    /// Create a session for a photo just selected from the list
    pub fn open(photo_id: i64, cruise: String) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            photo_id,
            cruise,
            state: ReviewState::Loading,
            fields: FieldValues::default(),
            edit_buffer: None,
            plate_parts: None,
            auto_vehicle: None,
            manual_vehicle: None,
            manual_plate: None,
            vehicle_info_found: false,
            lock_held: false,
            read_only: false,
            lookup_pending: false,
            show_validation: false,
            message: None,
        }
    }

    /// The vehicle result considered current for submission:
    /// manual if present, else automatic, else none
    pub fn current_vehicle(&self) -> Option<&VehicleRecord> {
        self.manual_vehicle.as_ref().or(self.auto_vehicle.as_ref())
    }

    /// The "no registry information" banner shows until some vehicle
    /// result exists
    pub fn shows_not_found_banner(&self) -> bool {
        !self.vehicle_info_found && self.current_vehicle().is_none()
    }

    /// A lock this session acquired must be released before leaving,
    /// unless submission or discard already closed the photo
    pub fn needs_release(&self) -> bool {
        self.lock_held && self.state != ReviewState::Closed
    }

    pub fn is_closed(&self) -> bool {
        self.state == ReviewState::Closed
    }

    /// Apply one workflow event. Pure state mutation; no I/O.
    pub fn apply(&mut self, event: ReviewEvent) {
        match event {
            ReviewEvent::DetailLoaded { detail, lock_held } => {
                if let Some((date, time)) = time::split_timestamp(&detail.info.timestamp) {
                    self.fields.date = date;
                    self.fields.time = time;
                }
                self.fields.location = detail.info.location;
                self.fields.speed_limit = detail.info.speed_limit;
                self.fields.measured_speed = detail.info.measured_speed;
                self.plate_parts = detail.plate_parts;
                self.auto_vehicle = detail.auto_vehicle.filter(|v| v.is_match());
                self.vehicle_info_found = detail.vehicle_info_found;
                self.lock_held = lock_held;
                self.read_only = !lock_held;
                self.state = ReviewState::Ready(ReviewMode::View);
            }
            ReviewEvent::OpenFailed { message } => {
                self.message = Some(message);
                self.lock_held = false;
                self.state = ReviewState::Closed;
            }
            ReviewEvent::EnterEdit => {
                if self.state == ReviewState::Ready(ReviewMode::View) && !self.read_only {
                    self.edit_buffer = Some(self.fields.clone());
                    self.state = ReviewState::Ready(ReviewMode::Edit);
                }
            }
            ReviewEvent::FieldEdited { field, value } => {
                if let Some(buffer) = self.edit_buffer.as_mut() {
                    buffer.set(field, value);
                }
            }
            ReviewEvent::SaveEdit => {
                if let Some(buffer) = self.edit_buffer.take() {
                    self.fields = buffer;
                    self.state = ReviewState::Ready(ReviewMode::View);
                }
            }
            ReviewEvent::LookupStarted => {
                self.lookup_pending = true;
                self.message = None;
            }
            ReviewEvent::LookupMatched {
                vehicle,
                plate_type,
                plate_number,
            } => {
                self.manual_vehicle = Some(vehicle);
                self.manual_plate = Some(PlateParts {
                    plate_type: plate_type.to_string(),
                    plate_number,
                });
                self.lookup_pending = false;
                self.message = None;
            }
            ReviewEvent::LookupNotFound { message }
            | ReviewEvent::LookupFailed { message } => {
                self.lookup_pending = false;
                self.message = Some(message);
            }
            ReviewEvent::SubmitStarted => {
                self.message = None;
                self.state = ReviewState::Submitting;
            }
            ReviewEvent::SubmitAccepted => {
                // Photo left the reviewable set; the server lock died with it
                self.lock_held = false;
                self.state = ReviewState::Closed;
            }
            ReviewEvent::SubmitRejected { message } => {
                // Busy indicator cleared, lock presumed still held
                self.message = Some(message);
                self.state = ReviewState::Ready(ReviewMode::View);
            }
            ReviewEvent::DiscardAccepted => {
                self.lock_held = false;
                self.state = ReviewState::Closed;
            }
            ReviewEvent::DiscardFailed { message } => {
                self.message = Some(message);
                self.state = ReviewState::Ready(ReviewMode::View);
            }
            ReviewEvent::Released { message } => {
                self.lock_held = false;
                self.message = message;
                self.state = ReviewState::Closed;
            }
        }
    }

    /// Plate parts destined for the submission payload:
    /// operator-entered parts when a manual match exists, else the
    /// auto-extracted parts, else the automatic match's own attributes
    fn submission_plate(&self) -> Option<(String, String)> {
        if self.manual_vehicle.is_some() {
            return self
                .manual_plate
                .as_ref()
                .map(|p| (p.plate_number.clone(), p.plate_type.clone()));
        }
        if let Some(auto) = &self.auto_vehicle {
            return match &self.plate_parts {
                Some(p) => Some((p.plate_number.clone(), p.plate_type.clone())),
                None => Some((auto.plate.clone(), auto.vehicle_type.clone())),
            };
        }
        None
    }

    /// Validate completeness and assemble the processing payload.
    ///
    /// On failure the validation-display flag is set and no payload is
    /// produced; the caller must not touch the network.
    pub fn prepare_submission(&mut self, user_id: i64) -> Result<SubmissionPayload> {
        let missing: Vec<&str> = [
            (self.fields.date.trim().is_empty(), "date"),
            (self.fields.time.trim().is_empty(), "time"),
            (self.fields.location.trim().is_empty(), "location"),
            (self.fields.speed_limit.trim().is_empty(), "speed limit"),
            (self.fields.measured_speed.trim().is_empty(), "measured speed"),
        ]
        .iter()
        .filter(|(empty, _)| *empty)
        .map(|(_, name)| *name)
        .collect();

        if !missing.is_empty() {
            self.show_validation = true;
            return Err(Error::Validation(format!(
                "Cannot process photo: missing {}",
                missing.join(", ")
            )));
        }

        let (lp_number, lp_type) = match self.submission_plate() {
            Some(parts) => parts,
            None => {
                self.show_validation = true;
                return Err(Error::Validation(
                    "Cannot process photo: no vehicle registry result".to_string(),
                ));
            }
        };

        let speed_limit_kmh: f64 = self.fields.speed_limit.trim().parse().map_err(|_| {
            self.show_validation = true;
            Error::Validation(format!(
                "Speed limit is not numeric: {}",
                self.fields.speed_limit
            ))
        })?;
        let current_speed_kmh: f64 = self.fields.measured_speed.trim().parse().map_err(|_| {
            self.show_validation = true;
            Error::Validation(format!(
                "Measured speed is not numeric: {}",
                self.fields.measured_speed
            ))
        })?;

        // Site label from the listing entry when present, else the
        // (possibly edited) location field
        let cruise = if self.cruise.trim().is_empty() {
            self.fields.location.clone()
        } else {
            self.cruise.clone()
        };

        self.show_validation = false;
        Ok(SubmissionPayload {
            cruise,
            timestamp: time::combine_timestamp(&self.fields.date, &self.fields.time),
            speed_limit_kmh,
            current_speed_kmh,
            lp_number: normalize_plate_number(&lp_number),
            lp_type,
            photo_id: self.photo_id,
            user_id,
        })
    }
}

/// Validate manual lookup inputs before any network call.
///
/// Both parts are required; the number is normalized to upper case.
pub fn validate_lookup_input(plate_type: &str, plate_number: &str) -> Result<(PlateType, String)> {
    if plate_type.trim().is_empty() || plate_number.trim().is_empty() {
        return Err(Error::Validation(
            "Complete plate type and number before searching".to_string(),
        ));
    }
    let parsed = plate_type.parse::<PlateType>()?;
    Ok((parsed, normalize_plate_number(plate_number)))
}
