//! Data models for the review console

pub mod photo;
pub mod plate;
pub mod review;
pub mod vehicle;

pub use photo::{PhotoDetail, PhotoPage, PhotoSummary, PlateParts};
pub use plate::PlateType;
pub use review::{ReviewEvent, ReviewField, ReviewMode, ReviewSession, ReviewState, SubmissionPayload};
pub use vehicle::VehicleRecord;
