//! Photo record wire shapes

use crate::models::vehicle::VehicleRecord;
use serde::{Deserialize, Serialize};

/// One entry of a listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSummary {
    pub id: i64,
    /// Base64-encoded image payload, kept opaque by the console
    #[serde(default)]
    pub photo_base64: String,
    #[serde(default)]
    pub photo_date: String,
    #[serde(default)]
    pub photo_status: String,
}

/// Listing response; the shape varies by server revision
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PhotoPage {
    /// Bare array of summaries
    Plain(Vec<PhotoSummary>),
    /// Envelope with a total count
    Paged {
        photos: Vec<PhotoSummary>,
        total: i64,
    },
}

impl PhotoPage {
    pub fn into_photos(self) -> Vec<PhotoSummary> {
        match self {
            PhotoPage::Plain(photos) => photos,
            PhotoPage::Paged { photos, .. } => photos,
        }
    }
}

/// Auto-extracted plate parts attached to a photo detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateParts {
    #[serde(rename = "lpType")]
    pub plate_type: String,
    #[serde(rename = "lpNumber")]
    pub plate_number: String,
}

/// Nested editable fields of the detail response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoInfo {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "speedLimit", default)]
    pub speed_limit: String,
    #[serde(rename = "measuredSpeed", default)]
    pub measured_speed: String,
    #[serde(rename = "videoNumber", default)]
    pub video_number: i64,
    #[serde(rename = "serialNumber", default)]
    pub serial_number: i64,
}

/// Full photo detail as served by `GET /photos/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoDetail {
    pub id: i64,
    #[serde(rename = "photo_info", default)]
    pub info: PhotoInfo,
    /// Automatically-detected vehicle match, if the registry found one
    #[serde(rename = "consultaVehiculo", default)]
    pub auto_vehicle: Option<VehicleRecord>,
    /// False when the registry had no information for the detected plate
    #[serde(rename = "isSatVehicleInfoFound", default)]
    pub vehicle_info_found: bool,
    #[serde(default)]
    pub plate_parts: Option<PlateParts>,
}
