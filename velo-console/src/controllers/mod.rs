//! Listing and review workflow controllers

pub mod listing;
pub mod review;

pub use listing::{ListingController, PhotoCatalog, PAGE_SIZE};
pub use review::{PhotoService, ReviewController, VehicleRegistry};
