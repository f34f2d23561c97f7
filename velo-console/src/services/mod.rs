//! Remote service clients
//!
//! One client per remote collaborator, all sharing the [`gateway::ApiGateway`]
//! for bearer auth and transparent token refresh.

pub mod auth;
pub mod cruises;
pub mod gateway;
pub mod photos;
pub mod vehicles;

pub use auth::AuthClient;
pub use cruises::{Cruise, CruiseClient};
pub use gateway::ApiGateway;
pub use photos::{PhotosClient, ProcessOutcome, RejectionReason};
pub use vehicles::VehicleLookupClient;
