//! Cruise (camera site) catalog client

use crate::services::gateway::ApiGateway;
use serde::Deserialize;
use velo_common::Result;

/// A physical camera/speed-enforcement location
#[derive(Debug, Clone, Deserialize)]
pub struct Cruise {
    pub id: i64,
    pub cruise_name: String,
}

pub struct CruiseClient<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> CruiseClient<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// Read-only list of filter options for the listing screen
    pub async fn list(&self) -> Result<Vec<Cruise>> {
        self.gateway.get_json("/cruises").await
    }
}
