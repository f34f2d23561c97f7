//! Vehicle registry (SAT) lookup client

use crate::models::plate::PlateType;
use crate::models::vehicle::VehicleRecord;
use crate::services::gateway::ApiGateway;
use velo_common::{Error, Result};

pub struct VehicleLookupClient<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> VehicleLookupClient<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// Query the registry by plate type and number.
    ///
    /// A well-formed response with an empty plate is the registry's
    /// "not found" indicator and maps to `LookupNotFound`.
    pub async fn lookup(&self, plate_type: PlateType, plate_number: &str) -> Result<VehicleRecord> {
        let body = serde_json::json!({
            "placa": plate_number,
            "tipo": plate_type.as_str(),
        });

        tracing::debug!(plate_type = %plate_type, "querying vehicle registry");
        let vehicle: VehicleRecord = self
            .gateway
            .post_json("/photos/consultar-vehiculo", &body)
            .await?;

        if !vehicle.is_match() {
            return Err(Error::LookupNotFound(
                "No information found for the entered plate".to_string(),
            ));
        }

        tracing::info!(plate = %vehicle.plate, brand = %vehicle.brand, "vehicle registry match");
        Ok(vehicle)
    }
}
