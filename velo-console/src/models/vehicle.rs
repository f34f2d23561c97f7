//! Vehicle registry (SAT) lookup result

use serde::{Deserialize, Serialize};

/// Vehicle attribute bundle returned by the registry.
///
/// Field names are upper-case on the wire; a response with an empty `PLACA`
/// is the well-formed "not found" indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Registry status
    #[serde(rename = "ESTADO", default)]
    pub status: String,
    /// Plate number
    #[serde(rename = "PLACA", default)]
    pub plate: String,
    /// Brand
    #[serde(rename = "MARCA", default)]
    pub brand: String,
    /// Model line
    #[serde(rename = "LINEA", default)]
    pub line: String,
    /// Model year
    #[serde(rename = "MODELO", default)]
    pub model_year: String,
    #[serde(rename = "COLOR", default)]
    pub color: String,
    /// Vehicle type (doubles as the plate type code for submission)
    #[serde(rename = "TIPO", default)]
    pub vehicle_type: String,
    /// Usage class
    #[serde(rename = "USO", default)]
    pub usage: String,
    /// Engine displacement
    #[serde(rename = "CC", default)]
    pub displacement: String,
}

impl VehicleRecord {
    /// A match carries a non-empty plate number
    pub fn is_match(&self) -> bool {
        !self.plate.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_names() {
        let record: VehicleRecord = serde_json::from_str(
            r#"{"ESTADO":"VIGENTE","PLACA":"ABC123","MARCA":"TOYOTA","LINEA":"COROLLA",
                "MODELO":"2019","COLOR":"GRIS","TIPO":"P","USO":"PARTICULAR","CC":"1800"}"#,
        )
        .unwrap();
        assert_eq!(record.plate, "ABC123");
        assert_eq!(record.vehicle_type, "P");
        assert!(record.is_match());
    }

    #[test]
    fn test_empty_plate_is_not_found() {
        let record: VehicleRecord = serde_json::from_str(r#"{"ESTADO":"","PLACA":""}"#).unwrap();
        assert!(!record.is_match());
    }
}
