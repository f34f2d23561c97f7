//! License plate type codes
//!
//! Category codes as issued by the vehicle registry, including the extended
//! codes added in later registry revisions (CD, DT, TC, CC, MI).

use serde::{Deserialize, Serialize};
use velo_common::Error;

/// License plate category code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateType {
    /// Alquiler (rental)
    A,
    /// Motorcycle
    M,
    /// Government use
    U,
    /// Official
    O,
    /// Commercial
    C,
    /// Special
    E,
    /// Private
    P,
    /// Diplomatic corps
    CD,
    /// Distributor/transit
    DT,
    /// Consular corps transport
    TC,
    /// Consular corps
    CC,
    /// International mission
    MI,
}

impl PlateType {
    pub const ALL: [PlateType; 12] = [
        PlateType::A,
        PlateType::M,
        PlateType::U,
        PlateType::O,
        PlateType::C,
        PlateType::E,
        PlateType::P,
        PlateType::CD,
        PlateType::DT,
        PlateType::TC,
        PlateType::CC,
        PlateType::MI,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlateType::A => "A",
            PlateType::M => "M",
            PlateType::U => "U",
            PlateType::O => "O",
            PlateType::C => "C",
            PlateType::E => "E",
            PlateType::P => "P",
            PlateType::CD => "CD",
            PlateType::DT => "DT",
            PlateType::TC => "TC",
            PlateType::CC => "CC",
            PlateType::MI => "MI",
        }
    }
}

impl std::fmt::Display for PlateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(PlateType::A),
            "M" => Ok(PlateType::M),
            "U" => Ok(PlateType::U),
            "O" => Ok(PlateType::O),
            "C" => Ok(PlateType::C),
            "E" => Ok(PlateType::E),
            "P" => Ok(PlateType::P),
            "CD" => Ok(PlateType::CD),
            "DT" => Ok(PlateType::DT),
            "TC" => Ok(PlateType::TC),
            "CC" => Ok(PlateType::CC),
            "MI" => Ok(PlateType::MI),
            other => Err(Error::Validation(format!("Unknown plate type: {other}"))),
        }
    }
}

/// Normalize an operator-entered plate number: trimmed and upper-cased
pub fn normalize_plate_number(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_codes_round_trip() {
        for plate_type in PlateType::ALL {
            let parsed: PlateType = plate_type.as_str().parse().unwrap();
            assert_eq!(parsed, plate_type);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("cd".parse::<PlateType>().unwrap(), PlateType::CD);
        assert_eq!(" p ".parse::<PlateType>().unwrap(), PlateType::P);
    }

    #[test]
    fn test_unknown_code_is_validation_error() {
        assert!(matches!(
            "ZZ".parse::<PlateType>(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_normalize_plate_number() {
        assert_eq!(normalize_plate_number(" abc123 "), "ABC123");
    }
}
