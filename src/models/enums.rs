//! Inspection enums shared by records and the listing view

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// StorageCapacity
// ---------------------------------------------------------------------------

/// Internal storage of the inspected device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum StorageCapacity {
    #[serde(rename = "32GB")]
    Gb32,
    #[serde(rename = "64GB")]
    Gb64,
    #[serde(rename = "128GB")]
    Gb128,
    #[serde(rename = "256GB")]
    Gb256,
    #[serde(rename = "512GB")]
    Gb512,
    #[serde(rename = "1TB")]
    Tb1,
}

impl std::fmt::Display for StorageCapacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StorageCapacity::Gb32 => "32GB",
            StorageCapacity::Gb64 => "64GB",
            StorageCapacity::Gb128 => "128GB",
            StorageCapacity::Gb256 => "256GB",
            StorageCapacity::Gb512 => "512GB",
            StorageCapacity::Tb1 => "1TB",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Commercial grade assigned after inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Classification {
    #[serde(rename = "OB")]
    Ob,
    #[serde(rename = "TI")]
    Ti,
    #[serde(rename = "SE")]
    Se,
    #[serde(rename = "RE")]
    Re,
}

impl Classification {
    /// Two-letter code as stored and searched
    pub fn code(&self) -> &'static str {
        match self {
            Classification::Ob => "OB",
            Classification::Ti => "TI",
            Classification::Se => "SE",
            Classification::Re => "RE",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Component conditions
// ---------------------------------------------------------------------------

/// Loudspeaker / earpiece condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AudioCondition {
    Perfect,
    SlightlyHoarse,
    VeryHoarse,
    NoSound,
}

impl std::fmt::Display for AudioCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AudioCondition::Perfect => "Perfect",
            AudioCondition::SlightlyHoarse => "Slightly hoarse",
            AudioCondition::VeryHoarse => "Very hoarse",
            AudioCondition::NoSound => "No sound",
        };
        write!(f, "{}", label)
    }
}

/// Charging connector condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PinCondition {
    Perfect,
    SlightlyDamaged,
    Damaged,
}

impl std::fmt::Display for PinCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PinCondition::Perfect => "Perfect",
            PinCondition::SlightlyDamaged => "Slightly damaged",
            PinCondition::Damaged => "Damaged",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum FaceIdStatus {
    Working,
    NotWorking,
}

impl std::fmt::Display for FaceIdStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FaceIdStatus::Working => "Working",
            FaceIdStatus::NotWorking => "Not working",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum CameraCondition {
    Perfect,
    ImperceptibleSpots,
    BrokenLens,
    Damaged,
}

impl std::fmt::Display for CameraCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CameraCondition::Perfect => "Perfect",
            CameraCondition::ImperceptibleSpots => "Imperceptible spots",
            CameraCondition::BrokenLens => "Broken lens",
            CameraCondition::Damaged => "Damaged",
        };
        write!(f, "{}", label)
    }
}
