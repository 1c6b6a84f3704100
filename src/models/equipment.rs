//! Equipment inspection record

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{
    AudioCondition, CameraCondition, Classification, FaceIdStatus, PinCondition, StorageCapacity,
};
use super::product::ProductSku;

/// Battery level a fresh form starts with
pub const DEFAULT_BATTERY: u8 = 50;

/// Button checklist
///
/// When `all_working` is set the individual flags carry no information and
/// must be read through [`ButtonStatus::effective`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonStatus {
    pub all_working: bool,
    pub volume: bool,
    pub power: bool,
    pub home: bool,
    pub mute: bool,
}

impl ButtonStatus {
    pub fn all() -> Self {
        Self {
            all_working: true,
            ..Self::default()
        }
    }

    /// Individual flags with `all_working` applied
    pub fn effective(&self) -> Self {
        if self.all_working {
            Self {
                all_working: true,
                volume: true,
                power: true,
                home: true,
                mute: true,
            }
        } else {
            *self
        }
    }
}

/// One inspection report, keyed by its barcode
///
/// Attached photos are never part of the record; they are only used while
/// rendering documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentRecord {
    /// Unique key, generated when the form is started
    #[validate(length(min = 1, message = "barcode must not be empty"))]
    pub barcode: String,
    pub reception_date: Option<NaiveDate>,
    /// Technician who received the unit
    pub receiver: String,
    pub model: String,
    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    pub cost: f64,
    pub serial_number: String,
    pub storage: Option<StorageCapacity>,
    pub color: String,
    pub classification: Option<Classification>,
    pub product: Option<ProductSku>,
    /// Battery health in percent
    #[validate(range(max = 100, message = "battery must be between 0 and 100"))]
    pub battery: u8,
    pub chassis_condition: String,
    pub screen_condition: String,
    pub speakers: Option<AudioCondition>,
    pub earpiece: Option<AudioCondition>,
    pub charging_pin: Option<PinCondition>,
    pub buttons: ButtonStatus,
    pub face_id: Option<FaceIdStatus>,
    pub camera: Option<CameraCondition>,
    pub notes: String,
    pub technician_signature: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl EquipmentRecord {
    /// Empty report for a new barcode
    pub fn new(barcode: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            ..Self::default()
        }
    }
}

impl Default for EquipmentRecord {
    fn default() -> Self {
        Self {
            barcode: String::new(),
            reception_date: None,
            receiver: String::new(),
            model: String::new(),
            cost: 0.0,
            serial_number: String::new(),
            storage: None,
            color: String::new(),
            classification: None,
            product: None,
            battery: DEFAULT_BATTERY,
            chassis_condition: String::new(),
            screen_condition: String::new(),
            speakers: None,
            earpiece: None,
            charging_pin: None,
            buttons: ButtonStatus::default(),
            face_id: None,
            camera: None,
            notes: String::new(),
            technician_signature: None,
            generated_at: None,
        }
    }
}
