//! Data models for Inspecta

pub mod enums;
pub mod equipment;
pub mod import_report;
pub mod legacy;
pub mod product;

// Re-export commonly used types
pub use enums::{
    AudioCondition, CameraCondition, Classification, FaceIdStatus, PinCondition, StorageCapacity,
};
pub use equipment::{ButtonStatus, EquipmentRecord};
pub use import_report::CsvImport;
pub use legacy::LegacyEquipmentReport;
pub use product::ProductSku;
