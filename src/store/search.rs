//! Case-insensitive substring search over loaded records

use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::EquipmentRecord;

/// Field a search query is matched against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// Model, receiver, serial, barcode and classification
    #[default]
    All,
    Model,
    Receiver,
    #[serde(alias = "serialNumber")]
    Serial,
    Barcode,
}

impl std::str::FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(SearchField::All),
            "model" => Ok(SearchField::Model),
            "receiver" => Ok(SearchField::Receiver),
            "serial" | "serialnumber" => Ok(SearchField::Serial),
            "barcode" => Ok(SearchField::Barcode),
            other => Err(format!("unknown search field '{}'", other)),
        }
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Does `record` match the already lowercased, trimmed `needle`?
pub fn matches(record: &EquipmentRecord, needle: &str, field: SearchField) -> bool {
    match field {
        SearchField::Model => contains(&record.model, needle),
        SearchField::Receiver => contains(&record.receiver, needle),
        SearchField::Serial => contains(&record.serial_number, needle),
        SearchField::Barcode => contains(&record.barcode, needle),
        SearchField::All => {
            contains(&record.model, needle)
                || contains(&record.receiver, needle)
                || contains(&record.serial_number, needle)
                || contains(&record.barcode, needle)
                || record
                    .classification
                    .map(|c| contains(c.code(), needle))
                    .unwrap_or(false)
        }
    }
}

/// Records matching `query` on `field`; a blank query keeps everything
pub fn filter(records: &[EquipmentRecord], query: &str, field: SearchField) -> Vec<EquipmentRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| matches(record, &needle, field))
        .cloned()
        .collect()
}
