//! Record layout written by the first generation of the inspection app
//!
//! Those records use Spanish field names and labels. They are only ever read,
//! translated field by field into [`EquipmentRecord`], and written back in the
//! current layout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::enums::{
    AudioCondition, CameraCondition, Classification, FaceIdStatus, PinCondition, StorageCapacity,
};
use super::equipment::{ButtonStatus, EquipmentRecord, DEFAULT_BATTERY};
use super::product::ProductSku;

/// Field that only the legacy layout carries
pub const LEGACY_MARKER: &str = "codigoBarras";

/// Whether a stored JSON object uses the legacy layout
pub fn is_legacy(value: &Value) -> bool {
    value.get(LEGACY_MARKER).is_some() && value.get("barcode").is_none()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LegacyButtons {
    pub volumen: bool,
    pub encendido: bool,
    pub home: bool,
    pub silencio: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyEquipmentReport {
    pub codigo_barras: String,
    pub fecha_recepcion: String,
    pub receptor: String,
    pub modelo: String,
    pub costo: Value,
    pub numero_serie: String,
    pub almacenamiento: String,
    pub color: String,
    pub clasificacion: String,
    #[serde(rename = "productoSKU")]
    pub producto_sku: Option<ProductSku>,
    pub bateria: Value,
    pub estado_chassis: String,
    pub estado_pantalla: String,
    pub parlantes: String,
    pub auricular: String,
    pub pin_carga: String,
    pub todos_botones_funcionan: bool,
    pub botones_individuales: LegacyButtons,
    pub face_id: String,
    pub camara: String,
    pub observaciones: String,
    pub fecha_generacion: String,
    pub tecnico_firma: Option<String>,
}

/// Numbers were sometimes kept as the raw text of the input field
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn reception_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
}

fn generated_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn storage(label: &str) -> Option<StorageCapacity> {
    match label.trim().to_ascii_uppercase().as_str() {
        "32GB" => Some(StorageCapacity::Gb32),
        "64GB" => Some(StorageCapacity::Gb64),
        "128GB" => Some(StorageCapacity::Gb128),
        "256GB" => Some(StorageCapacity::Gb256),
        "512GB" => Some(StorageCapacity::Gb512),
        "1TB" => Some(StorageCapacity::Tb1),
        _ => None,
    }
}

fn classification(code: &str) -> Option<Classification> {
    match code.trim().to_ascii_uppercase().as_str() {
        "OB" => Some(Classification::Ob),
        "TI" => Some(Classification::Ti),
        "SE" => Some(Classification::Se),
        "RE" => Some(Classification::Re),
        _ => None,
    }
}

fn audio(label: &str) -> Option<AudioCondition> {
    match label.trim() {
        "Perfecto" => Some(AudioCondition::Perfect),
        "Levemente Ronco" => Some(AudioCondition::SlightlyHoarse),
        "Muy Ronco" => Some(AudioCondition::VeryHoarse),
        "No suena" => Some(AudioCondition::NoSound),
        _ => None,
    }
}

fn pin(label: &str) -> Option<PinCondition> {
    match label.trim() {
        "Perfecto" => Some(PinCondition::Perfect),
        "Levemente Dañado" => Some(PinCondition::SlightlyDamaged),
        "Dañado" => Some(PinCondition::Damaged),
        _ => None,
    }
}

fn face_id(label: &str) -> Option<FaceIdStatus> {
    match label.trim() {
        "Funciona" => Some(FaceIdStatus::Working),
        "No funciona" => Some(FaceIdStatus::NotWorking),
        _ => None,
    }
}

fn camera(label: &str) -> Option<CameraCondition> {
    match label.trim() {
        "Perfecto" => Some(CameraCondition::Perfect),
        "Manchas Imperceptibles" => Some(CameraCondition::ImperceptibleSpots),
        "Lente Roto" => Some(CameraCondition::BrokenLens),
        "Dañada" => Some(CameraCondition::Damaged),
        _ => None,
    }
}

impl From<LegacyEquipmentReport> for EquipmentRecord {
    fn from(old: LegacyEquipmentReport) -> Self {
        let battery = number(&old.bateria)
            .map(|b| b.clamp(0.0, 100.0).round() as u8)
            .unwrap_or(DEFAULT_BATTERY);
        let cost = number(&old.costo).map(|c| c.max(0.0)).unwrap_or(0.0);

        Self {
            barcode: old.codigo_barras.trim().to_string(),
            reception_date: reception_date(&old.fecha_recepcion),
            receiver: old.receptor,
            model: old.modelo,
            cost,
            serial_number: old.numero_serie,
            storage: storage(&old.almacenamiento),
            color: old.color,
            classification: classification(&old.clasificacion),
            product: old.producto_sku,
            battery,
            chassis_condition: old.estado_chassis,
            screen_condition: old.estado_pantalla,
            speakers: audio(&old.parlantes),
            earpiece: audio(&old.auricular),
            charging_pin: pin(&old.pin_carga),
            buttons: ButtonStatus {
                all_working: old.todos_botones_funcionan,
                volume: old.botones_individuales.volumen,
                power: old.botones_individuales.encendido,
                home: old.botones_individuales.home,
                mute: old.botones_individuales.silencio,
            },
            face_id: face_id(&old.face_id),
            camera: camera(&old.camara),
            notes: old.observaciones,
            technician_signature: old.tecnico_firma.filter(|s| !s.trim().is_empty()),
            generated_at: generated_at(&old.fecha_generacion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn original_report() -> Value {
        json!({
            "fechaRecepcion": "2024-03-18",
            "receptor": "Ana",
            "modelo": "iPhone 12",
            "costo": 250,
            "numeroSerie": "F2LXK0AAQ1",
            "almacenamiento": "128GB",
            "color": "Azul",
            "clasificacion": "SE",
            "productoSKU": {"sku": "IPH12-128", "nombre": "iPhone 12 128GB"},
            "bateria": 86,
            "estadoChassis": "Rayones leves",
            "estadoPantalla": "Perfecta",
            "parlantes": "Perfecto",
            "auricular": "Levemente Ronco",
            "pinCarga": "Dañado",
            "todosBotonesFuncionan": false,
            "botonesIndividuales": {"volumen": true, "encendido": true, "home": false, "silencio": true},
            "faceId": "No funciona",
            "camara": "Manchas Imperceptibles",
            "imagenes": [{}],
            "observaciones": "Sin caja",
            "codigoBarras": "EQ17106720001A2B",
            "fechaGeneracion": "2024-03-18T14:05:09.123Z",
            "tecnicoFirma": "J. Pérez"
        })
    }

    #[test]
    fn translates_every_field() {
        let value = original_report();
        assert!(is_legacy(&value));

        let old: LegacyEquipmentReport = serde_json::from_value(value).unwrap();
        let record = EquipmentRecord::from(old);

        assert_eq!(record.barcode, "EQ17106720001A2B");
        assert_eq!(record.reception_date, NaiveDate::from_ymd_opt(2024, 3, 18));
        assert_eq!(record.receiver, "Ana");
        assert_eq!(record.model, "iPhone 12");
        assert_eq!(record.cost, 250.0);
        assert_eq!(record.storage, Some(StorageCapacity::Gb128));
        assert_eq!(record.classification, Some(Classification::Se));
        assert_eq!(record.product.as_ref().map(|p| p.name.as_str()), Some("iPhone 12 128GB"));
        assert_eq!(record.battery, 86);
        assert_eq!(record.speakers, Some(AudioCondition::Perfect));
        assert_eq!(record.earpiece, Some(AudioCondition::SlightlyHoarse));
        assert_eq!(record.charging_pin, Some(PinCondition::Damaged));
        assert!(record.buttons.volume && !record.buttons.home);
        assert_eq!(record.face_id, Some(FaceIdStatus::NotWorking));
        assert_eq!(record.camera, Some(CameraCondition::ImperceptibleSpots));
        assert_eq!(record.notes, "Sin caja");
        assert_eq!(record.technician_signature.as_deref(), Some("J. Pérez"));
        assert!(record.generated_at.is_some());
    }

    #[test]
    fn blank_form_values_fall_back_to_defaults() {
        let old: LegacyEquipmentReport = serde_json::from_value(json!({
            "codigoBarras": "EQ2",
            "fechaRecepcion": "",
            "costo": "abc",
            "bateria": "",
            "parlantes": "",
            "fechaGeneracion": ""
        }))
        .unwrap();
        let record = EquipmentRecord::from(old);

        assert_eq!(record.reception_date, None);
        assert_eq!(record.cost, 0.0);
        assert_eq!(record.battery, DEFAULT_BATTERY);
        assert_eq!(record.speakers, None);
        assert_eq!(record.generated_at, None);
    }

    #[test]
    fn numbers_typed_as_text_are_read() {
        let old: LegacyEquipmentReport = serde_json::from_value(json!({
            "codigoBarras": "EQ3",
            "costo": "199,90",
            "bateria": "140"
        }))
        .unwrap();
        let record = EquipmentRecord::from(old);
        assert_eq!(record.cost, 199.9);
        assert_eq!(record.battery, 100);
    }

    #[test]
    fn current_records_are_not_mistaken_for_legacy() {
        assert!(!is_legacy(&json!({"barcode": "EQ1", "model": "x"})));
    }
}
