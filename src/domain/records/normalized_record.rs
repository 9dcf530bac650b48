use serde::{Deserialize, Serialize};

use super::CanonicalField;

/// A cleaned contact row.
///
/// Field order here is the column order of the exported workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(rename = "DNI")]
    pub dni: String,
    #[serde(rename = "IBAN")]
    pub iban: String,
    #[serde(rename = "Dirección")]
    pub direccion: String,
    #[serde(rename = "Nombre")]
    pub nombre: String,
    #[serde(rename = "CUPS")]
    pub cups: String,
    #[serde(rename = "Teléfono")]
    pub telefono: String,
    /// 1-based position of the source row in the uploaded sheet
    #[serde(rename = "ID")]
    pub id: usize,
}

impl NormalizedRecord {
    pub const COLUMNS: [&'static str; 7] =
        ["DNI", "IBAN", "Dirección", "Nombre", "CUPS", "Teléfono", "ID"];

    pub fn with_id(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Dni => &self.dni,
            CanonicalField::Iban => &self.iban,
            CanonicalField::Direccion => &self.direccion,
            CanonicalField::Nombre => &self.nombre,
            CanonicalField::Cups => &self.cups,
            CanonicalField::Telefono => &self.telefono,
        }
    }

    pub fn set(&mut self, field: CanonicalField, value: String) {
        let slot = match field {
            CanonicalField::Dni => &mut self.dni,
            CanonicalField::Iban => &mut self.iban,
            CanonicalField::Direccion => &mut self.direccion,
            CanonicalField::Nombre => &mut self.nombre,
            CanonicalField::Cups => &mut self.cups,
            CanonicalField::Telefono => &mut self.telefono,
        };
        *slot = value;
    }

    /// True when every canonical field is empty after trimming
    pub fn is_blank(&self) -> bool {
        CanonicalField::ALL
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
    }

    /// Digits-only phone number, the deduplication key
    pub fn phone_key(&self) -> String {
        self.telefono.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_key_strips_separators() {
        let mut record = NormalizedRecord::with_id(1);
        record.set(CanonicalField::Telefono, "+34 612-345-678".to_string());
        assert_eq!(record.phone_key(), "34612345678");
    }

    #[test]
    fn test_blank_ignores_id() {
        assert!(NormalizedRecord::with_id(7).is_blank());
    }

    #[test]
    fn test_serialized_key_order_matches_columns() {
        let json = serde_json::to_string(&NormalizedRecord::with_id(3)).unwrap();
        let positions: Vec<usize> = NormalizedRecord::COLUMNS
            .iter()
            .map(|col| json.find(&format!("\"{}\"", col)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
