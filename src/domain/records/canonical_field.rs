// ============================================================
// CANONICAL FIELDS
// ============================================================
// The six contact attributes extracted from arbitrary sheet headers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Target attribute of a normalized contact record.
///
/// Variant order is the fixed declaration order used for matching and for
/// reporting found fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "DNI")]
    Dni,
    #[serde(rename = "IBAN")]
    Iban,
    #[serde(rename = "Dirección")]
    Direccion,
    #[serde(rename = "Nombre")]
    Nombre,
    #[serde(rename = "CUPS")]
    Cups,
    #[serde(rename = "Teléfono")]
    Telefono,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Dni,
        CanonicalField::Iban,
        CanonicalField::Direccion,
        CanonicalField::Nombre,
        CanonicalField::Cups,
        CanonicalField::Telefono,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CanonicalField::Dni => "DNI",
            CanonicalField::Iban => "IBAN",
            CanonicalField::Direccion => "Dirección",
            CanonicalField::Nombre => "Nombre",
            CanonicalField::Cups => "CUPS",
            CanonicalField::Telefono => "Teléfono",
        }
    }

    /// Substrings searched for inside a normalized header key, in priority order
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Dni => &["dni", "documento", "cedula", "identificacion", "nif", "nie"],
            CanonicalField::Iban => &["iban", "cuenta", "cuentabancaria", "numero", "numerocuenta"],
            CanonicalField::Direccion => &["direccion", "domicilio", "calle", "direccioncompleta"],
            CanonicalField::Nombre => &[
                "nombre",
                "name",
                "cliente",
                "razonsocial",
                "empresa",
                "titular",
            ],
            CanonicalField::Cups => &["cups", "codigocups", "codigo"],
            CanonicalField::Telefono => &[
                "telefono", "phone", "movil", "celular", "contacto", "numero", "tlf",
            ],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical field -> originating sheet header.
///
/// Unmatched fields are simply absent. Several fields may point at the same
/// header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<CanonicalField, String>);

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: CanonicalField, header: impl Into<String>) {
        self.0.insert(field, header.into());
    }

    pub fn source_column(&self, field: CanonicalField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Matched fields in declaration order
    pub fn found_fields(&self) -> Vec<CanonicalField> {
        self.0.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_fields_follow_declaration_order() {
        let mut mapping = FieldMapping::new();
        mapping.insert(CanonicalField::Telefono, "Movil");
        mapping.insert(CanonicalField::Dni, "Documento");
        assert_eq!(
            mapping.found_fields(),
            vec![CanonicalField::Dni, CanonicalField::Telefono]
        );
    }

    #[test]
    fn test_mapping_serializes_with_labels() {
        let mut mapping = FieldMapping::new();
        mapping.insert(CanonicalField::Direccion, "Calle");
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["Dirección"], "Calle");
    }
}
