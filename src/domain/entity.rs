//! Registry entity records and their typed views.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registry record: a customer or provider known to the CRM.
///
/// `tipo` is stored as free-form text because historical documents carry
/// values outside the recognized set; typed views go through
/// [`EntityRecord::kind`], which excludes unrecognized values.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntityRecord {
    /// Opaque record identifier.
    pub id: String,
    /// Display name, unique enough to look records up by.
    pub nombre: String,
    /// Contact email address.
    #[serde(default)]
    pub correo_electronico: String,
    /// Record kind tag; recognized values are `cliente` and `proveedor`.
    #[serde(default)]
    pub tipo: String,
    /// Location identifier, matched against sensor locations.
    #[serde(default)]
    pub direccion: String,
    /// Sensor ids associated with this record. Meaningful for providers;
    /// absent or empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transacciones_detalladas: Vec<String>,
}

impl EntityRecord {
    /// Returns the typed kind of this record, or `None` when `tipo` holds
    /// an unrecognized or missing value.
    #[must_use]
    pub fn kind(&self) -> Option<EntityKind> {
        EntityKind::parse(&self.tipo)
    }

    /// True when `nombre` equals `name` ignoring ASCII case.
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        self.nombre.eq_ignore_ascii_case(name)
    }
}

/// The two recognized entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A customer record.
    Cliente,
    /// A provider record, carrying associated sensor ids.
    Proveedor,
}

impl EntityKind {
    /// Parses a stored `tipo` value, ignoring case. Unrecognized values
    /// yield `None` so they drop out of typed views.
    #[must_use]
    pub fn parse(tipo: &str) -> Option<Self> {
        if tipo.eq_ignore_ascii_case("cliente") {
            Some(Self::Cliente)
        } else if tipo.eq_ignore_ascii_case("proveedor") {
            Some(Self::Proveedor)
        } else {
            None
        }
    }

    /// Canonical lowercase tag for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cliente => "cliente",
            Self::Proveedor => "proveedor",
        }
    }
}

/// Narrowed projection of an entity record used by the aggregated
/// listings. Deliberately drops everything except name and email.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntityCard {
    /// Display name.
    pub nombre: String,
    /// Contact email address.
    pub correo_electronico: String,
}

impl From<&EntityRecord> for EntityCard {
    fn from(record: &EntityRecord) -> Self {
        Self {
            nombre: record.nombre.clone(),
            correo_electronico: record.correo_electronico.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!(EntityKind::parse("Cliente"), Some(EntityKind::Cliente));
        assert_eq!(EntityKind::parse("PROVEEDOR"), Some(EntityKind::Proveedor));
        assert_eq!(EntityKind::parse("distribuidor"), None);
        assert_eq!(EntityKind::parse(""), None);
    }

    #[test]
    fn unrecognized_tipo_has_no_kind() {
        let record = EntityRecord {
            id: "9".into(),
            nombre: "Legacy".into(),
            correo_electronico: "legacy@example.com".into(),
            tipo: "partner".into(),
            direccion: "u1".into(),
            transacciones_detalladas: Vec::new(),
        };
        assert!(record.kind().is_none());
    }
}
