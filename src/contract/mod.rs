//! Schema contracts: the validation gate every outbound payload passes.
//!
//! The schema documents are external collaborators supplied on disk and
//! treated as hot-reloadable state: every validation re-reads its document
//! instead of baking the contract in at startup. Validation itself uses
//! JSON Schema Draft 2020-12 via the `jsonschema` crate.
//!
//! Stored-record validation runs in **strict mode**: the first record that
//! fails its contract fails the whole request as a data-integrity fault.
//! Records are never silently skipped.

use std::path::PathBuf;

use jsonschema::Validator;
use serde::Serialize;

use crate::domain::UnifiedPayload;
use crate::error::ApiError;

/// The schema documents this system recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDoc {
    /// Contract for registry entity records.
    Entity,
    /// Contract for sensor records.
    Sensor,
    /// Contract for reading records.
    Reading,
    /// Unified contract for composed response envelopes.
    Unified,
}

impl SchemaDoc {
    /// File name of this document inside the schemas directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Entity => "ClienteProveedor.schema.json",
            Self::Sensor => "SensorIoT.schema.json",
            Self::Reading => "LecturaSensor.schema.json",
            Self::Unified => "schemaUnificado.schema.json",
        }
    }
}

/// Loads schema documents from a directory, re-reading on every call so
/// contract changes take effect without a restart.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    dir: PathBuf,
}

impl SchemaStore {
    /// Creates a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads and parses one schema document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] naming the document on read or parse
    /// failure.
    pub fn load(&self, doc: SchemaDoc) -> Result<serde_json::Value, ApiError> {
        let path = self.dir.join(doc.file_name());
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            ApiError::Internal(format!("error loading schema {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ApiError::Internal(format!("error parsing schema {}: {e}", path.display()))
        })
    }

    /// Compiles one schema document into a reusable validator.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] when the document cannot be loaded
    /// or is not a valid JSON Schema.
    fn compile(&self, doc: SchemaDoc) -> Result<Validator, ApiError> {
        let schema = self.load(doc)?;
        Validator::new(&schema).map_err(|e| {
            ApiError::Internal(format!("invalid schema {}: {e}", doc.file_name()))
        })
    }
}

/// Collects every violation a validator reports for `instance`, joined
/// into one message. `Ok(())` when the instance conforms.
fn check(validator: &Validator, instance: &serde_json::Value) -> Result<(), String> {
    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{e} at {}", e.instance_path()))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

/// The validation gate in front of every outbound payload.
#[derive(Debug, Clone)]
pub struct ContractGate {
    store: SchemaStore,
}

impl ContractGate {
    /// Creates a gate over the given schema store.
    #[must_use]
    pub fn new(store: SchemaStore) -> Self {
        Self { store }
    }

    /// Validates a composed envelope against the unified schema.
    ///
    /// The sub-schema is selected by the envelope's `type` tag inside the
    /// unified document; the gate itself is shape-agnostic.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ContractViolation`] carrying the validation
    /// message, or [`ApiError::Internal`] when the schema document itself
    /// is unusable.
    pub fn validate_envelope(&self, payload: &UnifiedPayload) -> Result<(), ApiError> {
        let value = serde_json::to_value(payload)
            .map_err(|e| ApiError::Internal(format!("error serializing response: {e}")))?;
        let validator = self.store.compile(SchemaDoc::Unified)?;
        check(&validator, &value).map_err(|message| {
            tracing::warn!(payload_type = payload.type_tag(), %message, "contract violation");
            ApiError::ContractViolation(message)
        })
    }

    /// Validates stored records about to be returned, strict mode: the
    /// first non-conforming record fails the whole request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DataIntegrity`] for the first record violating
    /// its contract, or [`ApiError::Internal`] when the schema document is
    /// unusable.
    pub fn validate_records<T: Serialize>(
        &self,
        doc: SchemaDoc,
        records: &[T],
    ) -> Result<(), ApiError> {
        let validator = self.store.compile(doc)?;
        for record in records {
            let value = serde_json::to_value(record)
                .map_err(|e| ApiError::Internal(format!("error serializing record: {e}")))?;
            check(&validator, &value).map_err(|message| {
                ApiError::DataIntegrity(format!(
                    "stored record does not conform to {}: {message}",
                    doc.file_name()
                ))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{EntityRecord, Reading, Sensor, SensorSummary};
    use std::path::PathBuf;

    fn repo_gate() -> ContractGate {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schemas");
        ContractGate::new(SchemaStore::new(dir))
    }

    fn sample_sensor() -> Sensor {
        Sensor {
            id: "s1".into(),
            tipo: "temperatura".into(),
            ubicacion: "u1".into(),
        }
    }

    fn sample_reading() -> Reading {
        Reading {
            id_lectura: "l1".into(),
            id_sensor: "s1".into(),
            timestamp: "2025-11-20T10:15:00Z".into(),
            valor: 21.5,
            unidad: Some("C".into()),
        }
    }

    #[test]
    fn conforming_summary_envelope_passes() {
        let gate = repo_gate();
        let payload = UnifiedPayload::Resumen(vec![SensorSummary {
            sensor: sample_sensor(),
            lecturas: vec![sample_reading()],
        }]);
        assert!(gate.validate_envelope(&payload).is_ok());
    }

    #[test]
    fn empty_summary_envelope_passes() {
        // The degraded /resumen response must still conform.
        let gate = repo_gate();
        assert!(
            gate.validate_envelope(&UnifiedPayload::Resumen(Vec::new()))
                .is_ok()
        );
    }

    #[test]
    fn envelope_missing_required_field_is_rejected() {
        let gate = repo_gate();
        let Ok(schema) = gate.store.load(SchemaDoc::Unified) else {
            panic!("unified schema should load");
        };
        let Ok(validator) = Validator::new(&schema) else {
            panic!("unified schema should compile");
        };
        // A resumen entry without its `lecturas` field.
        let malformed = serde_json::json!({
            "type": "resumen",
            "data": [{"sensor": {"id": "s1", "tipo": "t", "ubicacion": "u1"}}]
        });
        assert!(check(&validator, &malformed).is_err());
    }

    #[test]
    fn violating_envelope_is_a_contract_violation() {
        let gate = repo_gate();
        // An empty nombre violates the entity sub-schema for this tag.
        let payload = UnifiedPayload::ClienteDetalle(EntityRecord {
            id: "1".into(),
            nombre: String::new(),
            correo_electronico: "x@y.example".into(),
            tipo: "cliente".into(),
            direccion: "u1".into(),
            transacciones_detalladas: Vec::new(),
        });
        let result = gate.validate_envelope(&payload);
        assert!(matches!(result, Err(ApiError::ContractViolation(_))));
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let gate = repo_gate();
        let Ok(schema) = gate.store.load(SchemaDoc::Unified) else {
            panic!("unified schema should load");
        };
        let Ok(validator) = Validator::new(&schema) else {
            panic!("unified schema should compile");
        };
        let malformed = serde_json::json!({"type": "inventario", "data": []});
        assert!(check(&validator, &malformed).is_err());
    }

    #[test]
    fn non_conforming_record_is_a_server_error() {
        // Strict-mode policy assertion: a stored record violating its
        // contract is a data-integrity fault, never a skipped entry.
        let gate = repo_gate();
        let record = EntityRecord {
            id: "1".into(),
            nombre: "Acme".into(),
            correo_electronico: String::new(),
            tipo: "mayorista".into(),
            direccion: "u1".into(),
            transacciones_detalladas: Vec::new(),
        };
        let result = gate.validate_records(SchemaDoc::Entity, &[record]);
        assert!(matches!(result, Err(ApiError::DataIntegrity(_))));
    }

    #[test]
    fn conforming_records_pass() {
        let gate = repo_gate();
        let result = gate.validate_records(SchemaDoc::Sensor, &[sample_sensor()]);
        assert!(result.is_ok());
    }

    #[test]
    fn missing_schema_document_is_internal() {
        let gate = ContractGate::new(SchemaStore::new("/nonexistent"));
        let result = gate.validate_envelope(&UnifiedPayload::Resumen(Vec::new()));
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }
}
