//! Sensor filter and readings filter/join engine.
//!
//! All filters are independent AND predicates; they are applied in a fixed
//! order (sensor id, location join, lower bound, upper bound) but commute.
//! Location filtering joins each reading's `id_sensor` to the sensor table
//! and drops readings whose sensor is unknown.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::instant::parse_instant;
use crate::domain::{Reading, Sensor};
use crate::error::ApiError;

/// Filters for the sensor listing. Exact, case-sensitive matches.
#[derive(Debug, Clone, Default)]
pub struct SensorFilter {
    /// Sensor kind to match.
    pub tipo: Option<String>,
    /// Location identifier to match.
    pub ubicacion_id: Option<String>,
}

/// Query over the readings collection.
#[derive(Debug, Clone)]
pub struct ReadingQuery {
    /// Owning sensor id, exact match.
    pub sensor_id: Option<String>,
    /// Location id, resolved through the sensor table.
    pub ubicacion_id: Option<String>,
    /// Inclusive lower bound, ISO-8601.
    pub from: Option<String>,
    /// Inclusive upper bound, ISO-8601.
    pub to: Option<String>,
    /// Maximum number of readings to return, 1 to 1000.
    pub limit: i64,
}

/// Filtered readings plus the pre-truncation total.
#[derive(Debug)]
pub struct ReadingSlice<'a> {
    /// Size of the filtered set, before the `limit` cut.
    pub total: usize,
    /// At most `limit` readings, in stored (insertion) order.
    pub readings: Vec<&'a Reading>,
}

/// Applies both sensor filters with AND semantics.
#[must_use]
pub fn filter_sensors<'a>(sensors: &'a [Sensor], filter: &SensorFilter) -> Vec<&'a Sensor> {
    sensors
        .iter()
        .filter(|s| filter.tipo.as_deref().is_none_or(|t| s.tipo == t))
        .filter(|s| {
            filter
                .ubicacion_id
                .as_deref()
                .is_none_or(|u| s.ubicacion == u)
        })
        .collect()
}

/// Filters readings by sensor, location, and time range, then truncates.
///
/// Parameter faults are checked before any row is scanned; a stored
/// timestamp that fails to parse during range filtering is a
/// data-integrity fault naming the reading.
///
/// # Errors
///
/// - [`ApiError::InvalidParameter`] for `limit` outside `[1, 1000]`,
///   malformed `from`/`to`, or `from` later than `to`.
/// - [`ApiError::DataIntegrity`] for an unparseable stored timestamp.
pub fn filter_readings<'a>(
    sensors: &[Sensor],
    readings: &'a [Reading],
    query: &ReadingQuery,
) -> Result<ReadingSlice<'a>, ApiError> {
    if !(1..=1000).contains(&query.limit) {
        return Err(ApiError::InvalidParameter(
            "'limit' must be an integer between 1 and 1000".to_string(),
        ));
    }

    let from = query.from.as_deref().map(parse_bound).transpose()?;
    let to = query.to.as_deref().map(parse_bound).transpose()?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ApiError::InvalidParameter(
                "'from' must not be later than 'to'".to_string(),
            ));
        }
    }

    let mut filtered: Vec<&Reading> = match query.sensor_id.as_deref() {
        Some(sensor_id) => readings.iter().filter(|r| r.id_sensor == sensor_id).collect(),
        None => readings.iter().collect(),
    };

    if let Some(ubicacion) = query.ubicacion_id.as_deref() {
        let locations: HashMap<&str, &str> = sensors
            .iter()
            .map(|s| (s.id.as_str(), s.ubicacion.as_str()))
            .collect();
        // Readings whose sensor is absent from the table are orphans and
        // drop out of location-filtered results.
        filtered.retain(|r| locations.get(r.id_sensor.as_str()) == Some(&ubicacion));
    }

    if from.is_some() || to.is_some() {
        let mut in_range = Vec::with_capacity(filtered.len());
        for reading in filtered {
            let ts = parse_instant(&reading.timestamp).map_err(|_| {
                ApiError::DataIntegrity(format!(
                    "invalid timestamp in reading {}",
                    reading.id_lectura
                ))
            })?;
            if from.is_none_or(|f| ts >= f) && to.is_none_or(|t| ts <= t) {
                in_range.push(reading);
            }
        }
        filtered = in_range;
    }

    let total = filtered.len();
    #[allow(clippy::cast_sign_loss)]
    let readings = filtered.into_iter().take(query.limit as usize).collect();

    Ok(ReadingSlice { total, readings })
}

/// Parses a client-supplied range bound; failures are client errors.
fn parse_bound(value: &str) -> Result<DateTime<Utc>, ApiError> {
    parse_instant(value).map_err(|e| ApiError::InvalidParameter(e.to_string()))
}
