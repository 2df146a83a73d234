//! Registry search and pagination engine.
//!
//! Pure functions over the loaded record collection; handlers own the
//! parameter parsing and the schema validation of the resulting page.

use crate::domain::EntityRecord;
use crate::error::ApiError;

/// Validated search parameters for the registry listing.
#[derive(Debug, Clone)]
pub struct RegistrySearch {
    /// Free-text filter matched against name OR email, case-insensitive
    /// substring. Empty strings behave like no filter.
    pub q: Option<String>,
    /// Exact-match filter against `direccion`.
    pub ubicacion_id: Option<String>,
    /// 1-indexed page number.
    pub page: u32,
    /// Page size, 1 to 100.
    pub page_size: u32,
}

/// One page of filtered records plus the filtered-set total.
#[derive(Debug)]
pub struct RegistryPage<'a> {
    /// Size of the filtered set, before pagination.
    pub total: usize,
    /// Echo of the requested page number.
    pub page: u32,
    /// Echo of the requested page size.
    pub page_size: u32,
    /// Records in `[(page-1)*page_size, page*page_size)` of the filtered
    /// set; empty for out-of-range pages.
    pub records: Vec<&'a EntityRecord>,
}

/// Checks pagination bounds: `page >= 1`, `page_size` in `[1, 100]`.
///
/// # Errors
///
/// Returns [`ApiError::InvalidParameter`] when either bound is violated.
pub fn validate_pagination(page: i64, page_size: i64) -> Result<(u32, u32), ApiError> {
    if page < 1 {
        return Err(ApiError::InvalidParameter(
            "'page' must be an integer >= 1".to_string(),
        ));
    }
    if !(1..=100).contains(&page_size) {
        return Err(ApiError::InvalidParameter(
            "'pageSize' must be an integer between 1 and 100".to_string(),
        ));
    }
    // An astronomically large page stays a valid, merely empty, page.
    let page = u32::try_from(page).unwrap_or(u32::MAX);
    let page_size = u32::try_from(page_size).unwrap_or(100);
    Ok((page, page_size))
}

/// Applies text search, then the location filter, then pagination.
///
/// `total` counts the filtered set, not the page. Out-of-range pages
/// yield an empty page, not an error.
#[must_use]
pub fn search<'a>(records: &'a [EntityRecord], params: &RegistrySearch) -> RegistryPage<'a> {
    let mut filtered: Vec<&EntityRecord> = match params.q.as_deref().filter(|q| !q.is_empty()) {
        Some(q) => {
            let needle = q.to_lowercase();
            records.iter().filter(|r| text_matches(r, &needle)).collect()
        }
        None => records.iter().collect(),
    };

    if let Some(ubicacion) = params.ubicacion_id.as_deref().filter(|u| !u.is_empty()) {
        filtered.retain(|r| r.direccion == ubicacion);
    }

    let total = filtered.len();
    let start = (params.page - 1) as usize * params.page_size as usize;
    let records = filtered
        .into_iter()
        .skip(start)
        .take(params.page_size as usize)
        .collect();

    RegistryPage {
        total,
        page: params.page,
        page_size: params.page_size,
        records,
    }
}

/// Looks a record up by its exact id.
#[must_use]
pub fn find_by_id<'a>(records: &'a [EntityRecord], id: &str) -> Option<&'a EntityRecord> {
    records.iter().find(|r| r.id == id)
}

/// Case-insensitive substring match against name OR email.
fn text_matches(record: &EntityRecord, needle: &str) -> bool {
    record.nombre.to_lowercase().contains(needle)
        || record.correo_electronico.to_lowercase().contains(needle)
}
