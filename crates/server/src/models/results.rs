//! Write-result summaries returned by the CRUD endpoints.
//!
//! These mirror the document store's own result objects so clients written
//! against the raw driver output keep working.

use serde::Serialize;

/// Result of a single-document insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSummary<I> {
    pub acknowledged: bool,
    pub inserted_id: I,
}

impl<I> InsertSummary<I> {
    #[must_use]
    pub const fn new(inserted_id: I) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Result of a single-document update.
///
/// An id that matches nothing is not an error: all counts are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary<I> {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<I>,
}

impl<I> UpdateSummary<I> {
    #[must_use]
    pub const fn new(matched_count: u64, modified_count: u64, upserted_id: Option<I>) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: if upserted_id.is_some() { 1 } else { 0 },
            upserted_id,
        }
    }
}

/// Result of a single-document delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteSummary {
    #[must_use]
    pub const fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Body of `GET /v1/api/itemsCount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_summary_wire_shape() {
        let summary = UpdateSummary::<String>::new(1, 0, None);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 0,
                "upsertedCount": 0,
                "upsertedId": null
            })
        );
    }

    #[test]
    fn test_upsert_counts_one() {
        let summary = UpdateSummary::new(0, 0, Some("abc"));
        assert_eq!(summary.upserted_count, 1);
    }
}
