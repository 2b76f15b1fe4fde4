//! Metadata catalog lookup.
//!
//! The catalog maps model nodes to native (source-system) names. Absence of
//! an entry is normal; the generator falls back to symbolic naming. Lookup
//! failures are caught at the point of use and treated the same as absence,
//! never propagated out of a render.

use crate::ast::{Element, Group, Procedure};
use thiserror::Error;

/// A catalog lookup failed (backing store unavailable, stale handle, ...).
#[derive(Debug, Error)]
#[error("catalog lookup failed: {0}")]
pub struct CatalogError(pub String);

/// Read-only catalog access. Many trees may resolve names against one
/// catalog concurrently, so implementations must be safe for shared reads.
pub trait Catalog: Send + Sync {
    /// Native name of a table/view, if cataloged.
    fn group_native_name(&self, group: &Group) -> Result<Option<String>, CatalogError>;

    /// Native name of a column, if cataloged.
    fn element_native_name(&self, element: &Element) -> Result<Option<String>, CatalogError>;

    /// Declared length of a column, if cataloged.
    fn element_length(&self, _element: &Element) -> Result<Option<u32>, CatalogError> {
        Ok(None)
    }

    /// Native name of a procedure, if cataloged.
    fn procedure_native_name(&self, _procedure: &Procedure) -> Result<Option<String>, CatalogError> {
        Ok(None)
    }
}
