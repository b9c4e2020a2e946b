// crates/rowbind/src/schema.rs
// ============================================================================
// Module: Schema Probes
// Description: Convenience queries against the engine's system catalog.
// Purpose: Demonstrate the intended prepare/bind/execute/get calling pattern.
// Dependencies: (crate core only)
// ============================================================================

//! ## Overview
//! Thin consumers of the core accessor layer. These helpers issue fixed SQL
//! templates against the engine catalog with caller input bound as
//! parameters; they add no behavior of their own beyond the core contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::connection::Connection;
use crate::error::DatabaseError;
use crate::query::Query;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Catalog probe counting tables with a matching name.
const TABLE_EXISTS_SQL: &str =
    "select count(1) 'c' from sqlite_master where type = 'table' and name = :name";

// ============================================================================
// SECTION: Probes
// ============================================================================

/// Returns whether a table with the given name exists in the database.
///
/// # Errors
///
/// Propagates any [`DatabaseError`] from preparation, binding, execution, or
/// the typed count read.
pub fn table_exists(connection: &Connection, table: &str) -> Result<bool, DatabaseError> {
    let mut query = Query::new(TABLE_EXISTS_SQL, connection)?;
    query.set("name", table)?;
    query.execute()?;
    Ok(query.get::<i64>("c")? > 0)
}
