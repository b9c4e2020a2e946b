// crates/rowbind/src/lib.rs
// ============================================================================
// Module: Rowbind
// Description: Typed, name-addressed accessor layer over SQLite prepared
//              statements.
// Purpose: Open a database, prepare SQL, bind typed named parameters,
//          execute, and read typed columns by name.
// Dependencies: rusqlite, thiserror
// ============================================================================

//! ## Overview
//! This crate wraps the engine's prepared-statement API with a small typed
//! surface: [`Connection`] owns an open database handle, [`Query`] owns one
//! compiled statement borrowed against it, and the sealed
//! [`FromColumn`]/[`ToParameter`] pair dispatches typed reads and binds over
//! a closed set of storage classes. Column access is by case-insensitive
//! name, resolved after execution, so field order in the SQL text does not
//! matter. The model is single-threaded and synchronous: one owner per
//! connection, one execution per query, every failure surfaced as a
//! [`DatabaseError`] value.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod connection;
pub mod error;
pub mod query;
pub mod schema;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use connection::Connection;
pub use error::DatabaseError;
pub use query::Query;
pub use schema::table_exists;
pub use value::FromColumn;
pub use value::SqlValue;
pub use value::ToParameter;
