// crates/rowbind/src/error.rs
// ============================================================================
// Module: Database Error Taxonomy
// Description: Structured error kinds for opening, preparing, executing, and
//              typed field access.
// Purpose: Surface every engine and misuse failure synchronously to the caller.
// Dependencies: rusqlite, thiserror
// ============================================================================

//! ## Overview
//! One closed enum covers the full failure surface of the crate: opening a
//! database, compiling SQL, stepping a statement, resolving named parameters
//! and columns, and typed reads. Failures are returned as values to the
//! immediate caller; nothing is retried or swallowed internally, and every
//! partially acquired engine handle is released before an error propagates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced by connections, queries, and typed field access.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The engine could not open or create the requested database.
    #[error("cannot open database '{path}': engine error code {code}")]
    Open {
        /// Engine extended error code reported by the open call.
        code: i32,
        /// Path that was attempted (`:memory:` for in-memory opens).
        path: String,
    },
    /// Statement compilation failed.
    #[error("incorrect sql '{sql}': {message}")]
    IncorrectSql {
        /// The rejected SQL text.
        sql: String,
        /// Engine-reported compile error message.
        message: String,
    },
    /// The engine reported an error while binding or stepping a compiled
    /// statement.
    #[error("query execution failed: {message} (engine error code {code})")]
    Execution {
        /// Engine extended error code.
        code: i32,
        /// Engine-reported error message.
        message: String,
    },
    /// A bound parameter name is absent from the compiled statement.
    #[error("no such sql parameter: {name}")]
    NoSuchParameter {
        /// Parameter name as given by the caller, without the `:` prefix.
        name: String,
    },
    /// A requested column name is absent from the executed statement.
    #[error("no such column: {name}")]
    NoSuchColumn {
        /// Column name as given by the caller.
        name: String,
    },
    /// A typed read was attempted before a successful execution.
    #[error("query has not been executed; call execute before get")]
    NotExecuted,
    /// A bind or execution was attempted after the query's single execution
    /// was already attempted.
    #[error("query has already been executed")]
    AlreadyExecuted,
    /// The statement completed without producing a result row.
    #[error("statement produced no result row")]
    NoRow,
    /// A column holds a storage class incompatible with the requested type.
    #[error("column '{column}' holds {actual}, requested {requested}")]
    ColumnType {
        /// Column name used for the lookup.
        column: String,
        /// Requested value type.
        requested: &'static str,
        /// Storage class actually held by the column.
        actual: &'static str,
    },
    /// An integer column value does not fit the requested narrower type.
    #[error("column '{column}' value does not fit the requested integer width")]
    OutOfRange {
        /// Column name used for the lookup.
        column: String,
    },
}

// ============================================================================
// SECTION: Engine Error Mapping
// ============================================================================

/// Extracts the engine extended error code from a driver error.
pub(crate) fn engine_code(error: &rusqlite::Error) -> i32 {
    match error {
        rusqlite::Error::SqliteFailure(failure, _) => failure.extended_code,
        _ => -1,
    }
}

/// Maps a driver failure onto [`DatabaseError::Execution`].
pub(crate) fn execution_error(error: &rusqlite::Error) -> DatabaseError {
    DatabaseError::Execution {
        code: engine_code(error),
        message: error.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
