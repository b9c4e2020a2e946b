// crates/rowbind/src/connection.rs
// ============================================================================
// Module: Database Connection
// Description: Owning guard over an open SQLite database handle.
// Purpose: Open file-backed or private in-memory databases and release the
//          handle exactly once.
// Dependencies: rusqlite
// ============================================================================

//! ## Overview
//! A [`Connection`] owns the native database handle for its entire lifetime.
//! Construction opens the database (read-write, creating the file if absent,
//! or a private in-memory database when no path is given) and drop releases
//! the handle exactly once. Queries borrow the connection, so the handle
//! always outlives every statement compiled against it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use rusqlite::OpenFlags;

use crate::error::DatabaseError;
use crate::error::engine_code;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path label recorded in open errors for in-memory databases.
const MEMORY_PATH: &str = ":memory:";

// ============================================================================
// SECTION: Connection
// ============================================================================

/// Owning guard over an open database handle.
///
/// Move-only: the handle has a single designated owner and is released
/// exactly once when the guard drops. A dropped connection is never
/// re-opened.
pub struct Connection {
    /// Engine connection; valid from construction to drop.
    inner: rusqlite::Connection,
}

impl Connection {
    /// Opens a private, non-shared in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Open`] when the engine reports any
    /// non-success status.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        rusqlite::Connection::open_in_memory()
            .map(|inner| Self { inner })
            .map_err(|err| open_error(MEMORY_PATH, &err))
    }

    /// Opens a read-write file-backed database, creating the file if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Open`] carrying the engine error code and the
    /// attempted path when the open call reports any non-success status.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
        rusqlite::Connection::open_with_flags(path, flags)
            .map(|inner| Self { inner })
            .map_err(|err| open_error(&path.display().to_string(), &err))
    }

    /// Returns the raw engine connection for statement compilation.
    pub(crate) const fn raw(&self) -> &rusqlite::Connection {
        &self.inner
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps an engine open failure onto [`DatabaseError::Open`].
fn open_error(path: &str, error: &rusqlite::Error) -> DatabaseError {
    DatabaseError::Open {
        code: engine_code(error),
        path: path.to_string(),
    }
}
