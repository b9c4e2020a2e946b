// crates/rowbind/src/value.rs
// ============================================================================
// Module: Typed Value Dispatch
// Description: Closed mapping between Rust value types and engine storage
//              classes for column reads and parameter binds.
// Purpose: Route every typed get/set through one handler per storage class.
// Dependencies: rusqlite
// ============================================================================

//! ## Overview
//! The typed access surface is closed: a field is a 64-bit integer, a 32-bit
//! integer, a double, UTF-8 text, a byte blob, or an optional form of one of
//! those. [`SqlValue`] is the owned tagged union over the engine storage
//! classes; [`FromColumn`] and [`ToParameter`] are the sealed trait pair that
//! selects the per-variant handler at compile time. Requesting any other type
//! does not compile, and nested optionals are not part of the surface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rusqlite::types::ValueRef;

use crate::error::DatabaseError;

// ============================================================================
// SECTION: Storage Classes
// ============================================================================

/// Owned snapshot of one column slot or one parameter binding.
///
/// The variant set mirrors the engine's storage classes and is matched
/// exhaustively at every dispatch site.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// Double-precision float.
    Real(f64),
    /// Length-prefixed text.
    Text(String),
    /// Raw byte sequence.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the storage-class label used in mismatch errors.
    #[must_use]
    pub const fn storage_class(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }

    /// Snapshots a borrowed engine column slot into an owned value.
    ///
    /// Text is copied from the raw bytes the engine reports for the slot;
    /// byte sequences that are not valid UTF-8 are decoded with replacement
    /// rather than rejected.
    pub(crate) fn from_column_slot(slot: ValueRef<'_>) -> Self {
        match slot {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(value) => Self::Integer(value),
            ValueRef::Real(value) => Self::Real(value),
            ValueRef::Text(bytes) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        }
    }
}

// ============================================================================
// SECTION: Sealing
// ============================================================================

/// Seals the typed get/set surface to the closed scalar set.
mod sealed {
    /// Marker implemented only by the supported field types.
    pub trait Sealed {}

    impl Sealed for i64 {}
    impl Sealed for i32 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
    impl Sealed for str {}
    impl Sealed for Vec<u8> {}
    impl Sealed for [u8] {}
    impl Sealed for Option<i64> {}
    impl Sealed for Option<i32> {}
    impl Sealed for Option<f64> {}
    impl Sealed for Option<String> {}
    impl Sealed for Option<Vec<u8>> {}
}

// ============================================================================
// SECTION: Column Reads
// ============================================================================

/// Typed read of a captured column value.
///
/// Implemented for exactly the supported scalars and their optional forms.
/// The trait is sealed; any other type parameter fails to compile.
pub trait FromColumn: sealed::Sealed + Sized {
    /// Converts the captured column value into `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::ColumnType`] when the column's storage class
    /// does not match the requested type, or [`DatabaseError::OutOfRange`]
    /// when a narrowing integer read does not fit.
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError>;
}

impl FromColumn for i64 {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        match value {
            SqlValue::Integer(v) => Ok(*v),
            other => Err(mismatch(column, "i64", other)),
        }
    }
}

impl FromColumn for i32 {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        match value {
            SqlValue::Integer(v) => Self::try_from(*v).map_err(|_| DatabaseError::OutOfRange {
                column: column.to_string(),
            }),
            other => Err(mismatch(column, "i32", other)),
        }
    }
}

impl FromColumn for f64 {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        match value {
            SqlValue::Real(v) => Ok(*v),
            SqlValue::Integer(v) => {
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "integer reads through a double slot follow engine promotion"
                )]
                let promoted = *v as Self;
                Ok(promoted)
            }
            other => Err(mismatch(column, "f64", other)),
        }
    }
}

impl FromColumn for String {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        match value {
            SqlValue::Text(v) => Ok(v.clone()),
            other => Err(mismatch(column, "text", other)),
        }
    }
}

impl FromColumn for Vec<u8> {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        match value {
            SqlValue::Blob(v) => Ok(v.clone()),
            SqlValue::Text(v) => Ok(v.clone().into_bytes()),
            other => Err(mismatch(column, "blob", other)),
        }
    }
}

impl FromColumn for Option<i64> {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        optional_from_column(value, column)
    }
}

impl FromColumn for Option<i32> {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        optional_from_column(value, column)
    }
}

impl FromColumn for Option<f64> {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        optional_from_column(value, column)
    }
}

impl FromColumn for Option<String> {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        optional_from_column(value, column)
    }
}

impl FromColumn for Option<Vec<u8>> {
    fn from_column(value: &SqlValue, column: &str) -> Result<Self, DatabaseError> {
        optional_from_column(value, column)
    }
}

/// Reads an optional column: NULL maps to `None`, anything else delegates to
/// the non-optional read.
fn optional_from_column<T: FromColumn>(
    value: &SqlValue,
    column: &str,
) -> Result<Option<T>, DatabaseError> {
    match value {
        SqlValue::Null => Ok(None),
        present => T::from_column(present, column).map(Some),
    }
}

/// Builds a storage-class mismatch error for a typed read.
fn mismatch(column: &str, requested: &'static str, actual: &SqlValue) -> DatabaseError {
    DatabaseError::ColumnType {
        column: column.to_string(),
        requested,
        actual: actual.storage_class(),
    }
}

// ============================================================================
// SECTION: Parameter Binds
// ============================================================================

/// Typed conversion of a parameter value into an owned binding.
///
/// Borrowed text and byte forms are copied on conversion, so every binding is
/// transient with respect to the caller's buffers. Sealed like
/// [`FromColumn`].
pub trait ToParameter: sealed::Sealed {
    /// Converts `self` into the owned value bound to the statement slot.
    fn to_parameter(&self) -> SqlValue;
}

impl ToParameter for i64 {
    fn to_parameter(&self) -> SqlValue {
        SqlValue::Integer(*self)
    }
}

impl ToParameter for i32 {
    fn to_parameter(&self) -> SqlValue {
        SqlValue::Integer(i64::from(*self))
    }
}

impl ToParameter for f64 {
    fn to_parameter(&self) -> SqlValue {
        SqlValue::Real(*self)
    }
}

impl ToParameter for str {
    fn to_parameter(&self) -> SqlValue {
        SqlValue::Text(self.to_owned())
    }
}

impl ToParameter for String {
    fn to_parameter(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl ToParameter for [u8] {
    fn to_parameter(&self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl ToParameter for Vec<u8> {
    fn to_parameter(&self) -> SqlValue {
        SqlValue::Blob(self.clone())
    }
}

impl ToParameter for Option<i64> {
    fn to_parameter(&self) -> SqlValue {
        optional_to_parameter(self)
    }
}

impl ToParameter for Option<i32> {
    fn to_parameter(&self) -> SqlValue {
        optional_to_parameter(self)
    }
}

impl ToParameter for Option<f64> {
    fn to_parameter(&self) -> SqlValue {
        optional_to_parameter(self)
    }
}

impl ToParameter for Option<String> {
    fn to_parameter(&self) -> SqlValue {
        optional_to_parameter(self)
    }
}

impl ToParameter for Option<Vec<u8>> {
    fn to_parameter(&self) -> SqlValue {
        optional_to_parameter(self)
    }
}

/// Binds an optional parameter: `None` maps to NULL, `Some` delegates to the
/// non-optional bind.
fn optional_to_parameter<T: ToParameter>(value: &Option<T>) -> SqlValue {
    value.as_ref().map_or(SqlValue::Null, ToParameter::to_parameter)
}

/// Binds one owned value onto a 1-based statement parameter slot.
///
/// One arm per storage class; each arm calls the engine's native bind
/// primitive for that class.
pub(crate) fn bind_parameter_value(
    statement: &mut rusqlite::Statement<'_>,
    index: usize,
    value: &SqlValue,
) -> Result<(), rusqlite::Error> {
    match value {
        SqlValue::Null => statement.raw_bind_parameter(index, rusqlite::types::Null),
        SqlValue::Integer(v) => statement.raw_bind_parameter(index, v),
        SqlValue::Real(v) => statement.raw_bind_parameter(index, v),
        SqlValue::Text(v) => statement.raw_bind_parameter(index, v.as_str()),
        SqlValue::Blob(v) => statement.raw_bind_parameter(index, v.as_slice()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
