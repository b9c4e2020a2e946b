// crates/rowbind/src/query.rs
// ============================================================================
// Module: Prepared Query
// Description: Prepared statement with typed, name-addressed parameter
//              binding and column retrieval.
// Purpose: Compile SQL against a connection, execute once, and resolve
//          case-insensitive field names to typed values.
// Dependencies: rusqlite
// ============================================================================

//! ## Overview
//! A [`Query`] owns one compiled statement and moves through an explicit
//! state machine: `Prepared` until the single permitted execution, then
//! `Executed` (column table and first-row snapshot captured) or `Failed`
//! (engine step error). Binding is valid only while `Prepared`; typed reads
//! are valid only once `Executed`. Misuse of the ordering is reported as a
//! state error instead of scanning an empty column table. The borrow of the
//! originating [`Connection`] ties statement lifetime to connection lifetime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rusqlite::Row;
use rusqlite::Statement;

use crate::connection::Connection;
use crate::error::DatabaseError;
use crate::error::execution_error;
use crate::value::FromColumn;
use crate::value::SqlValue;
use crate::value::ToParameter;
use crate::value::bind_parameter_value;

// ============================================================================
// SECTION: State
// ============================================================================

/// Execution state of a prepared query.
enum QueryState {
    /// Compiled; parameters may be bound; nothing captured yet.
    Prepared,
    /// Stepped successfully; column table and row snapshot captured.
    Executed {
        /// Lower-cased column names in statement order.
        columns: Vec<String>,
        /// Owned snapshot of the first result row, if one was produced.
        row: Option<Vec<SqlValue>>,
    },
    /// Stepping reported an engine error; typed reads are not meaningful.
    Failed,
}

// ============================================================================
// SECTION: Query
// ============================================================================

/// A prepared statement with typed, name-addressed access.
///
/// The statement handle is owned by the query and released exactly once on
/// drop. The connection is borrowed, not owned: destruction order is fixed at
/// compile time, and a query cannot outlive the handle it was compiled
/// against.
pub struct Query<'conn> {
    /// Owning guard over the compiled statement handle.
    statement: Statement<'conn>,
    /// Current point in the `Prepared -> Executed | Failed` state machine.
    state: QueryState,
}

impl<'conn> Query<'conn> {
    /// Compiles `sql` against the connection.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::IncorrectSql`] carrying the rejected SQL text
    /// when the engine reports a compile error. A partially prepared handle
    /// is finalized before the error propagates.
    pub fn new(sql: &str, connection: &'conn Connection) -> Result<Self, DatabaseError> {
        let statement =
            connection.raw().prepare(sql).map_err(|err| DatabaseError::IncorrectSql {
                sql: sql.to_string(),
                message: err.to_string(),
            })?;
        Ok(Self {
            statement,
            state: QueryState::Prepared,
        })
    }

    /// Steps the statement to its first result row or completion.
    ///
    /// On success the statement's column names are captured exactly once,
    /// lower-cased, in statement column order, and the first row (if any) is
    /// snapshotted for typed reads. A query executes at most once.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::AlreadyExecuted`] on a repeated call and
    /// [`DatabaseError::Execution`] carrying the engine error code and
    /// message when stepping fails.
    pub fn execute(&mut self) -> Result<(), DatabaseError> {
        if !matches!(self.state, QueryState::Prepared) {
            return Err(DatabaseError::AlreadyExecuted);
        }
        let column_count = self.statement.column_count();
        let stepped = {
            let mut rows = self.statement.raw_query();
            match rows.next() {
                Ok(Some(first)) => snapshot_row(first, column_count).map(Some),
                Ok(None) => Ok(None),
                Err(err) => Err(err),
            }
        };
        let row = match stepped {
            Ok(row) => row,
            Err(err) => {
                self.state = QueryState::Failed;
                return Err(execution_error(&err));
            }
        };
        let columns = (0..column_count)
            .map(|index| self.statement.column_name(index).map(str::to_lowercase))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| execution_error(&err))?;
        self.state = QueryState::Executed { columns, row };
        Ok(())
    }

    /// Reads the named column from the captured result row as `T`.
    ///
    /// Lookup is case-insensitive and order-independent: a linear scan of the
    /// captured names resolves the field to its statement position. Column
    /// counts are small in practice, so the scan replaces a second lookup
    /// structure.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::NotExecuted`] before a successful execution,
    /// [`DatabaseError::NoSuchColumn`] for an unknown name,
    /// [`DatabaseError::NoRow`] when the statement completed without
    /// producing a row, and the dispatch errors of [`FromColumn`] when the
    /// storage class does not match.
    pub fn get<T: FromColumn>(&self, field: &str) -> Result<T, DatabaseError> {
        let QueryState::Executed { columns, row } = &self.state else {
            return Err(DatabaseError::NotExecuted);
        };
        let needle = field.to_lowercase();
        let Some(index) = columns.iter().position(|column| *column == needle) else {
            return Err(DatabaseError::NoSuchColumn {
                name: field.to_string(),
            });
        };
        let Some(values) = row else {
            return Err(DatabaseError::NoRow);
        };
        let Some(value) = values.get(index) else {
            return Err(DatabaseError::NoSuchColumn {
                name: field.to_string(),
            });
        };
        T::from_column(value, field)
    }

    /// Binds the named parameter slot to `value`.
    ///
    /// Parameter names use the engine's `:` prefix convention; callers pass
    /// the bare name. Rebinding a name before execution overwrites the
    /// previous binding. Text and byte payloads are copied at bind time.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::AlreadyExecuted`] once the query has
    /// executed, [`DatabaseError::NoSuchParameter`] carrying the name when it
    /// is absent from the compiled statement, and
    /// [`DatabaseError::Execution`] when the engine rejects the bind.
    pub fn set<T>(&mut self, parameter: &str, value: &T) -> Result<(), DatabaseError>
    where
        T: ToParameter + ?Sized,
    {
        if !matches!(self.state, QueryState::Prepared) {
            return Err(DatabaseError::AlreadyExecuted);
        }
        let slot = format!(":{parameter}");
        let index = self
            .statement
            .parameter_index(&slot)
            .map_err(|err| execution_error(&err))?
            .ok_or_else(|| DatabaseError::NoSuchParameter {
                name: parameter.to_string(),
            })?;
        bind_parameter_value(&mut self.statement, index, &value.to_parameter())
            .map_err(|err| execution_error(&err))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Copies every column slot of a result row into owned values.
fn snapshot_row(row: &Row<'_>, column_count: usize) -> Result<Vec<SqlValue>, rusqlite::Error> {
    let mut values = Vec::with_capacity(column_count);
    for index in 0..column_count {
        values.push(SqlValue::from_column_slot(row.get_ref(index)?));
    }
    Ok(values)
}
