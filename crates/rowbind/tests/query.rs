// crates/rowbind/tests/query.rs
// ============================================================================
// Module: Query Tests
// Description: Validate prepared query compilation, execution, and typed
//              name-addressed access.
// Purpose: Ensure the state machine, column resolution, and dispatch behave
//          per contract, including every misuse path.
// Dependencies: rowbind
// ============================================================================

//! ## Overview
//! Conformance tests for the query core: compilation failures, single-shot
//! execution, case-insensitive column lookup, the typed get/set dispatch over
//! every supported scalar and optional form, and strict errors for unknown
//! names, state misuse, and storage-class mismatches.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use rowbind::Connection;
use rowbind::DatabaseError;
use rowbind::Query;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn memory_connection() -> Connection {
    Connection::open_in_memory().expect("open in-memory database")
}

fn run(connection: &Connection, sql: &str) {
    let mut query = Query::new(sql, connection).expect("prepare");
    query.execute().expect("execute");
}

fn executed<'a>(connection: &'a Connection, sql: &str) -> Query<'a> {
    let mut query = Query::new(sql, connection).expect("prepare");
    query.execute().expect("execute");
    query
}

// ============================================================================
// SECTION: Compilation
// ============================================================================

#[test]
fn compiles_and_executes_a_simple_query() {
    let connection = memory_connection();
    run(&connection, "select 1 'id'");
}

#[test]
fn incorrect_sql_is_rejected_with_the_offending_text() {
    let connection = memory_connection();
    let prepared = Query::new("select", &connection);
    assert!(matches!(
        prepared,
        Err(DatabaseError::IncorrectSql { sql, .. }) if sql == "select"
    ));
}

#[test]
fn connection_stays_usable_after_a_compile_failure() {
    let connection = memory_connection();
    assert!(Query::new("select", &connection).is_err());
    let query = executed(&connection, "select 1 'id'");
    assert_eq!(query.get::<i64>("id").expect("read id"), 1);
}

// ============================================================================
// SECTION: Typed Reads
// ============================================================================

#[test]
fn reads_an_integer_column() {
    let connection = memory_connection();
    let query = executed(&connection, "select 1 'id'");
    assert_eq!(query.get::<i64>("id").expect("read id"), 1);
}

#[test]
fn reads_a_narrow_integer_column() {
    let connection = memory_connection();
    let query = executed(&connection, "select 41 'id'");
    assert_eq!(query.get::<i32>("id").expect("read id"), 41);
}

#[test]
fn reads_a_double_column() {
    let connection = memory_connection();
    let query = executed(&connection, "select 1.5 'id'");
    assert!((query.get::<f64>("id").expect("read id") - 1.5).abs() < f64::EPSILON);
}

#[test]
fn reads_an_integer_slot_through_a_double() {
    let connection = memory_connection();
    let query = executed(&connection, "select 3 'id'");
    assert!((query.get::<f64>("id").expect("read id") - 3.0).abs() < f64::EPSILON);
}

#[test]
fn reads_a_text_column() {
    let connection = memory_connection();
    let query = executed(&connection, "select \"field value\" 'id'");
    assert_eq!(query.get::<String>("id").expect("read id"), "field value");
}

#[test]
fn reads_a_blob_column() {
    let connection = memory_connection();
    let query = executed(&connection, "select x'01ff' 'payload'");
    assert_eq!(query.get::<Vec<u8>>("payload").expect("read payload"), vec![0x01, 0xff]);
}

#[test]
fn reads_text_bytes_through_a_blob() {
    let connection = memory_connection();
    let query = executed(&connection, "select 'ab' 'payload'");
    assert_eq!(query.get::<Vec<u8>>("payload").expect("read payload"), b"ab".to_vec());
}

#[test]
fn reads_null_as_an_absent_optional() {
    let connection = memory_connection();
    let query = executed(&connection, "select null 'id'");
    assert_eq!(query.get::<Option<i64>>("id").expect("read id"), None);
}

#[test]
fn reads_a_present_optional_through_the_scalar_path() {
    let connection = memory_connection();
    let query = executed(&connection, "select 7 'id'");
    assert_eq!(query.get::<Option<i64>>("id").expect("read id"), Some(7));
}

// ============================================================================
// SECTION: Column Resolution
// ============================================================================

#[test]
fn column_lookup_is_case_insensitive() {
    let connection = memory_connection();
    let query = executed(&connection, "select 1 'ID'");
    assert_eq!(query.get::<i64>("id").expect("read lower-case"), 1);
    assert_eq!(query.get::<i64>("Id").expect("read mixed-case"), 1);
}

#[test]
fn column_lookup_is_order_independent() {
    let connection = memory_connection();
    let query = executed(&connection, "select 1 'first', 2 'second'");
    assert_eq!(query.get::<i64>("second").expect("read second"), 2);
    assert_eq!(query.get::<i64>("first").expect("read first"), 1);
}

#[test]
fn unknown_column_is_a_structured_error() {
    let connection = memory_connection();
    let query = executed(&connection, "select 1 'id'");
    let read = query.get::<i64>("missing");
    assert!(matches!(
        read,
        Err(DatabaseError::NoSuchColumn { name }) if name == "missing"
    ));
}

#[test]
fn storage_class_mismatch_is_a_structured_error() {
    let connection = memory_connection();
    let query = executed(&connection, "select 'abc' 'id'");
    let read = query.get::<i64>("id");
    assert!(matches!(
        read,
        Err(DatabaseError::ColumnType {
            column,
            requested: "i64",
            actual: "text"
        }) if column == "id"
    ));
}

#[test]
fn narrow_integer_overflow_is_a_structured_error() {
    let connection = memory_connection();
    let query = executed(&connection, "select 4294967296 'id'");
    let read = query.get::<i32>("id");
    assert!(matches!(
        read,
        Err(DatabaseError::OutOfRange { column }) if column == "id"
    ));
}

// ============================================================================
// SECTION: State Machine
// ============================================================================

#[test]
fn reading_before_execution_is_a_state_error() {
    let connection = memory_connection();
    let query = Query::new("select 1 'id'", &connection).expect("prepare");
    assert!(matches!(query.get::<i64>("id"), Err(DatabaseError::NotExecuted)));
}

#[test]
fn executing_twice_is_a_state_error() {
    let connection = memory_connection();
    let mut query = Query::new("select 1 'id'", &connection).expect("prepare");
    query.execute().expect("first execute");
    assert!(matches!(query.execute(), Err(DatabaseError::AlreadyExecuted)));
}

#[test]
fn binding_after_execution_is_a_state_error() {
    let connection = memory_connection();
    let mut query = Query::new("select :v 'v'", &connection).expect("prepare");
    query.set("v", &1_i64).expect("bind");
    query.execute().expect("execute");
    assert!(matches!(query.set("v", &2_i64), Err(DatabaseError::AlreadyExecuted)));
}

#[test]
fn row_less_statement_reads_are_a_structured_error() {
    let connection = memory_connection();
    let query = executed(&connection, "select 1 'id' where 0");
    assert!(matches!(query.get::<i64>("id"), Err(DatabaseError::NoRow)));
}

#[test]
fn failed_execution_reports_the_engine_error_and_blocks_reads() {
    let connection = memory_connection();
    run(&connection, "create table items (id integer primary key)");
    run(&connection, "insert into items (id) values (1)");
    let mut duplicate =
        Query::new("insert into items (id) values (:id)", &connection).expect("prepare");
    duplicate.set("id", &1_i64).expect("bind");
    let stepped = duplicate.execute();
    assert!(matches!(
        stepped,
        Err(DatabaseError::Execution { code, ref message })
            if code == 1555 && message.contains("items.id")
    ));
    assert!(matches!(duplicate.get::<i64>("id"), Err(DatabaseError::NotExecuted)));
}

// ============================================================================
// SECTION: Parameter Binding
// ============================================================================

#[test]
fn binds_named_parameters_for_each_scalar() {
    let connection = memory_connection();
    run(&connection, "create table samples (n, r, t, b)");
    let mut insert = Query::new(
        "insert into samples (n, r, t, b) values (:n, :r, :t, :b)",
        &connection,
    )
    .expect("prepare insert");
    insert.set("n", &41_i64).expect("bind integer");
    insert.set("r", &1.25_f64).expect("bind double");
    insert.set("t", "field value").expect("bind text");
    insert.set("b", &vec![0x01_u8, 0xff]).expect("bind blob");
    insert.execute().expect("insert");

    let select = executed(&connection, "select n, r, t, b from samples");
    assert_eq!(select.get::<i64>("n").expect("read integer"), 41);
    assert!((select.get::<f64>("r").expect("read double") - 1.25).abs() < f64::EPSILON);
    assert_eq!(select.get::<String>("t").expect("read text"), "field value");
    assert_eq!(select.get::<Vec<u8>>("b").expect("read blob"), vec![0x01, 0xff]);
}

#[test]
fn binds_absent_optionals_as_null() {
    let connection = memory_connection();
    run(&connection, "create table samples (v)");
    let mut insert =
        Query::new("insert into samples (v) values (:v)", &connection).expect("prepare insert");
    insert.set("v", &None::<String>).expect("bind absent");
    insert.execute().expect("insert");

    let select = executed(&connection, "select v from samples");
    assert_eq!(select.get::<Option<String>>("v").expect("read optional"), None);
}

#[test]
fn rebinding_a_parameter_overwrites_the_previous_value() {
    let connection = memory_connection();
    let mut query = Query::new("select :v 'v'", &connection).expect("prepare");
    query.set("v", &1_i64).expect("first bind");
    query.set("v", &2_i64).expect("second bind");
    query.execute().expect("execute");
    assert_eq!(query.get::<i64>("v").expect("read"), 2);
}

#[test]
fn unknown_parameter_is_a_structured_error() {
    let connection = memory_connection();
    let mut query = Query::new("select :v 'v'", &connection).expect("prepare");
    let bound = query.set("missing", &1_i64);
    assert!(matches!(
        bound,
        Err(DatabaseError::NoSuchParameter { name }) if name == "missing"
    ));
}
