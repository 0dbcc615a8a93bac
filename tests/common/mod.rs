#![allow(dead_code)]

use anyhow::Result;
use rust_sqlite::{Database, RowSet};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

pub const SQL_CLEAR: &str = "DROP TABLE IF EXISTS test_table;";

pub const SQL_CREATE: &str = "CREATE TABLE IF NOT EXISTS test_table( \
     id INTEGER PRIMARY KEY, \
     value TEXT \
     );";

// Log output is shown for failing tests only; set RUST_LOG=debug to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// In-memory database with test_table holding heh, foo, bar, c++
pub fn create_test_db() -> Result<Database> {
    init_tracing();
    let db = Database::open_in_memory()?;
    seed(&db)?;
    Ok(db)
}

// File-backed variant; keep the NamedTempFile alive for as long as the database
pub fn create_temp_db() -> Result<(Database, NamedTempFile)> {
    init_tracing();
    let temp_file = NamedTempFile::new()?;
    let db = Database::open(temp_file.path())?;
    seed(&db)?;
    Ok((db, temp_file))
}

fn seed(db: &Database) -> Result<()> {
    db.execute(SQL_CLEAR)?;
    db.execute(SQL_CREATE)?;
    for value in ["heh", "foo", "bar", "c++"] {
        db.execute(&format!("INSERT INTO test_table(value) VALUES ('{value}');"))?;
    }
    Ok(())
}

pub fn select_all(db: &Database) -> Result<RowSet> {
    let mut statement = db.prepare_statement("SELECT * FROM test_table;")?;
    Ok(statement.execute()?)
}

pub fn id_value_pairs(rows: &RowSet) -> Result<Vec<(i64, String)>> {
    let mut pairs = Vec::with_capacity(rows.len());
    for row in rows {
        pairs.push((row.get_int(0)?, row.get_string(1)?));
    }
    Ok(pairs)
}

pub fn pairs(expected: &[(i64, &str)]) -> Vec<(i64, String)> {
    expected.iter().map(|(id, v)| (*id, v.to_string())).collect()
}
