mod common;

use anyhow::Result;
use common::{create_temp_db, create_test_db, id_value_pairs, pairs, select_all};
use rust_sqlite::{Error, TransactionState};

#[test]
fn test_commit_and_abort() -> Result<()> {
    let (db, _temp_file) = create_temp_db()?;
    let committed = [
        (1, "heh"),
        (2, "foo"),
        (3, "bar"),
        (4, "c++"),
        (5, "zuz"),
        (6, "aux"),
        (7, "con"),
    ];

    let mut transaction = db.begin_transaction()?;
    assert_eq!(transaction.state(), TransactionState::Active);
    assert!(!db.is_autocommit());
    transaction.execute("INSERT INTO test_table(value) VALUES ('zuz')")?;
    transaction.execute("INSERT INTO test_table(value) VALUES ('aux')")?;
    transaction.execute("INSERT INTO test_table(value) VALUES ('con')")?;
    transaction.commit()?;
    assert!(db.is_autocommit());

    let mut select = db.prepare_statement("SELECT * FROM test_table;")?;
    for _ in 0..10 {
        assert_eq!(id_value_pairs(&select.execute()?)?, pairs(&committed));
    }

    let mut transaction = db.begin_transaction()?;
    transaction.execute("INSERT INTO test_table(value) VALUES ('sas')")?;
    transaction.execute("INSERT INTO test_table(value) VALUES ('kek')")?;
    transaction.execute("INSERT INTO test_table(value) VALUES ('pip')")?;
    transaction.abort()?;

    for _ in 0..10 {
        assert_eq!(id_value_pairs(&select.execute()?)?, pairs(&committed));
    }
    Ok(())
}

#[test]
fn test_drop_rolls_back() -> Result<()> {
    let db = create_test_db()?;
    {
        let mut transaction = db.begin_transaction()?;
        transaction.execute("INSERT INTO test_table(value) VALUES ('lost')")?;
        transaction.execute("DELETE FROM test_table WHERE id = 1")?;
    }
    assert!(db.is_autocommit());
    assert_eq!(
        id_value_pairs(&select_all(&db)?)?,
        pairs(&[(1, "heh"), (2, "foo"), (3, "bar"), (4, "c++")])
    );
    Ok(())
}

#[test]
fn test_failed_statement_rolls_back_everything() -> Result<()> {
    let db = create_test_db()?;
    let mut transaction = db.begin_transaction()?;
    transaction.execute("INSERT INTO test_table(value) VALUES ('first')")?;

    let err = transaction
        .execute("INSERT INTO test_table(id, value) VALUES (1, 'duplicate')")
        .unwrap_err();
    assert!(matches!(err, Error::Query { .. }));
    assert_eq!(transaction.state(), TransactionState::Aborted);
    assert!(db.is_autocommit());

    assert!(matches!(
        transaction.execute("INSERT INTO test_table(value) VALUES ('late')"),
        Err(Error::TransactionFinished {
            state: TransactionState::Aborted
        })
    ));
    assert!(matches!(
        transaction.commit(),
        Err(Error::TransactionFinished {
            state: TransactionState::Aborted
        })
    ));
    assert_eq!(select_all(&db)?.len(), 4);
    Ok(())
}

#[test]
fn test_execute_statement_in_transaction() -> Result<()> {
    let db = create_test_db()?;
    let mut insert =
        db.prepare_statement("INSERT INTO test_table(id, value) VALUES (@id, @value)")?;
    let mut count = db.prepare_statement("SELECT COUNT(*) FROM test_table")?;

    let mut transaction = db.begin_transaction()?;
    insert.bind_named("@id", 10)?;
    insert.bind_named("@value", "ten")?;
    assert!(transaction.execute_statement(&mut insert)?.is_empty());
    let counted = transaction.execute_statement(&mut count)?;
    assert_eq!(counted.get(0).map(|row| row.get_int(0).ok()), Some(Some(5)));

    // Same id again violates the primary key.
    let err = transaction.execute_statement(&mut insert).unwrap_err();
    assert!(matches!(err, Error::Query { .. }));
    assert_eq!(transaction.state(), TransactionState::Aborted);
    drop(transaction);

    let counted = count.execute()?;
    assert_eq!(counted.get(0).map(|row| row.get_int(0).ok()), Some(Some(4)));
    Ok(())
}

#[test]
fn test_nested_begin_is_rejected() -> Result<()> {
    let db = create_test_db()?;
    let mut outer = db.begin_transaction()?;
    assert!(matches!(db.begin_transaction(), Err(Error::Query { .. })));

    outer.execute("INSERT INTO test_table(value) VALUES ('kept')")?;
    outer.commit()?;
    assert_eq!(select_all(&db)?.len(), 5);
    Ok(())
}

#[test]
fn test_failed_commit_is_rolled_back_on_drop() -> Result<()> {
    let db = create_test_db()?;
    db.execute(
        "PRAGMA foreign_keys = ON; \
         CREATE TABLE parent(id INTEGER PRIMARY KEY); \
         CREATE TABLE child(id INTEGER PRIMARY KEY, \
             parent_id INTEGER REFERENCES parent(id) DEFERRABLE INITIALLY DEFERRED);",
    )?;

    let mut transaction = db.begin_transaction()?;
    transaction.execute("INSERT INTO child(id, parent_id) VALUES (1, 99)")?;
    assert_eq!(transaction.state(), TransactionState::Active);

    let err = transaction.commit().unwrap_err();
    assert!(matches!(err, Error::Query { .. }));
    assert_eq!(err.engine_code(), Some(787));
    assert!(db.is_autocommit());

    let mut count = db.prepare_statement("SELECT COUNT(*) FROM child")?;
    assert_eq!(count.execute()?.to_string(), "|0|\n");
    Ok(())
}

#[test]
fn test_abort_after_automatic_rollback() -> Result<()> {
    let db = create_test_db()?;
    let mut transaction = db.begin_transaction()?;
    assert!(transaction.execute("INSERT INTO nowhere VALUES (1)").is_err());
    assert_eq!(transaction.state(), TransactionState::Aborted);

    assert!(matches!(
        transaction.abort(),
        Err(Error::TransactionFinished {
            state: TransactionState::Aborted
        })
    ));
    assert!(db.is_autocommit());
    Ok(())
}

#[test]
fn test_statement_ending_transaction_finalizes_guard() -> Result<()> {
    let db = create_test_db()?;
    let mut first = db.begin_transaction()?;
    first.execute("INSERT INTO test_table(value) VALUES ('early')")?;
    first.execute("COMMIT")?;
    assert_eq!(first.state(), TransactionState::Committed);

    let mut second = db.begin_transaction()?;
    second.execute("INSERT INTO test_table(value) VALUES ('late')")?;
    drop(first);
    assert_eq!(second.state(), TransactionState::Active);
    assert!(!db.is_autocommit());
    second.commit()?;
    assert_eq!(select_all(&db)?.len(), 6);

    let mut third = db.begin_transaction()?;
    third.execute("DELETE FROM test_table; ROLLBACK;")?;
    assert_eq!(third.state(), TransactionState::Aborted);
    assert!(matches!(
        third.commit(),
        Err(Error::TransactionFinished {
            state: TransactionState::Aborted
        })
    ));
    assert_eq!(select_all(&db)?.len(), 6);
    Ok(())
}
