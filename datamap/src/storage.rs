use log::error;
use rusqlite::{Connection, OptionalExtension, Row, Transaction};
use std::path::Path;

pub struct Storage {
    connection: Connection,
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        Connection::open(path.as_ref()).map(|connection| Storage { connection })
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Connection::open_in_memory().map(|connection| Storage { connection })
    }

    #[inline]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn has_table(&self, name: &str) -> rusqlite::Result<bool> {
        let table: Option<String> = self
            .connection
            .query_row(
                "select name from sqlite_master where type = 'table' and name = ?",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(table.is_some())
    }

    /// Collects every row of `sql` through `map`, stopping at the first failure.
    pub fn find_all<T, E, M>(&self, sql: &str, mut map: M) -> Result<Vec<T>, E>
    where
        M: FnMut(&Row) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let mut statement = self.connection.prepare(sql)?;
        let mut rows = statement.query([])?;
        let mut values = vec![];
        while let Some(row) = rows.next()? {
            values.push(map(row)?);
        }
        Ok(values)
    }

    /// Runs `operation` inside one transaction. The transaction is committed
    /// only when `operation` succeeds, any error rolls every statement back.
    pub fn within_transaction<T, E, F>(&mut self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let transaction = self.connection.transaction()?;
        match operation(&transaction) {
            Ok(value) => {
                transaction.commit()?;
                Ok(value)
            }
            Err(failure) => {
                if let Err(rollback) = transaction.rollback() {
                    error!("Unable to rollback transaction, {}", rollback);
                }
                Err(failure)
            }
        }
    }
}
