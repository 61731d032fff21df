use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// SQLite refuses statements with more bound variables than this.
pub const MAX_VARIABLES: usize = 999;

/// Multi-row insert statement assembled row by row.
///
/// Rows are buffered and written as one `insert ... values (..), (..)`
/// statement. When the next row would exceed [`MAX_VARIABLES`] the buffered
/// rows are flushed first, so `add_row` may hit the store and fail.
pub struct BatchInsert {
    head: String,
    columns: usize,
    values: Vec<Value>,
    rows: usize,
    inserted: usize,
}

impl BatchInsert {
    pub fn new(table: &str, columns: &[&str]) -> Self {
        Self {
            head: format!("insert into {} ({}) values ", table, columns.join(", ")),
            columns: columns.len(),
            values: vec![],
            rows: 0,
            inserted: 0,
        }
    }

    pub fn add_row<R>(&mut self, connection: &Connection, row: R) -> rusqlite::Result<()>
    where
        R: IntoIterator<Item = Value>,
    {
        let row: Vec<Value> = row.into_iter().collect();
        if row.len() != self.columns {
            return Err(rusqlite::Error::InvalidParameterCount(
                row.len(),
                self.columns,
            ));
        }
        if self.values.len() + row.len() > MAX_VARIABLES {
            self.flush(connection)?;
        }
        self.values.extend(row);
        self.rows += 1;
        Ok(())
    }

    /// Writes buffered rows and returns the number of rows inserted by this
    /// batch so far.
    pub fn execute(&mut self, connection: &Connection) -> rusqlite::Result<usize> {
        self.flush(connection)?;
        Ok(self.inserted)
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.rows
    }

    fn flush(&mut self, connection: &Connection) -> rusqlite::Result<()> {
        if self.rows == 0 {
            return Ok(());
        }
        let placeholders = format!("({})", vec!["?"; self.columns].join(", "));
        let statement = format!(
            "{}{}",
            self.head,
            vec![placeholders; self.rows].join(", ")
        );
        let values = std::mem::take(&mut self.values);
        self.rows = 0;
        self.inserted += connection.execute(&statement, params_from_iter(values))?;
        Ok(())
    }
}
