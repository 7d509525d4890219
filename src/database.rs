use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, info};

use crate::ast::{InsertValues, Projection, Select, Statement, TableSource};
use crate::error::{Error, Result};
use crate::parser;
use crate::table::{Schema, Table};

/// The main entry point for the in-memory database engine.
/// It owns a collection of named tables and runs statements against them.
#[derive(Debug, Default)]
pub struct Database {
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

impl Database {
    /// Creates a new, empty database instance.
    pub fn new() -> Self {
        Self {
            tables: HashMap::default(),
        }
    }

    /// Creates a new, empty table in the database.
    ///
    /// # Errors
    /// Returns [Error::TableAlreadyExists] if a table with the same name already exists.
    pub fn create_table(&mut self, name: String, schema: Schema) -> Result<&mut Table> {
        match self.tables.entry(name) {
            Entry::Occupied(entry) => Err(Error::TableAlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                info!(table = %entry.key(), columns = schema.width(), "table created");
                let table = Table::new(entry.key().clone(), schema);
                Ok(entry.insert(table))
            }
        }
    }

    /// Removes a table from the database and hands it back.
    ///
    /// # Errors
    /// Returns [Error::TableNotFound] if the table does not exist.
    pub fn drop_table(&mut self, name: &str) -> Result<Table> {
        let table = self
            .tables
            .remove(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        info!(table = name, "table dropped");
        Ok(table)
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Retrieves a mutable reference to a table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Returns the names of all tables, sorted.
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn table(&self, name: &str) -> Result<&Table> {
        self.get_table(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.get_table_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Executes any statement.
    ///
    /// Statements acting on a registered table return that table, borrowed.
    /// A `select` returns its anonymous result, owned by the caller.
    ///
    /// # Errors
    /// Returns an error if tokenization, parsing, or execution fails. A failed
    /// statement leaves every table as it was.
    ///
    /// # Example
    /// ```
    /// use memdb::{Database, Value};
    /// let mut db = Database::new();
    /// db.execute("create table users (id: int32, name: string)").unwrap();
    /// db.execute("insert (1, \"ann\") to users").unwrap();
    /// db.execute("delete users where id > 12").unwrap();
    ///
    /// let result = db.execute("select name from users").unwrap();
    /// assert_eq!(result.rows().next().unwrap()[0], Value::text("ann").unwrap());
    /// ```
    pub fn execute(&mut self, sql: &str) -> Result<Cow<'_, Table>> {
        let statement = parser::parse(sql)?;
        debug!(sql, "execute");

        match statement {
            Statement::CreateTable(create) => {
                let schema = Schema::new(create.columns)?;
                let table = self.create_table(create.name, schema)?;
                Ok(Cow::Borrowed(table))
            }
            Statement::Insert(insert) => {
                let table = self.table_mut(&insert.table)?;
                match insert.values {
                    InsertValues::Positional(slots) => table.insert_slots(slots)?,
                    InsertValues::Named(values) => table.insert_named(values)?,
                };
                Ok(Cow::Borrowed(table))
            }
            Statement::Select(select) => self.select(&select).map(Cow::Owned),
            Statement::Update(update) => {
                let table = self.table_mut(&update.table)?;
                let count = table.update(&update.assignments, &update.predicate)?;
                debug!(table = %update.table, count, "rows updated");
                Ok(Cow::Borrowed(table))
            }
            Statement::Delete(delete) => {
                let table = self.table_mut(&delete.table)?;
                let count = table.delete(&delete.predicate)?;
                debug!(table = %delete.table, count, "rows deleted");
                Ok(Cow::Borrowed(table))
            }
        }
    }

    /// Runs a `select` statement without mutable access to the database.
    ///
    /// # Example
    ///
    /// ```
    /// use memdb::{Database, Value};
    ///
    /// let mut db = Database::new();
    /// db.execute("create table products (name: string, price: int32)").unwrap();
    /// db.execute("insert ('Laptop', 1200) to products").unwrap();
    /// db.execute("insert ('Mouse', 25) to products").unwrap();
    ///
    /// let result = db.query("select name from products where price < 100").unwrap();
    ///
    /// assert_eq!(result.len(), 1);
    /// assert_eq!(result.rows().next().unwrap()[0], Value::text("Mouse").unwrap());
    /// ```
    ///
    /// # Errors
    /// Returns [Error::Syntax] if `sql` is not a `select`, besides any error of
    /// the query itself.
    pub fn query(&self, sql: &str) -> Result<Table> {
        match parser::parse(sql)? {
            Statement::Select(select) => {
                debug!(sql, "query");
                self.select(&select)
            }
            _ => Err(Error::Syntax(format!("not a query: {sql}"))),
        }
    }

    fn select(&self, select: &Select) -> Result<Table> {
        let nested;
        let source = match &select.source {
            TableSource::Named(name) => self.table(name)?,
            TableSource::Subquery(inner) => {
                nested = self.select(inner)?;
                &nested
            }
        };

        match &select.projection {
            Projection::All => source.select_all(&select.predicate),
            Projection::Columns(columns) => source.select(columns, &select.predicate),
        }
    }
}
