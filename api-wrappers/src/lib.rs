//! Wrappers is a development framework for virtual tables backed by remote APIs.
//!
//! A virtual table looks like a regular SQL table to its callers, but every
//! statement on it becomes one or more calls to a remote API: `SELECT` reads
//! from the API and `INSERT` writes to it. Statements arrive already parsed as
//! a small typed model, see [`query::Statement`].
//!
//! # Supported Types
//!
//! For simplicity purpose, only a small set of cell types are supported,
//!
//! - bool
//! - i64
//! - f64
//! - String
//! - JSON
//!
//! See the full supported types list in [`interface::Cell`].
//!
//! # Developing an API table
//!
//! The core interface is the [`interface::ApiTable`] trait which provides a
//! callback per statement kind,
//!
//! - [select()](`interface::ApiTable#method.select`)
//! - [insert()](`interface::ApiTable#method.insert`)
//!
//! Both are optional, a table rejects the statements it does not implement.
//! Use [`scan::SelectQueryParser`] and [`modify::InsertQueryParser`] to check a
//! statement against the table's column contract before calling the API.
//!
//! ```rust
//! use api_wrappers::prelude::*;
//!
//! struct HelloWorldTable;
//!
//! impl ApiTable<QueryError> for HelloWorldTable {
//!     fn name(&self) -> &str {
//!         "hello"
//!     }
//!
//!     fn get_columns(&self) -> Vec<String> {
//!         vec!["id".to_string(), "col".to_string()]
//!     }
//!
//!     fn select(&self, query: &Select) -> Result<Table, QueryError> {
//!         let columns = self.get_columns();
//!         let clauses = SelectQueryParser::new(query, self.name(), &columns).parse_query()?;
//!
//!         let mut row = Row::new();
//!         for tgt_col in &clauses.columns {
//!             match tgt_col.name.as_str() {
//!                 "id" => row.push("id", Some(Cell::I64(0))),
//!                 "col" => row.push("col", Some(Cell::String("Hello world".to_string()))),
//!                 _ => {}
//!             }
//!         }
//!
//!         Ok(Table {
//!             columns: clauses.columns,
//!             rows: vec![row],
//!             // nothing is pushed down, leave it all to the caller
//!             residual: Residual {
//!                 quals: clauses.quals,
//!                 sorts: clauses.sorts,
//!                 limit: clauses.limit,
//!             },
//!         })
//!     }
//! }
//!
//! let table = HelloWorldTable;
//! let result = table.select(&Select::star("hello")).unwrap();
//! assert_eq!(result.column_names(), vec!["id", "col"]);
//! assert!(table.insert(&Insert::new("hello", &["id"])).is_err());
//! ```

pub mod interface;
pub mod modify;
pub mod options;
pub mod query;
pub mod scan;
pub mod utils;

/// The prelude includes all necessary imports to make Wrappers work
pub mod prelude {
    pub use crate::interface::*;
    pub use crate::modify::*;
    pub use crate::options::*;
    pub use crate::query::*;
    pub use crate::scan::*;
    pub use crate::utils::*;
    pub use tokio::runtime::Runtime;
}

mod limit;
mod qual;
mod sort;
