use crate::query::{Insert, QueryError, Select};
use serde_json::Value as JsonValue;
use std::fmt;

/// A data cell in a data row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Json(JsonValue),
}

impl Cell {
    /// Convert a JSON value to a cell, JSON `null` becomes `None`
    ///
    /// Arrays and objects are kept as [`Cell::Json`].
    pub fn from_json(value: &JsonValue) -> Option<Cell> {
        match value {
            JsonValue::Null => None,
            JsonValue::Bool(v) => Some(Cell::Bool(*v)),
            JsonValue::Number(n) => n
                .as_i64()
                .map(Cell::I64)
                .or_else(|| n.as_f64().map(Cell::F64)),
            JsonValue::String(v) => Some(Cell::String(v.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => Some(Cell::Json(value.clone())),
        }
    }

    /// Borrow the string content if this is a [`Cell::String`]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Bool(v) => write!(f, "{}", v),
            Cell::I64(v) => write!(f, "{}", v),
            Cell::F64(v) => write!(f, "{}", v),
            Cell::String(v) => write!(f, "'{}'", v),
            Cell::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::String(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::String(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::I64(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

/// A data row in a table
///
/// The row contains a column name list and cell list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// column names
    pub cols: Vec<String>,

    /// column cell list, should match with cols
    pub cells: Vec<Option<Cell>>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Row {
            cols: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Push a cell with column name to this row
    pub fn push(&mut self, col: &str, cell: Option<Cell>) {
        self.cols.push(col.to_owned());
        self.cells.push(cell);
    }

    /// Get the cell of a column, `None` if the column is absent or its value is null
    pub fn get(&self, col: &str) -> Option<&Cell> {
        self.cols
            .iter()
            .position(|c| c == col)
            .and_then(|idx| self.cells[idx].as_ref())
    }
}

/// A column definition of a virtual table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// 1-based position in the table's declared column list
    pub num: usize,
}

/// A restiction value used in [`Qual`], either a [`Cell`] or an array of [`Cell`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Cell(Cell),
    Array(Vec<Cell>),
}

/// Query restrictions, a.k.a conditions in `WHERE` clause
///
/// Only simple conditions joined by `AND` are supported.
///
/// ## Examples
///
/// ```sql
/// where id = 1;
/// -- [Qual { field: "id", operator: "=", value: Cell(I64(1)), use_or: false }]
/// ```
///
/// ```sql
/// where id in (1, 2);
/// -- [Qual { field: "id", operator: "=", value: Array([I64(1), I64(2)]), use_or: true }]
/// ```
///
/// ```sql
/// where col is null
/// -- [Qual { field: "col", operator: "is", value: Cell(String("null")), use_or: false }]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Qual {
    pub field: String,
    pub operator: String,
    pub value: Value,
    pub use_or: bool,
}

impl Qual {
    pub fn deparse(&self) -> String {
        match &self.value {
            Value::Cell(cell) => format!("{} {} {}", self.field, self.operator, cell),
            Value::Array(cells) => {
                let list = cells
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                if self.use_or {
                    format!("{} in ({})", self.field, list)
                } else {
                    format!("{} {} ({})", self.field, self.operator, list)
                }
            }
        }
    }
}

/// Query sort, a.k.a `ORDER BY` clause
///
/// ## Examples
///
/// ```sql
/// order by id;
/// -- [Sort { field: "id", field_no: 1, reversed: false, nulls_first: false, collate: None]
/// ```
///
/// ```sql
/// order by id desc;
/// -- [Sort { field: "id", field_no: 1, reversed: true, nulls_first: true, collate: None]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub field_no: usize,
    pub reversed: bool,
    pub nulls_first: bool,
    pub collate: Option<String>,
}

/// Query limit, a.k.a `LIMIT count OFFSET offset` clause
///
/// ## Examples
///
/// ```sql
/// limit 42 offset 7;
/// -- Limit { count: Some(42), offset: 7 }
/// ```
///
/// ```sql
/// offset 7;
/// -- Limit { count: None, offset: 7 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Limit {
    /// `None` when only an offset is given
    pub count: Option<i64>,
    pub offset: i64,
}

/// Query clauses a table parsed but did not apply to its result
///
/// A table returning a non-empty residual leaves filtering, ordering and
/// limiting to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Residual {
    pub quals: Vec<Qual>,
    pub sorts: Vec<Sort>,
    pub limit: Option<Limit>,
}

impl Residual {
    pub fn is_empty(&self) -> bool {
        self.quals.is_empty() && self.sorts.is_empty() && self.limit.is_none()
    }
}

/// The result set of a `SELECT` on a virtual table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub residual: Residual,
}

impl Table {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// The virtual table trait
///
/// Each table backed by a remote API implements this trait. All statement
/// callbacks are optional, the default ones reject the statement with
/// [`QueryError::UnsupportedStatement`].
pub trait ApiTable<E: From<QueryError>> {
    /// Table name as used in SQL statements
    fn name(&self) -> &str;

    /// Declared column list
    fn get_columns(&self) -> Vec<String>;

    fn select(&self, _query: &Select) -> Result<Table, E> {
        Err(QueryError::UnsupportedStatement {
            table: self.name().to_owned(),
            statement: "SELECT",
        }
        .into())
    }

    fn insert(&self, _query: &Insert) -> Result<(), E> {
        Err(QueryError::UnsupportedStatement {
            table: self.name().to_owned(),
            statement: "INSERT",
        }
        .into())
    }
}
