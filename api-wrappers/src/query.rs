//! Parsed SQL statement model
//!
//! Statements arrive here already parsed. Tables never see SQL text, they read
//! these structures through [`SelectQueryParser`](crate::scan::SelectQueryParser)
//! and [`InsertQueryParser`](crate::modify::InsertQueryParser).

use crate::interface::Cell;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("table `{0}` does not exist")]
    UnknownTable(String),

    #[error("query targets table `{actual}`, expected `{expected}`")]
    TableMismatch { expected: String, actual: String },

    #[error("{statement} is not supported on table `{table}`")]
    UnsupportedStatement {
        table: String,
        statement: &'static str,
    },

    #[error("unsupported column `{0}`")]
    UnsupportedColumn(String),

    #[error("mandatory column `{0}` is missing")]
    MandatoryColumnMissing(String),

    #[error("mandatory column `{column}` has no value in row {row}")]
    MandatoryValueMissing { column: String, row: usize },

    #[error("row {row} has {actual} values, expected {expected}")]
    ValueCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("only constant values are supported, got `{0}`")]
    UnsupportedValue(String),

    #[error("unsupported condition: {0}")]
    UnsupportedCondition(String),
}

/// An expression node in a parsed statement
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// column reference
    Identifier(String),

    /// literal value, `None` is SQL `NULL`
    Constant(Option<Cell>),

    /// value list, e.g. the right side of `IN`
    Tuple(Vec<Expr>),

    /// binary operation, `op` is lower case, e.g. `=`, `and`, `in`, `like`
    BinaryOperation {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn col(name: &str) -> Self {
        Expr::Identifier(name.to_owned())
    }

    pub fn lit(value: impl Into<Cell>) -> Self {
        Expr::Constant(Some(value.into()))
    }

    pub fn null() -> Self {
        Expr::Constant(None)
    }

    pub fn binary(op: &str, left: Expr, right: Expr) -> Self {
        Expr::BinaryOperation {
            op: op.to_lowercase(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn equals(self, right: Expr) -> Self {
        Expr::binary("=", self, right)
    }

    pub fn and(self, right: Expr) -> Self {
        Expr::binary("and", self, right)
    }

    pub fn or(self, right: Expr) -> Self {
        Expr::binary("or", self, right)
    }

    pub fn in_list(self, values: Vec<Expr>) -> Self {
        Expr::binary("in", self, Expr::Tuple(values))
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::Constant(Some(cell)) => write!(f, "{}", cell),
            Expr::Constant(None) => write!(f, "null"),
            Expr::Tuple(items) => {
                let items = items
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({})", items)
            }
            Expr::BinaryOperation { op, left, right } => write!(f, "{} {} {}", left, op, right),
        }
    }
}

/// One entry of a `SELECT` target list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    Star,
    Column(String),
}

/// One `ORDER BY` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
    /// explicit `NULLS FIRST` / `NULLS LAST`, `None` uses the direction default
    pub nulls_first: Option<bool>,
    pub collate: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub from: String,
    pub targets: Vec<SelectTarget>,
    pub where_clause: Option<Expr>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Select {
    /// `SELECT * FROM table`
    pub fn star(table: &str) -> Self {
        Self {
            from: table.to_owned(),
            targets: vec![SelectTarget::Star],
            where_clause: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn columns(table: &str, columns: &[&str]) -> Self {
        Self {
            targets: columns
                .iter()
                .map(|c| SelectTarget::Column((*c).to_owned()))
                .collect(),
            ..Self::star(table)
        }
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.where_clause = Some(expr);
        self
    }

    pub fn order_by(mut self, column: &str, descending: bool) -> Self {
        self.order_by.push(OrderBy {
            column: column.to_owned(),
            descending,
            nulls_first: None,
            collate: None,
        });
        self
    }

    pub fn limit(mut self, count: i64) -> Self {
        self.limit = Some(count);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Expr>>,
}

impl Insert {
    pub fn new(table: &str, columns: &[&str]) -> Self {
        Self {
            table: table.to_owned(),
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
            values: Vec::new(),
        }
    }

    pub fn values(mut self, row: Vec<Expr>) -> Self {
        self.values.push(row);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
}

impl Statement {
    pub fn table_name(&self) -> &str {
        match self {
            Statement::Select(select) => &select.from,
            Statement::Insert(insert) => &insert.table,
        }
    }
}
