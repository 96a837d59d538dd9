use crate::interface::{Column, Limit, Qual, Sort};
use crate::limit::extract_limit;
use crate::qual::extract_quals;
use crate::query::{QueryError, Select, SelectTarget};
use crate::sort::extract_sorts;
use crate::utils::log_debug1;

/// Clauses extracted from a `SELECT` statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectClauses {
    /// target columns, `*` expands to all declared columns
    pub columns: Vec<Column>,
    pub quals: Vec<Qual>,
    pub sorts: Vec<Sort>,
    pub limit: Option<Limit>,
}

/// Extract target columns, conditions, sorts and limit of a `SELECT` against
/// a table's declared column list
///
/// ```rust
/// # use api_wrappers::prelude::*;
/// let columns = vec!["id".to_string(), "name".to_string()];
/// let query = Select::columns("users", &["name"])
///     .filter(Expr::col("id").equals(Expr::lit(1i64)))
///     .limit(10);
/// let clauses = SelectQueryParser::new(&query, "users", &columns)
///     .parse_query()
///     .unwrap();
/// assert_eq!(clauses.columns[0].name, "name");
/// assert_eq!(clauses.quals[0].deparse(), "id = 1");
/// assert_eq!(clauses.limit, Some(Limit { count: Some(10), offset: 0 }));
/// ```
pub struct SelectQueryParser<'a> {
    query: &'a Select,
    table: &'a str,
    columns: &'a [String],
}

impl<'a> SelectQueryParser<'a> {
    pub fn new(query: &'a Select, table: &'a str, columns: &'a [String]) -> Self {
        Self {
            query,
            table,
            columns,
        }
    }

    fn column(&self, name: &str) -> Result<Column, QueryError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|pos| Column {
                name: name.to_owned(),
                num: pos + 1,
            })
            .ok_or_else(|| QueryError::UnsupportedColumn(name.to_owned()))
    }

    fn extract_target_columns(&self) -> Result<Vec<Column>, QueryError> {
        let mut ret: Vec<Column> = Vec::new();
        for tgt in &self.query.targets {
            match tgt {
                SelectTarget::Star => {
                    for name in self.columns {
                        if !ret.iter().any(|c| &c.name == name) {
                            ret.push(self.column(name)?);
                        }
                    }
                }
                SelectTarget::Column(name) => {
                    if !ret.iter().any(|c| &c.name == name) {
                        ret.push(self.column(name)?);
                    }
                }
            }
        }
        Ok(ret)
    }

    pub fn parse_query(&self) -> Result<SelectClauses, QueryError> {
        if self.query.from != self.table {
            return Err(QueryError::TableMismatch {
                expected: self.table.to_owned(),
                actual: self.query.from.clone(),
            });
        }

        let columns = self.extract_target_columns()?;
        let quals = match &self.query.where_clause {
            Some(expr) => extract_quals(expr, self.columns)?,
            None => Vec::new(),
        };
        let sorts = extract_sorts(&self.query.order_by, self.columns)?;
        let limit = extract_limit(self.query)?;

        log_debug1(&format!(
            "{}: tgts = {:?}, quals = {:?}, sorts = {:?}, limit = {:?}",
            self.table, columns, quals, sorts, limit
        ));

        Ok(SelectClauses {
            columns,
            quals,
            sorts,
            limit,
        })
    }
}
