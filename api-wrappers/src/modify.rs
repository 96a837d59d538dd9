use crate::interface::{Cell, Row};
use crate::query::{Expr, Insert, QueryError};

/// Extract rows of an `INSERT` against a table's supported column contract
///
/// - every inserted column must be one of `supported_columns`
/// - with `all_mandatory`, every supported column must be inserted, otherwise
///   only `mandatory_columns` must be
/// - mandatory columns must carry a non-null, non-empty value in every row
///
/// Rows keep the statement's column order.
///
/// ```rust
/// # use api_wrappers::prelude::*;
/// let query = Insert::new("messages", &["text"]).values(vec![Expr::lit("hi")]);
/// let rows = InsertQueryParser::new(&query, &["text", "title"], &["text"], false)
///     .parse_query()
///     .unwrap();
/// assert_eq!(rows[0].get("text"), Some(&Cell::String("hi".to_string())));
/// assert_eq!(rows[0].get("title"), None);
/// ```
pub struct InsertQueryParser<'a> {
    query: &'a Insert,
    supported_columns: &'a [&'a str],
    mandatory_columns: &'a [&'a str],
    all_mandatory: bool,
}

impl<'a> InsertQueryParser<'a> {
    pub fn new(
        query: &'a Insert,
        supported_columns: &'a [&'a str],
        mandatory_columns: &'a [&'a str],
        all_mandatory: bool,
    ) -> Self {
        Self {
            query,
            supported_columns,
            mandatory_columns,
            all_mandatory,
        }
    }

    fn required_columns(&self) -> &'a [&'a str] {
        if self.all_mandatory {
            self.supported_columns
        } else {
            self.mandatory_columns
        }
    }

    fn validate_columns(&self) -> Result<(), QueryError> {
        if let Some(col) = self
            .query
            .columns
            .iter()
            .find(|c| !self.supported_columns.contains(&c.as_str()))
        {
            return Err(QueryError::UnsupportedColumn(col.clone()));
        }

        if let Some(col) = self
            .required_columns()
            .iter()
            .find(|c| !self.query.columns.iter().any(|qc| qc == *c))
        {
            return Err(QueryError::MandatoryColumnMissing((*col).to_owned()));
        }

        Ok(())
    }

    fn parse_row(&self, row_no: usize, values: &[Expr]) -> Result<Row, QueryError> {
        if values.len() != self.query.columns.len() {
            return Err(QueryError::ValueCountMismatch {
                row: row_no,
                expected: self.query.columns.len(),
                actual: values.len(),
            });
        }

        let mut row = Row::new();
        for (col, value) in self.query.columns.iter().zip(values) {
            let cell = match value {
                Expr::Constant(cell) => cell.clone(),
                other => return Err(QueryError::UnsupportedValue(other.to_string())),
            };

            let is_blank = match &cell {
                None => true,
                Some(Cell::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if is_blank && self.required_columns().contains(&col.as_str()) {
                return Err(QueryError::MandatoryValueMissing {
                    column: col.clone(),
                    row: row_no,
                });
            }

            row.push(col, cell);
        }

        Ok(row)
    }

    pub fn parse_query(&self) -> Result<Vec<Row>, QueryError> {
        self.validate_columns()?;
        self.query
            .values
            .iter()
            .enumerate()
            .map(|(idx, values)| self.parse_row(idx + 1, values))
            .collect()
    }
}
