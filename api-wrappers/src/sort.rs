use crate::interface::Sort;
use crate::query::{OrderBy, QueryError};

pub(crate) fn create_sort(order_by: &OrderBy, columns: &[String]) -> Option<Sort> {
    let pos = columns.iter().position(|c| c == &order_by.column)?;
    Some(Sort {
        field: order_by.column.clone(),
        field_no: pos + 1,
        reversed: order_by.descending,
        // NULLS FIRST is the default for DESC
        nulls_first: order_by.nulls_first.unwrap_or(order_by.descending),
        collate: order_by.collate.clone(),
    })
}

// extract sorts
pub(crate) fn extract_sorts(
    order_by: &[OrderBy],
    columns: &[String],
) -> Result<Vec<Sort>, QueryError> {
    order_by
        .iter()
        .map(|ob| {
            create_sort(ob, columns).ok_or_else(|| QueryError::UnsupportedColumn(ob.column.clone()))
        })
        .collect()
}
