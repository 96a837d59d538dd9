use crate::interface::Limit;
use crate::query::{QueryError, Select};

fn non_negative(clause: &str, value: Option<i64>) -> Result<Option<i64>, QueryError> {
    match value {
        Some(v) if v < 0 => Err(QueryError::UnsupportedValue(format!(
            "{} must not be negative, got {}",
            clause, v
        ))),
        other => Ok(other),
    }
}

// extract limit, an offset without a count is kept as well
pub(crate) fn extract_limit(select: &Select) -> Result<Option<Limit>, QueryError> {
    let count = non_negative("LIMIT", select.limit)?;
    let offset = non_negative("OFFSET", select.offset)?.unwrap_or(0);

    if count.is_none() && offset == 0 {
        return Ok(None);
    }
    Ok(Some(Limit { count, offset }))
}
