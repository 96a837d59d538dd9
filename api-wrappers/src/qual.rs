use crate::interface::{Cell, Qual, Value};
use crate::query::{Expr, QueryError};

const COMPARISON_OPERATORS: &[&str] = &["=", "<>", "<", "<=", ">", ">=", "like"];

// operator to use when the operands are swapped
fn commutator(op: &str) -> Option<&'static str> {
    match op {
        "=" => Some("="),
        "<>" => Some("<>"),
        "<" => Some(">"),
        "<=" => Some(">="),
        ">" => Some("<"),
        ">=" => Some("<="),
        _ => None,
    }
}

fn constant_cell(expr: &Expr) -> Result<Cell, QueryError> {
    match expr {
        Expr::Constant(Some(cell)) => Ok(cell.clone()),
        _ => Err(QueryError::UnsupportedCondition(format!(
            "expected a non-null constant, got `{}`",
            expr
        ))),
    }
}

pub(crate) fn extract_from_op_expr(
    op: &str,
    left: &Expr,
    right: &Expr,
    columns: &[String],
) -> Result<Qual, QueryError> {
    let op = if op == "!=" { "<>" } else { op };

    // swap operands if needed
    let (field, operand, op) = match (left, right) {
        (Expr::Identifier(field), operand) => (field, operand, op),
        (operand, Expr::Identifier(field)) => match commutator(op) {
            Some(com) => (field, operand, com),
            None => {
                return Err(QueryError::UnsupportedCondition(format!(
                    "{} {} {}",
                    left, op, right
                )))
            }
        },
        _ => {
            return Err(QueryError::UnsupportedCondition(format!(
                "{} {} {}",
                left, op, right
            )))
        }
    };

    if !columns.iter().any(|c| c == field) {
        return Err(QueryError::UnsupportedColumn(field.clone()));
    }

    let qual = match (op, operand) {
        ("in", Expr::Tuple(items)) => Qual {
            field: field.clone(),
            operator: "=".to_string(),
            value: Value::Array(items.iter().map(constant_cell).collect::<Result<_, _>>()?),
            use_or: true,
        },
        ("is" | "is not", Expr::Constant(None)) => Qual {
            field: field.clone(),
            operator: op.to_string(),
            value: Value::Cell(Cell::String("null".to_string())),
            use_or: false,
        },
        (op, operand) if COMPARISON_OPERATORS.contains(&op) => Qual {
            field: field.clone(),
            operator: op.to_string(),
            value: Value::Cell(constant_cell(operand)?),
            use_or: false,
        },
        _ => {
            return Err(QueryError::UnsupportedCondition(format!(
                "{} {} {}",
                field, op, operand
            )))
        }
    };

    Ok(qual)
}

fn collect_quals(expr: &Expr, columns: &[String], quals: &mut Vec<Qual>) -> Result<(), QueryError> {
    match expr {
        Expr::BinaryOperation { op, left, right } if op == "and" => {
            collect_quals(left, columns, quals)?;
            collect_quals(right, columns, quals)
        }
        Expr::BinaryOperation { op, .. } if op == "or" => Err(QueryError::UnsupportedCondition(
            format!("OR is not supported: {}", expr),
        )),
        Expr::BinaryOperation { op, left, right } => {
            quals.push(extract_from_op_expr(op, left, right, columns)?);
            Ok(())
        }
        _ => Err(QueryError::UnsupportedCondition(expr.to_string())),
    }
}

// extract quals from an AND-conjunction of simple conditions
pub(crate) fn extract_quals(expr: &Expr, columns: &[String]) -> Result<Vec<Qual>, QueryError> {
    let mut quals = Vec::new();
    collect_quals(expr, columns, &mut quals)?;
    Ok(quals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["id".to_string(), "name".to_string()]
    }

    #[test]
    fn extracts_conjunction_in_order() {
        let expr = Expr::col("id")
            .equals(Expr::lit(1i64))
            .and(Expr::binary("like", Expr::col("name"), Expr::lit("eng%")));
        let quals = extract_quals(&expr, &columns()).unwrap();
        assert_eq!(quals.len(), 2);
        assert_eq!(quals[0].deparse(), "id = 1");
        assert_eq!(quals[1].deparse(), "name like 'eng%'");
    }

    #[test]
    fn swaps_constant_on_the_left() {
        let expr = Expr::binary("<", Expr::lit(5i64), Expr::col("id"));
        let quals = extract_quals(&expr, &columns()).unwrap();
        assert_eq!(quals[0].operator, ">");
        assert_eq!(quals[0].field, "id");
    }

    #[test]
    fn in_list_becomes_array_qual() {
        let expr = Expr::col("id").in_list(vec![Expr::lit(1i64), Expr::lit(2i64)]);
        let quals = extract_quals(&expr, &columns()).unwrap();
        assert_eq!(
            quals[0],
            Qual {
                field: "id".to_string(),
                operator: "=".to_string(),
                value: Value::Array(vec![Cell::I64(1), Cell::I64(2)]),
                use_or: true,
            }
        );
    }

    #[test]
    fn is_null_qual() {
        let expr = Expr::binary("is", Expr::col("name"), Expr::null());
        let quals = extract_quals(&expr, &columns()).unwrap();
        assert_eq!(quals[0].deparse(), "name is 'null'");
    }

    #[test]
    fn rejects_or_and_unknown_columns() {
        let expr = Expr::col("id")
            .equals(Expr::lit(1i64))
            .or(Expr::col("id").equals(Expr::lit(2i64)));
        assert!(matches!(
            extract_quals(&expr, &columns()),
            Err(QueryError::UnsupportedCondition(_))
        ));

        let expr = Expr::col("missing").equals(Expr::lit(1i64));
        assert_eq!(
            extract_quals(&expr, &columns()),
            Err(QueryError::UnsupportedColumn("missing".to_string()))
        );
    }
}
