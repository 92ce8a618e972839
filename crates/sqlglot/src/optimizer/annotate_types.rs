//! Rule 10: type annotation (spec §4.4.10). Non-rewriting: `apply` returns
//! its input unchanged so it composes with the rest of the pipeline, while
//! [`annotate`] is the standalone analysis a caller runs to get the actual
//! type tree.

use sqlglot_ast::Expression;

use super::OptimizeContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Numeric,
    String,
    Boolean,
    Date,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub data_type: DataType,
    pub nullable: bool,
}

/// A tree of inferred types shaped like the `Expression` tree it was built
/// from — `children` lines up positionally with `expr.children()` — so
/// callers walk both trees in lockstep instead of keying a map by node
/// identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub info: TypeInfo,
    pub children: Vec<TypeNode>,
}

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr
}

/// Infers a [`TypeNode`] for `expr` and every descendant, built bottom-up.
pub fn annotate(expr: &Expression) -> TypeNode {
    let children: Vec<TypeNode> = expr.children().into_iter().map(annotate).collect();
    let info = infer(expr, &children);
    TypeNode { info, children }
}

fn infer(expr: &Expression, children: &[TypeNode]) -> TypeInfo {
    use Expression::*;
    match expr {
        Literal { value, is_string } => {
            if *is_string {
                TypeInfo { data_type: DataType::String, nullable: false }
            } else if value.parse::<f64>().is_ok() {
                TypeInfo { data_type: DataType::Numeric, nullable: false }
            } else {
                TypeInfo { data_type: DataType::String, nullable: false }
            }
        }
        True | False => TypeInfo { data_type: DataType::Boolean, nullable: false },
        Null => TypeInfo { data_type: DataType::Unknown, nullable: true },
        Add(..) | Sub(..) | Mul(..) | Div(..) | Mod(..) => TypeInfo {
            data_type: DataType::Numeric,
            nullable: children.iter().any(|c| c.info.nullable),
        },
        Eq(..) | Neq(..) | Gt(..) | Lt(..) | Gte(..) | Lte(..) | Is(..) | And(..) | Or(..) | Not(..) | Not2(..) => {
            TypeInfo { data_type: DataType::Boolean, nullable: false }
        }
        Paren(_) => children[0].info,
        Neg(_) | Pos(_) => TypeInfo { data_type: DataType::Numeric, nullable: children[0].info.nullable },
        Cast { data_type, .. } => TypeInfo { data_type: cast_target(data_type), nullable: true },
        _ => TypeInfo { data_type: DataType::Unknown, nullable: true },
    }
}

fn cast_target(data_type: &str) -> DataType {
    let lowered = data_type.to_ascii_lowercase();
    if lowered.contains("int") || lowered.contains("float") || lowered.contains("double") || lowered.contains("numeric") || lowered.contains("decimal") {
        DataType::Numeric
    } else if lowered.contains("bool") {
        DataType::Boolean
    } else if lowered.contains("date") || lowered.contains("time") {
        DataType::Date
    } else if lowered.contains("char") || lowered.contains("text") || lowered.contains("string") {
        DataType::String
    } else {
        DataType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_literal_infers_numeric() {
        let expr = Expression::literal("42");
        let node = annotate(&expr);
        assert_eq!(node.info.data_type, DataType::Numeric);
    }

    #[test]
    fn null_infers_unknown_and_nullable() {
        let expr = Expression::Null;
        let node = annotate(&expr);
        assert_eq!(node.info.data_type, DataType::Unknown);
        assert!(node.info.nullable);
    }

    #[test]
    fn comparison_infers_boolean() {
        let expr = Expression::Eq(Box::new(Expression::identifier("x")), Box::new(Expression::literal("5")));
        let node = annotate(&expr);
        assert_eq!(node.info.data_type, DataType::Boolean);
    }

    #[test]
    fn nullable_propagates_from_nested_arithmetic() {
        let expr = Expression::Add(
            Box::new(Expression::Mul(Box::new(Expression::literal("2")), Box::new(Expression::Null))),
            Box::new(Expression::literal("3")),
        );
        let node = annotate(&expr);
        assert_eq!(node.info.data_type, DataType::Numeric);
        assert!(node.info.nullable);
        assert_eq!(node.children.len(), 2);
        assert!(node.children[0].info.nullable);
    }

    #[test]
    fn apply_is_a_no_op_on_the_tree() {
        use crate::dialect::get_dialect;
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::literal("1");
        assert_eq!(apply(expr.clone(), &ctx), expr);
    }
}
