//! The polymorphic AST node.
//!
//! [`Expression`] is a single closed variant covering literals, references,
//! operators, clauses and statements (spec §3). Every node supports a
//! structural child visit ([`Expression::children`]), a post-order rewrite
//! ([`Expression::transform`]) and a filtered descent
//! ([`Expression::find_all`]). Source positions are optional and are not
//! modeled here — an AST is a semantic tree, not a source map.

use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

/// The closed set of join kinds (spec §3, "Join.type is a closed
/// enumeration").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// Sort direction for an `ORDER BY` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// A `CASE WHEN <cond> THEN <result>` arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenClause {
    pub condition: Expression,
    pub result: Expression,
}

/// One `name AS ( SELECT ... )` binding inside a `WITH` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CteDef {
    pub name: String,
    pub select: Box<Expression>,
}

/// One `SET col = value` assignment in an `UPDATE` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: Expression,
    pub value: Expression,
}

/// The AST node. A tree: rewrites build new trees; structural sharing of
/// unchanged subtrees is permitted but never required.
#[derive(Debug, Clone, PartialEq, EnumAsInner, Serialize, Deserialize, strum::AsRefStr)]
pub enum Expression {
    // --- Literals & atoms -------------------------------------------------
    Literal {
        value: String,
        is_string: bool,
    },
    True,
    False,
    Null,
    Star,
    Identifier {
        name: String,
        quoted: bool,
    },

    // --- References ---------------------------------------------------
    Column {
        name: Box<Expression>,
        table: Option<Box<Expression>>,
    },
    Table {
        name: String,
        schema: Option<String>,
    },
    WorkspacePath {
        path: Vec<String>,
    },
    Alias {
        expression: Box<Expression>,
        alias: String,
    },

    // --- Arithmetic binaries -----------------------------------------
    Add(Box<Expression>, Box<Expression>),
    Sub(Box<Expression>, Box<Expression>),
    Mul(Box<Expression>, Box<Expression>),
    Div(Box<Expression>, Box<Expression>),
    Mod(Box<Expression>, Box<Expression>),

    // --- Comparison binaries -----------------------------------------
    Eq(Box<Expression>, Box<Expression>),
    Neq(Box<Expression>, Box<Expression>),
    Gt(Box<Expression>, Box<Expression>),
    Lt(Box<Expression>, Box<Expression>),
    Gte(Box<Expression>, Box<Expression>),
    Lte(Box<Expression>, Box<Expression>),
    Is(Box<Expression>, Box<Expression>),
    In {
        expression: Box<Expression>,
        list: Vec<Expression>,
    },
    Between {
        expression: Box<Expression>,
        low: Box<Expression>,
        high: Box<Expression>,
    },
    Like {
        expression: Box<Expression>,
        pattern: Box<Expression>,
    },

    // --- Boolean -------------------------------------------------------
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    /// The alternate `!`/`NOT` spelling context (spec §3).
    Not2(Box<Expression>),
    Paren(Box<Expression>),

    // --- Unary arithmetic ----------------------------------------------
    Neg(Box<Expression>),
    Pos(Box<Expression>),

    // --- Calls & casts ---------------------------------------------------
    Function {
        name: String,
        args: Vec<Expression>,
    },
    Cast {
        expression: Box<Expression>,
        data_type: String,
    },

    // --- Clauses ---------------------------------------------------------
    From(Box<Expression>),
    Where(Box<Expression>),
    GroupBy(Vec<Expression>),
    Having(Box<Expression>),
    OrderItem {
        expression: Box<Expression>,
        direction: OrderDirection,
    },
    Limit(Box<Expression>),
    Offset(Box<Expression>),
    Join {
        kind: JoinType,
        table: Box<Expression>,
        on: Option<Box<Expression>>,
        using: Vec<String>,
    },

    // --- Statements -------------------------------------------------------
    Select {
        expressions: Vec<Expression>,
        distinct: bool,
        from: Option<Box<Expression>>,
        joins: Vec<Expression>,
        where_: Option<Box<Expression>>,
        group_by: Option<Box<Expression>>,
        having: Option<Box<Expression>>,
        order_by: Vec<Expression>,
        limit: Option<Box<Expression>>,
        offset: Option<Box<Expression>>,
    },
    Insert {
        table: Box<Expression>,
        columns: Vec<Expression>,
        values: Vec<Vec<Expression>>,
    },
    Update {
        table: Box<Expression>,
        assignments: Vec<Assignment>,
        where_: Option<Box<Expression>>,
    },
    Delete {
        table: Box<Expression>,
        where_: Option<Box<Expression>>,
    },
    Create {
        kind: String,
        name: Box<Expression>,
        columns: Vec<Expression>,
        select: Option<Box<Expression>>,
    },
    Drop {
        kind: String,
        name: Box<Expression>,
    },
    Alter {
        name: Box<Expression>,
        action: String,
    },

    // --- Subqueries & CTEs -------------------------------------------------
    Subquery {
        select: Box<Expression>,
    },
    Cte(CteDef),
    With {
        ctes: Vec<CteDef>,
        select: Box<Expression>,
    },

    // --- Control ----------------------------------------------------------
    Case {
        whens: Vec<WhenClause>,
        else_expr: Option<Box<Expression>>,
    },

    /// A column definition inside `CREATE TABLE (...)`: `name data_type`.
    ColumnDef {
        name: String,
        data_type: String,
    },
}

impl Expression {
    pub fn literal(value: impl Into<String>) -> Self {
        Expression::Literal {
            value: value.into(),
            is_string: false,
        }
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Expression::Literal {
            value: value.into(),
            is_string: true,
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier {
            name: name.into(),
            quoted: false,
        }
    }

    pub fn is_boolean_literal(&self) -> bool {
        matches!(self, Expression::True | Expression::False)
    }

    /// All immediate semantic children, in evaluation order.
    pub fn children(&self) -> Vec<&Expression> {
        use Expression::*;
        match self {
            Literal { .. } | True | False | Null | Star => vec![],
            Identifier { .. } | Table { .. } | WorkspacePath { .. } => vec![],
            Column { name, table } => {
                let mut v = vec![name.as_ref()];
                if let Some(t) = table {
                    v.push(t.as_ref());
                }
                v
            }
            Alias { expression, .. } => vec![expression.as_ref()],
            Add(l, r) | Sub(l, r) | Mul(l, r) | Div(l, r) | Mod(l, r) | Eq(l, r) | Neq(l, r)
            | Gt(l, r) | Lt(l, r) | Gte(l, r) | Lte(l, r) | Is(l, r) | And(l, r) | Or(l, r) => {
                vec![l.as_ref(), r.as_ref()]
            }
            In { expression, list } => {
                let mut v = vec![expression.as_ref()];
                v.extend(list.iter());
                v
            }
            Between {
                expression,
                low,
                high,
            } => vec![expression.as_ref(), low.as_ref(), high.as_ref()],
            Like {
                expression,
                pattern,
            } => vec![expression.as_ref(), pattern.as_ref()],
            Not(e) | Not2(e) | Paren(e) | Neg(e) | Pos(e) => vec![e.as_ref()],
            Function { args, .. } => args.iter().collect(),
            Cast { expression, .. } => vec![expression.as_ref()],
            From(e) | Where(e) | Having(e) | Limit(e) | Offset(e) => vec![e.as_ref()],
            GroupBy(items) => items.iter().collect(),
            OrderItem { expression, .. } => vec![expression.as_ref()],
            Join { table, on, .. } => {
                let mut v = vec![table.as_ref()];
                if let Some(on) = on {
                    v.push(on.as_ref());
                }
                v
            }
            Select {
                expressions,
                from,
                joins,
                where_,
                group_by,
                having,
                order_by,
                limit,
                offset,
                ..
            } => {
                let mut v: Vec<&Expression> = expressions.iter().collect();
                v.extend(from.as_deref());
                v.extend(joins.iter());
                v.extend(where_.as_deref());
                v.extend(group_by.as_deref());
                v.extend(having.as_deref());
                v.extend(order_by.iter());
                v.extend(limit.as_deref());
                v.extend(offset.as_deref());
                v
            }
            Insert {
                table,
                columns,
                values,
            } => {
                let mut v = vec![table.as_ref()];
                v.extend(columns.iter());
                for row in values {
                    v.extend(row.iter());
                }
                v
            }
            Update {
                table,
                assignments,
                where_,
            } => {
                let mut v = vec![table.as_ref()];
                for a in assignments {
                    v.push(&a.column);
                    v.push(&a.value);
                }
                v.extend(where_.as_deref());
                v
            }
            Delete { table, where_ } => {
                let mut v = vec![table.as_ref()];
                v.extend(where_.as_deref());
                v
            }
            Create {
                name,
                columns,
                select,
                ..
            } => {
                let mut v = vec![name.as_ref()];
                v.extend(columns.iter());
                v.extend(select.as_deref());
                v
            }
            Drop { name, .. } => vec![name.as_ref()],
            Alter { name, .. } => vec![name.as_ref()],
            Subquery { select } => vec![select.as_ref()],
            Cte(CteDef { select, .. }) => vec![select.as_ref()],
            With { ctes, select } => {
                let mut v: Vec<&Expression> = ctes.iter().map(|c| c.select.as_ref()).collect();
                v.push(select.as_ref());
                v
            }
            Case { whens, else_expr } => {
                let mut v = vec![];
                for w in whens {
                    v.push(&w.condition);
                    v.push(&w.result);
                }
                v.extend(else_expr.as_deref());
                v
            }
            ColumnDef { .. } => vec![],
        }
    }

    /// A lazy-feeling (but eagerly collected) pre-order descent filtered by
    /// `predicate`, including `self`.
    pub fn find_all<'a>(&'a self, predicate: impl Fn(&Expression) -> bool + Copy) -> Vec<&'a Expression> {
        let mut out = Vec::new();
        self.find_all_into(predicate, &mut out);
        out
    }

    fn find_all_into<'a>(&'a self, predicate: impl Fn(&Expression) -> bool + Copy, out: &mut Vec<&'a Expression>) {
        if predicate(self) {
            out.push(self);
        }
        for child in self.children() {
            child.find_all_into(predicate, out);
        }
    }

    /// Post-order rewrite: children are transformed first, then `f` is
    /// applied to the (possibly already-rewritten) node itself.
    pub fn transform(self, f: &mut impl FnMut(Expression) -> Expression) -> Expression {
        let rewritten = self.map_children(|child| child.transform(f));
        f(rewritten)
    }

    /// Rebuild this node with every immediate child replaced by `f(child)`,
    /// without touching `self`'s own shape.
    pub fn map_children(self, mut f: impl FnMut(Expression) -> Expression) -> Expression {
        use Expression::*;
        match self {
            Literal { .. } | True | False | Null | Star | Identifier { .. } | Table { .. }
            | WorkspacePath { .. } | ColumnDef { .. } => self,
            Column { name, table } => Column {
                name: Box::new(f(*name)),
                table: table.map(|t| Box::new(f(*t))),
            },
            Alias { expression, alias } => Alias {
                expression: Box::new(f(*expression)),
                alias,
            },
            Add(l, r) => Add(Box::new(f(*l)), Box::new(f(*r))),
            Sub(l, r) => Sub(Box::new(f(*l)), Box::new(f(*r))),
            Mul(l, r) => Mul(Box::new(f(*l)), Box::new(f(*r))),
            Div(l, r) => Div(Box::new(f(*l)), Box::new(f(*r))),
            Mod(l, r) => Mod(Box::new(f(*l)), Box::new(f(*r))),
            Eq(l, r) => Eq(Box::new(f(*l)), Box::new(f(*r))),
            Neq(l, r) => Neq(Box::new(f(*l)), Box::new(f(*r))),
            Gt(l, r) => Gt(Box::new(f(*l)), Box::new(f(*r))),
            Lt(l, r) => Lt(Box::new(f(*l)), Box::new(f(*r))),
            Gte(l, r) => Gte(Box::new(f(*l)), Box::new(f(*r))),
            Lte(l, r) => Lte(Box::new(f(*l)), Box::new(f(*r))),
            Is(l, r) => Is(Box::new(f(*l)), Box::new(f(*r))),
            In { expression, list } => In {
                expression: Box::new(f(*expression)),
                list: list.into_iter().map(f).collect(),
            },
            Between {
                expression,
                low,
                high,
            } => Between {
                expression: Box::new(f(*expression)),
                low: Box::new(f(*low)),
                high: Box::new(f(*high)),
            },
            Like {
                expression,
                pattern,
            } => Like {
                expression: Box::new(f(*expression)),
                pattern: Box::new(f(*pattern)),
            },
            And(l, r) => And(Box::new(f(*l)), Box::new(f(*r))),
            Or(l, r) => Or(Box::new(f(*l)), Box::new(f(*r))),
            Not(e) => Not(Box::new(f(*e))),
            Not2(e) => Not2(Box::new(f(*e))),
            Paren(e) => Paren(Box::new(f(*e))),
            Neg(e) => Neg(Box::new(f(*e))),
            Pos(e) => Pos(Box::new(f(*e))),
            Function { name, args } => Function {
                name,
                args: args.into_iter().map(f).collect(),
            },
            Cast {
                expression,
                data_type,
            } => Cast {
                expression: Box::new(f(*expression)),
                data_type,
            },
            From(e) => From(Box::new(f(*e))),
            Where(e) => Where(Box::new(f(*e))),
            Having(e) => Having(Box::new(f(*e))),
            Limit(e) => Limit(Box::new(f(*e))),
            Offset(e) => Offset(Box::new(f(*e))),
            GroupBy(items) => GroupBy(items.into_iter().map(f).collect()),
            OrderItem {
                expression,
                direction,
            } => OrderItem {
                expression: Box::new(f(*expression)),
                direction,
            },
            Join {
                kind,
                table,
                on,
                using,
            } => Join {
                kind,
                table: Box::new(f(*table)),
                on: on.map(|o| Box::new(f(*o))),
                using,
            },
            Select {
                expressions,
                distinct,
                from,
                joins,
                where_,
                group_by,
                having,
                order_by,
                limit,
                offset,
            } => Select {
                expressions: expressions.into_iter().map(&mut f).collect(),
                distinct,
                from: from.map(|e| Box::new(f(*e))),
                joins: joins.into_iter().map(&mut f).collect(),
                where_: where_.map(|e| Box::new(f(*e))),
                group_by: group_by.map(|e| Box::new(f(*e))),
                having: having.map(|e| Box::new(f(*e))),
                order_by: order_by.into_iter().map(&mut f).collect(),
                limit: limit.map(|e| Box::new(f(*e))),
                offset: offset.map(|e| Box::new(f(*e))),
            },
            Insert {
                table,
                columns,
                values,
            } => Insert {
                table: Box::new(f(*table)),
                columns: columns.into_iter().map(&mut f).collect(),
                values: values
                    .into_iter()
                    .map(|row| row.into_iter().map(&mut f).collect())
                    .collect(),
            },
            Update {
                table,
                assignments,
                where_,
            } => Update {
                table: Box::new(f(*table)),
                assignments: assignments
                    .into_iter()
                    .map(|a| Assignment {
                        column: f(a.column),
                        value: f(a.value),
                    })
                    .collect(),
                where_: where_.map(|e| Box::new(f(*e))),
            },
            Delete { table, where_ } => Delete {
                table: Box::new(f(*table)),
                where_: where_.map(|e| Box::new(f(*e))),
            },
            Create {
                kind,
                name,
                columns,
                select,
            } => Create {
                kind,
                name: Box::new(f(*name)),
                columns: columns.into_iter().map(&mut f).collect(),
                select: select.map(|e| Box::new(f(*e))),
            },
            Drop { kind, name } => Drop {
                kind,
                name: Box::new(f(*name)),
            },
            Alter { name, action } => Alter {
                name: Box::new(f(*name)),
                action,
            },
            Subquery { select } => Subquery {
                select: Box::new(f(*select)),
            },
            Cte(CteDef { name, select }) => Cte(CteDef {
                name,
                select: Box::new(f(*select)),
            }),
            With { ctes, select } => With {
                ctes: ctes
                    .into_iter()
                    .map(|c| CteDef {
                        name: c.name,
                        select: Box::new(f(*c.select)),
                    })
                    .collect(),
                select: Box::new(f(*select)),
            },
            Case { whens, else_expr } => Case {
                whens: whens
                    .into_iter()
                    .map(|w| WhenClause {
                        condition: f(w.condition),
                        result: f(w.result),
                    })
                    .collect(),
                else_expr: else_expr.map(|e| Box::new(f(*e))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_of_binary_are_left_then_right() {
        let e = Expression::Add(
            Box::new(Expression::literal("1")),
            Box::new(Expression::literal("2")),
        );
        let kids = e.children();
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0], &Expression::literal("1"));
        assert_eq!(kids[1], &Expression::literal("2"));
    }

    #[test]
    fn find_all_descends_into_nested_select() {
        let inner = Expression::Select {
            expressions: vec![Expression::Star],
            distinct: false,
            from: Some(Box::new(Expression::Table {
                name: "t".into(),
                schema: None,
            })),
            joins: vec![],
            where_: None,
            group_by: None,
            having: None,
            order_by: vec![],
            limit: None,
            offset: None,
        };
        let outer = Expression::Subquery {
            select: Box::new(inner),
        };
        let tables = outer.find_all(|e| matches!(e, Expression::Table { .. }));
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn transform_rewrites_post_order() {
        let e = Expression::Not(Box::new(Expression::Not(Box::new(Expression::True))));
        let rewritten = e.transform(&mut |e| match e {
            Expression::Not(inner) => match *inner {
                Expression::Not(x) => *x,
                other => Expression::Not(Box::new(other)),
            },
            other => other,
        });
        assert_eq!(rewritten, Expression::True);
    }
}
