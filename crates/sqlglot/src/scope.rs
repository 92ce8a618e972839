//! Scope analysis (spec §4.5).
//!
//! A [`ScopeTree`] is an arena: scopes reference their parent and children
//! by [`ScopeId`] index rather than `Rc<RefCell<..>>` back-pointers, so the
//! tree is just a `Vec` and ordinary borrows suffice for traversal.

use sqlglot_ast::Expression;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Cte,
    Subquery,
}

/// Where a name inside a `FROM`/`JOIN` clause resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table { alias: Option<String>, qualified_name: String },
    Scope(ScopeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub sources: Vec<Source>,
    /// How many times a CTE defined in this scope is referenced elsewhere
    /// in the tree — `EliminateCTEs` inlines any CTE whose count is 0.
    pub cte_ref_count: usize,
    pub referenced_columns: Vec<String>,
    pub children: Vec<ScopeId>,
    /// The CTE's own declared name, set only for `ScopeKind::Cte` scopes —
    /// `find_cte` matches against this directly rather than scanning the
    /// parent scope's `sources` for a match against any sibling.
    pub cte_name: Option<String>,
}

/// The full set of scopes built from one top-level statement, indexed by
/// [`ScopeId`]. Scope 0 is always the root.
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter().enumerate().map(|(i, s)| (ScopeId(i), s))
    }

    fn push(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(scope);
        id
    }

    /// Builds the scope tree for `root`, visiting each subquery exactly
    /// once (the redundant-rebuild the spec's Open Questions flags as a
    /// correctness bug in the original: building a subquery's scope twice
    /// double counts its CTE references).
    pub fn build(root: &Expression) -> ScopeTree {
        let mut tree = ScopeTree { scopes: Vec::new() };
        let root_id = tree.push(Scope {
            kind: ScopeKind::Root,
            parent: None,
            sources: Vec::new(),
            cte_ref_count: 0,
            referenced_columns: Vec::new(),
            children: Vec::new(),
            cte_name: None,
        });
        tree.visit(root, root_id);
        tree
    }

    fn visit(&mut self, expr: &Expression, current: ScopeId) {
        match expr {
            Expression::With { ctes, select } => {
                for cte in ctes {
                    let cte_id = self.push(Scope {
                        kind: ScopeKind::Cte,
                        parent: Some(current),
                        sources: Vec::new(),
                        cte_ref_count: 0,
                        referenced_columns: Vec::new(),
                        children: Vec::new(),
                        cte_name: Some(cte.name.clone()),
                    });
                    self.scopes[current.0].children.push(cte_id);
                    self.visit(&cte.select, cte_id);
                    self.scopes[current.0].sources.push(Source::Table {
                        alias: Some(cte.name.clone()),
                        qualified_name: cte.name.clone(),
                    });
                }
                self.visit(select, current);
            }
            Expression::Select { from, joins, where_, .. } => {
                if let Some(from) = from {
                    self.visit_table_ref(from, current);
                }
                for join in joins {
                    if let Expression::Join { table, on, .. } = join {
                        self.visit_table_ref(table, current);
                        if let Some(on) = on {
                            self.record_column_refs(on, current);
                        }
                    }
                }
                if let Some(where_) = where_ {
                    self.record_column_refs(where_, current);
                }
            }
            Expression::Subquery { select } => self.visit(select, current),
            _ => {}
        }
    }

    fn visit_table_ref(&mut self, expr: &Expression, current: ScopeId) {
        match expr {
            Expression::Table { name, schema } => {
                let qualified_name = match schema {
                    Some(s) => format!("{s}.{name}"),
                    None => name.clone(),
                };
                if let Some(cte_scope) = self.find_cte(current, &qualified_name) {
                    self.scopes[cte_scope.0].cte_ref_count += 1;
                }
                self.scopes[current.0].sources.push(Source::Table { alias: None, qualified_name });
            }
            Expression::Alias { expression, alias } => {
                if let Expression::Subquery { select } = expression.as_ref() {
                    let sub_id = self.push(Scope {
                        kind: ScopeKind::Subquery,
                        parent: Some(current),
                        sources: Vec::new(),
                        cte_ref_count: 0,
                        referenced_columns: Vec::new(),
                        children: Vec::new(),
                        cte_name: None,
                    });
                    self.scopes[current.0].children.push(sub_id);
                    self.visit(select, sub_id);
                    self.scopes[current.0].sources.push(Source::Scope(sub_id));
                } else if let Expression::Table { name, schema } = expression.as_ref() {
                    let qualified_name = match schema {
                        Some(s) => format!("{s}.{name}"),
                        None => name.clone(),
                    };
                    if let Some(cte_scope) = self.find_cte(current, &qualified_name) {
                        self.scopes[cte_scope.0].cte_ref_count += 1;
                    }
                    self.scopes[current.0].sources.push(Source::Table {
                        alias: Some(alias.clone()),
                        qualified_name,
                    });
                }
            }
            Expression::Subquery { select } => {
                let sub_id = self.push(Scope {
                    kind: ScopeKind::Subquery,
                    parent: Some(current),
                    sources: Vec::new(),
                    cte_ref_count: 0,
                    referenced_columns: Vec::new(),
                    children: Vec::new(),
                    cte_name: None,
                });
                self.scopes[current.0].children.push(sub_id);
                self.visit(select, sub_id);
                self.scopes[current.0].sources.push(Source::Scope(sub_id));
            }
            _ => {}
        }
    }

    /// Walks outward from `start` looking for a CTE named `name` bound at
    /// that scope or any ancestor — a `WITH` clause's bindings are visible
    /// to its own body and everything nested under it.
    fn find_cte(&self, start: ScopeId, name: &str) -> Option<ScopeId> {
        let mut scope = start;
        loop {
            for &child in &self.scopes[scope.0].children {
                if self.scopes[child.0].kind == ScopeKind::Cte
                    && self.scopes[child.0].cte_name.as_deref() == Some(name)
                {
                    return Some(child);
                }
            }
            match self.scopes[scope.0].parent {
                Some(p) => scope = p,
                None => return None,
            }
        }
    }

    fn record_column_refs(&mut self, expr: &Expression, current: ScopeId) {
        for col in expr.find_all(|e| matches!(e, Expression::Column { .. })) {
            if let Expression::Column { name, .. } = col {
                if let Expression::Identifier { name, .. } = name.as_ref() {
                    self.scopes[current.0].referenced_columns.push(name.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> Expression {
        Expression::Table { name: name.to_string(), schema: None }
    }

    fn minimal_select(from: Expression) -> Expression {
        Expression::Select {
            expressions: vec![Expression::Star],
            distinct: false,
            from: Some(Box::new(from)),
            joins: vec![],
            where_: None,
            group_by: None,
            having: None,
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }

    #[test]
    fn root_scope_with_single_table_has_no_children() {
        let select = minimal_select(table("users"));
        let tree = ScopeTree::build(&select);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(tree.root()).sources.len(), 1);
    }

    #[test]
    fn unreferenced_cte_has_zero_ref_count() {
        let with = Expression::With {
            ctes: vec![sqlglot_ast::CteDef {
                name: "unused".to_string(),
                select: Box::new(minimal_select(table("users"))),
            }],
            select: Box::new(minimal_select(table("orders"))),
        };
        let tree = ScopeTree::build(&with);
        let root = tree.get(tree.root());
        let cte_id = root.children[0];
        assert_eq!(tree.get(cte_id).cte_ref_count, 0);
    }

    #[test]
    fn referenced_cte_has_nonzero_ref_count() {
        let with = Expression::With {
            ctes: vec![sqlglot_ast::CteDef {
                name: "recent".to_string(),
                select: Box::new(minimal_select(table("orders"))),
            }],
            select: Box::new(minimal_select(table("recent"))),
        };
        let tree = ScopeTree::build(&with);
        let root = tree.get(tree.root());
        let cte_id = root.children[0];
        assert_eq!(tree.get(cte_id).cte_ref_count, 1);
    }

    #[test]
    fn second_of_two_ctes_is_the_one_marked_referenced() {
        let with = Expression::With {
            ctes: vec![
                sqlglot_ast::CteDef { name: "a".to_string(), select: Box::new(minimal_select(table("x"))) },
                sqlglot_ast::CteDef { name: "b".to_string(), select: Box::new(minimal_select(table("y"))) },
            ],
            select: Box::new(minimal_select(table("b"))),
        };
        let tree = ScopeTree::build(&with);
        let root = tree.get(tree.root());
        let cte_a = root.children[0];
        let cte_b = root.children[1];
        assert_eq!(tree.get(cte_a).cte_ref_count, 0);
        assert_eq!(tree.get(cte_b).cte_ref_count, 1);
    }

    #[test]
    fn subquery_in_from_creates_its_own_scope_once() {
        let subquery = Expression::Alias {
            expression: Box::new(Expression::Subquery { select: Box::new(minimal_select(table("users"))) }),
            alias: "u".to_string(),
        };
        let outer = minimal_select(subquery);
        let tree = ScopeTree::build(&outer);
        assert_eq!(tree.len(), 2);
    }
}
