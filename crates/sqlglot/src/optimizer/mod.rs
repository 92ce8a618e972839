//! The optimization pipeline (spec §4.3, §4.4).

mod annotate_types;
mod canonicalize;
mod eliminate_ctes;
mod join_reordering;
mod merge_subqueries;
mod normalize_predicates;
mod projection_pushdown;
mod pushdown_predicates;
mod qualify_columns;
mod quote_identifiers;
mod simplify;
pub mod support;

pub use annotate_types::{annotate, DataType, TypeInfo, TypeNode};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlglot_ast::Expression;

use crate::dialect::Dialect;

/// Contextual data every rule gets: the active dialect plus whatever
/// scratch space a future rule might need (spec §4.3, "the active dialect,
/// configuration flags, and optional scratch space").
pub struct OptimizeContext<'a> {
    pub dialect: &'a Dialect,
}

type RuleFn = fn(Expression, &OptimizeContext) -> Expression;

/// The 11 boolean knobs gating each rule (spec §4.3), plus the pass cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizerConfig {
    pub simplify: bool,
    pub canonicalize: bool,
    pub quote_identifiers: bool,
    pub eliminate_ctes: bool,
    pub normalize_predicates: bool,
    pub pushdown_predicates: bool,
    pub merge_subqueries: bool,
    pub join_reordering: bool,
    pub projection_pushdown: bool,
    pub annotate_types: bool,
    pub qualify_columns: bool,
    pub max_passes: usize,
}

impl OptimizerConfig {
    /// `MINIMAL`: simplify only.
    pub fn minimal() -> Self {
        OptimizerConfig { simplify: true, ..Self::none() }
    }

    /// `PHASE_5A`: simplify + canonicalize + quote + eliminate CTEs.
    pub fn phase_5a() -> Self {
        OptimizerConfig {
            simplify: true,
            canonicalize: true,
            quote_identifiers: true,
            eliminate_ctes: true,
            ..Self::none()
        }
    }

    /// `PHASE_5B` / `AGGRESSIVE`: all 11 rules.
    pub fn phase_5b() -> Self {
        OptimizerConfig {
            simplify: true,
            canonicalize: true,
            quote_identifiers: true,
            eliminate_ctes: true,
            normalize_predicates: true,
            pushdown_predicates: true,
            merge_subqueries: true,
            join_reordering: true,
            projection_pushdown: true,
            annotate_types: true,
            qualify_columns: true,
            max_passes: 8,
        }
    }

    pub fn aggressive() -> Self {
        Self::phase_5b()
    }

    fn none() -> Self {
        OptimizerConfig {
            simplify: false,
            canonicalize: false,
            quote_identifiers: false,
            eliminate_ctes: false,
            normalize_predicates: false,
            pushdown_predicates: false,
            merge_subqueries: false,
            join_reordering: false,
            projection_pushdown: false,
            annotate_types: false,
            qualify_columns: false,
            max_passes: 8,
        }
    }

    /// The gated rules in declared order (spec §4.4's numbering), each
    /// paired with the config flag that must be set for it to run this
    /// pipeline invocation.
    fn rules(&self) -> Vec<(bool, RuleFn)> {
        vec![
            (self.simplify, simplify::apply as RuleFn),
            (self.canonicalize, canonicalize::apply as RuleFn),
            (self.quote_identifiers, quote_identifiers::apply as RuleFn),
            (self.eliminate_ctes, eliminate_ctes::apply as RuleFn),
            (self.normalize_predicates, normalize_predicates::apply as RuleFn),
            (self.pushdown_predicates, pushdown_predicates::apply as RuleFn),
            (self.merge_subqueries, merge_subqueries::apply as RuleFn),
            (self.join_reordering, join_reordering::apply as RuleFn),
            (self.projection_pushdown, projection_pushdown::apply as RuleFn),
            (self.annotate_types, annotate_types::apply as RuleFn),
            (self.qualify_columns, qualify_columns::apply as RuleFn),
        ]
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::minimal()
    }
}

/// `optimize(expr, context) → expr'` (spec §4.3). Applies every gated rule
/// once per pass, in declared order, repeating while any rule's result
/// differs from its input, capped at `config.max_passes`.
pub fn optimize(expr: Expression, dialect: &Dialect, config: &OptimizerConfig) -> Expression {
    let ctx = OptimizeContext { dialect };
    let rules = config.rules();
    let mut current = expr;
    for _ in 0..config.max_passes.max(1) {
        let mut changed = false;
        for &(enabled, rule) in &rules {
            if !enabled {
                continue;
            }
            let next = rule(current.clone(), &ctx);
            if next != current {
                changed = true;
            }
            current = next;
        }
        if !changed {
            break;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::get_dialect;

    #[test]
    fn minimal_preset_only_simplifies() {
        let dialect = get_dialect("ANSI").unwrap();
        let config = OptimizerConfig::minimal();
        let expr = Expression::And(Box::new(Expression::True), Box::new(Expression::identifier("x")));
        assert_eq!(optimize(expr, &dialect, &config), Expression::identifier("x"));
    }

    #[test]
    fn pipeline_reaches_fixpoint_before_cap() {
        let dialect = get_dialect("ANSI").unwrap();
        let config = OptimizerConfig::phase_5b();
        let expr = Expression::Select {
            expressions: vec![Expression::Star],
            distinct: false,
            from: Some(Box::new(Expression::Table { name: "t".to_string(), schema: None })),
            joins: vec![],
            where_: Some(Box::new(Expression::And(
                Box::new(Expression::True),
                Box::new(Expression::Eq(Box::new(Expression::identifier("x")), Box::new(Expression::literal("5")))),
            ))),
            group_by: None,
            having: None,
            order_by: vec![],
            limit: None,
            offset: None,
        };
        let optimized = optimize(expr, &dialect, &config);
        let twice = optimize(optimized.clone(), &dialect, &config);
        assert_eq!(optimized, twice, "optimize should be idempotent once at fixpoint");
    }
}
