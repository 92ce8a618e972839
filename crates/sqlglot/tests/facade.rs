//! End-to-end façade scenarios (spec §8's concrete scenarios).

use sqlglot::{format, generate, get_dialect, optimize, parse_one, transpile, GeneratorConfig, OptimizerConfig};

#[test]
fn select_a_from_t_parses_and_generates_in_order() {
    let expr = parse_one("SELECT a FROM t", "ANSI").expect("parses");
    let sql = generate(&expr, "ANSI", GeneratorConfig::default()).unwrap();
    assert!(sql.find("SELECT").unwrap() < sql.find('a').unwrap());
    assert!(sql.find('a').unwrap() < sql.find("FROM").unwrap());
    assert!(sql.find("FROM").unwrap() < sql.rfind('t').unwrap());
}

#[test]
fn aggressive_optimize_on_redundant_query_is_idempotent() {
    let sql = "WITH unused AS (SELECT 1) SELECT * FROM t WHERE TRUE AND x = 5 AND x = 5";
    let expr = parse_one(sql, "ANSI").unwrap();
    let config = OptimizerConfig::aggressive();
    let once = optimize(expr, "ANSI", &config).unwrap();
    let twice = optimize(once.clone(), "ANSI", &config).unwrap();
    assert_eq!(once, twice);
    let out = generate(&once, "ANSI", GeneratorConfig::default()).unwrap();
    assert!(!out.to_ascii_uppercase().contains("WITH"));
    assert!(!out.contains("TRUE AND"));
}

#[test]
fn format_pretty_prints_major_clauses_on_separate_lines() {
    let out = format("SELECT a, b FROM t WHERE x = 1 ORDER BY a", "ANSI");
    assert!(out.contains('\n'));
    assert!(out.contains("SELECT"));
    assert!(out.contains("ORDER"));
}

#[test]
fn transpile_across_dialects_changes_identifier_quoting() {
    let sql = r#"SELECT "select" FROM t"#;
    let out = transpile(sql, "ANSI", "MSSQL");
    assert!(out.contains('['), "expected MSSQL bracket quoting in {out:?}");
}

#[test]
fn every_built_in_dialect_name_resolves() {
    for name in [
        "ANSI", "MYSQL", "POSTGRES", "BIGQUERY", "SNOWFLAKE", "SQLITE", "MSSQL", "ORACLE", "DUCKDB", "SPARK",
        "CLICKHOUSE", "REDSHIFT", "PRESTO", "HIVE", "MARIADB", "ATHENA", "DATABRICKS", "TRINO", "STARROCKS",
        "ICEBERG", "COCKROACHDB", "AURORA", "IMPALA", "TERADATA", "VERTICA", "YELLOWBRICK", "FIREBOLT", "EXASOL",
        "PANDAS", "WASM", "GLUE", "DRILL",
    ] {
        assert!(get_dialect(name).is_ok(), "{name} should resolve");
    }
}
