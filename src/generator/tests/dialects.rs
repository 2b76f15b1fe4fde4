//! Dialect configuration tests: the same trees under different configs.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::dialect::Dialect;
use crate::error::LanguageError;
use crate::generator::render;

#[test]
fn test_limit_both_forms_from_one_tree() {
    let (query, _) = select_query("users", &["id"]);
    let cmd = Command::Query(query.with_limit(Limit::with_offset(30, 20)));
    assert_eq!(
        render(&cmd, &DialectConfig::generic(), None).unwrap(),
        "SELECT users.id FROM users LIMIT 20, 30"
    );
    assert_eq!(
        render(&cmd, &DialectConfig::postgres(), None).unwrap(),
        "SELECT users.id FROM users LIMIT 30 OFFSET 20"
    );
}

#[test]
fn test_group_alias_without_as_keyword() {
    let group = Group::aliased("customers", "c");
    let query = Query::new(
        Select::new(vec![SelectSymbol::new(col(&group, "id"))]),
        From::group(Arc::clone(&group)),
    );
    let cmd = Command::Query(query);
    assert_eq!(
        render(&cmd, &DialectConfig::generic(), None).unwrap(),
        "SELECT c.id FROM customers AS c"
    );
    assert_eq!(
        render(&cmd, &DialectConfig::oracle(), None).unwrap(),
        "SELECT c.id FROM customers c"
    );
}

#[test]
fn test_replace_element_name_hook_skips_qualification() {
    let t = Group::named("t");
    let query = Query::new(
        Select::new(vec![
            SelectSymbol::new(col(&t, "rowid")),
            SelectSymbol::new(col(&t, "id")),
        ]),
        From::group(Arc::clone(&t)),
    );
    assert_eq!(
        render(&Command::Query(query), &DialectConfig::oracle(), None).unwrap(),
        "SELECT ROWID, t.id FROM t"
    );
}

#[test]
fn test_parenthesize_set_operands_hook() {
    let (a, _) = select_query("a", &["id"]);
    let (b, _) = select_query("b", &["id"]);
    let union = SetQuery::new(SetOp::Union, false, a.into(), b.into());
    let cmd = Command::SetQuery(union);
    assert_eq!(
        render(&cmd, &DialectConfig::generic(), None).unwrap(),
        "SELECT a.id FROM a UNION SELECT b.id FROM b"
    );
    let config = DialectConfig {
        parenthesize_set_operands: true,
        ..DialectConfig::generic()
    };
    assert_eq!(
        render(&cmd, &config, None).unwrap(),
        "(SELECT a.id FROM a) UNION (SELECT b.id FROM b)"
    );
}

#[test]
fn test_parenthesize_joins_hook() {
    let a = Group::named("a");
    let b = Group::named("b");
    let c = Group::named("c");
    let inner = Join::new(
        FromItem::Group(Arc::clone(&a)),
        FromItem::Group(Arc::clone(&b)),
        JoinKind::Inner,
        vec![Criteria::compare(col(&a, "x"), CompareOp::Eq, col(&b, "x"))],
    );
    let outer = Join::new(
        inner.into(),
        FromItem::Group(Arc::clone(&c)),
        JoinKind::LeftOuter,
        vec![Criteria::compare(col(&a, "x"), CompareOp::Eq, col(&c, "x"))],
    );
    let query = Query::new(
        Select::new(vec![SelectSymbol::new(col(&a, "x"))]),
        From::new(vec![outer.into()]),
    );
    let cmd = Command::Query(query);
    assert_eq!(
        render(&cmd, &DialectConfig::generic(), None).unwrap(),
        "SELECT a.x FROM a INNER JOIN b ON a.x = b.x LEFT OUTER JOIN c ON a.x = c.x"
    );
    let config = DialectConfig {
        parenthesize_joins: true,
        ..DialectConfig::generic()
    };
    assert_eq!(
        render(&cmd, &config, None).unwrap(),
        "SELECT a.x FROM (a INNER JOIN b ON a.x = b.x) LEFT OUTER JOIN c ON a.x = c.x"
    );
}

#[test]
fn test_quantified_subquery_unsupported_is_a_hard_error() {
    let (sub, _) = select_query("items", &["price"]);
    let (query, group) = select_query("orders", &["id"]);
    let query = query.with_where(Criteria::SubqueryCompare(SubqueryCompareCriteria {
        left: col(&group, "total"),
        op: CompareOp::Eq,
        quantifier: Quantifier::Some,
        query: sub.into(),
    }));
    let err = render(&Command::Query(query), &Dialect::Sqlite.config(), None).unwrap_err();
    match err {
        LanguageError::UnsupportedCapability { dialect, construct } => {
            assert_eq!(dialect, "sqlite");
            assert!(construct.contains("quantified subquery"));
        }
        other => panic!("expected capability error, got {other}"),
    }
}

#[test]
fn test_dialect_enum_resolves_configs() {
    assert_eq!(Dialect::default(), Dialect::Generic);
    assert_eq!(Dialect::Postgres.config().name, "postgres");
    assert_eq!(Dialect::MySql.config().name, "mysql");
    assert!(!Dialect::Sqlite.config().supports_right_outer_join);
    assert!(!Dialect::Oracle.config().native_boolean);
}
