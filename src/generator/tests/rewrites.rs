//! Capability-driven rewrite tests.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::dialect::Dialect;
use crate::error::LanguageError;
use crate::generator::render;
use crate::rewrite::rewrite_for_dialect;
use crate::types::DataType as Dt;

fn render_rewritten(cmd: Command, config: &DialectConfig) -> String {
    let rewritten = rewrite_for_dialect(cmd, config).unwrap();
    render(&rewritten, config, None).unwrap()
}

#[test]
fn test_right_outer_join_flips_when_unsupported() {
    let a = Group::named("a");
    let b = Group::named("b");
    let on = Criteria::compare(col(&a, "x"), CompareOp::Eq, col(&b, "x"));
    let join = Join::new(
        FromItem::Group(Arc::clone(&a)),
        FromItem::Group(Arc::clone(&b)),
        JoinKind::RightOuter,
        vec![on.clone()],
    );
    let select = Select::new(vec![
        SelectSymbol::new(col(&a, "x")),
        SelectSymbol::new(col(&b, "y")),
    ]);
    let cmd = Command::Query(Query::new(select.clone(), From::new(vec![join.into()])));

    let config = Dialect::Sqlite.config();
    let sql = render_rewritten(cmd, &config);
    assert_eq!(sql, "SELECT a.x, b.y FROM b LEFT OUTER JOIN a ON a.x = b.x");

    // byte-identical to the hand-built flipped join; the select list keeps
    // the original output-column order
    let flipped = Join::new(
        FromItem::Group(Arc::clone(&b)),
        FromItem::Group(Arc::clone(&a)),
        JoinKind::LeftOuter,
        vec![on],
    );
    let by_hand = Command::Query(Query::new(select, From::new(vec![flipped.into()])));
    assert_eq!(sql, render(&by_hand, &config, None).unwrap());
}

#[test]
fn test_right_outer_join_kept_when_supported() {
    let a = Group::named("a");
    let b = Group::named("b");
    let join = Join::new(
        FromItem::Group(Arc::clone(&a)),
        FromItem::Group(Arc::clone(&b)),
        JoinKind::RightOuter,
        vec![Criteria::compare(col(&a, "x"), CompareOp::Eq, col(&b, "x"))],
    );
    let cmd = Command::Query(Query::new(
        Select::new(vec![SelectSymbol::new(col(&a, "x"))]),
        From::new(vec![join.into()]),
    ));
    assert_eq!(
        render_rewritten(cmd, &DialectConfig::generic()),
        "SELECT a.x FROM a RIGHT OUTER JOIN b ON a.x = b.x"
    );
}

#[test]
fn test_join_flip_recurses_into_set_query_branches() {
    let a = Group::named("a");
    let b = Group::named("b");
    let join = Join::new(
        FromItem::Group(Arc::clone(&a)),
        FromItem::Group(Arc::clone(&b)),
        JoinKind::RightOuter,
        vec![Criteria::compare(col(&a, "x"), CompareOp::Eq, col(&b, "x"))],
    );
    let left = Query::new(
        Select::new(vec![SelectSymbol::new(col(&a, "x"))]),
        From::new(vec![join.into()]),
    );
    let (right, _) = select_query("c", &["x"]);
    let cmd = Command::SetQuery(SetQuery::new(SetOp::Union, false, left.into(), right.into()));

    let sql = render_rewritten(cmd, &Dialect::Sqlite.config());
    assert!(sql.contains("b LEFT OUTER JOIN a"), "{sql}");
    assert!(!sql.contains("RIGHT OUTER"), "{sql}");
}

#[test]
fn test_join_flip_recurses_into_inline_views() {
    let a = Group::named("a");
    let b = Group::named("b");
    let v = Group::named("v");
    let join = Join::new(
        FromItem::Group(Arc::clone(&a)),
        FromItem::Group(Arc::clone(&b)),
        JoinKind::RightOuter,
        vec![Criteria::compare(col(&a, "x"), CompareOp::Eq, col(&b, "x"))],
    );
    let inner = Query::new(
        Select::new(vec![SelectSymbol::new(col(&a, "x"))]),
        From::new(vec![join.into()]),
    );
    let view = InlineView {
        group: Arc::clone(&v),
        query: inner.into(),
        output: None,
    };
    let cmd = Command::Query(Query::new(
        Select::new(vec![SelectSymbol::new(col(&v, "x"))]),
        From::new(vec![view.into()]),
    ));

    let sql = render_rewritten(cmd, &Dialect::Sqlite.config());
    assert_eq!(
        sql,
        "SELECT v.x FROM (SELECT a.x FROM b LEFT OUTER JOIN a ON a.x = b.x) AS v"
    );
}

#[test]
fn test_boolean_select_coerced_through_case() {
    let t = Group::named("t");
    let query = Query::new(
        Select::new(vec![SelectSymbol::new(col_typed(&t, "active", Dt::Boolean))]),
        From::group(Arc::clone(&t)),
    );
    let sql = render_rewritten(Command::Query(query), &Dialect::Oracle.config());
    assert_eq!(
        sql,
        "SELECT CASE WHEN t.active = 0 THEN '0' WHEN t.active IS NOT NULL THEN '1' END FROM t"
    );
}

#[test]
fn test_boolean_select_untouched_with_native_boolean() {
    let t = Group::named("t");
    let query = Query::new(
        Select::new(vec![SelectSymbol::new(col_typed(&t, "active", Dt::Boolean))]),
        From::group(Arc::clone(&t)),
    );
    assert_eq!(
        render_rewritten(Command::Query(query), &DialectConfig::postgres()),
        "SELECT t.active FROM t"
    );
}

#[test]
fn test_cast_target_type_maps_through_dialect() {
    let t = Group::named("t");
    let convert = Function::new(
        "convert",
        vec![col(&t, "x"), text("biginteger")],
        Dt::BigInteger,
    );
    let query = Query::new(
        Select::new(vec![SelectSymbol::new(Expression::Function(convert))]),
        From::group(Arc::clone(&t)),
    );
    assert_eq!(
        render_rewritten(Command::Query(query), &DialectConfig::postgres()),
        "SELECT CONVERT(t.x, numeric(38)) FROM t"
    );
}

#[test]
fn test_cast_to_unmappable_type_is_a_typed_error() {
    let t = Group::named("t");
    let cast = Function::new("cast", vec![col(&t, "flag"), text("boolean")], Dt::Boolean);
    let query = Query::new(
        Select::new(vec![SelectSymbol::new(Expression::Function(cast))]),
        From::group(Arc::clone(&t)),
    );
    let err = rewrite_for_dialect(Command::Query(query), &Dialect::Oracle.config()).unwrap_err();
    match err {
        LanguageError::TypeMapping { dialect, data_type } => {
            assert_eq!(dialect, "oracle");
            assert_eq!(data_type, Dt::Boolean);
        }
        other => panic!("expected type-mapping error, got {other}"),
    }
}

#[test]
fn test_noncanonical_cast_target_passes_through() {
    let t = Group::named("t");
    let convert = Function::new(
        "convert",
        vec![col(&t, "x"), text("varchar2(100)")],
        Dt::String,
    );
    let query = Query::new(
        Select::new(vec![SelectSymbol::new(Expression::Function(convert))]),
        From::group(Arc::clone(&t)),
    );
    assert_eq!(
        render_rewritten(Command::Query(query), &DialectConfig::generic()),
        "SELECT CONVERT(t.x, varchar2(100)) FROM t"
    );
}

#[test]
fn test_like_escape_requires_capability() {
    let (query, group) = select_query("users", &["id"]);
    let query = query.with_where(Criteria::Like(LikeCriteria {
        left: col(&group, "name"),
        right: text("J#%%"),
        escape: Some('#'),
        negated: false,
    }));
    let config = DialectConfig {
        supports_like_escape: false,
        ..DialectConfig::generic()
    };
    let err = rewrite_for_dialect(Command::Query(query), &config).unwrap_err();
    assert!(err.to_string().contains("LIKE ... ESCAPE"));
}

#[test]
fn test_full_outer_join_unsupported_is_a_hard_error() {
    let a = Group::named("a");
    let b = Group::named("b");
    let join = Join::new(
        FromItem::Group(Arc::clone(&a)),
        FromItem::Group(Arc::clone(&b)),
        JoinKind::FullOuter,
        vec![Criteria::compare(col(&a, "x"), CompareOp::Eq, col(&b, "x"))],
    );
    let cmd = Command::Query(Query::new(
        Select::new(vec![SelectSymbol::new(col(&a, "x"))]),
        From::new(vec![join.into()]),
    ));
    let err = rewrite_for_dialect(cmd, &Dialect::MySql.config()).unwrap_err();
    assert!(err.to_string().contains("FULL OUTER JOIN"));
}

#[test]
fn test_quantified_subquery_rejected_at_rewrite_time() {
    let (sub, _) = select_query("items", &["price"]);
    let users = Group::named("users");
    let delete = Delete {
        group: Arc::clone(&users),
        criteria: Some(Criteria::SubqueryCompare(SubqueryCompareCriteria {
            left: col(&users, "spend"),
            op: CompareOp::Gt,
            quantifier: Quantifier::All,
            query: sub.into(),
        })),
    };
    let err = rewrite_for_dialect(Command::Delete(delete), &Dialect::Sqlite.config()).unwrap_err();
    assert!(matches!(err, LanguageError::UnsupportedCapability { .. }));
}

#[test]
fn test_rewrite_is_identity_for_fully_capable_dialect() {
    let (query, group) = select_query("users", &["id", "name"]);
    let cmd = Command::Query(query.with_where(Criteria::compare(
        col(&group, "id"),
        CompareOp::Gt,
        int(7),
    )));
    let config = DialectConfig::generic();
    let rewritten = rewrite_for_dialect(cmd.clone(), &config).unwrap();
    assert_eq!(rewritten, cmd);
}
