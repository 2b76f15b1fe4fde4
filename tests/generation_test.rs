//! End-to-end tests through the public API.

use std::sync::Arc;

use fedsql::prelude::*;
use pretty_assertions::assert_eq;

fn element(group: &Arc<Group>, name: &str, data_type: DataType) -> Expression {
    Expression::Element(Element::new(Arc::clone(group), name, data_type))
}

fn pushdown_query() -> (Command, Arc<Group>, Arc<Group>) {
    let orders = Group::named("orders");
    let customers = Group::aliased("customers", "c");
    let join = Join::new(
        FromItem::Group(Arc::clone(&orders)),
        FromItem::Group(Arc::clone(&customers)),
        JoinKind::LeftOuter,
        vec![Criteria::compare(
            element(&orders, "orders.customer_id", DataType::Integer),
            CompareOp::Eq,
            element(&customers, "customers.id", DataType::Integer),
        )],
    );
    let query = Query::new(
        Select::new(vec![
            SelectSymbol::new(element(&orders, "orders.id", DataType::Integer)),
            SelectSymbol::aliased(element(&customers, "customers.name", DataType::String), "who"),
        ]),
        From::new(vec![join.into()]),
    )
    .with_where(Criteria::compare(
        element(&orders, "orders.total", DataType::BigDecimal),
        CompareOp::Gt,
        Expression::Literal(Literal::new(100, DataType::Integer)),
    ))
    .with_order_by(OrderBy {
        items: vec![OrderByItem::by_name("orders.total", SortOrder::Desc)],
    })
    .with_limit(Limit::with_offset(30, 20));
    (Command::Query(query), orders, customers)
}

#[test]
fn test_pushdown_query_under_two_dialects() {
    let (cmd, _, _) = pushdown_query();
    assert_eq!(
        render(&cmd, &DialectConfig::generic(), None).unwrap(),
        "SELECT orders.id, c.name AS who FROM orders LEFT OUTER JOIN customers AS c \
         ON orders.customer_id = c.id WHERE orders.total > 100 \
         ORDER BY total DESC LIMIT 20, 30"
    );
    assert_eq!(
        render(&cmd, &DialectConfig::postgres(), None).unwrap(),
        "SELECT orders.id, c.name AS who FROM orders LEFT OUTER JOIN customers AS c \
         ON orders.customer_id = c.id WHERE orders.total > 100 \
         ORDER BY total DESC LIMIT 30 OFFSET 20"
    );
}

#[test]
fn test_rewrite_then_render_for_a_restricted_dialect() {
    let (cmd, _, _) = pushdown_query();
    let config = Dialect::Sqlite.config();
    let rewritten = rewrite_for_dialect(cmd, &config).unwrap();
    let sql = render(&rewritten, &config, None).unwrap();
    assert_eq!(
        sql,
        "SELECT orders.id, c.name AS who FROM orders LEFT OUTER JOIN customers AS c \
         ON orders.customer_id = c.id WHERE orders.total > 100 \
         ORDER BY total DESC LIMIT 30 OFFSET 20"
    );
}

#[test]
fn test_collectors_agree_on_groups() {
    let (cmd, orders, customers) = pushdown_query();
    let elements = collect_elements(&cmd);
    assert_eq!(elements.len(), 5);

    let groups = collect_groups_used_by_elements(&cmd);
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().any(|g| Arc::ptr_eq(g, &orders)));
    assert!(groups.iter().any(|g| Arc::ptr_eq(g, &customers)));

    // every element's owning group is in the collected set
    for e in elements {
        assert!(groups.iter().any(|g| Arc::ptr_eq(g, &e.group)));
    }
}

#[test]
fn test_json_round_trip() {
    let (cmd, _, _) = pushdown_query();
    let json = cmd.to_json().unwrap();
    let back = Command::from_json(&json).unwrap();
    assert_eq!(back, cmd);
}

#[test]
fn test_conjunct_utilities_round_trip() {
    let t = Group::named("t");
    let conjuncts: Vec<Criteria> = (1..=3)
        .map(|n| {
            Criteria::compare(
                element(&t, "t.x", DataType::Integer),
                CompareOp::Eq,
                Expression::Literal(Literal::new(n as i64, DataType::Integer)),
            )
        })
        .collect();
    let mut combined = None;
    for c in &conjuncts {
        combined = combine_with_and(combined, Some(c.clone()));
    }
    let combined = combined.unwrap();
    let separated: Vec<Criteria> = separate_conjuncts(&combined).into_iter().cloned().collect();
    assert_eq!(separated, conjuncts);
}

#[test]
fn test_model_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Command>();
    assert_send_sync::<DialectConfig>();
}
