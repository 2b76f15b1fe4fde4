//! Tree traversal.
//!
//! A trait that represents a visitor that walks through a command tree.
//! Each method corresponds to a node variant and has a default
//! implementation that visits all of its child slots via the matching
//! `walk_*` function. Implementors override the methods they care about;
//! calling `walk_*` from an override continues the descent, giving
//! pre-order traversal. Every `walk_*` body is an exhaustive match over a
//! closed enum, so adding a node variant breaks the build here instead of
//! silently skipping the new node.
//!
//! The `Element -> Group` back-reference is not a child slot and is never
//! traversed; groups are visited only where they are owned (FROM items,
//! insert/update/delete targets).

use std::sync::Arc;

use crate::ast::{
    Aggregate, Command, Criteria, Delete, Element, Expression, From, FromItem, Function, Group,
    GroupBy, InlineView, Insert, InsertSource, Join, Limit, Literal, OrderBy, OrderByItem,
    Procedure, Query, QueryCommand, SearchedCase, Select, SelectSymbol, SetQuery, Update,
};

pub trait Visitor<'a> {
    fn visit_command(&mut self, cmd: &'a Command) {
        walk_command(self, cmd)
    }

    fn visit_query_command(&mut self, cmd: &'a QueryCommand) {
        walk_query_command(self, cmd)
    }

    fn visit_query(&mut self, query: &'a Query) {
        walk_query(self, query)
    }

    fn visit_set_query(&mut self, set_query: &'a SetQuery) {
        walk_set_query(self, set_query)
    }

    fn visit_insert(&mut self, insert: &'a Insert) {
        walk_insert(self, insert)
    }

    fn visit_update(&mut self, update: &'a Update) {
        walk_update(self, update)
    }

    fn visit_delete(&mut self, delete: &'a Delete) {
        walk_delete(self, delete)
    }

    fn visit_procedure(&mut self, procedure: &'a Procedure) {
        walk_procedure(self, procedure)
    }

    fn visit_select(&mut self, select: &'a Select) {
        walk_select(self, select)
    }

    fn visit_select_symbol(&mut self, symbol: &'a SelectSymbol) {
        walk_select_symbol(self, symbol)
    }

    fn visit_from(&mut self, from: &'a From) {
        walk_from(self, from)
    }

    fn visit_from_item(&mut self, item: &'a FromItem) {
        walk_from_item(self, item)
    }

    fn visit_join(&mut self, join: &'a Join) {
        walk_join(self, join)
    }

    fn visit_inline_view(&mut self, view: &'a InlineView) {
        walk_inline_view(self, view)
    }

    fn visit_group(&mut self, _group: &'a Group) {}

    fn visit_group_by(&mut self, group_by: &'a GroupBy) {
        walk_group_by(self, group_by)
    }

    fn visit_order_by(&mut self, order_by: &'a OrderBy) {
        walk_order_by(self, order_by)
    }

    fn visit_order_by_item(&mut self, item: &'a OrderByItem) {
        walk_order_by_item(self, item)
    }

    fn visit_limit(&mut self, _limit: &'a Limit) {}

    fn visit_criteria(&mut self, criteria: &'a Criteria) {
        walk_criteria(self, criteria)
    }

    fn visit_expression(&mut self, expr: &'a Expression) {
        walk_expression(self, expr)
    }

    fn visit_element(&mut self, _element: &'a Element) {}

    fn visit_literal(&mut self, _literal: &'a Literal) {}

    fn visit_function(&mut self, function: &'a Function) {
        walk_function(self, function)
    }

    fn visit_aggregate(&mut self, aggregate: &'a Aggregate) {
        walk_aggregate(self, aggregate)
    }

    fn visit_case(&mut self, case: &'a SearchedCase) {
        walk_case(self, case)
    }
}

pub fn walk_command<'a, V: Visitor<'a> + ?Sized>(v: &mut V, cmd: &'a Command) {
    match cmd {
        Command::Query(q) => v.visit_query(q),
        Command::SetQuery(q) => v.visit_set_query(q),
        Command::Insert(i) => v.visit_insert(i),
        Command::Update(u) => v.visit_update(u),
        Command::Delete(d) => v.visit_delete(d),
        Command::Call(p) => v.visit_procedure(p),
    }
}

pub fn walk_query_command<'a, V: Visitor<'a> + ?Sized>(v: &mut V, cmd: &'a QueryCommand) {
    match cmd {
        QueryCommand::Query(q) => v.visit_query(q),
        QueryCommand::SetQuery(q) => v.visit_set_query(q),
    }
}

pub fn walk_query<'a, V: Visitor<'a> + ?Sized>(v: &mut V, query: &'a Query) {
    v.visit_select(&query.select);
    v.visit_from(&query.from);
    if let Some(criteria) = &query.criteria {
        v.visit_criteria(criteria);
    }
    if let Some(group_by) = &query.group_by {
        v.visit_group_by(group_by);
    }
    if let Some(having) = &query.having {
        v.visit_criteria(having);
    }
    if let Some(order_by) = &query.order_by {
        v.visit_order_by(order_by);
    }
    if let Some(limit) = &query.limit {
        v.visit_limit(limit);
    }
}

pub fn walk_set_query<'a, V: Visitor<'a> + ?Sized>(v: &mut V, set_query: &'a SetQuery) {
    v.visit_query_command(&set_query.left);
    v.visit_query_command(&set_query.right);
    if let Some(order_by) = &set_query.order_by {
        v.visit_order_by(order_by);
    }
    if let Some(limit) = &set_query.limit {
        v.visit_limit(limit);
    }
}

pub fn walk_insert<'a, V: Visitor<'a> + ?Sized>(v: &mut V, insert: &'a Insert) {
    v.visit_group(&insert.group);
    for element in &insert.elements {
        v.visit_element(element);
    }
    match &insert.source {
        InsertSource::Values(values) => {
            for value in values {
                v.visit_expression(value);
            }
        }
        InsertSource::Query(query) => v.visit_query_command(query),
    }
}

pub fn walk_update<'a, V: Visitor<'a> + ?Sized>(v: &mut V, update: &'a Update) {
    v.visit_group(&update.group);
    for change in &update.changes {
        v.visit_element(&change.element);
        v.visit_expression(&change.value);
    }
    if let Some(criteria) = &update.criteria {
        v.visit_criteria(criteria);
    }
}

pub fn walk_delete<'a, V: Visitor<'a> + ?Sized>(v: &mut V, delete: &'a Delete) {
    v.visit_group(&delete.group);
    if let Some(criteria) = &delete.criteria {
        v.visit_criteria(criteria);
    }
}

pub fn walk_procedure<'a, V: Visitor<'a> + ?Sized>(v: &mut V, procedure: &'a Procedure) {
    for parameter in &procedure.parameters {
        if let Some(expr) = &parameter.expression {
            v.visit_expression(expr);
        }
    }
}

pub fn walk_select<'a, V: Visitor<'a> + ?Sized>(v: &mut V, select: &'a Select) {
    for symbol in &select.symbols {
        v.visit_select_symbol(symbol);
    }
}

pub fn walk_select_symbol<'a, V: Visitor<'a> + ?Sized>(v: &mut V, symbol: &'a SelectSymbol) {
    v.visit_expression(&symbol.expression);
}

pub fn walk_from<'a, V: Visitor<'a> + ?Sized>(v: &mut V, from: &'a From) {
    for item in &from.items {
        v.visit_from_item(item);
    }
}

pub fn walk_from_item<'a, V: Visitor<'a> + ?Sized>(v: &mut V, item: &'a FromItem) {
    match item {
        FromItem::Group(group) => v.visit_group(group),
        FromItem::Join(join) => v.visit_join(join),
        FromItem::InlineView(view) => v.visit_inline_view(view),
    }
}

pub fn walk_join<'a, V: Visitor<'a> + ?Sized>(v: &mut V, join: &'a Join) {
    v.visit_from_item(&join.left);
    v.visit_from_item(&join.right);
    for criteria in &join.criteria {
        v.visit_criteria(criteria);
    }
}

pub fn walk_inline_view<'a, V: Visitor<'a> + ?Sized>(v: &mut V, view: &'a InlineView) {
    v.visit_group(&view.group);
    v.visit_query_command(&view.query);
}

pub fn walk_group_by<'a, V: Visitor<'a> + ?Sized>(v: &mut V, group_by: &'a GroupBy) {
    for expr in &group_by.expressions {
        v.visit_expression(expr);
    }
}

pub fn walk_order_by<'a, V: Visitor<'a> + ?Sized>(v: &mut V, order_by: &'a OrderBy) {
    for item in &order_by.items {
        v.visit_order_by_item(item);
    }
}

pub fn walk_order_by_item<'a, V: Visitor<'a> + ?Sized>(v: &mut V, item: &'a OrderByItem) {
    if let Some(element) = &item.element {
        v.visit_element(element);
    }
}

pub fn walk_criteria<'a, V: Visitor<'a> + ?Sized>(v: &mut V, criteria: &'a Criteria) {
    match criteria {
        Criteria::Compare(c) => {
            v.visit_expression(&c.left);
            v.visit_expression(&c.right);
        }
        Criteria::Compound(c) => {
            for branch in c.branches() {
                v.visit_criteria(branch);
            }
        }
        Criteria::Like(c) => {
            v.visit_expression(&c.left);
            v.visit_expression(&c.right);
        }
        Criteria::In(c) => {
            v.visit_expression(&c.left);
            for value in &c.values {
                v.visit_expression(value);
            }
        }
        Criteria::SubqueryIn(c) => {
            v.visit_expression(&c.left);
            v.visit_query_command(&c.query);
        }
        Criteria::IsNull(c) => v.visit_expression(&c.expr),
        Criteria::Exists(c) => v.visit_query_command(&c.query),
        Criteria::SubqueryCompare(c) => {
            v.visit_expression(&c.left);
            v.visit_query_command(&c.query);
        }
        Criteria::Not(inner) => v.visit_criteria(inner),
    }
}

pub fn walk_expression<'a, V: Visitor<'a> + ?Sized>(v: &mut V, expr: &'a Expression) {
    match expr {
        Expression::Element(e) => v.visit_element(e),
        Expression::Literal(l) => v.visit_literal(l),
        Expression::Function(f) => v.visit_function(f),
        Expression::Aggregate(a) => v.visit_aggregate(a),
        Expression::Case(c) => v.visit_case(c),
        Expression::ScalarSubquery(q) => v.visit_query(q),
    }
}

pub fn walk_function<'a, V: Visitor<'a> + ?Sized>(v: &mut V, function: &'a Function) {
    for arg in &function.args {
        v.visit_expression(arg);
    }
}

pub fn walk_aggregate<'a, V: Visitor<'a> + ?Sized>(v: &mut V, aggregate: &'a Aggregate) {
    if let Some(expr) = aggregate.expression() {
        v.visit_expression(expr);
    }
}

pub fn walk_case<'a, V: Visitor<'a> + ?Sized>(v: &mut V, case: &'a SearchedCase) {
    for (when, then) in &case.whens {
        v.visit_criteria(when);
        v.visit_expression(then);
    }
    if let Some(otherwise) = &case.otherwise {
        v.visit_expression(otherwise);
    }
}

struct ElementCollector<'a> {
    elements: Vec<&'a Element>,
}

impl<'a> Visitor<'a> for ElementCollector<'a> {
    fn visit_element(&mut self, element: &'a Element) {
        self.elements.push(element);
    }
}

/// Collect every element reachable from `cmd`, in traversal order.
pub fn collect_elements(cmd: &Command) -> Vec<&Element> {
    let mut collector = ElementCollector { elements: Vec::new() };
    collector.visit_command(cmd);
    collector.elements
}

/// The distinct set of groups referenced by any element reachable from
/// `cmd`. Deduplicated by group identity (`Arc::ptr_eq`), not by name: two
/// aliased references to the same table are distinct groups unless they
/// share the same node.
pub fn collect_groups_used_by_elements(cmd: &Command) -> Vec<Arc<Group>> {
    let mut groups: Vec<Arc<Group>> = Vec::new();
    for element in collect_elements(cmd) {
        if !groups.iter().any(|g| Arc::ptr_eq(g, &element.group)) {
            groups.push(Arc::clone(&element.group));
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CompareOp, Criteria, DataType, Select, SelectSymbol};

    fn two_group_query() -> (Command, Arc<Group>, Arc<Group>) {
        let orders = Group::named("orders");
        let customers = Group::aliased("customers", "c");
        let order_id = Element::new(Arc::clone(&orders), "orders.id", DataType::Integer);
        let customer_id = Element::new(Arc::clone(&customers), "customers.id", DataType::Integer);
        let query = Query::new(
            Select::new(vec![
                SelectSymbol::new(Expression::Element(order_id.clone())),
                SelectSymbol::new(Expression::Element(customer_id.clone())),
            ]),
            From::new(vec![
                FromItem::Group(Arc::clone(&orders)),
                FromItem::Group(Arc::clone(&customers)),
            ]),
        )
        .with_where(Criteria::compare(
            Expression::Element(order_id),
            CompareOp::Eq,
            Expression::Element(customer_id),
        ));
        (Command::Query(query), orders, customers)
    }

    #[test]
    fn test_collect_elements_in_traversal_order() {
        let (cmd, _, _) = two_group_query();
        let elements = collect_elements(&cmd);
        let names: Vec<&str> = elements.iter().map(|e| e.short_name()).collect();
        // select list first, then the where clause
        assert_eq!(names, vec!["id", "id", "id", "id"]);
        assert_eq!(elements.len(), 4);
    }

    #[test]
    fn test_groups_used_by_elements_dedups_by_identity() {
        let (cmd, orders, customers) = two_group_query();
        let groups = collect_groups_used_by_elements(&cmd);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().any(|g| Arc::ptr_eq(g, &orders)));
        assert!(groups.iter().any(|g| Arc::ptr_eq(g, &customers)));
    }

    #[test]
    fn test_same_table_aliased_twice_stays_distinct() {
        let a = Group::aliased("parts", "a");
        let b = Group::aliased("parts", "b");
        let query = Query::new(
            Select::new(vec![
                SelectSymbol::new(Expression::Element(Element::new(
                    Arc::clone(&a),
                    "parts.id",
                    DataType::Integer,
                ))),
                SelectSymbol::new(Expression::Element(Element::new(
                    Arc::clone(&b),
                    "parts.id",
                    DataType::Integer,
                ))),
            ]),
            From::new(vec![FromItem::Group(a), FromItem::Group(b)]),
        );
        let groups = collect_groups_used_by_elements(&Command::Query(query));
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_element_to_group_mapping_matches_group_collection() {
        let (cmd, _, _) = two_group_query();
        let via_elements: Vec<Arc<Group>> = collect_groups_used_by_elements(&cmd);
        let mut mapped: Vec<Arc<Group>> = Vec::new();
        for e in collect_elements(&cmd) {
            if !mapped.iter().any(|g| Arc::ptr_eq(g, &e.group)) {
                mapped.push(Arc::clone(&e.group));
            }
        }
        assert_eq!(via_elements.len(), mapped.len());
        for g in &mapped {
            assert!(via_elements.iter().any(|h| Arc::ptr_eq(g, h)));
        }
    }
}
