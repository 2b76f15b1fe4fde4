//! SQL generation tests.

mod dialects;
mod rewrites;

use std::sync::Arc;

use crate::ast::*;
use crate::dialect::DialectConfig;
use crate::generator::render;

pub(crate) fn col(group: &Arc<Group>, name: &str) -> Expression {
    Expression::Element(Element::new(Arc::clone(group), name, DataType::Integer))
}

pub(crate) fn col_typed(group: &Arc<Group>, name: &str, data_type: DataType) -> Expression {
    Expression::Element(Element::new(Arc::clone(group), name, data_type))
}

pub(crate) fn int(n: i64) -> Expression {
    Expression::Literal(Literal::new(n, DataType::Integer))
}

pub(crate) fn text(s: &str) -> Expression {
    Expression::Literal(Literal::new(s, DataType::String))
}

/// `SELECT <cols> FROM <table>`
pub(crate) fn select_query(table: &str, cols: &[&str]) -> (Query, Arc<Group>) {
    let group = Group::named(table);
    let symbols = cols
        .iter()
        .map(|c| SelectSymbol::new(col(&group, c)))
        .collect();
    let query = Query::new(Select::new(symbols), From::group(Arc::clone(&group)));
    (query, group)
}

pub(crate) fn render_generic(cmd: &Command) -> String {
    render(cmd, &DialectConfig::generic(), None).unwrap()
}
