//! SQL generation engine.
//!
//! Serializes one command tree into one SQL string. A [`SqlWriter`] owns an
//! append-only buffer and is single-use: one tree, one call, one string.
//! Dialect variation comes entirely from the [`DialectConfig`] passed in;
//! structural capability gaps are handled up front by [`crate::rewrite`].

mod expr;
mod criteria;

#[cfg(test)]
mod tests;

use crate::ast::{
    Command, Delete, From, FromItem, Group, GroupBy, Insert, InsertSource, Join, JoinKind, Limit,
    OrderBy, OrderByItem, Procedure, ParamDirection, Query, QueryCommand, SetQuery, Select,
    SelectSymbol, SortOrder, Update,
};
use crate::dialect::{DialectConfig, LimitSyntax};
use crate::error::LanguageResult;
use crate::metadata::Catalog;

/// Sentinel emitted for structurally absent pieces of a tree, so partial or
/// hand-assembled plans still produce inspectable output.
pub const UNDEFINED: &str = "<undefined>";

/// Render one command tree to SQL text.
///
/// This is the single entry point of the engine. Rendering the same tree
/// with the same configuration twice yields byte-identical text.
pub fn render(
    cmd: &Command,
    config: &DialectConfig,
    catalog: Option<&dyn Catalog>,
) -> LanguageResult<String> {
    tracing::trace!(dialect = config.name, "rendering command tree");
    let mut writer = SqlWriter::new(config, catalog);
    writer.append_command(cmd)?;
    Ok(writer.into_sql())
}

/// Stateful tree-to-text visitor. Not reusable across trees and not
/// shareable across threads; create one per render.
pub struct SqlWriter<'a> {
    buf: String,
    config: &'a DialectConfig,
    catalog: Option<&'a dyn Catalog>,
}

impl<'a> SqlWriter<'a> {
    pub fn new(config: &'a DialectConfig, catalog: Option<&'a dyn Catalog>) -> Self {
        Self {
            buf: String::new(),
            config,
            catalog,
        }
    }

    pub fn into_sql(self) -> String {
        self.buf
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    pub fn append_command(&mut self, cmd: &Command) -> LanguageResult<()> {
        if let Some(comment) = &self.config.source_comment {
            let prefix = format!("/* {} */ ", comment);
            self.push(&prefix);
        }
        match cmd {
            Command::Query(q) => self.append_query(q),
            Command::SetQuery(q) => self.append_set_query(q),
            Command::Insert(i) => self.append_insert(i),
            Command::Update(u) => self.append_update(u),
            Command::Delete(d) => self.append_delete(d),
            Command::Call(p) => self.append_call(p),
        }
    }

    pub(crate) fn append_query_command(&mut self, cmd: &QueryCommand) -> LanguageResult<()> {
        match cmd {
            QueryCommand::Query(q) => self.append_query(q),
            QueryCommand::SetQuery(q) => self.append_set_query(q),
        }
    }

    pub(crate) fn append_query(&mut self, query: &Query) -> LanguageResult<()> {
        self.append_select(&query.select)?;
        self.append_from(&query.from)?;
        if let Some(criteria) = &query.criteria {
            self.push(" WHERE ");
            self.append_criteria(criteria)?;
        }
        if let Some(group_by) = &query.group_by {
            self.append_group_by(group_by)?;
        }
        if let Some(having) = &query.having {
            self.push(" HAVING ");
            self.append_criteria(having)?;
        }
        if let Some(order_by) = &query.order_by {
            self.append_order_by(order_by);
        }
        if let Some(limit) = &query.limit {
            self.append_limit(limit);
        }
        Ok(())
    }

    fn append_set_query(&mut self, set_query: &SetQuery) -> LanguageResult<()> {
        self.append_set_operand(&set_query.left)?;
        self.push(" ");
        self.push(set_query.op.keyword());
        if set_query.all {
            self.push(" ALL");
        }
        self.push(" ");
        self.append_set_operand(&set_query.right)?;
        if let Some(order_by) = &set_query.order_by {
            self.append_order_by(order_by);
        }
        if let Some(limit) = &set_query.limit {
            self.append_limit(limit);
        }
        Ok(())
    }

    /// A set-query operand is parenthesized when it is itself a set query,
    /// or always when the dialect asks for it.
    fn append_set_operand(&mut self, operand: &QueryCommand) -> LanguageResult<()> {
        let parens = self.config.parenthesize_set_operands
            || matches!(operand, QueryCommand::SetQuery(_));
        if parens {
            self.push("(");
        }
        self.append_query_command(operand)?;
        if parens {
            self.push(")");
        }
        Ok(())
    }

    fn append_select(&mut self, select: &Select) -> LanguageResult<()> {
        self.push("SELECT ");
        if select.distinct {
            self.push("DISTINCT ");
        }
        for (i, symbol) in select.symbols.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.append_select_symbol(symbol)?;
        }
        Ok(())
    }

    fn append_select_symbol(&mut self, symbol: &SelectSymbol) -> LanguageResult<()> {
        self.append_expression(&symbol.expression)?;
        if let Some(alias) = &symbol.alias {
            self.push(" AS ");
            self.push(alias);
        }
        Ok(())
    }

    fn append_from(&mut self, from: &From) -> LanguageResult<()> {
        self.push(" FROM ");
        for (i, item) in from.items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.append_from_item(item)?;
        }
        Ok(())
    }

    fn append_from_item(&mut self, item: &FromItem) -> LanguageResult<()> {
        match item {
            FromItem::Group(group) => {
                self.append_group_reference(group);
                Ok(())
            }
            FromItem::Join(join) => self.append_join(join),
            FromItem::InlineView(view) => {
                self.push("(");
                match &view.output {
                    Some(rendered) => self.push(rendered),
                    None => self.append_query_command(&view.query)?,
                }
                self.push(")");
                // an inline view always needs its context name attached
                self.push(if self.config.group_alias_uses_as { " AS " } else { " " });
                self.push(&view.group.context);
                Ok(())
            }
        }
    }

    fn append_join(&mut self, join: &Join) -> LanguageResult<()> {
        // left-associative; the left side is wrapped only on dialect request
        self.append_join_operand(&join.left, self.config.parenthesize_joins)?;
        self.push(" ");
        self.push(join.kind.keyword());
        self.push(" JOIN ");
        // a cross join on the right is always ambiguous without parens
        let right_is_cross = matches!(
            &join.right,
            FromItem::Join(inner) if inner.kind == JoinKind::Cross
        );
        self.append_join_operand(&join.right, self.config.parenthesize_joins || right_is_cross)?;
        if join.kind != JoinKind::Cross {
            self.push(" ON ");
            if join.criteria.is_empty() {
                self.push(UNDEFINED);
            } else {
                self.append_on_criteria(&join.criteria)?;
            }
        }
        Ok(())
    }

    fn append_join_operand(&mut self, item: &FromItem, parenthesize: bool) -> LanguageResult<()> {
        let nested_join = matches!(item, FromItem::Join(_));
        if nested_join && parenthesize {
            self.push("(");
        }
        self.append_from_item(item)?;
        if nested_join && parenthesize {
            self.push(")");
        }
        Ok(())
    }

    /// Group reference in FROM position: native name when cataloged, else
    /// the original definition, else the context name; aliased groups get
    /// their context appended.
    pub(crate) fn append_group_reference(&mut self, group: &Group) {
        let native = self
            .catalog
            .and_then(|c| c.group_native_name(group).ok().flatten());
        let base = native
            .or_else(|| group.definition.clone())
            .unwrap_or_else(|| group.context.clone());
        self.push(&base);
        self.append_group_alias(group);
    }

    fn append_group_alias(&mut self, group: &Group) {
        if group.is_aliased() {
            self.push(if self.config.group_alias_uses_as { " AS " } else { " " });
            self.push(&group.context);
        }
    }

    /// Group name without any alias, for INSERT targets.
    fn append_group_base_name(&mut self, group: &Group) {
        let native = self
            .catalog
            .and_then(|c| c.group_native_name(group).ok().flatten());
        let base = native
            .or_else(|| group.definition.clone())
            .unwrap_or_else(|| group.context.clone());
        self.push(&base);
    }

    fn append_group_by(&mut self, group_by: &GroupBy) -> LanguageResult<()> {
        self.push(" GROUP BY ");
        for (i, expr) in group_by.expressions.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.append_expression(expr)?;
        }
        Ok(())
    }

    fn append_order_by(&mut self, order_by: &OrderBy) {
        self.push(" ORDER BY ");
        for (i, item) in order_by.items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.append_order_by_item(item);
        }
    }

    /// The output-column name wins over the element reference; ascending is
    /// the default and is never printed.
    fn append_order_by_item(&mut self, item: &OrderByItem) {
        if let Some(name) = &item.name {
            let short = name.rsplit('.').next().unwrap_or(name).to_string();
            self.push(&short);
        } else if let Some(element) = &item.element {
            self.append_element(element);
        } else {
            self.push(UNDEFINED);
        }
        if item.direction == SortOrder::Desc {
            self.push(" DESC");
        }
    }

    fn append_limit(&mut self, limit: &Limit) {
        let text = if limit.offset > 0 {
            match self.config.limit_syntax {
                LimitSyntax::CommaForm => format!(" LIMIT {}, {}", limit.offset, limit.row_limit),
                LimitSyntax::OffsetForm => {
                    format!(" LIMIT {} OFFSET {}", limit.row_limit, limit.offset)
                }
            }
        } else {
            format!(" LIMIT {}", limit.row_limit)
        };
        self.push(&text);
    }

    fn append_insert(&mut self, insert: &Insert) -> LanguageResult<()> {
        self.push("INSERT INTO ");
        self.append_group_base_name(&insert.group);
        if !insert.elements.is_empty() {
            self.push(" (");
            for (i, element) in insert.elements.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                let name = self.element_unqualified_name(element);
                self.push(&name);
            }
            self.push(")");
        }
        match &insert.source {
            InsertSource::Values(values) => {
                self.push(" VALUES (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.append_expression(value)?;
                }
                self.push(")");
                Ok(())
            }
            InsertSource::Query(query) => {
                self.push(" ");
                self.append_query_command(query)
            }
        }
    }

    fn append_update(&mut self, update: &Update) -> LanguageResult<()> {
        self.push("UPDATE ");
        self.append_group_reference(&update.group);
        self.push(" SET ");
        for (i, change) in update.changes.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            let name = self.element_unqualified_name(&change.element);
            self.push(&name);
            self.push(" = ");
            self.append_expression(&change.value)?;
        }
        if let Some(criteria) = &update.criteria {
            self.push(" WHERE ");
            self.append_criteria(criteria)?;
        }
        Ok(())
    }

    fn append_delete(&mut self, delete: &Delete) -> LanguageResult<()> {
        self.push("DELETE FROM ");
        self.append_group_reference(&delete.group);
        if let Some(criteria) = &delete.criteria {
            self.push(" WHERE ");
            self.append_criteria(criteria)?;
        }
        Ok(())
    }

    /// Procedure calls render their IN/INOUT arguments only.
    fn append_call(&mut self, procedure: &Procedure) -> LanguageResult<()> {
        self.push("EXEC ");
        let native = self
            .catalog
            .and_then(|c| c.procedure_native_name(procedure).ok().flatten());
        let name = native.unwrap_or_else(|| procedure.name.clone());
        self.push(&name);
        self.push("(");
        let mut first = true;
        for parameter in &procedure.parameters {
            let callable = matches!(
                parameter.direction,
                ParamDirection::In | ParamDirection::InOut
            );
            if !callable {
                continue;
            }
            if !first {
                self.push(", ");
            }
            first = false;
            match &parameter.expression {
                Some(expr) => self.append_expression(expr)?,
                None => self.push(UNDEFINED),
            }
        }
        self.push(")");
        Ok(())
    }
}
