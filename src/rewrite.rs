//! Capability-driven tree rewrites.
//!
//! A serialized pass run before generation. Each rule is a pure
//! tree-to-tree transform keyed on the dialect's capability flags; rewrites
//! build new nodes and never mutate a tree in place. Constructs the dialect
//! cannot express and this pass cannot restructure come back as typed
//! errors, so no invalid SQL ever reaches a data source.

use crate::ast::{
    Aggregate, Command, CompareOp, CompoundCriteria, Criteria, Delete, ExistsCriteria, Expression,
    From, FromItem, Function, InCriteria, InlineView, Insert, InsertSource, IsNullCriteria, Join,
    JoinKind, GroupBy, LikeCriteria, Literal, Procedure, Query, QueryCommand, SearchedCase,
    Select, SelectSymbol, SetClause, SetQuery, SubqueryCompareCriteria, SubqueryInCriteria,
    Update,
};
use crate::dialect::DialectConfig;
use crate::error::{LanguageError, LanguageResult};
use crate::types::DataType;

/// Restructure a command tree for a target dialect. Returns a new tree; the
/// input is consumed.
pub fn rewrite_for_dialect(cmd: Command, config: &DialectConfig) -> LanguageResult<Command> {
    tracing::trace!(dialect = config.name, "rewriting command tree");
    Ok(match cmd {
        Command::Query(q) => Command::Query(rewrite_query(q, config)?),
        Command::SetQuery(q) => Command::SetQuery(rewrite_set_query(q, config)?),
        Command::Insert(i) => Command::Insert(rewrite_insert(i, config)?),
        Command::Update(u) => Command::Update(rewrite_update(u, config)?),
        Command::Delete(d) => Command::Delete(rewrite_delete(d, config)?),
        Command::Call(p) => Command::Call(rewrite_procedure(p, config)?),
    })
}

fn rewrite_query(query: Query, config: &DialectConfig) -> LanguageResult<Query> {
    let mut symbols = Vec::with_capacity(query.select.symbols.len());
    for symbol in query.select.symbols {
        let expression = rewrite_expression(symbol.expression, config)?;
        let expression = if !config.native_boolean {
            coerce_boolean(expression)
        } else {
            expression
        };
        symbols.push(SelectSymbol {
            expression,
            alias: symbol.alias,
        });
    }
    let mut items = Vec::with_capacity(query.from.items.len());
    for item in query.from.items {
        items.push(rewrite_from_item(item, config)?);
    }
    Ok(Query {
        select: Select {
            distinct: query.select.distinct,
            symbols,
        },
        from: From::new(items),
        criteria: query
            .criteria
            .map(|c| rewrite_criteria(c, config))
            .transpose()?,
        group_by: query
            .group_by
            .map(|g| rewrite_group_by(g, config))
            .transpose()?,
        having: query
            .having
            .map(|c| rewrite_criteria(c, config))
            .transpose()?,
        order_by: query.order_by,
        limit: query.limit,
    })
}

fn rewrite_set_query(set_query: SetQuery, config: &DialectConfig) -> LanguageResult<SetQuery> {
    Ok(SetQuery {
        op: set_query.op,
        all: set_query.all,
        left: rewrite_query_command(set_query.left, config)?,
        right: rewrite_query_command(set_query.right, config)?,
        order_by: set_query.order_by,
        limit: set_query.limit,
    })
}

fn rewrite_query_command(
    cmd: QueryCommand,
    config: &DialectConfig,
) -> LanguageResult<QueryCommand> {
    Ok(match cmd {
        QueryCommand::Query(q) => QueryCommand::Query(Box::new(rewrite_query(*q, config)?)),
        QueryCommand::SetQuery(q) => {
            QueryCommand::SetQuery(Box::new(rewrite_set_query(*q, config)?))
        }
    })
}

fn rewrite_insert(insert: Insert, config: &DialectConfig) -> LanguageResult<Insert> {
    let source = match insert.source {
        InsertSource::Values(values) => {
            let mut rewritten = Vec::with_capacity(values.len());
            for value in values {
                rewritten.push(rewrite_expression(value, config)?);
            }
            InsertSource::Values(rewritten)
        }
        InsertSource::Query(query) => InsertSource::Query(rewrite_query_command(query, config)?),
    };
    Ok(Insert {
        group: insert.group,
        elements: insert.elements,
        source,
    })
}

fn rewrite_update(update: Update, config: &DialectConfig) -> LanguageResult<Update> {
    let mut changes = Vec::with_capacity(update.changes.len());
    for change in update.changes {
        changes.push(SetClause {
            element: change.element,
            value: rewrite_expression(change.value, config)?,
        });
    }
    Ok(Update {
        group: update.group,
        changes,
        criteria: update
            .criteria
            .map(|c| rewrite_criteria(c, config))
            .transpose()?,
    })
}

fn rewrite_delete(delete: Delete, config: &DialectConfig) -> LanguageResult<Delete> {
    Ok(Delete {
        group: delete.group,
        criteria: delete
            .criteria
            .map(|c| rewrite_criteria(c, config))
            .transpose()?,
    })
}

fn rewrite_procedure(
    mut procedure: Procedure,
    config: &DialectConfig,
) -> LanguageResult<Procedure> {
    for parameter in &mut procedure.parameters {
        if let Some(expr) = parameter.expression.take() {
            parameter.expression = Some(rewrite_expression(expr, config)?);
        }
    }
    Ok(procedure)
}

fn rewrite_group_by(group_by: GroupBy, config: &DialectConfig) -> LanguageResult<GroupBy> {
    let mut expressions = Vec::with_capacity(group_by.expressions.len());
    for expr in group_by.expressions {
        expressions.push(rewrite_expression(expr, config)?);
    }
    Ok(GroupBy { expressions })
}

fn rewrite_from_item(item: FromItem, config: &DialectConfig) -> LanguageResult<FromItem> {
    Ok(match item {
        FromItem::Group(group) => FromItem::Group(group),
        FromItem::Join(join) => FromItem::Join(Box::new(rewrite_join(*join, config)?)),
        FromItem::InlineView(view) => FromItem::InlineView(Box::new(InlineView {
            group: view.group,
            query: rewrite_query_command(view.query, config)?,
            output: view.output,
        })),
    })
}

fn rewrite_join(join: Join, config: &DialectConfig) -> LanguageResult<Join> {
    if join.kind == JoinKind::FullOuter && !config.supports_full_outer_join {
        return Err(LanguageError::unsupported(config.name, "FULL OUTER JOIN"));
    }
    let left = rewrite_from_item(join.left, config)?;
    let right = rewrite_from_item(join.right, config)?;
    let mut criteria = Vec::with_capacity(join.criteria.len());
    for c in join.criteria {
        criteria.push(rewrite_criteria(c, config)?);
    }
    if join.kind == JoinKind::RightOuter && !config.supports_right_outer_join {
        // A RIGHT OUTER is a LEFT OUTER with the operands swapped; the
        // ON-criteria are direction-independent.
        tracing::debug!(dialect = config.name, "flipping RIGHT OUTER JOIN");
        return Ok(Join::new(right, left, JoinKind::LeftOuter, criteria));
    }
    Ok(Join::new(left, right, join.kind, criteria))
}

fn rewrite_criteria(criteria: Criteria, config: &DialectConfig) -> LanguageResult<Criteria> {
    Ok(match criteria {
        Criteria::Compare(c) => Criteria::compare(
            rewrite_expression(c.left, config)?,
            c.op,
            rewrite_expression(c.right, config)?,
        ),
        Criteria::Compound(c) => {
            let (op, branches) = c.into_parts();
            let mut rewritten = Vec::with_capacity(branches.len());
            for branch in branches {
                rewritten.push(rewrite_criteria(branch, config)?);
            }
            Criteria::Compound(CompoundCriteria::new(op, rewritten))
        }
        Criteria::Like(c) => {
            if c.escape.is_some() && !config.supports_like_escape {
                return Err(LanguageError::unsupported(config.name, "LIKE ... ESCAPE"));
            }
            Criteria::Like(LikeCriteria {
                left: rewrite_expression(c.left, config)?,
                right: rewrite_expression(c.right, config)?,
                escape: c.escape,
                negated: c.negated,
            })
        }
        Criteria::In(c) => {
            let mut values = Vec::with_capacity(c.values.len());
            for value in c.values {
                values.push(rewrite_expression(value, config)?);
            }
            Criteria::In(InCriteria {
                left: rewrite_expression(c.left, config)?,
                values,
                negated: c.negated,
            })
        }
        Criteria::SubqueryIn(c) => Criteria::SubqueryIn(SubqueryInCriteria {
            left: rewrite_expression(c.left, config)?,
            query: rewrite_query_command(c.query, config)?,
            negated: c.negated,
        }),
        Criteria::IsNull(c) => Criteria::IsNull(IsNullCriteria {
            expr: rewrite_expression(c.expr, config)?,
            negated: c.negated,
        }),
        Criteria::Exists(c) => Criteria::Exists(ExistsCriteria {
            query: rewrite_query_command(c.query, config)?,
        }),
        Criteria::SubqueryCompare(c) => {
            if !config.supports_quantified_subquery {
                // no generic decomposition exists; the dialect layer owns
                // any NOT EXISTS/aggregate strategy
                return Err(LanguageError::unsupported(
                    config.name,
                    format!("quantified subquery ({})", c.quantifier.keyword()),
                ));
            }
            Criteria::SubqueryCompare(SubqueryCompareCriteria {
                left: rewrite_expression(c.left, config)?,
                op: c.op,
                quantifier: c.quantifier,
                query: rewrite_query_command(c.query, config)?,
            })
        }
        Criteria::Not(inner) => Criteria::Not(Box::new(rewrite_criteria(*inner, config)?)),
    })
}

fn rewrite_expression(expr: Expression, config: &DialectConfig) -> LanguageResult<Expression> {
    Ok(match expr {
        Expression::Element(e) => Expression::Element(e),
        Expression::Literal(l) => Expression::Literal(l),
        Expression::Function(f) => rewrite_function(f, config)?,
        Expression::Aggregate(a) => {
            let (func, distinct, inner) = a.into_parts();
            match inner {
                Some(inner) => Expression::Aggregate(Aggregate::new(
                    func,
                    distinct,
                    rewrite_expression(inner, config)?,
                )),
                None => Expression::Aggregate(Aggregate::count_star()),
            }
        }
        Expression::Case(c) => {
            let mut whens = Vec::with_capacity(c.whens.len());
            for (when, then) in c.whens {
                whens.push((
                    rewrite_criteria(when, config)?,
                    rewrite_expression(then, config)?,
                ));
            }
            let otherwise = c
                .otherwise
                .map(|o| rewrite_expression(*o, config))
                .transpose()?;
            Expression::Case(SearchedCase::new(whens, otherwise, c.data_type))
        }
        Expression::ScalarSubquery(q) => {
            Expression::ScalarSubquery(Box::new(rewrite_query(*q, config)?))
        }
    })
}

/// Map CONVERT/CAST target-type names through the dialect. The second
/// argument holds the canonical type name as a string literal; unmappable
/// types are a hard error, unknown names pass through untouched (already
/// dialect-specific).
fn rewrite_function(function: Function, config: &DialectConfig) -> LanguageResult<Expression> {
    let is_cast = function.name.eq_ignore_ascii_case("convert")
        || function.name.eq_ignore_ascii_case("cast");
    let mut args = Vec::with_capacity(function.args.len());
    for arg in function.args {
        args.push(rewrite_expression(arg, config)?);
    }
    if is_cast {
        if let Some(Expression::Literal(type_literal)) = args.get(1) {
            if let Some(crate::ast::Value::String(type_name)) = type_literal.value() {
                if let Some(data_type) = DataType::from_type_name(type_name) {
                    let Some(mapped) = (config.cast_type_name)(data_type) else {
                        return Err(LanguageError::TypeMapping {
                            dialect: config.name,
                            data_type,
                        });
                    };
                    args[1] = Expression::Literal(Literal::new(mapped, DataType::String));
                }
            }
        }
    }
    Ok(Expression::Function(Function::new(
        function.name,
        args,
        function.data_type,
    )))
}

/// Expand a boolean-typed value into the CASE idiom for dialects with no
/// native boolean type.
fn coerce_boolean(expr: Expression) -> Expression {
    if expr.data_type() != Some(DataType::Boolean) {
        return expr;
    }
    if matches!(expr, Expression::Case(_)) {
        return expr;
    }
    tracing::debug!("coercing boolean expression through CASE");
    let zero = Expression::Literal(Literal::new(0, DataType::Integer));
    let when_zero = Criteria::compare(expr.clone(), CompareOp::Eq, zero);
    let when_not_null = Criteria::IsNull(IsNullCriteria {
        expr,
        negated: true,
    });
    Expression::Case(SearchedCase::new(
        vec![
            (
                when_zero,
                Expression::Literal(Literal::new("0", DataType::String)),
            ),
            (
                when_not_null,
                Expression::Literal(Literal::new("1", DataType::String)),
            ),
        ],
        None,
        DataType::String,
    ))
}
