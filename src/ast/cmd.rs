use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{
    Criteria, Element, Expression, From, GroupBy, Group, Limit, OrderBy, ParamDirection, Select,
    SetOp,
};
use crate::types::DataType;

/// A complete relational command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Query(Query),
    SetQuery(SetQuery),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Call(Procedure),
}

impl Command {
    /// JSON form of the tree, for plan inspection and diagnostics.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Command> {
        serde_json::from_str(json)
    }
}

impl std::convert::From<Query> for Command {
    fn from(q: Query) -> Self {
        Command::Query(q)
    }
}

impl std::convert::From<SetQuery> for Command {
    fn from(q: SetQuery) -> Self {
        Command::SetQuery(q)
    }
}

/// A command that produces rows: either a plain query or a set operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryCommand {
    Query(Box<Query>),
    SetQuery(Box<SetQuery>),
}

impl std::convert::From<Query> for QueryCommand {
    fn from(q: Query) -> Self {
        QueryCommand::Query(Box::new(q))
    }
}

impl std::convert::From<SetQuery> for QueryCommand {
    fn from(q: SetQuery) -> Self {
        QueryCommand::SetQuery(Box::new(q))
    }
}

/// A SELECT command. The select and from clauses are required; everything
/// else is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub select: Select,
    pub from: From,
    pub criteria: Option<Criteria>,
    pub group_by: Option<GroupBy>,
    pub having: Option<Criteria>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<Limit>,
}

impl Query {
    pub fn new(select: Select, from: From) -> Self {
        Self {
            select,
            from,
            criteria: None,
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn with_where(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn with_having(mut self, having: Criteria) -> Self {
        self.having = Some(having);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// UNION/INTERSECT/EXCEPT of two query commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetQuery {
    pub op: SetOp,
    pub all: bool,
    pub left: QueryCommand,
    pub right: QueryCommand,
    pub order_by: Option<OrderBy>,
    pub limit: Option<Limit>,
}

impl SetQuery {
    pub fn new(op: SetOp, all: bool, left: QueryCommand, right: QueryCommand) -> Self {
        Self {
            op,
            all,
            left,
            right,
            order_by: None,
            limit: None,
        }
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// An INSERT command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub group: Arc<Group>,
    pub elements: Vec<Element>,
    pub source: InsertSource,
}

/// Value source of an INSERT: a literal-expression row or a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    Values(Vec<Expression>),
    Query(QueryCommand),
}

/// An UPDATE command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub group: Arc<Group>,
    pub changes: Vec<SetClause>,
    pub criteria: Option<Criteria>,
}

/// One `element = value` assignment of an UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetClause {
    pub element: Element,
    pub value: Expression,
}

/// A DELETE command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub group: Arc<Group>,
    pub criteria: Option<Criteria>,
}

/// A stored-procedure call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

/// One procedure parameter. Only IN/INOUT parameters carry an argument
/// expression at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub direction: ParamDirection,
    pub expression: Option<Expression>,
    pub data_type: DataType,
}
