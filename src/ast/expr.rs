use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ast::{AggregateFunc, Criteria, Group, Query};
use crate::types::DataType;

/// A general expression node (column reference, literal, function, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// A column reference
    Element(Element),
    /// A typed constant or bind value
    Literal(Literal),
    /// A scalar function call
    Function(Function),
    /// An aggregate function
    Aggregate(Aggregate),
    /// A searched CASE expression
    Case(SearchedCase),
    /// A scalar subquery
    ScalarSubquery(Box<Query>),
}

impl Expression {
    /// Static type of this expression, when the node carries one.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Expression::Element(e) => Some(e.data_type),
            Expression::Literal(l) => Some(l.data_type()),
            Expression::Function(f) => Some(f.data_type),
            Expression::Case(c) => Some(c.data_type),
            Expression::Aggregate(_) | Expression::ScalarSubquery(_) => None,
        }
    }
}

/// A column reference. Holds a non-owning back-reference to the group it
/// belongs to; the `Arc` identity, not the name, identifies the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Owning group (shared reference, never an ownership edge)
    pub group: Arc<Group>,
    /// Symbolic name, possibly dotted (`schema.table.col`)
    pub name: String,
    pub data_type: DataType,
}

impl Element {
    pub fn new(group: Arc<Group>, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            group,
            name: name.into(),
            data_type,
        }
    }

    /// The segment after the last dot of the symbolic name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Typed constant payloads for literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Uuid(Uuid),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

/// A typed literal. The value is absent only for a typed NULL; bind values
/// always carry the value they will be bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    value: Option<Value>,
    data_type: DataType,
    bind_value: bool,
    multi_valued: bool,
}

impl Literal {
    /// A constant of the given type.
    pub fn new(value: impl Into<Value>, data_type: DataType) -> Self {
        Self {
            value: Some(value.into()),
            data_type,
            bind_value: false,
            multi_valued: false,
        }
    }

    /// A typed NULL.
    pub fn null(data_type: DataType) -> Self {
        Self {
            value: None,
            data_type,
            bind_value: false,
            multi_valued: false,
        }
    }

    /// A bind value; renders as the dialect's placeholder token.
    pub fn bind(value: impl Into<Value>, data_type: DataType) -> Self {
        Self {
            value: Some(value.into()),
            data_type,
            bind_value: true,
            multi_valued: false,
        }
    }

    /// Mark this literal as standing in for a list of values (bulk binds).
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_bind_value(&self) -> bool {
        self.bind_value
    }

    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }
}

/// A scalar function call with an ordered argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub args: Vec<Expression>,
    /// Result type
    pub data_type: DataType,
}

impl Function {
    pub fn new(name: impl Into<String>, args: Vec<Expression>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            args,
            data_type,
        }
    }
}

/// An aggregate function. The inner expression is absent only for
/// `COUNT(*)`; `count_star` is the only way to construct that shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    func: AggregateFunc,
    distinct: bool,
    expr: Option<Box<Expression>>,
}

impl Aggregate {
    pub fn new(func: AggregateFunc, distinct: bool, expr: Expression) -> Self {
        Self {
            func,
            distinct,
            expr: Some(Box::new(expr)),
        }
    }

    /// `COUNT(*)`.
    pub fn count_star() -> Self {
        Self {
            func: AggregateFunc::Count,
            distinct: false,
            expr: None,
        }
    }

    pub fn func(&self) -> AggregateFunc {
        self.func
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn expression(&self) -> Option<&Expression> {
        self.expr.as_deref()
    }

    /// Decompose for rewrites that rebuild the node.
    pub fn into_parts(self) -> (AggregateFunc, bool, Option<Expression>) {
        (self.func, self.distinct, self.expr.map(|b| *b))
    }
}

/// A searched CASE expression. Storing when/then branches as pairs keeps
/// the two lists the same length by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchedCase {
    pub whens: Vec<(Criteria, Expression)>,
    pub otherwise: Option<Box<Expression>>,
    pub data_type: DataType,
}

impl SearchedCase {
    /// Panics if `whens` is empty; an empty CASE is a producer bug.
    pub fn new(
        whens: Vec<(Criteria, Expression)>,
        otherwise: Option<Expression>,
        data_type: DataType,
    ) -> Self {
        assert!(!whens.is_empty(), "searched CASE requires at least one WHEN branch");
        Self {
            whens,
            otherwise: otherwise.map(Box::new),
            data_type,
        }
    }
}
