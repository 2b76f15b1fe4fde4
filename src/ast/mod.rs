//! The language object model: a typed tree representing one relational
//! command, built by a planner and consumed by the generators.

pub mod clauses;
pub mod cmd;
pub mod criteria;
pub mod expr;
pub mod operators;

pub use self::clauses::{
    From, FromItem, Group, GroupBy, InlineView, Join, Limit, OrderBy, OrderByItem, Select,
    SelectSymbol,
};
pub use self::cmd::{
    Command, Delete, Insert, InsertSource, Parameter, Procedure, Query, QueryCommand, SetClause,
    SetQuery, Update,
};
pub use self::criteria::{
    combine_with_and, separate_conjuncts, CompareCriteria, CompoundCriteria, Criteria,
    ExistsCriteria, InCriteria, IsNullCriteria, LikeCriteria, SubqueryCompareCriteria,
    SubqueryInCriteria,
};
pub use self::expr::{Aggregate, Element, Expression, Function, Literal, SearchedCase, Value};
pub use self::operators::{
    AggregateFunc, CompareOp, JoinKind, LogicalOp, ParamDirection, Quantifier, SetOp, SortOrder,
};

pub use crate::types::DataType;
