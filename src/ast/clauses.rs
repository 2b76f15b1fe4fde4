use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{Criteria, Element, Expression, JoinKind, QueryCommand, SortOrder};

/// A table or view reference. `context` is the name the query refers to the
/// group by; `definition` holds the original catalog name when the group is
/// aliased. Shared (non-owning) references to a group always go through the
/// same `Arc`, so group identity is pointer identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub context: String,
    pub definition: Option<String>,
}

impl Group {
    /// An unaliased group reference.
    pub fn named(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            context: name.into(),
            definition: None,
        })
    }

    /// An aliased group reference: `definition AS context`.
    pub fn aliased(definition: impl Into<String>, context: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            context: context.into(),
            definition: Some(definition.into()),
        })
    }

    pub fn is_aliased(&self) -> bool {
        self.definition.is_some()
    }
}

/// The SELECT clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub distinct: bool,
    pub symbols: Vec<SelectSymbol>,
}

impl Select {
    pub fn new(symbols: Vec<SelectSymbol>) -> Self {
        Self {
            distinct: false,
            symbols,
        }
    }

    pub fn distinct(symbols: Vec<SelectSymbol>) -> Self {
        Self {
            distinct: true,
            symbols,
        }
    }
}

/// One projected expression with an optional alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectSymbol {
    pub expression: Expression,
    pub alias: Option<String>,
}

impl SelectSymbol {
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            alias: None,
        }
    }

    pub fn aliased(expression: Expression, alias: impl Into<String>) -> Self {
        Self {
            expression,
            alias: Some(alias.into()),
        }
    }

    /// The output column name: the alias when present, else the element's
    /// short name for direct column references.
    pub fn output_name(&self) -> Option<&str> {
        if let Some(alias) = &self.alias {
            return Some(alias);
        }
        match &self.expression {
            Expression::Element(e) => Some(e.short_name()),
            _ => None,
        }
    }
}

/// The FROM clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct From {
    pub items: Vec<FromItem>,
}

impl From {
    pub fn new(items: Vec<FromItem>) -> Self {
        Self { items }
    }

    /// A FROM clause over a single group.
    pub fn group(group: Arc<Group>) -> Self {
        Self {
            items: vec![FromItem::Group(group)],
        }
    }
}

/// One entry of a FROM clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromItem {
    Group(Arc<Group>),
    Join(Box<Join>),
    InlineView(Box<InlineView>),
}

/// A join of two from items with AND-ed ON criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub left: FromItem,
    pub right: FromItem,
    pub kind: JoinKind,
    pub criteria: Vec<Criteria>,
}

impl Join {
    pub fn new(left: FromItem, right: FromItem, kind: JoinKind, criteria: Vec<Criteria>) -> Self {
        Self {
            left,
            right,
            kind,
            criteria,
        }
    }
}

impl std::convert::From<Join> for FromItem {
    fn from(join: Join) -> Self {
        FromItem::Join(Box::new(join))
    }
}

/// A derived table: `(subquery) AS context`. When the translator has already
/// rendered the subquery, `output` carries the text and is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineView {
    pub group: Arc<Group>,
    pub query: QueryCommand,
    pub output: Option<String>,
}

impl std::convert::From<InlineView> for FromItem {
    fn from(view: InlineView) -> Self {
        FromItem::InlineView(Box::new(view))
    }
}

/// The GROUP BY clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBy {
    pub expressions: Vec<Expression>,
}

/// The ORDER BY clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub items: Vec<OrderByItem>,
}

/// One sort key: an output-column name, a direct element reference, or both.
/// The output name wins at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub name: Option<String>,
    pub element: Option<Element>,
    pub direction: SortOrder,
}

impl OrderByItem {
    /// Sort by output-column name.
    pub fn by_name(name: impl Into<String>, direction: SortOrder) -> Self {
        Self {
            name: Some(name.into()),
            element: None,
            direction,
        }
    }

    /// Sort by a direct column reference.
    pub fn by_element(element: Element, direction: SortOrder) -> Self {
        Self {
            name: None,
            element: Some(element),
            direction,
        }
    }
}

/// Row limit with an optional offset. The offset is rendered only when
/// greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub row_limit: u64,
    pub offset: u64,
}

impl Limit {
    pub fn new(row_limit: u64) -> Self {
        Self {
            row_limit,
            offset: 0,
        }
    }

    pub fn with_offset(row_limit: u64, offset: u64) -> Self {
        Self { row_limit, offset }
    }
}
