use serde::{Deserialize, Serialize};

use crate::ast::{CompareOp, Expression, LogicalOp, Quantifier, QueryCommand};

/// A predicate usable in WHERE/HAVING/ON position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criteria {
    Compare(CompareCriteria),
    Compound(CompoundCriteria),
    Like(LikeCriteria),
    In(InCriteria),
    SubqueryIn(SubqueryInCriteria),
    IsNull(IsNullCriteria),
    Exists(ExistsCriteria),
    SubqueryCompare(SubqueryCompareCriteria),
    Not(Box<Criteria>),
}

impl Criteria {
    /// Shorthand for a binary comparison.
    pub fn compare(left: Expression, op: CompareOp, right: Expression) -> Self {
        Criteria::Compare(CompareCriteria { left, op, right })
    }

    /// AND two criteria together.
    pub fn and(a: Criteria, b: Criteria) -> Self {
        Criteria::Compound(CompoundCriteria::new(LogicalOp::And, vec![a, b]))
    }

    /// OR two criteria together.
    pub fn or(a: Criteria, b: Criteria) -> Self {
        Criteria::Compound(CompoundCriteria::new(LogicalOp::Or, vec![a, b]))
    }

    /// Negate a criteria.
    pub fn not(inner: Criteria) -> Self {
        Criteria::Not(Box::new(inner))
    }
}

/// `left <op> right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareCriteria {
    pub left: Expression,
    pub op: CompareOp,
    pub right: Expression,
}

/// An AND/OR of one or more criteria. A single-branch compound is tolerated
/// but should not be produced by a well-behaved planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundCriteria {
    op: LogicalOp,
    branches: Vec<Criteria>,
}

impl CompoundCriteria {
    /// Panics if `branches` is empty; an empty compound is a producer bug.
    pub fn new(op: LogicalOp, branches: Vec<Criteria>) -> Self {
        assert!(!branches.is_empty(), "compound criteria requires at least one branch");
        Self { op, branches }
    }

    pub fn op(&self) -> LogicalOp {
        self.op
    }

    pub fn branches(&self) -> &[Criteria] {
        &self.branches
    }

    fn push(&mut self, criteria: Criteria) {
        self.branches.push(criteria);
    }

    /// Decompose for rewrites that rebuild the node.
    pub fn into_parts(self) -> (LogicalOp, Vec<Criteria>) {
        (self.op, self.branches)
    }
}

/// `left [NOT] LIKE right [ESCAPE 'c']`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeCriteria {
    pub left: Expression,
    pub right: Expression,
    pub escape: Option<char>,
    pub negated: bool,
}

/// `left [NOT] IN (v1, v2, ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InCriteria {
    pub left: Expression,
    pub values: Vec<Expression>,
    pub negated: bool,
}

/// `left [NOT] IN (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryInCriteria {
    pub left: Expression,
    pub query: QueryCommand,
    pub negated: bool,
}

/// `expr IS [NOT] NULL`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsNullCriteria {
    pub expr: Expression,
    pub negated: bool,
}

/// `EXISTS (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistsCriteria {
    pub query: QueryCommand,
}

/// `left <op> SOME|ALL (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryCompareCriteria {
    pub left: Expression,
    pub op: CompareOp,
    pub quantifier: Quantifier,
    pub query: QueryCommand,
}

/// Split an AND-tree into its conjuncts. Nested ANDs are flattened;
/// OR-subtrees stay intact as single conjuncts.
pub fn separate_conjuncts(criteria: &Criteria) -> Vec<&Criteria> {
    fn gather<'a>(c: &'a Criteria, out: &mut Vec<&'a Criteria>) {
        match c {
            Criteria::Compound(cc) if cc.op() == LogicalOp::And => {
                for branch in cc.branches() {
                    gather(branch, out);
                }
            }
            other => out.push(other),
        }
    }
    let mut out = Vec::new();
    gather(criteria, &mut out);
    out
}

/// Merge two optional criteria into one, reusing an existing top-level AND
/// node instead of nesting a new one around it.
pub fn combine_with_and(a: Option<Criteria>, b: Option<Criteria>) -> Option<Criteria> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(Criteria::Compound(mut cc)), Some(b)) if cc.op() == LogicalOp::And => {
            cc.push(b);
            Some(Criteria::Compound(cc))
        }
        (Some(a), Some(Criteria::Compound(cc))) if cc.op() == LogicalOp::And => {
            let mut branches = vec![a];
            branches.extend(cc.branches.into_iter());
            Some(Criteria::Compound(CompoundCriteria::new(LogicalOp::And, branches)))
        }
        (Some(a), Some(b)) => Some(Criteria::and(a, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DataType, Literal};

    fn lit(n: i64) -> Criteria {
        Criteria::compare(
            Expression::Literal(Literal::new(n, DataType::Integer)),
            CompareOp::Eq,
            Expression::Literal(Literal::new(n, DataType::Integer)),
        )
    }

    #[test]
    fn test_combine_then_separate_round_trips() {
        let conjuncts = vec![lit(1), lit(2), lit(3), lit(4)];
        let mut combined = None;
        for c in &conjuncts {
            combined = combine_with_and(combined, Some(c.clone()));
        }
        let combined = combined.unwrap();
        let separated: Vec<Criteria> =
            separate_conjuncts(&combined).into_iter().cloned().collect();
        assert_eq!(separated, conjuncts);
    }

    #[test]
    fn test_combine_reuses_existing_and_node() {
        let combined = combine_with_and(Some(Criteria::and(lit(1), lit(2))), Some(lit(3))).unwrap();
        match combined {
            Criteria::Compound(cc) => {
                assert_eq!(cc.op(), LogicalOp::And);
                assert_eq!(cc.branches().len(), 3);
            }
            other => panic!("expected compound, got {other:?}"),
        }
    }

    #[test]
    fn test_separate_leaves_or_subtrees_intact() {
        let or_branch = Criteria::or(lit(2), lit(3));
        let combined = combine_with_and(Some(lit(1)), Some(or_branch.clone())).unwrap();
        let separated = separate_conjuncts(&combined);
        assert_eq!(separated.len(), 2);
        assert_eq!(separated[1], &or_branch);
    }

    #[test]
    fn test_combine_with_absent_sides() {
        assert_eq!(combine_with_and(None, None), None);
        assert_eq!(combine_with_and(Some(lit(1)), None), Some(lit(1)));
        assert_eq!(combine_with_and(None, Some(lit(2))), Some(lit(2)));
    }

    #[test]
    #[should_panic(expected = "at least one branch")]
    fn test_empty_compound_panics() {
        CompoundCriteria::new(LogicalOp::And, vec![]);
    }
}
