//! Predicate rendering.

use crate::ast::{Criteria, QueryCommand};
use crate::error::{LanguageError, LanguageResult};

use super::SqlWriter;

impl SqlWriter<'_> {
    pub(crate) fn append_criteria(&mut self, criteria: &Criteria) -> LanguageResult<()> {
        match criteria {
            Criteria::Compare(c) => {
                self.append_expression(&c.left)?;
                self.push(" ");
                self.push(c.op.sql_symbol());
                self.push(" ");
                self.append_expression(&c.right)
            }
            Criteria::Compound(c) => {
                let joiner = format!(" {} ", c.op().keyword());
                for (i, branch) in c.branches().iter().enumerate() {
                    if i > 0 {
                        self.push(&joiner);
                    }
                    self.append_criteria_operand(branch)?;
                }
                Ok(())
            }
            Criteria::Like(c) => {
                self.append_expression(&c.left)?;
                if c.negated {
                    self.push(" NOT");
                }
                self.push(" LIKE ");
                self.append_expression(&c.right)?;
                if let Some(escape) = c.escape {
                    let clause = format!(" ESCAPE '{}'", escape);
                    self.push(&clause);
                }
                Ok(())
            }
            Criteria::In(c) => {
                self.append_expression(&c.left)?;
                if c.negated {
                    self.push(" NOT");
                }
                self.push(" IN (");
                for (i, value) in c.values.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.append_expression(value)?;
                }
                self.push(")");
                Ok(())
            }
            Criteria::SubqueryIn(c) => {
                self.append_expression(&c.left)?;
                if c.negated {
                    self.push(" NOT");
                }
                self.push(" IN ");
                self.append_subquery(&c.query)
            }
            Criteria::IsNull(c) => {
                self.append_expression(&c.expr)?;
                self.push(if c.negated { " IS NOT NULL" } else { " IS NULL" });
                Ok(())
            }
            Criteria::Exists(c) => {
                self.push("EXISTS ");
                self.append_subquery(&c.query)
            }
            Criteria::SubqueryCompare(c) => {
                if !self.config.supports_quantified_subquery {
                    return Err(LanguageError::unsupported(
                        self.config.name,
                        format!("quantified subquery ({})", c.quantifier.keyword()),
                    ));
                }
                self.append_expression(&c.left)?;
                self.push(" ");
                self.push(c.op.sql_symbol());
                self.push(" ");
                self.push(c.quantifier.keyword());
                self.push(" ");
                self.append_subquery(&c.query)
            }
            Criteria::Not(inner) => {
                self.push("NOT (");
                self.append_criteria(inner)?;
                self.push(")");
                Ok(())
            }
        }
    }

    /// ON-criteria list: simple predicates joined with AND, compound or
    /// negated members individually parenthesized.
    pub(crate) fn append_on_criteria(&mut self, criteria: &[Criteria]) -> LanguageResult<()> {
        for (i, c) in criteria.iter().enumerate() {
            if i > 0 {
                self.push(" AND ");
            }
            self.append_criteria_operand(c)?;
        }
        Ok(())
    }

    /// A compound operand inside a larger predicate keeps its own
    /// parentheses; simple predicates render bare.
    fn append_criteria_operand(&mut self, criteria: &Criteria) -> LanguageResult<()> {
        let parens = matches!(criteria, Criteria::Compound(_));
        if parens {
            self.push("(");
        }
        self.append_criteria(criteria)?;
        if parens {
            self.push(")");
        }
        Ok(())
    }

    fn append_subquery(&mut self, query: &QueryCommand) -> LanguageResult<()> {
        self.push("(");
        self.append_query_command(query)?;
        self.push(")");
        Ok(())
    }
}
