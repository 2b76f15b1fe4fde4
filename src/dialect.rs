//! Dialect configuration.
//!
//! Every point of dialect variation is plain data in [`DialectConfig`]:
//! syntax toggles read by the generator and capability flags consulted by
//! the rewrite pass. One generator consumes the config; there is no
//! per-dialect generator type.

use std::collections::HashSet;

use crate::ast::Element;
use crate::types::DataType;

/// LIMIT/OFFSET spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitSyntax {
    /// `LIMIT offset, count`
    CommaForm,
    /// `LIMIT count OFFSET offset`
    OffsetForm,
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Generic,
    Postgres,
    MySql,
    Sqlite,
    Oracle,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::Generic
    }
}

impl Dialect {
    pub fn config(self) -> DialectConfig {
        match self {
            Dialect::Generic => DialectConfig::generic(),
            Dialect::Postgres => DialectConfig::postgres(),
            Dialect::MySql => DialectConfig::mysql(),
            Dialect::Sqlite => DialectConfig::sqlite(),
            Dialect::Oracle => DialectConfig::oracle(),
        }
    }
}

/// Full-name override for an element; used for pseudo-columns that must not
/// be qualified with their group.
pub type ElementNameOverride = fn(&Element) -> Option<String>;

/// Cast/CONVERT target-type name for a logical type. `None` means the
/// dialect cannot cast to that type and the rewrite pass must fail.
pub type CastTypeName = fn(DataType) -> Option<&'static str>;

/// Syntax and capability configuration for one target dialect.
#[derive(Debug, Clone)]
pub struct DialectConfig {
    pub name: &'static str,

    // syntax toggles
    /// Spell group aliases `tbl AS a` rather than `tbl a`.
    pub group_alias_uses_as: bool,
    /// Parenthesize every nested join operand.
    pub parenthesize_joins: bool,
    /// Parenthesize every set-query operand, not just nested set queries.
    pub parenthesize_set_operands: bool,
    /// Function names rendered infix: `(a || b)` instead of `||(a, b)`.
    pub infix_functions: HashSet<String>,
    pub limit_syntax: LimitSyntax,
    /// Placeholder token for bind values.
    pub bind_marker: &'static str,
    /// Comment emitted as a `/* ... */` prefix on every rendered command.
    pub source_comment: Option<String>,
    pub replace_element_name: Option<ElementNameOverride>,
    pub cast_type_name: CastTypeName,

    // capabilities consulted by the rewrite pass
    pub supports_right_outer_join: bool,
    pub supports_full_outer_join: bool,
    pub supports_quantified_subquery: bool,
    pub supports_like_escape: bool,
    /// Whether the dialect has a native boolean type; without one, boolean
    /// select expressions are coerced through a CASE idiom.
    pub native_boolean: bool,
}

fn default_infix_functions() -> HashSet<String> {
    ["%", "+", "-", "*", "/", "||", "&", "|", "^", "#"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn standard_cast_name(data_type: DataType) -> Option<&'static str> {
    Some(data_type.type_name())
}

fn postgres_cast_name(data_type: DataType) -> Option<&'static str> {
    Some(match data_type {
        DataType::String => "varchar",
        DataType::Char => "char(1)",
        DataType::Boolean => "boolean",
        DataType::Byte | DataType::Short => "smallint",
        DataType::Integer => "integer",
        DataType::Long => "bigint",
        DataType::BigInteger => "numeric(38)",
        DataType::Float => "real",
        DataType::Double => "float8",
        DataType::BigDecimal => "decimal",
        DataType::Date => "date",
        DataType::Time => "time",
        DataType::Timestamp => "timestamp",
        DataType::Uuid => "uuid",
        DataType::Object => return None,
    })
}

fn mysql_cast_name(data_type: DataType) -> Option<&'static str> {
    Some(match data_type {
        DataType::String => "char",
        DataType::Char => "char(1)",
        DataType::Boolean | DataType::Byte | DataType::Short | DataType::Integer => "signed",
        DataType::Long | DataType::BigInteger => "signed",
        DataType::Float | DataType::Double | DataType::BigDecimal => "decimal",
        DataType::Date => "date",
        DataType::Time => "time",
        DataType::Timestamp => "datetime",
        DataType::Uuid => "char",
        DataType::Object => return None,
    })
}

fn oracle_cast_name(data_type: DataType) -> Option<&'static str> {
    Some(match data_type {
        DataType::String => "varchar2(4000)",
        DataType::Char => "char(1)",
        // no boolean type in Oracle SQL
        DataType::Boolean => return None,
        DataType::Byte | DataType::Short => "number(5)",
        DataType::Integer => "number(10)",
        DataType::Long => "number(19)",
        DataType::BigInteger => "number(38)",
        DataType::Float => "binary_float",
        DataType::Double => "binary_double",
        DataType::BigDecimal => "number",
        DataType::Date => "date",
        DataType::Time => "date",
        DataType::Timestamp => "timestamp",
        DataType::Uuid => "varchar2(36)",
        DataType::Object => return None,
    })
}

/// Oracle pseudo-columns render bare, never qualified.
fn oracle_replace_element_name(element: &Element) -> Option<String> {
    let short = element.short_name();
    if short.eq_ignore_ascii_case("rowid") {
        Some("ROWID".to_string())
    } else if short.eq_ignore_ascii_case("rownum") {
        Some("ROWNUM".to_string())
    } else {
        None
    }
}

impl DialectConfig {
    /// The default engine: JDBC-escape literals, comma-form LIMIT, every
    /// capability enabled.
    pub fn generic() -> Self {
        Self {
            name: "generic",
            group_alias_uses_as: true,
            parenthesize_joins: false,
            parenthesize_set_operands: false,
            infix_functions: default_infix_functions(),
            limit_syntax: LimitSyntax::CommaForm,
            bind_marker: "?",
            source_comment: None,
            replace_element_name: None,
            cast_type_name: standard_cast_name,
            supports_right_outer_join: true,
            supports_full_outer_join: true,
            supports_quantified_subquery: true,
            supports_like_escape: true,
            native_boolean: true,
        }
    }

    pub fn postgres() -> Self {
        Self {
            name: "postgres",
            limit_syntax: LimitSyntax::OffsetForm,
            cast_type_name: postgres_cast_name,
            ..Self::generic()
        }
    }

    pub fn mysql() -> Self {
        Self {
            name: "mysql",
            cast_type_name: mysql_cast_name,
            supports_full_outer_join: false,
            ..Self::generic()
        }
    }

    pub fn sqlite() -> Self {
        Self {
            name: "sqlite",
            limit_syntax: LimitSyntax::OffsetForm,
            supports_right_outer_join: false,
            supports_full_outer_join: false,
            supports_quantified_subquery: false,
            ..Self::generic()
        }
    }

    pub fn oracle() -> Self {
        Self {
            name: "oracle",
            group_alias_uses_as: false,
            limit_syntax: LimitSyntax::OffsetForm,
            cast_type_name: oracle_cast_name,
            replace_element_name: Some(oracle_replace_element_name),
            native_boolean: false,
            ..Self::generic()
        }
    }

    /// Attach a source comment emitted ahead of every rendered command.
    pub fn with_source_comment(mut self, comment: impl Into<String>) -> Self {
        self.source_comment = Some(comment.into());
        self
    }
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self::generic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_infix_set() {
        let config = DialectConfig::generic();
        for op in ["%", "+", "-", "*", "/", "||", "&", "|", "^", "#"] {
            assert!(config.infix_functions.contains(op), "missing {op}");
        }
        assert!(!config.infix_functions.contains("concat"));
    }

    #[test]
    fn test_oracle_has_no_boolean_cast() {
        let config = DialectConfig::oracle();
        assert_eq!((config.cast_type_name)(DataType::Boolean), None);
        assert_eq!((config.cast_type_name)(DataType::BigInteger), Some("number(38)"));
    }

    #[test]
    fn test_postgres_biginteger_cast() {
        let config = DialectConfig::postgres();
        assert_eq!((config.cast_type_name)(DataType::BigInteger), Some("numeric(38)"));
    }
}
