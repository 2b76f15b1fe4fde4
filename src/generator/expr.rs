//! Expression and literal rendering.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::ast::{Aggregate, Element, Expression, Function, Literal, SearchedCase, Value};
use crate::error::LanguageResult;
use crate::types::TypeClass;

use super::{SqlWriter, UNDEFINED};

impl SqlWriter<'_> {
    pub(crate) fn append_expression(&mut self, expr: &Expression) -> LanguageResult<()> {
        match expr {
            Expression::Element(e) => {
                self.append_element(e);
                Ok(())
            }
            Expression::Literal(l) => {
                self.append_literal(l);
                Ok(())
            }
            Expression::Function(f) => self.append_function(f),
            Expression::Aggregate(a) => self.append_aggregate(a),
            Expression::Case(c) => self.append_case(c),
            Expression::ScalarSubquery(q) => {
                self.push("(");
                let result = self.append_query(q);
                self.push(")");
                result
            }
        }
    }

    /// Column reference: a dialect override renders unqualified and
    /// verbatim; otherwise the reference is qualified with its group's
    /// context and uses the catalog native name when one exists.
    pub(crate) fn append_element(&mut self, element: &Element) {
        if let Some(hook) = self.config.replace_element_name {
            if let Some(full) = hook(element) {
                self.push(&full);
                return;
            }
        }
        self.push(&element.group.context);
        self.push(".");
        let name = self.element_unqualified_name(element);
        self.push(&name);
    }

    /// Catalog native name verbatim, else the last dot-segment of the
    /// symbolic name. Catalog failures degrade to the symbolic fallback.
    pub(crate) fn element_unqualified_name(&self, element: &Element) -> String {
        self.catalog
            .and_then(|c| c.element_native_name(element).ok().flatten())
            .unwrap_or_else(|| element.short_name().to_string())
    }

    pub(crate) fn append_literal(&mut self, literal: &Literal) {
        if literal.is_bind_value() || literal.is_multi_valued() {
            self.push(self.config.bind_marker);
            return;
        }
        let Some(value) = literal.value() else {
            self.push("NULL");
            return;
        };
        let raw = raw_value_text(value);
        let text = match literal.data_type().class() {
            TypeClass::Numeric => raw,
            TypeClass::Boolean => format!("{{b'{}'}}", raw),
            TypeClass::Date => format!("{{d'{}'}}", raw),
            TypeClass::Time => format!("{{t'{}'}}", raw),
            TypeClass::Timestamp => format!("{{ts'{}'}}", raw),
            TypeClass::Other => format!("'{}'", raw.replace('\'', "''")),
        };
        self.push(&text);
    }

    fn append_function(&mut self, function: &Function) -> LanguageResult<()> {
        let name = function.name.as_str();
        if name.eq_ignore_ascii_case("convert") || name.eq_ignore_ascii_case("cast") {
            return self.append_cast_function(function);
        }
        if self.config.infix_functions.contains(name) {
            return self.append_infix_function(function);
        }
        if name.eq_ignore_ascii_case("timestampadd") || name.eq_ignore_ascii_case("timestampdiff")
        {
            return self.append_interval_function(function);
        }
        self.push(&function.name);
        self.push("(");
        for (i, arg) in function.args.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.append_expression(arg)?;
        }
        self.push(")");
        Ok(())
    }

    /// `CONVERT(arg, type)` / `CAST(arg AS type)` — the target-type name is
    /// the literal text of the second argument, unquoted.
    fn append_cast_function(&mut self, function: &Function) -> LanguageResult<()> {
        let is_convert = function.name.eq_ignore_ascii_case("convert");
        self.push(if is_convert { "CONVERT(" } else { "CAST(" });
        match function.args.first() {
            Some(arg) => self.append_expression(arg)?,
            None => self.push(UNDEFINED),
        }
        self.push(if is_convert { ", " } else { " AS " });
        let type_text = function
            .args
            .get(1)
            .and_then(literal_text)
            .unwrap_or_else(|| UNDEFINED.to_string());
        self.push(&type_text);
        self.push(")");
        Ok(())
    }

    /// `(a OP b OP c)`
    fn append_infix_function(&mut self, function: &Function) -> LanguageResult<()> {
        self.push("(");
        for (i, arg) in function.args.iter().enumerate() {
            if i > 0 {
                self.push(" ");
                self.push(&function.name);
                self.push(" ");
            }
            self.append_expression(arg)?;
        }
        self.push(")");
        Ok(())
    }

    /// `TIMESTAMPADD(SQL_TSI_HOUR, n, ts)` — the first argument is an
    /// interval-unit keyword, not a value, and renders unquoted.
    fn append_interval_function(&mut self, function: &Function) -> LanguageResult<()> {
        let name = function.name.to_ascii_uppercase();
        self.push(&name);
        self.push("(");
        match function.args.first().and_then(literal_text) {
            Some(unit) => self.push(&unit),
            None => self.push(UNDEFINED),
        }
        for arg in function.args.iter().skip(1) {
            self.push(", ");
            self.append_expression(arg)?;
        }
        self.push(")");
        Ok(())
    }

    fn append_aggregate(&mut self, aggregate: &Aggregate) -> LanguageResult<()> {
        let name = aggregate.func().to_string();
        self.push(&name);
        self.push("(");
        if aggregate.is_distinct() {
            self.push("DISTINCT ");
        }
        match aggregate.expression() {
            Some(expr) => self.append_expression(expr)?,
            None => self.push("*"),
        }
        self.push(")");
        Ok(())
    }

    fn append_case(&mut self, case: &SearchedCase) -> LanguageResult<()> {
        self.push("CASE");
        for (when, then) in &case.whens {
            self.push(" WHEN ");
            self.append_criteria(when)?;
            self.push(" THEN ");
            self.append_expression(then)?;
        }
        if let Some(otherwise) = &case.otherwise {
            self.push(" ELSE ");
            self.append_expression(otherwise)?;
        }
        self.push(" END");
        Ok(())
    }
}

/// Raw literal text of an expression, when it is a non-null literal.
fn literal_text(expr: &Expression) -> Option<String> {
    match expr {
        Expression::Literal(l) => l.value().map(raw_value_text),
        _ => None,
    }
}

fn raw_value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::Date(d) => format_date(d),
        Value::Time(t) => format_time(t),
        Value::Timestamp(ts) => format_timestamp(ts),
        Value::Uuid(u) => u.to_string(),
    }
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}
