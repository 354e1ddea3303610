// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter predicate AST
//!
//! An ordered list of `(field, predicate)` pairs. Order is part of the value:
//! the compiled `filter_by` string emits clauses in exactly this order.
//!
//! # Example
//!
//! ```rust
//! use typesense_criteria::search::{Filter, OperatorMap};
//!
//! // Scalar equality, set membership and a price range
//! let filter = Filter::new()
//!     .eq("country", "United States")
//!     .any_of("category", ["Software", "Healthcare"])
//!     .ops("price", OperatorMap::new().gte(100).lt(500));
//!
//! // Several ranges on one field (ORed)
//! let filter = Filter::new().any_ops(
//!     "price",
//!     vec![
//!         OperatorMap::new().gte(100).lt(500),
//!         OperatorMap::new().gte(1000).lt(5000),
//!     ],
//! );
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::QueryError;

/// Comparison operator allowed inside an operator map.
///
/// Closed set: anything else is rejected when a filter is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Exact match: `field:=value`
    Eq,
    /// Token match: `field:value`
    Contains,
    /// Not equal: `field:!=value`
    Neq,
    /// `field:>value`
    Gt,
    /// `field:>=value`
    Gte,
    /// `field:<value`
    Lt,
    /// `field:<=value`
    Lte,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 7] = [
        FilterOperator::Eq,
        FilterOperator::Contains,
        FilterOperator::Neq,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Lt,
        FilterOperator::Lte,
    ];

    /// Key used in operator maps (`{"gte": 100}`)
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Contains => "contains",
            FilterOperator::Neq => "neq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
        }
    }

    /// Token placed between field name and value in `filter_by`
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            FilterOperator::Eq => ":=",
            FilterOperator::Contains => ":",
            FilterOperator::Neq => ":!=",
            FilterOperator::Gt => ":>",
            FilterOperator::Gte => ":>=",
            FilterOperator::Lt => ":<",
            FilterOperator::Lte => ":<=",
        }
    }

    /// Case-sensitive lookup by operator-map key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

/// A single filter value, rendered in its natural string form.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterScalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl std::fmt::Display for FilterScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterScalar::Text(s) => f.write_str(s),
            FilterScalar::Int(n) => write!(f, "{}", n),
            FilterScalar::Float(n) => write!(f, "{}", n),
            FilterScalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FilterScalar {
    fn from(value: &str) -> Self {
        FilterScalar::Text(value.to_string())
    }
}

impl From<String> for FilterScalar {
    fn from(value: String) -> Self {
        FilterScalar::Text(value)
    }
}

impl From<&String> for FilterScalar {
    fn from(value: &String) -> Self {
        FilterScalar::Text(value.clone())
    }
}

impl From<i32> for FilterScalar {
    fn from(value: i32) -> Self {
        FilterScalar::Int(value.into())
    }
}

impl From<i64> for FilterScalar {
    fn from(value: i64) -> Self {
        FilterScalar::Int(value)
    }
}

impl From<u32> for FilterScalar {
    fn from(value: u32) -> Self {
        FilterScalar::Int(value.into())
    }
}

impl From<f64> for FilterScalar {
    fn from(value: f64) -> Self {
        FilterScalar::Float(value)
    }
}

impl From<bool> for FilterScalar {
    fn from(value: bool) -> Self {
        FilterScalar::Bool(value)
    }
}

/// Right-hand side of one operator: a single value or a value list.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `field:>=100`
    One(FilterScalar),
    /// `field:!=[a,b]`
    Many(Vec<FilterScalar>),
}

/// ANDed comparison constraints on one field: `{"gte": 100, "lt": 500}`.
///
/// Each operator appears at most once; setting it again replaces the
/// operand in place, keeping the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorMap {
    ops: Vec<(FilterOperator, Operand)>,
}

impl OperatorMap {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Set an operator to an arbitrary operand
    pub fn with(mut self, op: FilterOperator, operand: Operand) -> Self {
        if let Some(slot) = self.ops.iter_mut().find(|(existing, _)| *existing == op) {
            slot.1 = operand;
        } else {
            self.ops.push((op, operand));
        }
        self
    }

    /// Set an operator to a list of values: `field<token>[v1,v2]`
    pub fn one_of<I, V>(self, op: FilterOperator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterScalar>,
    {
        self.with(op, Operand::Many(values.into_iter().map(Into::into).collect()))
    }

    pub fn eq(self, value: impl Into<FilterScalar>) -> Self {
        self.with(FilterOperator::Eq, Operand::One(value.into()))
    }

    pub fn contains(self, value: impl Into<FilterScalar>) -> Self {
        self.with(FilterOperator::Contains, Operand::One(value.into()))
    }

    pub fn neq(self, value: impl Into<FilterScalar>) -> Self {
        self.with(FilterOperator::Neq, Operand::One(value.into()))
    }

    pub fn gt(self, value: impl Into<FilterScalar>) -> Self {
        self.with(FilterOperator::Gt, Operand::One(value.into()))
    }

    pub fn gte(self, value: impl Into<FilterScalar>) -> Self {
        self.with(FilterOperator::Gte, Operand::One(value.into()))
    }

    pub fn lt(self, value: impl Into<FilterScalar>) -> Self {
        self.with(FilterOperator::Lt, Operand::One(value.into()))
    }

    pub fn lte(self, value: impl Into<FilterScalar>) -> Self {
        self.with(FilterOperator::Lte, Operand::One(value.into()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FilterOperator, Operand)> {
        self.ops.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Predicate for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Explicitly absent. Contributes nothing.
    Null,
    /// Equality: `field:=value`
    Scalar(FilterScalar),
    /// Set membership: `field:=[v1,v2]`
    AnyOf(Vec<FilterScalar>),
    /// ANDed constraints: `(field:>=1 && field:<5)`
    Ops(OperatorMap),
    /// ORed groups of ANDed constraints
    AnyOps(Vec<OperatorMap>),
}

impl FilterValue {
    /// Whether this predicate compiles to nothing.
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        match self {
            FilterValue::Null => true,
            FilterValue::Scalar(_) => false,
            FilterValue::AnyOf(values) => values.is_empty(),
            FilterValue::Ops(map) => map.is_empty(),
            FilterValue::AnyOps(maps) => maps.iter().all(OperatorMap::is_empty),
        }
    }
}

/// Ordered filter predicate: `(field, predicate)` pairs ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Filter {
    entries: Vec<(String, FilterValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Set the predicate for a field. Re-setting a field keeps its position.
    pub fn insert(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        let field = field.into();
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| *name == field) {
            slot.1 = value;
        } else {
            self.entries.push((field, value));
        }
        self
    }

    /// Add an equality constraint
    pub fn eq(self, field: impl Into<String>, value: impl Into<FilterScalar>) -> Self {
        self.insert(field, FilterValue::Scalar(value.into()))
    }

    /// Add a set-membership constraint
    pub fn any_of<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterScalar>,
    {
        self.insert(
            field,
            FilterValue::AnyOf(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Add an operator-map constraint
    pub fn ops(self, field: impl Into<String>, map: OperatorMap) -> Self {
        self.insert(field, FilterValue::Ops(map))
    }

    /// Add ORed operator-map constraints
    pub fn any_ops(self, field: impl Into<String>, maps: Vec<OperatorMap>) -> Self {
        self.insert(field, FilterValue::AnyOps(maps))
    }

    /// Add an explicitly absent predicate
    pub fn null(self, field: impl Into<String>) -> Self {
        self.insert(field, FilterValue::Null)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the JSON object form, keeping key order.
    ///
    /// ```text
    /// {"country": "US", "category": ["a", "b"], "price": {"gte": 100}}
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, QueryError> {
        let object = value.as_object().ok_or_else(|| QueryError::InvalidFilter {
            field: String::new(),
            reason: "filter must be a JSON object".into(),
        })?;

        let mut filter = Filter::new();
        for (field, raw) in object {
            let value = parse_value(field, raw)?;
            filter = filter.insert(field.clone(), value);
        }
        Ok(filter)
    }
}

impl TryFrom<Value> for Filter {
    type Error = QueryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Filter::from_json(&value)
    }
}

fn parse_value(field: &str, raw: &Value) -> Result<FilterValue, QueryError> {
    match raw {
        Value::Null => Ok(FilterValue::Null),
        Value::Array(items) => {
            if matches!(items.first(), Some(Value::Object(_))) {
                let maps = items
                    .iter()
                    .map(|item| match item {
                        Value::Object(_) => parse_operator_map(field, item),
                        _ => Err(invalid(
                            field,
                            "cannot mix operator maps and plain values in one list",
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FilterValue::AnyOps(maps))
            } else {
                let values = items
                    .iter()
                    .map(|item| parse_scalar(field, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FilterValue::AnyOf(values))
            }
        }
        Value::Object(_) => Ok(FilterValue::Ops(parse_operator_map(field, raw)?)),
        _ => Ok(FilterValue::Scalar(parse_scalar(field, raw)?)),
    }
}

fn parse_operator_map(field: &str, raw: &Value) -> Result<OperatorMap, QueryError> {
    let Some(object) = raw.as_object() else {
        return Err(invalid(field, "expected an operator map"));
    };

    let mut map = OperatorMap::new();
    for (name, operand) in object {
        let op = FilterOperator::from_name(name).ok_or_else(|| QueryError::UnknownOperator {
            field: field.to_string(),
            operator: name.clone(),
        })?;
        let operand = match operand {
            Value::Array(items) => Operand::Many(
                items
                    .iter()
                    .map(|item| parse_scalar(field, item))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => Operand::One(parse_scalar(field, operand)?),
        };
        map = map.with(op, operand);
    }
    Ok(map)
}

fn parse_scalar(field: &str, raw: &Value) -> Result<FilterScalar, QueryError> {
    match raw {
        Value::String(s) => Ok(FilterScalar::Text(s.clone())),
        Value::Bool(b) => Ok(FilterScalar::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(FilterScalar::Int)
            .or_else(|| n.as_f64().map(FilterScalar::Float))
            .ok_or_else(|| invalid(field, "number out of range")),
        Value::Null => Err(invalid(field, "null is not allowed inside a value list")),
        Value::Array(_) => Err(invalid(field, "nested lists are not supported")),
        Value::Object(_) => Err(invalid(field, "unexpected object")),
    }
}

fn invalid(field: &str, reason: &str) -> QueryError {
    QueryError::InvalidFilter {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
