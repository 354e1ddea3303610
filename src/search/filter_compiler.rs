// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter Compiler
//!
//! Translates a [`Filter`] into a Typesense `filter_by` expression.
//!
//! # Typesense Filter Syntax
//!
//! ```text
//! field:=value                  - Exact match
//! field:value                   - Token match
//! field:!=value                 - Not equal
//! field:>=100                   - Comparison (>, >=, <, <=)
//! field:=[a,b]                  - Set membership
//! a && b                        - AND
//! a || b                        - OR
//! (a && b)                      - Grouping
//! ```
//!
//! Values are emitted verbatim. They must not contain raw delimiter
//! characters (`,` `:` `(` `)` `[` `]` `&` `|` `` ` ``); such values are
//! logged and passed through unchanged.

use tracing::{debug, warn};

use super::filter::{Filter, FilterScalar, FilterValue, Operand, OperatorMap};
use crate::metrics;
use crate::schema::CollectionSchema;

const AND: &str = " && ";
const OR: &str = " || ";
const DELIMITERS: &[char] = &[',', ':', '(', ')', '[', ']', '&', '|', '`'];

/// Typesense `filter_by` compiler
pub struct FilterCompiler;

impl FilterCompiler {
    /// Compile a filter into a `filter_by` string.
    ///
    /// Returns an empty string when every predicate is dropped; callers
    /// treat that as "no filter".
    pub fn compile(filter: &Filter) -> String {
        let clauses: Vec<String> = filter
            .entries()
            .filter_map(|(field, value)| Self::compile_entry(field, value))
            .collect();

        metrics::record_filter_compiled(clauses.len());
        clauses.join(AND)
    }

    /// Compile against a schema, noting filter keys the schema does not declare.
    ///
    /// Undeclared keys are still compiled: the wildcard declaration lets
    /// Typesense index any field it has not been told about.
    pub fn compile_for(filter: &Filter, schema: &CollectionSchema) -> String {
        for (field, value) in filter.entries() {
            if !value.is_dropped() && !schema.contains(field) {
                debug!(collection = %schema.name(), field = %field, "Filtering on undeclared field");
            }
        }
        Self::compile(filter)
    }

    fn compile_entry(field: &str, value: &FilterValue) -> Option<String> {
        match value {
            FilterValue::Null => None,
            FilterValue::Scalar(scalar) => Some(format!("{}:={}", field, Self::render(field, scalar))),
            FilterValue::AnyOf(values) => {
                if values.is_empty() {
                    None
                } else {
                    Some(format!("{}:={}", field, Self::render_list(field, values)))
                }
            }
            FilterValue::Ops(map) => {
                let parts = Self::compile_ops(field, map);
                match parts.len() {
                    0 => None,
                    1 => parts.into_iter().next(),
                    _ => Some(format!("({})", parts.join(AND))),
                }
            }
            FilterValue::AnyOps(maps) => {
                let groups: Vec<String> = maps
                    .iter()
                    .map(|map| Self::compile_ops(field, map))
                    .filter(|parts| !parts.is_empty())
                    .map(|parts| {
                        if parts.len() == 1 {
                            parts.join(AND)
                        } else {
                            format!("({})", parts.join(AND))
                        }
                    })
                    .collect();
                if groups.is_empty() {
                    None
                } else {
                    Some(format!("({})", groups.join(OR)))
                }
            }
        }
    }

    fn compile_ops(field: &str, map: &OperatorMap) -> Vec<String> {
        map.iter()
            .map(|(op, operand)| match operand {
                Operand::One(scalar) => {
                    format!("{}{}{}", field, op.token(), Self::render(field, scalar))
                }
                Operand::Many(values) => {
                    format!("{}{}{}", field, op.token(), Self::render_list(field, values))
                }
            })
            .collect()
    }

    fn render_list(field: &str, values: &[FilterScalar]) -> String {
        let rendered: Vec<String> = values.iter().map(|v| Self::render(field, v)).collect();
        format!("[{}]", rendered.join(","))
    }

    fn render(field: &str, scalar: &FilterScalar) -> String {
        let rendered = scalar.to_string();
        if let FilterScalar::Text(_) = scalar {
            if rendered.contains(DELIMITERS) {
                warn!(field = %field, value = %rendered, "Filter value contains a delimiter character and is not escaped");
            }
        }
        rendered
    }
}
