// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search response types and the facet parser.
//!
//! Typesense returns facets as an array of per-field blocks:
//!
//! ```text
//! "facet_counts": [
//!   {"field_name": "brand", "counts": [{"count": 12, "highlighted": "Acme", "value": "Acme"}]}
//! ]
//! ```
//!
//! [`parse_facets`] reprojects that into a map keyed by field name.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One facet value and how many hits carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub count: u64,
    #[serde(default)]
    pub highlighted: String,
    pub value: String,
}

/// Raw per-field facet block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFacetCounts {
    pub field_name: String,
    #[serde(default)]
    pub counts: Vec<FacetCount>,
    /// Numeric facets only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit<D> {
    pub document: D,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_match: Option<u64>,
    /// Present on vector searches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Value>,
}

/// Raw search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<D = Value> {
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub out_of: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub hits: Vec<SearchHit<D>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_counts: Option<Vec<RawFacetCounts>>,
    #[serde(default)]
    pub search_time_ms: u64,
}

impl<D> SearchResponse<D> {
    /// Documents in hit order.
    pub fn documents(&self) -> impl Iterator<Item = &D> {
        self.hits.iter().map(|hit| &hit.document)
    }
}

/// Field-keyed facet counts, in the order the response listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    fields: Vec<(String, Vec<FacetCount>)>,
}

impl Facets {
    /// Set the counts for a field. A repeated field keeps its first position.
    pub fn insert(&mut self, field: impl Into<String>, counts: Vec<FacetCount>) {
        let field = field.into();
        if let Some(slot) = self.fields.iter_mut().find(|(name, _)| *name == field) {
            slot.1 = counts;
        } else {
            self.fields.push((field, counts));
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[FacetCount]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, counts)| counts.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FacetCount])> {
        self.fields
            .iter()
            .map(|(name, counts)| (name.as_str(), counts.as_slice()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Index<&str> for Facets {
    type Output = [FacetCount];

    fn index(&self, field: &str) -> &Self::Output {
        match self.get(field) {
            Some(counts) => counts,
            None => panic!("no facet counts for field '{}'", field),
        }
    }
}

impl FromIterator<(String, Vec<FacetCount>)> for Facets {
    fn from_iter<I: IntoIterator<Item = (String, Vec<FacetCount>)>>(iter: I) -> Self {
        let mut facets = Facets::default();
        for (field, counts) in iter {
            facets.insert(field, counts);
        }
        facets
    }
}

/// Key each facet block's counts by its field name.
///
/// A missing facet section yields an empty map. Counts are kept as-is: no
/// sorting, filtering or renaming.
pub fn parse_facets<D>(response: &SearchResponse<D>) -> Facets {
    response
        .facet_counts
        .iter()
        .flatten()
        .map(|block| (block.field_name.clone(), block.counts.clone()))
        .collect()
}
