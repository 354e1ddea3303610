// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Query Construction
//!
//! Turns declarative search criteria into Typesense search parameters.
//!
//! # Architecture
//!
//! ```text
//! SearchCriteria ──→ to_search_params ──→ SearchParams (q, query_by, filter_by, ...)
//!                         │
//!                         ├─→ CollectionSchema → default query_by
//!                         └─→ FilterCompiler   → filter_by
//!
//! SearchResponse ──→ parse_facets ──→ field → [FacetCount]
//! ```
//!
//! # Example
//!
//! ```rust
//! use typesense_criteria::schema::{CollectionSchema, Field};
//! use typesense_criteria::search::{to_search_params, Filter, OperatorMap, QueryBy, SearchCriteria};
//!
//! let schema = CollectionSchema::builder("products")
//!     .field("name", Field::string().facet())
//!     .field("description", Field::string())
//!     .field("price", Field::float().sort())
//!     .build()
//!     .unwrap();
//!
//! let criteria = SearchCriteria::new()
//!     .q("laptop")
//!     .query_by(QueryBy::new().field("name", 2).field("description", 1))
//!     .sort("price:asc")
//!     .filter(Filter::new().ops("price", OperatorMap::new().gte(100).lt(500)));
//!
//! let params = to_search_params(&criteria, &schema);
//! assert_eq!(params.query_by_weights.as_deref(), Some("2,1"));
//! assert_eq!(params.filter_by.as_deref(), Some("(price:>=100 && price:<500)"));
//! ```

mod criteria;
mod facets;
mod filter;
mod filter_compiler;
mod params;
mod vector;

pub use criteria::{FacetRequest, FilterSpec, QueryBy, SearchCriteria, SortOrder, SortSpec};
pub use facets::{parse_facets, FacetCount, Facets, RawFacetCounts, SearchHit, SearchResponse};
pub use filter::{Filter, FilterOperator, FilterScalar, FilterValue, Operand, OperatorMap};
pub use filter_compiler::FilterCompiler;
pub use params::{to_search_params, MultiSearchRequest, SearchParams};
pub use vector::VectorQuery;
