//! # Typesense Criteria
//!
//! Typed search criteria, filter compilation and collection glue for Typesense.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Schema Model                         │
//! │  • Field types and capability flags (facet, sort, index)   │
//! │  • Derived searchable / facetable / sortable / vector sets │
//! │  • Collection declaration, wildcard `.*` first             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Query Construction                      │
//! │  • Filter → filter_by (FilterCompiler)                     │
//! │  • SearchCriteria → SearchParams (to_search_params)        │
//! │  • Raw facet_counts → field-keyed facets (parse_facets)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CollectionRepo                         │
//! │  • Ensures the collection, imports, searches, CRUD by id   │
//! │  • Talks to Typesense through the SearchBackend trait      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use typesense_criteria::schema::{CollectionSchema, Field};
//! use typesense_criteria::search::{to_search_params, Filter, OperatorMap, SearchCriteria};
//!
//! let schema = CollectionSchema::builder("companies")
//!     .field("name", Field::string().sort())
//!     .field("country", Field::string().facet())
//!     .field("category", Field::string_array().facet())
//!     .field("employees", Field::int32().sort())
//!     .build()
//!     .unwrap();
//!
//! let criteria = SearchCriteria::new()
//!     .q("health")
//!     .facet("country")
//!     .filter(
//!         Filter::new()
//!             .eq("country", "United States")
//!             .any_of("category", ["Software", "Healthcare"])
//!             .ops("employees", OperatorMap::new().gte(100)),
//!     );
//!
//! let params = to_search_params(&criteria, &schema);
//! assert_eq!(params.query_by.as_deref(), Some("name,country,category"));
//! assert_eq!(
//!     params.filter_by.as_deref(),
//!     Some("country:=United States && category:=[Software,Healthcare] && employees:>=100")
//! );
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: Field descriptors and the validated [`CollectionSchema`]
//! - [`search`]: Filters, criteria, the parameter assembler and facet parsing
//! - [`backend`]: The [`SearchBackend`] trait a Typesense transport implements
//! - [`collection`]: [`CollectionRepo`], typed access to one collection
//! - [`config`]: Client and repository configuration

pub mod backend;
pub mod collection;
pub mod config;
pub mod error;
pub mod metrics;
pub mod schema;
pub mod search;

pub use backend::{BackendError, SearchBackend};
pub use collection::{CollectionRepo, SearchResult, VectorSearch};
pub use config::{ClientConfig, RepoConfig};
pub use error::{QueryError, RepoError};
pub use schema::{CollectionSchema, Field, FieldType};
pub use search::{to_search_params, Filter, FilterCompiler, OperatorMap, SearchCriteria, SearchParams};
