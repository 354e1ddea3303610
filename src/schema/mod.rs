// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Schema Model
//!
//! Declarative description of a Typesense collection: field names, primitive
//! types and per-field capability flags. Everything else in the crate reads
//! field capabilities from here.
//!
//! ```rust
//! use typesense_criteria::schema::{CollectionSchema, Field};
//!
//! let schema = CollectionSchema::builder("products")
//!     .field("name", Field::string().facet().sort())
//!     .field("description", Field::string())
//!     .field("price", Field::float().facet().sort())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.searchable_fields(), ["name", "description"]);
//! assert_eq!(schema.to_fields_array()[0].name, ".*");
//! ```

mod collection;
mod field;

pub use collection::{
    CollectionDeclaration, CollectionSchema, CollectionSchemaBuilder, FieldCapabilities,
    FieldDeclaration, ID_FIELD, WILDCARD_FIELD,
};
pub use field::{EmbedConfig, Field, FieldType, ModelConfig};
