// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Nearest-neighbour queries over `float[]` embedding fields.
//!
//! ```text
//! embedding:([0.12,-0.5,0.33], k:10)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::schema::CollectionSchema;

/// Vector similarity search query (KNN)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorQuery {
    /// Vector field name (e.g., "embedding")
    pub field: String,
    /// Query embedding (must match the field's `num_dim`)
    pub vector: Vec<f32>,
    /// Number of nearest neighbours to return
    pub k: usize,
}

impl VectorQuery {
    pub fn new(field: impl Into<String>, vector: Vec<f32>, k: usize) -> Self {
        Self {
            field: field.into(),
            vector,
            k,
        }
    }

    /// The field must be declared as a vector field.
    pub fn validate(&self, schema: &CollectionSchema) -> Result<(), QueryError> {
        if schema.vector_fields().iter().any(|f| *f == self.field) {
            Ok(())
        } else {
            Err(QueryError::NotVectorField(self.field.clone()))
        }
    }
}

impl fmt::Display for VectorQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:([", self.field)?;
        for (i, component) in self.vector.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", component)?;
        }
        write!(f, "], k:{})", self.k)
    }
}
