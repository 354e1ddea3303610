//! Collection Repository Tests
//!
//! Exercises `CollectionRepo` against an in-memory backend that records
//! every call, so the requests sent to Typesense can be asserted exactly.
//!
//! # Test Organization
//! - `happy_*` - Normal operation: declaration, search, vector search, CRUD
//! - `failure_*` - Rejected criteria, backend errors, no-op guards

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use typesense_criteria::backend::{BackendError, ImportResult, SearchBackend};
use typesense_criteria::collection::{CollectionRepo, VectorSearch};
use typesense_criteria::config::{ImportAction, ImportOptions, RepoConfig};
use typesense_criteria::error::{QueryError, RepoError};
use typesense_criteria::schema::{CollectionDeclaration, CollectionSchema, Field};
use typesense_criteria::search::{
    Filter, MultiSearchRequest, OperatorMap, SearchCriteria, SearchParams,
};

// =============================================================================
// Recording Backend
// =============================================================================

#[derive(Default)]
struct BackendState {
    collections: HashSet<String>,
    declarations: Vec<CollectionDeclaration>,
    documents: HashMap<String, Value>,
    calls: Vec<String>,
    searches: Vec<SearchParams>,
    multi_searches: Vec<MultiSearchRequest>,
    imports: Vec<(Vec<Value>, ImportOptions)>,
    deleted_filters: Vec<String>,
    search_response: Option<Value>,
    unreachable: bool,
}

#[derive(Default)]
struct RecordingBackend {
    state: Mutex<BackendState>,
}

impl RecordingBackend {
    fn with_search_response(response: Value) -> Self {
        let backend = Self::default();
        backend.state.lock().search_response = Some(response);
        backend
    }

    fn record(&self, call: &str) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        state.calls.push(call.to_string());
        if state.unreachable {
            return Err(BackendError::Connection("connection refused".into()));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    fn canned_response(&self) -> Value {
        self.state
            .lock()
            .search_response
            .clone()
            .unwrap_or_else(|| json!({"found": 0, "out_of": 0, "page": 1, "hits": [], "search_time_ms": 0}))
    }
}

#[async_trait]
impl SearchBackend for RecordingBackend {
    async fn collection_exists(&self, name: &str) -> Result<bool, BackendError> {
        self.record("collection_exists")?;
        Ok(self.state.lock().collections.contains(name))
    }

    async fn create_collection(&self, declaration: &CollectionDeclaration) -> Result<(), BackendError> {
        self.record("create_collection")?;
        let mut state = self.state.lock();
        state.collections.insert(declaration.name.clone());
        state.declarations.push(declaration.clone());
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<(), BackendError> {
        self.record("delete_collection")?;
        self.state.lock().collections.remove(name);
        Ok(())
    }

    async fn search(&self, _collection: &str, params: &SearchParams) -> Result<Value, BackendError> {
        self.record("search")?;
        self.state.lock().searches.push(params.clone());
        Ok(self.canned_response())
    }

    async fn multi_search(&self, searches: &[MultiSearchRequest]) -> Result<Vec<Value>, BackendError> {
        self.record("multi_search")?;
        self.state.lock().multi_searches.extend_from_slice(searches);
        Ok(searches.iter().map(|_| self.canned_response()).collect())
    }

    async fn import_documents(
        &self,
        _collection: &str,
        documents: &[Value],
        options: &ImportOptions,
    ) -> Result<Vec<ImportResult>, BackendError> {
        self.record("import")?;
        let mut state = self.state.lock();
        state.imports.push((documents.to_vec(), options.clone()));
        let mut results = Vec::new();
        for doc in documents {
            match doc.get("id").and_then(Value::as_str) {
                Some(id) => {
                    state.documents.insert(id.to_string(), doc.clone());
                    results.push(ImportResult {
                        success: true,
                        id: Some(id.to_string()),
                        error: None,
                        document: None,
                    });
                }
                None => results.push(ImportResult {
                    success: false,
                    id: None,
                    error: Some("missing id".into()),
                    document: Some(doc.to_string()),
                }),
            }
        }
        Ok(results)
    }

    async fn retrieve_document(&self, _collection: &str, id: &str) -> Result<Value, BackendError> {
        self.record("retrieve")?;
        self.state.lock().documents.get(id).cloned().ok_or(BackendError::NotFound)
    }

    async fn create_document(&self, _collection: &str, document: &Value) -> Result<Value, BackendError> {
        self.record("create")?;
        let id = document
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| BackendError::Backend("missing id".into()))?
            .to_string();
        self.state.lock().documents.insert(id, document.clone());
        Ok(document.clone())
    }

    async fn update_document(&self, _collection: &str, id: &str, document: &Value) -> Result<Value, BackendError> {
        self.record("update")?;
        self.state.lock().documents.insert(id.to_string(), document.clone());
        Ok(document.clone())
    }

    async fn delete_document(&self, _collection: &str, id: &str) -> Result<Value, BackendError> {
        self.record("delete")?;
        self.state.lock().documents.remove(id).ok_or(BackendError::NotFound)
    }

    async fn delete_by_filter(&self, _collection: &str, filter_by: &str) -> Result<u64, BackendError> {
        self.record("delete_by_filter")?;
        self.state.lock().deleted_filters.push(filter_by.to_string());
        Ok(2)
    }
}

// =============================================================================
// Helpers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Product {
    id: String,
    name: String,
    price: f64,
}

fn product(id: &str, name: &str, price: f64) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        price,
    }
}

fn products_schema() -> CollectionSchema {
    CollectionSchema::builder("products")
        .field("name", Field::string().facet().sort())
        .field("description", Field::string().optional())
        .field("price", Field::float().facet().sort())
        .field("embedding", Field::vector(2))
        .build()
        .unwrap()
}

fn repo(backend: &Arc<RecordingBackend>) -> CollectionRepo<Product> {
    CollectionRepo::new(backend.clone(), products_schema())
}

// =============================================================================
// Happy Path Tests
// =============================================================================

#[tokio::test]
async fn happy_first_use_declares_collection() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    assert!(repo.ensure_collection().await);
    assert!(repo.ensure_collection().await);

    let state = backend.state.lock();
    assert_eq!(state.declarations.len(), 1);
    let declaration = serde_json::to_value(&state.declarations[0]).unwrap();
    assert_eq!(
        declaration["fields"][0],
        json!({"name": ".*", "type": "auto", "index": true, "facet": false, "sort": false})
    );
    assert_eq!(declaration["fields"][1], json!({"name": "id", "type": "string", "optional": false}));
    assert_eq!(declaration["fields"][3]["optional"], json!(true));
    assert_eq!(declaration["token_separators"][0], json!("@"));
}

#[tokio::test]
async fn happy_search_defaults_and_facets() {
    let backend = Arc::new(RecordingBackend::with_search_response(json!({
        "found": 1,
        "out_of": 3,
        "page": 1,
        "search_time_ms": 2,
        "hits": [{"document": {"id": "p1", "name": "Laptop", "price": 999.0}, "text_match": 42}],
        "facet_counts": [
            {"field_name": "name", "counts": [{"count": 1, "highlighted": "Laptop", "value": "Laptop"}]}
        ]
    })));
    let repo = repo(&backend);

    let result = repo.search(&SearchCriteria::new().facet("name")).await.unwrap();

    assert_eq!(result.found(), 1);
    assert_eq!(result.documents().collect::<Vec<_>>(), vec![&product("p1", "Laptop", 999.0)]);
    assert_eq!(result.facets["name"][0].count, 1);

    let state = backend.state.lock();
    assert_eq!(
        serde_json::to_value(&state.searches[0]).unwrap(),
        json!({"q": "*", "query_by": "name,description", "facet_by": "name"})
    );
}

#[tokio::test]
async fn happy_search_compiles_structured_filter() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    let criteria = SearchCriteria::new().q("lap").filter(
        Filter::new()
            .any_of("name", ["Laptop", "Tablet"])
            .any_ops(
                "price",
                vec![OperatorMap::new().gte(100).lt(500), OperatorMap::new().gte(1000)],
            ),
    );
    repo.search(&criteria).await.unwrap();

    let state = backend.state.lock();
    assert_eq!(
        state.searches[0].filter_by.as_deref(),
        Some("name:=[Laptop,Tablet] && ((price:>=100 && price:<500) || price:>=1000)")
    );
}

#[tokio::test]
async fn happy_vector_search_uses_multi_search() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    repo.vector_search(&VectorSearch::new("embedding", vec![0.5, 1.0]).include(["name"]))
        .await
        .unwrap();

    let state = backend.state.lock();
    assert!(state.searches.is_empty());
    assert_eq!(
        serde_json::to_value(&state.multi_searches[0]).unwrap(),
        json!({
            "collection": "products",
            "q": "*",
            "query_by": "",
            "include_fields": "name",
            "vector_query": "embedding:([0.5,1], k:10)"
        })
    );
}

#[tokio::test]
async fn happy_vector_search_respects_configured_k() {
    let backend = Arc::new(RecordingBackend::default());
    let config = RepoConfig {
        default_vector_k: 3,
        ..RepoConfig::default()
    };
    let repo: CollectionRepo<Product> =
        CollectionRepo::with_config(backend.clone(), products_schema(), config);

    repo.vector_search(&VectorSearch::new("embedding", vec![0.1, 0.2])).await.unwrap();
    repo.vector_search(&VectorSearch::new("embedding", vec![0.1, 0.2]).k(7)).await.unwrap();

    let state = backend.state.lock();
    assert_eq!(
        state.multi_searches[0].params.vector_query.as_deref(),
        Some("embedding:([0.1,0.2], k:3)")
    );
    assert_eq!(
        state.multi_searches[1].params.vector_query.as_deref(),
        Some("embedding:([0.1,0.2], k:7)")
    );
}

#[tokio::test]
async fn happy_vector_search_on_auto_embedded_field() {
    let backend = Arc::new(RecordingBackend::default());
    let schema = CollectionSchema::builder("products")
        .field("name", Field::string())
        .field("embedding", Field::embedding(["name"], "ts/all-MiniLM-L12-v2"))
        .build()
        .unwrap();
    let repo: CollectionRepo<Value> = CollectionRepo::new(backend.clone(), schema);

    repo.vector_search(&VectorSearch::new("embedding", vec![0.25]).k(4))
        .await
        .unwrap();

    let state = backend.state.lock();
    assert_eq!(
        state.multi_searches[0].params.vector_query.as_deref(),
        Some("embedding:([0.25], k:4)")
    );
}

#[tokio::test]
async fn happy_import_with_upsert_options() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    let results = repo
        .import_documents(&[product("p1", "Laptop", 999.0), product("p2", "Mouse", 19.5)])
        .await
        .unwrap();

    assert!(results.iter().all(|r| r.success));
    let state = backend.state.lock();
    let (documents, options) = &state.imports[0];
    assert_eq!(documents.len(), 2);
    assert_eq!(options.action, ImportAction::Upsert);
    assert!(options.return_id);
}

#[tokio::test]
async fn happy_update_creates_then_updates() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    let created = repo.update_document("p1", &product("p1", "Laptop", 999.0)).await.unwrap();
    assert_eq!(created.price, 999.0);

    let updated = repo.update_document("p1", &product("p1", "Laptop", 899.0)).await.unwrap();
    assert_eq!(updated.price, 899.0);

    let calls = backend.calls();
    assert_eq!(calls.iter().filter(|c| *c == "create").count(), 1);
    assert_eq!(calls.iter().filter(|c| *c == "update").count(), 1);
    assert_eq!(
        repo.get_document("p1").await.unwrap(),
        Some(product("p1", "Laptop", 899.0))
    );
}

#[tokio::test]
async fn happy_delete_document_returns_it() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);
    repo.update_document("p1", &product("p1", "Laptop", 999.0)).await.unwrap();

    let deleted = repo.delete_document("p1").await.unwrap();
    assert_eq!(deleted, Some(product("p1", "Laptop", 999.0)));
    assert_eq!(repo.get_document("p1").await.unwrap(), None);
}

#[tokio::test]
async fn happy_delete_documents_by_filter() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    let deleted = repo
        .delete_documents(&Filter::new().ops("price", OperatorMap::new().lt(10)).null("name"))
        .await
        .unwrap();

    assert_eq!(deleted, Some(2));
    assert_eq!(backend.state.lock().deleted_filters, vec!["price:<10".to_string()]);
}

#[tokio::test]
async fn happy_delete_collection_only_when_present() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    assert!(!repo.delete_collection().await.unwrap());
    assert!(!backend.calls().contains(&"delete_collection".to_string()));

    repo.ensure_collection().await;
    assert!(repo.delete_collection().await.unwrap());
    assert!(backend.calls().contains(&"delete_collection".to_string()));
}

// =============================================================================
// Failure Scenario Tests
// =============================================================================

#[tokio::test]
async fn failure_search_rejects_non_facetable_field() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    let err = repo
        .search(&SearchCriteria::new().facet("description"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Query(QueryError::NotFacetable(ref f)) if f == "description"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn failure_vector_search_on_text_field() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    let err = repo
        .vector_search(&VectorSearch::new("name", vec![0.1, 0.2]))
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Query(QueryError::NotVectorField(_))));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn failure_ensure_collection_is_not_fatal() {
    let backend = Arc::new(RecordingBackend::default());
    backend.state.lock().unreachable = true;
    let repo = repo(&backend);

    assert!(!repo.ensure_collection().await);

    // The search itself still reaches the backend and surfaces its error
    let err = repo.search(&SearchCriteria::new()).await.unwrap_err();
    assert!(matches!(err, RepoError::Backend(BackendError::Connection(_))));
    assert!(backend.calls().contains(&"search".to_string()));
}

#[tokio::test]
async fn failure_get_document_swallows_backend_errors() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    assert_eq!(repo.get_document("missing").await.unwrap(), None);

    backend.state.lock().unreachable = true;
    assert_eq!(repo.get_document("p1").await.unwrap(), None);
}

#[tokio::test]
async fn failure_delete_missing_document_is_noop() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    assert_eq!(repo.delete_document("missing").await.unwrap(), None);
    assert!(!backend.calls().contains(&"delete".to_string()));
}

#[tokio::test]
async fn failure_empty_filter_never_deletes_everything() {
    let backend = Arc::new(RecordingBackend::default());
    let repo = repo(&backend);

    let deleted = repo
        .delete_documents(&Filter::new().any_of("name", Vec::<String>::new()).null("price"))
        .await
        .unwrap();

    assert_eq!(deleted, None);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn failure_undecodable_hit_is_decode_error() {
    let backend = Arc::new(RecordingBackend::with_search_response(json!({
        "found": 1,
        "hits": [{"document": {"id": "p1", "name": "Laptop", "price": "not a number"}}]
    })));
    let repo = repo(&backend);

    let err = repo.search(&SearchCriteria::new()).await.unwrap_err();
    assert!(matches!(err, RepoError::Decode(_)));
}

#[tokio::test]
async fn failure_multi_search_embedded_error() {
    let backend = Arc::new(RecordingBackend::with_search_response(json!({
        "code": 404,
        "error": "Field `embedding` not found."
    })));
    let repo = repo(&backend);

    let err = repo
        .vector_search(&VectorSearch::new("embedding", vec![0.1, 0.2]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Backend(BackendError::Backend(ref m)) if m.contains("embedding")));
}
