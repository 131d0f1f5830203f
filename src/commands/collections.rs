//! Collection command implementations
//!
//! Each operation takes the connector context and a dispatcher [`Request`],
//! pulls its typed parameters, performs one driver call, and transforms the
//! outcome. Document-like parameters are coerced before the database handle
//! is resolved, so a malformed payload never reaches the driver.

use futures::stream::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::context::ConnectorContext;
use crate::dispatch::Request;
use crate::error::Result;

/// A named collection, as reported back to the dispatcher.
///
/// Only the name survives translation; driver-specific fields of the raw
/// collection-info records (options, info, id index) are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
}

/// List the collections in a database.
///
/// # Arguments
/// * `context` - Connector context
/// * `request` - Request carrying an optional `dbname`
///
/// # Returns
/// * `Result<Vec<CollectionInfo>>` - One record per collection
pub async fn list(context: ConnectorContext, request: Request) -> Result<Vec<CollectionInfo>> {
    let db = context.database(request.text_opt("dbname").as_deref()).await?;
    debug!("Listing collections in database '{}'", db.name());

    let mut cursor = db.list_collections().await?;
    let mut collections = Vec::new();
    while let Some(spec) = cursor.try_next().await? {
        collections.push(CollectionInfo { name: spec.name });
    }

    info!("Found {} collections", collections.len());
    Ok(collections)
}

/// Create a new collection.
///
/// The returned name is taken from the driver's collection handle rather
/// than the caller's raw input, so any normalization the driver applies is
/// reflected.
///
/// # Arguments
/// * `context` - Connector context
/// * `request` - Request carrying `collectionName` and an optional `dbname`
///
/// # Returns
/// * `Result<CollectionInfo>` - The created collection
pub async fn create(context: ConnectorContext, request: Request) -> Result<CollectionInfo> {
    let collection_name = request.text("collectionName")?;
    let db = context.database(request.text_opt("dbname").as_deref()).await?;
    info!(
        "Creating collection '{}' in database '{}'",
        collection_name,
        db.name()
    );

    db.create_collection(&collection_name).await?;

    let handle: Collection<Document> = db.collection(&collection_name);
    Ok(CollectionInfo {
        name: handle.name().to_string(),
    })
}

/// Insert a single document.
///
/// `doc` may arrive as raw JSON text or as an already-structured mapping;
/// it is coerced first and inserted verbatim. The returned value is the
/// original document with the database-generated `_id` added.
///
/// # Arguments
/// * `context` - Connector context
/// * `request` - Request carrying `doc`, `collectionName`, optional `dbname`
///
/// # Returns
/// * `Result<Document>` - The saved document, including its `_id`
pub async fn insert_one(context: ConnectorContext, request: Request) -> Result<Document> {
    let document = request.document("doc")?.resolve("doc")?;
    let collection_name = request.text("collectionName")?;

    let db = context.database(request.text_opt("dbname").as_deref()).await?;
    debug!("Inserting one document into collection '{collection_name}'");

    let collection: Collection<Document> = db.collection(&collection_name);
    let result = collection.insert_one(document.clone()).await?;

    Ok(with_inserted_id(document, result.inserted_id))
}

/// Find the first document where a single field equals a value.
///
/// # Arguments
/// * `context` - Connector context
/// * `request` - Request carrying `field`, `value`, `collectionName`,
///   optional `dbname`
///
/// # Returns
/// * `Result<Option<Document>>` - First match, or `None` when nothing matches
pub async fn find_one_equals(
    context: ConnectorContext,
    request: Request,
) -> Result<Option<Document>> {
    let field = request.text("field")?;
    let value = request.text("value")?;
    let collection_name = request.text("collectionName")?;

    let db = context.database(request.text_opt("dbname").as_deref()).await?;
    debug!("Finding one document in '{collection_name}' where '{field}' equals '{value}'");

    let collection: Collection<Document> = db.collection(&collection_name);
    let found = collection.find_one(equality_filter(&field, &value)).await?;
    Ok(found)
}

/// Find all documents matching a query.
///
/// The coerced query document is passed to the driver unmodified, and the
/// full result set is materialized before returning.
///
/// # Arguments
/// * `context` - Connector context
/// * `request` - Request carrying `query`, `collectionName`, optional `dbname`
///
/// # Returns
/// * `Result<Vec<Document>>` - Matching documents, in driver order
pub async fn find(context: ConnectorContext, request: Request) -> Result<Vec<Document>> {
    let filter = request.document("query")?.resolve("query")?;
    let collection_name = request.text("collectionName")?;

    let db = context.database(request.text_opt("dbname").as_deref()).await?;
    debug!("Finding documents in '{collection_name}' with filter: {filter:?}");

    let collection: Collection<Document> = db.collection(&collection_name);
    let cursor = collection.find(filter).await?;
    let documents: Vec<Document> = cursor.try_collect().await?;

    info!("Find returned {} documents", documents.len());
    Ok(documents)
}

/// Build a single-field equality filter.
fn equality_filter(field: &str, value: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(field, value);
    filter
}

/// Merge the generated id into the source document.
///
/// Source documents are assumed not to carry an `_id` of their own, so this
/// adds a key rather than overwriting one.
fn with_inserted_id(mut document: Document, id: Bson) -> Document {
    document.insert("_id", id);
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;
    use crate::connection::ConnectionManager;
    use crate::error::{ConnectionError, ConnectorError, RequestError};
    use mongodb::bson::oid::ObjectId;

    fn unconnected_context() -> ConnectorContext {
        let manager = ConnectionManager::new(
            "mongodb://localhost:27017".to_string(),
            ConnectionConfig::default(),
        );
        ConnectorContext::new(manager, "test")
    }

    #[test]
    fn test_equality_filter() {
        let filter = equality_filter("name", "Ann");
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.get_str("name").unwrap(), "Ann");
    }

    #[test]
    fn test_with_inserted_id_adds_exactly_one_key() {
        let mut document = Document::new();
        document.insert("name", "Ann");

        let id = ObjectId::new();
        let saved = with_inserted_id(document.clone(), Bson::ObjectId(id));

        assert_eq!(saved.len(), document.len() + 1);
        assert_eq!(saved.get_str("name").unwrap(), "Ann");
        assert_eq!(saved.get_object_id("_id").unwrap(), id);
    }

    #[tokio::test]
    async fn test_insert_one_rejects_malformed_json_before_any_driver_work() {
        // The manager has no client, so any attempt to resolve a handle
        // would surface NotConnected. Seeing a decode error instead proves
        // coercion happens first and nothing reaches the driver.
        let context = unconnected_context();
        let request = Request::new()
            .with_param("doc", "{not json")
            .with_param("collectionName", "people");

        let err = insert_one(context, request).await.unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Request(RequestError::Json { name, .. }) if name == "doc"
        ));
    }

    #[tokio::test]
    async fn test_find_rejects_malformed_query_before_any_driver_work() {
        let context = unconnected_context();
        let request = Request::new()
            .with_param("query", r#"{"name": "#)
            .with_param("collectionName", "people");

        let err = find(context, request).await.unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Request(RequestError::Json { name, .. }) if name == "query"
        ));
    }

    #[tokio::test]
    async fn test_insert_one_with_valid_payload_stops_at_resolution() {
        // With a well-formed document, the same unconnected context fails
        // at handle resolution, confirming the decode step already passed.
        let context = unconnected_context();
        let request = Request::new()
            .with_param("doc", r#"{"name": "Ann"}"#)
            .with_param("collectionName", "people");

        let err = insert_one(context, request).await.unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Connection(ConnectionError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_missing_required_parameters_are_decode_errors() {
        let context = unconnected_context();

        let err = create(context.clone(), Request::new()).await.unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Request(RequestError::Missing(name)) if name == "collectionName"
        ));

        let err = find_one_equals(context, Request::new()).await.unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Request(RequestError::Missing(name)) if name == "field"
        ));
    }

    #[test]
    fn test_collection_info_serialization() {
        let info = CollectionInfo {
            name: "people".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            serde_json::json!({"name": "people"})
        );
    }
}
