//! Record store module
//!
//! MongoDB connection plus the small set of document primitives the
//! storefront routes share: insert, newest-first listing, partial update
//! and delete against loosely-typed collections.

use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, to_document, Document};
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use mongodb::{Client, Database};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Collection names, kept identical to the stored data set.
pub mod collections {
    pub const HERO_BANNERS: &str = "heroSectionBanner";
    pub const FEATURED_ITEMS: &str = "featuredItems";
    pub const PRODUCTS: &str = "products";
    pub const CATEGORIES: &str = "categories";
    pub const USERS: &str = "users";
    pub const ORDERS: &str = "orders";
    pub const WISHLIST: &str = "wishlist";
    pub const CART: &str = "cart";
    pub const FAVORITES: &str = "love";
    pub const PACKAGE_PURCHASES: &str = "buyPackage";
    pub const RESALE_LISTINGS: &str = "sellProduct";
    pub const WITHDRAWALS: &str = "withdraw";
}

/// Connect to MongoDB
pub async fn connect(uri: &str) -> Result<Client, mongodb::error::Error> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some("horizon-backend".to_string());
    Client::with_options(options)
}

/// Round-trip a ping to verify the connection before serving traffic
pub async fn verify_connection(db: &Database) -> Result<(), mongodb::error::Error> {
    db.run_command(doc! { "ping": 1 }, None).await?;
    Ok(())
}

/// Parse a path identifier into an ObjectId
pub fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidRequest(format!("Invalid identifier: {id}")))
}

// =========================================================================
// Mutation summaries returned to clients
// =========================================================================

/// Result of an insert, as reported to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSummary {
    pub inserted_id: String,
}

impl From<InsertOneResult> for InsertSummary {
    fn from(result: InsertOneResult) -> Self {
        let inserted_id = result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| result.inserted_id.to_string());
        Self { inserted_id }
    }
}

/// Result of an update, as reported to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationSummary {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateResult> for MutationSummary {
    fn from(result: UpdateResult) -> Self {
        Self {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        }
    }
}

/// Result of a delete, as reported to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteSummary {
    fn from(result: DeleteResult) -> Self {
        Self {
            deleted_count: result.deleted_count,
        }
    }
}

// =========================================================================
// Shared document primitives
// =========================================================================

/// Convert a JSON request body into a bson document
pub fn body_to_document(value: &Value) -> AppResult<Document> {
    to_document(value).map_err(|e| AppError::InvalidRequest(format!("Malformed document: {e}")))
}

/// Insert a loosely-typed document into a collection
pub async fn insert_document(
    db: &Database,
    collection: &str,
    document: Document,
) -> AppResult<InsertSummary> {
    let result = db
        .collection::<Document>(collection)
        .insert_one(document, None)
        .await?;
    Ok(result.into())
}

/// List a collection's documents, newest first
pub async fn list_documents(
    db: &Database,
    collection: &str,
    filter: Option<Document>,
) -> AppResult<Vec<Document>> {
    let options = FindOptions::builder().sort(doc! { "_id": -1 }).build();
    let cursor = db
        .collection::<Document>(collection)
        .find(filter, options)
        .await?;
    let documents = cursor.try_collect().await?;
    Ok(documents)
}

/// Apply a field-level partial update to a document by identifier
pub async fn update_document(
    db: &Database,
    collection: &str,
    id: &str,
    mut fields: Document,
) -> AppResult<MutationSummary> {
    let oid = parse_object_id(id)?;
    // The identifier is immutable; drop any copy echoed back by the client.
    fields.remove("_id");
    let result = db
        .collection::<Document>(collection)
        .update_one(doc! { "_id": oid }, doc! { "$set": fields }, None)
        .await?;
    Ok(result.into())
}

/// Delete a document by identifier
pub async fn delete_document(
    db: &Database,
    collection: &str,
    id: &str,
) -> AppResult<DeleteSummary> {
    let oid = parse_object_id(id)?;
    let result = db
        .collection::<Document>(collection)
        .delete_one(doc! { "_id": oid }, None)
        .await?;
    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        let result = parse_object_id("not-an-object-id");
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_parse_object_id_accepts_hex() {
        let oid = ObjectId::new();
        let parsed = parse_object_id(&oid.to_hex()).unwrap();
        assert_eq!(parsed, oid);
    }

    #[test]
    fn test_mutation_summary_wire_format() {
        let summary = MutationSummary {
            matched_count: 1,
            modified_count: 1,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["matchedCount"], 1);
        assert_eq!(json["modifiedCount"], 1);
    }

    #[test]
    fn test_body_to_document_rejects_non_objects() {
        let result = body_to_document(&serde_json::json!([1, 2, 3]));
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_body_to_document_keeps_nested_fields() {
        let doc = body_to_document(&serde_json::json!({
            "title": "Summer sale",
            "cta": { "label": "Shop now", "href": "/products" }
        }))
        .unwrap();
        assert_eq!(doc.get_str("title").unwrap(), "Summer sale");
        assert!(doc.get_document("cta").is_ok());
    }
}
