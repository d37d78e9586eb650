//! API Routes
//!
//! HTTP endpoint definitions for the storefront. Most endpoints are thin
//! wrappers over the shared document primitives in [`crate::db`]; the two
//! PATCH decision endpoints delegate to the approval workflow handlers.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use mongodb::bson::{doc, Bson, DateTime, Document};
use mongodb::Database;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{
    body_to_document, collections, delete_document, insert_document, list_documents,
    parse_object_id, update_document, DeleteSummary, InsertSummary, MutationSummary,
};
use crate::error::{AppError, AppResult};
use crate::handlers::{
    PackageApprovalHandler, PackageDecisionCommand, WithdrawalApprovalHandler,
    WithdrawalDecisionCommand,
};

// =========================================================================
// Request/Response types
// =========================================================================

/// Body of PATCH /buy-package/:id
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDecisionRequest {
    #[serde(default)]
    pub package_status: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
}

/// Body of PATCH /withdraw/:id
#[derive(Debug, Deserialize)]
pub struct WithdrawalDecisionRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Response of a settled decision
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub success: bool,
    pub message: String,
    pub result: MutationSummary,
}

/// Body of POST /cart and POST /love
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub product_id: String,
}

/// Query parameters of GET /wishlist
#[derive(Debug, Deserialize)]
pub struct WishlistQuery {
    #[serde(default)]
    pub email: Option<String>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<Database> {
    Router::new()
        // Admin - homepage management
        .route(
            "/hero-section-banner",
            post(create_banner).get(list_banners),
        )
        .route(
            "/hero-section-banner/:id",
            patch(update_banner).delete(delete_banner),
        )
        .route(
            "/featured-items",
            post(create_featured_item).get(list_featured_items),
        )
        .route(
            "/featured-items/:id",
            patch(update_featured_item).delete(delete_featured_item),
        )
        // Admin - product management
        .route("/products", post(create_product).get(list_products))
        .route("/products/:id", patch(update_product).delete(delete_product))
        // Admin - category management
        .route("/categories", post(create_category).get(list_categories))
        .route(
            "/categories/:id",
            patch(update_category).delete(delete_category),
        )
        // Admin - user management
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:email",
            get(get_user_by_email).patch(update_user).delete(delete_user),
        )
        // Admin - order management
        .route("/orders", post(create_order).get(list_orders))
        .route(
            "/orders/:id",
            get(get_order).patch(update_order).delete(delete_order),
        )
        // Wishlist
        .route("/wishlist", post(add_to_wishlist).get(list_wishlist))
        .route("/wishlist/:id", delete(remove_from_wishlist))
        // Cart
        .route("/cart", post(add_to_cart).get(list_cart))
        .route("/cart/:id", delete(remove_from_cart))
        // Favorites
        .route("/love", post(add_favorite).get(list_favorites))
        .route("/love/:id", delete(remove_favorite))
        // Package purchases
        .route(
            "/buy-package",
            post(create_package_purchase).get(list_package_purchases),
        )
        .route(
            "/buy-package/:id",
            patch(decide_package_purchase).delete(delete_package_purchase),
        )
        // Resale listings
        .route(
            "/sell-product",
            post(create_resale_listing).get(list_resale_listings),
        )
        // Withdrawals
        .route("/withdraw", post(create_withdrawal).get(list_withdrawals))
        .route("/withdraw/:id", patch(decide_withdrawal))
}

// =========================================================================
// Admin - homepage management
// =========================================================================

async fn create_banner(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let document = body_to_document(&body)?;
    insert_document(&db, collections::HERO_BANNERS, document)
        .await
        .map(Json)
}

async fn list_banners(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::HERO_BANNERS, None)
        .await
        .map(Json)
}

async fn update_banner(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<MutationSummary>> {
    let fields = body_to_document(&body)?;
    update_document(&db, collections::HERO_BANNERS, &id, fields)
        .await
        .map(Json)
}

async fn delete_banner(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::HERO_BANNERS, &id)
        .await
        .map(Json)
}

async fn create_featured_item(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let document = body_to_document(&body)?;
    insert_document(&db, collections::FEATURED_ITEMS, document)
        .await
        .map(Json)
}

async fn list_featured_items(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::FEATURED_ITEMS, None)
        .await
        .map(Json)
}

async fn update_featured_item(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<MutationSummary>> {
    let fields = body_to_document(&body)?;
    update_document(&db, collections::FEATURED_ITEMS, &id, fields)
        .await
        .map(Json)
}

async fn delete_featured_item(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::FEATURED_ITEMS, &id)
        .await
        .map(Json)
}

// =========================================================================
// Admin - product management
// =========================================================================

async fn create_product(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let mut document = body_to_document(&body)?;
    // New products start with an empty sales record.
    document.insert("createdAt", DateTime::now());
    document.insert("totalSell", 0_i32);
    document.insert("rating", 0_i32);
    insert_document(&db, collections::PRODUCTS, document)
        .await
        .map(Json)
}

async fn list_products(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::PRODUCTS, None)
        .await
        .map(Json)
}

async fn update_product(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<MutationSummary>> {
    let fields = body_to_document(&body)?;
    update_document(&db, collections::PRODUCTS, &id, fields)
        .await
        .map(Json)
}

async fn delete_product(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::PRODUCTS, &id)
        .await
        .map(Json)
}

// =========================================================================
// Admin - category management
// =========================================================================

async fn create_category(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let document = body_to_document(&body)?;
    insert_document(&db, collections::CATEGORIES, document)
        .await
        .map(Json)
}

async fn list_categories(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::CATEGORIES, None)
        .await
        .map(Json)
}

async fn update_category(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<MutationSummary>> {
    let fields = body_to_document(&body)?;
    let summary = update_document(&db, collections::CATEGORIES, &id, fields).await?;
    if summary.matched_count == 0 {
        return Err(AppError::CategoryNotFound(id));
    }
    Ok(Json(summary))
}

async fn delete_category(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::CATEGORIES, &id)
        .await
        .map(Json)
}

// =========================================================================
// Admin - user management
// =========================================================================

/// Register a user. When the body carries a `reference` code, the referrer
/// is credited with a `{name, date}` entry before the new account is stored.
async fn create_user(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let document = body_to_document(&body)?;
    let users = db.collection::<Document>(collections::USERS);

    if let Ok(reference) = document.get_str("reference") {
        if !reference.is_empty() {
            let entry = doc! {
                "name": document.get("name").cloned().unwrap_or(Bson::Null),
                "date": document.get("date").cloned().unwrap_or(Bson::Null),
            };
            let credited = users
                .update_one(
                    doc! { "reference": reference },
                    doc! { "$push": { "myReferralUser": entry } },
                    None,
                )
                .await?;
            tracing::debug!(reference, matched = credited.matched_count, "referral credited");
        }
    }

    let result = users.insert_one(document, None).await?;
    Ok(Json(result.into()))
}

async fn list_users(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::USERS, None).await.map(Json)
}

async fn get_user_by_email(
    State(db): State<Database>,
    Path(email): Path<String>,
) -> AppResult<Json<Document>> {
    let user = db
        .collection::<Document>(collections::USERS)
        .find_one(doc! { "email": &email }, None)
        .await?
        .ok_or(AppError::UserNotFound(email))?;
    Ok(Json(user))
}

async fn update_user(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<MutationSummary>> {
    let fields = body_to_document(&body)?;
    update_document(&db, collections::USERS, &id, fields)
        .await
        .map(Json)
}

async fn delete_user(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::USERS, &id)
        .await
        .map(Json)
}

// =========================================================================
// Admin - order management
// =========================================================================

async fn create_order(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let document = body_to_document(&body)?;
    insert_document(&db, collections::ORDERS, document)
        .await
        .map(Json)
}

async fn list_orders(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::ORDERS, None)
        .await
        .map(Json)
}

async fn get_order(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<Document>> {
    let oid = parse_object_id(&id)?;
    let order = db
        .collection::<Document>(collections::ORDERS)
        .find_one(doc! { "_id": oid }, None)
        .await?
        .ok_or(AppError::OrderNotFound(id))?;
    Ok(Json(order))
}

async fn update_order(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<MutationSummary>> {
    let fields = body_to_document(&body)?;
    update_document(&db, collections::ORDERS, &id, fields)
        .await
        .map(Json)
}

async fn delete_order(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::ORDERS, &id)
        .await
        .map(Json)
}

// =========================================================================
// Wishlist
// =========================================================================

async fn add_to_wishlist(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let document = body_to_document(&body)?;
    insert_document(&db, collections::WISHLIST, document)
        .await
        .map(Json)
}

async fn list_wishlist(
    State(db): State<Database>,
    Query(query): Query<WishlistQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let filter = query.email.map(|email| doc! { "email": email });
    list_documents(&db, collections::WISHLIST, filter)
        .await
        .map(Json)
}

async fn remove_from_wishlist(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::WISHLIST, &id)
        .await
        .map(Json)
}

// =========================================================================
// Cart
// =========================================================================

/// Copy a product into the caller's cart, once per product per email.
async fn add_to_cart(
    State(db): State<Database>,
    Json(request): Json<CartItemRequest>,
) -> AppResult<Json<InsertSummary>> {
    if request.email.is_empty() || request.product_id.is_empty() {
        return Err(AppError::InvalidRequest("Invalid request data".to_string()));
    }

    let entry = snapshot_product(&db, &request).await?;

    let cart = db.collection::<Document>(collections::CART);
    let already_in_cart = cart
        .find_one(
            doc! { "email": &request.email, "productId": &*request.product_id },
            None,
        )
        .await?;
    if already_in_cart.is_some() {
        return Err(AppError::DuplicateCartEntry);
    }

    let result = cart.insert_one(entry, None).await?;
    Ok(Json(result.into()))
}

async fn list_cart(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::CART, None).await.map(Json)
}

async fn remove_from_cart(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::CART, &id)
        .await
        .map(Json)
}

/// Load the referenced product and snapshot it for a cart/favorites entry:
/// the product's own `_id` is replaced by a `productId` back-reference plus
/// the owning email.
async fn snapshot_product(db: &Database, request: &CartItemRequest) -> AppResult<Document> {
    let oid = parse_object_id(&request.product_id)?;
    let mut product = db
        .collection::<Document>(collections::PRODUCTS)
        .find_one(doc! { "_id": oid }, None)
        .await?
        .ok_or_else(|| AppError::ProductNotFound(request.product_id.clone()))?;

    product.remove("_id");
    product.insert("productId", request.product_id.as_str());
    product.insert("email", request.email.as_str());
    Ok(product)
}

// =========================================================================
// Favorites
// =========================================================================

async fn add_favorite(
    State(db): State<Database>,
    Json(request): Json<CartItemRequest>,
) -> AppResult<Json<InsertSummary>> {
    if request.email.is_empty() || request.product_id.is_empty() {
        return Err(AppError::InvalidRequest("Invalid data".to_string()));
    }

    let mut entry = snapshot_product(&db, &request).await?;
    entry.insert("lovedAt", DateTime::now());

    let favorites = db.collection::<Document>(collections::FAVORITES);
    let already_loved = favorites
        .find_one(
            doc! { "email": &request.email, "productId": &*request.product_id },
            None,
        )
        .await?;
    if already_loved.is_some() {
        return Err(AppError::DuplicateFavorite);
    }

    let result = favorites.insert_one(entry, None).await?;
    Ok(Json(result.into()))
}

async fn list_favorites(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::FAVORITES, None)
        .await
        .map(Json)
}

async fn remove_favorite(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::FAVORITES, &id)
        .await
        .map(Json)
}

// =========================================================================
// Package purchases
// =========================================================================

async fn create_package_purchase(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let document = body_to_document(&body)?;
    insert_document(&db, collections::PACKAGE_PURCHASES, document)
        .await
        .map(Json)
}

async fn list_package_purchases(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::PACKAGE_PURCHASES, None)
        .await
        .map(Json)
}

async fn delete_package_purchase(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteSummary>> {
    delete_document(&db, collections::PACKAGE_PURCHASES, &id)
        .await
        .map(Json)
}

/// Run the package approval workflow (PATCH /buy-package/:id)
async fn decide_package_purchase(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(request): Json<PackageDecisionRequest>,
) -> AppResult<Json<DecisionResponse>> {
    let mut command = PackageDecisionCommand::new(
        id,
        request.package_status.unwrap_or_default(),
        request.email.unwrap_or_default(),
    );
    if let Some(plan_name) = request.plan_name {
        command = command.with_plan_name(plan_name);
    }

    let outcome = PackageApprovalHandler::new(db).execute(command).await?;

    Ok(Json(DecisionResponse {
        success: true,
        message: outcome.message,
        result: outcome.result,
    }))
}

// =========================================================================
// Resale listings
// =========================================================================

async fn create_resale_listing(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let document = body_to_document(&body)?;
    insert_document(&db, collections::RESALE_LISTINGS, document)
        .await
        .map(Json)
}

async fn list_resale_listings(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::RESALE_LISTINGS, None)
        .await
        .map(Json)
}

// =========================================================================
// Withdrawals
// =========================================================================

async fn create_withdrawal(
    State(db): State<Database>,
    Json(body): Json<Value>,
) -> AppResult<Json<InsertSummary>> {
    let document = body_to_document(&body)?;
    insert_document(&db, collections::WITHDRAWALS, document)
        .await
        .map(Json)
}

async fn list_withdrawals(State(db): State<Database>) -> AppResult<Json<Vec<Document>>> {
    list_documents(&db, collections::WITHDRAWALS, None)
        .await
        .map(Json)
}

/// Run the withdrawal approval workflow (PATCH /withdraw/:id)
async fn decide_withdrawal(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(request): Json<WithdrawalDecisionRequest>,
) -> AppResult<Json<DecisionResponse>> {
    let mut command = WithdrawalDecisionCommand::new(
        id,
        request.status.unwrap_or_default(),
        request.email.unwrap_or_default(),
    );
    if let Some(amount) = request.amount {
        command = command.with_amount(amount);
    }

    let outcome = WithdrawalApprovalHandler::new(db).execute(command).await?;

    Ok(Json(DecisionResponse {
        success: true,
        message: outcome.message,
        result: outcome.result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_decision_request_deserialize() {
        let json = r#"{
            "packageStatus": "Approved",
            "email": "buyer@example.com",
            "planName": "Gold"
        }"#;

        let request: PackageDecisionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.package_status.as_deref(), Some("Approved"));
        assert_eq!(request.plan_name.as_deref(), Some("Gold"));
    }

    #[test]
    fn test_withdrawal_decision_request_defaults() {
        let request: WithdrawalDecisionRequest = serde_json::from_str("{}").unwrap();
        assert!(request.status.is_none());
        assert!(request.email.is_none());
        assert!(request.amount.is_none());
    }

    #[test]
    fn test_cart_item_request_camel_case() {
        let json = r#"{ "email": "buyer@example.com", "productId": "abc123" }"#;
        let request: CartItemRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.product_id, "abc123");
    }

    #[test]
    fn test_decision_response_shape() {
        let response = DecisionResponse {
            success: true,
            message: "Withdraw status updated successfully".to_string(),
            result: MutationSummary {
                matched_count: 1,
                modified_count: 1,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["result"]["matchedCount"], 1);
    }
}
