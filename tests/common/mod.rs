//! Common test utilities

use mongodb::bson::Document;
use mongodb::{Client, Database};

use horizon_backend::db::collections;

/// Connect to a per-test database and drop the collections under test.
///
/// Tests run in parallel, so each gets its own database named after the
/// test. Returns `None` when MONGODB_URI is not set so DB-backed tests can
/// skip cleanly on machines without a MongoDB instance.
pub async fn setup_test_db(test_name: &str) -> Option<Database> {
    dotenvy::dotenv().ok();
    let uri = std::env::var("MONGODB_URI").ok()?;

    let client = Client::with_uri_str(&uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&format!("horizon_test_{test_name}"));

    for collection in [
        collections::USERS,
        collections::PRODUCTS,
        collections::CART,
        collections::FAVORITES,
        collections::PACKAGE_PURCHASES,
        collections::WITHDRAWALS,
    ] {
        db.collection::<Document>(collection)
            .drop(None)
            .await
            .expect("Failed to drop collection");
    }

    Some(db)
}
