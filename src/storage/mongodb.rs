//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoDishStore`, a [`DishStore`] bound to one database and one
//! collection.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! dishes-rs = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Document model
//!
//! Dishes are stored with camelCase field names and embed their categories:
//!
//! ```json
//! { "_id": "...", "name": "Thai Curry", "price": 12.5,
//!   "category": [ { "_id": "...", "name": "Main dishes" } ] }
//! ```
//!
//! Identifiers may be strings or ObjectIds, and prices may be any BSON number
//! including Decimal128. Documents are converted through `serde_json::Value`
//! (relaxed extended JSON) after ObjectIds have been rewritten to their hex
//! form and Decimal128 prices to their exact decimal text. Identifier queries
//! match both id representations; price bounds are sent as Decimal128 so the
//! comparison is exact against decimal prices.

use crate::config::MongoSettings;
use crate::core::{Dish, DishCriteria, DishStore, StoreError, compile_name_pattern};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Decimal128, Document, doc};
use mongodb::{Client, Collection, Database};
use rust_decimal::Decimal;
use std::str::FromStr;

const BACKEND: &str = "mongodb";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Rewrite an ObjectId `_id` into its hex string form
fn stringify_object_id(doc: &mut Document) {
    let hex = match doc.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        _ => return,
    };
    doc.insert("_id", hex);
}

/// Rewrite a Decimal128 `price` into its decimal text
///
/// Relaxed extended JSON renders Decimal128 as `{"$numberDecimal": ..}`,
/// which does not deserialize as a number.
fn stringify_decimal_price(doc: &mut Document) {
    let text = match doc.get("price") {
        Some(Bson::Decimal128(price)) => price.to_string(),
        _ => return,
    };
    doc.insert("price", text);
}

/// Decimal bound as a BSON Decimal128
fn decimal_bson(value: Decimal) -> Result<Bson, StoreError> {
    Decimal128::from_str(&value.to_string())
        .map(Bson::Decimal128)
        .map_err(|e| StoreError::unavailable(BACKEND, format!("Invalid decimal bound {}: {}", value, e)))
}

/// Convert a dish document into a [`Dish`]
///
/// ObjectId identifiers (of the dish and of each embedded category) become
/// strings, and a Decimal128 price is read exactly.
fn document_to_dish(mut doc: Document) -> Result<Dish, StoreError> {
    stringify_object_id(&mut doc);
    stringify_decimal_price(&mut doc);

    if let Ok(categories) = doc.get_array_mut("category") {
        for category in categories.iter_mut() {
            if let Bson::Document(category) = category {
                stringify_object_id(category);
            }
        }
    }

    let json = Bson::Document(doc).into_relaxed_extjson();
    serde_json::from_value(json).map_err(|e| {
        StoreError::unavailable(BACKEND, format!("Failed to deserialize dish from document: {}", e))
    })
}

/// BSON values an identifier may be stored as: always the string, plus the
/// ObjectId when the string is a valid one.
fn id_variants(id: &str) -> Vec<Bson> {
    let mut variants = vec![Bson::String(id.to_string())];
    if let Ok(oid) = ObjectId::parse_str(id) {
        variants.push(Bson::ObjectId(oid));
    }
    variants
}

fn ids_variants(ids: &[String]) -> Vec<Bson> {
    ids.iter().flat_map(|id| id_variants(id)).collect()
}

/// Case-(in)sensitive `$regex` condition on the dish name
fn name_regex(pattern: &str, case_insensitive: bool) -> Document {
    let options = if case_insensitive { "i" } else { "" };
    doc! { "name": { "$regex": pattern, "$options": options } }
}

/// Compound native filter equivalent to [`DishCriteria::apply`]
///
/// The name stage is a literal substring, so the term is escaped before it
/// is used as a regular expression. The popularity stage contributes nothing.
fn criteria_filter(criteria: &DishCriteria) -> Result<Document, StoreError> {
    let mut clauses: Vec<Document> = Vec::new();

    if let Some(ids) = criteria.category_filter() {
        clauses.push(doc! { "category._id": { "$in": ids_variants(ids) } });
    }
    if let Some(term) = criteria.search_term() {
        clauses.push(name_regex(&regex::escape(term), true));
    }
    if let Some(ceiling) = criteria.price_ceiling() {
        clauses.push(doc! { "price": { "$lte": decimal_bson(ceiling)? } });
    }

    Ok(match clauses.len() {
        0 => doc! {},
        1 => clauses.remove(0),
        _ => doc! { "$and": clauses },
    })
}

// ---------------------------------------------------------------------------
// MongoDishStore
// ---------------------------------------------------------------------------

/// Dish store backed by a MongoDB collection.
///
/// # Example
///
/// ```rust,ignore
/// use dishes::config::MongoSettings;
/// use dishes::storage::MongoDishStore;
///
/// let store = MongoDishStore::connect(&MongoSettings::default()).await?;
/// let cheap = store.fetch_by_max_price(dec!(10)).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDishStore {
    collection: Collection<Document>,
}

impl MongoDishStore {
    /// Bind to `collection_name` in an existing database handle
    pub fn new(database: &Database, collection_name: &str) -> Self {
        Self {
            collection: database.collection(collection_name),
        }
    }

    /// Connect using the given settings and verify the server answers a ping
    pub async fn connect(settings: &MongoSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to MongoDB at {}",
            settings.redacted_connection_string()
        );

        let client = Client::with_uri_str(settings.client_uri())
            .await
            .map_err(|e| StoreError::unavailable(BACKEND, format!("Failed to connect to MongoDB: {}", e)))?;

        let database = client.database(&settings.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::unavailable(BACKEND, format!("MongoDB ping failed: {}", e)))?;

        tracing::info!(
            database = %settings.database,
            collection = %settings.collection,
            "Connected to MongoDB"
        );

        Ok(Self::new(&database, &settings.collection))
    }

    /// Run a find with `filter` and decode every document
    async fn find(&self, filter: Document, what: &str) -> Result<Vec<Dish>, StoreError> {
        tracing::debug!(%filter, "mongodb find");

        let cursor = self.collection.find(filter).await.map_err(|e| {
            StoreError::unavailable(BACKEND, format!("Failed to query {}: {}", what, e))
        })?;

        let docs: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            StoreError::unavailable(BACKEND, format!("Failed to collect {}: {}", what, e))
        })?;

        docs.into_iter().map(document_to_dish).collect()
    }
}

#[async_trait]
impl DishStore for MongoDishStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn fetch_all(&self) -> Result<Vec<Dish>, StoreError> {
        self.find(doc! {}, "dishes").await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Dish>, StoreError> {
        let doc = self
            .collection
            .find_one(doc! { "_id": { "$in": id_variants(id) } })
            .await
            .map_err(|e| StoreError::unavailable(BACKEND, format!("Failed to get dish: {}", e)))?;

        doc.map(document_to_dish).transpose()
    }

    async fn fetch_by_category(&self, category_ids: &[String]) -> Result<Vec<Dish>, StoreError> {
        let filter = doc! { "category._id": { "$in": ids_variants(category_ids) } };
        self.find(filter, "dishes by category").await
    }

    async fn fetch_by_max_price(&self, max_price: Decimal) -> Result<Vec<Dish>, StoreError> {
        let filter = doc! { "price": { "$lte": decimal_bson(max_price)? } };
        self.find(filter, "dishes by price").await
    }

    async fn fetch_by_min_popularity(&self, min_likes: i64) -> Result<Vec<Dish>, StoreError> {
        self.find(doc! { "price": { "$gte": min_likes } }, "dishes by likes")
            .await
    }

    async fn fetch_by_name_match(
        &self,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Vec<Dish>, StoreError> {
        compile_name_pattern(pattern, case_insensitive)?;
        self.find(name_regex(pattern, case_insensitive), "dishes by name")
            .await
    }

    async fn fetch_matching(&self, criteria: &DishCriteria) -> Result<Vec<Dish>, StoreError> {
        self.find(criteria_filter(criteria)?, "dishes matching criteria")
            .await
    }
}
