//! MongoDB database wrapper.

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::StoreResult;

pub const PLUGINS: &str = "plugins";
pub const GROUPS: &str = "groups";
const VERSION: &str = "version";
const COUNTERS: &str = "counters";

/// Schema version written on first initialization.
pub const INITIAL_SCHEMA_VERSION: &str = "1";

/// Single row recording the schema version.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VersionDoc {
    #[serde(rename = "_id")]
    id: i32,
    version: String,
}

/// Auto-increment sequence per collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CounterDoc {
    #[serde(rename = "_id")]
    id: String,
    seq: i64,
}

/// Database wrapper for MongoDB operations.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB with the given URI and database name.
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Get a typed collection from the database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Create unique indexes and the version row if they do not exist yet.
    pub async fn initialize(&self) -> StoreResult<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.collection::<mongodb::bson::Document>(PLUGINS)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "name": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;

        self.collection::<mongodb::bson::Document>(GROUPS)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "external_id": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;

        let versions = self.collection::<VersionDoc>(VERSION);
        match versions.find_one(doc! {}).await? {
            Some(existing) => info!("Schema version {}", existing.version),
            None => {
                versions
                    .insert_one(VersionDoc {
                        id: 1,
                        version: INITIAL_SCHEMA_VERSION.to_string(),
                    })
                    .await?;
                info!("Initialized schema version {}", INITIAL_SCHEMA_VERSION);
            }
        }

        Ok(())
    }

    /// Allocate the next id for `collection`.
    pub async fn next_id(&self, collection: &str) -> StoreResult<i64> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .collection::<CounterDoc>(COUNTERS)
            .find_one_and_update(doc! { "_id": collection }, doc! { "$inc": { "seq": 1_i64 } })
            .with_options(options)
            .await?;

        // upsert + ReturnDocument::After always yields a document
        Ok(counter.map(|c| c.seq).unwrap_or(1))
    }
}
