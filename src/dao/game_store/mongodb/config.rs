use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

/// Database used when neither the URI nor the configuration names one.
pub const DEFAULT_DATABASE_NAME: &str = "game_stats";

/// Driver options and database name resolved from a connection string.
#[derive(Clone)]
pub struct MongoConfig {
    /// Parsed client options.
    pub options: ClientOptions,
    /// Database holding the game collections.
    pub database_name: String,
}

impl MongoConfig {
    /// Parse `uri`. The database is taken from `db_name`, then from the URI path, then
    /// [`DEFAULT_DATABASE_NAME`].
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;

        let database_name = db_name
            .map(str::to_owned)
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_owned());

        Ok(Self {
            options,
            database_name,
        })
    }
}
