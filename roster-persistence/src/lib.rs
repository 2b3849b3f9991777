pub mod connection;
pub mod entities;
pub mod repositories;
pub mod sql_store;

pub use sql_store::SqlRosterStore;

use sea_orm::{DatabaseConnection, DbErr};

pub struct DatabaseManager {
    connection: DatabaseConnection,
}

impl DatabaseManager {
    /// Connects to `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, DbErr> {
        let connection = connection::connect_and_migrate(database_url).await?;
        Ok(Self { connection })
    }

    pub fn roster_store(&self) -> SqlRosterStore {
        SqlRosterStore::new(self.connection.clone())
    }
}
