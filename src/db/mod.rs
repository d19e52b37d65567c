pub mod admin_messages;
pub mod cuvees;
pub mod invoices;
pub mod orders;
pub mod partenaires;
pub mod productions;
pub mod settings;
pub mod stocks;
pub mod users;
pub mod vineyards;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::Config;

/// Create the bounded SeaORM connection pool described by `config`.
pub async fn create_pool(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(config.db_connect_timeout)
        .acquire_timeout(config.db_connect_timeout)
        .sqlx_logging(false);

    Database::connect(options).await
}
