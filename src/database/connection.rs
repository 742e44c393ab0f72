use crate::config::DatabaseConfig;
use crate::entities::{menu_item_entity, order_entity, user_entity};
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let pool = Database::connect(options).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    Ok(())
}

/// Creates every table straight from the entity definitions. Used for
/// throwaway sqlite databases where the migration history is irrelevant.
pub async fn create_tables(db: &DbPool) -> AppResult<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let users_table = schema.create_table_from_entity(user_entity::Entity);
    let menu_table = schema.create_table_from_entity(menu_item_entity::Entity);
    let orders_table = schema.create_table_from_entity(order_entity::Entity);

    db.execute(builder.build(&users_table)).await?;
    db.execute(builder.build(&menu_table)).await?;
    db.execute(builder.build(&orders_table)).await?;

    Ok(())
}
