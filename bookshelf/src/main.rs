use bookshelf::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    #[cfg(feature = "database")]
    if let Some(db) = config.database.clone() {
        let pool = bookshelf::database::create_pool(&db).await?;
        let books = PgBookRepository::new(pool);
        if db.auto_create_schema {
            books.ensure_schema().await?;
        }
        return run(config, books).await;
    }

    #[cfg(not(feature = "database"))]
    if config.database.is_some() {
        tracing::warn!("[database] is configured but this build has no PostgreSQL support");
    }

    tracing::warn!("No database configured; books are kept in memory and lost on shutdown");
    run(config, MemoryBookRepository::new()).await
}
