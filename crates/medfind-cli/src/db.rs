//! `db ping` and `db migrate`.

pub(crate) async fn run_db_ping(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    medfind_db::health_check(pool).await?;
    println!("database reachable");
    Ok(())
}

/// Apply pending migrations and report how many ran.
///
/// # Errors
///
/// Returns an error if any migration fails.
pub(crate) async fn run_db_migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let applied = medfind_db::run_migrations(pool).await?;
    tracing::info!(applied, "migrations complete");
    if applied == 0 {
        println!("database schema is up to date");
    } else {
        println!("applied {applied} migration(s)");
    }
    Ok(())
}
