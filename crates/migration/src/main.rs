use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::prelude::*;

const USAGE: &str = "Usage: cargo run -p migration -- [accounts|ledgers] [up|down|fresh|status]";

async fn apply<M: MigratorTrait>(db: &DatabaseConnection, cmd: &str) -> Result<(), DbErr> {
    match cmd {
        "up" => M::up(db, None).await,
        "down" => M::down(db, None).await,
        "fresh" => M::fresh(db).await,
        "status" => M::status(db).await,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let schema = args.next().unwrap_or_else(|| "ledgers".to_string());
    let cmd = args.next().unwrap_or_else(|| "up".to_string());

    let db_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| format!("sqlite:./{schema}.db?mode=rwc"));

    let db = Database::connect(&db_url).await?;

    match schema.as_str() {
        "accounts" => apply::<migration::AccountsMigrator>(&db, &cmd).await?,
        "ledgers" => apply::<migration::LedgersMigrator>(&db, &cmd).await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
