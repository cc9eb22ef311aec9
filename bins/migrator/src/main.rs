//! Migration CLI for the Shearbook schema.
//!
//! Wraps sea-orm-migration's command line: `up`, `down`, `status` and
//! `fresh` all run against `DATABASE_URL` (a `.env` file is honored).

use sea_orm_migration::cli;

use shearbook_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
