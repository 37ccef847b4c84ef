use anyhow::Result;
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pricewatch::database::connection::{establish_connection, get_database_url};
use pricewatch::database::migrations::Migrator;
use pricewatch::server::app::{create_app, ServerConfig};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        #[clap(short, long, default_value = "3000")]
        port: u16,
        #[clap(short, long, default_value = "pricewatch.db")]
        database: String,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Database maintenance
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Apply pending migrations and exit
    Migrate {
        #[clap(short, long, default_value = "pricewatch.db")]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pricewatch=info,tower_http=info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
        } => {
            let db = establish_connection(&get_database_url(Some(&database))).await?;
            Migrator::up(&db, None).await?;

            let config = ServerConfig::from_env(cors_origin);
            let app = create_app(db, config)?;

            let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
            info!("Listening for requests on {}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
        Commands::Db {
            command: DbCommands::Migrate { database },
        } => {
            let db = establish_connection(&get_database_url(Some(&database))).await?;
            Migrator::up(&db, None).await?;
            info!("Migrations applied");
        }
    }

    Ok(())
}
