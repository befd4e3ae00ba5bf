mod analyze;
mod subscribers;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vreverse_core::{AccessPolicy, AppConfig, TARGET_MODELS};

use crate::analyze::AnalyzeArgs;
use crate::subscribers::SubscriberCommands;

#[derive(Debug, Parser)]
#[command(name = "vreverse-cli")]
#[command(about = "V-Reverse media analysis command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reverse-engineer a media file or URL into a master prompt
    Analyze(AnalyzeArgs),
    /// List the supported target engines
    Targets,
    /// Check whether an email passes the subscription gate
    Access {
        #[arg(long)]
        email: String,
    },
    /// Manage the subscriber allow-list
    Subscribers {
        #[command(subcommand)]
        command: SubscriberCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = vreverse_db::PoolConfig::from_app_config(config);
    let pool = vreverse_db::connect_pool(config.require_database_url()?, pool_config).await?;
    Ok(pool)
}

fn print_targets() {
    println!("{:<14}NAME", "ID");
    for target in TARGET_MODELS {
        println!("{:<14}{}", target.id, target.name);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("vreverse-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = vreverse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Analyze(args) => analyze::run_analyze(&config, &args).await?,
        Commands::Targets => print_targets(),
        Commands::Access { email } => {
            let pool = connect(&config).await?;
            let policy = AccessPolicy::new(&config.admin_emails);
            let active = vreverse_db::check_access(&pool, &policy, &email).await?;
            println!("{}", if active { "active" } else { "inactive" });
        }
        Commands::Subscribers { command } => {
            let pool = connect(&config).await?;
            subscribers::run(&pool, command).await?;
        }
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    vreverse_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = vreverse_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
    }

    Ok(())
}
