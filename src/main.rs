use clap::{Parser, Subcommand};
use postquill::error::Result;

mod cli;

#[derive(Parser)]
#[command(name = "postquill")]
#[command(version = "0.1.0")]
#[command(about = "Turn Postgres tables into GraphQL APIs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a starter configuration
    Init {
        /// Database connection URL to embed in the configuration
        #[arg(long)]
        database_url: Option<String>,

        /// Output config file path (if not specified, outputs to stdout)
        #[arg(long)]
        output: Option<String>,
    },

    /// Start GraphQL server
    Serve {
        /// Config file path
        #[arg(long, default_value = "postquill.toml")]
        config: String,

        /// Server port (overrides the config file and the PORT environment variable)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write the schema SDL without starting the server
    ExportSchema {
        /// Config file path
        #[arg(long, default_value = "postquill.toml")]
        config: String,

        /// Output path (defaults to graphql.export_schema_path from the config)
        #[arg(long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            database_url,
            output,
        } => {
            cli::init::run(database_url, output).await?;
        }
        Commands::Serve { config, port } => {
            cli::serve::run(config, port).await?;
        }
        Commands::ExportSchema { config, output } => {
            cli::export::run(config, output).await?;
        }
    }

    Ok(())
}
