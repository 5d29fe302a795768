//! `provision`: reconcile the catalog against a PocketBase server.
//!
//! Configuration comes from flags or the environment (a `.env` file is loaded first).
//! Admin credentials have no built-in fallback.

use clap::Parser;
use schema_provisioner::{load_catalog, provision, AppError, Credentials, RunMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "provision", version, about = "Create collections, add missing fields and apply access rules")]
struct Cli {
    /// Server base URL
    #[arg(long, env = "POCKETBASE_URL", default_value = "http://127.0.0.1:8090")]
    url: String,

    /// Admin email
    #[arg(long, env = "POCKETBASE_ADMIN_EMAIL")]
    email: String,

    /// Admin password
    #[arg(long, env = "POCKETBASE_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// Catalog JSON file; the built-in catalog is used when omitted
    #[arg(long, env = "PROVISION_CATALOG")]
    catalog: Option<PathBuf>,

    /// Only list remote collections and print what would change
    #[arg(long)]
    dry_run: bool,

    /// Exit non-zero when any collection or rule step failed
    #[arg(long)]
    strict: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "schema_provisioner=debug"
    } else {
        "schema_provisioner=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .init();

    if let Err(e) = execute(cli).await {
        tracing::error!(error = %e, "provisioning aborted");
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn execute(cli: Cli) -> Result<(), AppError> {
    let catalog = load_catalog(cli.catalog.as_deref()).await?;
    let credentials = Credentials::new(cli.url, cli.email, cli.password);
    let mode = if cli.dry_run { RunMode::DryRun } else { RunMode::Apply };

    let report = provision(&credentials, &catalog, mode).await?;
    print!("{}", report.render_summary());

    if cli.strict {
        report.require_complete()?;
    }
    Ok(())
}
