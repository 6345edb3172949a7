use anyhow::Result;
use clap::{Parser, Subcommand};
use mor_runtime::RevisionKind;

mod commands;

#[derive(Parser)]
#[command(name = "mor")]
#[command(about = "Catalog / marketplace listing reconciler", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (repeatable). Defaults apply when omitted.
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> local...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Apply the stock extract inbox to the catalog
    LoadStock,

    /// Reconcile the catalog against the listing report inbox
    LinkCheck,

    /// Write a revision file for pending pushes
    Export {
        #[command(subcommand)]
        cmd: ExportCmd,
    },

    /// load-stock, link-check, export qty, export prc
    Cycle,
}

#[derive(Subcommand)]
enum DbCmd {
    Status,
    /// Apply SQL migrations (idempotent)
    Migrate,
}

#[derive(Subcommand)]
enum ExportCmd {
    /// Quantity revisions (revise_qty_NNNN.csv)
    Qty,
    /// Price revisions (revise_prc_NNNN.csv)
    Prc,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Db { cmd } => {
            let loaded = commands::load_config(&cli.config_paths)?;
            let pool = commands::connect(&loaded.config).await?;
            match cmd {
                DbCmd::Status => {
                    let s = mor_db::status(&pool).await?;
                    println!("db_ok={} has_articles_table={}", s.ok, s.has_articles_table);
                }
                DbCmd::Migrate => {
                    mor_db::migrate(&pool).await?;
                    println!("migrated=true");
                }
            }
        }

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = mor_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::LoadStock => {
            let ctx = commands::open_for_pass(&cli.config_paths).await?;
            commands::pass::load_stock(&ctx).await?;
        }

        Commands::LinkCheck => {
            let ctx = commands::open_for_pass(&cli.config_paths).await?;
            commands::pass::link_check(&ctx).await?;
        }

        Commands::Export { cmd } => {
            let ctx = commands::open_for_pass(&cli.config_paths).await?;
            let kind = match cmd {
                ExportCmd::Qty => RevisionKind::Quantity,
                ExportCmd::Prc => RevisionKind::Price,
            };
            commands::pass::export(&ctx, kind).await?;
        }

        Commands::Cycle => {
            let ctx = commands::open_for_pass(&cli.config_paths).await?;
            commands::pass::cycle(&ctx).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries the `key=value` outcome lines.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
