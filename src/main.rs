use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use doc_versions::config::{VersionsConfig, log_path};
use doc_versions::logging;
use doc_versions::version::details::fetch_versions_details;
use doc_versions::version::links::PathUrlBuilder;
use doc_versions::version::repository::JsonVersionRepository;
use doc_versions::version::types::VersionQuery;
use doc_versions::version::vulns::JsonVulnDb;

#[derive(Parser)]
#[command(name = "doc-versions")]
#[command(version, about = "Build the Versions tab of a Go package index page")]
struct Cli {
    /// Write log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Log file (defaults to the data directory)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the versions details of a unit as JSON
    Render {
        /// JSON array of version records
        #[arg(long)]
        records: PathBuf,

        /// Module the unit resolved to
        #[arg(long)]
        module: String,

        /// Import path of the unit (defaults to the module path)
        #[arg(long)]
        path: Option<String>,

        /// JSON array of vulnerability entries
        #[arg(long)]
        vulns: Option<PathBuf>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli.log_file.unwrap_or_else(log_path);
    let _guard = logging::init(&log_file, cli.log_json)?;

    match cli.command {
        Command::Render {
            records,
            module,
            path,
            vulns,
            config,
            pretty,
        } => {
            let config = load_config(config.as_deref())?;
            let repo = JsonVersionRepository::open(&records)?;
            let vulns = match vulns {
                Some(path) => JsonVulnDb::open(&path)?,
                None => JsonVulnDb::default(),
            };
            let urls = PathUrlBuilder::new(&config);
            let unit_path = path.unwrap_or_else(|| module.clone());
            let query = VersionQuery::new(&module, &unit_path);

            info!(
                "Rendering versions of {} in {}",
                query.unit_path, query.module_path
            );
            let details = fetch_versions_details(&repo, &query, &urls, &vulns, &config)?;

            let output = if pretty {
                serde_json::to_string_pretty(&details)?
            } else {
                serde_json::to_string(&details)?
            };
            println!("{}", output);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<VersionsConfig> {
    let Some(path) = path else {
        return Ok(VersionsConfig::default());
    };
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
