//! Trawler CLI - harvest one remote source into the relational store.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trawler::harvest;
use trawler::source::Source;

#[derive(Parser)]
#[command(name = "trawler")]
#[command(version)]
#[command(about = "Harvests software-distribution platform metadata into one relational store")]
#[command(
    long_about = "Trawler pulls project, release, repository and user metadata from module \
forges, GitHub, Docker registries and Gerrit instances into a relational \
database. Runs are idempotent: re-harvesting the same source never creates \
duplicate rows, and repository popularity counters are kept as an \
append-only snapshot history."
)]
#[command(after_long_help = r#"EXAMPLES
    Harvest a module forge:
        $ trawler -d metrics forge https://forge.puppet.com

    Harvest one GitHub organization (token from the environment):
        $ trawler -d metrics github bitergia

    Harvest a single Docker Hub repository:
        $ trawler -d metrics docker https://hub.docker.com library nginx

    List a Gerrit instance's repositories:
        $ trawler -d metrics gerrit review.example.org --user jenkins

    Preview a fetch without writing anything:
        $ trawler --export forge https://forge.puppet.com

ENVIRONMENT VARIABLES
    TRAWLER_DATABASE_URL      Full connection url, overrides the store options
    TRAWLER_DB_PASSWORD       Database user password
    TRAWLER_GITHUB_TOKEN      GitHub personal access token
"#)]
struct Cli {
    #[command(flatten)]
    store: StoreOptions,

    /// Serialize the fetched subtree to stdout instead of persisting it
    #[arg(long)]
    export: bool,

    #[command(subcommand)]
    source: SourceCommand,
}

/// Store connection options.
#[derive(Debug, Args)]
struct StoreOptions {
    /// Name of the host where the database server is running
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port of the host where the database server is running
    #[arg(long, default_value_t = 3306)]
    port: u16,

    /// Database user name
    #[arg(short = 'u', long, default_value = "root")]
    user: String,

    /// Database user password
    #[arg(short = 'p', long, default_value = "", env = "TRAWLER_DB_PASSWORD")]
    password: String,

    /// Name of the database where fetched projects are stored
    #[arg(short = 'd', long, default_value = "trawler")]
    database: String,

    /// Full connection url; overrides the individual store options
    #[arg(long, env = "TRAWLER_DATABASE_URL")]
    database_url: Option<String>,
}

impl StoreOptions {
    fn url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "mysql://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.database
            ),
        }
    }
}

#[derive(Subcommand)]
enum SourceCommand {
    /// Harvest projects and releases from a Puppet-style module forge
    Forge {
        /// Base url of the forge (e.g. https://forge.puppet.com)
        url: String,
    },
    /// Harvest an organization's repositories from GitHub
    Github {
        /// Owner of the repositories on GitHub
        owner: String,

        /// Single repository to harvest instead of the whole organization
        repository: Option<String>,

        /// Personal access token
        #[arg(long, env = "TRAWLER_GITHUB_TOKEN")]
        token: Option<String>,

        /// Url of a GitHub Enterprise instance
        #[arg(long)]
        enterprise_url: Option<String>,
    },
    /// Harvest an owner's repositories and pull counters from a Docker registry
    Docker {
        /// Registry url (e.g. https://hub.docker.com)
        url: String,

        /// Owner of the repositories on the registry
        owner: String,

        /// Single repository to harvest instead of all of them
        repository: Option<String>,
    },
    /// Harvest the repository list of a Gerrit instance
    Gerrit {
        /// Gerrit host
        url: String,

        /// SSH user name; its public key must already be on the server
        #[arg(long)]
        user: String,
    },
}

fn build_source(command: &SourceCommand) -> Result<Box<dyn Source>, trawler::SourceError> {
    match command {
        SourceCommand::Forge { url } => Ok(Box::new(trawler::forge::ForgeSource::new(url)?)),
        SourceCommand::Github {
            owner,
            repository,
            token,
            enterprise_url,
        } => Ok(Box::new(trawler::github::GitHubSource::new(
            owner,
            repository.clone(),
            token.clone(),
            enterprise_url.as_deref(),
        )?)),
        SourceCommand::Docker {
            url,
            owner,
            repository,
        } => Ok(Box::new(trawler::docker::DockerSource::new(
            url,
            owner,
            repository.clone(),
        )?)),
        SourceCommand::Gerrit { url, user } => {
            Ok(Box::new(trawler::gerrit::GerritSource::new(url, user)))
        }
    }
}

async fn execute(cli: Cli) -> Result<(), String> {
    let source = build_source(&cli.source).map_err(|e| e.to_string())?;

    if cli.export {
        let tree = harvest::fetch_tree(source.as_ref())
            .await
            .map_err(|e| e.to_string())?;
        let stdout = std::io::stdout();
        harvest::export(&tree, stdout.lock()).map_err(|e| e.to_string())?;
        println!();
        return Ok(());
    }

    let db = trawler::connect_and_migrate(&cli.store.url())
        .await
        .map_err(|e| e.to_string())?;

    println!("Harvesting {}", source.base_url());
    let summary = harvest::run(source.as_ref(), &db)
        .await
        .map_err(|e| e.to_string())?;

    println!("Fetch and storage completed");
    println!(
        "  projects: {} total, {} new",
        summary.total_projects, summary.new_projects
    );
    println!(
        "  releases: {} total, {} new",
        summary.total_releases, summary.new_releases
    );

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trawler=info,trawler_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("trawler: {message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn store_options_assemble_a_mysql_url_by_default() {
        let cli = Cli::try_parse_from([
            "trawler",
            "-d",
            "metrics",
            "forge",
            "https://forge.puppet.com",
        ])
        .expect("args should parse");
        assert_eq!(cli.store.url(), "mysql://root:@localhost:3306/metrics");
    }

    #[test]
    fn database_url_overrides_individual_options() {
        let cli = Cli::try_parse_from([
            "trawler",
            "--database-url",
            "sqlite://trawler.db?mode=rwc",
            "forge",
            "https://forge.puppet.com",
        ])
        .expect("args should parse");
        assert_eq!(cli.store.url(), "sqlite://trawler.db?mode=rwc");
    }

    #[test]
    fn each_adapter_has_a_subcommand() {
        for args in [
            vec!["trawler", "forge", "https://forge.puppet.com"],
            vec!["trawler", "github", "bitergia"],
            vec!["trawler", "github", "bitergia", "harvest-tools"],
            vec!["trawler", "docker", "https://hub.docker.com", "library"],
            vec![
                "trawler",
                "gerrit",
                "review.example.org",
                "--user",
                "jenkins",
            ],
        ] {
            Cli::try_parse_from(args.iter().copied()).unwrap_or_else(|e| panic!("{args:?}: {e}"));
        }
    }
}
