//! 🚀 glx-cli — the front door, the bouncer, the maitre d' of glx.
//!
//! 🎬 *[narrator voice]* "It all started with a simple main() function..."
//! 📦 This binary crate is the thin CLI wrapper that parses args, sets up
//! logging, loads config, and then lets the library do the heavy lifting.
//! Like a manager. 🦆

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glx::backends::{FileSource, FileSourceConfig, Source};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// 🧪 Enrich GitLink raw items into flat documents.
#[derive(Debug, Parser)]
#[command(name = "glx", version, about)]
struct Cli {
    /// 🔧 TOML config file; merged over GLX_* environment variables.
    #[arg(short, long, global = true, env = "GLX_CONFIG", default_value = "glx.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 🚀 Drain the configured source through the enricher into the configured sink (default).
    Enrich,
    /// 🪪 Print the identities found in a raw NDJSON file, one JSON object per line.
    Identities {
        /// 📄 NDJSON file of raw items
        input: PathBuf,
    },
    /// 🥸 Print a raw NDJSON file back out with every person hashed.
    Anonymize {
        /// 📄 NDJSON file of raw items
        input: PathBuf,
    },
}

/// 🚀 main() — where it all begins. The genesis. The big bang.
///
/// 🔧 Steps:
/// 1. Init tracing (so we can see what goes wrong, and when)
/// 2. Parse args
/// 3. Do the thing
/// 4. Handle errors (cry), exit 1
#[tokio::main]
async fn main() {
    // 📡 Set up tracing — because println! debugging is a lifestyle choice
    // we're trying to move past, like flip phones and cargo shorts
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = dispatch(cli).await {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one tear-jerking layer at a time
        let mut the_vibes_are_giving_connection_issues = false;
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
            let cause_str = cause.to_string();
            if cause_str.contains("error sending request")
                || cause_str.contains("connection refused")
                || cause_str.contains("Connection refused")
                || cause_str.contains("tcp connect error")
                || cause_str.contains("dns error")
            {
                the_vibes_are_giving_connection_issues = true;
            }
        }

        if the_vibes_are_giving_connection_issues {
            error!(
                "🔧 hint: looks like Elasticsearch isn't reachable. \
                Double-check that it is actually running and that the url in the config is right. \
                If you're using Docker, try `docker ps` to see what's up. ☕"
            );
        }

        // 🗑️ Exit with prejudice. Process exitus maximus.
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Enrich) {
        Command::Enrich => {
            // 🔒 A missing file is fine (env vars only); a broken path check is not.
            let config_file = cli.config.as_path();
            let exists = config_file.try_exists().with_context(|| {
                format!(
                    "💀 Couldn't check whether the configuration file exists. Maybe it's a pwd/cwd thing; try an absolute path. Was checking here: '{}'",
                    config_file.display()
                )
            })?;
            let app_config = glx::app_config::load_config(exists.then_some(config_file))
                .context("💀 In glx-cli, we couldn't load the config. Make sure source_config, sink_config and enrich.data_source are all there.")?;

            let report = glx::run(app_config).await?;
            println!("{}", glx::progress::report_table(&report));
            if report.missing() > 0 {
                eprintln!("⚠️  {} documents were submitted but not written", report.missing());
            }
            Ok(())
        }
        Command::Identities { input } => {
            let mut source = open(input).await?;
            glx::write_identities(&mut source, &mut tokio::io::stdout()).await?;
            Ok(())
        }
        Command::Anonymize { input } => {
            let mut source = open(input).await?;
            glx::write_anonymized(&mut source, &mut tokio::io::stdout()).await?;
            Ok(())
        }
    }
}

async fn open(input: PathBuf) -> Result<impl Source> {
    FileSource::new(FileSourceConfig {
        file_name: input.display().to_string(),
    })
    .await
}
