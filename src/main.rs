use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use zonegrid::{
    agent::Attribute,
    config::RunConfig,
    ingest::{self, IngestPolicy},
    output::{ReportDocument, ReportWriter},
    pipeline::{PipelineBuilder, PipelineSettings},
    synth::SyntheticAgents,
    web::{self, WebConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Bucket agents into 1°x1° zones and chart per-zone statistics")]
struct Cli {
    /// Path to a YAML run configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest agents and write the aggregated report
    Run {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Directory for the report (defaults to the configured one)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Write a synthetic agent file
    Generate {
        #[arg(long, default_value_t = 100_000)]
        count: usize,

        #[arg(long, default_value_t = 7)]
        seed: u64,

        #[arg(long, default_value = "agents.json")]
        output: PathBuf,
    },
    /// Ingest agents and serve the chart over HTTP
    Serve {
        #[command(flatten)]
        analysis: AnalysisArgs,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Debug, clap::Args)]
struct AnalysisArgs {
    /// JSON array of agent records
    #[arg(long, default_value = "agents.json")]
    agents: PathBuf,

    /// Attribute averaged per zone (overrides config)
    #[arg(long)]
    attribute: Option<Attribute>,

    /// Skip out-of-range records instead of failing
    #[arg(long)]
    skip_invalid: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RunConfig::load_or_default(cli.config.as_deref())?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    match cli.command {
        Command::Run {
            analysis,
            output_dir,
        } => {
            let document = analyze(&config, &analysis)?;
            let output_dir = output_dir.unwrap_or_else(|| config.report.output_dir.clone());
            let path = ReportWriter::new(&output_dir).write(&document)?;
            println!(
                "Placed {} agents in {} zones ({} skipped). Report: {}",
                document.ingest.ingested,
                document.ingest.populated_zones,
                document.ingest.skipped,
                path.display()
            );
        }
        Command::Generate {
            count,
            seed,
            output,
        } => {
            let records =
                SyntheticAgents::with_settings(seed, config.grid.clone()).generate(count);
            ingest::write_records(&output, &records)?;
            println!("Wrote {count} synthetic agents to {}", output.display());
        }
        Command::Serve {
            analysis,
            host,
            port,
        } => {
            let document = analyze(&config, &analysis)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(web::run(WebConfig {
                document,
                host,
                port,
            }))?;
        }
    }
    Ok(())
}

fn analyze(config: &RunConfig, args: &AnalysisArgs) -> Result<ReportDocument> {
    let records = ingest::load_records(&args.agents)?;
    let mut builder = PipelineBuilder::new(PipelineSettings::from_config(config));
    if let Some(attribute) = args.attribute {
        builder = builder.with_attribute(attribute);
    }
    if args.skip_invalid {
        builder = builder.with_policy(IngestPolicy::Skip);
    }
    let outcome = builder.build()?.run(records)?;
    Ok(outcome.document())
}
