use anyhow::Context;
use bridge::model::DashboardModel;
use bridge::results::ResultLog;
use bridge::server::DashboardBridge;
use clap::Parser;
use generator::profile::{build_survey, GeneratorConfig};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::DashboardConfig;
use workflow::runner::{Runner, ViewRequest};

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Wardriving dashboard ingestion driver")]
struct Args {
    /// Run one offline ingestion pass and emit a baseline summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a dashboard config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// CSV capture file, repeatable; ingested in order
    #[arg(long)]
    source: Vec<PathBuf>,
    /// Initial map zoom level
    #[arg(long)]
    zoom: Option<u8>,
    /// Generate a synthetic survey of this many records instead of
    /// reading CSV sources
    #[arg(long, default_value_t = 0)]
    synthetic: usize,
    /// Keep the HTTP bridge alive for dashboard clients
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.workflow {
        DashboardConfig::load(path)?
    } else {
        DashboardConfig::from_args(args.source.clone(), args.zoom)
    };

    let runner = Arc::new(Runner::new(config.clone()));
    let bridge = DashboardBridge::new(
        runner.clone(),
        ResultLog::new(config.results_path.clone()),
    );

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating dashboard runtime")?;

    if args.synthetic > 0 {
        runner.seed(build_survey(&GeneratorConfig {
            count: args.synthetic,
            ..Default::default()
        }));
        bridge.publish_status(&format!("Seeded {} synthetic records.", args.synthetic));
    } else {
        let (records, rejected, failed) = runtime.block_on(runner.ingest());
        bridge.publish_status(&format!(
            "Ingested {} records ({} rows rejected, {} sources failed).",
            records, rejected, failed
        ));
        if records == 0 {
            bridge.publish_status("No data: the map renders empty.");
        }
    }

    if args.offline {
        let view = ViewRequest::from_config(&config);
        let result = runtime.block_on(runner.execute(&view))?;

        println!(
            "Offline pass -> networks {}, on map {}, clusters {}, markers {}",
            result.total_networks,
            result.filtered_networks,
            result.plan.glyphs.len(),
            result.plan.markers.len()
        );

        let model = DashboardModel::from(&result);
        bridge.publish(&model)?;
        bridge.publish_status("Offline dashboard state ready.");

        let report = format!(
            "networks={} filtered={} rejected={} failed_sources={} clusters={}\n",
            result.total_networks,
            result.filtered_networks,
            result.rows_rejected,
            result.sources_failed,
            result.plan.glyphs.len()
        );
        let report_path = PathBuf::from("tools/data/offline_summary.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }

    if args.serve {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
