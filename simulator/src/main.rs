use anyhow::Context;
use aurafuse::interface::IntrusionKind;
use aurafuse::processing::FusionEngine;
use aurafuse::runtime::{spawn_lane, FusionLoop, StopSignal, SystemClock};
use clap::Parser;
use generator::profile::{build_scenario, Lane};
use generator::source::ScriptedSource;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use tokio::sync::mpsc;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic feed driver for the AoA + radar fusion core")]
struct Args {
    /// Replay the scenario on a simulated clock and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Fusion tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Scenario RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Scenario length in seconds
    #[arg(long)]
    duration: Option<f64>,
    /// Run real-time producer lanes, the fusion loop and the HTTP bridge
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    workflow_config.apply_overrides(args.tick_ms, args.seed, args.duration);
    workflow_config
        .fusion
        .validate()
        .context("validating fusion config")?;

    if args.offline {
        run_offline(&workflow_config)?;
    }
    if args.serve {
        run_serve(&workflow_config)?;
    }

    Ok(())
}

fn run_offline(config: &WorkflowConfig) -> anyhow::Result<()> {
    let runner = Runner::new(config.clone());
    let result = runner.execute()?;

    let tags = result
        .final_snapshot
        .as_ref()
        .map(|snapshot| snapshot.tags.len())
        .unwrap_or(0);
    println!(
        "Offline run '{}' -> ticks {}, tag fixes {}, tags {}, evicted points {}, flagged {}, cleared {}, left {}",
        config.scenario.name,
        result.ticks,
        result.tag_updates,
        tags,
        result.removed_points,
        result.count(IntrusionKind::Flagged),
        result.count(IntrusionKind::Cleared),
        result.count(IntrusionKind::ObjectLeft),
    );
    for event in &result.intrusion_events {
        if event.kind != IntrusionKind::ObjectLeft {
            println!("  t={:>6.1}s {:?}", event.timestamp, event.kind);
        }
    }

    let report = format!(
        "scenario={:?} seed={} ticks={} fixes={} evicted={} flagged={} cleared={} left={}\n",
        config.scenario.name,
        config.scenario.seed,
        result.ticks,
        result.tag_updates,
        result.removed_points,
        result.count(IntrusionKind::Flagged),
        result.count(IntrusionKind::Cleared),
        result.count(IntrusionKind::ObjectLeft),
    );
    let report_path = PathBuf::from("tools/data/offline_fusion.log");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&report_path)
        .with_context(|| format!("opening {}", report_path.display()))?;
    file.write_all(report.as_bytes())?;
    Ok(())
}

fn run_serve(config: &WorkflowConfig) -> anyhow::Result<()> {
    let events = build_scenario(&config.scenario, &config.fusion)?;
    let stop = StopSignal::new();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (report_tx, mut report_rx) = mpsc::unbounded_channel();

    let mut lanes = Vec::new();
    for lane in [Lane::Station1, Lane::Station2, Lane::Radar] {
        let handle = spawn_lane(
            ScriptedSource::new(lane, &events),
            inbound_tx.clone(),
            stop.clone(),
            config.lane_settings(),
        )
        .with_context(|| format!("spawning {} lane", lane.name()))?;
        lanes.push((lane, handle));
    }
    drop(inbound_tx);

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for fusion loop")?;

    let gui_bridge = GuiBridge::new();
    gui_bridge.publish_status(&format!(
        "HTTP bridge on http://{} (Ctrl+C to stop)...",
        gui_bind_address()
    ));

    let engine = runtime.block_on(async {
        tokio::spawn(gui_bridge.serve(gui_bind_address()));

        let publisher = gui_bridge.clone();
        tokio::spawn(async move {
            while let Some(report) = report_rx.recv().await {
                publisher.publish(&report);
            }
        });

        let fusion = FusionLoop::new(
            FusionEngine::new(config.fusion.clone()),
            inbound_rx,
            report_tx,
            SystemClock,
        );
        let loop_handle = tokio::spawn(fusion.run(stop.clone()));

        signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
        stop.stop();
        loop_handle.await.context("joining fusion loop")
    })?;

    for (lane, handle) in lanes {
        match handle.join() {
            Ok(stats) => info!(
                "{} lane: {} events, {} transport failures",
                lane.name(),
                stats.events,
                stats.failures
            ),
            Err(_) => log::warn!("{} lane panicked", lane.name()),
        }
    }

    let metrics = engine.metrics().snapshot();
    println!(
        "Stopped after {} ticks: fixes {}, evicted {}, flagged {}, cleared {}, left {}",
        metrics.ticks,
        metrics.fixes,
        metrics.points_evicted,
        metrics.intrusions_flagged,
        metrics.intrusions_cleared,
        metrics.objects_left
    );
    Ok(())
}
