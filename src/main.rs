use dijets::cutter::cut_flow::cut_flow_config;
use dijets::{AnalysisError, DijetsAnalysis, Event, RunConfig, RunResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

fn main() {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let Some(config_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: dijets <run.yaml>");
        std::process::exit(2);
    };

    if let Err(err) = run(&config_path) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run(config_path: &std::path::Path) -> Result<(), AnalysisError> {
    let config = RunConfig::load(config_path)?;

    let events: Vec<Event> = serde_json::from_reader(BufReader::new(File::open(&config.events)?))?;
    log::info!(
        "Read {} events from {}",
        events.len(),
        config.events.display()
    );

    let analysis = DijetsAnalysis::new(config.analysis.clone())?;

    let progress = ProgressBar::new(events.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40} {pos}/{len} events [{elapsed_precise}]")
    {
        progress.set_style(style);
    }

    let (mut selected, mut rejected) = (0, 0);
    for batch in events.chunks(config.batch_size) {
        let summary = analysis.process_parallel(batch)?;
        selected += summary.selected;
        rejected += summary.rejected();
        progress.inc(batch.len() as u64);
    }
    progress.finish_and_clear();
    log::info!("{selected} of {} events passed all cuts", events.len());
    if rejected > 0 {
        log::warn!("{rejected} malformed events skipped, not counted in the sum of weights");
    }

    let result = analysis.finalize(config.cross_section)?;
    log_cut_flow(&result);

    match &config.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &result)?;
            writer.flush()?;
            log::info!("Wrote normalised histograms to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &result)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn log_cut_flow(result: &RunResult) {
    log::info!(
        "Cut-flow [pb], sum of weights {} over {} events:",
        result.weights.sum_w,
        result.weights.events
    );
    let errors = result
        .histogram(&cut_flow_config().name)
        .map(|h| h.get_bin_errors())
        .unwrap_or_default();
    for (stage, value) in result.cut_flow_table() {
        let error = errors.get(stage.index()).copied().unwrap_or(0.0);
        log::info!(
            "  {} {:<22} {:.6e} +- {:.2e}",
            stage.index(),
            stage.label(),
            value,
            error
        );
    }
    for hist in &result.histograms {
        let (integral, mean, stdev) = hist.get_statistics();
        log::debug!(
            "{}: integral {:.6e}, mean {:.4}, stdev {:.4}",
            hist.name,
            integral,
            mean,
            stdev
        );
    }
}
