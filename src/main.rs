use std::path::Path;
use std::time::{Duration, Instant};

use spbview::client::ApiClient;
use spbview::fetch::Orchestrator;
use spbview::options::Options;
use spbview::render::{box_plot, energy_scatter::EnergyScatter};
use spbview::state::StateChange;

const OPTIONS_FILE: &str = "spbview.toml";
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Run one full fetch cascade for the given structure and log a summary.
fn run(input: &str) -> Result<(), String> {
    let options = if Path::new(OPTIONS_FILE).exists() {
        Options::load(Path::new(OPTIONS_FILE))
            .map_err(|e| format!("failed to load {OPTIONS_FILE}: {e}"))?
    } else {
        Options::default()
    };
    log::info!("using API at {}", options.api.base_url);

    let client = ApiClient::new(&options.api.base_url);
    let mut orchestrator = Orchestrator::new(Box::new(client))
        .map_err(|e| format!("failed to start fetch worker: {e}"))?;

    // A .cif path uploads the file; anything else is a structure id.
    if input.ends_with(".cif") && Path::new(input).exists() {
        let content = std::fs::read_to_string(input)
            .map_err(|e| format!("failed to read {input}: {e}"))?;
        let file_name = Path::new(input)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| format!("unusable file name: {input}"))?;
        let _ = orchestrator
            .upload(file_name, &content)
            .map_err(|e| e.to_string())?;
        log::info!("uploading {file_name}");
    } else {
        let _ = orchestrator.set_cifid(input);
        log::info!("fetching {input}");
    }

    let mut failures = 0_u32;
    let deadline = Instant::now() + FETCH_TIMEOUT;
    while orchestrator.state().loading.any() {
        if Instant::now() > deadline {
            return Err("timed out waiting for fetches".to_owned());
        }
        for change in orchestrator.poll() {
            match change {
                StateChange::FetchFailed { kind, message } => {
                    failures += 1;
                    log::error!("{kind:?} fetch failed: {message}");
                }
                StateChange::UploadAccepted { cifid } => {
                    log::info!("upload accepted as {cifid}");
                }
                _ => {}
            }
        }
        std::thread::sleep(Duration::from_millis(25));
    }

    summarize(&orchestrator, &options);

    if failures > 0 {
        return Err(format!("{failures} fetch(es) failed"));
    }
    Ok(())
}

fn summarize(orchestrator: &Orchestrator, options: &Options) {
    let state = orchestrator.state();

    match &state.structure {
        Some(structure) => {
            log::info!(
                "{}: {} atoms",
                state.cifid,
                structure.atom_count()
            );
        }
        None => log::warn!("{}: no structure", state.cifid),
    }

    let mut scatter = EnergyScatter::new(options.charts.clone());
    match scatter.update(state) {
        Ok(Some(spec)) => log::info!(
            "energy grid {}^3, {} plotted samples",
            spec.grid_dim,
            spec.points.len()
        ),
        Ok(None) => log::info!("no energy grid"),
        Err(e) => log::warn!("energy grid rejected: {e}"),
    }

    let plot = box_plot::build(state);
    for (label, point) in plot.labels.iter().zip(&plot.mark_points) {
        log::info!("  {label}: {}", point.label);
    }

    if let Some(attn) = state.current_attention() {
        let max = attn.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = attn.iter().sum::<f64>() / attn.len().max(1) as f64;
        log::info!(
            "attention [{}]: {} scores, mean {mean:.4}, max {max:.4}",
            state.attn_task,
            attn.len()
        );
    }
}

fn main() {
    env_logger::init();

    let input = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            log::error!("Usage: spbview <cifid or .cif path>");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&input) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
