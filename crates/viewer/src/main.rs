//! # Virtual Motion Camera – Viewer
//!
//! Descobre fontes de vídeo periodicamente, escolhe automaticamente a que
//! contém o hint configurado e aceita escolhas manuais pelo console.
//!
//! ## Uso
//! ```bash
//! source_viewer               # Roda até ser encerrado
//! source_viewer --seconds 30  # Para sozinho depois de 30s
//! ```

mod console;
mod sources;

use console::{ConsoleListView, LoggingConsumer};
use motion_core::config::AppConfig;
use motion_core::discovery::SelectorLoop;
use motion_core::ndi_config::write_ndi_config;
use motion_core::selector::SourceSelector;
use sources::FileSourceProvider;
use std::time::Duration;
use tracing::{info, warn};

/// Limite de `--seconds` (cerca de 31 anos).
const MAX_RUN_SECS: f64 = 1e9;

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Config ──
    let config = AppConfig::load_or_init();
    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    // ── Artefato NDI ──
    let ndi_path = config.ndi.resolved_path();
    if let Err(e) = write_ndi_config(&ndi_path, &config.ndi.target_ips, config.ndi.force_update) {
        warn!("Falha ao gravar config NDI em {}: {e}", ndi_path.display());
    }

    // ── Loop de seleção ──
    let sel_cfg = &config.selector;
    let view = ConsoleListView::new();
    let shown = view.entries();

    let (selector_loop, handle) = SelectorLoop::new(
        SourceSelector::new(sel_cfg.hint.clone()),
        FileSourceProvider::new(&sel_cfg.sources_file),
        LoggingConsumer::default(),
        view,
        sel_cfg.poll_interval(),
    );

    if let Err(e) = console::spawn_input_thread(handle.clone(), shown) {
        warn!("Entrada pelo console indisponível: {e}");
    }

    if let Some(secs) = run_for_secs() {
        let handle = handle.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs_f64(secs));
            handle.stop();
        });
    }

    info!("Lendo fontes de {}", sel_cfg.sources_file);
    let (selector, _, consumer, _) = selector_loop.run();
    info!(
        "Estado final: {:?} | stream ativo: {}",
        selector.state(),
        consumer.active.as_deref().unwrap_or("nenhum")
    );
}

/// `--seconds N` nos argumentos; fora de `0..=MAX_RUN_SECS` é ignorado.
fn run_for_secs() -> Option<f64> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == "--seconds")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|s| (0.0..=MAX_RUN_SECS).contains(s))
}
