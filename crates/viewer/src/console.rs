//! UI de console: lista as fontes e lê a escolha do usuário no stdin.

use motion_core::discovery::SelectorHandle;
use motion_core::selector::{SourceListView, StreamConsumer};
use motion_core::types::SourceName;
use std::io::BufRead;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Consumidor que apenas registra a troca de stream.
#[derive(Default)]
pub struct LoggingConsumer {
    pub active: Option<String>,
}

impl StreamConsumer for LoggingConsumer {
    fn set_active_source(&mut self, name: &str) {
        info!("▶ Stream ativo: {name}");
        self.active = Some(name.to_string());
    }
}

/// Lista exibida por último, compartilhada com a thread de entrada.
pub type ShownEntries = Arc<Mutex<Vec<SourceName>>>;

/// Imprime a lista só quando ela ou a seleção mudam.
#[derive(Default)]
pub struct ConsoleListView {
    shown: ShownEntries,
    last_selected: Option<String>,
}

impl ConsoleListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> ShownEntries {
        Arc::clone(&self.shown)
    }
}

impl SourceListView for ConsoleListView {
    fn show_sources(&mut self, entries: &[SourceName], selected: Option<&str>) {
        let Ok(mut shown) = self.shown.lock() else {
            return;
        };
        if shown.as_slice() == entries && self.last_selected.as_deref() == selected {
            return;
        }

        println!("── Fontes ──");
        for (i, name) in entries.iter().enumerate() {
            let marker = if Some(name.as_str()) == selected { "●" } else { " " };
            println!(" {marker} {}. {name}", i + 1);
        }
        println!("Digite o número ou o nome da fonte:");

        *shown = entries.to_vec();
        self.last_selected = selected.map(str::to_string);
    }
}

/// Converte uma linha digitada em nome de fonte.
///
/// Números são índices 1-based na última lista exibida.
pub fn resolve_choice(line: &str, shown: &[SourceName]) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=shown.len()).contains(&n) => Some(shown[n - 1].clone()),
        _ => Some(line.to_string()),
    }
}

/// Encaminha as escolhas do stdin para o loop de seleção.
pub fn spawn_input_thread(handle: SelectorHandle, shown: ShownEntries) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("stdin-input".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let choice = match shown.lock() {
                    Ok(entries) => resolve_choice(&line, &entries),
                    Err(_) => break,
                };
                if let Some(name) = choice {
                    if !handle.user_select(name) {
                        break;
                    }
                }
            }
            debug!("Entrada encerrada");
        })?;
    Ok(())
}
