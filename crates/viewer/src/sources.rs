//! Provedor de fontes baseado em arquivo texto.
//!
//! Substitui o finder do NDI em ambientes sem o runtime: uma fonte por
//! linha, relida a cada poll. Linhas vazias e `#` são ignoradas.

use motion_core::selector::SourceProvider;
use motion_core::types::SourceList;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct FileSourceProvider {
    path: PathBuf,
}

impl FileSourceProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SourceProvider for FileSourceProvider {
    fn list_sources(&mut self) -> SourceList {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => parse_sources(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} não existe, nenhuma fonte", self.path.display());
                Vec::new()
            }
            Err(e) => {
                warn!("Erro ao ler {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }
}

fn parse_sources(content: &str) -> SourceList {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
