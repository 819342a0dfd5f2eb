//! Artefato de configuração do NDI (`ndi-config.v1.json`).
//!
//! Informa à camada de rede do NDI os IPs dos senders para descoberta fora
//! da sub-rede local. Formato:
//!
//! ```json
//! { "ndi": { "networks": { "ips": "100.64.0.1,100.64.0.2" } } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Nome de arquivo esperado pelo runtime do NDI.
pub const NDI_CONFIG_FILE_NAME: &str = "ndi-config.v1.json";

#[derive(Debug, thiserror::Error)]
pub enum NdiConfigError {
    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdiConfigFile {
    pub ndi: NdiSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdiSection {
    pub networks: NdiNetworks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdiNetworks {
    /// Lista de IPs separada por vírgula.
    pub ips: String,
}

impl NdiConfigFile {
    pub fn new(target_ips: &str) -> Self {
        Self {
            ndi: NdiSection {
                networks: NdiNetworks {
                    ips: target_ips.to_string(),
                },
            },
        }
    }
}

/// Escreve o artefato.
///
/// Sem `force`, um arquivo existente é preservado e retorna `Ok(false)`.
pub fn write_ndi_config(path: &Path, target_ips: &str, force: bool) -> Result<bool, NdiConfigError> {
    if !force && path.exists() {
        debug!("Config NDI já existe em {}", path.display());
        return Ok(false);
    }

    let content = serde_json::to_string_pretty(&NdiConfigFile::new(target_ips))?;
    std::fs::write(path, content)?;
    info!("Config NDI gerada em {} (ips: {target_ips})", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vmc-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn json_shape_matches_ndi_runtime() {
        let json = serde_json::to_value(NdiConfigFile::new("10.0.0.1,10.0.0.2")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "ndi": { "networks": { "ips": "10.0.0.1,10.0.0.2" } } })
        );
    }

    #[test]
    fn writes_when_missing() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);

        assert!(write_ndi_config(&path, "127.0.0.1", false).unwrap());
        let parsed: NdiConfigFile =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.ndi.networks.ips, "127.0.0.1");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn keeps_existing_file_unless_forced() {
        let path = temp_path("existing");
        std::fs::write(&path, "custom").unwrap();

        assert!(!write_ndi_config(&path, "127.0.0.1", false).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "custom");

        assert!(write_ndi_config(&path, "192.168.1.5", true).unwrap());
        assert!(std::fs::read_to_string(&path).unwrap().contains("192.168.1.5"));

        std::fs::remove_file(&path).unwrap();
    }
}
