//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável serve sender, receiver e
//! viewer; cada seção tem defaults, então arquivos parciais funcionam.

use crate::ndi_config::NDI_CONFIG_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Configuração do Sender (transmissor de pose).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Host de destino (IP ou nome)
    pub host: String,
    /// Porta UDP de destino
    pub port: u16,
    /// Ticks por segundo
    pub rate_hz: f64,
    /// IP local para bind (vazio = auto)
    pub bind_ip: String,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            rate_hz: 60.0,
            bind_ip: String::new(),
        }
    }
}

impl SenderConfig {
    /// Período do tick; taxa fora de 1–1000 Hz é limitada, NaN usa o default.
    pub fn tick_interval(&self) -> Duration {
        let rate = if self.rate_hz.is_nan() {
            SenderConfig::default().rate_hz
        } else {
            self.rate_hz.clamp(1.0, 1000.0)
        };
        Duration::from_secs_f64(1.0 / rate)
    }
}

/// Configuração do Receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Porta UDP para escutar
    pub port: u16,
    /// IP do sender (vazio = aceita qualquer origem)
    pub sender_ip: String,
    /// Segundos sem pacote até considerar o stream parado
    pub stale_after_secs: f64,
}

impl ReceiverConfig {
    /// Tempo sem pacotes até o stream ser considerado parado (0.1–3600s).
    pub fn stale_after(&self) -> Duration {
        clamped_secs(
            self.stale_after_secs,
            0.1,
            3600.0,
            ReceiverConfig::default().stale_after_secs,
        )
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            sender_ip: String::new(),
            stale_after_secs: 5.0,
        }
    }
}

/// Configuração da seleção de fonte.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Substring procurada (case-insensitive) na seleção automática
    pub hint: String,
    /// Intervalo entre polls (segundos)
    pub poll_interval_secs: f64,
    /// Arquivo com um nome de fonte por linha
    pub sources_file: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            hint: "Blender".into(),
            poll_interval_secs: 2.0,
            sources_file: "sources.txt".into(),
        }
    }
}

impl SelectorConfig {
    /// Intervalo entre polls, limitado a 0.1–60s.
    pub fn poll_interval(&self) -> Duration {
        clamped_secs(
            self.poll_interval_secs,
            0.1,
            60.0,
            SelectorConfig::default().poll_interval_secs,
        )
    }
}

/// Artefato de rede do NDI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NdiConfig {
    /// IPs dos senders, separados por vírgula
    pub target_ips: String,
    /// Regrava o arquivo a cada início
    pub force_update: bool,
    /// Caminho do JSON (vazio = ao lado do executável)
    pub path: String,
}

impl Default for NdiConfig {
    fn default() -> Self {
        Self {
            target_ips: "127.0.0.1".into(),
            force_update: true,
            path: String::new(),
        }
    }
}

impl NdiConfig {
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.is_empty() {
            exe_dir().join(NDI_CONFIG_FILE_NAME)
        } else {
            PathBuf::from(&self.path)
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sender: SenderConfig,
    pub receiver: ReceiverConfig,
    pub selector: SelectorConfig,
    pub ndi: NdiConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        exe_dir().join("config.toml")
    }

    /// Carrega do caminho padrão e grava os defaults se ainda não existir.
    pub fn load_or_init() -> Self {
        let path = Self::default_path();
        let config = Self::load(&path);
        if !path.exists() {
            if let Err(e) = config.save(&path) {
                warn!("Não foi possível salvar config padrão: {e}");
            }
        }
        config
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.sender.host.trim().is_empty() {
            errors.push("Host do sender não pode ser vazio".into());
        }
        if self.sender.port == 0 {
            errors.push("Porta do sender não pode ser 0".into());
        }
        if !(1.0..=1000.0).contains(&self.sender.rate_hz) {
            errors.push(format!(
                "Taxa do sender inválida: {} Hz (1–1000)",
                self.sender.rate_hz
            ));
        }
        if self.receiver.port == 0 {
            errors.push("Porta do receiver não pode ser 0".into());
        }
        if !(0.1..=60.0).contains(&self.selector.poll_interval_secs) {
            errors.push(format!(
                "Intervalo de poll inválido: {} (0.1–60.0)",
                self.selector.poll_interval_secs
            ));
        }

        errors
    }
}

/// Converte segundos vindos do TOML sem risco de panic.
///
/// NaN vira `fallback`; qualquer outro valor é limitado a `min..=max`.
pub fn clamped_secs(secs: f64, min: f64, max: f64, fallback: f64) -> Duration {
    let secs = if secs.is_nan() { fallback } else { secs };
    Duration::from_secs_f64(secs.clamp(min, max))
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn defaults_match_wire_endpoint() {
        let config = AppConfig::default();
        assert_eq!(config.sender.host, "127.0.0.1");
        assert_eq!(config.sender.port, 8000);
        assert_eq!(config.receiver.port, 8000);
        assert_eq!(config.selector.poll_interval(), Duration::from_secs(2));
    }

    #[test]
    fn roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.sender.port, parsed.sender.port);
        assert_eq!(config.selector.hint, parsed.selector.hint);
        assert_eq!(config.ndi.target_ips, parsed.ndi.target_ips);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[sender]
port = 9999

[selector]
hint = "OBS"
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.sender.port, 9999);
        assert_eq!(config.sender.rate_hz, 60.0);
        assert_eq!(config.selector.hint, "OBS");
        assert_eq!(config.selector.poll_interval_secs, 2.0);
        assert!(config.ndi.force_update);
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut config = AppConfig::default();
        config.sender.host = " ".into();
        config.sender.rate_hz = 0.0;
        config.selector.poll_interval_secs = 120.0;
        assert_eq!(config.validate().len(), 3);
    }

    #[test]
    fn tick_interval_survives_invalid_rates() {
        let mut sender = SenderConfig::default();
        for (rate, expected) in [
            (0.0, Duration::from_secs(1)),
            (-5.0, Duration::from_secs(1)),
            (f64::INFINITY, Duration::from_millis(1)),
            (1e9, Duration::from_millis(1)),
            (f64::NAN, Duration::from_secs_f64(1.0 / 60.0)),
        ] {
            sender.rate_hz = rate;
            assert_eq!(sender.tick_interval(), expected, "rate_hz = {rate}");
        }
    }

    #[test]
    fn poll_interval_survives_invalid_values() {
        let mut selector = SelectorConfig::default();
        for (secs, expected) in [
            (-1.0, Duration::from_millis(100)),
            (0.0, Duration::from_millis(100)),
            (f64::NEG_INFINITY, Duration::from_millis(100)),
            (f64::INFINITY, Duration::from_secs(60)),
            (f64::NAN, Duration::from_secs(2)),
            (2.5, Duration::from_millis(2500)),
        ] {
            selector.poll_interval_secs = secs;
            assert_eq!(selector.poll_interval(), expected, "poll_interval_secs = {secs}");
        }
    }

    #[test]
    fn stale_after_survives_invalid_values() {
        let mut receiver = ReceiverConfig::default();
        receiver.stale_after_secs = f64::INFINITY;
        assert_eq!(receiver.stale_after(), Duration::from_secs(3600));
        receiver.stale_after_secs = f64::NAN;
        assert_eq!(receiver.stale_after(), Duration::from_secs(5));
        receiver.stale_after_secs = -3.0;
        assert_eq!(receiver.stale_after(), Duration::from_millis(100));
    }

    #[test]
    fn explicit_ndi_path_wins() {
        let ndi = NdiConfig {
            path: "/tmp/custom.json".into(),
            ..Default::default()
        };
        assert_eq!(ndi.resolved_path(), PathBuf::from("/tmp/custom.json"));
        assert!(
            NdiConfig::default()
                .resolved_path()
                .ends_with(NDI_CONFIG_FILE_NAME)
        );
    }
}
