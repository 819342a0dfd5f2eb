//! # Motion Core
//!
//! Crate compartilhada do Virtual Motion Camera: protocolo binário de pose,
//! transmissor UDP, seleção de fonte de vídeo e configuração TOML.
//!
//! ## Módulos
//! - [`types`] – Pose e nomes de fontes
//! - [`protocol`] – Registro fixo de 28 bytes big-endian
//! - [`transmitter`] – Envio best-effort via UDP
//! - [`selector`] – Máquina de estados de seleção de fonte
//! - [`discovery`] – Loop periódico de poll
//! - [`convert`] – Conversão Y-up → Z-up do lado receptor
//! - [`ndi_config`] – Artefato JSON de rede do NDI
//! - [`config`] – Configuração unificada via TOML

pub mod types;
pub mod protocol;
pub mod transmitter;
pub mod selector;
pub mod discovery;
pub mod convert;
pub mod ndi_config;
pub mod config;

// Re-exports convenientes
pub use types::{Pose, SourceList, SourceName};
pub use protocol::{WIRE_RECORD_SIZE, decode_pose, encode_pose};
pub use transmitter::{PoseTransmitter, TransmitterError};
pub use selector::{SelectionState, SourceSelector};
pub use discovery::{SelectorEvent, SelectorHandle, SelectorLoop};
pub use config::AppConfig;
