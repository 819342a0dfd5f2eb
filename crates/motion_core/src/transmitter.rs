//! Transmissor de pose – best-effort, latest-wins.
//!
//! O socket UDP é criado em [`PoseTransmitter::configure`] e liberado uma
//! única vez em [`PoseTransmitter::stop`] (ou no `Drop`). Cada chamada a
//! [`PoseTransmitter::transmit`] envia um datagrama e nunca bloqueia; falhas
//! de envio são logadas e descartadas, sem retry e sem buffer.

use crate::protocol::encode_pose;
use crate::types::Pose;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use tracing::{debug, info, warn};

/// Erros fatais de configuração do transmissor.
#[derive(Debug, thiserror::Error)]
pub enum TransmitterError {
    #[error("Endereço de destino inválido: {host}:{port}")]
    InvalidEndpoint { host: String, port: u16 },

    #[error("Falha ao resolver {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("Falha ao criar socket UDP: {0}")]
    Socket(#[from] io::Error),
}

/// Contadores de envio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmitStats {
    pub sent: u64,
    pub failed: u64,
}

/// Transmissor de pose sobre UDP.
#[derive(Debug)]
pub struct PoseTransmitter {
    socket: Option<UdpSocket>,
    dest: SocketAddr,
    stats: TransmitStats,
}

impl PoseTransmitter {
    /// Resolve o destino e adquire o socket.
    ///
    /// `bind_ip` vazio significa "qualquer interface".
    pub fn configure(host: &str, port: u16, bind_ip: &str) -> Result<Self, TransmitterError> {
        let dest = resolve_endpoint(host, port)?;

        let bind_addr = match (bind_ip.is_empty(), dest) {
            (false, _) => format!("{bind_ip}:0"),
            (true, SocketAddr::V4(_)) => "0.0.0.0:0".to_string(),
            (true, SocketAddr::V6(_)) => "[::]:0".to_string(),
        };

        let socket = UdpSocket::bind(&bind_addr)?;
        socket.set_nonblocking(true)?;

        info!(
            "Transmissor configurado: {} → {dest}",
            socket.local_addr().map(|a| a.to_string()).unwrap_or(bind_addr)
        );

        Ok(Self {
            socket: Some(socket),
            dest,
            stats: TransmitStats::default(),
        })
    }

    /// Endpoint de destino resolvido.
    pub fn destination(&self) -> SocketAddr {
        self.dest
    }

    pub fn stats(&self) -> TransmitStats {
        self.stats
    }

    pub fn is_running(&self) -> bool {
        self.socket.is_some()
    }

    /// Codifica e envia uma pose como um único datagrama.
    ///
    /// Retorna `true` se o datagrama foi entregue ao socket. Falhas não
    /// são propagadas: o próximo tick segue independente.
    pub fn transmit(&mut self, pose: &Pose) -> bool {
        let Some(socket) = &self.socket else {
            warn!("Transmissor parado, descartando pose");
            self.stats.failed += 1;
            return false;
        };

        let record = encode_pose(pose);
        match socket.send_to(&record, self.dest) {
            Ok(sent) => {
                self.stats.sent += 1;
                debug!(
                    "→ {sent} bytes para {} | pos ({:.3}, {:.3}, {:.3})",
                    self.dest, pose.position[0], pose.position[1], pose.position[2]
                );
                true
            }
            Err(e) => {
                self.stats.failed += 1;
                if e.kind() == io::ErrorKind::WouldBlock {
                    debug!("Socket ocupado, descartando pose");
                } else {
                    warn!("Erro ao enviar UDP para {}: {e}", self.dest);
                }
                false
            }
        }
    }

    /// Libera o socket. Chamadas repetidas não têm efeito.
    pub fn stop(&mut self) {
        if self.socket.take().is_some() {
            info!(
                "Transmissor parado ({} enviados, {} falhas)",
                self.stats.sent, self.stats.failed
            );
        }
    }
}

impl Drop for PoseTransmitter {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Resolve `host:port`, preferindo IPv4.
fn resolve_endpoint(host: &str, port: u16) -> Result<SocketAddr, TransmitterError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(TransmitterError::InvalidEndpoint {
            host: host.to_string(),
            port,
        });
    }

    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| TransmitterError::Resolve {
            host: host.to_string(),
            port,
            source,
        })?
        .collect();

    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| TransmitterError::InvalidEndpoint {
            host: host.to_string(),
            port,
        })
}
