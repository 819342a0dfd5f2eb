//! Thread de rede que escuta UDP e envia poses para a thread principal via channel.

use crossbeam_channel::{Receiver, Sender, bounded};
use motion_core::protocol::{WIRE_RECORD_SIZE, decode_pose};
use motion_core::types::Pose;
use std::net::UdpSocket;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Timeout de leitura; limita quanto a thread demora a ver o stop.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Espera entre tentativas de bind.
const REBIND_DELAY: Duration = Duration::from_secs(2);

/// Mensagem enviada da thread de rede para a thread principal.
#[derive(Debug, Clone)]
pub struct NetMessage {
    pub pose: Pose,
    pub source_addr: String,
    pub raw_size: usize,
}

/// Inicia a thread de rede. Retorna o receiver do channel.
pub fn spawn_receiver_thread(
    port: u16,
    sender_ip_filter: String,
    stop: Arc<AtomicBool>,
) -> std::io::Result<Receiver<NetMessage>> {
    let (tx, rx) = bounded::<NetMessage>(8); // Poucas mensagens: latest-wins

    std::thread::Builder::new()
        .name("udp-receiver".into())
        .spawn(move || {
            receiver_loop(&tx, port, &sender_ip_filter, &stop);
        })?;

    Ok(rx)
}

fn receiver_loop(tx: &Sender<NetMessage>, port: u16, sender_ip_filter: &str, stop: &AtomicBool) {
    while !stop.load(Ordering::Relaxed) {
        match UdpSocket::bind(format!("0.0.0.0:{port}")) {
            Ok(sock) => {
                sock.set_read_timeout(Some(READ_TIMEOUT)).ok();

                let mode = if sender_ip_filter.is_empty() {
                    "qualquer origem"
                } else {
                    sender_ip_filter
                };
                info!("Receiver escutando em 0.0.0.0:{port} – Aceitando: {mode}");

                serve(&sock, tx, sender_ip_filter, stop);
                info!("Receiver liberou a porta {port}");
                return;
            }
            Err(e) => {
                error!("Falha ao bind porta {port}: {e}. Tentando novamente em 2s...");
                std::thread::sleep(REBIND_DELAY);
            }
        }
    }
}

fn serve(sock: &UdpSocket, tx: &Sender<NetMessage>, sender_ip_filter: &str, stop: &AtomicBool) {
    let mut buf = [0u8; 1024];
    while !stop.load(Ordering::Relaxed) {
        match sock.recv_from(&mut buf) {
            Ok((size, addr)) => {
                let source = addr.ip().to_string();

                // Filtro de IP se configurado
                if !sender_ip_filter.is_empty() && source != sender_ip_filter {
                    debug!("Ignorando pacote de {source} (esperado: {sender_ip_filter})");
                    continue;
                }

                match decode_pose(&buf[..size]) {
                    Ok(pose) => {
                        if size > WIRE_RECORD_SIZE {
                            debug!("{} bytes extras ignorados de {source}", size - WIRE_RECORD_SIZE);
                        }
                        let msg = NetMessage {
                            pose,
                            source_addr: source,
                            raw_size: size,
                        };
                        // Non-blocking send: se o consumidor está lento, descarta
                        if tx.try_send(msg).is_err() {
                            debug!("Channel cheio, descartando pacote");
                        }
                    }
                    Err(e) => {
                        debug!("Pacote inválido de {source}: {e}");
                    }
                }
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                // Timeout normal, continua
            }
            Err(e) => {
                warn!("Erro ao receber UDP: {e}");
            }
        }
    }
}
