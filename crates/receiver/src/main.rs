//! # Virtual Motion Camera – Receiver
//!
//! Escuta os datagramas de pose do Sender, converte para espaço
//! right-handed Z-up e aplica à câmera (aqui: log do último estado).
//!
//! ## Uso
//! ```bash
//! pose_receiver               # Roda até ser encerrado
//! pose_receiver --seconds 30  # Para sozinho depois de 30s
//! ```

mod net_thread;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use motion_core::config::AppConfig;
use motion_core::convert::{ZUpPose, to_z_up};
use net_thread::NetMessage;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Período de aplicação da pose na câmera.
const APPLY_INTERVAL: Duration = Duration::from_millis(10);

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

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
    let recv_cfg = &config.receiver;

    // ── Thread de rede ──
    let stop = Arc::new(AtomicBool::new(false));
    let rx = match net_thread::spawn_receiver_thread(
        recv_cfg.port,
        recv_cfg.sender_ip.clone(),
        Arc::clone(&stop),
    ) {
        Ok(rx) => rx,
        Err(e) => {
            error!("Falha ao criar thread de rede: {e}");
            std::process::exit(1);
        }
    };

    let deadline = run_for_secs().map(|s| Instant::now() + Duration::from_secs_f64(s));
    let stale_after = recv_cfg.stale_after();

    let mut camera = CameraState::new(stale_after);
    while deadline.is_none_or(|d| Instant::now() < d) {
        if !camera.pump(&rx, APPLY_INTERVAL) {
            break;
        }
    }

    stop.store(true, Ordering::Relaxed);
    info!("Receiver encerrado ({} poses recebidas)", camera.received);
}

/// Último estado aplicado à câmera.
struct CameraState {
    latest: Option<ZUpPose>,
    last_data_time: Option<Instant>,
    last_report: Instant,
    stale_after: Duration,
    stale_reported: bool,
    received: u64,
    source_addr: String,
}

impl CameraState {
    fn new(stale_after: Duration) -> Self {
        Self {
            latest: None,
            last_data_time: None,
            last_report: Instant::now(),
            stale_after,
            stale_reported: false,
            received: 0,
            source_addr: String::new(),
        }
    }

    /// Espera até `timeout` por dados e aplica apenas a pose mais recente.
    ///
    /// Retorna `false` quando a thread de rede terminou.
    fn pump(&mut self, rx: &Receiver<NetMessage>, timeout: Duration) -> bool {
        match rx.recv_timeout(timeout) {
            Ok(first) => {
                let newest = rx.try_iter().fold(first, |_, msg| msg);
                self.apply(newest);
            }
            Err(RecvTimeoutError::Timeout) => self.check_stale(),
            Err(RecvTimeoutError::Disconnected) => return false,
        }
        true
    }

    fn apply(&mut self, msg: NetMessage) {
        let converted = to_z_up(&msg.pose);
        self.received += 1;
        self.last_data_time = Some(Instant::now());
        debug!("← {} bytes de {}", msg.raw_size, msg.source_addr);

        if self.stale_reported || self.source_addr != msg.source_addr {
            info!("Recebendo poses de {}", msg.source_addr);
            self.stale_reported = false;
            self.source_addr = msg.source_addr;
        }

        if self.last_report.elapsed() >= REPORT_INTERVAL {
            let [x, y, z] = converted.location;
            let [qw, qx, qy, qz] = converted.rotation;
            info!(
                "Câmera ← loc ({x:.3}, {y:.3}, {z:.3}) | rot ({qw:.3}, {qx:.3}, {qy:.3}, {qz:.3})"
            );
            self.last_report = Instant::now();
        }

        self.latest = Some(converted);
    }

    fn check_stale(&mut self) {
        if self.stale_reported {
            return;
        }
        if let Some(t) = self.last_data_time {
            if t.elapsed() >= self.stale_after {
                let [x, y, z] = self.latest.map(|p| p.location).unwrap_or_default();
                warn!(
                    "Sem dados há {:.1}s, mantendo última pose ({x:.3}, {y:.3}, {z:.3})",
                    t.elapsed().as_secs_f64()
                );
                self.stale_reported = true;
            }
        }
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use motion_core::types::Pose;

    fn message(x: f32) -> NetMessage {
        NetMessage {
            pose: Pose {
                position: [x, 0.0, 0.0],
                ..Pose::IDENTITY
            },
            source_addr: "127.0.0.1".into(),
            raw_size: 28,
        }
    }

    #[test]
    fn only_newest_pose_is_applied() {
        let (tx, rx) = bounded(8);
        for x in [1.0, 2.0, 3.0] {
            tx.send(message(x)).unwrap();
        }

        let mut camera = CameraState::new(Duration::from_secs(5));
        assert!(camera.pump(&rx, Duration::from_millis(10)));
        assert_eq!(camera.received, 1);
        assert_eq!(camera.latest.unwrap().location, [3.0, 0.0, 0.0]);
    }

    #[test]
    fn stale_stream_is_reported_once() {
        let (tx, rx) = bounded(8);
        tx.send(message(1.0)).unwrap();

        let mut camera = CameraState::new(Duration::from_millis(1));
        camera.pump(&rx, Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(5));
        camera.pump(&rx, Duration::from_millis(1));
        assert!(camera.stale_reported);
        assert!(camera.latest.is_some());

        tx.send(message(2.0)).unwrap();
        camera.pump(&rx, Duration::from_millis(10));
        assert!(!camera.stale_reported);
    }

    #[test]
    fn disconnected_channel_ends_pump() {
        let (tx, rx) = bounded::<NetMessage>(1);
        drop(tx);
        let mut camera = CameraState::new(Duration::from_secs(5));
        assert!(!camera.pump(&rx, Duration::from_millis(10)));
    }
}
