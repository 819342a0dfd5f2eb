//! # Virtual Motion Camera – Sender
//!
//! Amostra a pose da câmera a cada tick e envia via UDP (28 bytes
//! big-endian por datagrama, sem handshake).
//!
//! ## Uso
//! ```bash
//! pose_sender               # Roda até ser encerrado
//! pose_sender --seconds 30  # Para sozinho depois de 30s
//! ```

mod pose_source;

use motion_core::config::AppConfig;
use motion_core::transmitter::PoseTransmitter;
use pose_source::{OrbitPath, PoseSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

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

    // ── Carregar config ──
    let config = AppConfig::load_or_init();
    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    let sender_cfg = &config.sender;
    let interval = sender_cfg.tick_interval();

    // ── Transmissor ──
    let mut transmitter =
        match PoseTransmitter::configure(&sender_cfg.host, sender_cfg.port, &sender_cfg.bind_ip) {
            Ok(t) => t,
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        };

    // ── Parada ──
    let stop = Arc::new(AtomicBool::new(false));
    if let Some(secs) = run_for_secs() {
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs_f64(secs));
            stop.store(true, Ordering::Relaxed);
        });
    }

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   🎥 VIRTUAL MOTION CAMERA SENDER – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Destino:   {}", transmitter.destination());
    println!("  Taxa:      {:.0} Hz", sender_cfg.rate_hz);
    println!("  Registro:  {} bytes big-endian", motion_core::WIRE_RECORD_SIZE);
    println!("══════════════════════════════════════════════");
    println!();

    let mut source = OrbitPath::default();
    run_loop(&mut transmitter, &mut source, interval, &stop);
    transmitter.stop();
}

/// Um transmit por tick até `stop` ser sinalizado.
fn run_loop(
    transmitter: &mut PoseTransmitter,
    source: &mut dyn PoseSource,
    interval: Duration,
    stop: &AtomicBool,
) {
    let mut last_report = Instant::now();

    while !stop.load(Ordering::Relaxed) {
        let cycle_start = Instant::now();

        let pose = source.sample();
        transmitter.transmit(&pose);

        if last_report.elapsed() >= Duration::from_secs(5) {
            let stats = transmitter.stats();
            info!(
                "{} enviados, {} falhas | pos ({:.2}, {:.2}, {:.2})",
                stats.sent, stats.failed, pose.position[0], pose.position[1], pose.position[2]
            );
            last_report = Instant::now();
        }

        // Dormir pelo tempo restante do tick
        let elapsed = cycle_start.elapsed();
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
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
    use motion_core::protocol::decode_pose;
    use motion_core::types::Pose;
    use std::net::UdpSocket;

    struct Fixed(Pose);

    impl PoseSource for Fixed {
        fn sample(&mut self) -> Pose {
            self.0
        }
    }

    #[test]
    fn loop_transmits_until_stopped() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut tx = PoseTransmitter::configure("127.0.0.1", port, "").unwrap();
        let pose = Pose {
            position: [1.0, 2.0, 3.0],
            ..Pose::IDENTITY
        };
        let mut source = Fixed(pose);

        let stop = Arc::new(AtomicBool::new(false));
        let stopper = Arc::clone(&stop);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            stopper.store(true, Ordering::Relaxed);
        });

        run_loop(&mut tx, &mut source, Duration::from_millis(5), &stop);
        assert!(tx.stats().sent >= 1);

        let mut buf = [0u8; 64];
        let (size, _) = listener.recv_from(&mut buf).unwrap();
        assert_eq!(decode_pose(&buf[..size]).unwrap(), pose);
    }
}
