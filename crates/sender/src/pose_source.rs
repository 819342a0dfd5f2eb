//! Fontes de pose amostradas a cada tick.

use motion_core::types::Pose;
use std::f32::consts::TAU;
use std::time::Instant;

/// Qualquer coisa que produza a pose atual da entidade.
pub trait PoseSource {
    fn sample(&mut self) -> Pose;
}

/// Órbita horizontal em torno da origem, sempre olhando para o centro.
///
/// Espaço left-handed Y-up (o mesmo esperado pelo receiver).
pub struct OrbitPath {
    radius: f32,
    height: f32,
    period_secs: f32,
    start: Instant,
}

impl OrbitPath {
    pub fn new(radius: f32, height: f32, period_secs: f32) -> Self {
        Self {
            radius,
            height,
            period_secs: period_secs.max(f32::EPSILON),
            start: Instant::now(),
        }
    }

    /// Pose para um tempo arbitrário desde o início.
    pub fn pose_at(&self, elapsed_secs: f32) -> Pose {
        let angle = TAU * (elapsed_secs / self.period_secs).fract();
        let (sin, cos) = angle.sin_cos();

        // Forward (+Z) aponta para a origem: yaw = angle + 180°
        let yaw = angle + std::f32::consts::PI;
        let (half_sin, half_cos) = (yaw * 0.5).sin_cos();

        Pose {
            position: [self.radius * sin, self.height, self.radius * cos],
            rotation: [half_cos, 0.0, half_sin, 0.0],
        }
    }
}

impl Default for OrbitPath {
    fn default() -> Self {
        Self::new(3.0, 1.6, 12.0)
    }
}

impl PoseSource for OrbitPath {
    fn sample(&mut self) -> Pose {
        self.pose_at(self.start.elapsed().as_secs_f32())
    }
}
