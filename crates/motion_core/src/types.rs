//! Tipos compartilhados: pose e nomes de fontes.

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Pose
// ──────────────────────────────────────────────

/// Posição + orientação de uma entidade, exatamente como amostrada.
///
/// Nenhuma validação é feita: o quaternion pode não ser unitário.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    /// x, y, z
    pub position: [f32; 3],
    /// w, x, y, z
    pub rotation: [f32; 4],
}

impl Pose {
    /// Quaternion identidade na origem.
    pub const IDENTITY: Pose = Pose {
        position: [0.0, 0.0, 0.0],
        rotation: [1.0, 0.0, 0.0, 0.0],
    };

    /// Os sete campos na ordem do fio: px, py, pz, rw, rx, ry, rz.
    pub fn fields(&self) -> [f32; 7] {
        let [px, py, pz] = self.position;
        let [rw, rx, ry, rz] = self.rotation;
        [px, py, pz, rw, rx, ry, rz]
    }

    pub fn from_fields(f: [f32; 7]) -> Self {
        Self {
            position: [f[0], f[1], f[2]],
            rotation: [f[3], f[4], f[5], f[6]],
        }
    }
}

// ──────────────────────────────────────────────
// Fontes
// ──────────────────────────────────────────────

/// Identificador opaco de uma fonte de vídeo descoberta.
pub type SourceName = String;

/// Lista ordenada de fontes, renovada a cada poll.
pub type SourceList = Vec<SourceName>;
