//! Protocolo binário de pose.
//!
//! Cada datagrama UDP carrega exatamente um registro de 28 bytes, sem
//! header, sem prefixo de tamanho e sem checksum (o framing é do próprio UDP):
//!
//! ```text
//! ┌────────┬────────┬────────┬────────┬────────┬────────┬────────┐
//! │ px (4) │ py (4) │ pz (4) │ rw (4) │ rx (4) │ ry (4) │ rz (4) │
//! └────────┴────────┴────────┴────────┴────────┴────────┴────────┘
//! ```
//!
//! Todos os campos são `f32` IEEE-754 em big-endian, independente do host.

use crate::types::Pose;

/// Tamanho fixo de um registro no fio.
pub const WIRE_RECORD_SIZE: usize = 28;

/// Número de campos `f32` no registro.
const FIELD_COUNT: usize = 7;

/// Registro codificado, pronto para `send_to`.
pub type WireRecord = [u8; WIRE_RECORD_SIZE];

/// Erros do protocolo.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Pacote muito curto ({0} bytes, mínimo {WIRE_RECORD_SIZE})")]
    TooShort(usize),
}

/// Codifica uma [`Pose`] no registro de 28 bytes.
///
/// Função pura e total: NaN e infinitos são codificados bit a bit.
pub fn encode_pose(pose: &Pose) -> WireRecord {
    let mut record = [0u8; WIRE_RECORD_SIZE];
    for (chunk, value) in record.chunks_exact_mut(4).zip(pose.fields()) {
        chunk.copy_from_slice(&value.to_be_bytes());
    }
    record
}

/// Decodifica os primeiros 28 bytes de um datagrama em [`Pose`].
///
/// Bytes extras após o registro são ignorados.
pub fn decode_pose(data: &[u8]) -> Result<Pose, ProtocolError> {
    if data.len() < WIRE_RECORD_SIZE {
        return Err(ProtocolError::TooShort(data.len()));
    }

    let mut fields = [0f32; FIELD_COUNT];
    for (field, chunk) in fields.iter_mut().zip(data[..WIRE_RECORD_SIZE].chunks_exact(4)) {
        *field = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    Ok(Pose::from_fields(fields))
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pose() -> Pose {
        Pose {
            position: [1.5, -2.25, 3.0],
            rotation: [0.707, 0.0, 0.707, 0.0],
        }
    }

    fn bits(pose: &Pose) -> Vec<u32> {
        pose.fields().iter().map(|f| f.to_bits()).collect()
    }

    #[test]
    fn record_is_always_28_bytes() {
        assert_eq!(encode_pose(&sample_pose()).len(), 28);
        assert_eq!(encode_pose(&Pose::default()).len(), 28);
    }

    #[test]
    fn first_field_is_big_endian_px() {
        let pose = sample_pose();
        let encoded = encode_pose(&pose);
        assert_eq!(&encoded[0..4], &1.5f32.to_be_bytes());
        // 1.5 = 0x3FC00000
        assert_eq!(&encoded[0..4], &[0x3F, 0xC0, 0x00, 0x00]);
    }

    #[test]
    fn field_order_is_position_then_wxyz() {
        let pose = Pose {
            position: [1.0, 2.0, 3.0],
            rotation: [4.0, 5.0, 6.0, 7.0],
        };
        let encoded = encode_pose(&pose);
        for (i, expected) in [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0].iter().enumerate() {
            assert_eq!(&encoded[i * 4..i * 4 + 4], &expected.to_be_bytes());
        }
    }

    #[test]
    fn decode_is_bitwise_exact() {
        let original = sample_pose();
        let decoded = decode_pose(&encode_pose(&original)).unwrap();
        assert_eq!(bits(&original), bits(&decoded));
    }

    #[test]
    fn special_values_survive() {
        let original = Pose {
            position: [f32::NAN, f32::INFINITY, f32::NEG_INFINITY],
            rotation: [-0.0, f32::MIN_POSITIVE, f32::MAX, f32::MIN],
        };
        let decoded = decode_pose(&encode_pose(&original)).unwrap();
        assert_eq!(bits(&original), bits(&decoded));
    }

    #[test]
    fn non_unit_quaternion_is_not_normalized() {
        let original = Pose {
            position: [0.0; 3],
            rotation: [2.0, 2.0, 2.0, 2.0],
        };
        let decoded = decode_pose(&encode_pose(&original)).unwrap();
        assert_eq!(decoded.rotation, [2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn rejects_short_packet() {
        assert_eq!(decode_pose(&[0u8; 27]), Err(ProtocolError::TooShort(27)));
        assert_eq!(decode_pose(&[]), Err(ProtocolError::TooShort(0)));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let original = sample_pose();
        let mut datagram = encode_pose(&original).to_vec();
        datagram.extend_from_slice(&[0xFF; 8]);
        let decoded = decode_pose(&datagram).unwrap();
        assert_eq!(bits(&original), bits(&decoded));
    }
}
