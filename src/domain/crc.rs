//! CRC-16/CCITT-FALSE, the checksum variant mandated by EMVCo QR payloads.
//!
//! Polynomial `0x1021`, initial register `0xFFFF`, no input or output
//! reflection and no final XOR. Scanners reject payloads checked with any
//! other CRC-16 flavour.

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// Computes the raw 16-bit register over `data`.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = INITIAL;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Computes the checksum of `data` as four uppercase hex digits.
pub fn checksum(data: &str) -> String {
    to_hex(crc16(data.as_bytes()))
}

fn to_hex(register: u16) -> String {
    format!("{register:04X}")
}
