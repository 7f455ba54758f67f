//! CRC-16 (polynomial 0x1021, seed 0) shared by the encoder and the parser.

/// Compute the LWNX frame checksum.
///
/// Byte-wise CRC-16 with polynomial `0x1021`, initial value `0`, MSB first,
/// identical to CRC-16/XMODEM. Devices reject any frame whose trailing CRC
/// was not produced by exactly this reduction.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |crc, &byte| {
        let mut code = (crc >> 8) ^ u16::from(byte);
        code ^= code >> 4;
        (crc << 8) ^ code ^ (code << 5) ^ (code << 12)
    })
}
