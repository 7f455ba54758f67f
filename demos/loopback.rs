//! Talk to an in-memory LWNX sensor through an `Endpoint`

use std::collections::VecDeque;
use std::io;

use lwnx::{ByteTransport, Direction, Endpoint, ResponsePacket, encode};

/// Minimal device: answers product name, firmware version and distance.
struct LoopbackSensor {
    parser: ResponsePacket,
    outbox: VecDeque<u8>,
    update_rate: u32,
}

impl LoopbackSensor {
    fn new() -> Self {
        Self {
            parser: ResponsePacket::new(),
            outbox: VecDeque::new(),
            update_rate: 1,
        }
    }

    fn reply(&mut self, command_id: u8, direction: Direction, data: &[u8]) -> io::Result<()> {
        let frame = encode(command_id, direction, data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.outbox.extend(frame);
        Ok(())
    }
}

impl ByteTransport for LoopbackSensor {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        for &byte in bytes {
            if !self.parser.feed(byte).is_complete() {
                continue;
            }
            let Some(request) = self.parser.to_packet() else {
                continue;
            };
            let direction = request.direction();
            match request.command_id() {
                0 => self.reply(0, direction, b"LW20/C\0\0\0\0\0\0\0\0\0\0")?,
                2 => self.reply(2, direction, &[7, 2, 1, 0])?,
                30 => {
                    if let Ok(raw) = <[u8; 4]>::try_from(request.payload().as_ref()) {
                        self.update_rate = u32::from_le_bytes(raw);
                    }
                    self.reply(30, direction, &self.update_rate.to_le_bytes())?;
                    // Streaming starts once the rate is set.
                    self.reply(44, Direction::Read, &1234u16.to_le_bytes())?;
                }
                _ => {}
            }
        }
        Ok(bytes.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.outbox.len());
        for (slot, byte) in buf.iter_mut().zip(self.outbox.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("LWNX Loopback Example");
    println!("=====================\n");

    let mut endpoint = Endpoint::new(LoopbackSensor::new());

    let name = endpoint.read_str16(0)?;
    println!("Product name: {name}");

    let version = endpoint.read_firmware_version(2)?;
    println!("Firmware: {version}");

    endpoint.write_u32(30, 5)?;
    println!("Update rate set to {}", endpoint.read_u32(30)?);

    let reading = endpoint.recv_packet(44, 500)?;
    let raw = <[u8; 2]>::try_from(reading.payload().as_ref())?;
    println!("Distance: {} cm", u16::from_le_bytes(raw));

    match endpoint.read_u8(99) {
        Ok(value) => println!("Unexpected reply: {value}"),
        Err(err) => println!("Unknown command: {err}"),
    }

    println!("\nLink stats: {:?}", endpoint.stats());

    Ok(())
}
