//! LWNX transaction layer: byte transport, clock and the request/response engine

mod buffer;
mod clock;
mod commands;
mod endpoint;
mod port;

pub use clock::{Clock, Deadline, MonotonicClock};
pub use commands::STR16_LEN;
pub use endpoint::{DEFAULT_ATTEMPTS, DEFAULT_TIMEOUT_MS, Endpoint, EndpointConfig};
pub use port::{ByteTransport, IoTransport};
