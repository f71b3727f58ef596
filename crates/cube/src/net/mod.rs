mod address;
mod handoff;
mod protocol;
mod transport;

pub use address::{parse_target, resolve};
pub use handoff::{FrameReader, FrameWriter, frame_slot};
pub use protocol::{
    BROADCAST_CHANNEL, DEFAULT_PORT, FrameHeader, HEADER_SIZE, command,
    encode_channels_into, encode_frame, encode_frame_into, frame_len,
};
pub use transport::{
    ConnectionState, DEFAULT_BACKOFF, Dialer, TcpDialer, Transport, TransportStats, write_frame,
};
