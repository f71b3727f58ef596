pub mod effect;
pub mod error;
pub mod frame;
pub mod net;
pub mod schedule;

pub use effect::{Effect, EffectKind, EffectRegistry};
pub use error::TransportError;
pub use frame::{Framebuffer, GRID_DIM, quantize};
pub use net::{
    BROADCAST_CHANNEL, ConnectionState, DEFAULT_BACKOFF, DEFAULT_PORT, Dialer, FrameHeader,
    FrameReader, FrameWriter, TcpDialer, Transport, TransportStats, command, encode_frame,
    frame_slot, resolve,
};
pub use schedule::{
    DEFAULT_EFFECT_PERIOD, DEFAULT_TICK_INTERVAL, DEFAULT_TRANSITION, Scheduler, TickReport,
    Ticker, Window, wall_time,
};
