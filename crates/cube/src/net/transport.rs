use std::io::{self, Write};
use std::mem;
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

use super::address::resolve;
use super::protocol::encode_frame_into;
use crate::error::TransportError;
use crate::frame::Framebuffer;

pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

pub trait Dialer {
    type Stream: Write;

    fn dial(&mut self, addr: SocketAddr) -> io::Result<Self::Stream>;
}

// SIGPIPE is already ignored by the Rust runtime, so broken pipes come back
// as io errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

impl Dialer for TcpDialer {
    type Stream = TcpStream;

    fn dial(&mut self, addr: SocketAddr) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransportStats {
    pub frames_sent: u64,
    pub bytes_sent: u64,
    pub send_failures: u64,
    pub connects: u64,
    pub failed_dials: u64,
}

/// Streams frames to one display, reconnecting on demand.
///
/// Addresses are resolved once up front and reused for every reconnect.
/// Frames are never queued: a frame that fails to send is dropped and the
/// caller is expected to `connect` again before the next one.
pub struct Transport<D: Dialer = TcpDialer> {
    dialer: D,
    addresses: Vec<SocketAddr>,
    stream: Option<D::Stream>,
    peer: Option<SocketAddr>,
    state: ConnectionState,
    backoff: Duration,
    stats: TransportStats,
    frame: Vec<u8>,
    closed: bool,
}

impl Transport<TcpDialer> {
    pub fn resolve(target: &str, default_port: u16) -> Result<Self, TransportError> {
        let addresses = resolve(target, default_port)?;
        Ok(Self::with_dialer(addresses, TcpDialer))
    }
}

impl<D: Dialer> Transport<D> {
    pub fn with_dialer(addresses: Vec<SocketAddr>, dialer: D) -> Self {
        Self {
            dialer,
            addresses,
            stream: None,
            peer: None,
            state: ConnectionState::Disconnected,
            backoff: DEFAULT_BACKOFF,
            stats: TransportStats::default(),
            frame: Vec::new(),
            closed: false,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn addresses(&self) -> &[SocketAddr] {
        &self.addresses
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn stats(&self) -> &TransportStats {
        &self.stats
    }

    pub fn dialer(&self) -> &D {
        &self.dialer
    }

    /// Makes one pass over the candidate addresses. Returns whether a
    /// connection is up afterwards.
    pub fn try_connect(&mut self) -> Result<bool, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        if self.stream.is_some() {
            return Ok(true);
        }

        self.state = ConnectionState::Connecting;

        for &addr in &self.addresses {
            match self.dialer.dial(addr) {
                Ok(stream) => {
                    log::info!("Connected to {}", addr);
                    self.stream = Some(stream);
                    self.peer = Some(addr);
                    self.state = ConnectionState::Connected;
                    self.stats.connects += 1;
                    return Ok(true);
                }
                Err(e) => {
                    log::warn!("Connect to {} failed: {}", addr, e);
                    self.stats.failed_dials += 1;
                }
            }
        }

        self.state = ConnectionState::Disconnected;
        Ok(false)
    }

    /// Blocks until a connection is established, sleeping the backoff
    /// between passes over the address list. Returns the number of passes.
    pub fn connect(&mut self) -> Result<u32, TransportError> {
        let mut rounds = 1;
        while !self.try_connect()? {
            log::debug!("No endpoint reachable, retrying in {:?}", self.backoff);
            if !self.backoff.is_zero() {
                thread::sleep(self.backoff);
            }
            rounds += 1;
        }
        Ok(rounds)
    }

    /// Encodes `fb` into the transport's reusable frame buffer.
    pub fn encode(
        &mut self,
        fb: &Framebuffer,
        channel: u8,
        command: u8,
    ) -> Result<&[u8], TransportError> {
        encode_frame_into(fb, channel, command, &mut self.frame)?;
        Ok(&self.frame)
    }

    /// Writes one whole frame. On failure the connection is dropped and the
    /// frame is lost.
    pub fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        match write_frame(stream, frame) {
            Ok(()) => {
                self.stats.frames_sent += 1;
                self.stats.bytes_sent += frame.len() as u64;
                Ok(())
            }
            Err(e) => {
                log::warn!(
                    "Send to {} failed: {}",
                    self.peer.map_or_else(|| "?".to_string(), |addr| addr.to_string()),
                    e
                );
                self.stats.send_failures += 1;
                self.disconnect();
                Err(TransportError::Write(e))
            }
        }
    }

    pub fn send_buffer(
        &mut self,
        fb: &Framebuffer,
        channel: u8,
        command: u8,
    ) -> Result<(), TransportError> {
        let mut frame = mem::take(&mut self.frame);
        let result = encode_frame_into(fb, channel, command, &mut frame)
            .and_then(|()| self.send(&frame));
        self.frame = frame;
        result
    }

    /// Drops the current stream but keeps the resolved addresses.
    pub fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("Dropped connection to {:?}", self.peer);
        }
        self.peer = None;
        self.state = ConnectionState::Disconnected;
    }

    /// Releases the stream and the resolved addresses. Safe to call twice.
    pub fn close(&mut self) {
        self.disconnect();
        self.addresses.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<D: Dialer> std::fmt::Debug for Transport<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("addresses", &self.addresses)
            .field("peer", &self.peer)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Writes all of `frame`, riding out short writes and interrupts.
pub fn write_frame<W: Write>(stream: &mut W, frame: &[u8]) -> io::Result<()> {
    let mut remaining = frame;
    while !remaining.is_empty() {
        match stream.write(remaining) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "peer stopped accepting frame data",
                ));
            }
            Ok(n) => remaining = &remaining[n..],
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    stream.flush()
}
