use std::io;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid port in '{0}'")]
    InvalidPort(String),
    #[error("failed to resolve '{host}': {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("'{0}' resolved to no addresses")]
    NoAddresses(String),
    #[error("not connected")]
    NotConnected,
    #[error("transport closed")]
    Closed,
    #[error("frame payload of {0} bytes does not fit the 16-bit length field")]
    FrameTooLarge(usize),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}
