use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use cubelight::{
    ConnectionState, Dialer, FrameHeader, Framebuffer, Transport, TransportError, command,
    encode_frame,
};

/// A stream that takes one byte per write call.
struct OneByteStream {
    sink: Arc<Mutex<Vec<u8>>>,
}

impl Write for OneByteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match buf.first() {
            Some(&byte) => {
                self.sink.lock().unwrap().push(byte);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Refuses the first `failures` dials, then hands out one-byte streams.
struct FlakyDialer {
    failures: u32,
    attempts: u32,
    sink: Arc<Mutex<Vec<u8>>>,
}

impl Dialer for FlakyDialer {
    type Stream = OneByteStream;

    fn dial(&mut self, _addr: SocketAddr) -> io::Result<OneByteStream> {
        self.attempts += 1;
        if self.attempts <= self.failures {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        Ok(OneByteStream {
            sink: Arc::clone(&self.sink),
        })
    }
}

fn flaky(failures: u32) -> (Transport<FlakyDialer>, Arc<Mutex<Vec<u8>>>) {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let dialer = FlakyDialer {
        failures,
        attempts: 0,
        sink: Arc::clone(&sink),
    };
    let addr = SocketAddr::from(([127, 0, 0, 1], 7890));
    let transport = Transport::with_dialer(vec![addr], dialer).with_backoff(Duration::ZERO);
    (transport, sink)
}

fn read_frame(stream: &mut impl Read) -> io::Result<(FrameHeader, Vec<u8>)> {
    let mut header = [0u8; 4];
    stream.read_exact(&mut header)?;
    let header = FrameHeader::parse(&header).expect("four header bytes");
    let mut payload = vec![0u8; header.length as usize];
    stream.read_exact(&mut payload)?;
    Ok((header, payload))
}

#[test]
fn reconnect_converges_after_failures() {
    for failures in [0, 1, 5, 20] {
        let (mut transport, _) = flaky(failures);

        let rounds = transport.connect().unwrap();

        assert_eq!(rounds, failures + 1);
        assert_eq!(transport.dialer().attempts, failures + 1);
        assert_eq!(transport.state(), ConnectionState::Connected);
    }
}

#[test]
fn partial_writes_deliver_whole_frame() {
    let (mut transport, sink) = flaky(0);
    transport.connect().unwrap();

    let mut fb = Framebuffer::default();
    fb.set(0, 0, 0, 1.0, 0.5, 0.0);
    fb.set(7, 7, 7, 0.0, 0.0, 1.0);
    let expected = encode_frame(&fb, 0, command::SET_PIXEL_COLORS).unwrap();

    transport.send(&expected).unwrap();

    assert_eq!(*sink.lock().unwrap(), expected);
    assert_eq!(&expected[..6], &[0, 0, 0x06, 0x00, 255, 127]);
    assert_eq!(&expected[expected.len() - 3..], &[0, 0, 255]);
}

#[test]
fn frames_reach_a_tcp_display() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let display = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let first = read_frame(&mut stream).unwrap();
        let second = read_frame(&mut stream).unwrap();
        (first, second)
    });

    let mut transport = Transport::resolve(&format!("127.0.0.1:{port}"), 1).unwrap();
    transport.connect().unwrap();

    let mut fb = Framebuffer::default();
    fb.fill(0.5, 0.0, 1.0);
    transport.send_buffer(&fb, 0, command::SET_PIXEL_COLORS).unwrap();
    fb.fill(0.0, 1.0, 0.0);
    transport.send_buffer(&fb, 2, command::SET_PIXEL_COLORS).unwrap();

    let ((h1, p1), (h2, p2)) = display.join().unwrap();
    assert_eq!(h1, FrameHeader::new(0, 0, 1536));
    assert!(p1.chunks_exact(3).all(|c| c == [127, 0, 255]));
    assert_eq!(h2.channel, 2);
    assert!(p2.chunks_exact(3).all(|c| c == [0, 255, 0]));
    assert_eq!(transport.stats().frames_sent, 2);
}

#[test]
fn dropped_display_is_detected_and_reconnected() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut transport = Transport::resolve(&format!("127.0.0.1:{port}"), 1)
        .unwrap()
        .with_backoff(Duration::from_millis(10));
    transport.connect().unwrap();

    let (first, _) = listener.accept().unwrap();
    drop(first);

    let fb = Framebuffer::default();
    let deadline = Instant::now() + Duration::from_secs(5);
    let err = loop {
        match transport.send_buffer(&fb, 0, 0) {
            Ok(()) => {
                assert!(Instant::now() < deadline, "write never failed");
                thread::sleep(Duration::from_millis(10));
            }
            Err(e) => break e,
        }
    };

    assert!(matches!(err, TransportError::Write(_)));
    assert_eq!(transport.state(), ConnectionState::Disconnected);
    assert!(matches!(
        transport.send_buffer(&fb, 0, 0),
        Err(TransportError::NotConnected)
    ));

    let display = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_frame(&mut stream).unwrap()
    });

    transport.connect().unwrap();
    transport.send_buffer(&fb, 0, 0).unwrap();

    let (header, payload) = display.join().unwrap();
    assert_eq!(header.length, 1536);
    assert!(payload.iter().all(|&b| b == 0));
    assert_eq!(transport.stats().connects, 2);
    assert_eq!(transport.stats().send_failures, 1);
}

#[test]
fn unresolvable_host_fails_construction() {
    let result = Transport::resolve("no-such-display.invalid:7890", 7890);
    assert!(matches!(result, Err(TransportError::Resolve { .. })));
}
