use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result, anyhow};
use cubelight::{
    Dialer, FrameReader, Framebuffer, Scheduler, TcpDialer, TickReport, Ticker, Transport,
    TransportError, frame_slot, wall_time,
};

use crate::config::DriverConfig;

/// Sends one frame, reconnecting if the send fails. A frame lost to a
/// dropped connection is not retried.
fn deliver<D: Dialer>(
    transport: &mut Transport<D>,
    fb: &Framebuffer,
    channel: u8,
    command: u8,
) -> Result<bool, TransportError> {
    match transport.send_buffer(fb, channel, command) {
        Ok(()) => Ok(true),
        Err(TransportError::Write(_) | TransportError::NotConnected) => {
            log::warn!("Display connection lost, reconnecting");
            let rounds = transport.connect()?;
            log::info!("Reconnected after {} attempt(s)", rounds);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Single-threaded render-then-send loop.
pub struct Driver<D: Dialer = TcpDialer> {
    scheduler: Scheduler,
    transport: Transport<D>,
    framebuffer: Framebuffer,
    config: DriverConfig,
    running: Arc<AtomicBool>,
    frames_dropped: u64,
}

impl<D: Dialer> Driver<D> {
    pub fn new(scheduler: Scheduler, transport: Transport<D>, config: DriverConfig) -> Self {
        Self {
            scheduler,
            transport,
            framebuffer: Framebuffer::new(config.grid_dim),
            config,
            running: Arc::new(AtomicBool::new(true)),
            frames_dropped: 0,
        }
    }

    pub fn running(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn transport(&self) -> &Transport<D> {
        &self.transport
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    pub fn tick_once(&mut self, t: f64) -> Result<TickReport, TransportError> {
        let report = self.scheduler.render(t, &mut self.framebuffer);

        let delivered = deliver(
            &mut self.transport,
            &self.framebuffer,
            self.config.channel,
            self.config.command,
        )?;
        if !delivered {
            self.frames_dropped += 1;
        }

        Ok(report)
    }

    pub fn run(&mut self) -> Result<(), TransportError> {
        let rounds = self.transport.connect()?;
        log::info!("Streaming to display after {} connect attempt(s)", rounds);

        let mut ticker = Ticker::new(self.config.tick_interval);
        while self.running.load(Ordering::SeqCst) {
            self.tick_once(wall_time())?;
            ticker.wait();
        }

        self.transport.close();
        Ok(())
    }
}

/// Renders on the calling thread and streams on a dedicated I/O thread, so
/// a stalled connection drops frames instead of stalling the animation.
pub fn run_decoupled<D>(
    mut scheduler: Scheduler,
    transport: Transport<D>,
    config: DriverConfig,
    running: Arc<AtomicBool>,
) -> Result<()>
where
    D: Dialer + Send + 'static,
    D::Stream: Send,
{
    let (writer, reader) = frame_slot(config.grid_dim);

    let io_config = config.clone();
    let io = thread::Builder::new()
        .name("cubelight-io".into())
        .spawn(move || stream_frames(transport, reader, &io_config))
        .context("failed to spawn I/O thread")?;

    let mut framebuffer = Framebuffer::new(config.grid_dim);
    let mut ticker = Ticker::new(config.tick_interval);
    while running.load(Ordering::SeqCst) && !writer.is_closed() {
        scheduler.render(wall_time(), &mut framebuffer);
        writer.publish(&framebuffer);
        ticker.wait();
    }
    drop(writer);

    io.join()
        .map_err(|_| anyhow!("I/O thread panicked"))?
        .context("display transport failed")
}

fn stream_frames<D: Dialer>(
    mut transport: Transport<D>,
    mut reader: FrameReader,
    config: &DriverConfig,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to build I/O runtime")?;

    let result = runtime.block_on(async {
        transport.connect()?;

        let mut framebuffer = Framebuffer::new(config.grid_dim);
        while reader.next(&mut framebuffer).await {
            deliver(&mut transport, &framebuffer, config.channel, config.command)?;
        }
        Ok::<_, TransportError>(())
    });

    transport.close();
    Ok(result?)
}
