use tokio::sync::watch;

use crate::frame::Framebuffer;

pub fn frame_slot(dim: usize) -> (FrameWriter, FrameReader) {
    let (tx, rx) = watch::channel(Framebuffer::new(dim));
    (FrameWriter { tx }, FrameReader { rx })
}

#[derive(Debug)]
pub struct FrameWriter {
    tx: watch::Sender<Framebuffer>,
}

impl FrameWriter {
    pub fn publish(&self, fb: &Framebuffer) {
        self.tx.send_modify(|slot| slot.copy_from(fb));
    }

    /// True once the reader has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct FrameReader {
    rx: watch::Receiver<Framebuffer>,
}

impl FrameReader {
    /// Waits for a frame newer than the last one taken and copies it into
    /// `into`. Returns `false` once the writer is gone.
    pub async fn next(&mut self, into: &mut Framebuffer) -> bool {
        if self.rx.changed().await.is_err() {
            return false;
        }
        into.copy_from(&self.rx.borrow_and_update());
        true
    }

    /// Copies the latest frame if one arrived since the last take.
    pub fn try_take(&mut self, into: &mut Framebuffer) -> bool {
        if !self.rx.has_changed().unwrap_or(false) {
            return false;
        }
        into.copy_from(&self.rx.borrow_and_update());
        true
    }
}
