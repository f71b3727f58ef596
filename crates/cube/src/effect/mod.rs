//! Procedural effects and the ordered playlist the scheduler cycles through.

mod blips;
mod jumping;
mod lava;
mod radar;
mod rect_flip;
mod wave;

use crate::frame::Framebuffer;

pub use blips::RandomBlips;
pub use jumping::JumpingPixels;
pub use lava::LavaBalloon;
pub use radar::RadarScan;
pub use rect_flip::RectFlip;
pub use wave::Wave;

/// A time-parameterised procedure that draws into a framebuffer.
///
/// Effects may read what the buffer held on the previous tick (trails,
/// decay), so the scheduler keeps handing each effect the same working
/// buffer while it stays on screen.
pub trait Effect: Send {
    fn render(&mut self, fb: &mut Framebuffer, t: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    LavaBalloon,
    JumpingPixels,
    RandomBlips,
    RectFlip,
    RadarScan,
    Wave,
}

impl EffectKind {
    pub const ALL: [EffectKind; 6] = [
        EffectKind::LavaBalloon,
        EffectKind::JumpingPixels,
        EffectKind::RandomBlips,
        EffectKind::RectFlip,
        EffectKind::RadarScan,
        EffectKind::Wave,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::LavaBalloon => "lava-balloon",
            EffectKind::JumpingPixels => "jumping-pixels",
            EffectKind::RandomBlips => "random-blips",
            EffectKind::RectFlip => "rect-flip",
            EffectKind::RadarScan => "radar-scan",
            EffectKind::Wave => "wave",
        }
    }

    pub fn create(&self) -> Box<dyn Effect> {
        match self {
            EffectKind::LavaBalloon => Box::new(LavaBalloon),
            EffectKind::JumpingPixels => Box::new(JumpingPixels::new()),
            EffectKind::RandomBlips => Box::new(RandomBlips::new()),
            EffectKind::RectFlip => Box::new(RectFlip),
            EffectKind::RadarScan => Box::new(RadarScan),
            EffectKind::Wave => Box::new(Wave),
        }
    }
}

type EffectFactory = Box<dyn FnMut() -> Box<dyn Effect> + Send>;

struct EffectSlot {
    name: String,
    factory: EffectFactory,
    instance: Option<Box<dyn Effect>>,
}

/// Ordered effect playlist. Each effect is built the first time it is
/// rendered and then owns its state for the rest of the run.
#[derive(Default)]
pub struct EffectRegistry {
    slots: Vec<EffectSlot>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn builtin() -> Self {
        Self::from_kinds(EffectKind::ALL)
    }

    pub fn pinned(kind: EffectKind) -> Self {
        Self::from_kinds([kind])
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = EffectKind>) -> Self {
        let mut registry = Self::new();
        for kind in kinds {
            registry.register(kind.as_str(), move || kind.create());
        }
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: FnMut() -> Box<dyn Effect> + Send + 'static,
    {
        self.slots.push(EffectSlot {
            name: name.into(),
            factory: Box::new(factory),
            instance: None,
        });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|slot| slot.name.as_str())
    }

    pub fn is_instantiated(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| slot.instance.is_some())
    }

    /// Renders effect `index` (wrapped into range) into `fb`.
    pub fn render(&mut self, index: usize, fb: &mut Framebuffer, t: f64) {
        if self.slots.is_empty() {
            return;
        }
        let len = self.slots.len();
        let slot = &mut self.slots[index % len];
        let instance = slot.instance.get_or_insert_with(|| {
            log::debug!("Starting effect {}", slot.name);
            (slot.factory)()
        });
        instance.render(fb, t);
    }
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| &slot.name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Solid(f64);

    impl Effect for Solid {
        fn render(&mut self, fb: &mut Framebuffer, _t: f64) {
            fb.fill(self.0, self.0, self.0);
        }
    }

    #[test]
    fn effects_are_built_lazily_and_once() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);

        let mut registry = EffectRegistry::new();
        registry.register("solid", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(Solid(0.5))
        });

        assert_eq!(built.load(Ordering::SeqCst), 0);
        assert!(!registry.is_instantiated(0));

        let mut fb = Framebuffer::new(2);
        registry.render(0, &mut fb, 0.0);
        registry.render(0, &mut fb, 1.0);

        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert!(registry.is_instantiated(0));
        assert_eq!(fb.get(1, 1, 1), Some([0.5; 3]));
    }

    #[test]
    fn render_index_wraps() {
        let mut registry = EffectRegistry::new();
        registry.register("dark", || Box::new(Solid(0.0)));
        registry.register("light", || Box::new(Solid(1.0)));

        let mut fb = Framebuffer::new(2);
        registry.render(3, &mut fb, 0.0);
        assert_eq!(fb.get(0, 0, 0), Some([1.0; 3]));
    }

    #[test]
    fn builtin_playlist_order() {
        let registry = EffectRegistry::builtin();
        assert_eq!(registry.len(), EffectKind::ALL.len());
        assert_eq!(registry.name(0), Some("lava-balloon"));
        assert_eq!(registry.name(5), Some("wave"));

        let pinned = EffectRegistry::pinned(EffectKind::RectFlip);
        assert_eq!(pinned.len(), 1);
        assert_eq!(pinned.name(0), Some("rect-flip"));
    }

    #[test]
    fn builtin_effects_stay_in_range() {
        for kind in EffectKind::ALL {
            let mut effect = kind.create();
            let mut fb = Framebuffer::new(8);
            for step in 0..200 {
                effect.render(&mut fb, 1_700_000_000.0 + step as f64 * 0.05);
                assert!(
                    fb.channels().iter().all(|c| (-1e-9..=1.0 + 1e-9).contains(c)),
                    "{} left [0, 1] at step {}",
                    kind.as_str(),
                    step
                );
            }
        }
    }
}
