use std::mem;

use crate::effect::EffectRegistry;
use crate::frame::Framebuffer;

pub const DEFAULT_EFFECT_PERIOD: f64 = 30.0;
pub const DEFAULT_TRANSITION: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Transition,
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub window: Window,
    pub current: usize,
    pub flipped: bool,
    pub mix: f64,
}

/// Cycles through the registry, spending the first `transition` seconds of
/// every `period` crossfading from the current effect to the next one.
///
/// `front` is always the buffer of the effect on screen; `back` belongs to
/// the incoming effect and only carries pixels during a transition. When the
/// steady window starts the two swap, so the incoming effect keeps drawing
/// into the buffer it faded in on.
#[derive(Debug)]
pub struct Scheduler {
    registry: EffectRegistry,
    current: usize,
    front: Framebuffer,
    back: Framebuffer,
    flip_armed: bool,
    last_cycle: Option<i64>,
    period: f64,
    transition: f64,
}

impl Scheduler {
    pub fn new(registry: EffectRegistry, dim: usize) -> Self {
        Self::with_timing(registry, dim, DEFAULT_EFFECT_PERIOD, DEFAULT_TRANSITION)
    }

    /// # Panics
    ///
    /// Panics unless `period` is positive and finite and `transition` lies in
    /// `[0, period]`.
    pub fn with_timing(registry: EffectRegistry, dim: usize, period: f64, transition: f64) -> Self {
        assert!(
            period.is_finite() && period > 0.0,
            "effect period must be positive"
        );
        assert!(
            (0.0..=period).contains(&transition),
            "transition must fit inside the effect period"
        );

        Self {
            registry,
            current: 0,
            front: Framebuffer::new(dim),
            back: Framebuffer::new(dim),
            flip_armed: false,
            last_cycle: None,
            period,
            transition,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn window_at(&self, t: f64) -> Window {
        if t.rem_euclid(self.period) < self.transition {
            Window::Transition
        } else {
            Window::Steady
        }
    }

    pub fn render(&mut self, t: f64, out: &mut Framebuffer) -> TickReport {
        let phase = t.rem_euclid(self.period);
        let cycle = ((t - phase) / self.period).round() as i64;
        let skipped_transition = self.last_cycle.is_some_and(|last| cycle > last);
        self.last_cycle = Some(cycle);

        let count = self.registry.len();
        if count == 0 {
            out.clear();
            return TickReport {
                window: self.window_at(t),
                current: 0,
                flipped: false,
                mix: 0.0,
            };
        }

        // A lone effect never crossfades into itself.
        if count == 1 {
            self.registry.render(self.current, &mut self.front, t);
            out.copy_from(&self.front);
            return TickReport {
                window: self.window_at(t),
                current: self.current,
                flipped: false,
                mix: 0.0,
            };
        }

        if phase < self.transition {
            if !self.flip_armed {
                self.arm();
            }

            self.registry.render(self.current, &mut self.front, t);
            self.registry
                .render((self.current + 1) % count, &mut self.back, t);

            let mix = phase / self.transition;
            Framebuffer::merge(out, &self.front, &self.back, mix);

            return TickReport {
                window: Window::Transition,
                current: self.current,
                flipped: false,
                mix,
            };
        }

        if skipped_transition && !self.flip_armed {
            log::debug!("Transition window skipped, flipping late");
            self.arm();
        }

        let flipped = self.flip_armed;
        if flipped {
            mem::swap(&mut self.front, &mut self.back);
            self.current = (self.current + 1) % count;
            self.flip_armed = false;
            log::info!(
                "Now showing effect {} ({})",
                self.current,
                self.registry.name(self.current).unwrap_or("?")
            );
        }

        self.registry.render(self.current, &mut self.front, t);
        Framebuffer::merge(out, &self.front, &self.back, 0.0);

        TickReport {
            window: Window::Steady,
            current: self.current,
            flipped,
            mix: 0.0,
        }
    }

    fn arm(&mut self) {
        self.back.clear();
        self.flip_armed = true;
    }
}
