mod clock;
mod scheduler;

pub use clock::{DEFAULT_TICK_INTERVAL, Ticker, wall_time};
pub use scheduler::{DEFAULT_EFFECT_PERIOD, DEFAULT_TRANSITION, Scheduler, TickReport, Window};
