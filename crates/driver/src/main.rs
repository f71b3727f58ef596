mod config;
mod driver;

use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cubelight::{
    DEFAULT_EFFECT_PERIOD, DEFAULT_PORT, DEFAULT_TRANSITION, EffectKind, Scheduler, Transport,
};

use config::DriverConfig;
use driver::{Driver, run_decoupled};

#[derive(Parser)]
#[command(name = "cubelight")]
#[command(about = "Streams animated effects to an 8x8x8 LED cube")]
struct Args {
    /// Display address as host[:port]
    #[arg(default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
    target: String,

    /// Pin a single effect by index instead of cycling
    effect: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_EFFECT_PERIOD, help = "Seconds per effect")]
    period: f64,

    #[arg(long, default_value_t = DEFAULT_TRANSITION, help = "Crossfade length in seconds")]
    transition: f64,

    #[arg(long, default_value_t = 50, help = "Milliseconds between frames")]
    interval_ms: u64,

    #[arg(short, long, default_value_t = cubelight::BROADCAST_CHANNEL)]
    channel: u8,

    #[arg(long, default_value_t = 1000, help = "Milliseconds between reconnect rounds")]
    backoff_ms: u64,

    #[arg(long, help = "Render and send on separate threads")]
    decoupled: bool,

    #[arg(long, help = "Print the built-in effects and exit")]
    list_effects: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_effects {
        for (index, kind) in EffectKind::ALL.iter().enumerate() {
            println!("{:>2}  {}", index, kind.as_str());
        }
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DriverConfig {
        target: args.target,
        pinned_effect: args.effect,
        period_secs: args.period,
        transition_secs: args.transition,
        tick_interval: Duration::from_millis(args.interval_ms),
        backoff: Duration::from_millis(args.backoff_ms),
        channel: args.channel,
        decoupled: args.decoupled,
        ..Default::default()
    };
    config.validate()?;

    let transport = Transport::resolve(&config.target, config.default_port)
        .with_context(|| format!("cannot resolve display address {}", config.target))?
        .with_backoff(config.backoff);
    log::info!("Display at {:?}", transport.addresses());

    let scheduler = Scheduler::with_timing(
        config.registry(),
        config.grid_dim,
        config.period_secs,
        config.transition_secs,
    );

    if config.decoupled {
        let running = Arc::new(AtomicBool::new(true));
        stop_on_ctrl_c(Arc::clone(&running))?;
        run_decoupled(scheduler, transport, config, running)?;
    } else {
        let mut driver = Driver::new(scheduler, transport, config);
        stop_on_ctrl_c(driver.running())?;
        driver.run()?;
        log::info!(
            "Sent {} frames ({} dropped)",
            driver.transport().stats().frames_sent,
            driver.frames_dropped()
        );
    }

    log::info!("Driver shutting down");
    Ok(())
}

/// The first Ctrl-C asks the loop to stop after the current frame. A second
/// one exits immediately, e.g. while stuck reconnecting.
fn stop_on_ctrl_c(running: Arc<AtomicBool>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build signal runtime")?;

    thread::Builder::new()
        .name("cubelight-signal".into())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                log::info!("Interrupted, stopping after this frame");
                running.store(false, Ordering::SeqCst);

                if tokio::signal::ctrl_c().await.is_ok() {
                    process::exit(130);
                }
            });
        })
        .context("failed to spawn signal thread")?;

    Ok(())
}
