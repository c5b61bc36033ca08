use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use pico_console::config::load_config;
use pico_console::graphics::engine::Assets;
use pico_console::time::FramePacer;
use pico_console::{logging, Cli, Console};

/// How often the display thread checks for a new frame.
const DISPLAY_POLL: Duration = Duration::from_millis(1);

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_options = load_config(cli.config.as_deref())?;
    let options = cli.merge_into_options(file_options)?;
    logging::init(options.log_level.unwrap_or_default());

    let config = options.console_config()?;
    let scale = config.screenshot_scale;
    log::info!(
        "Console: {} ({}x{} @ {} fps)",
        config.console_type,
        config.width,
        config.height,
        config.fps
    );

    let assets = Assets::load(&config, options.sprites.as_deref(), options.font.as_deref())
        .context("Failed to load assets")?;
    let mut console = Console::new(config, assets)?;
    if cli.unpaced {
        console = console.with_pacer(FramePacer::unpaced());
    }

    let demo = cli.demo()?;
    log::info!("Running demo '{}' for {} frames", demo, cli.frames);
    console.load_cart(demo.cartridge())?;

    // Stand-in for a window: takes each published frame off the handoff.
    let handoff = console.engine().handoff();
    let stop = Arc::new(AtomicBool::new(false));
    let display = {
        let stop = Arc::clone(&stop);
        thread::Builder::new()
            .name("display".to_string())
            .spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    if handoff.consume(|_frame| ()).is_none() {
                        thread::sleep(DISPLAY_POLL);
                    }
                }
                handoff.consumed()
            })
            .context("Failed to spawn display thread")?
    };

    let stats = console.run_frames(cli.frames);

    stop.store(true, Ordering::Release);
    let displayed = display
        .join()
        .map_err(|_| anyhow::anyhow!("Display thread panicked"))?;

    log::info!(
        "Done: {} ticks, {} presented, {} deferred, {} displayed, {:.1} fps",
        stats.ticks,
        stats.presented,
        stats.deferred,
        displayed,
        console.pacer().measured_fps()
    );

    if let Some(path) = &cli.screenshot {
        console
            .engine_mut()
            .save_screenshot(path, scale)
            .with_context(|| format!("Failed to save screenshot to {}", path.display()))?;
        log::info!("Screenshot written to {}", path.display());
    }

    Ok(())
}
