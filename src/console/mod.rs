//! Cartridge runtime.
//!
//! [`Console`] owns the [`Engine`], the input boundary and the frame pacer,
//! and drives a [`Cartridge`] through Update → Render → Flip once per tick.

use crate::config::ConsoleConfig;
use crate::graphics::api::GraphicsApi;
use crate::graphics::engine::{Assets, Engine};
use crate::graphics::error::AssetError;
use crate::graphics::presenter::FlipOutcome;
use crate::graphics::surface::SurfaceAllocError;
use crate::input::{InputSnapshot, InputState};
use crate::time::FramePacer;

/// Startup failures. All of these are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Unsupported console type '{0}'")]
    UnsupportedConsole(String),

    #[error(transparent)]
    SurfaceAllocation(#[from] SurfaceAllocError),

    #[error("Asset loading failed: {0}")]
    Asset(#[from] AssetError),

    #[error("Cartridge failed to initialise: {0:#}")]
    Cartridge(anyhow::Error),
}

/// A program running on the console.
pub trait Cartridge {
    /// Called once before the first frame.
    fn init(&mut self, _gfx: &mut dyn GraphicsApi) -> anyhow::Result<()> {
        Ok(())
    }

    /// Advance game state. Must not draw or block.
    fn update(&mut self, input: &InputSnapshot);

    /// Draw the current state.
    fn render(&mut self, gfx: &mut dyn GraphicsApi);
}

/// Per-tick outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub presented: u64,
    pub deferred: u64,
}

pub struct Console {
    engine: Engine,
    input: InputState,
    pacer: FramePacer,
    cart: Option<Box<dyn Cartridge + Send>>,
    stats: RunStats,
}

impl Console {
    pub fn new(config: ConsoleConfig, assets: Assets) -> Result<Self, ConsoleError> {
        let pacer = FramePacer::new(config.fps);
        Ok(Self {
            engine: Engine::new(config, assets)?,
            input: InputState::new(),
            pacer,
            cart: None,
            stats: RunStats::default(),
        })
    }

    /// Replace the frame pacer (e.g. [`FramePacer::unpaced`] for headless
    /// runs).
    #[must_use]
    pub fn with_pacer(mut self, pacer: FramePacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Handle for a host thread to publish input through.
    pub fn input(&self) -> InputState {
        self.input.clone()
    }

    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Install a cartridge and run its `init`.
    pub fn load_cart(&mut self, mut cart: Box<dyn Cartridge + Send>) -> Result<(), ConsoleError> {
        cart.init(&mut self.engine).map_err(ConsoleError::Cartridge)?;
        self.cart = Some(cart);
        log::info!("Cartridge loaded");
        Ok(())
    }

    /// One Update → Render → Flip cycle, without pacing.
    pub fn step(&mut self) -> FlipOutcome {
        let snapshot = self.input.poll();
        if let Some(cart) = self.cart.as_mut() {
            cart.update(&snapshot);
            cart.render(&mut self.engine);
        }
        let outcome = self.engine.flip();
        self.stats.ticks += 1;
        match outcome {
            FlipOutcome::Presented => self.stats.presented += 1,
            FlipOutcome::Deferred => self.stats.deferred += 1,
        }
        outcome
    }

    /// Run `frames` paced ticks.
    pub fn run_frames(&mut self, frames: u64) -> RunStats {
        for _ in 0..frames {
            self.step();
            self.pacer.wait();
        }
        log::debug!(
            "Ran {} frames ({} presented, {} deferred)",
            frames,
            self.stats.presented,
            self.stats.deferred
        );
        self.stats
    }
}
