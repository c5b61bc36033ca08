use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::console::ConsoleError;
use crate::graphics::color::ColorId;
use crate::graphics::palette::{
    c64, pico8, tic80, zx, PaletteColors, C64_PALETTE, PICO8_PALETTE, TIC80_PALETTE,
    ZX_SPECTRUM_PALETTE,
};
use crate::graphics::sprite_cache::{DEFAULT_MAX_AGE, DEFAULT_MAX_ENTRIES};
use crate::graphics::surface::CellSize;
use crate::logging::LogLevel;
use crate::propfile::PropertyFile;

/// Emulated machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsoleType {
    #[default]
    Pico8,
    Tic80,
    ZxSpectrum,
    Cbm64,
}

impl ConsoleType {
    pub const ALL: [ConsoleType; 4] = [
        ConsoleType::Pico8,
        ConsoleType::Tic80,
        ConsoleType::ZxSpectrum,
        ConsoleType::Cbm64,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConsoleType::Pico8 => "pico8",
            ConsoleType::Tic80 => "tic80",
            ConsoleType::ZxSpectrum => "zxspectrum",
            ConsoleType::Cbm64 => "cbm64",
        }
    }
}

impl fmt::Display for ConsoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConsoleType {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pico8" | "pico-8" => Ok(ConsoleType::Pico8),
            "tic80" | "tic-80" => Ok(ConsoleType::Tic80),
            "zxspectrum" | "zx" => Ok(ConsoleType::ZxSpectrum),
            "cbm64" | "c64" => Ok(ConsoleType::Cbm64),
            _ => Err(ConsoleError::UnsupportedConsole(s.to_string())),
        }
    }
}

/// Fixed constants of one console session.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub console_type: ConsoleType,
    pub width: i32,
    pub height: i32,
    /// Font cell; also the unit of the text cursor.
    pub cell: CellSize,
    pub sprite_cell: CellSize,
    pub fps: u32,
    pub palette: PaletteColors,
    pub bg: ColorId,
    pub fg: ColorId,
    pub cache_max_entries: usize,
    pub cache_max_age: Duration,
    pub flip_backoff: Duration,
    pub screenshot_scale: u32,
}

impl ConsoleConfig {
    pub fn for_type(console_type: ConsoleType) -> Self {
        let (width, height, cell, fps, palette, bg, fg) = match console_type {
            ConsoleType::Pico8 => (
                128,
                128,
                CellSize::new(4, 8),
                30,
                PICO8_PALETTE,
                pico8::BLACK,
                pico8::WHITE,
            ),
            ConsoleType::Tic80 => (
                240,
                136,
                CellSize::new(8, 8),
                60,
                TIC80_PALETTE,
                tic80::BLACK,
                tic80::WHITE,
            ),
            ConsoleType::ZxSpectrum => (
                256,
                192,
                CellSize::new(8, 8),
                50,
                ZX_SPECTRUM_PALETTE,
                zx::WHITE,
                zx::BLACK,
            ),
            ConsoleType::Cbm64 => (
                320,
                200,
                CellSize::new(8, 8),
                50,
                C64_PALETTE,
                c64::BLUE,
                c64::LIGHT_BLUE,
            ),
        };

        Self {
            console_type,
            width,
            height,
            cell,
            sprite_cell: CellSize::new(8, 8),
            fps,
            palette,
            bg,
            fg,
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            cache_max_age: DEFAULT_MAX_AGE,
            flip_backoff: Duration::from_millis(1),
            screenshot_scale: 1,
        }
    }

    /// Text columns that fit on the surface.
    pub fn char_cols(&self) -> i32 {
        self.width / self.cell.width
    }

    /// Text rows that fit on the surface.
    pub fn char_rows(&self) -> i32 {
        self.height / self.cell.height
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::for_type(ConsoleType::default())
    }
}

/// Overrides gathered from the config file and the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub console: Option<ConsoleType>,
    pub fps: Option<u32>,
    pub sprites: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub cache_max_entries: Option<usize>,
    pub cache_max_age: Option<Duration>,
    pub screenshot_scale: Option<u32>,
    pub log_level: Option<LogLevel>,
}

impl Options {
    pub fn from_properties(props: &PropertyFile) -> Result<Self> {
        let mut opts = Options::default();

        if let Some(v) = non_empty(props.get("console")) {
            opts.console = Some(v.parse().context("Invalid 'console' setting")?);
        }
        if let Some(v) = non_empty(props.get("fps")) {
            opts.fps = Some(parse_fps(v)?);
        }
        if let Some(v) = non_empty(props.get("sprites")) {
            opts.sprites = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty(props.get("font")) {
            opts.font = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty(props.get("cache_size")) {
            opts.cache_max_entries = Some(parse_cache_size(v)?);
        }
        if let Some(v) = non_empty(props.get("cache_age")) {
            opts.cache_max_age = Some(parse_cache_age(v)?);
        }
        if let Some(v) = non_empty(props.get("scale")) {
            opts.screenshot_scale = Some(parse_scale(v)?);
        }
        if let Some(v) = non_empty(props.get("log_level")) {
            opts.log_level = Some(v.parse().context("Invalid 'log_level' setting")?);
        }

        Ok(opts)
    }

    /// Fixed constants for the selected console with overrides applied.
    pub fn console_config(&self) -> Result<ConsoleConfig> {
        self.apply(ConsoleConfig::for_type(self.console.unwrap_or_default()))
    }

    pub fn apply(&self, mut config: ConsoleConfig) -> Result<ConsoleConfig> {
        if let Some(fps) = self.fps {
            config.fps = check_range("fps", fps, 1, 240)?;
        }
        if let Some(entries) = self.cache_max_entries {
            if entries == 0 {
                anyhow::bail!("Transform cache size must be positive");
            }
            config.cache_max_entries = entries;
        }
        if let Some(age) = self.cache_max_age {
            config.cache_max_age = age;
        }
        if let Some(scale) = self.screenshot_scale {
            config.screenshot_scale = check_range("scale", scale, 1, 16)?;
        }
        Ok(config)
    }
}

/// Load options from a property file. No path means all defaults.
pub fn load_config(path: Option<&Path>) -> Result<Options> {
    let Some(path) = path else {
        return Ok(Options::default());
    };
    let props = PropertyFile::load(path)?;
    log::info!("Loaded {} settings from {}", props.len(), path.display());
    Options::from_properties(&props)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn check_range(what: &str, value: u32, min: u32, max: u32) -> Result<u32> {
    if value < min || value > max {
        anyhow::bail!("{} must be between {} and {} (got {})", what, min, max, value);
    }
    Ok(value)
}

/// Frames per second, 1 to 240.
pub fn parse_fps(s: &str) -> Result<u32> {
    let fps: u32 = s.trim().parse().context("Invalid fps value")?;
    check_range("fps", fps, 1, 240)
}

/// Integer screenshot scale, 1 to 16.
pub fn parse_scale(s: &str) -> Result<u32> {
    let scale: u32 = s.trim().parse().context("Invalid scale value")?;
    check_range("scale", scale, 1, 16)
}

pub fn parse_cache_size(s: &str) -> Result<usize> {
    let size: usize = s.trim().parse().context("Invalid cache size")?;
    if size == 0 {
        anyhow::bail!("Transform cache size must be positive");
    }
    Ok(size)
}

/// Cache age in whole seconds.
pub fn parse_cache_age(s: &str) -> Result<Duration> {
    let secs: u64 = s.trim().parse().context("Invalid cache age")?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case(ConsoleType::Pico8, 128, 128, CellSize::new(4, 8), 30, 0, 7)]
    #[case(ConsoleType::Tic80, 240, 136, CellSize::new(8, 8), 60, 0, 15)]
    #[case(ConsoleType::ZxSpectrum, 256, 192, CellSize::new(8, 8), 50, 7, 0)]
    #[case(ConsoleType::Cbm64, 320, 200, CellSize::new(8, 8), 50, 6, 14)]
    fn test_console_presets(
        #[case] ty: ConsoleType,
        #[case] width: i32,
        #[case] height: i32,
        #[case] cell: CellSize,
        #[case] fps: u32,
        #[case] bg: ColorId,
        #[case] fg: ColorId,
    ) {
        let cfg = ConsoleConfig::for_type(ty);
        assert_eq!((cfg.width, cfg.height), (width, height));
        assert_eq!(cfg.cell, cell);
        assert_eq!(cfg.fps, fps);
        assert_eq!((cfg.bg, cfg.fg), (bg, fg));
        assert_eq!(cfg.cache_max_entries, 1000);
        assert_eq!(cfg.cache_max_age, Duration::from_secs(60));
    }

    #[test]
    fn test_char_grid() {
        let cfg = ConsoleConfig::for_type(ConsoleType::Pico8);
        assert_eq!(cfg.char_cols(), 32);
        assert_eq!(cfg.char_rows(), 16);
    }

    #[rstest]
    #[case("pico8", ConsoleType::Pico8)]
    #[case("PICO-8", ConsoleType::Pico8)]
    #[case("tic80", ConsoleType::Tic80)]
    #[case("zx", ConsoleType::ZxSpectrum)]
    #[case(" c64 ", ConsoleType::Cbm64)]
    fn test_console_type_parse(#[case] input: &str, #[case] expected: ConsoleType) {
        assert_eq!(input.parse::<ConsoleType>().unwrap(), expected);
    }

    #[test]
    fn test_console_type_unsupported() {
        let err = "amiga".parse::<ConsoleType>().unwrap_err();
        assert!(matches!(err, ConsoleError::UnsupportedConsole(ref s) if s == "amiga"));
    }

    #[test]
    fn test_console_type_display_round_trip() {
        for ty in ConsoleType::ALL {
            assert_eq!(ty.to_string().parse::<ConsoleType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_fps("60").unwrap(), 60);
        assert!(parse_fps("0").is_err());
        assert!(parse_fps("fast").is_err());
        assert_eq!(parse_scale("4").unwrap(), 4);
        assert!(parse_scale("17").is_err());
        assert!(parse_cache_size("0").is_err());
        assert_eq!(parse_cache_age("5").unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_options_from_properties() {
        let props = PropertyFile::from_string(
            "console = tic80\nfps = 25\nsprites = art/sheet.png\ncache_size = 10\n\
             cache_age = 2\nscale = 3\nlog_level = debug\nfont =\n",
        );
        let opts = Options::from_properties(&props).unwrap();
        assert_eq!(opts.console, Some(ConsoleType::Tic80));
        assert_eq!(opts.fps, Some(25));
        assert_eq!(opts.sprites, Some(PathBuf::from("art/sheet.png")));
        assert_eq!(opts.font, None);
        assert_eq!(opts.cache_max_entries, Some(10));
        assert_eq!(opts.cache_max_age, Some(Duration::from_secs(2)));
        assert_eq!(opts.screenshot_scale, Some(3));
        assert_eq!(opts.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_options_reject_bad_console() {
        let props = PropertyFile::from_string("console = vectrex\n");
        assert!(Options::from_properties(&props).is_err());
    }

    #[test]
    fn test_options_apply() {
        let opts = Options {
            console: Some(ConsoleType::Cbm64),
            fps: Some(20),
            screenshot_scale: Some(2),
            ..Options::default()
        };
        let cfg = opts.console_config().unwrap();
        assert_eq!(cfg.console_type, ConsoleType::Cbm64);
        assert_eq!(cfg.fps, 20);
        assert_eq!(cfg.screenshot_scale, 2);
        assert_eq!(cfg.width, 320);
    }

    #[test]
    fn test_options_apply_validates() {
        let opts = Options {
            fps: Some(0),
            ..Options::default()
        };
        assert!(opts.console_config().is_err());
    }

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None).unwrap(), Options::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# test config").unwrap();
        writeln!(file, "console = zx").unwrap();
        let opts = load_config(Some(file.path())).unwrap();
        assert_eq!(opts.console, Some(ConsoleType::ZxSpectrum));

        assert!(load_config(Some(Path::new("/nonexistent/console.cfg"))).is_err());
    }
}
