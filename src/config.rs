//! Scorer configuration
//!
//! Defaults reproduce the reference sheet behavior. `ScorerConfig::from_env`
//! lets the overlay and the normalization height be tuned without a rebuild;
//! unparsable values fall back to the defaults.
use std::sync::OnceLock;

/// Height every sheet is resized to before block location
pub const DEFAULT_TARGET_HEIGHT: u32 = 1280;
/// Minimum skew-line length, in percent of the image dimension
pub const DEFAULT_MIN_LINE_PCT: f64 = 20.0;
/// Radius of the disk drawn over each filled mark
pub const DEFAULT_MARK_RADIUS: i32 = 6;

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_i32(name: &str, default: i32) -> i32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .unwrap_or(default)
}

fn parse_env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Tunables for one [`Scorer`](crate::Scorer)
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerConfig {
    /// Normalized sheet height in pixels
    pub target_height: u32,
    /// Minimum skew-line length as a percentage of width (vertical pass) or height (horizontal pass)
    pub min_line_pct: f64,
    /// Draw a filled disk over every filled mark
    pub draw_marks: bool,
    /// Outline every located block
    pub draw_blocks: bool,
    /// Draw every read cell's point, filled or not
    pub draw_cells: bool,
    /// Disk radius for filled marks
    pub mark_radius: i32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            target_height: DEFAULT_TARGET_HEIGHT,
            min_line_pct: DEFAULT_MIN_LINE_PCT,
            draw_marks: true,
            draw_blocks: false,
            draw_cells: false,
            mark_radius: DEFAULT_MARK_RADIUS,
        }
    }
}

impl ScorerConfig {
    /// Read overrides from `OMR_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            target_height: parse_env_u32("OMR_TARGET_HEIGHT", defaults.target_height).max(1),
            min_line_pct: parse_env_f64("OMR_MIN_LINE_PCT", defaults.min_line_pct).clamp(0.0, 100.0),
            draw_marks: parse_env_bool_u8("OMR_DRAW_MARKS", defaults.draw_marks),
            draw_blocks: parse_env_bool_u8("OMR_DRAW_BLOCKS", defaults.draw_blocks),
            draw_cells: parse_env_bool_u8("OMR_DRAW_CELLS", defaults.draw_cells),
            mark_radius: parse_env_i32("OMR_MARK_RADIUS", defaults.mark_radius).clamp(1, 64),
        }
    }
}

static ENV_CONFIG: OnceLock<ScorerConfig> = OnceLock::new();

/// Process-wide configuration, read from the environment on first use
pub(crate) fn env_config() -> &'static ScorerConfig {
    ENV_CONFIG.get_or_init(ScorerConfig::from_env)
}
