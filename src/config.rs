//! Configuration loading from `tictactoe.toml`.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`TICTACTOE_<SECTION>_<KEY>`)
//! 2. `tictactoe.toml` (or the file named by `TICTACTOE_CONFIG`)
//! 3. Built-in defaults
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! TICTACTOE_<SECTION>_<KEY>=value
//!
//! Examples:
//!     TICTACTOE_COMMON_LOG_LEVEL=debug
//!     TICTACTOE_LEARNER_ALPHA=0.5
//!     TICTACTOE_ARENA_GAMES=1000
//!     TICTACTOE_UI_OPPONENT=learner
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::engine::{EngineConfig, Strategy};
use crate::error::ConfigError;
use crate::learn::LearnerConfig;
use crate::search::SearchConfig;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TICTACTOE_CONFIG";

/// Standard locations to search for the config file
pub const CONFIG_SEARCH_PATHS: &[&str] = &["tictactoe.toml", "../tictactoe.toml"];

// Serde default functions

fn d_log_level() -> String {
    "info".into()
}
fn d_true() -> bool {
    true
}
fn d_tt_entries() -> usize {
    1 << 14
}
fn d_alpha() -> f64 {
    0.1
}
fn d_arena_alpha() -> f64 {
    0.5
}
fn d_first() -> Strategy {
    Strategy::Minimax
}
fn d_second() -> Strategy {
    Strategy::Learner
}
fn d_games() -> u32 {
    1000
}

/// Settings shared by every binary
#[derive(Debug, Clone, Deserialize)]
pub struct CommonConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Seed for every RNG; unset means a fresh seed per run
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: d_log_level(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinimaxSection {
    #[serde(default = "d_true")]
    pub shuffle_moves: bool,
    #[serde(default = "d_tt_entries")]
    pub tt_entries: usize,
}

impl Default for MinimaxSection {
    fn default() -> Self {
        Self {
            shuffle_moves: true,
            tt_entries: d_tt_entries(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearnerSection {
    /// Learning rate for interactive play
    #[serde(default = "d_alpha")]
    pub alpha: f64,
    /// Learning rate used by the arena
    #[serde(default = "d_arena_alpha")]
    pub arena_alpha: f64,
    #[serde(default)]
    pub epsilon: f64,
    #[serde(default = "d_true")]
    pub shuffle_moves: bool,
}

impl Default for LearnerSection {
    fn default() -> Self {
        Self {
            alpha: d_alpha(),
            arena_alpha: d_arena_alpha(),
            epsilon: 0.0,
            shuffle_moves: true,
        }
    }
}

/// Headless AI-vs-AI series
#[derive(Debug, Clone, Deserialize)]
pub struct ArenaSection {
    #[serde(default = "d_first")]
    pub first: Strategy,
    #[serde(default = "d_second")]
    pub second: Strategy,
    #[serde(default = "d_games")]
    pub games: u32,
    /// Swap who moves first after every game
    #[serde(default)]
    pub alternate_first: bool,
}

impl Default for ArenaSection {
    fn default() -> Self {
        Self {
            first: d_first(),
            second: d_second(),
            games: d_games(),
            alternate_first: false,
        }
    }
}

/// GUI defaults
#[derive(Debug, Clone, Deserialize)]
pub struct UiSection {
    /// Opponent strategy in human-vs-AI games
    #[serde(default = "d_second")]
    pub opponent: Strategy,
    #[serde(default)]
    pub ai_first: bool,
    #[serde(default = "d_true")]
    pub alternate_first: bool,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            opponent: d_second(),
            ai_first: false,
            alternate_first: true,
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub minimax: MinimaxSection,
    #[serde(default)]
    pub learner: LearnerSection,
    #[serde(default)]
    pub arena: ArenaSection,
    #[serde(default)]
    pub ui: UiSection,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Parse a TOML document (no environment overrides).
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, alpha) in [
            ("learner.alpha", self.learner.alpha),
            ("learner.arena_alpha", self.learner.arena_alpha),
        ] {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be in (0, 1], got {alpha}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.learner.epsilon) {
            return Err(ConfigError::Invalid(format!(
                "learner.epsilon must be in [0, 1], got {}",
                self.learner.epsilon
            )));
        }
        if self.arena.games == 0 {
            return Err(ConfigError::Invalid("arena.games must be at least 1".into()));
        }
        Ok(())
    }

    /// Engine settings for interactive play
    pub fn engine_config(&self) -> EngineConfig {
        self.build_engine_config(self.learner.alpha)
    }

    /// Engine settings for the arena (uses `arena_alpha`)
    pub fn arena_engine_config(&self) -> EngineConfig {
        self.build_engine_config(self.learner.arena_alpha)
    }

    fn build_engine_config(&self, alpha: f64) -> EngineConfig {
        EngineConfig {
            search: SearchConfig {
                shuffle_moves: self.minimax.shuffle_moves,
                tt_entries: self.minimax.tt_entries,
                seed: self.common.seed,
            },
            learner: LearnerConfig {
                alpha,
                epsilon: self.learner.epsilon,
                shuffle_moves: self.learner.shuffle_moves,
                // Keep the two sides' RNG streams apart when seeded
                seed: self.common.seed.map(|s| s.wrapping_add(1)),
            },
        }
    }
}

/// Load the configuration.
///
/// Uses the file named by `TICTACTOE_CONFIG` if set, else the first existing
/// file in [`CONFIG_SEARCH_PATHS`], else the defaults. Environment overrides
/// are applied and the result validated.
pub fn load_config() -> Result<Config, ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return load_from_path(Path::new(&path));
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            return load_from_path(path);
        }
    }

    debug!("No tictactoe.toml found, using built-in defaults");
    let config = apply_env_overrides(Config::default());
    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let mut config = Config::from_toml(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    config.source = Some(path.to_path_buf());

    let config = apply_env_overrides(config);
    config.validate()?;
    Ok(config)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, bool, Strategy, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(mut config: Config) -> Config {
    // Common
    env_override!(config, common.log_level, "TICTACTOE_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "TICTACTOE_COMMON_SEED", optional_parse);

    // Minimax
    env_override!(
        config,
        minimax.shuffle_moves,
        "TICTACTOE_MINIMAX_SHUFFLE_MOVES",
        parse
    );
    env_override!(
        config,
        minimax.tt_entries,
        "TICTACTOE_MINIMAX_TT_ENTRIES",
        parse
    );

    // Learner
    env_override!(config, learner.alpha, "TICTACTOE_LEARNER_ALPHA", parse);
    env_override!(
        config,
        learner.arena_alpha,
        "TICTACTOE_LEARNER_ARENA_ALPHA",
        parse
    );
    env_override!(config, learner.epsilon, "TICTACTOE_LEARNER_EPSILON", parse);
    env_override!(
        config,
        learner.shuffle_moves,
        "TICTACTOE_LEARNER_SHUFFLE_MOVES",
        parse
    );

    // Arena
    env_override!(config, arena.first, "TICTACTOE_ARENA_FIRST", parse);
    env_override!(config, arena.second, "TICTACTOE_ARENA_SECOND", parse);
    env_override!(config, arena.games, "TICTACTOE_ARENA_GAMES", parse);
    env_override!(
        config,
        arena.alternate_first,
        "TICTACTOE_ARENA_ALTERNATE_FIRST",
        parse
    );

    // UI
    env_override!(config, ui.opponent, "TICTACTOE_UI_OPPONENT", parse);
    env_override!(config, ui.ai_first, "TICTACTOE_UI_AI_FIRST", parse);
    env_override!(
        config,
        ui.alternate_first,
        "TICTACTOE_UI_ALTERNATE_FIRST",
        parse
    );

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.common.log_level, "info");
        assert_eq!(config.common.seed, None);
        assert!(config.minimax.shuffle_moves);
        assert!((config.learner.alpha - 0.1).abs() < f64::EPSILON);
        assert!((config.learner.arena_alpha - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.learner.epsilon, 0.0);
        assert_eq!(config.arena.first, Strategy::Minimax);
        assert_eq!(config.arena.second, Strategy::Learner);
        assert_eq!(config.ui.opponent, Strategy::Learner);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [common]
            seed = 42

            [learner]
            epsilon = 0.05

            [arena]
            first = "learner"
            second = "random"
            games = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.common.seed, Some(42));
        assert_eq!(config.common.log_level, "info");
        assert!((config.learner.epsilon - 0.05).abs() < f64::EPSILON);
        assert!((config.learner.alpha - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.arena.first, Strategy::Learner);
        assert_eq!(config.arena.second, Strategy::Random);
        assert_eq!(config.arena.games, 10);
        assert!(config.ui.alternate_first);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(Config::from_toml("[arena]\nfirst = \"alphazero\"\n").is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = Config::default();
        config.learner.alpha = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.learner.alpha = 1.0;
        assert!(config.validate().is_ok());
        config.learner.arena_alpha = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.learner.epsilon = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.arena.games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_engine_config_mapping() {
        let mut config = Config::default();
        config.common.seed = Some(9);
        config.minimax.tt_entries = 256;

        let engine = config.engine_config();
        assert_eq!(engine.search.seed, Some(9));
        assert_eq!(engine.search.tt_entries, 256);
        assert_eq!(engine.learner.seed, Some(10));
        assert!((engine.learner.alpha - 0.1).abs() < f64::EPSILON);

        let arena = config.arena_engine_config();
        assert!((arena.learner.alpha - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_from_path(Path::new("/nonexistent/tictactoe.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("tictactoe-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tictactoe.toml");

        std::fs::write(&path, "[minimax]\nshuffle_moves = false\n").unwrap();
        let config = load_from_path(&path).unwrap();
        assert!(!config.minimax.shuffle_moves);
        assert_eq!(config.source.as_deref(), Some(path.as_path()));

        std::fs::write(&path, "[minimax\n").unwrap();
        assert!(matches!(
            load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));

        std::fs::write(&path, "[learner]\nepsilon = 2.0\n").unwrap();
        assert!(matches!(
            load_from_path(&path),
            Err(ConfigError::Invalid(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
