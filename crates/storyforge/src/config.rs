//! Layered configuration.
//!
//! Sources, later ones overriding earlier:
//! - Bundled defaults (include_str! from storyforge.toml)
//! - `~/.config/storyforge/storyforge.toml`
//! - `./storyforge.toml`
//! - An explicit file passed with `--config`

use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storyforge_core::{AspectRatio, StoryParameters, StoryParametersBuilder, VisualStyle};
use storyforge_error::{ConfigError, StoryforgeError, StoryforgeResult};
use storyforge_models::GeminiConfig;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../storyforge.toml");

/// Where sessions and media are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default, derive_getters::Getters)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage root; empty means the platform data directory
    path: String,
}

impl StorageConfig {
    /// Storage root, resolving an empty path to `<data dir>/storyforge`.
    ///
    /// # Errors
    ///
    /// Fails when the path is empty and the platform has no data directory.
    pub fn resolve_path(&self) -> StoryforgeResult<PathBuf> {
        if !self.path.trim().is_empty() {
            return Ok(PathBuf::from(self.path.trim()));
        }
        dirs::data_dir()
            .map(|dir| dir.join("storyforge"))
            .ok_or_else(|| {
                ConfigError::new("No platform data directory; set [storage] path").into()
            })
    }
}

/// Defaults applied to every production run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct ProductionConfig {
    /// Narrative language
    language: String,
    /// Audience when none is given
    default_audience: String,
    /// Goal when none is given
    default_goal: String,
    /// Rendering style when none is given
    style: VisualStyle,
    /// Frame shape when none is given
    aspect_ratio: AspectRatio,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            language: "Spanish".to_string(),
            default_audience: String::new(),
            default_goal: String::new(),
            style: VisualStyle::default(),
            aspect_ratio: AspectRatio::default(),
        }
    }
}

impl ProductionConfig {
    /// A parameters builder seeded with these defaults.
    pub fn parameters(&self) -> StoryParametersBuilder {
        let mut builder = StoryParametersBuilder::default();
        builder
            .language(self.language.clone())
            .audience(self.default_audience.clone())
            .goal(self.default_goal.clone())
            .style(self.style)
            .aspect_ratio(self.aspect_ratio);
        builder
    }

    /// Parameters with nothing but these defaults.
    pub fn default_parameters(&self) -> StoryParameters {
        self.parameters().build().unwrap_or_default()
    }
}

/// Top-level Storyforge configuration.
///
/// # Example
///
/// ```no_run
/// use storyforge::StoryforgeConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryforgeConfig::load()?;
/// println!("Images via {}", config.gemini().image_model());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default, derive_getters::Getters)]
#[serde(default)]
pub struct StoryforgeConfig {
    /// Gemini adapter settings
    gemini: GeminiConfig,
    /// Storage settings
    storage: StorageConfig,
    /// Production defaults
    production: ProductionConfig,
}

impl StoryforgeConfig {
    /// Load with the standard precedence and no explicit file.
    ///
    /// # Errors
    ///
    /// Fails when a present file cannot be parsed.
    pub fn load() -> StoryforgeResult<Self> {
        Self::load_with(None)
    }

    /// Load with the standard precedence, then `explicit` on top.
    ///
    /// User files are optional and silently skipped when absent; an explicit
    /// file must exist.
    #[instrument]
    pub fn load_with(explicit: Option<&Path>) -> StoryforgeResult<Self> {
        debug!("Loading configuration: explicit > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyforge/storyforge.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyforge").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        Self::finish(builder)
    }

    /// Bundled defaults overlaid with a TOML string.
    ///
    /// # Errors
    ///
    /// Fails when `toml` is not valid configuration.
    pub fn from_toml_str(toml: &str) -> StoryforgeResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> StoryforgeResult<Self> {
        builder
            .build()
            .map_err(|e| {
                StoryforgeError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryforgeError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
