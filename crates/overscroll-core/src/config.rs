use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroller: ScrollerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Physical parameters of a scroller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollerConfig {
    /// Display density (1.0 = 160 dpi)
    #[serde(default = "default_density")]
    pub density: f32,
    /// Fling friction coefficient
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Successive flings in the same direction accumulate speed
    #[serde(default = "default_true")]
    pub flywheel: bool,
    /// Duration of `start_scroll` when none is given, in milliseconds
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: i32,
    /// Easing applied to time-boxed scrolls
    #[serde(default)]
    pub interpolator: EasingType,
    /// Spring used by spring scrolls
    #[serde(default)]
    pub spring: SpringConfig,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            friction: default_friction(),
            flywheel: default_true(),
            default_duration_ms: default_duration_ms(),
            interpolator: EasingType::default(),
            spring: SpringConfig::default(),
        }
    }
}

impl ScrollerConfig {
    /// Reject values the physics cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.density > 0.0) {
            return Err(invalid("density", self.density));
        }
        if !(self.friction > 0.0) {
            return Err(invalid("friction", self.friction));
        }
        if self.default_duration_ms < 0 {
            return Err(invalid("default_duration_ms", self.default_duration_ms));
        }
        self.spring.validate()
    }
}

/// Spring parameters, mass is fixed at 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    #[serde(default = "default_stiffness")]
    pub stiffness: f32,
    /// 1.0 is critically damped, below 1.0 bounces
    #[serde(default = "default_damping_ratio")]
    pub damping_ratio: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: default_stiffness(),
            damping_ratio: default_damping_ratio(),
        }
    }
}

impl SpringConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.stiffness > 0.0) {
            return Err(invalid("spring.stiffness", self.stiffness));
        }
        if !(self.damping_ratio >= 0.0) {
            return Err(invalid("spring.damping_ratio", self.damping_ratio));
        }
        Ok(())
    }
}

/// Frame sampling used by offline simulations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
    /// Safety stop for simulations that never settle
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
            max_frames: default_max_frames(),
        }
    }
}

/// Easing curve types for time-boxed scrolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump at the end
    None,
    Linear,
    /// 1 - (1-t)^3
    Cubic,
    /// 1 - (1-t)^5
    Quintic,
    /// 1 - 2^(-10t)
    EaseOut,
    /// Exponential approach followed by a viscous tail
    #[default]
    ViscousFluid,
}

fn invalid(name: &'static str, value: impl ToString) -> crate::Error {
    crate::Error::InvalidParameter {
        name,
        value: value.to_string(),
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_density() -> f32 {
    1.0
}

fn default_friction() -> f32 {
    0.015 // platform scroll friction
}

fn default_duration_ms() -> i32 {
    250
}

fn default_stiffness() -> f32 {
    200.0 // low stiffness
}

fn default_damping_ratio() -> f32 {
    0.75 // low bouncy
}

fn default_frame_interval() -> u64 {
    16 // ~60fps
}

fn default_max_frames() -> usize {
    2000
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults when the file is missing
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.scroller.validate()?;
        if self.simulation.frame_interval_ms == 0 {
            return Err(invalid(
                "simulation.frame_interval_ms",
                self.simulation.frame_interval_ms,
            ));
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml_string()?)?;

        Ok(())
    }

    pub fn to_toml_string(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/overscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("overscroll")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.scroller.density, 1.0);
        assert_eq!(config.scroller.friction, 0.015);
        assert!(config.scroller.flywheel);
        assert_eq!(config.scroller.default_duration_ms, 250);
        assert_eq!(config.scroller.interpolator, EasingType::ViscousFluid);
        assert_eq!(config.scroller.spring.stiffness, 200.0);
        assert_eq!(config.scroller.spring.damping_ratio, 0.75);
        assert_eq!(config.simulation.frame_interval_ms, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [scroller]
            density = 2.5
            interpolator = "quintic"

            [scroller.spring]
            damping_ratio = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(config.scroller.density, 2.5);
        assert_eq!(config.scroller.interpolator, EasingType::Quintic);
        assert_eq!(config.scroller.spring.damping_ratio, 1.0);
        assert_eq!(config.scroller.spring.stiffness, 200.0);
        assert_eq!(config.scroller.friction, 0.015);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = AppConfig::from_toml_str("[scroller]\nfriction = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::InvalidParameter { name: "friction", .. }
        ));

        let err = AppConfig::from_toml_str("[simulation]\nframe_interval_ms = 0\n").unwrap_err();
        assert!(matches!(err, crate::Error::InvalidParameter { .. }));

        let err = AppConfig::from_toml_str("[scroller]\ninterpolator = \"bouncy\"\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let text = AppConfig::default().to_toml_string().unwrap();
        assert!(text.contains("viscous_fluid"));
        let parsed = AppConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.scroller.default_duration_ms, 250);
    }
}
