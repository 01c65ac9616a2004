use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Pull-to-refresh behaviour. Distances are in surface points, negative
/// offsets mean the content is pulled down past its top edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Height of the header view; pulling this far reaches full progress
    #[serde(default = "default_header_height")]
    pub header_height: f64,
    /// Delay before the finished state starts sliding the header away
    #[serde(default)]
    pub hide_delay_ms: u64,
    /// Settle delay between a programmatic start and entering loading
    #[serde(default = "default_start_delay")]
    pub start_delay_ms: u64,
    /// Duration of the programmatic scroll that reveals the header
    #[serde(default = "default_scroll_duration")]
    pub scroll_duration_ms: u64,
    /// Duration of the inset animation when loading begins
    #[serde(default = "default_reveal_duration")]
    pub reveal_duration_ms: u64,
    /// Duration of the inset/offset reset after finishing
    #[serde(default = "default_reset_duration")]
    pub reset_duration_ms: u64,
    /// Easing used by the reset animation
    #[serde(default = "default_reset_easing")]
    pub reset_easing: EasingType,
    /// Overscroll beyond this distance is ignored entirely
    #[serde(default = "default_overscroll_limit")]
    pub overscroll_limit: f64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            header_height: default_header_height(),
            hide_delay_ms: 0,
            start_delay_ms: default_start_delay(),
            scroll_duration_ms: default_scroll_duration(),
            reveal_duration_ms: default_reveal_duration(),
            reset_duration_ms: default_reset_duration(),
            reset_easing: default_reset_easing(),
            overscroll_limit: default_overscroll_limit(),
        }
    }
}

impl RefreshConfig {
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn scroll_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_duration_ms)
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_duration_ms)
    }

    pub fn reset_duration(&self) -> Duration {
        Duration::from_millis(self.reset_duration_ms)
    }
}

/// Easing curve for surface animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump straight to the end value
    None,
    Linear,
    /// Cubic ease-out
    #[default]
    Cubic,
    /// Quintic ease-out
    Quintic,
    /// Exponential ease-out
    EaseOut,
    /// Symmetric cubic ease-in-out
    EaseInOut,
    /// Under-damped spring that overshoots before settling
    Spring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate keyboard scrolling instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Keyboard scroll animation duration
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Rows moved per scroll key press
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    /// Frame rate while something is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Fraction of the remaining overscroll removed per frame when the
    /// surface springs back after a drag
    #[serde(default = "default_bounce_speed")]
    pub bounce_speed: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: true,
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
            bounce_speed: default_bounce_speed(),
        }
    }
}

impl ScrollConfig {
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}

/// Spinner drawing and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Stroke color as hex ("#RRGGBB" or "#RGB")
    #[serde(default = "default_loader_color")]
    pub color: String,
    /// Number of times the stroke path winds around the circle
    #[serde(default = "default_arcs")]
    pub arcs: u32,
    /// Duration of one head or tail sweep
    #[serde(default = "default_arc_duration")]
    pub arc_duration_ms: u64,
    /// Arc length left behind by each tail sweep, as a fraction of one winding
    #[serde(default = "default_max_stroke")]
    pub max_stroke: f64,
    /// Shortest visible arc, as a fraction of one winding
    #[serde(default = "default_min_stroke")]
    pub min_stroke: f64,
    /// Period of the container rotation while loading
    #[serde(default = "default_rotation_period")]
    pub rotation_period_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            color: default_loader_color(),
            arcs: default_arcs(),
            arc_duration_ms: default_arc_duration(),
            max_stroke: default_max_stroke(),
            min_stroke: default_min_stroke(),
            rotation_period_ms: default_rotation_period(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds when idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Surface points represented by one terminal row
    #[serde(default = "default_points_per_row")]
    pub points_per_row: f64,
    /// How long the demo pretends a refresh takes
    #[serde(default = "default_demo_refresh_secs")]
    pub demo_refresh_secs: u64,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            points_per_row: default_points_per_row(),
            demo_refresh_secs: default_demo_refresh_secs(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Theme configuration
/// Can be specified as a simple string (theme name) or as a table with overrides
#[derive(Debug, Clone, Serialize)]
pub struct ThemeConfig {
    /// Theme name (e.g., "gruvbox-dark", "nord")
    pub name: String,
    /// Optional color overrides
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

impl<'de> Deserialize<'de> for ThemeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ThemeConfigVisitor;

        impl<'de> Visitor<'de> for ThemeConfigVisitor {
            type Value = ThemeConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a theme name or a table with 'name' and optional 'colors'")
            }

            fn visit_str<E>(self, value: &str) -> Result<ThemeConfig, E>
            where
                E: de::Error,
            {
                Ok(ThemeConfig {
                    name: value.to_string(),
                    colors: ThemeColorOverrides::default(),
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<ThemeConfig, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut name: Option<String> = None;
                let mut colors: Option<ThemeColorOverrides> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "colors" => colors = Some(map.next_value()?),
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(ThemeConfig {
                    name: name.unwrap_or_else(default_theme_name),
                    colors: colors.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ThemeConfigVisitor)
    }
}

/// Hex color overrides ("#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    pub bg: Option<String>,
    pub fg: Option<String>,
    pub muted: Option<String>,
    pub accent: Option<String>,
    pub card: Option<String>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("material-loader")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_header_height() -> f64 {
    // 25pt spinner in a 2x container plus 20pt of padding
    70.0
}

fn default_start_delay() -> u64 {
    270
}

fn default_scroll_duration() -> u64 {
    300
}

fn default_reveal_duration() -> u64 {
    300
}

fn default_reset_duration() -> u64 {
    1000
}

fn default_reset_easing() -> EasingType {
    EasingType::Spring
}

fn default_overscroll_limit() -> f64 {
    1000.0
}

fn default_animation_duration() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_animation_fps() -> u32 {
    60
}

fn default_bounce_speed() -> f64 {
    0.35
}

fn default_loader_color() -> String {
    "#ea6962".to_string()
}

fn default_arcs() -> u32 {
    20
}

fn default_arc_duration() -> u64 {
    750
}

fn default_max_stroke() -> f64 {
    0.75
}

fn default_min_stroke() -> f64 {
    0.05
}

fn default_rotation_period() -> u64 {
    2000
}

fn default_tick_rate() -> u64 {
    100
}

fn default_points_per_row() -> f64 {
    10.0
}

fn default_demo_refresh_secs() -> u64 {
    2
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from an explicit path
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the refresh state machine and the loader cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        let refresh = &self.refresh;
        if !(refresh.header_height > 0.0) {
            return Err(crate::Error::Config(format!(
                "refresh.header_height must be positive, got {}",
                refresh.header_height
            )));
        }
        if refresh.overscroll_limit < refresh.header_height {
            return Err(crate::Error::Config(format!(
                "refresh.overscroll_limit ({}) must not be smaller than refresh.header_height ({})",
                refresh.overscroll_limit, refresh.header_height
            )));
        }
        if self.loader.arcs == 0 {
            return Err(crate::Error::Config("loader.arcs must be at least 1".to_string()));
        }
        for (name, value) in [
            ("loader.max_stroke", self.loader.max_stroke),
            ("loader.min_stroke", self.loader.min_stroke),
            ("scroll.bounce_speed", self.scroll.bounce_speed),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::Error::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if !(self.ui.points_per_row > 0.0) {
            return Err(crate::Error::Config(
                "ui.points_per_row must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/material-loader/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("material-loader")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used while a TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("material-loader.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.refresh.header_height, 70.0);
        assert_eq!(config.refresh.start_delay(), Duration::from_millis(270));
        assert_eq!(config.refresh.reset_easing, EasingType::Spring);
        assert_eq!(config.refresh.overscroll_limit, 1000.0);
        assert_eq!(config.loader.arcs, 20);
        assert!(config.scroll.is_smooth());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [refresh]
            header_height = 100.0
            hide_delay_ms = 500

            [ui]
            theme = "nord"
            "#,
        )
        .unwrap();

        assert_eq!(config.refresh.header_height, 100.0);
        assert_eq!(config.refresh.hide_delay(), Duration::from_millis(500));
        assert_eq!(config.refresh.start_delay_ms, 270);
        assert_eq!(config.ui.theme.name, "nord");
        assert_eq!(config.loader.max_stroke, 0.75);
    }

    #[test]
    fn test_theme_table_with_overrides() {
        let config = AppConfig::from_toml(
            r##"
            [ui.theme]
            name = "gruvbox-light"
            colors = { accent = "#ff0000" }
            "##,
        )
        .unwrap();

        assert_eq!(config.ui.theme.name, "gruvbox-light");
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_easing_names() {
        let config = AppConfig::from_toml(
            r#"
            [scroll]
            easing = "ease_in_out"
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.easing, EasingType::EaseInOut);
    }

    #[test]
    fn test_validate_rejects_bad_header() {
        let err = AppConfig::from_toml("[refresh]\nheader_height = 0.0\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        let err = AppConfig::from_toml(
            "[refresh]\nheader_height = 200.0\noverscroll_limit = 100.0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("overscroll_limit"));
    }

    #[test]
    fn test_validate_rejects_bad_loader() {
        let mut config = AppConfig::default();
        config.loader.arcs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.loader.max_stroke = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_duration_fallback() {
        let config = ScrollConfig {
            animation_fps: 0,
            ..Default::default()
        };
        assert_eq!(config.animation_tick_duration(), Duration::from_millis(16));
    }
}
