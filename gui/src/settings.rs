use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use anyhow::{ensure, Context};
use life_shared::{GridGeometry, Pattern};
use serde::Deserialize;

const CONFIG_ENV: &str = "LIFE_CONFIG";

/// Startup configuration, read once from an optional JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub geometry: GridGeometry,
    pub generation_millis: u64,
    pub start_running: bool,
    /// Chance of each cell starting alive; 0 leaves the board empty.
    pub seed_density: f64,
    /// Plaintext pattern (`O` alive, `.` dead) placed in the middle of the board.
    pub seed_pattern: Option<String>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            geometry: GridGeometry::default(),
            generation_millis: 500,
            start_running: false,
            seed_density: 0.0,
            seed_pattern: None,
            window_width: 800.0,
            window_height: 600.0,
        }
    }
}

impl Settings {
    /// Reads the file named by the first argument or `LIFE_CONFIG`, falling
    /// back to the defaults when neither is set.
    pub fn load() -> anyhow::Result<Self> {
        let path = env::args_os()
            .nth(1)
            .or_else(|| env::var_os(CONFIG_ENV))
            .map(PathBuf::from);
        match path {
            Some(path) => Settings::from_path(&path),
            None => Ok(Settings::default()),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Settings::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.generation_millis > 0, "generation_millis must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.seed_density),
            "seed_density must be between 0 and 1, got {}",
            self.seed_density
        );
        if let Some(pattern) = self.seed_pattern()? {
            ensure!(
                pattern.rows() <= self.geometry.rows() && pattern.cols() <= self.geometry.cols(),
                "seed_pattern is {}x{} cells but the board is only {}x{}",
                pattern.rows(),
                pattern.cols(),
                self.geometry.rows(),
                self.geometry.cols()
            );
        }
        ensure!(
            self.window_width > 0.0 && self.window_height > 0.0,
            "window size must be positive, got {}x{}",
            self.window_width,
            self.window_height
        );
        Ok(())
    }

    pub fn seed_pattern(&self) -> anyhow::Result<Option<Pattern>> {
        self.seed_pattern
            .as_deref()
            .map(|text| Pattern::parse(text).context("parsing seed_pattern"))
            .transpose()
    }

    pub fn generation_interval(&self) -> Duration {
        Duration::from_millis(self.generation_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn reads_geometry_and_timing() {
        let settings = Settings::from_json(
            r#"{
                "geometry": { "grid_width": 805, "grid_height": 400, "cell_width": 20, "cell_height": 20 },
                "generation_millis": 100,
                "start_running": true
            }"#,
        )
        .unwrap();
        assert_eq!(settings.geometry.cols(), 40);
        assert_eq!(settings.geometry.rows(), 20);
        assert_eq!(settings.generation_interval(), Duration::from_millis(100));
        assert!(settings.start_running);
    }

    #[test]
    fn invalid_geometry_aborts() {
        let err = Settings::from_json(
            r#"{ "geometry": { "grid_width": 600, "grid_height": 600, "cell_width": 0, "cell_height": 60 } }"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("cell size must be positive"), "{err:#}");
    }

    #[test]
    fn reads_seed_pattern() {
        let settings = Settings::from_json(r#"{ "seed_pattern": ".O.\n..O\nOOO" }"#).unwrap();
        assert_eq!(settings.seed_pattern().unwrap(), Some(Pattern::glider()));
        assert_eq!(Settings::default().seed_pattern().unwrap(), None);
    }

    #[test]
    fn rejects_bad_seed_patterns() {
        let err = Settings::from_json(r#"{ "seed_pattern": "OOx" }"#).unwrap_err();
        assert!(format!("{err:#}").contains("unexpected character"), "{err:#}");

        let wide = "O".repeat(11);
        let err = Settings::from_json(&format!(r#"{{ "seed_pattern": "{wide}" }}"#)).unwrap_err();
        assert!(format!("{err:#}").contains("board is only 10x10"), "{err:#}");
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Settings::from_json(r#"{ "generation_millis": 0 }"#).is_err());
        assert!(Settings::from_json(r#"{ "seed_density": 1.5 }"#).is_err());
        assert!(Settings::from_json(r#"{ "window_width": -1 }"#).is_err());
        assert!(Settings::from_json(r#"{ "tick": 5 }"#).is_err());
    }
}
