//! Settings shared by the profiler CLI and its pipeline.
//!
//! The settings describe where inputs live, where tables are written, and how
//! many times each image is classified. They can be persisted as JSON and
//! partially overridden from the command line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Number of timed repetitions per image when nothing else is configured.
pub const DEFAULT_REPEAT_COUNT: usize = 50;
/// Number of manifest images classified before measuring a network.
pub const DEFAULT_WARMUP_IMAGES: usize = 20;

/// Persistent profiler configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileSettings {
    /// Numeric format tag (e.g. `FP16`) used to namespace output paths.
    pub precision: String,
    /// Domain tag embedded in output file names.
    pub model_type: String,
    /// Whitespace-separated list of image file names.
    pub manifest: PathBuf,
    /// Directory the manifest entries are resolved against.
    pub image_dir: PathBuf,
    /// Directory holding `<network>.onnx` files and `labels.txt`.
    pub model_dir: PathBuf,
    /// Root under which `<precision>/runtime` and `<precision>/results` live.
    pub output_root: PathBuf,
    /// Timed classifications per image.
    pub repeat_count: usize,
    /// Leading manifest images used for warm-up.
    pub warmup_images: usize,
    /// Pause before each network is loaded, letting power state settle.
    pub settle_delay_ms: u64,
    /// Pause before the runtime table is aggregated.
    pub aggregate_delay_ms: u64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            precision: "FP16".to_string(),
            model_type: "imagenet".to_string(),
            manifest: PathBuf::from("img_name.txt"),
            image_dir: PathBuf::from("../images/"),
            model_dir: PathBuf::from("networks"),
            output_root: PathBuf::from("."),
            repeat_count: DEFAULT_REPEAT_COUNT,
            warmup_images: DEFAULT_WARMUP_IMAGES,
            settle_delay_ms: 5_000,
            aggregate_delay_ms: 2_000,
        }
    }
}

impl ProfileSettings {
    /// Load settings from a JSON file. Missing fields fall back to defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let mut settings: ProfileSettings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings JSON at {}", path.display()))?;
        settings.sanitize();
        Ok(settings)
    }

    /// Serialize settings to disk in pretty-printed JSON.
    ///
    /// This will overwrite the file if it already exists.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload =
            serde_json::to_string_pretty(self).context("failed to serialize settings JSON")?;
        fs::write(path, payload)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }

    /// Clamp values to usable ranges.
    pub fn sanitize(&mut self) {
        self.repeat_count = self.repeat_count.max(1);
        if self.precision.trim().is_empty() {
            self.precision = Self::default().precision;
        }
        if self.model_type.trim().is_empty() {
            self.model_type = Self::default().model_type;
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn aggregate_delay(&self) -> Duration {
        Duration::from_millis(self.aggregate_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_settings_layout() {
        let settings = ProfileSettings::default();
        assert_eq!(settings.precision, "FP16");
        assert_eq!(settings.model_type, "imagenet");
        assert_eq!(settings.repeat_count, 50);
        assert_eq!(settings.warmup_images, 20);
        assert_eq!(settings.settle_delay(), Duration::from_secs(5));
        assert_eq!(settings.aggregate_delay(), Duration::from_secs(2));
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "precision": "FP32", "repeat_count": 0 }"#).expect("write");

        let settings = ProfileSettings::load_from_path(&path).expect("load");
        assert_eq!(settings.precision, "FP32");
        assert_eq!(settings.repeat_count, 1, "repeat count is clamped to 1");
        assert_eq!(settings.manifest, PathBuf::from("img_name.txt"));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let settings = ProfileSettings {
            precision: "INT8".into(),
            settle_delay_ms: 0,
            ..ProfileSettings::default()
        };
        settings.save_to_path(&path).expect("save");
        assert_eq!(ProfileSettings::load_from_path(&path).expect("load"), settings);
    }

    #[test]
    fn malformed_json_reports_path() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").expect("write");
        let err = ProfileSettings::load_from_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
