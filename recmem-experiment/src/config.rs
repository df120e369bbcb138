use std::path::{Path, PathBuf};

use recmem_core::{Error, ResponseKeys, Result};
use serde::{Deserialize, Serialize};

use crate::trial::TrialTiming;

/// Bounds on the study list length accepted at setup.
pub const MIN_IMAGES: usize = 5;
pub const MAX_IMAGES: usize = 50;

/// Everything the experimenter provides before a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub dataset_dir: PathBuf,
    pub output_dir: PathBuf,
    pub seed: u64,
    pub trials: u32,
    pub delay_secs: f64,
    pub old_key: String,
    pub new_key: String,
    pub subject: u32,
    pub image_count: usize,
    pub presentation_secs: f64,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    /// TrueType font for text screens. Without one, text is not drawn.
    pub font_path: Option<PathBuf>,
    /// Stimulus edge length as a fraction of the screen height.
    pub stimulus_scale: f32,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            seed: 0,
            trials: 1,
            delay_secs: 0.5,
            old_key: "a".into(),
            new_key: "l".into(),
            subject: 0,
            image_count: 10,
            presentation_secs: 2.0,
            display: DisplayConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            fullscreen: false,
            font_path: None,
            stimulus_scale: 0.3,
        }
    }
}

impl ExperimentConfig {
    /// Reads a TOML config; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::invalid_input("config", e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset_dir.as_os_str().is_empty() {
            return Err(Error::invalid_input("dataset directory", "not set"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::invalid_input("output directory", "not set"));
        }
        if self.trials == 0 {
            return Err(Error::invalid_input("trials", "must be at least 1"));
        }
        if !(MIN_IMAGES..=MAX_IMAGES).contains(&self.image_count) {
            return Err(Error::invalid_input(
                "number of images",
                format!("must be between {MIN_IMAGES} and {MAX_IMAGES}"),
            ));
        }
        check_seconds("presentation time", self.presentation_secs)?;
        check_seconds("delay", self.delay_secs)?;

        let old = self.old_key.trim();
        let new = self.new_key.trim();
        if old.is_empty() || new.is_empty() {
            return Err(Error::invalid_input("response keys", "both keys are required"));
        }
        if old.eq_ignore_ascii_case(new) {
            return Err(Error::invalid_input("response keys", "old and new keys must differ"));
        }

        let scale = self.display.stimulus_scale;
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(Error::invalid_input("stimulus scale", "must be in (0, 1]"));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(Error::invalid_input("window size", "must be non-zero"));
        }
        self.timing()?;
        Ok(())
    }

    /// Response keys in the lowercase form the display reports.
    pub fn response_keys(&self) -> ResponseKeys {
        ResponseKeys::new(
            self.old_key.trim().to_lowercase(),
            self.new_key.trim().to_lowercase(),
        )
    }

    pub fn timing(&self) -> Result<TrialTiming> {
        TrialTiming::from_secs(self.presentation_secs, self.delay_secs)
    }
}

fn check_seconds(field: &'static str, secs: f64) -> Result<()> {
    if secs.is_finite() && secs >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_input(field, "must be a non-negative number of seconds"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid() -> ExperimentConfig {
        ExperimentConfig {
            dataset_dir: "/data".into(),
            output_dir: "/out".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_with_paths_validate() {
        valid().validate().unwrap();
    }

    #[test]
    fn image_count_bounds() {
        for (count, ok) in [(4, false), (5, true), (50, true), (51, false)] {
            let cfg = ExperimentConfig {
                image_count: count,
                ..valid()
            };
            assert_eq!(cfg.validate().is_ok(), ok, "count {count}");
        }
    }

    #[test]
    fn keys_must_differ() {
        let cfg = ExperimentConfig {
            old_key: "A".into(),
            new_key: "a".into(),
            ..valid()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidExperimenterInput {
                field: "response keys",
                ..
            }
        ));
    }

    #[test]
    fn negative_delay_rejected() {
        let cfg = ExperimentConfig {
            delay_secs: -0.1,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unrepresentable_delay_rejected() {
        let cfg = ExperimentConfig {
            delay_secs: 1e300,
            ..valid()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidExperimenterInput { field: "delay", .. }));
    }

    #[test]
    fn keys_normalised_to_lowercase() {
        let cfg = ExperimentConfig {
            old_key: " F ".into(),
            new_key: "J".into(),
            ..valid()
        };
        assert_eq!(cfg.response_keys(), ResponseKeys::new("f", "j"));
    }

    #[test]
    fn load_partial_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("experiment.toml");
        std::fs::write(
            &path,
            r#"
dataset_dir = "/images"
output_dir = "/results"
seed = 7
image_count = 20

[display]
fullscreen = true
"#,
        )
        .unwrap();
        let cfg = ExperimentConfig::load(&path).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.image_count, 20);
        assert!(cfg.display.fullscreen);
        assert_eq!(cfg.display.width, 800);
        assert_eq!(cfg.old_key, "a");
    }

    #[test]
    fn malformed_toml_is_invalid_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "seed = \"seven\"").unwrap();
        let err = ExperimentConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidExperimenterInput { field: "config", .. }));
    }
}
