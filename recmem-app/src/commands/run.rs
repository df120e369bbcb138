//! The `recmem run` command: a full session in the experiment window.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use recmem_core::Stimulus;
use recmem_experiment::{ExperimentConfig, SessionOutcome, SessionRunner, discover_images, partition};
use recmem_results::store_summary;
use recmem_timing::HighPrecisionTimer;
use tracing::info;

use crate::commands::score::{evaluate, print_summary};
use crate::console::{Style, styled};
use crate::display::WindowDisplay;
use crate::prompt::confirm;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// TOML file with experiment settings; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory of stimulus images
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Root directory for session results
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub subject: Option<u32>,

    /// Seed for the study/test partition
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of study images (5 to 50)
    #[arg(long)]
    pub images: Option<usize>,

    #[arg(long)]
    pub trials: Option<u32>,

    /// Seconds each image stays on screen
    #[arg(long)]
    pub presentation: Option<f64>,

    /// Seconds of blank screen after each image
    #[arg(long)]
    pub delay: Option<f64>,

    /// Key meaning "seen before"
    #[arg(long)]
    pub old_key: Option<String>,

    /// Key meaning "not seen before"
    #[arg(long)]
    pub new_key: Option<String>,

    #[arg(long)]
    pub fullscreen: bool,

    /// TrueType font for text screens
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Process and save results without asking
    #[arg(long, short)]
    pub yes: bool,
}

impl RunArgs {
    pub fn resolve(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ExperimentConfig::default(),
        };
        if let Some(dir) = &self.dataset {
            config.dataset_dir = dir.clone();
        }
        if let Some(dir) = &self.output {
            config.output_dir = dir.clone();
        }
        if let Some(subject) = self.subject {
            config.subject = subject;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(count) = self.images {
            config.image_count = count;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(secs) = self.presentation {
            config.presentation_secs = secs;
        }
        if let Some(secs) = self.delay {
            config.delay_secs = secs;
        }
        if let Some(key) = &self.old_key {
            config.old_key = key.clone();
        }
        if let Some(key) = &self.new_key {
            config.new_key = key.clone();
        }
        if self.fullscreen {
            config.display.fullscreen = true;
        }
        if let Some(font) = &self.font {
            config.display.font_path = Some(font.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = args.resolve()?;

    let universe: Vec<Stimulus> = discover_images(&config.dataset_dir)?
        .into_iter()
        .map(Stimulus::from_path)
        .collect();
    let sets = partition(config.seed, config.image_count, &universe)?;
    info!(
        subject = config.subject,
        seed = config.seed,
        study = sets.study.len(),
        test = sets.test.len(),
        "session prepared"
    );

    let outcome = {
        let mut display = WindowDisplay::open(&config.display)?;
        let mut timer = HighPrecisionTimer::new();
        SessionRunner::new(&mut display, &mut timer, &config, Local::now())?.run(&sets)?
    };
    println!("{}", styled("Session complete.", Style::Success));

    process(&outcome, args.yes)
}

fn process(outcome: &SessionOutcome, yes: bool) -> Result<()> {
    if !(yes || confirm("Process the results?")?) {
        return Ok(());
    }
    let summary = evaluate(&outcome.test_table, &outcome.study_table, outcome.trial)?;
    print_summary(&summary);

    if yes || confirm("Save the results?")? {
        let path = store_summary(&outcome.test_table, &summary)?;
        println!("{}", styled(&format!("Saved {}", path.display()), Style::Success));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("experiment.toml");
        std::fs::write(
            &path,
            "dataset_dir = \"/images\"\noutput_dir = \"/results\"\nseed = 1\nimage_count = 12\n",
        )
        .unwrap();

        let args = RunArgs {
            config: Some(path),
            seed: Some(99),
            old_key: Some("F".into()),
            new_key: Some("j".into()),
            fullscreen: true,
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.image_count, 12);
        assert_eq!(config.old_key, "F");
        assert!(config.display.fullscreen);
    }

    #[test]
    fn missing_dataset_is_rejected_before_opening_a_window() {
        let args = RunArgs {
            output: Some("/results".into()),
            ..Default::default()
        };
        let err = args.resolve().unwrap_err();
        assert!(format!("{err:#}").contains("dataset directory"));
    }
}
