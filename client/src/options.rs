use std::time::Duration;

use anyhow::Result;

use common::{Config, ConfigLoader};
use saliency::AttributorOptions;
use uci::{ExtractorOptions, UnscoredPolicy};

/// Tunables shared by both subcommands. Every field has a default, so a
/// config file only needs the keys it wants to override.
#[derive(Clone, Debug)]
pub struct SaliencyOptions {
    /// Top lines requested from the engine per evaluation (MultiPV).
    pub breadth: usize,
    /// Engine thinking time per evaluation, in milliseconds.
    pub budget_ms: usize,
    /// Report signed drops with offense/defense categories.
    pub directional: bool,
    /// Omit perturbations that expose a king instead of scoring them 0.
    pub skip_exposed: bool,
    /// Treat unreported candidates as neutral instead of hopeless.
    pub permissive_unscored: bool,
    /// Saliency cutoff used by the benchmark accuracy metric.
    pub accuracy_threshold: f32,
}

impl Default for SaliencyOptions {
    fn default() -> Self {
        Self {
            breadth: 3,
            budget_ms: 2000,
            directional: false,
            skip_exposed: false,
            permissive_unscored: false,
            accuracy_threshold: 0.5,
        }
    }
}

impl Config for SaliencyOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            breadth: config
                .get("breadth")
                .and_then(|v| v.as_usize())
                .unwrap_or(defaults.breadth),
            budget_ms: config
                .get("budget_ms")
                .and_then(|v| v.as_usize())
                .unwrap_or(defaults.budget_ms),
            directional: config
                .get("directional")
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.directional),
            skip_exposed: config
                .get("skip_exposed")
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.skip_exposed),
            permissive_unscored: config
                .get("permissive_unscored")
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.permissive_unscored),
            accuracy_threshold: config
                .get("accuracy_threshold")
                .and_then(|v| v.as_f32())
                .unwrap_or(defaults.accuracy_threshold),
        })
    }
}

impl SaliencyOptions {
    pub fn attributor_options(&self) -> AttributorOptions {
        AttributorOptions {
            breadth: self.breadth,
            budget: Duration::from_millis(self.budget_ms as u64),
        }
    }

    pub fn extractor_options(&self) -> ExtractorOptions {
        ExtractorOptions {
            unscored: if self.permissive_unscored {
                UnscoredPolicy::Zero
            } else {
                UnscoredPolicy::NegativeInfinity
            },
        }
    }
}
