use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Rgba8, StrokeStyle};
use crate::foundation::error::{PlumError, PlumResult};
use crate::growth::engine::GrowthParams;
use crate::schedule::scheduler::SchedulerParams;

/// Everything that shapes a backdrop, loadable from JSON.
///
/// Every field is optional in the document; missing fields take the defaults of the classic plum
/// effect (stroke `rgba(214, 213, 209, 0.5)` at width 0.5, four guaranteed generations, a 50%
/// continuation chance, advancing every third refresh with 70% retention).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlumConfig {
    /// Seed of the random source driving every stochastic decision.
    pub seed: u64,
    /// Line color and width.
    pub stroke: StrokeStyle,
    /// Opaque color frames are flattened over when exported.
    pub background: Rgba8,
    /// Continuation rule.
    pub growth: GrowthParams,
    /// Refresh throttle.
    pub scheduler: SchedulerParams,
}

impl Default for PlumConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            stroke: StrokeStyle::default(),
            background: Rgba8::new(18, 20, 28, 255),
            growth: GrowthParams::default(),
            scheduler: SchedulerParams::default(),
        }
    }
}

impl PlumConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> PlumResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| PlumError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PlumResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| PlumError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every section.
    pub fn validate(&self) -> PlumResult<()> {
        if !self.stroke.width.is_finite() || self.stroke.width <= 0.0 {
            return Err(PlumError::validation("stroke.width must be finite and > 0"));
        }
        self.growth.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
