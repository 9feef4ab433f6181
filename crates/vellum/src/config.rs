//! Engine configuration.
//!
//! Hosts typically deserialize an [`EngineConfig`] from whatever
//! configuration source they use and hand it to the animator; every field
//! has a default, so an empty document is a valid configuration.

use serde::Deserialize;

use crate::animate::StopPolicy;

const DEFAULT_CLEAR_PADDING: f32 = 2.0;

/// Tunables shared by the renderer and the animation scheduler.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Extra margin, in pixels, cleared around a drawable's rectangle
    /// before each animation cycle. Covers antialiased edge bleed.
    clear_padding: f32,
    /// What happens to the frame in flight when an animation's stop
    /// condition is met.
    stop_policy: StopPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clear_padding: DEFAULT_CLEAR_PADDING,
            stop_policy: StopPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Returns the clear padding in pixels
    pub fn clear_padding(&self) -> f32 {
        self.clear_padding
    }

    /// Returns the stop policy
    pub fn stop_policy(&self) -> StopPolicy {
        self.stop_policy
    }

    /// Sets the clear padding.
    pub fn with_clear_padding(mut self, padding: f32) -> Self {
        self.clear_padding = padding;
        self
    }

    /// Sets the stop policy.
    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.stop_policy = policy;
        self
    }
}
