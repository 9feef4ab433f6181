//! Animation scheduling.
//!
//! The engine does not own a clock. An [`Animator`] is pumped by the host:
//! once per timer period for [`ScheduleMode::Interval`], once per frame
//! callback for [`ScheduleMode::FrameDriven`]. Each [`Animator::tick`]
//! runs at most one cycle (clear, advance, rebuild, render) and returns
//! [`ControlFlow`] telling the host whether to keep pumping.
//!
//! The two modes agree on cycle counts but not on ordering: interval mode
//! advances the transform before drawing the cycle, frame mode draws first
//! and then asks the transform whether another frame is wanted. With the
//! default [`StopPolicy::DrawFinalFrame`], a transform that reports "keep
//! going" N times produces exactly N + 1 rendered cycles in either mode.

use std::ops::ControlFlow;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::config::EngineConfig;
use crate::drawable::Drawable;
use crate::error::Error;
use crate::render::Renderer;

/// How the host drives the animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    /// One tick per elapsed period. The period is advisory; the host owns
    /// the timer.
    Interval(Duration),
    /// One tick per display frame callback.
    FrameDriven,
}

impl ScheduleMode {
    /// Returns the timer period for interval mode
    pub fn period(self) -> Option<Duration> {
        match self {
            Self::Interval(period) => Some(period),
            Self::FrameDriven => None,
        }
    }
}

/// What happens to the cycle in flight when the transform reports the
/// animation is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    /// The stopping cycle still draws, so the final state lands on the
    /// surface.
    #[default]
    DrawFinalFrame,
    /// The stopping tick draws nothing; the previous frame remains.
    SkipFinalFrame,
}

/// Animator lifecycle states. Terminal states never transition out; a new
/// animation needs a new animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Constructed, not yet ticked.
    Created,
    /// At least one tick has run.
    Scheduled,
    /// Cancelled by [`Animator::stop`].
    Stopped,
    /// Ran to completion.
    Done,
}

/// A drawable plus the closures that rebuild it each cycle.
///
/// `update` regenerates the item list from current state on every build.
/// The two hooks are one-shot: consumed on the first build they apply to.
pub struct Scene {
    drawable: Drawable,
    update: Box<dyn FnMut(&mut Drawable)>,
    on_first_build: Option<Box<dyn FnOnce(&mut Drawable)>>,
    on_post_build: Option<Box<dyn FnOnce(&mut Drawable)>>,
}

impl Scene {
    pub fn new(drawable: Drawable, update: impl FnMut(&mut Drawable) + 'static) -> Self {
        Self {
            drawable,
            update: Box::new(update),
            on_first_build: None,
            on_post_build: None,
        }
    }

    /// Sets a hook that runs once, before the first update.
    pub fn with_on_first_build(mut self, hook: impl FnOnce(&mut Drawable) + 'static) -> Self {
        self.on_first_build = Some(Box::new(hook));
        self
    }

    /// Sets a hook that runs once, after the first render completes.
    pub fn with_on_post_build(mut self, hook: impl FnOnce(&mut Drawable) + 'static) -> Self {
        self.on_post_build = Some(Box::new(hook));
        self
    }

    /// Returns the drawable
    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }

    /// Returns the drawable mutably
    pub fn drawable_mut(&mut self) -> &mut Drawable {
        &mut self.drawable
    }

    /// Runs one build: first-build hook, update, render, post-build hook.
    pub fn build(&mut self, renderer: &mut Renderer<'_>) -> Result<(), Error> {
        if let Some(hook) = self.on_first_build.take() {
            hook(&mut self.drawable);
        }
        (self.update)(&mut self.drawable);
        renderer.render(&mut self.drawable)?;
        if let Some(hook) = self.on_post_build.take() {
            hook(&mut self.drawable);
        }
        Ok(())
    }
}

/// Drives a [`Scene`] through repeated cycles under a host-owned clock.
pub struct Animator {
    scene: Scene,
    transform: Option<Box<dyn FnMut(&mut Drawable) -> bool>>,
    mode: ScheduleMode,
    config: EngineConfig,
    state: AnimationState,
}

impl Animator {
    pub fn new(scene: Scene, mode: ScheduleMode) -> Self {
        Self {
            scene,
            transform: None,
            mode,
            config: EngineConfig::default(),
            state: AnimationState::Created,
        }
    }

    /// Sets the per-cycle transform. It mutates the drawable's state and
    /// returns whether the animation should keep running. Without one, the
    /// animator performs a single build and finishes.
    pub fn with_transform(
        mut self,
        transform: impl FnMut(&mut Drawable) -> bool + 'static,
    ) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Sets the engine configuration (clear padding, stop policy).
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the schedule mode
    pub fn mode(&self) -> ScheduleMode {
        self.mode
    }

    /// Returns the lifecycle state
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Returns the scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the scene mutably
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Cancels the animation. Subsequent ticks are no-ops; a stopped
    /// animator never resumes.
    pub fn stop(&mut self) {
        match self.state {
            AnimationState::Created | AnimationState::Scheduled => {
                debug!(state:? = self.state; "animation stopped");
                self.state = AnimationState::Stopped;
            }
            AnimationState::Stopped | AnimationState::Done => {}
        }
    }

    /// Runs at most one cycle. Returns `Continue` while the host should
    /// keep pumping and `Break` once the animation is over.
    pub fn tick(&mut self, renderer: &mut Renderer<'_>) -> Result<ControlFlow<()>, Error> {
        match self.state {
            AnimationState::Stopped | AnimationState::Done => {
                return Ok(ControlFlow::Break(()));
            }
            AnimationState::Created => {
                debug!(mode:? = self.mode; "animation scheduled");
                self.state = AnimationState::Scheduled;
            }
            AnimationState::Scheduled => {}
        }

        if self.transform.is_none() {
            self.scene.build(renderer)?;
            self.finish();
            return Ok(ControlFlow::Break(()));
        }

        match self.config.stop_policy() {
            StopPolicy::SkipFinalFrame => {
                if !self.apply_transform() {
                    self.finish();
                    return Ok(ControlFlow::Break(()));
                }
                self.run_cycle(renderer)?;
                Ok(ControlFlow::Continue(()))
            }
            StopPolicy::DrawFinalFrame => match self.mode {
                ScheduleMode::Interval(_) => {
                    let next = self.apply_transform();
                    self.run_cycle(renderer)?;
                    if next {
                        Ok(ControlFlow::Continue(()))
                    } else {
                        self.finish();
                        Ok(ControlFlow::Break(()))
                    }
                }
                ScheduleMode::FrameDriven => {
                    self.run_cycle(renderer)?;
                    if self.apply_transform() {
                        Ok(ControlFlow::Continue(()))
                    } else {
                        self.finish();
                        Ok(ControlFlow::Break(()))
                    }
                }
            },
        }
    }

    fn apply_transform(&mut self) -> bool {
        match self.transform.as_mut() {
            Some(transform) => transform(&mut self.scene.drawable),
            None => false,
        }
    }

    fn run_cycle(&mut self, renderer: &mut Renderer<'_>) -> Result<(), Error> {
        self.scene
            .drawable
            .clear(renderer.surface(), self.config.clear_padding());
        self.scene.build(renderer)
    }

    fn finish(&mut self) {
        debug!("animation finished");
        self.state = AnimationState::Done;
    }
}
