use anyhow::Context as _;

use crate::animation::ease::Ease;
use crate::config::EngineConfig;
use crate::foundation::core::{LEFT, Point, RIGHT, Vec2};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;
use crate::geometry::shape::{Group, Transformable};
use crate::matrix::{MatrixBackend, MatrixEngine, VisualMatrix};
use crate::plot::distribution::{DistributionOpts, DistributionPlot};
use crate::scene::labels::{LabelStrip, LabelStripOpts};
use crate::scene::viewport::{Viewport, ViewportSize};
use crate::tensor::Tensor;

/// Timing and placement options for [`SceneOrchestrator`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimelineOpts {
    /// Length of each transition, in seconds.
    pub duration_each: f64,
    /// Pause after each transition, in seconds.
    pub duration_gap: f64,
    /// Hold after the last frame, in seconds.
    pub final_hold: f64,
    /// Share of the frame width a wide shape is fitted to.
    pub width_ratio: f64,
    /// Share of the frame height a tall shape is fitted to.
    pub height_ratio: f64,
    /// Horizontal offset of matrix and plot from the center, as a share of the frame width.
    pub side_offset_ratio: f64,
    /// Gap between the label strip and the top edge.
    pub label_edge_buff: f64,
    /// Rate function of every transition.
    pub ease: Ease,
}

impl Default for TimelineOpts {
    fn default() -> Self {
        Self {
            duration_each: 0.8,
            duration_gap: 1.0,
            final_hold: 1.0,
            width_ratio: 0.36,
            height_ratio: 0.8,
            side_offset_ratio: 0.25,
            label_edge_buff: 0.1,
            ease: Ease::Smooth,
        }
    }
}

impl TimelineOpts {
    /// Durations must be non-negative (transitions strictly positive); ratios in `(0, 1]`.
    pub fn validate(&self) -> TensorSpecResult<()> {
        if !is_positive(self.duration_each) {
            return Err(TensorSpecError::validation("duration_each must be > 0"));
        }
        for (name, v) in [
            ("duration_gap", self.duration_gap),
            ("final_hold", self.final_hold),
            ("label_edge_buff", self.label_edge_buff),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(TensorSpecError::validation(format!("{name} must be >= 0")));
            }
        }
        for (name, v) in [
            ("width_ratio", self.width_ratio),
            ("height_ratio", self.height_ratio),
        ] {
            if !(v > 0.0 && v <= 1.0) {
                return Err(TensorSpecError::validation(format!(
                    "{name} must be within (0, 1]"
                )));
            }
        }
        if !(0.0..=0.5).contains(&self.side_offset_ratio) {
            return Err(TensorSpecError::validation(
                "side_offset_ratio must be within [0, 0.5]",
            ));
        }
        Ok(())
    }
}

/// One timeline entry: a tensor's matrix, its distribution and the progress strip.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneFrame {
    /// Caller label of the tensor.
    pub label: String,
    /// Matrix, placed left of center.
    pub visual_matrix: VisualMatrix,
    /// Distribution, placed right of center.
    pub distribution_plot: DistributionPlot,
    /// Progress strip, anchored to the top edge.
    pub label_strip: LabelStrip,
}

impl SceneFrame {
    /// Flatten matrix, plot and strip into one group.
    pub fn to_group(&self) -> Group {
        let mut group = self.visual_matrix.to_group();
        group.append(self.distribution_plot.to_group());
        group.append(self.label_strip.to_group());
        group
    }
}

/// Frame element a transition morphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// Visual matrix.
    Matrix,
    /// Distribution plot.
    Plot,
    /// Label strip.
    Label,
}

/// Every track, in the order transitions list them.
pub const ALL_TRACKS: [Track; 3] = [Track::Plot, Track::Matrix, Track::Label];

/// Playback instruction for the animation collaborator.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Directive {
    /// Show a frame without a transition.
    Add {
        /// Frame index.
        frame: usize,
    },
    /// Morph every listed track from one frame into the next, simultaneously.
    Transform {
        /// Outgoing frame.
        from: usize,
        /// Incoming frame.
        to: usize,
        /// Seconds.
        duration: f64,
        /// Rate function.
        ease: Ease,
        /// Tracks morphed together.
        tracks: Vec<Track>,
    },
    /// Hold the current frame.
    Wait {
        /// Seconds.
        duration: f64,
    },
}

impl Directive {
    /// Seconds this directive occupies.
    pub fn duration(&self) -> f64 {
        match self {
            Self::Add { .. } => 0.0,
            Self::Transform { duration, .. } | Self::Wait { duration } => *duration,
        }
    }
}

/// What is on screen at a given time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimelineState {
    /// A single frame is shown.
    Hold {
        /// Frame index.
        frame: usize,
    },
    /// A transition is in progress.
    Morph {
        /// Outgoing frame.
        from: usize,
        /// Incoming frame.
        to: usize,
        /// Eased progress in `[0, 1]`.
        progress: f64,
    },
}

/// Finished frames plus the directives that play them.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneTimeline {
    /// One frame per input tensor, in input order.
    pub frames: Vec<SceneFrame>,
    /// Playback directives in order.
    pub directives: Vec<Directive>,
}

impl SceneTimeline {
    /// Number of transitions.
    pub fn transition_count(&self) -> usize {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::Transform { .. }))
            .count()
    }

    /// Sum of all directive durations.
    pub fn total_duration(&self) -> f64 {
        self.directives.iter().map(Directive::duration).sum()
    }

    /// State at `t` seconds; times past the end hold the last frame.
    pub fn state_at(&self, t: f64) -> TimelineState {
        let mut current = 0;
        let mut start = 0.0;
        for d in &self.directives {
            let end = start + d.duration();
            match d {
                Directive::Add { frame } => current = *frame,
                Directive::Transform {
                    from,
                    to,
                    duration,
                    ease,
                    ..
                } => {
                    if t < end {
                        let local = ((t - start) / duration).max(0.0);
                        return TimelineState::Morph {
                            from: *from,
                            to: *to,
                            progress: ease.apply(local),
                        };
                    }
                    current = *to;
                }
                Directive::Wait { .. } => {
                    if t < end {
                        return TimelineState::Hold { frame: current };
                    }
                }
            }
            start = end;
        }
        TimelineState::Hold { frame: current }
    }

    /// Pretty-printed JSON for the animation collaborator.
    pub fn to_json(&self) -> TensorSpecResult<String> {
        let json = serde_json::to_string_pretty(self).context("serialize scene timeline")?;
        Ok(json)
    }
}

/// Builds a [`SceneTimeline`] from tensors with one matrix backend chosen up front.
pub struct SceneOrchestrator {
    backend: Box<dyn MatrixBackend>,
    viewport: ViewportSize,
    timeline: TimelineOpts,
    distribution: DistributionOpts,
    labels: LabelStripOpts,
}

impl std::fmt::Debug for SceneOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneOrchestrator")
            .field("engine", &self.backend.engine())
            .field("viewport", &self.viewport)
            .field("timeline", &self.timeline)
            .finish_non_exhaustive()
    }
}

impl SceneOrchestrator {
    /// Orchestrator over `backend` with default options.
    pub fn new(
        backend: Box<dyn MatrixBackend>,
        viewport: &impl Viewport,
    ) -> TensorSpecResult<Self> {
        let viewport = viewport.viewport_size();
        viewport.validate()?;
        Ok(Self {
            backend,
            viewport,
            timeline: TimelineOpts::default(),
            distribution: DistributionOpts::default(),
            labels: LabelStripOpts::default(),
        })
    }

    /// Orchestrator with every option and the backend taken from `config`.
    pub fn from_config(
        config: &EngineConfig,
        viewport: &impl Viewport,
    ) -> TensorSpecResult<Self> {
        config.validate()?;
        let mut this = Self::new(config.backend()?, viewport)?;
        this.timeline = config.timeline.clone();
        this.distribution = config.distribution.clone();
        this.labels = config.labels.clone();
        Ok(this)
    }

    /// Replace the timeline options.
    pub fn with_timeline_opts(mut self, opts: TimelineOpts) -> TensorSpecResult<Self> {
        opts.validate()?;
        self.timeline = opts;
        Ok(self)
    }

    /// Replace the distribution plot options.
    pub fn with_distribution_opts(mut self, opts: DistributionOpts) -> TensorSpecResult<Self> {
        opts.validate()?;
        self.distribution = opts;
        Ok(self)
    }

    /// Replace the label strip options.
    pub fn with_label_opts(mut self, opts: LabelStripOpts) -> TensorSpecResult<Self> {
        opts.validate()?;
        self.labels = opts;
        Ok(self)
    }

    /// Engine of the chosen backend.
    pub fn engine(&self) -> MatrixEngine {
        self.backend.engine()
    }

    /// Active viewport.
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Build one frame per tensor and the directives that play them.
    ///
    /// Preconditions are checked before any frame is built. The first failing frame aborts
    /// the whole build.
    #[tracing::instrument(
        skip(self, tensors, labels),
        fields(engine = %self.backend.engine(), frames = tensors.len())
    )]
    pub fn build<S: AsRef<str>>(
        &mut self,
        tensors: &[Tensor],
        labels: &[S],
    ) -> TensorSpecResult<SceneTimeline> {
        if tensors.len() != labels.len() {
            return Err(TensorSpecError::shape(format!(
                "tensors and labels must have the same length, got {} / {}",
                tensors.len(),
                labels.len()
            )));
        }
        if tensors.is_empty() {
            return Err(TensorSpecError::shape("timeline needs at least one tensor"));
        }
        self.timeline.validate()?;
        self.distribution.validate()?;
        self.labels.validate()?;

        let mut frames = Vec::with_capacity(tensors.len());
        for (i, (tensor, label)) in tensors.iter().zip(labels).enumerate() {
            frames.push(self.build_frame(i, tensor, label.as_ref(), labels)?);
            tracing::debug!(frame = i, "scene frame built");
        }

        let opts = &self.timeline;
        let mut directives = vec![Directive::Add { frame: 0 }];
        for i in 1..frames.len() {
            directives.push(Directive::Transform {
                from: i - 1,
                to: i,
                duration: opts.duration_each,
                ease: opts.ease,
                tracks: ALL_TRACKS.to_vec(),
            });
            directives.push(Directive::Wait {
                duration: opts.duration_gap,
            });
        }
        directives.push(Directive::Wait {
            duration: opts.final_hold,
        });

        Ok(SceneTimeline { frames, directives })
    }

    fn build_frame<S: AsRef<str>>(
        &mut self,
        index: usize,
        tensor: &Tensor,
        label: &str,
        labels: &[S],
    ) -> TensorSpecResult<SceneFrame> {
        let vp = self.viewport;
        let opts = &self.timeline;
        let offset = vp.width() * opts.side_offset_ratio;

        let mut distribution_plot = DistributionPlot::build(tensor, &self.distribution)?;
        distribution_plot.move_to(Point::ORIGIN + RIGHT * offset);
        vp.fit(&mut distribution_plot, opts.width_ratio, opts.height_ratio);

        let mut visual_matrix = self.backend.build(tensor, label)?;
        visual_matrix.move_to(Point::ORIGIN + LEFT * offset);
        vp.fit(&mut visual_matrix, opts.width_ratio, opts.height_ratio);

        let mut label_strip = LabelStrip::build_with(labels, index, &self.labels)?;
        if let Some(b) = label_strip.bounds() {
            let top = vp.height() / 2.0 - opts.label_edge_buff;
            label_strip.shift(Vec2::new(0.0, top - b.y1));
        }

        Ok(SceneFrame {
            label: label.to_owned(),
            visual_matrix,
            distribution_plot,
            label_strip,
        })
    }
}

/// Build a timeline in one call.
///
/// `engine` accepts the names understood by [`MatrixEngine`]'s `FromStr`.
pub fn build_timeline<S: AsRef<str>>(
    tensors: &[Tensor],
    labels: &[S],
    duration_each: f64,
    duration_gap: f64,
    engine: &str,
    viewport: &impl Viewport,
) -> TensorSpecResult<SceneTimeline> {
    let config = EngineConfig {
        engine: engine.parse()?,
        ..EngineConfig::default()
    };
    let timeline = TimelineOpts {
        duration_each,
        duration_gap,
        ..config.timeline.clone()
    };
    SceneOrchestrator::from_config(&config, viewport)?
        .with_timeline_opts(timeline)?
        .build(tensors, labels)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/timeline.rs"]
mod tests;
