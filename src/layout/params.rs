/// Lower end of the channel-count reference range.
pub const REFERENCE_MIN_CHANNELS: usize = 3;
/// Upper end of the channel-count reference range.
pub const REFERENCE_MAX_CHANNELS: usize = 64;

/// Exponential curve pinned to a value at each end of the reference range.
///
/// Between the anchors the value moves by a constant factor per channel, so density scales
/// sublinearly: thin and very wide tensors both stay legible.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChannelCurve {
    /// Value at [`REFERENCE_MIN_CHANNELS`] and below.
    pub at_min: f64,
    /// Value at [`REFERENCE_MAX_CHANNELS`] and above.
    pub at_max: f64,
}

impl ChannelCurve {
    /// Sample the curve for `channels`, pinned outside the reference range.
    pub fn eval(self, channels: usize) -> f64 {
        if channels <= REFERENCE_MIN_CHANNELS {
            return self.at_min;
        }
        if channels >= REFERENCE_MAX_CHANNELS {
            return self.at_max;
        }
        let span = (REFERENCE_MAX_CHANNELS - REFERENCE_MIN_CHANNELS) as f64;
        let base = (self.at_max / self.at_min).powf(1.0 / span);
        let decay = (REFERENCE_MAX_CHANNELS - channels) as f64;
        self.at_max / base.powf(decay)
    }
}

/// Outline stroke width: 1.3 at 3 channels, thinning to 0.8 at 64.
pub const STROKE_WIDTH: ChannelCurve = ChannelCurve {
    at_min: 1.3,
    at_max: 0.8,
};

/// Total stack thickness: 1.2 at 3 channels, growing to 2.0 at 64.
pub const CHANNEL_THICKNESS: ChannelCurve = ChannelCurve {
    at_min: 1.2,
    at_max: 2.0,
};

/// Geometry constants derived from a tensor's channel count.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LayoutParameters {
    /// Channel count these parameters were derived for.
    pub channels: usize,
    /// Stroke width for cell and layer outlines.
    pub stroke_width: f64,
    /// Distance covered by the whole stack of channel layers.
    pub channel_thickness: f64,
}

impl LayoutParameters {
    /// Derive layout parameters for `channels`.
    pub fn for_channels(channels: usize) -> Self {
        Self {
            channels,
            stroke_width: STROKE_WIDTH.eval(channels),
            channel_thickness: CHANNEL_THICKNESS.eval(channels),
        }
    }

    /// Shift between consecutive channel layers; zero for a single channel.
    pub fn inter_layer_offset(&self) -> f64 {
        if self.channels <= 1 {
            return 0.0;
        }
        self.channel_thickness / ((self.channels - 1) as f64)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/params.rs"]
mod tests;
