use serde::{Deserialize, Serialize};

/// Static descriptor of one articulated body segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPartDefinition {
    /// Position of this body part in every per-body-part collection.
    pub index: usize,
    /// Human-readable name (e.g. "upper_arm_left").
    pub name: String,
    /// Skeleton joint at the proximal end of the segment.
    pub node1: String,
    /// Skeleton joint at the distal end of the segment.
    pub node2: String,
    /// Display color, each channel in 0..=1.
    pub color: [f32; 3],
}

impl BodyPartDefinition {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        node1: impl Into<String>,
        node2: impl Into<String>,
        color: [f32; 3],
    ) -> Self {
        Self {
            index,
            name: name.into(),
            node1: node1.into(),
            node2: node2.into(),
            color,
        }
    }

    /// Display color in 0..=255, one byte per channel.
    pub fn color_bytes(&self) -> [u8; 3] {
        self.color.map(channel_to_byte)
    }
}

/// Convert a 0..=1 color channel to a byte with `round(channel * 255)`.
///
/// Out-of-range channels clamp; NaN maps to 0.
pub fn channel_to_byte(channel: f32) -> u8 {
    let scaled = (channel * 255.0).round();
    if scaled.is_nan() {
        0
    } else {
        scaled.clamp(0.0, 255.0) as u8
    }
}
