//! Speaker segmentation types used by the face/speaker adapter.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A speaker bucket: either side of a split-screen layout, or an opaque
/// diarization cluster id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerLabel {
    Left,
    Right,
    Cluster(String),
}

impl fmt::Display for SpeakerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakerLabel::Left => write!(f, "left"),
            SpeakerLabel::Right => write!(f, "right"),
            SpeakerLabel::Cluster(id) => write!(f, "{id}"),
        }
    }
}

/// A time range attributed to a single speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeakerSegment {
    pub start: f64,
    pub end: f64,
    pub speaker: SpeakerLabel,
}

impl SpeakerSegment {
    pub fn new(start: f64, end: f64, speaker: SpeakerLabel) -> Self {
        Self { start, end, speaker }
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }
}

/// A face coordinate on the frame, normalized to [0,1] on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceCenter {
    pub x: f64,
    pub y: f64,
}

impl FaceCenter {
    pub fn frame_center() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_segment_contains() {
        let seg = SpeakerSegment::new(1.0, 2.0, SpeakerLabel::Left);
        assert!(seg.contains(1.5));
        assert!(!seg.contains(2.5));
    }

    #[test]
    fn test_speaker_label_display() {
        assert_eq!(SpeakerLabel::Left.to_string(), "left");
        assert_eq!(SpeakerLabel::Cluster("spk_0".into()).to_string(), "spk_0");
    }
}
