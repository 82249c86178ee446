//! Speaker-to-colour mapping consulted by the speaker-colored-block recipe.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use vclip_models::{SpeakerLabel, SpeakerSegment};

use crate::color::AssColor;

/// Fallback palette cycled through for diarization clusters beyond the two
/// fixed left/right colours.
const CLUSTER_PALETTE: &[AssColor] = &[
    AssColor::new(0xFF, 0xFF, 0xFF),
    AssColor::new(0x00, 0xFF, 0x00),
    AssColor::new(0x00, 0x80, 0xFF),
    AssColor::new(0xFF, 0xC0, 0x00),
];

/// Finds the speaker attributed to `time` (clip-relative seconds), if any
/// segment covers it.
pub fn speaker_at(time: f64, segments: &[SpeakerSegment]) -> Option<SpeakerLabel> {
    segments.iter().find(|s| s.contains(time)).map(|s| s.speaker.clone())
}

/// Resolves a speaker label to its caption colour: left is green, right is
/// blue, and any diarization cluster hashes into a small fixed palette so the
/// same cluster id always renders the same colour within a run.
pub fn color_for_speaker(label: &SpeakerLabel) -> AssColor {
    match label {
        SpeakerLabel::Left => AssColor::new(0x00, 0xFF, 0x00),
        SpeakerLabel::Right => AssColor::new(0x00, 0x80, 0xFF),
        SpeakerLabel::Cluster(id) => {
            let mut hasher = DefaultHasher::new();
            id.hash(&mut hasher);
            let idx = (hasher.finish() as usize) % CLUSTER_PALETTE.len();
            CLUSTER_PALETTE[idx]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_at_finds_covering_segment() {
        let segs = vec![SpeakerSegment::new(0.0, 1.0, SpeakerLabel::Left), SpeakerSegment::new(1.0, 2.0, SpeakerLabel::Right)];
        assert_eq!(speaker_at(1.5, &segs), Some(SpeakerLabel::Right));
        assert_eq!(speaker_at(5.0, &segs), None);
    }

    #[test]
    fn test_cluster_color_is_stable() {
        let a = color_for_speaker(&SpeakerLabel::Cluster("spk_3".into()));
        let b = color_for_speaker(&SpeakerLabel::Cluster("spk_3".into()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_left_right_fixed_colors() {
        assert_eq!(color_for_speaker(&SpeakerLabel::Left), AssColor::new(0x00, 0xFF, 0x00));
        assert_eq!(color_for_speaker(&SpeakerLabel::Right), AssColor::new(0x00, 0x80, 0xFF));
    }
}
