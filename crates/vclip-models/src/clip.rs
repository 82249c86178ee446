//! Rendered clip records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::job::LayoutMode;

/// Per-clip render state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClipStatus {
    #[default]
    Pending,
    Cutting,
    Reframing,
    Compiling,
    Burning,
    Done,
    Failed,
}

impl ClipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipStatus::Pending => "pending",
            ClipStatus::Cutting => "cutting",
            ClipStatus::Reframing => "reframing",
            ClipStatus::Compiling => "compiling",
            ClipStatus::Burning => "burning",
            ClipStatus::Done => "done",
            ClipStatus::Failed => "failed",
        }
    }
}

/// A single rendered (or attempted) output clip.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClipRecord {
    pub output_path: String,
    pub source_path: String,
    pub start: f64,
    pub end: f64,
    pub layout: LayoutMode,
    pub template: String,
    pub duration: f64,
    pub score: f64,
    pub text: String,
    pub status: ClipStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<String>,
}

impl ClipRecord {
    pub fn pending(source_path: impl Into<String>, start: f64, end: f64, layout: LayoutMode, template: impl Into<String>) -> Self {
        Self {
            output_path: String::new(),
            source_path: source_path.into(),
            start,
            end,
            layout,
            template: template.into(),
            duration: (end - start).max(0.0),
            score: 0.0,
            text: String::new(),
            status: ClipStatus::Pending,
            failed_stage: None,
        }
    }

    pub fn mark_done(mut self, output_path: impl Into<String>) -> Self {
        self.output_path = output_path.into();
        self.status = ClipStatus::Done;
        self
    }

    pub fn mark_failed(mut self, stage: impl Into<String>) -> Self {
        self.status = ClipStatus::Failed;
        self.failed_stage = Some(stage.into());
        self
    }

    /// Sanitize a template or text fragment for inclusion in a filesystem path.
    pub fn sanitize_filename_part(raw: &str) -> String {
        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }

    /// Output filename per the naming convention:
    /// `{job_id?_}clip_{index}_score_{score_with_dot_as_underscore}_{layout}_{template_lower}.mp4`
    pub fn output_filename(&self, job_id: Option<&str>, index: usize) -> String {
        let score_part = format!("{:.2}", self.score).replace('.', "_");
        let template_part = Self::sanitize_filename_part(&self.template.to_lowercase());
        match job_id {
            Some(id) => format!(
                "{}_clip_{}_score_{}_{}_{}.mp4",
                Self::sanitize_filename_part(id),
                index,
                score_part,
                self.layout,
                template_part
            ),
            None => format!("clip_{}_score_{}_{}_{}.mp4", index, score_part, self.layout, template_part),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_filename_without_job_id() {
        let mut clip = ClipRecord::pending("/src.mp4", 0.0, 30.0, LayoutMode::Fit, "Bold");
        clip.score = 12.5;
        assert_eq!(clip.output_filename(None, 1), "clip_1_score_12_50_fit_bold.mp4");
    }

    #[test]
    fn test_output_filename_with_job_id() {
        let mut clip = ClipRecord::pending("/src.mp4", 0.0, 30.0, LayoutMode::Auto, "Karaoke");
        clip.score = 8.0;
        assert_eq!(clip.output_filename(Some("job-1"), 2), "job-1_clip_2_score_8_00_auto_karaoke.mp4");
    }

    #[test]
    fn test_mark_failed_records_stage() {
        let clip = ClipRecord::pending("/src.mp4", 0.0, 30.0, LayoutMode::Fit, "Bold").mark_failed("burning");
        assert_eq!(clip.status, ClipStatus::Failed);
        assert_eq!(clip.failed_stage.as_deref(), Some("burning"));
    }
}
