//! Typed ASS override tags. Every recipe builds a structured tree of these —
//! never a hand-concatenated tag string — and [`Override::render`] is the one
//! place that knows the `\tag` syntax.

use crate::color::AssColor;

/// A single ASS override tag, or a `\t(...)` transform wrapping a nested set
/// of tags that animates over a time window local to the event.
#[derive(Debug, Clone)]
pub enum Override {
    /// `\1c` primary fill colour.
    PrimaryColor(AssColor),
    /// `\3c` outline colour.
    OutlineColor(AssColor),
    /// `\4c` shadow colour.
    ShadowColor(AssColor),
    /// `\alpha` applied to all channels, 0 (opaque) to 255 (transparent).
    Alpha(u8),
    /// `\fscx`/`\fscy`, percentage (100 = unscaled).
    Scale { x: f64, y: f64 },
    /// `\frz`, degrees of z-axis rotation.
    RotationZ(f64),
    /// `\frx`, degrees of x-axis rotation (used for the shake/jitter wobble).
    RotationX(f64),
    /// `\blur`.
    Blur(f64),
    /// `\bord`.
    Border(f64),
    /// `\shad`.
    Shadow(f64),
    /// `\an`, 1-9 numpad alignment.
    Alignment(u8),
    /// `\pos(x,y)`.
    Position { x: i32, y: i32 },
    /// `\move(x1,y1,x2,y2[,t1,t2])`.
    Move { x1: i32, y1: i32, x2: i32, y2: i32, timing: Option<(u32, u32)> },
    /// `\fad(fade_in_ms,fade_out_ms)`.
    Fade { fade_in_ms: u32, fade_out_ms: u32 },
    /// `\t([t1,t2,][accel,]tags)` — animates the nested tags from `t1` to `t2`
    /// milliseconds into the event.
    Transform { start_ms: u32, end_ms: u32, tags: Vec<Override> },
    /// An escape hatch for a raw literal, used only for the karaoke `\kf`
    /// fill-duration tag, whose unit (centiseconds) doesn't fit the others.
    Raw(String),
}

impl Override {
    pub fn render(&self) -> String {
        match self {
            Override::PrimaryColor(c) => format!("\\1c{}", c.to_ass()),
            Override::OutlineColor(c) => format!("\\3c{}", c.to_ass()),
            Override::ShadowColor(c) => format!("\\4c{}", c.to_ass()),
            Override::Alpha(a) => format!("\\alpha&H{a:02X}&"),
            Override::Scale { x, y } => format!("\\fscx{x}\\fscy{y}"),
            Override::RotationZ(deg) => format!("\\frz{deg}"),
            Override::RotationX(deg) => format!("\\frx{deg}"),
            Override::Blur(v) => format!("\\blur{v}"),
            Override::Border(v) => format!("\\bord{v}"),
            Override::Shadow(v) => format!("\\shad{v}"),
            Override::Alignment(n) => format!("\\an{n}"),
            Override::Position { x, y } => format!("\\pos({x},{y})"),
            Override::Move { x1, y1, x2, y2, timing } => match timing {
                Some((t1, t2)) => format!("\\move({x1},{y1},{x2},{y2},{t1},{t2})"),
                None => format!("\\move({x1},{y1},{x2},{y2})"),
            },
            Override::Fade { fade_in_ms, fade_out_ms } => format!("\\fad({fade_in_ms},{fade_out_ms})"),
            Override::Transform { start_ms, end_ms, tags } => {
                let body = render_tags(tags);
                format!("\\t({start_ms},{end_ms},{body})")
            }
            Override::Raw(s) => s.clone(),
        }
    }
}

/// Renders a sequence of tags as one `{...}`-free override string (no
/// surrounding braces; callers wrap a whole block at the event level).
pub fn render_tags(tags: &[Override]) -> String {
    tags.iter().map(Override::render).collect::<Vec<_>>().join("")
}

/// Wraps a tag sequence in `{}`, the block form ASS expects before event text.
pub fn render_block(tags: &[Override]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", render_tags(tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_color() {
        assert_eq!(Override::PrimaryColor(AssColor::new(0, 255, 0)).render(), "\\1c&H00FF00&");
    }

    #[test]
    fn test_render_transform_nests_tags() {
        let t = Override::Transform {
            start_ms: 0,
            end_ms: 100,
            tags: vec![Override::Scale { x: 125.0, y: 125.0 }],
        };
        assert_eq!(t.render(), "\\t(0,100,\\fscx125\\fscy125)");
    }

    #[test]
    fn test_render_block_wraps_braces() {
        let block = render_block(&[Override::Alignment(5), Override::Position { x: 540, y: 1600 }]);
        assert_eq!(block, "{\\an5\\pos(540,1600)}");
    }

    #[test]
    fn test_render_block_empty_is_empty_string() {
        assert_eq!(render_block(&[]), "");
    }
}
