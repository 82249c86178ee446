//! The in-memory caption document: styles and events, serialized to ASS text
//! exactly once, at the end of compilation.

use crate::tags::{render_block, Override};
use crate::time::format_ass_time;

/// One `[V4+ Styles]` style line. Only the fields the compiler actually varies
/// are named; the rest render to the catalog's fixed defaults.
#[derive(Debug, Clone)]
pub struct AssStyleDef {
    pub name: String,
    pub font_family: String,
    pub font_size: u32,
    pub primary_color: crate::color::AssColor,
    pub outline_color: crate::color::AssColor,
}

impl AssStyleDef {
    fn render(&self) -> String {
        format!(
            "Style: {},{},{},{},&H0000FFFF,{},&H99000000,-1,0,0,0,100,100,0,0,1,4,3,2,10,10,40,1",
            self.name,
            self.font_family,
            self.font_size,
            self.primary_color.to_ass(),
            self.outline_color.to_ass(),
        )
    }
}

/// A run of text carrying one override block; an event's text is the
/// concatenation of its segments in order.
#[derive(Debug, Clone)]
pub struct EventSegment {
    pub overrides: Vec<Override>,
    pub text: String,
}

impl EventSegment {
    pub fn new(overrides: Vec<Override>, text: impl Into<String>) -> Self {
        Self { overrides, text: text.into() }
    }

    fn render(&self) -> String {
        format!("{}{}", render_block(&self.overrides), self.text)
    }
}

/// A single `Dialogue:` line, positioned in clip-relative seconds.
#[derive(Debug, Clone)]
pub struct AssEvent {
    pub layer: i32,
    pub start: f64,
    pub end: f64,
    pub style: String,
    pub segments: Vec<EventSegment>,
}

impl AssEvent {
    pub fn new(layer: i32, start: f64, end: f64, style: impl Into<String>, segments: Vec<EventSegment>) -> Self {
        Self { layer, start, end, style: style.into(), segments }
    }

    fn render(&self) -> String {
        let text: String = self.segments.iter().map(EventSegment::render).collect();
        format!(
            "Dialogue: {},{},{},{},,0,0,0,,{}",
            self.layer,
            format_ass_time(self.start),
            format_ass_time(self.end),
            self.style,
            text,
        )
    }
}

/// A complete compiled caption script: header, styles, and events.
#[derive(Debug, Clone)]
pub struct AssDocument {
    pub title: String,
    pub play_res_x: u32,
    pub play_res_y: u32,
    pub styles: Vec<AssStyleDef>,
    pub events: Vec<AssEvent>,
}

impl AssDocument {
    pub fn new(title: impl Into<String>, play_res_x: u32, play_res_y: u32) -> Self {
        Self { title: title.into(), play_res_x, play_res_y, styles: Vec::new(), events: Vec::new() }
    }

    pub fn to_ass_string(&self) -> String {
        let mut out = String::new();
        out.push_str("[Script Info]\n");
        out.push_str(&format!("Title: {}\n", self.title));
        out.push_str("ScriptType: v4.00+\n");
        out.push_str(&format!("PlayResX: {}\n", self.play_res_x));
        out.push_str(&format!("PlayResY: {}\n\n", self.play_res_y));

        out.push_str("[V4+ Styles]\n");
        out.push_str("Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n");
        for style in &self.styles {
            out.push_str(&style.render());
            out.push('\n');
        }
        out.push('\n');

        out.push_str("[Events]\n");
        out.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
        for event in &self.events {
            out.push_str(&event.render());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::AssColor;

    #[test]
    fn test_document_renders_header_and_one_event() {
        let mut doc = AssDocument::new("test", 1080, 1920);
        doc.styles.push(AssStyleDef {
            name: "Default".into(),
            font_family: "Arial Black".into(),
            font_size: 96,
            primary_color: AssColor::WHITE,
            outline_color: AssColor::BLACK,
        });
        doc.events.push(AssEvent::new(
            0,
            1.0,
            2.5,
            "Default",
            vec![EventSegment::new(vec![Override::Alignment(5)], "HELLO")],
        ));

        let rendered = doc.to_ass_string();
        assert!(rendered.contains("PlayResX: 1080"));
        assert!(rendered.contains("Style: Default,Arial Black,96"));
        assert!(rendered.contains("Dialogue: 0,0:00:01.00,0:00:02.50,Default,,0,0,0,,{\\an5}HELLO"));
    }
}
