//! FFmpeg video filter graphs for the four layout modes.

use vclip_models::LayoutMode;

/// Output canvas width/height in pixels (vertical, default).
pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1920;

/// Smaller canvas, optional for the memory-intensive `auto` layout.
pub const SMALL_CANVAS_WIDTH: u32 = 720;
pub const SMALL_CANVAS_HEIGHT: u32 = 1280;

/// `square` layout's centered inset size; captions must stay clear of it
/// (the caption compiler's layout-aware safe zone sits below this inset).
pub const SQUARE_INSET_WIDTH: u32 = 1080;
pub const SQUARE_INSET_HEIGHT: u32 = 1200;
pub const SQUARE_INSET_Y_OFFSET: u32 = 160;

/// Default zoom factor for the `auto` layout's face-centered crop.
pub const AUTO_ZOOM_FACTOR: f64 = 3.0;

/// Letterbox onto the canvas with a blurred, scaled copy as background.
///
/// Splits the input, blurs and scales one copy to fill the canvas, scales the
/// other to fit inside it without cropping, and overlays the sharp copy
/// centered on the blurred one.
pub fn filter_fit(width: u32, height: u32) -> String {
    format!(
        "split=2[bg][fg];\
         [bg]scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},gblur=sigma=20[bgblur];\
         [fg]scale={w}:{h}:force_original_aspect_ratio=decrease[fgscaled];\
         [bgblur][fgscaled]overlay=(W-w)/2:(H-h)/2",
        w = width,
        h = height
    )
}

/// Scale to cover the canvas, center-cropping the overflow.
pub fn filter_fill(width: u32, height: u32) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}",
        w = width,
        h = height
    )
}

/// Centered inset over a blurred background; inset is vertically offset to
/// leave room for captions in the canonical safe zone below it.
pub fn filter_square(canvas_width: u32, canvas_height: u32) -> String {
    format!(
        "split=2[bg][fg];\
         [bg]scale={cw}:{ch}:force_original_aspect_ratio=increase,crop={cw}:{ch},gblur=sigma=25[bgblur];\
         [fg]scale={iw}:{ih}:force_original_aspect_ratio=increase,crop={iw}:{ih}[fgscaled];\
         [bgblur][fgscaled]overlay=(W-w)/2:{y_off}",
        cw = canvas_width,
        ch = canvas_height,
        iw = SQUARE_INSET_WIDTH,
        ih = SQUARE_INSET_HEIGHT,
        y_off = SQUARE_INSET_Y_OFFSET,
    )
}

/// Crop a zoomed box centered on a face coordinate, then scale to the canvas.
///
/// `face_x`/`face_y` are normalized [0,1] coordinates on the source frame.
pub fn filter_auto(canvas_width: u32, canvas_height: u32, face_x: f64, face_y: f64, zoom: f64) -> String {
    let face_x = face_x.clamp(0.0, 1.0);
    let face_y = face_y.clamp(0.0, 1.0);
    // Crop box is 1/zoom of the source in each dimension, centered on the face
    // point and clamped so it never runs off either edge.
    format!(
        "crop='min(iw,iw/{zoom})':'min(ih,ih/{zoom})':\
         'max(0,min(iw-iw/{zoom},iw*{fx}-iw/{zoom}/2))':\
         'max(0,min(ih-ih/{zoom},ih*{fy}-ih/{zoom}/2))',\
         scale={cw}:{ch}:force_original_aspect_ratio=increase,crop={cw}:{ch}",
        zoom = zoom,
        fx = face_x,
        fy = face_y,
        cw = canvas_width,
        ch = canvas_height,
    )
}

/// Build the reframe filter graph for a layout mode.
///
/// `auto` requires a face coordinate resolved by the face/speaker adapter
/// before this is called; callers must have already consulted it.
pub fn build_reframe_filter(
    mode: LayoutMode,
    canvas_width: u32,
    canvas_height: u32,
    face: Option<(f64, f64)>,
) -> String {
    match mode {
        LayoutMode::Fit => filter_fit(canvas_width, canvas_height),
        LayoutMode::Fill => filter_fill(canvas_width, canvas_height),
        LayoutMode::Square => filter_square(canvas_width, canvas_height),
        LayoutMode::Auto => {
            let (fx, fy) = face.unwrap_or((0.5, 0.5));
            filter_auto(canvas_width, canvas_height, fx, fy, AUTO_ZOOM_FACTOR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_reframe_filter_fit_contains_overlay() {
        let f = build_reframe_filter(LayoutMode::Fit, CANVAS_WIDTH, CANVAS_HEIGHT, None);
        assert!(f.contains("overlay"));
        assert!(f.contains("gblur"));
    }

    #[test]
    fn test_build_reframe_filter_fill_is_simple_crop() {
        let f = build_reframe_filter(LayoutMode::Fill, CANVAS_WIDTH, CANVAS_HEIGHT, None);
        assert!(f.contains("crop=1080:1920"));
        assert!(!f.contains("overlay"));
    }

    #[test]
    fn test_build_reframe_filter_square_uses_inset_dims() {
        let f = build_reframe_filter(LayoutMode::Square, CANVAS_WIDTH, CANVAS_HEIGHT, None);
        assert!(f.contains(&SQUARE_INSET_WIDTH.to_string()));
        assert!(f.contains(&SQUARE_INSET_HEIGHT.to_string()));
    }

    #[test]
    fn test_build_reframe_filter_auto_centers_on_face() {
        let f = build_reframe_filter(LayoutMode::Auto, CANVAS_WIDTH, CANVAS_HEIGHT, Some((0.25, 0.75)));
        assert!(f.contains("0.25"));
        assert!(f.contains("0.75"));
    }

    #[test]
    fn test_auto_defaults_to_frame_center_without_face() {
        let f = build_reframe_filter(LayoutMode::Auto, CANVAS_WIDTH, CANVAS_HEIGHT, None);
        assert!(f.contains("0.5"));
    }
}
