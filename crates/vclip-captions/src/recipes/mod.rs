//! The nine concrete animation recipes. Each builds a `Vec<AssEvent>` from
//! already-chunked, clip-relative words — never by concatenating strings.

pub mod bubble_pop;
pub mod context;
pub mod drop_in_impact;
pub mod karaoke_highlight;
pub mod progressive_fill;
pub mod progressive_typewriter;
pub mod rainbow_slide;
pub mod rgb_glitch;
pub mod speaker_colored_block;
pub mod word_by_word_explode;
