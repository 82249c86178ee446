//! Groups clip-relative words into rendered caption lines per a template's
//! [`ChunkMode`].

use rand::rngs::StdRng;
use rand::Rng;
use vclip_models::ChunkMode;

use crate::words::TimedWord;

/// Splits `words` into lines per `mode`. `Variable` draws a weighted line
/// size (3 words: 50%, 2 words: 40%, 1 word: 10%) from `rng`, never drawing
/// two consecutive one-word lines.
pub fn chunk(words: &[TimedWord], mode: &ChunkMode, rng: &mut StdRng) -> Vec<Vec<TimedWord>> {
    match mode {
        ChunkMode::Fixed { words_per_line } => {
            let size = (*words_per_line as usize).max(1);
            words.chunks(size).map(|c| c.to_vec()).collect()
        }
        ChunkMode::Variable { min_words_per_line, max_words_per_line } => {
            chunk_variable(words, *min_words_per_line as usize, *max_words_per_line as usize, rng)
        }
    }
}

fn chunk_variable(words: &[TimedWord], min_w: usize, max_w: usize, rng: &mut StdRng) -> Vec<Vec<TimedWord>> {
    let min_w = min_w.max(1);
    let max_w = max_w.max(min_w);

    let mut lines = Vec::new();
    let mut i = 0;
    let mut prev_size: Option<usize> = None;

    while i < words.len() {
        let mut size = weighted_line_size(rng);
        if prev_size == Some(1) && size == 1 {
            size = 2;
        }
        size = size.clamp(min_w, max_w);
        let end = (i + size).min(words.len());
        lines.push(words[i..end].to_vec());
        prev_size = Some(end - i);
        i = end;
    }

    lines
}

fn weighted_line_size(rng: &mut StdRng) -> usize {
    let roll: f64 = rng.gen_range(0.0..1.0);
    if roll < 0.5 {
        3
    } else if roll < 0.9 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn words(n: usize) -> Vec<TimedWord> {
        (0..n)
            .map(|i| TimedWord { text: format!("w{i}"), start: i as f64, end: i as f64 + 0.5 })
            .collect()
    }

    #[test]
    fn test_fixed_chunking_groups_evenly() {
        let mut rng = StdRng::seed_from_u64(1);
        let lines = chunk(&words(7), &ChunkMode::Fixed { words_per_line: 3 }, &mut rng);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 3);
        assert_eq!(lines[2].len(), 1);
    }

    #[test]
    fn test_variable_chunking_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let lines = chunk(
            &words(30),
            &ChunkMode::Variable { min_words_per_line: 1, max_words_per_line: 3 },
            &mut rng,
        );
        for line in &lines {
            assert!(line.len() >= 1 && line.len() <= 3);
        }
    }

    #[test]
    fn test_variable_chunking_never_two_single_word_lines_in_a_row() {
        let mut rng = StdRng::seed_from_u64(7);
        let lines = chunk(
            &words(60),
            &ChunkMode::Variable { min_words_per_line: 1, max_words_per_line: 3 },
            &mut rng,
        );
        for pair in lines.windows(2) {
            assert!(!(pair[0].len() == 1 && pair[1].len() == 1));
        }
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let mode = ChunkMode::Variable { min_words_per_line: 1, max_words_per_line: 3 };
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let lines_a = chunk(&words(20), &mode, &mut rng_a);
        let lines_b = chunk(&words(20), &mode, &mut rng_b);
        let sizes_a: Vec<usize> = lines_a.iter().map(|l| l.len()).collect();
        let sizes_b: Vec<usize> = lines_b.iter().map(|l| l.len()).collect();
        assert_eq!(sizes_a, sizes_b);
    }
}
