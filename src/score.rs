/// Inputs the quality heuristic looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputs {
    pub word_count: usize,
    pub has_title: bool,
    pub has_meta_description: bool,
    pub heading_count: usize,
}

const SUBSTANTIAL_WORDS: usize = 200;
const LONG_WORDS: usize = 500;
const HEADING_THRESHOLD: usize = 3;

/// Step/bonus score in `[0.0, 1.0]`, rounded to two decimals.
pub fn quality_score(inputs: &ScoreInputs) -> f64 {
    let mut score = match inputs.word_count {
        n if n < SUBSTANTIAL_WORDS => 0.0,
        n if n < LONG_WORDS => 0.7,
        _ => 0.8,
    };

    if inputs.has_title && inputs.has_meta_description && inputs.word_count >= SUBSTANTIAL_WORDS {
        score = f64::min(score + 0.1, 1.0);
    }
    if inputs.heading_count >= HEADING_THRESHOLD {
        score = f64::min(score + 0.05, 1.0);
    }

    (score * 100.0).round() / 100.0
}
