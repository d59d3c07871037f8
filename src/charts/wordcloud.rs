//! Word Cloud Module
//! Word frequencies and a deterministic spiral layout shared by the static
//! renderer and the dashboard.

use std::collections::{HashMap, HashSet};

/// Shown instead of a cloud when there is no title text.
pub const NO_DATA_MESSAGE: &str = "No titles available for selected years.";

/// Smallest font size a word may be shrunk to before it is dropped.
const MIN_FONT_SIZE: f32 = 10.0;
/// Each failed placement retries at this fraction of the previous size.
const SHRINK_FACTOR: f32 = 0.8;
/// Estimated glyph advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f32 = 0.55;
const LINE_HEIGHT_RATIO: f32 = 1.15;
const PADDING: f32 = 2.0;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "however", "http", "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is",
    "isn't", "it", "its", "itself", "just", "k", "let's", "like", "me", "more", "most", "mustn't",
    "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own", "r", "same", "shall",
    "shan't", "she", "should", "shouldn't", "since", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "via", "was", "wasn't", "we", "were",
    "weren't", "what", "when", "where", "which", "while", "who", "whom", "why", "with", "won't",
    "would", "wouldn't", "www", "you", "your", "yours", "yourself", "yourselves",
];

/// Viridis samples, dark to light.
const PALETTE: [(u8, u8, u8); 8] = [
    (68, 1, 84),
    (70, 50, 126),
    (54, 92, 141),
    (39, 127, 142),
    (31, 161, 135),
    (74, 193, 109),
    (160, 218, 57),
    (223, 227, 24),
];

/// A word and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFrequency {
    pub text: String,
    pub count: usize,
}

/// A word positioned on the canvas. Coordinates are the top-left corner in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub color: (u8, u8, u8),
}

impl PlacedWord {
    fn overlaps(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.x < x + width + PADDING
            && x < self.x + self.width + PADDING
            && self.y < y + height + PADDING
            && y < self.y + self.height + PADDING
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WordCloud {
    /// The input text was empty or whitespace-only.
    NoData,
    Layout {
        width: u32,
        height: u32,
        words: Vec<PlacedWord>,
    },
}

impl WordCloud {
    pub fn is_empty(&self) -> bool {
        match self {
            WordCloud::NoData => true,
            WordCloud::Layout { words, .. } => words.is_empty(),
        }
    }
}

/// Builds word clouds for a fixed canvas size.
#[derive(Debug, Clone, Copy)]
pub struct WordCloudBuilder {
    width: u32,
    height: u32,
    max_words: usize,
}

impl WordCloudBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            max_words: 200,
        }
    }

    pub fn max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    /// Lay out the most frequent words of `text`, largest first.
    pub fn build(&self, text: &str) -> WordCloud {
        if text.trim().is_empty() {
            return WordCloud::NoData;
        }

        let frequencies = word_frequencies(text);
        let Some(max_count) = frequencies.first().map(|w| w.count as f32) else {
            return WordCloud::NoData;
        };
        let max_font = (self.height as f32 / 4.0).max(MIN_FONT_SIZE);

        let mut placed: Vec<PlacedWord> = Vec::new();
        for (rank, word) in frequencies.iter().take(self.max_words).enumerate() {
            let relative = word.count as f32 / max_count;
            let mut font_size = max_font * (0.5 * relative + 0.5);
            let color = PALETTE[(rank * 3) % PALETTE.len()];

            let position = loop {
                if let Some(found) = self.find_position(&word.text, font_size, color, &placed) {
                    break Some(found);
                }
                font_size *= SHRINK_FACTOR;
                if font_size < MIN_FONT_SIZE {
                    break None;
                }
            };

            // Words that do not fit even at the minimum size are dropped
            if let Some(found) = position {
                placed.push(found);
            }
        }

        if placed.is_empty() {
            return WordCloud::NoData;
        }
        WordCloud::Layout {
            width: self.width,
            height: self.height,
            words: placed,
        }
    }

    /// Walk an Archimedean spiral out from the centre until the word fits.
    fn find_position(
        &self,
        text: &str,
        font_size: f32,
        color: (u8, u8, u8),
        placed: &[PlacedWord],
    ) -> Option<PlacedWord> {
        let (width, height) = estimate_text_size(text, font_size);
        let canvas_w = self.width as f32;
        let canvas_h = self.height as f32;
        if width > canvas_w || height > canvas_h {
            return None;
        }

        let center_x = canvas_w / 2.0;
        let center_y = canvas_h / 2.0;
        let max_radius = (center_x * center_x + center_y * center_y).sqrt();

        let mut angle: f32 = 0.0;
        loop {
            let radius = 1.5 * angle;
            if radius > max_radius {
                return None;
            }

            let x = center_x + radius * angle.cos() - width / 2.0;
            let y = center_y + radius * angle.sin() - height / 2.0;
            let inside = x >= 0.0 && y >= 0.0 && x + width <= canvas_w && y + height <= canvas_h;
            if inside && !placed.iter().any(|other| other.overlaps(x, y, width, height)) {
                return Some(PlacedWord {
                    text: text.to_string(),
                    x,
                    y,
                    width,
                    height,
                    font_size,
                    color,
                });
            }
            angle += 0.15;
        }
    }
}

/// Approximate rendered width and height of `text` at `font_size`.
pub fn estimate_text_size(text: &str, font_size: f32) -> (f32, f32) {
    let chars = text.chars().count() as f32;
    (chars * font_size * CHAR_WIDTH_RATIO, font_size * LINE_HEIGHT_RATIO)
}

/// Count words in `text`, most frequent first.
///
/// Words are case-insensitive and shown in their most common casing. Stop
/// words, single characters and numbers are skipped, a trailing `'s` is
/// removed, and a plural is folded into its singular when both occur.
pub fn word_frequencies(text: &str) -> Vec<WordFrequency> {
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let mut counts: HashMap<String, HashMap<String, usize>> = HashMap::new();

    let tokens = text.split(|c: char| !(c.is_alphanumeric() || c == '\''));
    for token in tokens {
        let Some(word) = normalize_token(token) else {
            continue;
        };
        let key = word.to_lowercase();
        if stop_words.contains(key.as_str()) {
            continue;
        }
        *counts.entry(key).or_default().entry(word).or_default() += 1;
    }

    // Fold plurals into singulars
    let plurals: Vec<String> = counts
        .keys()
        .filter(|key| key.ends_with('s') && !key.ends_with("ss") && key.chars().count() > 3)
        .filter(|key| counts.contains_key(&key[..key.len() - 1]))
        .cloned()
        .collect();
    for plural in plurals {
        if let Some(casings) = counts.remove(&plural) {
            let singular = counts.entry(plural[..plural.len() - 1].to_string()).or_default();
            for (casing, count) in casings {
                let casing = casing[..casing.len() - 1].to_string();
                *singular.entry(casing).or_default() += count;
            }
        }
    }

    let mut frequencies: Vec<WordFrequency> = counts
        .into_values()
        .map(|casings| {
            let count = casings.values().sum();
            let text = casings
                .into_iter()
                .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
                .map(|(casing, _)| casing)
                .unwrap_or_default();
            WordFrequency { text, count }
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    frequencies
}

fn normalize_token(token: &str) -> Option<String> {
    let mut word = token.trim_matches('\'');
    if word.len() > 2 && (word.ends_with("'s") || word.ends_with("'S")) {
        word = &word[..word.len() - 2];
    }
    if word.chars().count() < 2 || word.chars().all(|c| c.is_numeric() || c == '\'') {
        return None;
    }
    Some(word.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_blank_text_is_no_data() {
        let builder = WordCloudBuilder::new(800, 400);
        assert_eq!(builder.build(""), WordCloud::NoData);
        assert_eq!(builder.build("  \n\t "), WordCloud::NoData);
        assert!(builder.build("").is_empty());
    }

    #[test]
    fn text_without_countable_words_is_no_data() {
        let builder = WordCloudBuilder::new(800, 400);
        assert_eq!(builder.build("The Of And"), WordCloud::NoData);
        assert_eq!(builder.build("the of and 2020 19"), WordCloud::NoData);
        assert!(builder.build("The of and 2020").is_empty());
    }

    #[test]
    fn frequencies_skip_stop_words_numbers_and_merge_case() {
        let frequencies = word_frequencies("The virus and the Virus; Virus of 2020 in a cell");
        assert_eq!(
            frequencies,
            vec![
                WordFrequency { text: "Virus".into(), count: 3 },
                WordFrequency { text: "cell".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn frequencies_fold_plurals_and_possessives() {
        let frequencies = word_frequencies("vaccine vaccines vaccine's trials trial");
        assert_eq!(
            frequencies,
            vec![
                WordFrequency { text: "vaccine".into(), count: 3 },
                WordFrequency { text: "trial".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn layout_stays_inside_canvas_without_overlap() {
        let text = "coronavirus covid pandemic vaccine respiratory infection \
                    coronavirus covid pandemic coronavirus transmission model \
                    clinical outcomes patients hospital severe acute syndrome";
        let cloud = WordCloudBuilder::new(800, 400).build(text);

        let WordCloud::Layout { width, height, words } = cloud else {
            panic!("expected a layout");
        };
        assert_eq!((width, height), (800, 400));
        assert!(!words.is_empty());
        assert_eq!(words[0].text, "coronavirus");
        for (i, word) in words.iter().enumerate() {
            assert!(word.x >= 0.0 && word.y >= 0.0);
            assert!(word.x + word.width <= 800.0 && word.y + word.height <= 400.0);
            for other in &words[i + 1..] {
                assert!(
                    !word.overlaps(other.x, other.y, other.width, other.height),
                    "{} overlaps {}",
                    word.text,
                    other.text
                );
            }
        }
    }

    #[test]
    fn layout_is_deterministic_and_respects_max_words() {
        let text = (0..50).map(|i| format!("word{i:02}x")).collect::<Vec<_>>().join(" ");
        let builder = WordCloudBuilder::new(800, 400).max_words(5);

        let first = builder.build(&text);
        assert_eq!(first, builder.build(&text));
        let WordCloud::Layout { words, .. } = first else {
            panic!("expected a layout");
        };
        assert!(words.len() <= 5);
    }
}
