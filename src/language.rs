//! Script-based language detection.
//!
//! Every character is bucketed into a Unicode block. Text with no characters in
//! a known non-Latin block is English. Otherwise the most frequent script wins,
//! but only when it makes up at least [`SCRIPT_THRESHOLD`] of all characters, so
//! a quoted name or a stray symbol does not flip an English headline.

/// Minimum share of all characters a script needs before the text is attributed to it.
pub const SCRIPT_THRESHOLD: f64 = 0.15;

/// Texts shorter than this (in characters) are not classified.
const MIN_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Unknown,
    English,
    Hindi,
    Bengali,
    Punjabi,
    Gujarati,
    Odia,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Thai,
    Arabic,
    Chinese,
    Japanese,
    Korean,
}

impl Language {
    /// ISO 639-1 code, or `"unknown"`.
    pub fn code(self) -> &'static str {
        match self {
            Language::Unknown => "unknown",
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Bengali => "bn",
            Language::Punjabi => "pa",
            Language::Gujarati => "gu",
            Language::Odia => "or",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Thai => "th",
            Language::Arabic => "ar",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Korean => "ko",
        }
    }

    /// True for a detected language other than English.
    pub fn is_non_english(self) -> bool {
        !matches!(self, Language::English | Language::Unknown)
    }
}

/// Script blocks in tie-break order.
const SCRIPTS: [(Language, char, char); 14] = [
    (Language::Hindi, '\u{0900}', '\u{097F}'),
    (Language::Bengali, '\u{0980}', '\u{09FF}'),
    (Language::Punjabi, '\u{0A00}', '\u{0A7F}'),
    (Language::Gujarati, '\u{0A80}', '\u{0AFF}'),
    (Language::Odia, '\u{0B00}', '\u{0B7F}'),
    (Language::Tamil, '\u{0B80}', '\u{0BFF}'),
    (Language::Telugu, '\u{0C00}', '\u{0C7F}'),
    (Language::Kannada, '\u{0C80}', '\u{0CFF}'),
    (Language::Malayalam, '\u{0D00}', '\u{0D7F}'),
    (Language::Thai, '\u{0E00}', '\u{0E7F}'),
    (Language::Arabic, '\u{0600}', '\u{06FF}'),
    (Language::Chinese, '\u{4E00}', '\u{9FFF}'),
    (Language::Japanese, '\u{3040}', '\u{30FF}'),
    (Language::Korean, '\u{AC00}', '\u{D7AF}'),
];

/// Classify `text` by the Unicode script of its characters.
///
/// # Returns
///
/// [`Language::Unknown`] for blank or very short input, [`Language::English`]
/// when no known script reaches the threshold, otherwise the dominant script.
pub fn detect(text: &str) -> Language {
    let text = text.trim();
    let total = text.chars().count();
    if total < MIN_CHARS {
        return Language::Unknown;
    }

    let mut counts = [0usize; SCRIPTS.len()];
    for ch in text.chars() {
        if (ch as u32) < 0x0600 {
            continue;
        }
        if let Some(idx) = SCRIPTS
            .iter()
            .position(|&(_, lo, hi)| (lo..=hi).contains(&ch))
        {
            counts[idx] += 1;
        }
    }

    // First maximum in table order wins ties.
    let mut best: Option<(usize, usize)> = None;
    for (idx, &n) in counts.iter().enumerate() {
        if n > 0 && best.is_none_or(|(_, b)| n > b) {
            best = Some((idx, n));
        }
    }

    match best {
        Some((idx, n)) if n as f64 / total as f64 >= SCRIPT_THRESHOLD => SCRIPTS[idx].0,
        _ => Language::English,
    }
}
