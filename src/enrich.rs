//! Rule-based tags, credibility, sentiment and summary.
//!
//! All of it is pure and cheap: keyword tables and a handful of heuristics over
//! the stored title, description, source and URL. Nothing here touches the
//! network.

use crate::models::{Article, Category, Sentiment};
use crate::utils::slugify;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_TAGS: usize = 8;
const SUMMARY_WORDS: usize = 30;
const TITLE_SUMMARY_CHARS: usize = 150;

/// Tag groups: the tag is added when any keyword appears as a whole word.
const TAG_KEYWORDS: &[(&str, &[&str])] = &[
    ("budget", &["budget", "fiscal", "taxation", "finance minister", "revenue"]),
    ("modi", &["modi", "prime minister", "pm"]),
    ("government", &["government", "ministry", "policy", "scheme"]),
    ("election", &["election", "voting", "campaign", "bjp", "congress", "aap"]),
    ("economy", &["economy", "gdp", "growth", "inflation", "rbi"]),
    ("tax", &["tax", "gst", "income tax", "customs", "duty"]),
    ("rupee", &["rupee", "currency", "forex", "exchange rate"]),
    ("stock-market", &["nifty", "sensex", "stock", "market", "bse", "nse"]),
    ("banking", &["bank", "loan", "credit", "deposit", "interest rate"]),
    ("startup", &["startup", "unicorn", "venture", "entrepreneur"]),
    ("real-estate", &["property", "real estate", "housing", "realty"]),
    ("automobile", &["car", "vehicle", "automobile", "ev", "electric vehicle"]),
    ("tech", &["technology", "ai", "software", "digital", "internet"]),
    ("infrastructure", &["infrastructure", "road", "highway", "metro", "railway"]),
    ("airport", &["airport", "aviation", "airline", "flight"]),
    ("education", &["education", "school", "university", "student", "exam"]),
    ("healthcare", &["health", "hospital", "medical", "doctor", "treatment"]),
    ("employment", &["job", "employment", "unemployment", "salary", "wage"]),
    ("court", &["supreme court", "high court", "judge", "verdict", "bail"]),
    ("crime", &["crime", "police", "arrest", "murder", "theft"]),
    ("climate", &["climate", "environment", "pollution", "emission"]),
    ("disaster", &["flood", "earthquake", "cyclone", "disaster", "emergency"]),
    ("cricket", &["cricket", "bcci", "ipl", "test match", "odi"]),
    ("olympics", &["olympic", "medal", "athlete", "sports"]),
    ("bollywood", &["bollywood", "film", "movie", "actor", "actress"]),
];

const TRUSTED_SOURCES: &[&str] = &[
    "times of india",
    "the hindu",
    "indian express",
    "hindustan times",
    "reuters",
    "pti",
    "ani",
    "ndtv",
    "the wire",
    "scroll.in",
    "bbc",
    "cnn",
    "bloomberg",
    "mint",
    "business standard",
    "livemint",
    "moneycontrol",
    "economic times",
    "financial express",
];

const SUSPICIOUS_TLDS: &[&str] = &[".xyz", ".top", ".click", ".link"];

const POSITIVE_WORDS: &[&str] = &[
    "success", "win", "growth", "gain", "profit", "increase", "improve", "achieve",
    "milestone", "record", "best", "excellent", "breakthrough", "innovation", "advance",
    "surge", "boost", "rise", "soar",
];

const NEGATIVE_WORDS: &[&str] = &[
    "loss", "fail", "crash", "drop", "decline", "fall", "collapse", "crisis", "disaster",
    "worst", "violence", "death", "kill", "attack", "scam", "fraud", "corrupt", "accident",
    "fire", "shortage",
];

static TAG_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    TAG_KEYWORDS
        .iter()
        .map(|(tag, keywords)| {
            let alternation = keywords.iter().map(|k| regex::escape(k)).join("|");
            let re = Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("tag regex");
            (*tag, re)
        })
        .collect()
});

static SUSPICIOUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bshocking\b",
        r"\byou won't believe\b",
        r"\bmind[- ]?blowing\b",
        r"\b100%",
        r"\bguaranteed\b",
        r"\bmiracle\b",
        r"\bsecret\b",
        r"\bexclusive leak\b",
        r"\bunconfirmed\b",
        r"\brumou?r\b",
    ]
    .into_iter()
    .map(|p| Regex::new(&format!("(?i){p}")).expect("suspicious pattern"))
    .collect()
});

static REPEATED_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[!?]{2,}").expect("punctuation regex"));

/// Everything the enrichment pass derives for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub tags: Vec<String>,
    pub credibility_score: f32,
    pub sentiment: Sentiment,
    pub summary: String,
}

impl Enrichment {
    pub fn apply_to(self, article: &mut Article) {
        article.tags = self.tags;
        article.credibility_score = self.credibility_score;
        article.sentiment = Some(self.sentiment);
        article.summary = Some(self.summary);
    }
}

pub fn enrich(article: &Article) -> Enrichment {
    Enrichment {
        tags: tags(article),
        credibility_score: credibility(article),
        sentiment: sentiment(&article.title, &article.description),
        summary: summary(&article.title, &article.description),
    }
}

/// Keyword tags, then region and category, deduplicated and capped.
pub fn tags(article: &Article) -> Vec<String> {
    let text = article.classification_text();
    let keyword_tags = TAG_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(&text))
        .map(|(tag, _)| tag.to_string());
    let region_tag = article.region.map(|r| slugify(r.label()));
    // World is also where unclassified articles land, so it says nothing.
    let category_tag =
        (article.category != Category::World).then(|| article.category.code().to_lowercase());

    let tags: Vec<String> = keyword_tags
        .chain(region_tag)
        .chain(category_tag)
        .unique()
        .take(MAX_TAGS)
        .collect();
    if tags.is_empty() {
        vec!["general".to_string(), "news".to_string()]
    } else {
        tags
    }
}

/// Heuristic 0-100 credibility, rounded to one decimal.
pub fn credibility(article: &Article) -> f32 {
    let mut score = 50.0_f32;

    let source = article.source.to_lowercase();
    if TRUSTED_SOURCES.iter().any(|t| source.contains(t)) {
        score += 30.0;
    }

    let suspicious = SUSPICIOUS_PATTERNS
        .iter()
        .filter(|re| re.is_match(&article.title))
        .count();
    score -= 20.0 * suspicious.min(2) as f32;

    if article.description.chars().count() > 100 {
        score += 10.0;
    }
    if article.image_url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
        score += 5.0;
    }

    let title_chars = article.title.chars().count();
    let capitals = article.title.chars().filter(|c| c.is_uppercase()).count();
    if capitals as f32 > title_chars as f32 * 0.5 {
        score -= 15.0;
    }
    if REPEATED_PUNCTUATION.is_match(&article.title) {
        score -= 10.0;
    }

    if article.url.starts_with("https://") {
        score += 5.0;
    }
    if SUSPICIOUS_TLDS.iter().any(|tld| article.url.contains(tld)) {
        score -= 10.0;
    }

    (score.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Positive vs negative keyword counts; a lead of two decides.
///
/// A keyword counts when some word of the text starts with it, so "wins" and
/// "killed" are picked up.
pub fn sentiment(title: &str, description: &str) -> Sentiment {
    let text = format!("{title} {description}").to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let hits = |list: &[&str]| {
        list.iter()
            .filter(|kw| words.iter().any(|w| w.starts_with(*kw)))
            .count()
    };

    let positive = hits(POSITIVE_WORDS);
    let negative = hits(NEGATIVE_WORDS);
    if positive > negative + 1 {
        Sentiment::Positive
    } else if negative > positive + 1 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// First words of the description, or a title prefix when there is none.
pub fn summary(title: &str, description: &str) -> String {
    let words: Vec<&str> = description.split_whitespace().collect();
    if words.len() > SUMMARY_WORDS {
        format!("{}...", words[..SUMMARY_WORDS].join(" "))
    } else if !words.is_empty() {
        description.trim().to_string()
    } else {
        let prefix: String = title.chars().take(TITLE_SUMMARY_CHARS).collect();
        format!("{prefix}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleDraft, Category, Continent, Region};
    use chrono::Utc;

    fn article(title: &str, description: &str, source: &str, url: &str) -> Article {
        Article::from_draft(
            1,
            ArticleDraft {
                url: url.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                author: None,
                source: source.to_string(),
                feed: "in:test".to_string(),
                continent: Continent::Asia,
                published_at: Utc::now(),
                image_url: None,
                category: None,
                region: None,
                is_indian_news: true,
                translation: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_tags_use_whole_words_and_append_region_and_category() {
        let mut a = article(
            "Chennai metro phase two gets funding",
            "Rain delayed work, officials said",
            "The Hindu",
            "https://thehindu.com/x",
        );
        a.region = Some(Region::TamilNadu);
        a.category = Category::Business;
        // "rain" and "said" must not trigger the "ai" keyword.
        assert_eq!(tags(&a), vec!["infrastructure", "tamil-nadu", "business"]);
    }

    #[test]
    fn test_tags_fall_back_to_general_news() {
        let mut a = article("Quiet afternoon downtown", "", "x", "https://x");
        assert_eq!(a.category, Category::World);
        assert_eq!(tags(&a), vec!["general", "news"]);

        a.region = Some(Region::TamilNadu);
        assert_eq!(tags(&a), vec!["tamil-nadu"]);
    }

    #[test]
    fn test_tags_are_capped() {
        let a = article(
            "Budget, election, economy, tax, rupee, stock, bank, startup, car",
            "",
            "x",
            "https://x",
        );
        let t = tags(&a);
        assert_eq!(t.len(), MAX_TAGS);
        assert_eq!(t[0], "budget");
    }

    #[test]
    fn test_credibility_rewards_trusted_sources() {
        let mut a = article(
            "RBI holds repo rate steady",
            &"The central bank kept rates unchanged for the fourth meeting in a row. ".repeat(2),
            "Reuters",
            "https://reuters.com/markets/rbi",
        );
        a.image_url = Some("https://cdn.example/rbi.jpg".to_string());
        assert_eq!(credibility(&a), 100.0);
    }

    #[test]
    fn test_credibility_penalises_clickbait() {
        let a = article(
            "SHOCKING SECRET CURE REVEALED!!",
            "",
            "viral-daily",
            "http://viral.xyz/cure",
        );
        // 50 - 40 (two patterns) - 15 (caps) - 10 (punctuation) - 10 (tld)
        assert_eq!(credibility(&a), 0.0);
    }

    #[test]
    fn test_sentiment_needs_a_margin_of_two() {
        assert_eq!(
            sentiment("Sensex surge sets record as profits rise", ""),
            Sentiment::Positive
        );
        assert_eq!(
            sentiment("Factory fire kills three, shortage feared", ""),
            Sentiment::Negative
        );
        assert_eq!(sentiment("Team wins after early loss", ""), Sentiment::Neutral);
    }

    #[test]
    fn test_summary_prefers_description() {
        let long = (1..=40).map(|i| format!("w{i}")).join(" ");
        let s = summary("Title", &long);
        assert!(s.starts_with("w1 w2"));
        assert!(s.ends_with("w30..."));
        assert_eq!(summary("Title", " short text "), "short text");
        assert_eq!(summary("Title", ""), "Title...");
    }
}
