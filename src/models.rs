//! Data models for ingested articles and the sources they come from.
//!
//! - [`Article`]: the persisted unit, keyed by its canonical URL
//! - [`ArticleDraft`]: what one feed entry contributes to an upsert
//! - [`SourceRecord`]: fetch bookkeeping for a configured feed
//! - Coded enums: [`Category`], [`Continent`], [`Region`], [`Sentiment`]
//!
//! Coded enums serialize as their short codes (`"BUDGET"`, `"AS"`, `"TN"`) so the
//! JSON snapshot stays readable and stable across releases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declare a fieldless enum whose variants carry a short code and a display label.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code.trim().to_ascii_uppercase().as_str() {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

coded_enum! {
    /// Taxonomy category assigned to an article.
    Category {
        World => ("WORLD", "World"),
        Business => ("BUSINESS", "Business"),
        Technology => ("TECHNOLOGY", "Technology"),
        Entertainment => ("ENTERTAINMENT", "Entertainment"),
        Sports => ("SPORTS", "Sports"),
        Science => ("SCIENCE", "Science"),
        Health => ("HEALTH", "Health"),
        Budget => ("BUDGET", "Budget 2026"),
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::World
    }
}

coded_enum! {
    /// Continent-level edition an article was pulled from.
    Continent {
        Africa => ("AF", "Africa"),
        Asia => ("AS", "Asia"),
        Europe => ("EU", "Europe"),
        NorthAmerica => ("NA", "North America"),
        SouthAmerica => ("SA", "South America"),
        Oceania => ("OC", "Oceania"),
        Global => ("GL", "Global"),
    }
}

impl Default for Continent {
    fn default() -> Self {
        Continent::Global
    }
}

coded_enum! {
    /// Indian state or union territory used for local-news tagging.
    Region {
        AndhraPradesh => ("AP", "Andhra Pradesh"),
        ArunachalPradesh => ("AR", "Arunachal Pradesh"),
        Assam => ("AS", "Assam"),
        Bihar => ("BR", "Bihar"),
        Chhattisgarh => ("CG", "Chhattisgarh"),
        Delhi => ("DL", "Delhi"),
        Goa => ("GA", "Goa"),
        Gujarat => ("GJ", "Gujarat"),
        Haryana => ("HR", "Haryana"),
        HimachalPradesh => ("HP", "Himachal Pradesh"),
        Jharkhand => ("JH", "Jharkhand"),
        Karnataka => ("KA", "Karnataka"),
        Kerala => ("KL", "Kerala"),
        MadhyaPradesh => ("MP", "Madhya Pradesh"),
        Maharashtra => ("MH", "Maharashtra"),
        Manipur => ("MN", "Manipur"),
        Meghalaya => ("ML", "Meghalaya"),
        Mizoram => ("MZ", "Mizoram"),
        Nagaland => ("NL", "Nagaland"),
        Odisha => ("OD", "Odisha"),
        Punjab => ("PB", "Punjab"),
        Rajasthan => ("RJ", "Rajasthan"),
        Sikkim => ("SK", "Sikkim"),
        TamilNadu => ("TN", "Tamil Nadu"),
        Telangana => ("TS", "Telangana"),
        Tripura => ("TR", "Tripura"),
        UttarPradesh => ("UP", "Uttar Pradesh"),
        Uttarakhand => ("UK", "Uttarakhand"),
        WestBengal => ("WB", "West Bengal"),
        AndamanNicobar => ("AN", "Andaman & Nicobar Islands"),
        Chandigarh => ("CH", "Chandigarh"),
        DadraNagarHaveliDamanDiu => ("DN", "Dadra & Nagar Haveli and Daman & Diu"),
        JammuKashmir => ("JK", "Jammu & Kashmir"),
        Ladakh => ("LA", "Ladakh"),
        Lakshadweep => ("LD", "Lakshadweep"),
        Puducherry => ("PY", "Puducherry"),
    }
}

/// Rule-based sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Placement metadata for the printed-edition layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page: u32,
    pub section: String,
    pub position: u32,
    pub size: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page: 1,
            section: "FRONT_PAGE".to_string(),
            position: 0,
            size: "MEDIUM".to_string(),
        }
    }
}

/// Pre-translation text kept alongside a translated article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationShadow {
    pub original_title: String,
    pub original_description: String,
    /// ISO 639-1 code of the detected source language.
    pub language: String,
}

/// A stored news article.
///
/// The `url` is the natural key: re-ingesting the same URL updates this record
/// in place, it never creates a second one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub url: String,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub author: Option<String>,
    /// Publisher name as reported by the feed.
    pub source: String,
    /// Key of the feed the article was last seen in.
    pub feed: String,
    pub continent: Continent,
    pub published_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub category: Category,
    pub region: Option<Region>,
    pub is_indian_news: bool,
    pub credibility_score: f32,
    pub sentiment: Option<Sentiment>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub original_title: Option<String>,
    pub original_description: Option<String>,
    pub original_content: Option<String>,
    pub original_language: Option<String>,
    pub is_translated: bool,
    #[serde(default)]
    pub layout: PageLayout,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Build a fresh record from the first successful ingestion of a URL.
    pub fn from_draft(id: u64, draft: ArticleDraft, now: DateTime<Utc>) -> Self {
        let mut article = Article {
            id,
            url: draft.url.clone(),
            title: String::new(),
            description: String::new(),
            content: None,
            author: None,
            source: String::new(),
            feed: String::new(),
            continent: Continent::default(),
            published_at: draft.published_at,
            image_url: None,
            category: Category::default(),
            region: None,
            is_indian_news: false,
            credibility_score: 0.0,
            sentiment: None,
            tags: Vec::new(),
            summary: None,
            original_title: None,
            original_description: None,
            original_content: None,
            original_language: None,
            is_translated: false,
            layout: PageLayout::default(),
            created_at: now,
            updated_at: now,
        };
        article.apply(draft, now);
        article
    }

    /// Overwrite the feed-derived fields with a newer draft.
    ///
    /// Classifications only overwrite when the draft carries one; enrichment
    /// fields (content, summary, tags, scores) are left alone.
    pub fn apply(&mut self, draft: ArticleDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.description = draft.description;
        if draft.author.is_some() {
            self.author = draft.author;
        }
        self.source = draft.source;
        self.feed = draft.feed;
        self.continent = draft.continent;
        self.published_at = draft.published_at;
        self.image_url = draft.image_url;
        self.is_indian_news = draft.is_indian_news;
        if let Some(category) = draft.category {
            self.category = category;
        }
        if draft.region.is_some() {
            self.region = draft.region;
        }
        match draft.translation {
            Some(shadow) => {
                self.original_title = Some(shadow.original_title);
                self.original_description =
                    Some(shadow.original_description).filter(|d| !d.is_empty());
                self.original_language = Some(shadow.language);
                self.is_translated = true;
            }
            // The headline was just overwritten with untranslated text.
            None if self.is_translated => {
                self.original_title = None;
                self.original_description = None;
                self.is_translated = false;
                // A translated body still needs its source language.
                if self.original_content.is_none() {
                    self.original_language = None;
                }
            }
            None => {}
        }
        self.updated_at = now;
    }

    /// Title and description joined the way the keyword tables expect.
    pub fn classification_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Everything one feed entry contributes to an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDraft {
    pub url: String,
    pub title: String,
    pub description: String,
    pub author: Option<String>,
    pub source: String,
    pub feed: String,
    pub continent: Continent,
    pub published_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub category: Option<Category>,
    pub region: Option<Region>,
    pub is_indian_news: bool,
    pub translation: Option<TranslationShadow>,
}

/// Outcome of an upsert.
#[derive(Debug, Clone)]
pub struct Upserted {
    pub article: Article,
    pub created: bool,
}

/// Fetch bookkeeping for one configured feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub key: String,
    pub name: String,
    pub url: String,
    pub continent: Continent,
    pub is_active: bool,
    pub last_fetched: Option<DateTime<Utc>>,
    pub fetch_count: u64,
    pub error_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(url: &str, title: &str) -> ArticleDraft {
        ArticleDraft {
            url: url.to_string(),
            title: title.to_string(),
            description: "desc".to_string(),
            author: None,
            source: "The Hindu".to_string(),
            feed: "in:the-hindu".to_string(),
            continent: Continent::Asia,
            published_at: Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap(),
            image_url: Some("https://img.example/a.jpg".to_string()),
            category: None,
            region: None,
            is_indian_news: true,
            translation: None,
        }
    }

    #[test]
    fn test_coded_enum_round_trip_through_code() {
        for region in Region::ALL {
            assert_eq!(Region::from_code(region.code()), Some(*region));
        }
        assert_eq!(Category::from_code("budget"), Some(Category::Budget));
        assert_eq!(Continent::from_code("xx"), None);
    }

    #[test]
    fn test_coded_enum_serializes_as_code() {
        let json = serde_json::to_string(&Region::TamilNadu).unwrap();
        assert_eq!(json, "\"TN\"");
        let back: Category = serde_json::from_str("\"SPORTS\"").unwrap();
        assert_eq!(back, Category::Sports);
    }

    #[test]
    fn test_from_draft_defaults_to_world_category() {
        let now = Utc::now();
        let article = Article::from_draft(1, draft("https://a", "Title"), now);
        assert_eq!(article.category, Category::World);
        assert!(!article.is_translated);
        assert_eq!(article.created_at, now);
    }

    #[test]
    fn test_apply_keeps_existing_classification_when_draft_has_none() {
        let now = Utc::now();
        let mut first = draft("https://a", "Title");
        first.category = Some(Category::Sports);
        first.region = Some(Region::Kerala);
        let mut article = Article::from_draft(1, first, now);
        article.summary = Some("kept".to_string());

        article.apply(draft("https://a", "Updated title"), now);

        assert_eq!(article.title, "Updated title");
        assert_eq!(article.category, Category::Sports);
        assert_eq!(article.region, Some(Region::Kerala));
        assert_eq!(article.summary.as_deref(), Some("kept"));
    }

    #[test]
    fn test_apply_records_translation_shadow() {
        let now = Utc::now();
        let mut d = draft("https://a", "Rain alert in Chennai");
        d.translation = Some(TranslationShadow {
            original_title: "சென்னையில் மழை எச்சரிக்கை".to_string(),
            original_description: String::new(),
            language: "ta".to_string(),
        });
        let article = Article::from_draft(7, d, now);
        assert!(article.is_translated);
        assert_eq!(article.original_language.as_deref(), Some("ta"));
        assert_eq!(article.original_description, None);
    }

    #[test]
    fn test_untranslated_update_clears_stale_shadow() {
        let now = Utc::now();
        let mut d = draft("https://a", "Rain alert in Chennai");
        d.translation = Some(TranslationShadow {
            original_title: "சென்னையில் மழை எச்சரிக்கை".to_string(),
            original_description: String::new(),
            language: "ta".to_string(),
        });
        let mut article = Article::from_draft(7, d, now);

        article.apply(draft("https://a", "சென்னையில் கனமழை"), now);

        assert!(!article.is_translated);
        assert_eq!(article.original_title, None);
        assert_eq!(article.original_language, None);
        assert_eq!(article.title, "சென்னையில் கனமழை");
    }

    #[test]
    fn test_untranslated_update_keeps_language_of_translated_body() {
        let now = Utc::now();
        let mut d = draft("https://a", "Rain alert in Chennai");
        d.translation = Some(TranslationShadow {
            original_title: "சென்னையில் மழை எச்சரிக்கை".to_string(),
            original_description: String::new(),
            language: "ta".to_string(),
        });
        let mut article = Article::from_draft(7, d, now);
        article.content = Some("Heavy rain is expected across the city.".to_string());
        article.original_content = Some("நகரம் முழுவதும் கனமழை".to_string());

        article.apply(draft("https://a", "சென்னையில் கனமழை"), now);

        assert!(!article.is_translated);
        assert_eq!(article.original_language.as_deref(), Some("ta"));
        assert!(article.original_content.is_some());
    }
}
