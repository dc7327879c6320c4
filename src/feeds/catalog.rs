//! Built-in feed catalog.
//!
//! Every source has a stable key that doubles as its entry in the run report:
//!
//! | Key | Feeds |
//! |---|---|
//! | `GL`, `AS`, `EU`, ... | Google News continent editions |
//! | `cat:<CATEGORY>` | Google News India topic feeds, category forced |
//! | `budget:<slug>` | Google News searches for Budget 2026 coverage |
//! | `in:<slug>` | National publisher feeds |
//! | `state:<CODE>:<slug>` | State and city publisher feeds |
//! | `lang:<slug>` | Indian-language publishers (exercise translation) |

use crate::models::{Category, Continent, Region};
use crate::utils::slugify;
use serde::{Deserialize, Serialize};

/// One configured feed and the defaults it applies to its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Report key; derived from `name` when left empty in a settings file.
    #[serde(default)]
    pub key: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub continent: Continent,
    /// Articles from this feed are regional-priority.
    #[serde(default)]
    pub indian: bool,
    /// Used when the classifier finds nothing.
    #[serde(default)]
    pub default_category: Option<Category>,
    /// Used regardless of what the classifier says.
    #[serde(default)]
    pub force_category: Option<Category>,
    /// Used when the region detector finds nothing.
    #[serde(default)]
    pub default_region: Option<Region>,
    /// Links are aggregator redirects rather than publisher URLs.
    #[serde(default)]
    pub aggregator: bool,
}

impl FeedSource {
    fn new(key: impl Into<String>, name: &str, url: &str) -> Self {
        Self {
            key: key.into(),
            name: name.to_string(),
            url: url.to_string(),
            continent: Continent::Asia,
            indian: true,
            default_category: None,
            force_category: None,
            default_region: None,
            aggregator: false,
        }
    }

    fn google(mut self) -> Self {
        self.aggregator = true;
        self
    }

    /// Fill in a missing key from the name.
    pub fn with_derived_key(mut self) -> Self {
        if self.key.trim().is_empty() {
            self.key = format!("custom:{}", slugify(&self.name));
        }
        self
    }

    /// `only` entries match a key exactly or, when ending in `:`, as a prefix.
    pub fn matches_filter(&self, only: &[String]) -> bool {
        only.is_empty()
            || only.iter().any(|f| {
                if f.ends_with(':') {
                    self.key.starts_with(f.as_str())
                } else {
                    self.key.eq_ignore_ascii_case(f)
                }
            })
    }
}

const CONTINENT_EDITIONS: &[(Continent, &str)] = &[
    (Continent::Global, "https://news.google.com/rss?hl=en-US&gl=US&ceid=US:en"),
    (Continent::Asia, "https://news.google.com/rss?hl=en-IN&gl=IN&ceid=IN:en"),
    (Continent::Europe, "https://news.google.com/rss?hl=en-GB&gl=GB&ceid=GB:en"),
    (Continent::NorthAmerica, "https://news.google.com/rss?hl=en-US&gl=US&ceid=US:en"),
    (Continent::SouthAmerica, "https://news.google.com/rss?hl=en-BR&gl=BR&ceid=BR:en"),
    (Continent::Africa, "https://news.google.com/rss?hl=en-ZA&gl=ZA&ceid=ZA:en"),
    (Continent::Oceania, "https://news.google.com/rss?hl=en-AU&gl=AU&ceid=AU:en"),
];

const INDIA_TOPICS: &[(Category, &str)] = &[
    (
        Category::Business,
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx6TVdZU0FtVnVHZ0pKVGlnQVAB?hl=en-IN&gl=IN&ceid=IN:en",
    ),
    (
        Category::Technology,
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGRqTVhZU0FtVnVHZ0pKVGlnQVAB?hl=en-IN&gl=IN&ceid=IN:en",
    ),
    (
        Category::Entertainment,
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNREpxYW5RU0FtVnVHZ0pKVGlnQVAB?hl=en-IN&gl=IN&ceid=IN:en",
    ),
    (
        Category::Sports,
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRFp1ZEdvU0FtVnVHZ0pKVGlnQVAB?hl=en-IN&gl=IN&ceid=IN:en",
    ),
    (
        Category::Science,
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRFp0Y1RjU0FtVnVHZ0pKVGlnQVAB?hl=en-IN&gl=IN&ceid=IN:en",
    ),
    (
        Category::Health,
        "https://news.google.com/rss/topics/CAAqIQgKIhtDQkFTRGdvSUwyMHZNR3QwTlRFU0FtVnVLQUFQAQ?hl=en-IN&gl=IN&ceid=IN:en",
    ),
];

const BUDGET_SEARCHES: &[(&str, &str)] = &[
    ("general", "Budget+2026+India"),
    ("income-tax", "Budget+2026+Income+Tax"),
    ("economy", "Budget+2026+Economy+India"),
    ("infrastructure", "Budget+2026+Infrastructure+India"),
    ("reforms", "Budget+2026+Reforms+India"),
    ("expectations", "Budget+2026+Expectations+India"),
    ("market", "Budget+2026+Stock+Market+India"),
    ("sectors", "Budget+2026+Sectoral+India"),
];

const NATIONAL_PUBLISHERS: &[(&str, &str, &str)] = &[
    (
        "google-local",
        "Google News India Local",
        "https://news.google.com/rss/topics/CAAqIQgKIhtDQkFTRGdvSUwyMHZNRGs0TVRZNU1CSUNhVzRvQUFQAQ?hl=en-IN&gl=IN&ceid=IN:en",
    ),
    ("the-hindu", "The Hindu", "https://www.thehindu.com/news/national/feeder/default.rss"),
    (
        "times-of-india",
        "Times of India",
        "https://timesofindia.indiatimes.com/rssfeedstopstories.cms",
    ),
    ("ndtv", "NDTV", "https://feeds.feedburner.com/ndtvnews-top-stories"),
    ("indian-express", "Indian Express", "https://indianexpress.com/section/india/feed/"),
    (
        "hindustan-times",
        "Hindustan Times",
        "https://www.hindustantimes.com/feeds/rss/india-news/rssfeed.xml",
    ),
];

const STATE_PUBLISHERS: &[(Region, &str, &str, &str)] = &[
    (
        Region::Kerala,
        "the-hindu-kerala",
        "The Hindu Kerala",
        "https://www.thehindu.com/news/national/kerala/feeder/default.rss",
    ),
    (
        Region::TamilNadu,
        "the-hindu-tamil-nadu",
        "The Hindu Tamil Nadu",
        "https://www.thehindu.com/news/national/tamil-nadu/feeder/default.rss",
    ),
    (
        Region::Karnataka,
        "the-hindu-karnataka",
        "The Hindu Karnataka",
        "https://www.thehindu.com/news/national/karnataka/feeder/default.rss",
    ),
    (
        Region::AndhraPradesh,
        "the-hindu-andhra-pradesh",
        "The Hindu Andhra Pradesh",
        "https://www.thehindu.com/news/national/andhra-pradesh/feeder/default.rss",
    ),
    (
        Region::Telangana,
        "the-hindu-telangana",
        "The Hindu Telangana",
        "https://www.thehindu.com/news/national/telangana/feeder/default.rss",
    ),
    (
        Region::Delhi,
        "the-hindu-delhi",
        "The Hindu Delhi",
        "https://www.thehindu.com/news/cities/Delhi/feeder/default.rss",
    ),
    (
        Region::Maharashtra,
        "ht-mumbai",
        "Hindustan Times Mumbai",
        "https://www.hindustantimes.com/feeds/rss/cities/mumbai-news/rssfeed.xml",
    ),
    (
        Region::WestBengal,
        "ht-kolkata",
        "Hindustan Times Kolkata",
        "https://www.hindustantimes.com/feeds/rss/cities/kolkata-news/rssfeed.xml",
    ),
    (
        Region::UttarPradesh,
        "ht-lucknow",
        "Hindustan Times Lucknow",
        "https://www.hindustantimes.com/feeds/rss/cities/lucknow-news/rssfeed.xml",
    ),
];

const LANGUAGE_PUBLISHERS: &[(&str, &str, &str)] = &[
    ("bbc-hindi", "BBC Hindi", "https://feeds.bbci.co.uk/hindi/rss.xml"),
    ("bbc-tamil", "BBC Tamil", "https://feeds.bbci.co.uk/tamil/rss.xml"),
    ("bbc-bengali", "BBC Bengali", "https://feeds.bbci.co.uk/bengali/rss.xml"),
];

/// The full built-in catalog, in fetch order.
pub fn builtin() -> Vec<FeedSource> {
    let mut feeds = Vec::new();

    for &(continent, url) in CONTINENT_EDITIONS {
        let mut feed = FeedSource::new(continent.code(), &format!("Google News {}", continent.label()), url)
            .google();
        feed.continent = continent;
        feed.indian = continent == Continent::Asia;
        feeds.push(feed);
    }

    for &(category, url) in INDIA_TOPICS {
        let mut feed = FeedSource::new(
            format!("cat:{}", category.code()),
            &format!("Google News India {}", category.label()),
            url,
        )
        .google();
        feed.force_category = Some(category);
        feeds.push(feed);
    }

    for &(slug, query) in BUDGET_SEARCHES {
        let url = format!("https://news.google.com/rss/search?q={query}&hl=en-IN&gl=IN&ceid=IN:en");
        let mut feed =
            FeedSource::new(format!("budget:{slug}"), &format!("Budget 2026: {slug}"), &url).google();
        feed.force_category = Some(Category::Budget);
        feeds.push(feed);
    }

    for &(slug, name, url) in NATIONAL_PUBLISHERS {
        let feed = FeedSource::new(format!("in:{slug}"), name, url);
        feeds.push(if slug.starts_with("google") { feed.google() } else { feed });
    }

    for &(region, slug, name, url) in STATE_PUBLISHERS {
        let mut feed = FeedSource::new(format!("state:{}:{slug}", region.code()), name, url);
        feed.default_region = Some(region);
        feeds.push(feed);
    }

    for &(slug, name, url) in LANGUAGE_PUBLISHERS {
        feeds.push(FeedSource::new(format!("lang:{slug}"), name, url));
    }

    feeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_keys_are_unique() {
        let feeds = builtin();
        let keys: HashSet<&str> = feeds.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys.len(), feeds.len());
    }

    #[test]
    fn test_continent_feeds_flag_asia_as_indian() {
        let feeds = builtin();
        let asia = feeds.iter().find(|f| f.key == "AS").unwrap();
        let europe = feeds.iter().find(|f| f.key == "EU").unwrap();
        assert!(asia.indian && asia.aggregator);
        assert!(!europe.indian);
        assert_eq!(europe.continent, Continent::Europe);
    }

    #[test]
    fn test_category_and_budget_feeds_force_category() {
        let feeds = builtin();
        let sports = feeds.iter().find(|f| f.key == "cat:SPORTS").unwrap();
        assert_eq!(sports.force_category, Some(Category::Sports));
        assert!(
            feeds
                .iter()
                .filter(|f| f.key.starts_with("budget:"))
                .all(|f| f.force_category == Some(Category::Budget))
        );
    }

    #[test]
    fn test_state_feeds_carry_region() {
        let feeds = builtin();
        let kerala = feeds
            .iter()
            .find(|f| f.key == "state:KL:the-hindu-kerala")
            .unwrap();
        assert_eq!(kerala.default_region, Some(Region::Kerala));
        assert!(!kerala.aggregator);
    }

    #[test]
    fn test_filter_exact_and_prefix() {
        let feeds = builtin();
        let only = vec!["cat:".to_string(), "in:ndtv".to_string()];
        let picked: Vec<&str> = feeds
            .iter()
            .filter(|f| f.matches_filter(&only))
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(picked.len(), INDIA_TOPICS.len() + 1);
        assert!(picked.contains(&"in:ndtv"));
        assert!(feeds.iter().all(|f| f.matches_filter(&[])));
    }

    #[test]
    fn test_derived_key() {
        let feed: FeedSource = serde_yaml::from_str(
            "name: Deccan Herald\nurl: https://www.deccanherald.com/rss\ndefault_region: KA\n",
        )
        .unwrap();
        let feed = feed.with_derived_key();
        assert_eq!(feed.key, "custom:deccan-herald");
        assert_eq!(feed.default_region, Some(Region::Karnataka));
        assert_eq!(feed.continent, Continent::Global);
    }
}
