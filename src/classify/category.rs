//! Keyword-table category classifier.
//!
//! The table is ordered and the first category with any matching keyword wins.
//! BUDGET sits ahead of BUSINESS so budget coverage is not swallowed by the
//! broader market vocabulary, and WORLD is last because its geopolitical
//! terms are the loosest.

use crate::models::Category;

/// Ordered (category, keywords) pairs. Keywords are lowercase.
pub static CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Budget,
        &[
            "union budget", "budget 2026", "budget session", "budget speech",
            "finance minister budget", "tax slab", "income tax slab", "customs duty",
            "railway budget", "fiscal deficit target", "budget allocation",
            "budget estimate", "interim budget",
        ],
    ),
    (
        Category::Sports,
        &[
            "cricket", "ipl", "bcci", "test match", "odi", "t20", "world cup cricket",
            "football", "fifa", "premier league", "la liga", "bundesliga",
            "champions league", "euro 2024", "tennis", "wimbledon", "us open tennis",
            "french open", "australian open", "badminton", "pbl", "golf", "formula 1",
            "f1 race", "olympics", "paralympics", "commonwealth games", "asian games",
            "nba", "nfl", "hockey", "kabaddi", "pro kabaddi", "wrestling", "boxing", "mma",
            "ufc", "athletics", "marathon", "chess", "squash", "archery", "shooting sport",
            "weightlifting", "swimmer", "swimming", "cyclist", "cycling sport",
            "virat kohli", "rohit sharma", "ms dhoni", "sachin tendulkar",
            "smriti mandhana", "neeraj chopra", "pv sindhu", "saina nehwal", "lionel messi",
            "cristiano ronaldo", "rafael nadal", "novak djokovic", "serena williams",
            "lebron james", "real madrid", "barcelona fc", "manchester united",
            "liverpool fc", "chelsea fc", "arsenal fc", "scored", "century", "hat trick",
            "wicket", "innings", "tournament", "championship", "league table", "standings",
            "transfer window", "transfer fee", "match result", "final score",
        ],
    ),
    (
        Category::Health,
        &[
            "covid", "coronavirus", "omicron", "vaccine", "vaccination", "booster dose",
            "herd immunity", "pandemic", "epidemic", "outbreak", "mpox", "monkeypox",
            "dengue", "malaria", "typhoid", "tuberculosis", "hiv", "aids",
            "cancer treatment", "tumor", "chemotherapy", "radiation therapy", "surgery",
            "hospital", "icu", "ventilator", "doctor", "physician", "nurse", "aiims",
            "health ministry", "who health", "cdc", "drug approval", "fda",
            "clinical trial", "medicine", "antibiotic", "pharmaceutical", "mental health",
            "depression", "anxiety disorder", "schizophrenia", "diabetes", "insulin",
            "blood pressure", "hypertension", "heart disease", "cardiac arrest", "stroke",
            "kidney disease", "nutrition", "obesity", "diet plan", "fitness", "wellness",
            "yoga health", "ayurveda", "homeopathy", "physiotherapy",
        ],
    ),
    (
        Category::Technology,
        &[
            "artificial intelligence", "machine learning", "deep learning", "chatgpt",
            "openai", "gemini ai", "claude ai", "llm", "generative ai", "neural network",
            "large language model", "smartphone", "iphone", "android phone", "pixel phone",
            "samsung galaxy", "oneplus", "realme", "vivo phone", "oppo", "microchip",
            "semiconductor", "processor", "gpu", "nvidia chip", "intel chip", "amd chip",
            "quantum computing", "supercomputer", "cybersecurity", "data breach",
            "ransomware", "malware", "hacker", "cloud computing", "aws", "azure cloud",
            "google cloud", "software update", "app launch", "app store", "google play",
            "social media", "twitter", "facebook", "instagram", "youtube", "tiktok",
            "linkedin", "whatsapp update", "telegram update", "electric vehicle",
            "ev battery", "autonomous vehicle", "drone", "robotics", "automation tech",
            "5g network", "6g", "internet of things", "iot", "blockchain", "cryptocurrency",
            "bitcoin", "ethereum", "nft", "web3", "metaverse", "startup funding",
            "unicorn startup", "tech ipo", "series a", "silicon valley", "silicon",
            "tech layoff", "microsoft layoff", "google layoff", "meta layoff",
            "amazon layoff",
        ],
    ),
    (
        Category::Science,
        &[
            "isro", "chandrayaan", "gaganyaan", "aditya-l1", "mangalyaan", "nasa", "spacex",
            "space launch", "rocket launch", "satellite", "black hole",
            "james webb telescope", "hubble", "exoplanet", "solar storm", "solar flare",
            "aurora borealis", "eclipse", "climate change", "global warming",
            "carbon emission", "renewable energy", "solar energy", "wind energy",
            "nuclear energy", "research paper", "scientific study", "peer review",
            "archaeology", "fossil", "dinosaur", "ancient civilization", "dna research",
            "genome", "crispr", "stem cell", "particle physics", "cern", "higgs boson",
            "quantum", "physics", "chemistry discovery", "periodic table",
            "biology research", "biodiversity", "endangered species",
            "wildlife conservation", "earthquake research", "volcano", "geology",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "bollywood", "hollywood", "tollywood", "kollywood", "mollywood", "box office",
            "film release", "movie review", "ott release", "netflix", "amazon prime video",
            "disney+ hotstar", "jiocinema", "sony liv", "zee5", "web series", "tv show",
            "reality show", "bigg boss", "kbc", "dance india dance", "oscar", "grammy",
            "bafta", "cannes", "filmfare", "iifa", "national film award", "golden globe",
            "actor", "actress", "director film", "producer film", "celebrity", "star kid",
            "music album", "song release", "music video", "concert tour",
            "live performance", "shahrukh khan", "salman khan", "aamir khan",
            "amitabh bachchan", "deepika padukone", "priyanka chopra", "alia bhatt",
            "ranveer singh", "taylor swift", "beyonce", "drake", "ed sheeran", "coldplay",
            "fashion week", "met gala", "red carpet", "book release", "literature award",
            "booker prize",
        ],
    ),
    (
        Category::Business,
        &[
            "sensex", "nifty", "bse", "nse", "stock market", "share price", "ipo listing",
            "market cap", "bull run", "bear market", "rbi rate", "repo rate",
            "monetary policy", "gdp growth", "inflation rate", "cpi", "wpi",
            "trade deficit", "current account", "forex reserve", "rupee dollar",
            "currency exchange", "fdi", "fii", "merger acquisition", "takeover", "demerger",
            "quarterly result", "earnings report", "revenue profit", "net profit", "ebitda",
            "annual report", "startup valuation", "venture capital", "private equity",
            "gst collection", "direct tax", "customs", "excise duty", "sebi", "nclt",
            "insolvency", "bankruptcy", "reliance earnings", "tcs result", "infosys result",
            "real estate", "housing market", "property prices", "oil price", "crude oil",
            "fuel price", "petrol diesel", "gold price", "silver price", "commodity market",
            "agriculture market", "msp", "wholesale price", "export import", "trade war",
            "tariff", "wto",
        ],
    ),
    (
        Category::World,
        &[
            "war", "conflict zone", "ceasefire", "peace deal", "diplomatic crisis",
            "sanctions", "geopolitics", "united nations", "security council", "nato",
            "eu summit", "g20 summit", "g7 summit", "brics summit", "sco",
            "president election", "prime minister", "general election", "coup",
            "revolution", "protest rally", "civil unrest", "refugee", "migration crisis",
            "border dispute", "nuclear weapon", "missile strike", "airstrike",
            "ukraine russia", "russia ukraine", "israel gaza", "hamas", "hezbollah", "isis",
            "taliban", "al-qaeda", "climate summit", "cop30", "paris agreement",
            "world bank", "imf", "who", "wto negotiation",
        ],
    ),
];

/// Classify by case-insensitive substring match over `title + " " + description`.
///
/// Returns `None` when no keyword matches; the caller applies its own fallback.
pub fn classify(title: &str, description: &str) -> Option<Category> {
    let text = format!("{title} {description}").to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(category, _)| *category)
}
