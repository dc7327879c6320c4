//! Indian state / union territory detection by whole-word keyword match.

use crate::models::Region;
use once_cell::sync::Lazy;
use regex::Regex;

/// Region keyword sets, checked in this order. Keywords are lowercase and
/// matched on word boundaries so "kota" does not fire inside "dakota".
pub static REGION_KEYWORDS: &[(Region, &[&str])] = &[
    (
        Region::AndhraPradesh,
        &[
            "andhra pradesh", "andhra", "ap state", "amaravati", "visakhapatnam",
            "vijayawada", "tirupati",
        ],
    ),
    (Region::ArunachalPradesh, &["arunachal pradesh", "arunachal", "itanagar"]),
    (Region::Assam, &["assam", "guwahati", "dispur"]),
    (Region::Bihar, &["bihar", "patna", "gaya", "bhagalpur"]),
    (Region::Chhattisgarh, &["chhattisgarh", "raipur", "bhilai"]),
    (Region::Delhi, &["delhi", "new delhi", "ncr"]),
    (Region::Goa, &["goa", "panaji", "margao"]),
    (
        Region::Gujarat,
        &["gujarat", "ahmedabad", "surat", "gandhinagar", "rajkot", "vadodara"],
    ),
    (Region::Haryana, &["haryana", "gurgaon", "gurugram", "faridabad", "rohtak"]),
    (
        Region::HimachalPradesh,
        &["himachal pradesh", "himachal", "shimla", "dharamshala", "manali"],
    ),
    (Region::Jharkhand, &["jharkhand", "ranchi", "jamshedpur", "dhanbad"]),
    (
        Region::Karnataka,
        &["karnataka", "bengaluru", "bangalore", "mysore", "mangalore", "hubli"],
    ),
    (
        Region::Kerala,
        &["kerala", "thiruvananthapuram", "kochi", "cochin", "calicut", "kozhikode"],
    ),
    (
        Region::MadhyaPradesh,
        &["madhya pradesh", "mp state", "bhopal", "indore", "gwalior", "jabalpur"],
    ),
    (
        Region::Maharashtra,
        &["maharashtra", "mumbai", "pune", "nagpur", "thane", "nashik", "aurangabad"],
    ),
    (Region::Manipur, &["manipur", "imphal"]),
    (Region::Meghalaya, &["meghalaya", "shillong"]),
    (Region::Mizoram, &["mizoram", "aizawl"]),
    (Region::Nagaland, &["nagaland", "kohima", "dimapur"]),
    (Region::Odisha, &["odisha", "orissa", "bhubaneswar", "cuttack", "puri"]),
    (Region::Punjab, &["punjab", "ludhiana", "amritsar", "jalandhar", "patiala"]),
    (
        Region::Rajasthan,
        &["rajasthan", "jaipur", "jodhpur", "udaipur", "kota", "ajmer"],
    ),
    (Region::Sikkim, &["sikkim", "gangtok"]),
    (
        Region::TamilNadu,
        &[
            "tamil nadu", "tn state", "chennai", "madras", "coimbatore", "madurai",
            "tiruchirappalli", "trichy",
        ],
    ),
    (Region::Telangana, &["telangana", "hyderabad", "warangal", "nizamabad"]),
    (Region::Tripura, &["tripura", "agartala"]),
    (
        Region::UttarPradesh,
        &[
            "uttar pradesh", "up state", "lucknow", "kanpur", "agra", "varanasi", "meerut",
            "allahabad", "prayagraj", "noida", "ghaziabad",
        ],
    ),
    (Region::Uttarakhand, &["uttarakhand", "dehradun", "haridwar", "rishikesh"]),
    (
        Region::WestBengal,
        &["west bengal", "bengal", "kolkata", "calcutta", "darjeeling", "siliguri"],
    ),
    (Region::AndamanNicobar, &["andaman", "nicobar", "port blair"]),
    (Region::Chandigarh, &["chandigarh"]),
    (
        Region::DadraNagarHaveliDamanDiu,
        &["dadra and nagar haveli", "daman and diu"],
    ),
    (
        Region::JammuKashmir,
        &["jammu and kashmir", "jammu", "kashmir", "srinagar", "j&k"],
    ),
    (Region::Ladakh, &["ladakh", "leh", "kargil"]),
    (Region::Lakshadweep, &["lakshadweep", "kavaratti"]),
    (Region::Puducherry, &["puducherry", "pondicherry", "pondy"]),
];

static REGION_PATTERNS: Lazy<Vec<(Region, Regex)>> = Lazy::new(|| {
    REGION_KEYWORDS
        .iter()
        .map(|(region, keywords)| {
            let alternation = keywords
                .iter()
                .map(|kw| regex::escape(kw))
                .collect::<Vec<_>>()
                .join("|");
            let re = Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("region regex");
            (*region, re)
        })
        .collect()
});

/// First region whose keywords occur as whole words in `text`.
pub fn detect_region(text: &str) -> Option<Region> {
    if text.trim().is_empty() {
        return None;
    }
    REGION_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(region, _)| *region)
}
