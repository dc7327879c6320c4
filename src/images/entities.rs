//! Curated entity table and proper-noun extraction for image lookup.

use once_cell::sync::Lazy;

/// Known proper-noun phrase (lowercase) → encyclopedia page title.
pub static ENTITY_MAP: &[(&str, &str)] = &[
    ("narendra modi", "Narendra_Modi"),
    ("pm modi", "Narendra_Modi"),
    ("droupadi murmu", "Droupadi_Murmu"),
    ("jagdeep dhankhar", "Jagdeep_Dhankhar"),
    ("amit shah", "Amit_Shah"),
    ("rajnath singh", "Rajnath_Singh"),
    ("nirmala sitharaman", "Nirmala_Sitharaman"),
    ("smriti irani", "Smriti_Irani"),
    ("jp nadda", "J._P._Nadda"),
    ("nitin gadkari", "Nitin_Gadkari"),
    ("s jaishankar", "S._Jaishankar"),
    ("jaishankar", "S._Jaishankar"),
    ("rahul gandhi", "Rahul_Gandhi"),
    ("sonia gandhi", "Sonia_Gandhi"),
    ("priyanka gandhi", "Priyanka_Gandhi_Vadra"),
    ("mallikarjun kharge", "Mallikarjun_Kharge"),
    ("arvind kejriwal", "Arvind_Kejriwal"),
    ("mamata banerjee", "Mamata_Banerjee"),
    ("yogi adityanath", "Yogi_Adityanath"),
    ("nitish kumar", "Nitish_Kumar"),
    ("sharad pawar", "Sharad_Pawar"),
    ("akhilesh yadav", "Akhilesh_Yadav"),
    ("uddhav thackeray", "Uddhav_Thackeray"),
    ("hemant soren", "Hemant_Soren"),
    ("naveen patnaik", "Naveen_Patnaik"),
    ("chandrababu naidu", "N._Chandrababu_Naidu"),
    ("mk stalin", "M._K._Stalin"),
    ("siddaramaiah", "Siddaramaiah"),
    ("mukesh ambani", "Mukesh_Ambani"),
    ("nita ambani", "Nita_Ambani"),
    ("gautam adani", "Gautam_Adani"),
    ("ratan tata", "Ratan_Tata"),
    ("azim premji", "Azim_Premji"),
    ("narayana murthy", "N._R._Narayana_Murthy"),
    ("kumar mangalam birla", "Kumar_Mangalam_Birla"),
    ("anand mahindra", "Anand_Mahindra"),
    ("reliance industries", "Reliance_Industries"),
    ("reliance jio", "Jio"),
    ("adani group", "Adani_Group"),
    ("tata consultancy", "Tata_Consultancy_Services"),
    ("tata motors", "Tata_Motors"),
    ("tata group", "Tata_Group"),
    ("tata punch ev", "Tata_Punch_(electric)"),
    ("tata punch", "Tata_Punch_(electric)"),
    ("tata nexon ev", "Tata_Nexon_EV"),
    ("tata nexon", "Tata_Nexon"),
    ("tata harrier", "Tata_Harrier"),
    ("tata safari", "Tata_Safari"),
    ("tata curvv", "Tata_Curvv"),
    ("tata altroz", "Tata_Altroz"),
    ("tata tiago ev", "Tata_Tiago_EV"),
    ("tata tiago", "Tata_Tiago"),
    ("tata tigor", "Tata_Tigor"),
    ("maruti suzuki", "Maruti_Suzuki"),
    ("maruti swift", "Suzuki_Swift"),
    ("maruti baleno", "Suzuki_Baleno"),
    ("maruti brezza", "Maruti_Brezza"),
    ("maruti alto", "Maruti_Alto"),
    ("maruti wagon r", "Maruti_Wagon_R"),
    ("maruti ertiga", "Maruti_Ertiga"),
    ("suzuki jimny", "Suzuki_Jimny"),
    ("mahindra xuv 3xo", "Mahindra_XUV300"),
    ("mahindra xuv700", "Mahindra_XUV700"),
    ("mahindra xuv400", "Mahindra_XUV400"),
    ("mahindra scorpio", "Mahindra_Scorpio"),
    ("mahindra thar", "Mahindra_Thar"),
    ("mahindra bolero", "Mahindra_Bolero"),
    ("mahindra be 6", "Mahindra_BE_6"),
    ("hyundai creta", "Hyundai_Creta"),
    ("hyundai i20", "Hyundai_i20"),
    ("hyundai verna", "Hyundai_Verna"),
    ("hyundai alcazar", "Hyundai_Alcazar"),
    ("kia seltos", "Kia_Seltos"),
    ("kia sonet", "Kia_Sonet"),
    ("kia carens", "Kia_Carens"),
    ("kia ev6", "Kia_EV6"),
    ("ford", "Ford_Motor_Company"),
    ("chevrolet", "Chevrolet"),
    ("volkswagen", "Volkswagen"),
    ("bmw", "BMW"),
    ("mercedes benz", "Mercedes-Benz"),
    ("mercedes-benz", "Mercedes-Benz"),
    ("audi", "Audi"),
    ("porsche", "Porsche"),
    ("toyota", "Toyota"),
    ("honda car", "Honda"),
    ("nissan", "Nissan"),
    ("renault", "Renault"),
    ("volvo car", "Volvo_Cars"),
    ("lamborghini", "Lamborghini"),
    ("ferrari", "Ferrari"),
    ("electric vehicle", "Electric_vehicle"),
    ("ev charging", "Charging_station"),
    ("charging station", "Charging_station"),
    ("electric scooter", "Electric_motorcycles_and_scooters"),
    ("ola electric", "Ola_Electric"),
    ("ather energy", "Ather_Energy"),
    ("tvs iqube", "TVS_Motor_Company"),
    ("bajaj chetak", "Bajaj_Auto"),
    ("infosys", "Infosys"),
    ("wipro", "Wipro"),
    ("hdfc bank", "HDFC_Bank"),
    ("icici bank", "ICICI_Bank"),
    ("state bank of india", "State_Bank_of_India"),
    ("sbi", "State_Bank_of_India"),
    ("bajaj", "Bajaj_Auto"),
    ("mahindra", "Mahindra_Group"),
    ("hero motocorp", "Hero_MotoCorp"),
    ("air india", "Air_India"),
    ("indigo airline", "IndiGo"),
    ("indigo", "IndiGo"),
    ("ola", "Ola_Cabs"),
    ("zomato", "Zomato"),
    ("swiggy", "Swiggy"),
    ("flipkart", "Flipkart"),
    ("paytm", "Paytm"),
    ("byju", "BYJU'S"),
    ("bombay stock exchange", "Bombay_Stock_Exchange"),
    ("national stock exchange", "National_Stock_Exchange_of_India"),
    ("reserve bank of india", "Reserve_Bank_of_India"),
    ("securities and exchange board", "Securities_and_Exchange_Board_of_India"),
    ("sensex", "BSE_SENSEX"),
    ("nifty 50", "NIFTY_50"),
    ("nifty", "NIFTY_50"),
    ("sebi", "Securities_and_Exchange_Board_of_India"),
    ("rbi", "Reserve_Bank_of_India"),
    ("bse", "Bombay_Stock_Exchange"),
    ("nse", "National_Stock_Exchange_of_India"),
    ("union budget", "Indian_government_budget"),
    ("budget 2026", "Indian_government_budget"),
    ("gst", "Goods_and_Services_Tax_(India)"),
    ("upi", "Unified_Payments_Interface"),
    ("ipo", "Initial_public_offering"),
    ("virat kohli", "Virat_Kohli"),
    ("rohit sharma", "Rohit_Sharma"),
    ("ms dhoni", "MS_Dhoni"),
    ("sachin tendulkar", "Sachin_Tendulkar"),
    ("pv sindhu", "P._V._Sindhu"),
    ("neeraj chopra", "Neeraj_Chopra"),
    ("hardik pandya", "Hardik_Pandya"),
    ("shubman gill", "Shubman_Gill"),
    ("jasprit bumrah", "Jasprit_Bumrah"),
    ("saina nehwal", "Saina_Nehwal"),
    ("mary kom", "Mary_Kom"),
    ("mirabai chanu", "Mirabai_Chanu"),
    ("indian cricket team", "India_national_cricket_team"),
    ("team india", "India_national_cricket_team"),
    ("ipl", "Indian_Premier_League"),
    ("bcci", "Board_of_Control_for_Cricket_in_India"),
    ("world cup cricket", "Cricket_World_Cup"),
    ("isro", "Indian_Space_Research_Organisation"),
    ("chandrayaan", "Chandrayaan_programme"),
    ("gaganyaan", "Gaganyaan"),
    ("mangalyaan", "Mars_Orbiter_Mission"),
    ("supreme court of india", "Supreme_Court_of_India"),
    ("parliament of india", "Parliament_of_India"),
    ("lok sabha", "Lok_Sabha"),
    ("rajya sabha", "Rajya_Sabha"),
    ("indian army", "Indian_Army"),
    ("indian air force", "Indian_Air_Force"),
    ("indian navy", "Indian_Navy"),
    ("aadhar", "Aadhaar"),
    ("aadhaar", "Aadhaar"),
    ("demonetisation", "Demonetisation_in_India"),
    ("demonetization", "Demonetisation_in_India"),
    ("donald trump", "Donald_Trump"),
    ("trump", "Donald_Trump"),
    ("joe biden", "Joe_Biden"),
    ("biden", "Joe_Biden"),
    ("kamala harris", "Kamala_Harris"),
    ("xi jinping", "Xi_Jinping"),
    ("vladimir putin", "Vladimir_Putin"),
    ("putin", "Vladimir_Putin"),
    ("volodymyr zelensky", "Volodymyr_Zelensky"),
    ("zelensky", "Volodymyr_Zelensky"),
    ("elon musk", "Elon_Musk"),
    ("musk", "Elon_Musk"),
    ("rishi sunak", "Rishi_Sunak"),
    ("keir starmer", "Keir_Starmer"),
    ("starmer", "Keir_Starmer"),
    ("emmanuel macron", "Emmanuel_Macron"),
    ("macron", "Emmanuel_Macron"),
    ("olaf scholz", "Olaf_Scholz"),
    ("angela merkel", "Angela_Merkel"),
    ("benjamin netanyahu", "Benjamin_Netanyahu"),
    ("netanyahu", "Benjamin_Netanyahu"),
    ("kim jong", "Kim_Jong-un"),
    ("justin trudeau", "Justin_Trudeau"),
    ("antonio guterres", "António_Guterres"),
    ("iran", "Iran"),
    ("ukraine", "Ukraine"),
    ("russia", "Russia"),
    ("israel", "Israel"),
    ("hamas", "Hamas"),
    ("gaza", "Gaza_Strip"),
    ("taiwan", "Taiwan"),
    ("pakistan", "Pakistan"),
    ("china", "China"),
    ("openai", "OpenAI"),
    ("chatgpt", "ChatGPT"),
    ("microsoft", "Microsoft"),
    ("google", "Google"),
    ("apple inc", "Apple_Inc."),
    ("amazon", "Amazon_(company)"),
    ("meta platforms", "Meta_Platforms"),
    ("tesla", "Tesla,_Inc."),
    ("nvidia", "Nvidia"),
    ("spacex", "SpaceX"),
    ("united nations", "United_Nations"),
    ("nato", "NATO"),
    ("world health organization", "World_Health_Organization"),
    ("imf", "International_Monetary_Fund"),
    ("world bank", "World_Bank"),
    ("g20", "G20"),
    ("g7", "G7"),
    ("brics", "BRICS"),
    ("ukraine war", "Russian_invasion_of_Ukraine"),
    ("russia ukraine", "Russian_invasion_of_Ukraine"),
    ("israel hamas", "Hamas–Israel_conflict"),
    ("earthquake", "Earthquake"),
    ("flood", "Flood"),
    ("cyclone", "Cyclone"),
    ("artificial intelligence", "Artificial_intelligence"),
    ("cryptocurrency", "Cryptocurrency"),
    ("bitcoin", "Bitcoin"),
];

/// Entity keys ordered longest-first so "tata punch ev" is tried before "tata punch".
static SORTED_KEYS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut keys = ENTITY_MAP.to_vec();
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    keys
});

/// Capitalised words that start headlines without naming anything.
const TITLE_SKIP_WORDS: &[&str] = &[
    "A", "After", "An", "Are", "Be", "Been", "Big", "Breaking", "From", "Get", "Had", "Has",
    "Have", "Here", "How", "India", "Indian", "Is", "Key", "Latest", "Live", "Major", "New",
    "News", "Over", "Read", "Report", "Said", "Says", "See", "That", "The", "These", "This",
    "Those", "Top", "Update", "Was", "Watch", "Were", "What", "When", "Where", "Who", "Why",
];

const MAX_CANDIDATES: usize = 5;

/// True when `needle` occurs in `haystack` with no letter or digit on either side.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Entity page titles whose keys occur in the article, most specific first.
///
/// Keys of one or two words only match the title; longer keys may also match
/// the description.
pub fn matching_entities(title: &str, description: &str) -> Vec<&'static str> {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    let mut pages: Vec<&'static str> = Vec::new();
    for &(key, page) in SORTED_KEYS.iter() {
        let matched = if key.split_whitespace().count() <= 2 {
            contains_phrase(&title, key)
        } else {
            contains_phrase(&title, key) || contains_phrase(&description, key)
        };
        if matched && !pages.contains(&page) {
            pages.push(page);
        }
    }
    pages
}

/// Runs of capitalised or all-caps tokens in a headline, longest run first.
///
/// "Narendra Modi meets Xi Jinping at G20" yields
/// `["Narendra Modi", "Xi Jinping", "G20"]`.
pub fn extract_proper_nouns(title: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for raw in title.split_whitespace() {
        let token: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if token.is_empty() {
            close_run(&mut current, &mut candidates);
            continue;
        }

        let starts_upper = token.chars().next().is_some_and(char::is_uppercase);
        if (starts_upper || is_acronym(&token)) && !TITLE_SKIP_WORDS.contains(&token.as_str()) {
            current.push(token);
        } else {
            close_run(&mut current, &mut candidates);
        }
    }
    close_run(&mut current, &mut candidates);

    let mut unique: Vec<String> = Vec::new();
    for candidate in candidates {
        if candidate.chars().count() > 1 && !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique.sort_by_key(|c| std::cmp::Reverse(c.split(' ').count()));
    unique.truncate(MAX_CANDIDATES);
    unique
}

fn close_run(current: &mut Vec<String>, candidates: &mut Vec<String>) {
    if !current.is_empty() {
        candidates.push(current.join(" "));
        current.clear();
    }
}

/// All cased characters uppercase, with at least one of them ("5G", "EV").
fn is_acronym(token: &str) -> bool {
    token.chars().count() > 1
        && token.chars().any(char::is_uppercase)
        && !token.chars().any(char::is_lowercase)
}
