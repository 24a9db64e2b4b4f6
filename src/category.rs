//! Keyword-table query classification.
//!
//! [`classify`] is a total, pure function from query text to [`Category`].
//! Each non-general category carries a fixed keyword list; the query is
//! lower-cased and scored by substring occurrence counts (a keyword may
//! match multiple times; no word-boundary awareness). The first category in
//! declared order to reach the maximum score wins, which keeps ties
//! deterministic. A zero maximum yields [`Category::General`].

use crate::types::Category;

const TECH_KEYWORDS: &[&str] = &[
    "software", "hardware", "computer", "internet", "technology", "tech", "app", "smartphone",
    "laptop", "gadget", "programming", "code", "developer", "startup", "cyber", "security",
    "hack", "data", "cloud", "server", "network", "robot", "algorithm", "digital", "electric",
    "battery", "chip", "semiconductor", "browser", "operating system",
];

const POLITICS_KEYWORDS: &[&str] = &[
    "president", "senator", "congress", "parliament", "election", "vote", "ballot", "campaign",
    "democrat", "republican", "policy", "legislation", "bill", "law", "government", "minister",
    "governor", "mayor", "senate", "house", "political", "politician", "diplomat", "treaty",
    "sanction", "immigration", "supreme court", "constitution", "referendum",
];

const HEALTH_KEYWORDS: &[&str] = &[
    "health", "medical", "medicine", "doctor", "hospital", "disease", "virus", "vaccine",
    "symptom", "treatment", "therapy", "drug", "pharmaceutical", "cancer", "diabetes", "heart",
    "mental", "diet", "nutrition", "exercise", "fitness", "wellness", "surgery", "patient",
    "infection", "epidemic", "pandemic", "immune", "clinical",
];

const SCIENCE_KEYWORDS: &[&str] = &[
    "science", "scientist", "research", "study", "experiment", "physics", "chemistry", "biology",
    "astronomy", "space", "nasa", "telescope", "planet", "galaxy", "climate", "evolution",
    "species", "genome", "dna", "quantum", "particle", "laboratory", "theory", "discovery",
    "fossil", "geology", "ecosystem", "molecule", "neuroscience",
];

const BUSINESS_KEYWORDS: &[&str] = &[
    "business", "company", "market", "stock", "economy", "economic", "finance", "financial",
    "investment", "investor", "revenue", "profit", "earnings", "merger", "acquisition", "ceo",
    "startup", "trade", "tariff", "inflation", "bank", "currency", "shares", "wall street",
    "industry", "manufacturer", "retail", "sales", "corporate",
];

/// Keyword table paired with the category it scores for, in tie-breaking
/// order. [`Category::General`] carries no keywords; it is the zero-score
/// fallback.
const KEYWORD_TABLES: &[(Category, &[&str])] = &[
    (Category::Tech, TECH_KEYWORDS),
    (Category::Politics, POLITICS_KEYWORDS),
    (Category::Health, HEALTH_KEYWORDS),
    (Category::Science, SCIENCE_KEYWORDS),
    (Category::Business, BUSINESS_KEYWORDS),
];

/// Classify a query into a [`Category`] by keyword occurrence scoring.
pub fn classify(query: &str) -> Category {
    let lowered = query.to_lowercase();

    let mut best = Category::General;
    let mut best_score = 0usize;

    for &(category, keywords) in KEYWORD_TABLES {
        let score: usize = keywords
            .iter()
            .map(|kw| lowered.matches(kw).count())
            .sum();
        // Strictly-greater keeps the first max in declared order.
        if score > best_score {
            best = category;
            best_score = score;
        }
    }

    best
}
