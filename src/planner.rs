//! Source planning: which URLs to fetch for a query, and which query
//! variations to fall back to.
//!
//! Pure data plus string assembly — no I/O. The per-category tables are the
//! only thing that needs touching to add or retire a source site.

use crate::types::Category;

/// Maximum number of suffix variations returned per category.
const MAX_VARIATIONS: usize = 4;

/// General-purpose search engine templates, queried for every category.
const GENERAL_ENGINES: &[&str] = &[
    "https://www.google.com/search?q=",
    "https://duckduckgo.com/?t=h_&ia=web&q=",
];

const TECH_SOURCES: &[&str] = &[
    "https://arstechnica.com/search/?query=",
    "https://www.theverge.com/search?q=",
    "https://techcrunch.com/?s=",
    "https://www.wired.com/search/?q=",
    "https://hn.algolia.com/?q=",
];

const POLITICS_SOURCES: &[&str] = &[
    "https://www.politifact.com/search/?q=",
    "https://www.factcheck.org/search/?q=",
    "https://apnews.com/search?q=",
    "https://www.reuters.com/site-search/?query=",
    "https://www.congress.gov/search?q=",
];

const HEALTH_SOURCES: &[&str] = &[
    "https://www.ncbi.nlm.nih.gov/pmc/?term=",
    "https://www.mayoclinic.org/search/search-results?q=",
    "https://www.who.int/home/search?indexCatalogue=genericsearchindex1&searchQuery=",
    "https://www.cdc.gov/search/?query=",
    "https://www.webmd.com/search/search_results/default.aspx?query=",
];

const SCIENCE_SOURCES: &[&str] = &[
    "https://www.nature.com/search?q=",
    "https://www.sciencedaily.com/search/?keyword=",
    "https://www.scientificamerican.com/search/?q=",
    "https://www.newscientist.com/search/?q=",
    "https://arxiv.org/abs/list?searchtype=all&query=",
];

const BUSINESS_SOURCES: &[&str] = &[
    "https://www.reuters.com/site-search/?query=",
    "https://www.cnbc.com/search/?query=",
    "https://www.marketwatch.com/search?q=",
    "https://www.ft.com/search?q=",
    "https://finance.yahoo.com/lookup?s=",
];

const GENERAL_SOURCES: &[&str] = &[
    "https://en.wikipedia.org/w/index.php?search=",
    "https://www.britannica.com/search?query=",
    "https://news.google.com/search?q=",
    "https://www.bing.com/search?q=",
];

const TECH_SUFFIXES: &[&str] = &["review", "specs", "latest news", "explained"];
const POLITICS_SUFFIXES: &[&str] = &["fact check", "policy", "analysis", "timeline"];
const HEALTH_SUFFIXES: &[&str] = &["symptoms", "treatment", "study", "guidelines"];
const SCIENCE_SUFFIXES: &[&str] = &["study", "research", "evidence", "explained"];
const BUSINESS_SUFFIXES: &[&str] = &["earnings", "market analysis", "forecast", "report"];
const GENERAL_SUFFIXES: &[&str] = &["overview", "explained", "facts", "history"];

/// Strip quote characters that would corrupt URL templates or confuse
/// downstream search engines.
pub fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '`'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Percent-encode a sanitised query for embedding in a URL query string.
/// Spaces become `+`.
pub fn encode_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(sanitize_query(query).as_bytes()).collect()
}

/// Build the ordered primary source list for a query: the general engines
/// first, then the category-specific sites.
pub fn plan_sources(query: &str, category: Category) -> Vec<String> {
    let encoded = encode_query(query);
    GENERAL_ENGINES
        .iter()
        .chain(category_sources(category))
        .map(|template| format!("{template}{encoded}"))
        .collect()
}

/// Build the query-variation list: the original query first, then up to
/// [`MAX_VARIATIONS`] category-specific suffix variations.
pub fn plan_variations(query: &str, category: Category) -> Vec<String> {
    let base = sanitize_query(query);
    let mut variations = vec![base.clone()];
    for suffix in category_suffixes(category).iter().take(MAX_VARIATIONS) {
        variations.push(format!("{base} {suffix}"));
    }
    variations
}

/// Canonical encyclopedia page for the literal query term, used by the
/// topic-fallback tier.
pub fn plan_topic_page(query: &str) -> String {
    let slug: String = url::form_urlencoded::byte_serialize(
        sanitize_query(query).replace(' ', "_").as_bytes(),
    )
    .collect();
    format!("https://en.wikipedia.org/wiki/{slug}")
}

fn category_sources(category: Category) -> std::slice::Iter<'static, &'static str> {
    match category {
        Category::Tech => TECH_SOURCES.iter(),
        Category::Politics => POLITICS_SOURCES.iter(),
        Category::Health => HEALTH_SOURCES.iter(),
        Category::Science => SCIENCE_SOURCES.iter(),
        Category::Business => BUSINESS_SOURCES.iter(),
        Category::General => GENERAL_SOURCES.iter(),
    }
}

fn category_suffixes(category: Category) -> &'static [&'static str] {
    match category {
        Category::Tech => TECH_SUFFIXES,
        Category::Politics => POLITICS_SUFFIXES,
        Category::Health => HEALTH_SUFFIXES,
        Category::Science => SCIENCE_SUFFIXES,
        Category::Business => BUSINESS_SUFFIXES,
        Category::General => GENERAL_SUFFIXES,
    }
}
