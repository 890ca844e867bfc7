//! Text extraction
//!
//! Turns a free-text dining request into [`Constraints`] with ordered,
//! first-match-wins keyword and pattern rules. There is no language model
//! behind this: a field that no rule recognises is simply left unset.

use crate::core::trace::{Trace, TraceTag};
use crate::models::{Constraints, Weekday};
use regex::Regex;
use std::sync::LazyLock;

/// Cuisine keywords, checked in order
pub const DEFAULT_CUISINES: [&str; 7] = [
    "turkish", "italian", "chinese", "mexican", "indian", "french", "japanese",
];

/// Party size used when the word after "for" is not a number we know
pub const DEFAULT_PARTY_SIZE: u32 = 2;

static LOCATION_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"in\s+(downtown\s+\w+(?:\s+\w+)?)").unwrap(),
        Regex::new(r"at\s+(downtown\s+\w+(?:\s+\w+)?)").unwrap(),
    ]
});

static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"under\s+\$?(\d+)").unwrap());

static PARTY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"for\s+(\w+)\s+people?").unwrap());

static DAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(monday|tuesday|wednesday|thursday|friday|saturday|sunday)").unwrap()
});

static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"at\s+(\d{1,2}:\d{2}\s*(?:am|pm)?)").unwrap());

/// Constraints pulled from a query, with the trace of what was found
#[derive(Debug, Clone)]
pub struct Extraction {
    pub constraints: Constraints,
    pub trace: Trace,
}

/// Input handed to every rule
struct RuleInput<'a> {
    /// Lower-cased query
    text: &'a str,
    cuisines: &'a [String],
}

/// One field's extraction rule; returns the trace message when it fires
struct ExtractionRule {
    field: &'static str,
    apply: fn(&RuleInput<'_>, &mut Constraints) -> Option<String>,
}

/// Rules in evaluation order. Each is independent of the others.
const EXTRACTION_RULES: [ExtractionRule; 8] = [
    ExtractionRule { field: "cuisine", apply: extract_cuisine },
    ExtractionRule { field: "location", apply: extract_location },
    ExtractionRule { field: "price_max", apply: extract_price },
    ExtractionRule { field: "party_size", apply: extract_party_size },
    ExtractionRule { field: "day", apply: extract_day },
    ExtractionRule { field: "time", apply: extract_time },
    ExtractionRule { field: "window", apply: extract_window },
    ExtractionRule { field: "view", apply: extract_view },
];

/// Rule-based query parser
#[derive(Debug, Clone)]
pub struct TextExtractor {
    cuisines: Vec<String>,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::with_cuisines(DEFAULT_CUISINES)
    }

    /// Use a custom cuisine keyword list; earlier keywords win
    pub fn with_cuisines<I, S>(cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            cuisines: cuisines
                .into_iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn cuisines(&self) -> &[String] {
        &self.cuisines
    }

    pub fn extract(&self, query: &str) -> Extraction {
        let mut trace = Trace::new();
        trace.record(TraceTag::Nlp, format!("Parsing query: '{}'", query));

        let lowered = query.to_lowercase();
        let input = RuleInput {
            text: &lowered,
            cuisines: &self.cuisines,
        };

        let mut constraints = Constraints::default();
        for rule in &EXTRACTION_RULES {
            if let Some(message) = (rule.apply)(&input, &mut constraints) {
                tracing::trace!(field = rule.field, "extraction rule fired");
                trace.record(TraceTag::Nlp, message);
            }
        }

        Extraction { constraints, trace }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_cuisine(input: &RuleInput<'_>, constraints: &mut Constraints) -> Option<String> {
    let keyword = input.cuisines.iter().find(|c| input.text.contains(c.as_str()))?;
    let cuisine = capitalize(keyword);
    let message = format!("Extracted cuisine: {}", cuisine);
    constraints.cuisine = Some(cuisine);
    Some(message)
}

fn extract_location(input: &RuleInput<'_>, constraints: &mut Constraints) -> Option<String> {
    let location = LOCATION_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(input.text))
        .map(|caps| title_case(&caps[1]))?;
    let message = format!("Extracted location: {}", location);
    constraints.location = Some(location);
    Some(message)
}

fn extract_price(input: &RuleInput<'_>, constraints: &mut Constraints) -> Option<String> {
    let caps = PRICE_PATTERN.captures(input.text)?;
    let price: f64 = caps[1].parse().ok()?;
    if !price.is_finite() {
        return Some(format!("Ignored out-of-range price max: ${}", &caps[1]));
    }
    if price <= 0.0 {
        return Some(format!("Ignored non-positive price max: ${}", price));
    }
    constraints.price_max = Some(price);
    Some(format!("Extracted price max: ${}", price))
}

fn extract_party_size(input: &RuleInput<'_>, constraints: &mut Constraints) -> Option<String> {
    let caps = PARTY_PATTERN.captures(input.text)?;
    let token = &caps[1];
    let size = if token.chars().all(|c| c.is_ascii_digit()) {
        token.parse().unwrap_or(DEFAULT_PARTY_SIZE)
    } else {
        number_word(token).unwrap_or(DEFAULT_PARTY_SIZE)
    };
    if size == 0 {
        return Some("Ignored party size of zero".to_string());
    }
    constraints.party_size = Some(size);
    Some(format!("Extracted party size: {}", size))
}

fn extract_day(input: &RuleInput<'_>, constraints: &mut Constraints) -> Option<String> {
    let caps = DAY_PATTERN.captures(input.text)?;
    let day = Weekday::from_name(&caps[1])?;
    constraints.day = Some(day);
    Some(format!("Extracted day: {}", day))
}

fn extract_time(input: &RuleInput<'_>, constraints: &mut Constraints) -> Option<String> {
    let caps = TIME_PATTERN.captures(input.text)?;
    let time = caps[1].to_string();
    let message = format!("Extracted time: {}", time);
    constraints.time = Some(time);
    Some(message)
}

fn extract_window(input: &RuleInput<'_>, constraints: &mut Constraints) -> Option<String> {
    if !input.text.contains("window") {
        return None;
    }
    constraints.special_requests.push("window seating".to_string());
    Some("Extracted special request: window seating".to_string())
}

/// Garden and street views collapse into a single tag, garden first
fn extract_view(input: &RuleInput<'_>, constraints: &mut Constraints) -> Option<String> {
    let views: Vec<&str> = ["garden", "street"]
        .into_iter()
        .filter(|view| input.text.contains(view))
        .collect();
    if views.is_empty() {
        return None;
    }
    let joined = views.join(", ");
    constraints.special_requests.push(format!("view: {}", joined));
    Some(format!("Extracted view preference: {}", joined))
}

fn number_word(word: &str) -> Option<u32> {
    match word {
        "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        _ => None,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Upper-case the first letter of every alphabetic run
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
