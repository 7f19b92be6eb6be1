//! English pluralization for JSON-API types and link paths
//!
//! Rules are checked in order and the first match wins. A rule without a
//! replacement marks a word that is already plural.

use regex::Regex;
use std::sync::OnceLock;

/// Words with no distinct plural form
const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "moose",
    "deer",
    "news",
    "metadata",
    "feedback",
    "staff",
    "police",
];

const PLURAL_RULES: &[(&str, Option<&str>)] = &[
    // Already plural
    ("(m)en$", None),
    ("(pe)ople$", None),
    ("(child)ren$", None),
    ("([ti])a$", None),
    ("((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)ses$", None),
    ("(hive)s$", None),
    ("(tive)s$", None),
    ("(curve)s$", None),
    ("([lr])ves$", None),
    ("([^fo])ves$", None),
    ("([^aeiouy]|qu)ies$", None),
    ("(x|ch|ss|sh)es$", None),
    ("([ml])ice$", None),
    ("(bus)es$", None),
    ("(o)es$", None),
    ("(shoe)s$", None),
    ("(cris|ax|test)es$", None),
    ("(octop|vir)i$", None),
    ("(alias|canvas|status|campus)es$", None),
    ("^(ox)en$", None),
    ("(matr)ices$", None),
    ("^feet$", None),
    ("^teeth$", None),
    ("^geese$", None),
    ("(quiz)zes$", None),
    // Singular to plural
    ("^(m)an$", Some("${1}en")),
    ("^(wom)an$", Some("${1}en")),
    ("(pe)rson$", Some("${1}ople")),
    ("(child)$", Some("${1}ren")),
    ("^(ox)$", Some("${1}en")),
    ("(ax|test)is$", Some("${1}es")),
    ("(octop|vir)us$", Some("${1}i")),
    ("(alias|status|canvas|campus)$", Some("${1}es")),
    ("(bu)s$", Some("${1}ses")),
    ("(buffal|tomat|potat)o$", Some("${1}oes")),
    ("([ti])um$", Some("${1}a")),
    ("sis$", Some("ses")),
    ("(?:([^f])fe|([lr])f)$", Some("${1}${2}ves")),
    ("(hive)$", Some("${1}s")),
    ("([^aeiouy]|qu)y$", Some("${1}ies")),
    ("(matr|vert|ind)(?:ix|ex)$", Some("${1}ices")),
    ("(x|ch|ss|sh)$", Some("${1}es")),
    ("([ml])ouse$", Some("${1}ice")),
    ("^foot$", Some("feet")),
    ("^tooth$", Some("teeth")),
    ("^goose$", Some("geese")),
    ("(quiz)$", Some("${1}zes")),
    ("s$", None),
];

static RULES: OnceLock<Vec<(Regex, Option<&'static str>)>> = OnceLock::new();

fn rules() -> &'static [(Regex, Option<&'static str>)] {
    RULES.get_or_init(|| {
        PLURAL_RULES
            .iter()
            .filter_map(|(pattern, replacement)| {
                Regex::new(&format!("(?i){}", pattern))
                    .ok()
                    .map(|re| (re, *replacement))
            })
            .collect()
    })
}

/// Pluralize a word, applying the rules to its last segment
/// (`related-model` -> `related-models`, `person` -> `people`)
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let split_at = word.rfind(['-', '_', ' ']).map(|i| i + 1).unwrap_or(0);
    let (prefix, last) = word.split_at(split_at);

    if last.is_empty() || UNCOUNTABLES.contains(&last.to_lowercase().as_str()) {
        return word.to_string();
    }

    for (re, replacement) in rules() {
        if re.is_match(last) {
            return match replacement {
                Some(rep) => format!("{}{}", prefix, re.replace(last, *rep)),
                None => word.to_string(),
            };
        }
    }

    format!("{}s", word)
}
