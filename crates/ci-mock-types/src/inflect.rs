//! English pluralization for entity type names.
//!
//! Follows the rule set of the web client's inflector closely enough for the
//! ASCII entity words the mock backend deals in. In particular a word that
//! already ends in `s` is left alone, so `crons` stays `crons`.

/// Words with no distinct plural.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

/// Irregular singular/plural pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("cow", "kine"),
    ("zombie", "zombies"),
];

/// Suffix rules, highest precedence first: (suffix, bytes to drop, replacement).
const SUFFIX_RULES: &[(&str, usize, &str)] = &[
    ("quiz", 0, "zes"),
    ("matrix", 2, "ices"),
    ("vertex", 2, "ices"),
    ("index", 2, "ices"),
    ("mouse", 4, "ice"),
    ("louse", 4, "ice"),
    ("alias", 0, "es"),
    ("status", 0, "es"),
    ("bus", 0, "es"),
    ("octopus", 2, "i"),
    ("virus", 2, "i"),
    ("axis", 2, "es"),
    ("testis", 2, "es"),
    ("buffalo", 0, "es"),
    ("tomato", 0, "es"),
    ("sis", 2, "es"),
    ("ium", 2, "a"),
    ("tum", 2, "a"),
    ("x", 0, "es"),
    ("ch", 0, "es"),
    ("ss", 0, "es"),
    ("sh", 0, "es"),
    ("s", 0, ""),
];

/// Pluralize an entity type name.
///
/// ```rust
/// use ci_mock_types::pluralize;
///
/// assert_eq!(pluralize("repository"), "repositories");
/// assert_eq!(pluralize("build"), "builds");
/// assert_eq!(pluralize("crons"), "crons");
/// ```
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    for (singular, plural) in IRREGULAR {
        if lower == *plural {
            return word.to_string();
        }
        if lower == *singular {
            return match_leading_case(word, plural);
        }
    }

    for (suffix, drop, replacement) in SUFFIX_RULES {
        if lower.ends_with(suffix) {
            let stem = &word[..word.len() - drop];
            return format!("{}{}", stem, replacement);
        }
    }

    if let Some(stem) = lower.strip_suffix('y') {
        if ends_with_consonant_or_qu(stem) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    if lower.ends_with("fe") && !lower.ends_with("ffe") {
        return format!("{}ves", &word[..word.len() - 2]);
    }
    if lower.ends_with("lf") || lower.ends_with("rf") {
        return format!("{}ves", &word[..word.len() - 1]);
    }

    format!("{}s", word)
}

fn ends_with_consonant_or_qu(stem: &str) -> bool {
    if stem.ends_with("qu") {
        return true;
    }
    match stem.chars().last() {
        Some(c) => !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'),
        None => false,
    }
}

fn match_leading_case(original: &str, replacement: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    if !upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_entity_words() {
        assert_eq!(pluralize("repository"), "repositories");
        assert_eq!(pluralize("build"), "builds");
        assert_eq!(pluralize("job"), "jobs");
        assert_eq!(pluralize("branch"), "branches");
        assert_eq!(pluralize("key"), "keys");
        assert_eq!(pluralize("env_var"), "env_vars");
        assert_eq!(pluralize("ssh_key"), "ssh_keys");
        assert_eq!(pluralize("cron"), "crons");
        assert_eq!(pluralize("crons"), "crons");
    }

    #[test]
    fn test_irregular_and_uncountable() {
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("people"), "people");
        assert_eq!(pluralize("Child"), "Children");
        assert_eq!(pluralize("information"), "information");
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("index"), "indices");
        assert_eq!(pluralize("analysis"), "analyses");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("soliloquy"), "soliloquies");
        assert_eq!(pluralize("knife"), "knives");
        assert_eq!(pluralize("wolf"), "wolves");
        assert_eq!(pluralize("Repository"), "Repositories");
    }

    #[test]
    fn test_empty_word() {
        assert_eq!(pluralize(""), "");
    }

    proptest! {
        /// Pluralizing twice is the same as pluralizing once for regular nouns.
        #[test]
        fn prop_regular_plural_is_stable(stem in "[a-z]{1,12}[bgkp]") {
            let once = pluralize(&stem);
            prop_assert_eq!(&once, &format!("{}s", stem));
            prop_assert_eq!(pluralize(&once), once);
        }
    }
}
