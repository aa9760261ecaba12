//! Repeat cadence tags and their extraction from free text.

use serde::{Deserialize, Serialize};

/// How often a reminder repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// Fires once.
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

/// Keyword sets in priority order: the first cadence whose keyword appears wins.
const CADENCE_KEYWORDS: &[(Cadence, &[&str])] = &[
    (Cadence::Daily, &["毎日", "まいにち"]),
    (Cadence::Weekly, &["毎週", "まいしゅう"]),
    (Cadence::Monthly, &["毎月", "まいつき"]),
];

impl Cadence {
    /// Parse a stored tag. Unrecognized tags mean "does not repeat".
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "daily" => Cadence::Daily,
            "weekly" => Cadence::Weekly,
            "monthly" => Cadence::Monthly,
            _ => Cadence::None,
        }
    }

    /// The stored tag for this cadence.
    pub fn as_tag(self) -> &'static str {
        match self {
            Cadence::None => "none",
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
        }
    }

    /// Japanese label used when rendering a reminder.
    pub fn label(self) -> &'static str {
        match self {
            Cadence::None => "",
            Cadence::Daily => "毎日",
            Cadence::Weekly => "毎週",
            Cadence::Monthly => "毎月",
        }
    }

    pub fn repeats(self) -> bool {
        self != Cadence::None
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Find the cadence named anywhere in `text`.
///
/// Daily beats weekly beats monthly when several keywords co-occur. The text
/// is not modified; see [`strip_cadence_keywords`].
pub fn extract_cadence(text: &str) -> Cadence {
    CADENCE_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| text.contains(w)))
        .map(|(cadence, _)| *cadence)
        .unwrap_or(Cadence::None)
}

/// Remove every cadence keyword from `text` and trim the result.
pub fn strip_cadence_keywords(text: &str) -> String {
    let mut out = text.to_string();
    for (_, words) in CADENCE_KEYWORDS {
        for w in *words {
            out = out.replace(w, "");
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_spellings_are_recognized() {
        assert_eq!(extract_cadence("薬を飲む 毎日"), Cadence::Daily);
        assert_eq!(extract_cadence("まいにち 薬"), Cadence::Daily);
        assert_eq!(extract_cadence("毎週ゴミ出し"), Cadence::Weekly);
        assert_eq!(extract_cadence("まいしゅう ゴミ出し"), Cadence::Weekly);
        assert_eq!(extract_cadence("家賃 毎月"), Cadence::Monthly);
        assert_eq!(extract_cadence("まいつき 家賃"), Cadence::Monthly);
    }

    #[test]
    fn no_keyword_is_none() {
        assert_eq!(extract_cadence("歯医者"), Cadence::None);
        assert_eq!(extract_cadence(""), Cadence::None);
    }

    #[test]
    fn priority_is_daily_weekly_monthly() {
        assert_eq!(extract_cadence("毎月 毎週 毎日"), Cadence::Daily);
        assert_eq!(extract_cadence("まいつき まいしゅう"), Cadence::Weekly);
    }

    #[test]
    fn strip_removes_keywords_and_collapses_space() {
        assert_eq!(strip_cadence_keywords("ゴミ出し 毎週"), "ゴミ出し");
        assert_eq!(strip_cadence_keywords("毎日 薬 を飲む"), "薬 を飲む");
        assert_eq!(strip_cadence_keywords("毎日"), "");
    }

    #[test]
    fn tags_round_trip_and_unknown_is_none() {
        for c in [Cadence::None, Cadence::Daily, Cadence::Weekly, Cadence::Monthly] {
            assert_eq!(Cadence::from_tag(c.as_tag()), c);
        }
        assert_eq!(Cadence::from_tag("yearly"), Cadence::None);
        assert_eq!(Cadence::from_tag(" Weekly "), Cadence::Weekly);
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        assert_eq!(serde_json::to_string(&Cadence::Monthly).unwrap(), "\"monthly\"");
    }
}
