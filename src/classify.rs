// src/classify.rs
//! Topical bucketing via an explicit, ordered keyword rule table.
//!
//! Rules are evaluated top to bottom and the first hit wins, so a given
//! title/body pair always classifies the same way.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    UsChina,
    Geopolitics,
    Markets,
    Technology,
    Social,
    General,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::UsChina => "US-China",
            Category::Geopolitics => "Geopolitics",
            Category::Markets => "Markets",
            Category::Technology => "Technology",
            Category::Social => "Social",
            Category::General => "General",
        }
    }

    /// Display order used by the digest formatter.
    pub const ORDERED: [Category; 6] = [
        Category::UsChina,
        Category::Geopolitics,
        Category::Markets,
        Category::Technology,
        Category::Social,
        Category::General,
    ];
}

struct Rule {
    patterns: &'static [&'static str],
    category: Category,
}

/// Source-name rules take precedence; social mirrors are tagged regardless
/// of what the post says.
const SOURCE_RULES: &[Rule] = &[Rule {
    patterns: &["twitter-", "truth social", "youtube"],
    category: Category::Social,
}];

const TEXT_RULES: &[Rule] = &[
    Rule {
        patterns: &[
            "china",
            "beijing",
            "taiwan",
            "hong kong",
            "xinjiang",
            "trade war",
            "tariff",
            "huawei",
            "tiktok",
            "semiconductor",
            "decoupling",
            "supply chain",
        ],
        category: Category::UsChina,
    },
    Rule {
        patterns: &[
            "ukraine",
            "russia",
            "israel",
            "palestine",
            "nato",
            "united nations",
            "sanction",
            "war",
            "conflict",
            "diplomacy",
        ],
        category: Category::Geopolitics,
    },
    Rule {
        patterns: &[
            "market",
            "stock",
            "crypto",
            "bitcoin",
            "fed",
            "inflation",
            "recession",
            "interest rate",
            "earnings",
        ],
        category: Category::Markets,
    },
    Rule {
        patterns: &[
            "artificial intelligence",
            " ai ",
            "cyber",
            "chip",
            "software",
            "startup",
        ],
        category: Category::Technology,
    },
];

/// Classify one item from its source name and title+body text.
pub fn classify(source_name: &str, text: &str) -> Category {
    let source = source_name.to_lowercase();
    for rule in SOURCE_RULES {
        if rule.patterns.iter().any(|p| source.contains(p)) {
            return rule.category;
        }
    }

    // Pad so word-boundary patterns like " ai " can match at the edges.
    let padded = format!(" {} ", text.to_lowercase());
    for rule in TEXT_RULES {
        if rule.patterns.iter().any(|p| padded.contains(p)) {
            return rule.category;
        }
    }
    Category::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn social_sources_win_over_text() {
        assert_eq!(
            classify("Twitter-realDonaldTrump", "china tariffs incoming"),
            Category::Social
        );
    }

    #[test]
    fn first_matching_text_rule_wins() {
        // Both a US-China and a Markets keyword present; the earlier rule applies.
        assert_eq!(
            classify("Reuters", "China markets rally on tariff news"),
            Category::UsChina
        );
    }

    #[test]
    fn ai_matches_as_a_word_not_substring() {
        assert_eq!(classify("BBC World", "fresh air for cities"), Category::General);
        assert_eq!(classify("BBC World", "new ai rules proposed"), Category::Technology);
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(classify("NPR News", "local bake sale"), Category::General);
    }
}
