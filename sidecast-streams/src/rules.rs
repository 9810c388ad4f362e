//! Declarative extraction rules for stream metadata.
//!
//! Each rule belongs to one category and carries a precedence rank. For a
//! category, rules are tried in rank order against the whole search text and
//! the first rule that matches anywhere decides the value.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{AudioFormat, HdrFormat, Resolution, VideoCodec};

/// Metadata category a rule extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Size,
    Seeders,
    Codec,
    Hdr,
    Audio,
    Resolution,
}

/// Value produced when a rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleValue {
    /// Size normalized from capture groups 1 (number) and 2 (unit)
    Size,
    /// Text of capture group 1
    Count,
    Codec(VideoCodec),
    Hdr(HdrFormat),
    Audio(AudioFormat),
    Resolution(Resolution),
}

/// Source form of one rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    pub category: Category,
    pub rank: u8,
    pub pattern: &'static str,
    pub value: RuleValue,
}

/// Rule table, grouped by category and ordered by rank.
pub const RULE_TABLE: &[RuleDef] = &[
    RuleDef {
        category: Category::Size,
        rank: 0,
        pattern: r"(?i)\b(\d+(?:[.,]\d+)*)\s*(GB|MB|TB)\b",
        value: RuleValue::Size,
    },
    RuleDef {
        category: Category::Seeders,
        rank: 0,
        pattern: r"(?i)(?:👤|👥|🌱|\bseed(?:er)?s?\s*:|\bS\s*:)\s*(\d+)",
        value: RuleValue::Count,
    },
    RuleDef {
        category: Category::Codec,
        rank: 0,
        pattern: r"(?i)\b(?:hevc|[xh][ .]?265)\b",
        value: RuleValue::Codec(VideoCodec::Hevc),
    },
    RuleDef {
        category: Category::Codec,
        rank: 1,
        pattern: r"(?i)\b(?:avc|[xh][ .]?264)\b",
        value: RuleValue::Codec(VideoCodec::X264),
    },
    RuleDef {
        category: Category::Codec,
        rank: 2,
        pattern: r"(?i)\bav1\b",
        value: RuleValue::Codec(VideoCodec::Av1),
    },
    RuleDef {
        category: Category::Hdr,
        rank: 0,
        pattern: r"(?i)\b(?:dolby[ .]?vision|dovi|dv)\b",
        value: RuleValue::Hdr(HdrFormat::DolbyVision),
    },
    RuleDef {
        category: Category::Hdr,
        rank: 1,
        pattern: r"(?i)\bhdr10(?:\+|plus)",
        value: RuleValue::Hdr(HdrFormat::Hdr10Plus),
    },
    RuleDef {
        category: Category::Hdr,
        rank: 2,
        pattern: r"(?i)\bhdr(?:10)?\b",
        value: RuleValue::Hdr(HdrFormat::Hdr),
    },
    RuleDef {
        category: Category::Audio,
        rank: 0,
        pattern: r"(?i)\batmos\b",
        value: RuleValue::Audio(AudioFormat::Atmos),
    },
    RuleDef {
        category: Category::Audio,
        rank: 1,
        pattern: r"(?i)\bdts[- :.]?x\b",
        value: RuleValue::Audio(AudioFormat::DtsX),
    },
    RuleDef {
        category: Category::Audio,
        rank: 2,
        pattern: r"(?i)\btrue[- .]?hd\b",
        value: RuleValue::Audio(AudioFormat::TrueHd),
    },
    RuleDef {
        category: Category::Audio,
        rank: 3,
        pattern: r"(?i)\bdts[- .]?hd\b",
        value: RuleValue::Audio(AudioFormat::DtsHd),
    },
    RuleDef {
        category: Category::Resolution,
        rank: 0,
        pattern: r"(?i)\b(?:2160p|4k|uhd)\b",
        value: RuleValue::Resolution(Resolution::Uhd2160),
    },
    RuleDef {
        category: Category::Resolution,
        rank: 1,
        pattern: r"(?i)\b1080[pi]\b",
        value: RuleValue::Resolution(Resolution::FullHd1080),
    },
    RuleDef {
        category: Category::Resolution,
        rank: 2,
        pattern: r"(?i)\b720p\b",
        value: RuleValue::Resolution(Resolution::Hd720),
    },
    RuleDef {
        category: Category::Resolution,
        rank: 3,
        pattern: r"(?i)\b480p\b",
        value: RuleValue::Resolution(Resolution::Sd480),
    },
];

/// A compiled rule.
#[derive(Debug)]
pub struct ExtractionRule {
    pub def: RuleDef,
    pub regex: Regex,
}

/// Extracted value of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    Codec(VideoCodec),
    Hdr(HdrFormat),
    Audio(AudioFormat),
    Resolution(Resolution),
}

impl ExtractionRule {
    /// Applies the rule to the search text.
    pub fn apply(&self, text: &str) -> Option<Extracted> {
        let captures = self.regex.captures(text)?;
        match self.def.value {
            RuleValue::Size => {
                let number = captures.get(1)?.as_str();
                let unit = captures.get(2)?.as_str().to_ascii_uppercase();
                Some(Extracted::Text(format!("{number} {unit}")))
            }
            RuleValue::Count => Some(Extracted::Text(captures.get(1)?.as_str().to_string())),
            RuleValue::Codec(codec) => Some(Extracted::Codec(codec)),
            RuleValue::Hdr(hdr) => Some(Extracted::Hdr(hdr)),
            RuleValue::Audio(audio) => Some(Extracted::Audio(audio)),
            RuleValue::Resolution(resolution) => Some(Extracted::Resolution(resolution)),
        }
    }
}

/// Compiled rule table in category and rank order.
pub static RULES: LazyLock<Vec<ExtractionRule>> = LazyLock::new(|| {
    let mut defs = RULE_TABLE.to_vec();
    defs.sort_by_key(|def| def.rank);

    defs
        .into_iter()
        .filter_map(|def| match Regex::new(def.pattern) {
            Ok(regex) => Some(ExtractionRule { def, regex }),
            Err(e) => {
                tracing::error!(pattern = def.pattern, "Invalid extraction rule: {e}");
                None
            }
        })
        .collect()
});

/// Rules of one category in rank order.
pub fn rules_for(category: Category) -> impl Iterator<Item = &'static ExtractionRule> {
    RULES
        .iter()
        .filter(move |rule| rule.def.category == category)
}

/// Runs a category's rules over the text; the first matching rule wins.
pub fn extract(category: Category, text: &str) -> Option<Extracted> {
    rules_for(category).find_map(|rule| {
        let extracted = rule.apply(text)?;
        tracing::trace!(?category, rank = rule.def.rank, ?extracted, "Rule matched");
        Some(extracted)
    })
}
