//! Deterministic category rules mapping statement descriptions to merchant
//! categories, plus the income/expense split.
//!
//! Rules are tried in order and the first rule with a keyword contained in
//! the lower-cased description wins. Keyword sets overlap ("openai",
//! "netflix", "cursor", "itunes" are listed under both Shopping and
//! Subscription/Online); the earlier rule always takes precedence.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tally_core::{Category, SignConvention, TxnType};

const BUILTIN_RULES: &[(Category, &[&str])] = &[
    (
        Category::FoodDining,
        &[
            "restaurant", "talabat", "kfc", "hardees", "soho garden", "gazebo", "tasty pizza",
            "pulao", "shake", "cafe", "noon minutes", "wakha", "meraki", "hot n spicy",
            "pak darbar", "apna kabab", "mcdonalds", "carrefour food", "fillicafe",
        ],
    ),
    (
        Category::Transport,
        &[
            "taxi", "careem", "zo feur", "dubai taxi", "emarat", "epcco", "enoc", "car rental",
            "hala",
        ],
    ),
    (
        Category::Shopping,
        &[
            "noon.com", "carrefour", "home centre", "pakistan supermarket", "supermarket",
            "minutes", "apple.com", "itunes", "openai", "netflix", "cursor",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "platiniumlist", "reel entertainment", "soho garden", "expedia", "leisure", "mmall",
            "smart dubai government",
        ],
    ),
    (
        Category::Utilities,
        &["dewa", "electricity", "smart dubai", "etisalat", "du", "swyp"],
    ),
    (
        Category::PersonalCare,
        &["salon", "barber", "dry clean", "laundry", "spa"],
    ),
    (
        Category::SubscriptionOnline,
        &["openai", "netflix", "whoop", "cursor", "apple", "itunes", "chatgpt"],
    ),
];

/// One rule: any keyword contained in the description selects `category`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// An ordered rule table. Descriptions matching no rule are `Others`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

/// Which rule and keyword decided a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub category: Category,
    pub rule_index: usize,
    pub keyword: &'a str,
}

impl CategoryRules {
    /// Build a table from rules in priority order. Keywords are lower-cased;
    /// blank keywords are dropped since they would match everything.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                category: rule.category,
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.trim().is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// The built-in rule table
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_RULES
                .iter()
                .map(|(category, keywords)| CategoryRule {
                    category: *category,
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        )
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// First rule (and keyword) matching the description, if any.
    pub fn find_match(&self, description: &str) -> Option<RuleMatch<'_>> {
        let desc = description.to_lowercase();
        self.rules.iter().enumerate().find_map(|(rule_index, rule)| {
            rule.keywords
                .iter()
                .find(|k| desc.contains(k.as_str()))
                .map(|keyword| RuleMatch {
                    category: rule.category,
                    rule_index,
                    keyword: keyword.as_str(),
                })
        })
    }

    /// Categorize a description. Total: falls back to `Others`.
    pub fn classify(&self, description: &str) -> Category {
        self.find_match(description)
            .map(|m| m.category)
            .unwrap_or(Category::Others)
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_rules() -> &'static CategoryRules {
    static RULES: OnceLock<CategoryRules> = OnceLock::new();
    RULES.get_or_init(CategoryRules::builtin)
}

/// Categorize a description with the built-in rule table.
pub fn classify_category(description: &str) -> Category {
    builtin_rules().classify(description)
}

/// Income or expense, from the sign of the amount alone.
pub fn classify_type(amount: f64, convention: SignConvention) -> TxnType {
    convention.classify(amount)
}
