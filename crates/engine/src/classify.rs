//! Skill classification tables.
//!
//! Category, importance, and prerequisites are not part of the roadmap
//! payload; they are inferred from ordered rule tables. A skill matches a
//! rule when either name contains the other (case-insensitive), and the first
//! matching rule in each table wins.
//!
//! Tables are plain data and can be loaded from TOML:
//!
//! ```toml
//! [[categories]]
//! pattern = "python"
//! category = "Programming Language"
//!
//! [[importance]]
//! pattern = "python"
//! importance = "core"
//!
//! [[prerequisites]]
//! pattern = "django"
//! requires = ["Python"]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned to skills no rule matches.
pub const DEFAULT_CATEGORY: &str = "Other";

/// How central a skill is to the target role.
///
/// Ordering follows recommendation priority: `Core < Important < Useful`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Core,
    Important,
    #[default]
    Useful,
}

impl Importance {
    /// Sort rank; lower ranks are recommended first.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Core => 0,
            Self::Important => 1,
            Self::Useful => 2,
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::Important => write!(f, "important"),
            Self::Useful => write!(f, "useful"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportanceRule {
    pub pattern: String,
    pub importance: Importance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteRule {
    pub pattern: String,
    /// Exact skill names that must be learned first.
    #[serde(default)]
    pub requires: Vec<String>,
}

/// Result of classifying one skill name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub importance: Importance,
    pub prerequisites: Vec<String>,
}

/// Ordered rule tables used by the skill graph builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationTables {
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
    #[serde(default)]
    pub importance: Vec<ImportanceRule>,
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteRule>,
}

impl ClassificationTables {
    /// Tables with no rules; every skill gets the permissive defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
            importance: Vec::new(),
            prerequisites: Vec::new(),
        }
    }

    /// Parse tables from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    #[must_use]
    pub fn category_of(&self, skill: &str) -> &str {
        self.categories
            .iter()
            .find(|rule| names_match(skill, &rule.pattern))
            .map_or(DEFAULT_CATEGORY, |rule| rule.category.as_str())
    }

    #[must_use]
    pub fn importance_of(&self, skill: &str) -> Importance {
        self.importance
            .iter()
            .find(|rule| names_match(skill, &rule.pattern))
            .map_or(Importance::Useful, |rule| rule.importance)
    }

    #[must_use]
    pub fn prerequisites_of(&self, skill: &str) -> &[String] {
        self.prerequisites
            .iter()
            .find(|rule| names_match(skill, &rule.pattern))
            .map(|rule| rule.requires.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn classify(&self, skill: &str) -> Classification {
        Classification {
            category: self.category_of(skill).to_string(),
            importance: self.importance_of(skill),
            prerequisites: self.prerequisites_of(skill).to_vec(),
        }
    }
}

impl Default for ClassificationTables {
    fn default() -> Self {
        Self {
            categories: CATEGORY_RULES
                .iter()
                .map(|&(pattern, category)| CategoryRule {
                    pattern: pattern.to_string(),
                    category: category.to_string(),
                })
                .collect(),
            importance: IMPORTANCE_RULES
                .iter()
                .map(|&(pattern, importance)| ImportanceRule {
                    pattern: pattern.to_string(),
                    importance,
                })
                .collect(),
            prerequisites: PREREQUISITE_RULES
                .iter()
                .map(|&(pattern, requires)| PrerequisiteRule {
                    pattern: pattern.to_string(),
                    requires: requires.iter().map(|s| (*s).to_string()).collect(),
                })
                .collect(),
        }
    }
}

/// Bidirectional, case-insensitive containment. Empty patterns never match.
fn names_match(skill: &str, pattern: &str) -> bool {
    if pattern.is_empty() || skill.is_empty() {
        return false;
    }
    let skill = skill.to_lowercase();
    let pattern = pattern.to_lowercase();
    skill.contains(&pattern) || pattern.contains(&skill)
}

const CATEGORY_RULES: &[(&str, &str)] = &[
    ("python", "Programming Language"),
    ("javascript", "Programming Language"),
    ("typescript", "Programming Language"),
    ("java", "Programming Language"),
    ("react", "Frontend"),
    ("vue", "Frontend"),
    ("html", "Frontend"),
    ("css", "Frontend"),
    ("node", "Backend"),
    ("django", "Backend"),
    ("spring", "Backend"),
    ("sql", "Database"),
    ("데이터베이스", "Database"),
    ("딥러닝", "AI/ML"),
    ("머신러닝", "AI/ML"),
    ("deep learning", "AI/ML"),
    ("machine learning", "AI/ML"),
    ("pandas", "Data"),
    ("통계", "Data"),
    ("statistics", "Data"),
    ("docker", "DevOps"),
    ("kubernetes", "DevOps"),
    ("aws", "Cloud"),
    ("git", "Tools"),
    ("communication", "Soft Skills"),
    ("커뮤니케이션", "Soft Skills"),
];

const IMPORTANCE_RULES: &[(&str, Importance)] = &[
    ("python", Importance::Core),
    ("javascript", Importance::Core),
    ("sql", Importance::Core),
    ("git", Importance::Core),
    ("머신러닝", Importance::Core),
    ("machine learning", Importance::Core),
    ("딥러닝", Importance::Important),
    ("deep learning", Importance::Important),
    ("react", Importance::Important),
    ("docker", Importance::Important),
    ("통계", Importance::Important),
    ("statistics", Importance::Important),
    ("aws", Importance::Important),
];

const PREREQUISITE_RULES: &[(&str, &[&str])] = &[
    ("딥러닝", &["머신러닝", "Python"]),
    ("deep learning", &["Machine Learning", "Python"]),
    ("머신러닝", &["Python", "통계"]),
    ("machine learning", &["Python", "Statistics"]),
    ("react", &["JavaScript"]),
    ("typescript", &["JavaScript"]),
    ("node", &["JavaScript"]),
    ("django", &["Python"]),
    ("pandas", &["Python"]),
    ("spring", &["Java"]),
    ("kubernetes", &["Docker"]),
];
