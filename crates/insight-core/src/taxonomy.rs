//! Theme taxonomy and router alias tables.
//!
//! Both tables are data, not code: an ordered list of canonical theme names
//! with lowercase trigger phrases, loadable from JSON so the taxonomy can
//! evolve without touching classification logic. Matching is deliberate
//! plain substring matching with no stemming and no word-boundary
//! enforcement, so multi-word phrases like "car wash" work unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InsightError, Result};

/// One canonical theme and its lowercase trigger phrases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeDef {
    pub name: String,
    pub triggers: Vec<String>,
}

impl ThemeDef {
    fn new(name: &str, triggers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }
}

// ── ThemeTaxonomy ─────────────────────────────────────────────────────────────

/// Ordered mapping of canonical theme names to trigger phrase lists, used to
/// tag review text during enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeTaxonomy {
    pub themes: Vec<ThemeDef>,
}

impl Default for ThemeTaxonomy {
    fn default() -> Self {
        Self {
            themes: vec![
                ThemeDef::new(
                    "cleanliness",
                    &[
                        "clean", "dirty", "filthy", "messy", "sticky", "smell", "smelly",
                        "hygiene", "grime",
                    ],
                ),
                ThemeDef::new(
                    "staff",
                    &[
                        "staff",
                        "cashier",
                        "attendant",
                        "rude",
                        "polite",
                        "helpful",
                        "unhelpful",
                        "friendly",
                        "customer service",
                        "service",
                    ],
                ),
                ThemeDef::new(
                    "queues",
                    &[
                        "queue", "queues", "line", "waiting", "wait", "slow", "crowded", "rush",
                    ],
                ),
                ThemeDef::new(
                    "pricing",
                    &[
                        "price", "prices", "expensive", "cost", "overpriced", "rip off", "ripoff",
                    ],
                ),
                ThemeDef::new(
                    "safety",
                    &[
                        "unsafe",
                        "safe",
                        "security",
                        "harass",
                        "harassment",
                        "threat",
                        "threatening",
                        "crime",
                        "scary",
                        "danger",
                    ],
                ),
                ThemeDef::new(
                    "toilets",
                    &[
                        "toilet", "toilets", "restroom", "bathroom", "loo", "washroom", "soap",
                    ],
                ),
                ThemeDef::new(
                    "ev_charging",
                    &[
                        "ev",
                        "charger",
                        "charging",
                        "charge point",
                        "chargepoint",
                        "rapid charger",
                        "broken charger",
                    ],
                ),
                ThemeDef::new("car_wash", &["car wash", "jet wash", "wash", "vacuum"]),
            ],
        }
    }
}

impl ThemeTaxonomy {
    /// Load a custom taxonomy from a JSON file of the same shape as
    /// the built-in default.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| InsightError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let taxonomy: ThemeTaxonomy = serde_json::from_str(&content)?;
        if taxonomy.themes.is_empty() {
            return Err(InsightError::Config(format!(
                "taxonomy file {} defines no themes",
                path.display()
            )));
        }
        debug!(
            "Loaded {} themes from {}",
            taxonomy.themes.len(),
            path.display()
        );
        Ok(taxonomy)
    }

    /// Tag `text` with every theme whose trigger list matches.
    ///
    /// Lowercases the text and includes a theme as soon as any one of its
    /// triggers occurs as a substring; a theme is included or not, never
    /// weighted. Empty or blank text yields the empty set. Results follow
    /// taxonomy order and contain no duplicates.
    pub fn classify(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let lower = text.to_lowercase();
        self.themes
            .iter()
            .filter(|theme| theme.triggers.iter().any(|kw| lower.contains(kw.as_str())))
            .map(|theme| theme.name.clone())
            .collect()
    }

    /// Canonical theme names in taxonomy order.
    pub fn theme_names(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.name.as_str()).collect()
    }

    /// Whether `name` is a canonical theme in this taxonomy.
    pub fn contains_theme(&self, name: &str) -> bool {
        self.themes.iter().any(|t| t.name == name)
    }
}

// ── RouterAliases ─────────────────────────────────────────────────────────────

/// Alias table mapping free-text question fragments to canonical theme
/// names, used by question routing.
///
/// Deliberately narrower than [`ThemeTaxonomy`]: routing favours precision
/// on short questions (e.g. bare "wash" tags review prose but does not route
/// a question), while enrichment favours recall. Canonical names are shared
/// between the two tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterAliases {
    pub themes: Vec<ThemeDef>,
}

impl Default for RouterAliases {
    fn default() -> Self {
        Self {
            themes: vec![
                ThemeDef::new(
                    "cleanliness",
                    &["clean", "dirty", "filthy", "messy", "hygiene", "smell"],
                ),
                ThemeDef::new("staff", &["staff", "rude", "helpful", "cashier", "service"]),
                ThemeDef::new(
                    "queues",
                    &["queue", "line", "waiting", "wait", "slow", "crowded"],
                ),
                ThemeDef::new("pricing", &["price", "expensive", "overpriced", "cost"]),
                ThemeDef::new(
                    "safety",
                    &["safe", "unsafe", "security", "threat", "harass", "crime"],
                ),
                ThemeDef::new(
                    "toilets",
                    &["toilet", "restroom", "bathroom", "soap", "loo"],
                ),
                ThemeDef::new("ev_charging", &["ev", "charger", "charging"]),
                ThemeDef::new("car_wash", &["car wash", "jet wash", "vacuum"]),
            ],
        }
    }
}

impl RouterAliases {
    /// Load a custom alias table from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| InsightError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let aliases: RouterAliases = serde_json::from_str(&content)?;
        debug!(
            "Loaded {} alias groups from {}",
            aliases.themes.len(),
            path.display()
        );
        Ok(aliases)
    }

    /// Return the first theme (in table order) with an alias present in the
    /// lowercased question, or `None` when no alias matches.
    pub fn detect(&self, question: &str) -> Option<&str> {
        let lower = question.to_lowercase();
        self.themes
            .iter()
            .find(|theme| theme.triggers.iter().any(|kw| lower.contains(kw.as_str())))
            .map(|theme| theme.name.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
