use crate::constants::normalize as normalize_constants;
use crate::services::normalizer::{normalize, normalize_alias, pluralize, tokenize};
use crate::utils::text::build_vector;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The fixed product taxonomy. Categories are closed; adding one is a seed
/// dictionary regeneration event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Produce,
    Dairy,
    MeatSeafood,
    Bakery,
    Pantry,
    Beverages,
    Frozen,
    Snacks,
    Household,
    PersonalCare,
    Baby,
    Pet,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Produce,
        Category::Dairy,
        Category::MeatSeafood,
        Category::Bakery,
        Category::Pantry,
        Category::Beverages,
        Category::Frozen,
        Category::Snacks,
        Category::Household,
        Category::PersonalCare,
        Category::Baby,
        Category::Pet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produce => "produce",
            Category::Dairy => "dairy",
            Category::MeatSeafood => "meat_seafood",
            Category::Bakery => "bakery",
            Category::Pantry => "pantry",
            Category::Beverages => "beverages",
            Category::Frozen => "frozen",
            Category::Snacks => "snacks",
            Category::Household => "household",
            Category::PersonalCare => "personal_care",
            Category::Baby => "baby",
            Category::Pet => "pet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::Dairy => "Dairy & Chilled",
            Category::MeatSeafood => "Meat & Seafood",
            Category::Bakery => "Bakery",
            Category::Pantry => "Pantry Staples",
            Category::Beverages => "Beverages",
            Category::Frozen => "Frozen",
            Category::Snacks => "Snacks",
            Category::Household => "Household",
            Category::PersonalCare => "Personal Care",
            Category::Baby => "Baby",
            Category::Pet => "Pet",
        }
    }
}

/// One compact seed describing a product family. Expanded into a dictionary
/// entry per variant x size combination.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecord {
    pub category: Category,
    pub product: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub packaging: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub version: String,
    pub seeds: Vec<SeedRecord>,
}

const BUILTIN_SEEDS: &str = include_str!("../../data/seed_dictionary.json");

pub fn load_builtin_seeds() -> Result<SeedFile, serde_json::Error> {
    serde_json::from_str(BUILTIN_SEEDS)
}

/// A fully expanded dictionary entry. Immutable once the index is built.
#[derive(Debug, Clone)]
pub struct DictionaryEntry {
    pub canonical_name: String,
    pub category: Category,
    pub aliases: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub packaging: Vec<String>,
}

/// A dictionary entry plus everything the matchers precompute: normalized
/// canonical form, the full normalized alias set (canonical included),
/// token list, and the term-frequency vector.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub entry: DictionaryEntry,
    pub normalized_canonical: String,
    pub alias_set: BTreeSet<String>,
    pub tokens: Vec<String>,
    pub vector: HashMap<String, f64>,
}

/// Immutable classification index. Built once at startup, then shared
/// read-only behind an `Arc`; concurrent readers need no locking.
#[derive(Debug)]
pub struct DictionaryIndex {
    seed_version: String,
    entries: Vec<IndexedEntry>,
    alias_index: HashMap<String, Vec<usize>>,
}

impl DictionaryIndex {
    pub fn from_seed_file(file: &SeedFile) -> Self {
        Self::build(&file.version, expand_seeds(&file.seeds))
    }

    pub fn from_seeds(version: &str, seeds: &[SeedRecord]) -> Self {
        Self::build(version, expand_seeds(seeds))
    }

    fn build(version: &str, entries: Vec<DictionaryEntry>) -> Self {
        let mut indexed = Vec::with_capacity(entries.len());
        for entry in entries {
            let normalized_canonical = normalize(&entry.canonical_name);
            let mut alias_set = BTreeSet::new();
            if !normalized_canonical.is_empty() {
                alias_set.insert(normalized_canonical.clone());
            }
            for alias in &entry.aliases {
                let normalized = normalize(alias);
                if !normalized.is_empty() {
                    alias_set.insert(normalized);
                }
            }
            let tokens = tokenize(&normalized_canonical);
            let vector = build_vector(&tokens);
            indexed.push(IndexedEntry {
                entry,
                normalized_canonical,
                alias_set,
                tokens,
                vector,
            });
        }

        let mut alias_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, entry) in indexed.iter().enumerate() {
            for alias in &entry.alias_set {
                alias_index.entry(alias.clone()).or_default().push(position);
            }
        }

        Self {
            seed_version: version.to_string(),
            entries: indexed,
            alias_index,
        }
    }

    pub fn seed_version(&self) -> &str {
        &self.seed_version
    }

    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries registered under an exact normalized alias, in canonical-name
    /// order (insertion order of the sorted entry list).
    pub fn lookup_alias(&self, normalized: &str) -> &[usize] {
        self.alias_index
            .get(normalized)
            .map(|hits| hits.as_slice())
            .unwrap_or(&[])
    }

    pub fn stats(&self) -> serde_json::Value {
        let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in &self.entries {
            *categories.entry(entry.entry.category.as_str()).or_insert(0) += 1;
        }
        serde_json::json!({
            "version": self.seed_version,
            "entries": self.entries.len(),
            "aliases": self.alias_index.len(),
            "categories": categories,
        })
    }
}

fn canonical_from_parts(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .filter_map(|part| *part)
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn pluralize_alias(alias: &str) -> String {
    alias
        .split(' ')
        .map(|token| {
            if normalize_constants::SEED_STOP_WORDS.contains(&token) {
                token.to_string()
            } else {
                pluralize(token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn expand_seed(seed: &SeedRecord) -> Vec<DictionaryEntry> {
    let variants: Vec<Option<&str>> = if seed.variants.is_empty() {
        vec![None]
    } else {
        seed.variants.iter().map(|v| Some(v.as_str())).collect()
    };
    let sizes: Vec<Option<&str>> = if seed.sizes.is_empty() {
        vec![None]
    } else {
        seed.sizes.iter().map(|s| Some(s.as_str())).collect()
    };

    let mut entries = Vec::new();
    for variant in &variants {
        for size in &sizes {
            let canonical_name = canonical_from_parts(&[
                seed.brand.as_deref(),
                *variant,
                Some(seed.product.as_str()),
                *size,
            ]);
            if canonical_name.is_empty() {
                continue;
            }

            let mut alias_set = BTreeSet::new();
            alias_set.insert(normalize_alias(&seed.product));
            if let Some(brand) = &seed.brand {
                alias_set.insert(normalize_alias(&format!("{} {}", brand, seed.product)));
            }
            if let Some(variant) = variant {
                alias_set.insert(normalize_alias(&format!("{} {}", variant, seed.product)));
            }
            if let Some(size) = size {
                alias_set.insert(normalize_alias(&format!("{} {}", seed.product, size)));
            }
            for alias in &seed.aliases {
                alias_set.insert(normalize_alias(alias));
            }
            alias_set.remove("");

            let mut aliases = BTreeSet::new();
            for alias in &alias_set {
                aliases.insert(alias.clone());
                aliases.insert(pluralize_alias(alias));
            }

            let mut tags = BTreeSet::new();
            for tag in &seed.tags {
                tags.insert(tag.to_lowercase());
            }
            if let Some(brand) = &seed.brand {
                tags.insert(brand.to_lowercase());
            }
            if let Some(variant) = variant {
                tags.insert(variant.to_lowercase());
            }

            entries.push(DictionaryEntry {
                canonical_name,
                category: seed.category,
                aliases,
                tags,
                packaging: seed.packaging.clone(),
            });
        }
    }
    entries
}

/// Expand every seed, merge entries that landed on the same canonical name
/// (alias and tag union), and return them sorted by canonical name so index
/// enumeration is deterministic.
pub fn expand_seeds(seeds: &[SeedRecord]) -> Vec<DictionaryEntry> {
    let mut by_canonical: BTreeMap<String, DictionaryEntry> = BTreeMap::new();
    for seed in seeds {
        for entry in expand_seed(seed) {
            match by_canonical.get_mut(&entry.canonical_name) {
                Some(existing) => {
                    existing.aliases.extend(entry.aliases);
                    existing.tags.extend(entry.tags);
                }
                None => {
                    by_canonical.insert(entry.canonical_name.clone(), entry);
                }
            }
        }
    }
    by_canonical.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curry_seed() -> SeedRecord {
        SeedRecord {
            category: Category::Pantry,
            product: "Curry Powder".to_string(),
            brand: Some("Betapac".to_string()),
            variants: Vec::new(),
            sizes: vec!["100g".to_string(), "227g".to_string()],
            tags: vec!["curry".to_string()],
            packaging: vec!["bag".to_string(), "tin".to_string()],
            aliases: Vec::new(),
        }
    }

    #[test]
    fn expansion_crosses_variants_and_sizes() {
        let seed = SeedRecord {
            variants: vec!["Hot".to_string(), "Mild".to_string()],
            ..curry_seed()
        };
        let entries = expand_seeds(&[seed]);
        assert_eq!(entries.len(), 4);
        let names: Vec<&str> = entries.iter().map(|e| e.canonical_name.as_str()).collect();
        assert!(names.contains(&"Betapac Hot Curry Powder 100g"));
        assert!(names.contains(&"Betapac Mild Curry Powder 227g"));
    }

    #[test]
    fn expansion_generates_plural_alias_twins() {
        let entries = expand_seeds(&[curry_seed()]);
        let entry = &entries[0];
        assert!(entry.aliases.contains("curry powder"));
        // `-y` pluralizes to `-ies` even mid-phrase; the index normalizer
        // folds the twin back onto the singular key.
        assert!(entry.aliases.contains("curries powders"));
        assert!(entry.aliases.contains("betapac curry powder"));
    }

    #[test]
    fn expansion_merges_duplicate_canonicals() {
        let mut other = curry_seed();
        other.aliases = vec!["madras curry".to_string()];
        let entries = expand_seeds(&[curry_seed(), other]);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.aliases.contains("madras curry")));
    }

    #[test]
    fn entries_are_sorted_by_canonical_name() {
        let entries = expand_seeds(&[curry_seed()]);
        let mut sorted = entries.iter().map(|e| e.canonical_name.clone()).collect::<Vec<_>>();
        sorted.sort();
        assert_eq!(
            entries.iter().map(|e| e.canonical_name.clone()).collect::<Vec<_>>(),
            sorted
        );
    }

    #[test]
    fn index_registers_canonical_alias_for_every_entry() {
        let index = DictionaryIndex::from_seeds("test", &[curry_seed()]);
        for (position, entry) in index.entries().iter().enumerate() {
            assert!(
                index.lookup_alias(&entry.normalized_canonical).contains(&position),
                "entry {} must be reachable through its canonical alias",
                entry.entry.canonical_name
            );
        }
    }

    #[test]
    fn index_normalizes_plural_aliases_onto_one_key() {
        let index = DictionaryIndex::from_seeds("test", &[curry_seed()]);
        // Both "curry powder" and "curry powders" singularize to the same key.
        let hits = index.lookup_alias("curry powder");
        assert_eq!(hits.len(), 2, "both sizes share the bare product alias");
        assert!(index.lookup_alias("curry powders").is_empty());
    }

    #[test]
    fn builtin_seed_file_parses_and_covers_all_categories() {
        let file = load_builtin_seeds().expect("builtin seed dictionary must parse");
        assert!(!file.version.is_empty());
        let index = DictionaryIndex::from_seed_file(&file);
        let stats = index.stats();
        let categories = stats.get("categories").and_then(|v| v.as_object()).unwrap();
        for category in Category::ALL {
            assert!(
                categories.contains_key(category.as_str()),
                "seed dictionary has no {} entries",
                category.as_str()
            );
        }
    }
}
