/// Content tables — the static data every card is built from.
///
/// Tables are authored in RON, loaded once, validated, and then treated
/// as read-only for the lifetime of the engine.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::grammar::{PlaceholderKind, Template};
use crate::schema::descriptor::{Rarity, Size};

/// The table set bundled with the crate.
const DEFAULT_TABLES: &str = include_str!("../../content/tables.ron");

#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("table '{0}' is empty")]
    EmptyTable(&'static str),
    #[error("word pool '{0}' is empty")]
    EmptyPool(String),
    #[error("no word pool for tier '{0}'")]
    MissingTier(String),
    #[error("{table} entry '{id}' contains {{{found}}}, which is resolved before it")]
    PlaceholderOrder {
        table: &'static str,
        id: String,
        found: PlaceholderKind,
    },
    #[error("tag '{0}' has an amount form without {{Number}}")]
    MissingNumber(String),
}

/// The six ways a tag can be rendered for one side of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagForms {
    /// "an item"
    pub single: String,
    /// "your items"
    pub plural: String,
    /// "{Number} items"
    pub amount: String,
}

/// A category of item referenced by effects and triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub own: TagForms,
    pub opponent: TagForms,
}

/// An effect template, e.g. `"Haste {Tag} for {Duration}"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: String,
    pub text: String,
}

/// How a value descriptor renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueKind {
    /// A bare integer; drops a following "as" from the sentence.
    PlainNumber,
    /// A phrase the effect scales with, e.g. "the value of your items".
    Phrase {
        own: String,
        opponent: String,
        #[serde(default)]
        single_item: Option<String>,
        /// Whether "twice"/"triple" may prefix the phrase.
        #[serde(default)]
        multipliable: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDescriptor {
    pub id: String,
    pub kind: ValueKind,
}

impl ValueDescriptor {
    /// Phrase scoped to the card itself ("this item's damage"), if any.
    pub fn single_item_phrase(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Phrase { single_item, .. } => single_item.as_deref(),
            ValueKind::PlainNumber => None,
        }
    }
}

/// A skill trigger with its four phrasings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTrigger {
    pub id: String,
    /// "When you use {Tag}, "
    pub own: String,
    /// "When your opponent uses {Tag}, "
    pub opponent: String,
    /// "The first {Times} you use {Tag} each fight, "
    pub own_first_n: String,
    /// "The first {Times} your opponent uses {Tag} each fight, "
    pub opponent_first_n: String,
}

/// Flavor nouns tied to a theme key found in card text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemePool {
    pub key: String,
    pub words: Vec<String>,
}

/// Speed adjectives bucketed by cooldown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedPools {
    pub fast: Vec<String>,
    pub balanced: Vec<String>,
    pub heavy: Vec<String>,
}

/// Descriptor pools used for skill names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillNamePools {
    pub speed: Vec<String>,
    pub power: Vec<String>,
    pub quirky: Vec<String>,
    pub elemental: Vec<String>,
    pub actions: Vec<String>,
}

/// Every word pool the name synthesizer draws from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingPools {
    /// Checked in declaration order; the first key found wins.
    pub themes: Vec<ThemePool>,
    pub default_theme: Vec<String>,
    pub rarity_prefixes: FxHashMap<Rarity, Vec<String>>,
    pub size_nouns: FxHashMap<Size, Vec<String>>,
    pub speed: SpeedPools,
    /// Closing words for "X of Y" names ("Echoes", "Dust").
    pub flavor_words: Vec<String>,
    /// Trailing nouns for "X Engine" style names.
    pub frame_nouns: Vec<String>,
    pub skill: SkillNamePools,
}

impl NamingPools {
    /// Prefix pool for a rarity. Validation guarantees every tier is present.
    pub fn rarity(&self, rarity: Rarity) -> &[String] {
        self.rarity_prefixes
            .get(&rarity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Noun pool for a size. Validation guarantees every tier is present.
    pub fn size(&self, size: Size) -> &[String] {
        self.size_nouns
            .get(&size)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// The complete content set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTables {
    /// Words the highlighter wraps, e.g. "POISON".
    pub keywords: Vec<String>,
    /// Keywords that are irregular plurals of another keyword.
    #[serde(default)]
    pub irregular_plurals: FxHashMap<String, String>,
    pub tags: Vec<Tag>,
    pub effects: Vec<Effect>,
    pub values: Vec<ValueDescriptor>,
    pub triggers: Vec<SkillTrigger>,
    pub naming: NamingPools,
}

impl ContentTables {
    /// The tables bundled with the crate.
    pub fn bundled() -> Result<ContentTables, TableError> {
        Self::parse_ron(DEFAULT_TABLES)
    }

    /// Load and validate tables from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<ContentTables, TableError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse and validate tables from a RON string.
    pub fn parse_ron(input: &str) -> Result<ContentTables, TableError> {
        let tables: ContentTables = ron::from_str(input)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Check every invariant generation relies on.
    ///
    /// Tables must be non-empty, every size and rarity needs a non-empty
    /// pool, and text spliced in for a placeholder may only contain
    /// placeholders that are resolved after it.
    pub fn validate(&self) -> Result<(), TableError> {
        non_empty_table("keywords", &self.keywords)?;
        non_empty_table("tags", &self.tags)?;
        non_empty_table("effects", &self.effects)?;
        non_empty_table("values", &self.values)?;
        non_empty_table("triggers", &self.triggers)?;

        for tag in &self.tags {
            for forms in [&tag.own, &tag.opponent] {
                if !forms.amount.contains("{Number}") {
                    return Err(TableError::MissingNumber(tag.id.clone()));
                }
                for text in [&forms.single, &forms.plural, &forms.amount] {
                    placeholders_after("tags", &tag.id, text, PlaceholderKind::Tag)?;
                }
            }
        }

        // Value phrases also stand in for durations, so they must only
        // hold placeholders resolved after both.
        for value in &self.values {
            if let ValueKind::Phrase { own, opponent, .. } = &value.kind {
                for text in [own, opponent] {
                    placeholders_after("values", &value.id, text, PlaceholderKind::Duration)?;
                }
            }
        }

        self.naming.validate()
    }
}

impl NamingPools {
    fn validate(&self) -> Result<(), TableError> {
        non_empty_table("themes", &self.themes)?;
        for theme in &self.themes {
            non_empty_pool(&format!("themes.{}", theme.key), &theme.words)?;
        }
        non_empty_pool("default_theme", &self.default_theme)?;

        for rarity in Rarity::ALL {
            let pool = self
                .rarity_prefixes
                .get(&rarity)
                .ok_or_else(|| TableError::MissingTier(rarity.label().to_string()))?;
            non_empty_pool(&format!("rarity_prefixes.{}", rarity.label()), pool)?;
        }
        for size in Size::ALL {
            let pool = self
                .size_nouns
                .get(&size)
                .ok_or_else(|| TableError::MissingTier(size.label().to_string()))?;
            non_empty_pool(&format!("size_nouns.{}", size.label()), pool)?;
        }

        non_empty_pool("speed.fast", &self.speed.fast)?;
        non_empty_pool("speed.balanced", &self.speed.balanced)?;
        non_empty_pool("speed.heavy", &self.speed.heavy)?;
        non_empty_pool("flavor_words", &self.flavor_words)?;
        non_empty_pool("frame_nouns", &self.frame_nouns)?;
        non_empty_pool("skill.speed", &self.skill.speed)?;
        non_empty_pool("skill.power", &self.skill.power)?;
        non_empty_pool("skill.quirky", &self.skill.quirky)?;
        non_empty_pool("skill.elemental", &self.skill.elemental)?;
        non_empty_pool("skill.actions", &self.skill.actions)?;
        Ok(())
    }
}

fn non_empty_table<T>(name: &'static str, items: &[T]) -> Result<(), TableError> {
    if items.is_empty() {
        return Err(TableError::EmptyTable(name));
    }
    Ok(())
}

fn non_empty_pool(name: &str, words: &[String]) -> Result<(), TableError> {
    if words.is_empty() {
        return Err(TableError::EmptyPool(name.to_string()));
    }
    Ok(())
}

fn placeholders_after(
    table: &'static str,
    id: &str,
    text: &str,
    resolved: PlaceholderKind,
) -> Result<(), TableError> {
    match Template::parse(text)
        .placeholders()
        .find(|kind| *kind <= resolved)
    {
        Some(found) => Err(TableError::PlaceholderOrder {
            table,
            id: id.to_string(),
            found,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_tables_load() {
        let tables = ContentTables::bundled().unwrap();
        assert!(tables.keywords.iter().any(|k| k == "PROPERTIES"));
        assert!(tables.tags.iter().any(|t| t.id == "ANY"));
        assert!(tables.effects.iter().any(|e| e.id == "USE"));
        assert!(tables.triggers.iter().any(|t| t.id == "FIRST_USE_TAG"));
        assert_eq!(
            tables.irregular_plurals.get("PROPERTIES").map(String::as_str),
            Some("PROPERTY")
        );
    }

    #[test]
    fn bundled_theme_order_is_declaration_order() {
        let tables = ContentTables::bundled().unwrap();
        let keys: Vec<&str> = tables
            .naming
            .themes
            .iter()
            .map(|t| t.key.as_str())
            .collect();
        assert_eq!(
            keys,
            vec!["poison", "burn", "freeze", "haste", "slow", "heal", "shield"]
        );
    }

    #[test]
    fn plain_number_has_no_single_item_phrase() {
        let tables = ContentTables::bundled().unwrap();
        let number = tables.values.iter().find(|v| v.id == "NUMBER").unwrap();
        assert_eq!(number.kind, ValueKind::PlainNumber);
        assert!(number.single_item_phrase().is_none());

        let damage = tables.values.iter().find(|v| v.id == "DAMAGE").unwrap();
        assert_eq!(damage.single_item_phrase(), Some("this item's damage"));
    }

    #[test]
    fn empty_rarity_pool_is_fatal() {
        let mut tables = ContentTables::bundled().unwrap();
        tables
            .naming
            .rarity_prefixes
            .insert(Rarity::Gold, Vec::new());
        let err = tables.validate().unwrap_err();
        assert!(matches!(err, TableError::EmptyPool(ref name) if name == "rarity_prefixes.Gold"));
    }

    #[test]
    fn missing_size_tier_is_fatal() {
        let mut tables = ContentTables::bundled().unwrap();
        tables.naming.size_nouns.remove(&Size::Large);
        assert!(matches!(
            tables.validate(),
            Err(TableError::MissingTier(ref tier)) if tier == "Large"
        ));
    }

    #[test]
    fn empty_effects_table_is_fatal() {
        let mut tables = ContentTables::bundled().unwrap();
        tables.effects.clear();
        assert!(matches!(
            tables.validate(),
            Err(TableError::EmptyTable("effects"))
        ));
    }

    #[test]
    fn value_phrase_may_not_reference_a_value() {
        let mut tables = ContentTables::bundled().unwrap();
        tables.values.push(ValueDescriptor {
            id: "LOOP".to_string(),
            kind: ValueKind::Phrase {
                own: "twice {Value}".to_string(),
                opponent: "your opponent's {Value}".to_string(),
                single_item: None,
                multipliable: false,
            },
        });
        let err = tables.validate().unwrap_err();
        assert!(matches!(
            err,
            TableError::PlaceholderOrder { found: PlaceholderKind::Value, .. }
        ));
    }

    #[test]
    fn value_phrase_may_reference_a_percent() {
        let tables = ContentTables::bundled().unwrap();
        let max_hp = tables.values.iter().find(|v| v.id == "MAX_HP").unwrap();
        match &max_hp.kind {
            ValueKind::Phrase { own, .. } => assert!(own.contains("{Percent}")),
            ValueKind::PlainNumber => panic!("MAX_HP should be a phrase"),
        }
    }

    #[test]
    fn tag_amount_needs_number() {
        let mut tables = ContentTables::bundled().unwrap();
        tables.tags[0].own.amount = "some items".to_string();
        assert!(matches!(
            tables.validate(),
            Err(TableError::MissingNumber(_))
        ));
    }

    #[test]
    fn malformed_ron_is_reported() {
        let err = ContentTables::parse_ron("ContentTables(keywords: [").unwrap_err();
        assert!(matches!(err, TableError::Ron(_)));
    }
}
