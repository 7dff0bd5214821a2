/// The card pipeline: shape → text → markup → name → display sink.
///
/// Wires together the weighted selectors, placeholder resolution, keyword
/// highlighting, and name synthesis.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::grammar::Resolver;
use crate::core::highlight::KeywordMatcher;
use crate::core::naming::NameSynthesizer;
use crate::core::passive::{self, PassiveAttribute, PassiveValue};
use crate::core::selector::{pick, Selector};
use crate::schema::descriptor::{Activity, Descriptor, ItemStats, Kind, Rarity, Size};
use crate::schema::tables::{ContentTables, TableError};

/// Chance a card is an item rather than a skill.
pub const ITEM_CHANCE: f64 = 0.5;
/// Chance a card is passive. Drawn independently of `ITEM_CHANCE`.
pub const PASSIVE_CHANCE: f64 = 0.3;
/// Active item cooldowns, in half seconds (0.5s to 15.0s).
pub const COOLDOWN_HALF_SECONDS: RangeInclusive<u32> = 1..=30;
/// Multicast counts for active items; 0 means none.
pub const MULTICAST_CHOICES: [u8; 4] = [0, 2, 3, 4];

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("table error: {0}")]
    Tables(#[from] TableError),
    #[error("tables file not found: {0}")]
    TablesNotFound(String),
}

/// Receives finished cards. Generation never hands over a partial card.
pub trait DisplaySink {
    fn display(&mut self, descriptor: &Descriptor);
}

impl DisplaySink for Vec<Descriptor> {
    fn display(&mut self, descriptor: &Descriptor) {
        self.push(descriptor.clone());
    }
}

/// One of the four card shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub kind: Kind,
    pub activity: Activity,
}

impl Shape {
    pub fn from_flags(is_item: bool, is_passive: bool) -> Shape {
        Shape {
            kind: if is_item { Kind::Item } else { Kind::Skill },
            activity: if is_passive {
                Activity::Passive
            } else {
                Activity::Active
            },
        }
    }

    pub fn draw(rng: &mut StdRng) -> Shape {
        let is_item = rng.gen_bool(ITEM_CHANCE);
        let is_passive = rng.gen_bool(PASSIVE_CHANCE);
        Shape::from_flags(is_item, is_passive)
    }
}

/// The top-level card generator. Built via `CardEngine::builder()`.
#[derive(Debug)]
pub struct CardEngine {
    tables: ContentTables,
    matcher: KeywordMatcher,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing a `CardEngine`.
pub struct CardEngineBuilder {
    tables_path: Option<String>,
    seed: u64,
    /// Directly provided tables (for testing without files).
    tables: Option<ContentTables>,
}

impl CardEngine {
    pub fn builder() -> CardEngineBuilder {
        CardEngineBuilder {
            tables_path: None,
            seed: 0,
            tables: None,
        }
    }

    pub fn tables(&self) -> &ContentTables {
        &self.tables
    }

    pub fn matcher(&self) -> &KeywordMatcher {
        &self.matcher
    }

    /// Number of cards produced by `generate` so far.
    pub fn generation_count(&self) -> u64 {
        self.generation_count
    }

    /// Generate the next card of this engine's seeded sequence.
    pub fn generate(&mut self) -> Descriptor {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.generation_count));
        self.generation_count += 1;
        self.generate_with(&mut rng)
    }

    /// Generate a card and hand it to `sink`.
    pub fn generate_into<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) {
        let descriptor = self.generate();
        sink.display(&descriptor);
    }

    pub fn generate_batch(&mut self, count: usize) -> Vec<Descriptor> {
        let mut cards = Vec::with_capacity(count);
        for _ in 0..count {
            self.generate_into(&mut cards);
        }
        cards
    }

    /// Generate a card from a caller-supplied random stream.
    pub fn generate_with(&self, rng: &mut StdRng) -> Descriptor {
        let shape = Shape::draw(rng);
        self.generate_shape(shape, rng)
    }

    pub fn generate_shape(&self, shape: Shape, rng: &mut StdRng) -> Descriptor {
        debug!(kind = ?shape.kind, activity = ?shape.activity, "generating card");
        let descriptor = match shape.activity {
            Activity::Passive => self.passive_card(shape.kind, rng),
            Activity::Active => self.active_card(shape.kind, rng),
        };
        debug!(name = %descriptor.name, "card generated");
        descriptor
    }

    fn passive_card(&self, kind: Kind, rng: &mut StdRng) -> Descriptor {
        let plain = self.draw_passive(rng);
        let names = NameSynthesizer::new(&self.tables.naming);

        let (name, item) = match kind {
            Kind::Item => {
                let stats = ItemStats {
                    cooldown: 0.0,
                    size: *pick(rng, &Size::ALL),
                    rarity: *pick(rng, &Rarity::ALL),
                    multicast: 0,
                };
                let name = names.item_name(&plain, stats.cooldown, stats.size, stats.rarity, rng);
                (name, Some(stats))
            }
            Kind::Skill => (names.skill_name(&plain, rng), None),
        };

        Descriptor {
            kind,
            activity: Activity::Passive,
            name,
            description: self.highlighted_sentence(&plain),
            item,
        }
    }

    fn active_card(&self, kind: Kind, rng: &mut StdRng) -> Descriptor {
        let selector = Selector::new(&self.tables);
        let effect = selector.effect(rng);
        debug!(effect = %effect.id, "effect picked");
        let plain = Resolver::new(selector).resolve(&effect.text, rng);
        let names = NameSynthesizer::new(&self.tables.naming);

        match kind {
            Kind::Item => {
                let plain = capitalize_first(&plain);
                let stats = ItemStats {
                    cooldown: rng.gen_range(COOLDOWN_HALF_SECONDS) as f32 * 0.5,
                    size: *pick(rng, &Size::ALL),
                    rarity: *pick(rng, &Rarity::ALL),
                    multicast: *pick(rng, &MULTICAST_CHOICES),
                };
                let name = names.item_name(&plain, stats.cooldown, stats.size, stats.rarity, rng);
                Descriptor {
                    kind,
                    activity: Activity::Active,
                    name,
                    description: self.highlighted_sentence(&plain),
                    item: Some(stats),
                }
            }
            Kind::Skill => {
                let name = names.skill_name(&plain, rng);
                let trigger = self.draw_trigger(rng);
                Descriptor {
                    kind,
                    activity: Activity::Active,
                    name,
                    description: self.skill_description(&trigger, &plain),
                    item: None,
                }
            }
        }
    }

    /// A resolved trigger phrase such as "When you use an item,".
    pub fn draw_trigger(&self, rng: &mut StdRng) -> String {
        let selector = Selector::new(&self.tables);
        let (trigger, variant) = selector.trigger(rng);
        debug!(trigger = %trigger.id, variant = ?variant, "trigger picked");
        Resolver::new(selector).resolve(variant.phrase(trigger), rng)
    }

    /// A resolved, capitalized passive statement without markup.
    pub fn draw_passive(&self, rng: &mut StdRng) -> String {
        let selector = Selector::new(&self.tables);
        let tag = selector.tag(rng);
        let attribute = PassiveAttribute::draw(rng);
        let value = PassiveValue::draw(attribute, &selector, rng);
        debug!(tag = %tag.tag.id, attribute = ?attribute, "passive picked");
        self.passive_statement(&tag.text, &value, attribute, rng)
    }

    pub fn passive_statement(
        &self,
        tag: &str,
        value: &PassiveValue,
        attribute: PassiveAttribute,
        rng: &mut StdRng,
    ) -> String {
        let template = passive::compose(tag, value, attribute);
        let resolved = Resolver::new(Selector::new(&self.tables)).resolve(&template, rng);
        capitalize_first(&resolved)
    }

    /// Join a trigger and an effect into a skill description. The effect
    /// continues the trigger's sentence, so its first letter is lowered.
    /// Each piece is highlighted on its own.
    pub fn skill_description(&self, trigger: &str, effect: &str) -> String {
        format!(
            "{} {}.",
            self.matcher.highlight(trigger),
            self.matcher.highlight(&lowercase_first(effect))
        )
    }

    pub fn highlighted_sentence(&self, text: &str) -> String {
        format!("{}.", self.matcher.highlight(text))
    }
}

impl CardEngineBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Load tables from a RON file instead of the bundled set.
    pub fn tables_file(mut self, path: &str) -> Self {
        self.tables_path = Some(path.to_string());
        self
    }

    /// Provide tables directly (for testing without files). Takes
    /// precedence over `tables_file`.
    pub fn with_tables(mut self, tables: ContentTables) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn build(self) -> Result<CardEngine, PipelineError> {
        let tables = match (self.tables, self.tables_path) {
            (Some(tables), _) => {
                tables.validate()?;
                tables
            }
            (None, Some(path)) => {
                if !Path::new(&path).exists() {
                    return Err(PipelineError::TablesNotFound(path));
                }
                ContentTables::load_from_ron(Path::new(&path))?
            }
            (None, None) => ContentTables::bundled()?,
        };

        let matcher = KeywordMatcher::from_tables(&tables);
        info!(
            keywords = tables.keywords.len(),
            tags = tables.tags.len(),
            effects = tables.effects.len(),
            values = tables.values.len(),
            triggers = tables.triggers.len(),
            seed = self.seed,
            "content tables loaded"
        );

        Ok(CardEngine {
            tables,
            matcher,
            seed: self.seed,
            generation_count: 0,
        })
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
