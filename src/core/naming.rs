/// Thematic naming for generated items and skills.

use rand::rngs::StdRng;
use rand::Rng;

use crate::core::grammar::normalize_whitespace;
use crate::core::selector::pick;
use crate::schema::descriptor::{Rarity, Size};
use crate::schema::tables::{NamingPools, ThemePool};

/// Cooldowns below this many seconds read as fast.
pub const FAST_BELOW: f32 = 3.0;
/// Cooldowns above this many seconds read as heavy.
pub const HEAVY_ABOVE: f32 = 10.0;
/// Chance a skill name gets a trailing action word.
pub const SKILL_ACTION_CHANCE: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedBucket {
    Fast,
    Balanced,
    Heavy,
}

impl SpeedBucket {
    /// Zero (passive items) counts as fast.
    pub fn from_cooldown(cooldown: f32) -> SpeedBucket {
        if cooldown < FAST_BELOW {
            SpeedBucket::Fast
        } else if cooldown > HEAVY_ABOVE {
            SpeedBucket::Heavy
        } else {
            SpeedBucket::Balanced
        }
    }
}

/// The fixed set of item name shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamePattern {
    /// "Gilded Ember"
    PrefixNoun,
    /// "Swift Ember"
    SpeedNoun,
    /// "Gilded Trinket"
    PrefixSizeNoun,
    /// "Ember of Trinket"
    NounOfSizeNoun,
    /// "Gilded Ember of Trinket"
    PrefixNounOfSizeNoun,
    /// "Gilded Ember of Ashes"
    PrefixNounOfFlavor,
    /// "Ember Engine"
    NounFrame,
    /// "Ember"
    Noun,
}

impl NamePattern {
    pub const ALL: [NamePattern; 8] = [
        NamePattern::PrefixNoun,
        NamePattern::SpeedNoun,
        NamePattern::PrefixSizeNoun,
        NamePattern::NounOfSizeNoun,
        NamePattern::PrefixNounOfSizeNoun,
        NamePattern::PrefixNounOfFlavor,
        NamePattern::NounFrame,
        NamePattern::Noun,
    ];
}

/// The words an item name can be assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameParts<'a> {
    pub prefix: &'a str,
    pub noun: &'a str,
    pub size_noun: &'a str,
    pub speed: &'a str,
    pub flavor: &'a str,
    pub frame: &'a str,
}

impl NameParts<'_> {
    pub fn assemble(&self, pattern: NamePattern) -> String {
        let raw = match pattern {
            NamePattern::PrefixNoun => format!("{} {}", self.prefix, self.noun),
            NamePattern::SpeedNoun => format!("{} {}", self.speed, self.noun),
            NamePattern::PrefixSizeNoun => format!("{} {}", self.prefix, self.size_noun),
            NamePattern::NounOfSizeNoun => format!("{} of {}", self.noun, self.size_noun),
            NamePattern::PrefixNounOfSizeNoun => {
                format!("{} {} of {}", self.prefix, self.noun, self.size_noun)
            }
            NamePattern::PrefixNounOfFlavor => {
                format!("{} {} of {}", self.prefix, self.noun, self.flavor)
            }
            NamePattern::NounFrame => format!("{} {}", self.noun, self.frame),
            NamePattern::Noun => self.noun.to_string(),
        };
        normalize_whitespace(&raw)
    }
}

/// Derives names from card text and item properties.
#[derive(Debug, Clone, Copy)]
pub struct NameSynthesizer<'a> {
    pools: &'a NamingPools,
}

impl<'a> NameSynthesizer<'a> {
    pub fn new(pools: &'a NamingPools) -> Self {
        Self { pools }
    }

    /// The first theme (in table order) whose key appears in the
    /// description.
    pub fn theme(&self, description: &str) -> Option<&'a ThemePool> {
        let lower = description.to_lowercase();
        self.pools
            .themes
            .iter()
            .find(|theme| lower.contains(theme.key.as_str()))
    }

    pub fn theme_key(&self, description: &str) -> Option<&'a str> {
        self.theme(description).map(|theme| theme.key.as_str())
    }

    /// Noun pool for a description, falling back to the default theme.
    pub fn theme_words(&self, description: &str) -> &'a [String] {
        match self.theme(description) {
            Some(theme) => theme.words.as_slice(),
            None => self.pools.default_theme.as_slice(),
        }
    }

    pub fn speed_words(&self, cooldown: f32) -> &'a [String] {
        match SpeedBucket::from_cooldown(cooldown) {
            SpeedBucket::Fast => self.pools.speed.fast.as_slice(),
            SpeedBucket::Balanced => self.pools.speed.balanced.as_slice(),
            SpeedBucket::Heavy => self.pools.speed.heavy.as_slice(),
        }
    }

    /// Draw one word for every name slot.
    pub fn draw_parts(
        &self,
        description: &str,
        cooldown: f32,
        size: Size,
        rarity: Rarity,
        rng: &mut StdRng,
    ) -> NameParts<'a> {
        NameParts {
            prefix: pick(rng, self.pools.rarity(rarity)).as_str(),
            noun: pick(rng, self.theme_words(description)).as_str(),
            size_noun: pick(rng, self.pools.size(size)).as_str(),
            speed: pick(rng, self.speed_words(cooldown)).as_str(),
            flavor: pick(rng, &self.pools.flavor_words).as_str(),
            frame: pick(rng, &self.pools.frame_nouns).as_str(),
        }
    }

    pub fn item_name(
        &self,
        description: &str,
        cooldown: f32,
        size: Size,
        rarity: Rarity,
        rng: &mut StdRng,
    ) -> String {
        let parts = self.draw_parts(description, cooldown, size, rarity, rng);
        parts.assemble(*pick(rng, &NamePattern::ALL))
    }

    /// Descriptor pool for a skill, chosen by what the skill does.
    pub fn skill_words(&self, description: &str, rng: &mut StdRng) -> &'a [String] {
        let lower = description.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));
        let skill = &self.pools.skill;

        if has(&["poison", "burn", "freeze"]) {
            skill.elemental.as_slice()
        } else if has(&["haste", "cooldown"]) {
            skill.speed.as_slice()
        } else if has(&["damage", "destroy"]) {
            skill.power.as_slice()
        } else {
            *pick(
                rng,
                &[
                    skill.quirky.as_slice(),
                    skill.actions.as_slice(),
                    skill.speed.as_slice(),
                    skill.power.as_slice(),
                ],
            )
        }
    }

    pub fn skill_name(&self, description: &str, rng: &mut StdRng) -> String {
        let words = self.skill_words(description, rng);
        let mut name = pick(rng, words).clone();
        if rng.gen_bool(SKILL_ACTION_CHANCE) {
            name.push(' ');
            name.push_str(pick(rng, &self.pools.skill.actions).as_str());
        }
        capitalize_words(&name)
    }
}

fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::ContentTables;
    use rand::SeedableRng;

    fn pools() -> NamingPools {
        ContentTables::bundled().unwrap().naming
    }

    fn contains(pool: &[String], word: &str) -> bool {
        pool.iter().any(|w| w == word)
    }

    #[test]
    fn speed_buckets() {
        assert_eq!(SpeedBucket::from_cooldown(0.0), SpeedBucket::Fast);
        assert_eq!(SpeedBucket::from_cooldown(2.0), SpeedBucket::Fast);
        assert_eq!(SpeedBucket::from_cooldown(3.0), SpeedBucket::Balanced);
        assert_eq!(SpeedBucket::from_cooldown(10.0), SpeedBucket::Balanced);
        assert_eq!(SpeedBucket::from_cooldown(10.5), SpeedBucket::Heavy);
    }

    #[test]
    fn first_declared_theme_wins() {
        let pools = pools();
        let names = NameSynthesizer::new(&pools);
        assert_eq!(names.theme_key("Burn and Poison equal to 4"), Some("poison"));
        assert_eq!(names.theme_key("Burn equal to your Regen"), Some("burn"));
        assert_eq!(names.theme_key("Destroy an item"), None);
        assert_eq!(names.theme_words("Destroy an item"), pools.default_theme.as_slice());
    }

    #[test]
    fn theme_match_ignores_case_and_markup() {
        let pools = pools();
        let names = NameSynthesizer::new(&pools);
        assert_eq!(
            names.theme_key("<span class=\"keyword-Freeze\">FREEZE</span> a Weapon"),
            Some("freeze")
        );
    }

    #[test]
    fn pattern_assembly() {
        let parts = NameParts {
            prefix: "Gilded",
            noun: "Ember",
            size_noun: "Trinket",
            speed: "Swift",
            flavor: "Ashes",
            frame: "Engine",
        };
        assert_eq!(parts.assemble(NamePattern::PrefixNoun), "Gilded Ember");
        assert_eq!(parts.assemble(NamePattern::NounOfSizeNoun), "Ember of Trinket");
        assert_eq!(
            parts.assemble(NamePattern::PrefixNounOfFlavor),
            "Gilded Ember of Ashes"
        );
        assert_eq!(parts.assemble(NamePattern::NounFrame), "Ember Engine");

        let spaced = NameParts {
            size_noun: "Oba  Head",
            ..parts
        };
        assert_eq!(spaced.assemble(NamePattern::PrefixSizeNoun), "Gilded Oba Head");
    }

    #[test]
    fn burn_gold_small_fast_draws_from_matching_pools() {
        let pools = pools();
        let names = NameSynthesizer::new(&pools);
        let burn = &pools.themes.iter().find(|t| t.key == "burn").unwrap().words;
        let gold = pools.rarity(Rarity::Gold);
        let small = pools.size(Size::Small);

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let parts = names.draw_parts("Burn equal to 12", 2.0, Size::Small, Rarity::Gold, &mut rng);
            assert!(contains(gold, parts.prefix));
            assert!(contains(burn, parts.noun));
            assert!(contains(small, parts.size_noun));
            assert!(contains(&pools.speed.fast, parts.speed));

            let name = names.item_name("Burn equal to 12", 2.0, Size::Small, Rarity::Gold, &mut rng);
            assert!(!name.is_empty());
            assert!(!name.contains("  "));
            assert_eq!(name, name.trim());
        }
    }

    #[test]
    fn passive_zero_cooldown_is_accepted() {
        let pools = pools();
        let names = NameSynthesizer::new(&pools);
        let mut rng = StdRng::seed_from_u64(1);
        let parts = names.draw_parts("Your items has +3 Regen", 0.0, Size::Large, Rarity::Legendary, &mut rng);
        assert!(contains(&pools.speed.fast, parts.speed));
    }

    #[test]
    fn every_pattern_is_reachable() {
        let pools = pools();
        let names = NameSynthesizer::new(&pools);
        let mut rng = StdRng::seed_from_u64(23);
        let mut with_of = 0;
        for _ in 0..2_000 {
            let name = names.item_name("Heal equal to 3", 5.0, Size::Medium, Rarity::Silver, &mut rng);
            if name.contains(" of ") {
                with_of += 1;
            }
        }
        // Three of the eight patterns contain " of ".
        let ratio = with_of as f64 / 2_000.0;
        assert!((ratio - 3.0 / 8.0).abs() < 0.05, "ratio {}", ratio);
    }

    #[test]
    fn skill_pools_follow_keywords() {
        let pools = pools();
        let names = NameSynthesizer::new(&pools);
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(
            names.skill_words("freeze an item for 1.0s", &mut rng),
            pools.skill.elemental.as_slice()
        );
        assert_eq!(
            names.skill_words("reduce your items' Cooldown by 20%", &mut rng),
            pools.skill.speed.as_slice()
        );
        assert_eq!(
            names.skill_words("deal 20 damage", &mut rng),
            pools.skill.power.as_slice()
        );
    }

    #[test]
    fn skill_names_are_capitalized() {
        let pools = pools();
        let names = NameSynthesizer::new(&pools);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let name = names.skill_name("use an item", &mut rng);
            assert!(!name.is_empty());
            for word in name.split(' ') {
                assert!(word.chars().next().unwrap().is_uppercase(), "{}", name);
            }
        }
    }

    #[test]
    fn capitalize_words_handles_each_word() {
        assert_eq!(capitalize_words("quick strike"), "Quick Strike");
    }
}
