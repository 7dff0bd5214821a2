/// Passive statements — "{Tag} has {value} {Attribute}".

use rand::rngs::StdRng;
use rand::Rng;
use std::ops::RangeInclusive;

use crate::core::selector::{pick, Selector};

/// Chance a passive scales with a value phrase instead of a flat number.
pub const SCALING_CHANCE: f64 = 0.5;
/// Flat cooldown change, in whole seconds.
pub const COOLDOWN_RANGE: RangeInclusive<i32> = -10..=10;
/// Percentage cooldown change, in tenths of a percent.
pub const COOLDOWN_PERCENT_TENTHS: RangeInclusive<i32> = -1000..=1000;
pub const LARGE_STAT_RANGE: RangeInclusive<i32> = -100..=100;
pub const SMALL_STAT_RANGE: RangeInclusive<i32> = -10..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassiveAttribute {
    Cooldown,
    CooldownPercent,
    Regen,
    Heal,
    Shield,
    Damage,
    Poison,
    Burn,
}

impl PassiveAttribute {
    pub const ALL: [PassiveAttribute; 8] = [
        PassiveAttribute::Cooldown,
        PassiveAttribute::CooldownPercent,
        PassiveAttribute::Regen,
        PassiveAttribute::Heal,
        PassiveAttribute::Shield,
        PassiveAttribute::Damage,
        PassiveAttribute::Poison,
        PassiveAttribute::Burn,
    ];

    pub fn draw(rng: &mut StdRng) -> PassiveAttribute {
        *pick(rng, &PassiveAttribute::ALL)
    }

    /// The word printed after the value. Both cooldown attributes read
    /// "Cooldown"; the percentage form carries its "%" on the value.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cooldown | Self::CooldownPercent => "Cooldown",
            Self::Regen => "Regen",
            Self::Heal => "Heal",
            Self::Shield => "Shield",
            Self::Damage => "Damage",
            Self::Poison => "Poison",
            Self::Burn => "Burn",
        }
    }

    /// Draw a signed flat value for this attribute.
    pub fn draw_value(&self, rng: &mut StdRng) -> String {
        match self {
            Self::Cooldown => format!("{}s", signed(rng.gen_range(COOLDOWN_RANGE))),
            Self::CooldownPercent => {
                format!("{}%", signed_tenths(rng.gen_range(COOLDOWN_PERCENT_TENTHS)))
            }
            Self::Heal | Self::Shield | Self::Damage => signed(rng.gen_range(LARGE_STAT_RANGE)),
            Self::Regen | Self::Poison | Self::Burn => signed(rng.gen_range(SMALL_STAT_RANGE)),
        }
    }
}

/// What a passive's attribute is set to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassiveValue {
    Flat(String),
    /// Scales with a value phrase, which may still hold a `{Percent}`.
    Scaling(String),
}

impl PassiveValue {
    /// A plain-number pick has no phrase, so the attribute keeps its own
    /// flat value.
    pub fn draw(
        attribute: PassiveAttribute,
        selector: &Selector<'_>,
        rng: &mut StdRng,
    ) -> PassiveValue {
        if rng.gen_bool(SCALING_CHANCE) {
            if let Some(phrase) = selector.scaling_phrase(rng) {
                return PassiveValue::Scaling(phrase);
            }
        }
        PassiveValue::Flat(attribute.draw_value(rng))
    }
}

pub fn compose(tag: &str, value: &PassiveValue, attribute: PassiveAttribute) -> String {
    match value {
        PassiveValue::Flat(flat) => format!("{} has {} {}", tag, flat, attribute.label()),
        PassiveValue::Scaling(phrase) => {
            format!("{} has {} as {}", tag, phrase, attribute.label())
        }
    }
}

fn signed(n: i32) -> String {
    if n > 0 {
        format!("+{n}")
    } else {
        n.to_string()
    }
}

fn signed_tenths(tenths: i32) -> String {
    let text = format!("{:.1}", tenths as f64 / 10.0);
    if tenths > 0 {
        format!("+{text}")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{ContentTables, ValueKind};
    use rand::SeedableRng;

    const TOLERANCE: f64 = 0.02;

    fn assert_ratio(label: &str, hits: usize, total: usize, expected: f64) {
        let ratio = hits as f64 / total as f64;
        assert!(
            (ratio - expected).abs() < TOLERANCE,
            "{}: expected ~{:.3}, got {:.4} ({}/{})",
            label,
            expected,
            ratio,
            hits,
            total
        );
    }

    #[test]
    fn compose_flat_value() {
        let text = compose(
            "your items",
            &PassiveValue::Flat("-42".to_string()),
            PassiveAttribute::Heal,
        );
        assert_eq!(text, "your items has -42 Heal");
    }

    #[test]
    fn compose_scaling_value() {
        let value = PassiveValue::Scaling("twice your Regen".to_string());
        let text = compose("an item", &value, PassiveAttribute::Burn);
        assert_eq!(text, "an item has twice your Regen as Burn");
    }

    #[test]
    fn signs() {
        assert_eq!(signed(7), "+7");
        assert_eq!(signed(0), "0");
        assert_eq!(signed(-3), "-3");
        assert_eq!(signed_tenths(123), "+12.3");
        assert_eq!(signed_tenths(-5), "-0.5");
        assert_eq!(signed_tenths(0), "0.0");
        assert_eq!(signed_tenths(1000), "+100.0");
    }

    fn parse_signed(text: &str) -> f64 {
        text.trim_start_matches('+').parse().unwrap()
    }

    #[test]
    fn drawn_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2_000 {
            for attribute in PassiveAttribute::ALL {
                let value = attribute.draw_value(&mut rng);
                let (number, limit) = match attribute {
                    PassiveAttribute::Cooldown => {
                        assert!(value.ends_with('s'), "{value}");
                        (parse_signed(value.trim_end_matches('s')), 10.0)
                    }
                    PassiveAttribute::CooldownPercent => {
                        assert!(value.ends_with('%'), "{value}");
                        let digits = value.trim_end_matches('%');
                        assert_eq!(digits.split('.').nth(1).map(str::len), Some(1));
                        (parse_signed(digits), 100.0)
                    }
                    PassiveAttribute::Heal
                    | PassiveAttribute::Shield
                    | PassiveAttribute::Damage => (parse_signed(&value), 100.0),
                    PassiveAttribute::Regen
                    | PassiveAttribute::Poison
                    | PassiveAttribute::Burn => (parse_signed(&value), 10.0),
                };
                assert!((-limit..=limit).contains(&number), "{attribute:?}: {value}");
                assert_eq!(value.starts_with('+'), number > 0.0, "{value}");
            }
        }
    }

    #[test]
    fn scaling_split_and_plain_number_fallback() {
        let tables = ContentTables::bundled().unwrap();
        let selector = Selector::new(&tables);
        let phrases = tables
            .values
            .iter()
            .filter(|v| !matches!(v.kind, ValueKind::PlainNumber))
            .count();
        let expected = SCALING_CHANCE * phrases as f64 / tables.values.len() as f64;

        let mut rng = StdRng::seed_from_u64(5);
        let draws = 10_000;
        let mut scaling = 0;
        for _ in 0..draws {
            match PassiveValue::draw(PassiveAttribute::Cooldown, &selector, &mut rng) {
                PassiveValue::Scaling(_) => scaling += 1,
                PassiveValue::Flat(flat) => {
                    assert!(flat.ends_with('s'), "{flat}");
                    let n = parse_signed(flat.trim_end_matches('s'));
                    assert!((-10.0..=10.0).contains(&n), "{flat}");
                }
            }
        }
        assert_ratio("scaling", scaling, draws, expected);
    }

    #[test]
    fn attributes_are_uniform() {
        let mut rng = StdRng::seed_from_u64(12);
        let draws = 16_000;
        let mut counts = [0usize; 8];
        for _ in 0..draws {
            let attribute = PassiveAttribute::draw(&mut rng);
            let slot = PassiveAttribute::ALL
                .iter()
                .position(|a| *a == attribute)
                .unwrap();
            counts[slot] += 1;
        }
        for (attribute, hits) in PassiveAttribute::ALL.iter().zip(counts) {
            assert_ratio(&format!("{attribute:?}"), hits, draws, 1.0 / 8.0);
        }
    }

    #[test]
    fn plain_number_only_tables_never_scale() {
        let mut tables = ContentTables::bundled().unwrap();
        tables.values.retain(|v| matches!(v.kind, ValueKind::PlainNumber));
        let selector = Selector::new(&tables);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..500 {
            let value = PassiveValue::draw(PassiveAttribute::Heal, &selector, &mut rng);
            let PassiveValue::Flat(flat) = value else {
                panic!("plain number produced a scaling value");
            };
            assert!((-100.0..=100.0).contains(&parse_signed(&flat)), "{flat}");
        }
    }

    #[test]
    fn labels() {
        assert_eq!(PassiveAttribute::CooldownPercent.label(), "Cooldown");
        assert_eq!(PassiveAttribute::Regen.label(), "Regen");
    }
}
