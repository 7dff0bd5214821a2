/// Weighted selectors — fixed-ratio random picks over the content tables.
///
/// Every ratio here is a design constant. Each pick reports the branch it
/// took alongside the rendered text, and the roll-to-branch mapping is
/// exposed as a pure function so the partitions can be checked exactly.

use rand::rngs::StdRng;
use rand::Rng;
use std::ops::RangeInclusive;

use crate::schema::tables::{ContentTables, Effect, SkillTrigger, Tag, ValueDescriptor, ValueKind};

/// Chance that a tag or value targets the opponent's side.
pub const OPPONENT_CHANCE: f64 = 0.5;
/// Tag form rolls below this render an amount ("3 Weapons").
pub const TAG_AMOUNT_BELOW: f64 = 0.2;
/// Tag form rolls below this (and at or above the amount band) render a plural.
pub const TAG_PLURAL_BELOW: f64 = 0.6;
pub const TAG_AMOUNT_RANGE: RangeInclusive<u32> = 2..=5;
/// Chance a multipliable value rolls for a "twice"/"triple" prefix.
pub const MULTIPLIER_CHANCE: f64 = 0.5;
pub const PLAIN_NUMBER_RANGE: RangeInclusive<u32> = 0..=100;
pub const PERCENT_RANGE: RangeInclusive<u32> = 0..=100;
pub const NUMERIC_DURATION_CHANCE: f64 = 0.9;
/// Durations are whole half-seconds in this range (0.5s to 4.0s).
pub const DURATION_HALF_SECONDS: RangeInclusive<u32> = 1..=8;
/// Chance that "the first {Times}" reads "the first time".
pub const SINGLE_TIME_CHANCE: f64 = 0.75;
pub const TIMES_RANGE: RangeInclusive<u32> = 2..=9;
pub const TRIGGER_OWN_FIRST_N_BELOW: f64 = 0.4;
pub const TRIGGER_OPPONENT_FIRST_N_BELOW: f64 = 0.5;
pub const TRIGGER_OPPONENT_BELOW: f64 = 0.75;

/// Which side of the board a phrase refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Own,
    Opponent,
}

impl Side {
    pub fn from_flag(opponent: bool) -> Side {
        if opponent {
            Side::Opponent
        } else {
            Side::Own
        }
    }
}

/// Grammatical form of a rendered tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagForm {
    Amount,
    Plural,
    Single,
}

impl TagForm {
    /// Map a roll in `[0, 1)` onto the 20/40/40 form partition.
    pub fn from_roll(roll: f64) -> TagForm {
        if roll < TAG_AMOUNT_BELOW {
            TagForm::Amount
        } else if roll < TAG_PLURAL_BELOW {
            TagForm::Plural
        } else {
            TagForm::Single
        }
    }
}

/// Render one form of a tag. `count` is only used by the amount form.
pub fn render_tag(tag: &Tag, side: Side, form: TagForm, count: u32) -> String {
    let forms = match side {
        Side::Own => &tag.own,
        Side::Opponent => &tag.opponent,
    };
    match form {
        TagForm::Amount => forms.amount.replace("{Number}", &count.to_string()),
        TagForm::Plural => forms.plural.clone(),
        TagForm::Single => forms.single.clone(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagPick<'a> {
    pub tag: &'a Tag,
    pub side: Side,
    pub form: TagForm,
    pub text: String,
}

/// Optional intensity prefix on a value phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplier {
    Once,
    Twice,
    Triple,
}

impl Multiplier {
    pub const ALL: [Multiplier; 3] = [Multiplier::Once, Multiplier::Twice, Multiplier::Triple];

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Once => "",
            Self::Twice => "twice ",
            Self::Triple => "triple ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuePick<'a> {
    pub value: &'a ValueDescriptor,
    pub side: Side,
    pub multiplier: Multiplier,
    pub text: String,
    /// Set when a bare number replaced a value that read "... as ...";
    /// the caller drops the following "as".
    pub strip_as: bool,
}

/// A rendered duration.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationPick {
    Seconds(f32),
    Number(u32),
    Phrase(String),
}

impl DurationPick {
    pub fn render(&self) -> String {
        match self {
            Self::Seconds(secs) => format!("{:.1}s", secs),
            Self::Number(n) => n.to_string(),
            Self::Phrase(text) => text.clone(),
        }
    }
}

/// How many occurrences a "the first {Times}" trigger counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Times {
    Once,
    Count(u32),
}

impl Times {
    pub fn from_roll(roll: f64, count: u32) -> Times {
        if roll < SINGLE_TIME_CHANCE {
            Times::Once
        } else {
            Times::Count(count)
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Once => "time".to_string(),
            Self::Count(n) => format!("{} times", n),
        }
    }
}

/// Which of a trigger's four phrasings to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerVariant {
    OwnFirstN,
    OpponentFirstN,
    Opponent,
    Own,
}

impl TriggerVariant {
    /// Map a roll in `[0, 1)` onto the 40/10/25/25 variant partition.
    pub fn from_roll(roll: f64) -> TriggerVariant {
        if roll < TRIGGER_OWN_FIRST_N_BELOW {
            TriggerVariant::OwnFirstN
        } else if roll < TRIGGER_OPPONENT_FIRST_N_BELOW {
            TriggerVariant::OpponentFirstN
        } else if roll < TRIGGER_OPPONENT_BELOW {
            TriggerVariant::Opponent
        } else {
            TriggerVariant::Own
        }
    }

    pub fn phrase<'a>(&self, trigger: &'a SkillTrigger) -> &'a str {
        match self {
            Self::OwnFirstN => &trigger.own_first_n,
            Self::OpponentFirstN => &trigger.opponent_first_n,
            Self::Opponent => &trigger.opponent,
            Self::Own => &trigger.own,
        }
    }
}

/// Uniform pick from a slice. Table pools are validated non-empty at load.
pub(crate) fn pick<'t, T>(rng: &mut StdRng, items: &'t [T]) -> &'t T {
    &items[rng.gen_range(0..items.len())]
}

fn draw_multiplier(multipliable: bool, rng: &mut StdRng) -> Multiplier {
    if multipliable && rng.gen_bool(MULTIPLIER_CHANCE) {
        *pick(rng, &Multiplier::ALL)
    } else {
        Multiplier::Once
    }
}

/// Draws phrases from a validated table set.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    tables: &'a ContentTables,
}

impl<'a> Selector<'a> {
    pub fn new(tables: &'a ContentTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a ContentTables {
        self.tables
    }

    pub fn tag(&self, rng: &mut StdRng) -> TagPick<'a> {
        let tag = pick(rng, &self.tables.tags);
        let side = Side::from_flag(rng.gen_bool(OPPONENT_CHANCE));
        let form = TagForm::from_roll(rng.gen::<f64>());
        let count = match form {
            TagForm::Amount => rng.gen_range(TAG_AMOUNT_RANGE),
            TagForm::Plural | TagForm::Single => 0,
        };
        TagPick {
            tag,
            side,
            form,
            text: render_tag(tag, side, form, count),
        }
    }

    /// Pick a value phrase. `as_flag` tells the selector the template reads
    /// "{Value} as ...", so a bare number should drop that "as".
    pub fn value(&self, rng: &mut StdRng, as_flag: bool) -> ValuePick<'a> {
        let value = pick(rng, &self.tables.values);
        let side = Side::from_flag(rng.gen_bool(OPPONENT_CHANCE));

        match &value.kind {
            ValueKind::PlainNumber => ValuePick {
                value,
                side,
                multiplier: Multiplier::Once,
                text: rng.gen_range(PLAIN_NUMBER_RANGE).to_string(),
                strip_as: as_flag,
            },
            ValueKind::Phrase {
                own,
                opponent,
                multipliable,
                ..
            } => {
                let multiplier = draw_multiplier(*multipliable, rng);
                let phrase = match side {
                    Side::Own => own,
                    Side::Opponent => opponent,
                };
                ValuePick {
                    value,
                    side,
                    multiplier,
                    text: format!("{}{}", multiplier.prefix(), phrase),
                    strip_as: false,
                }
            }
        }
    }

    /// Own-side phrase for something that scales with a value, e.g.
    /// "twice the value of your items". `None` when the pick is the plain
    /// number, which has no phrase.
    pub fn scaling_phrase(&self, rng: &mut StdRng) -> Option<String> {
        let value = pick(rng, &self.tables.values);
        match &value.kind {
            ValueKind::PlainNumber => None,
            ValueKind::Phrase {
                own, multipliable, ..
            } => {
                let multiplier = draw_multiplier(*multipliable, rng);
                Some(format!("{}{}", multiplier.prefix(), own))
            }
        }
    }

    pub fn duration(&self, rng: &mut StdRng) -> DurationPick {
        if rng.gen_bool(NUMERIC_DURATION_CHANCE) {
            let halves = rng.gen_range(DURATION_HALF_SECONDS);
            return DurationPick::Seconds(halves as f32 * 0.5);
        }
        match &pick(rng, &self.tables.values).kind {
            ValueKind::PlainNumber => DurationPick::Number(rng.gen_range(PLAIN_NUMBER_RANGE)),
            ValueKind::Phrase { own, .. } => DurationPick::Phrase(own.clone()),
        }
    }

    pub fn percent(&self, rng: &mut StdRng) -> u32 {
        rng.gen_range(PERCENT_RANGE)
    }

    pub fn times(&self, rng: &mut StdRng) -> Times {
        let roll = rng.gen::<f64>();
        let count = if roll < SINGLE_TIME_CHANCE {
            0
        } else {
            rng.gen_range(TIMES_RANGE)
        };
        Times::from_roll(roll, count)
    }

    pub fn trigger(&self, rng: &mut StdRng) -> (&'a SkillTrigger, TriggerVariant) {
        let trigger = pick(rng, &self.tables.triggers);
        (trigger, TriggerVariant::from_roll(rng.gen::<f64>()))
    }

    pub fn effect(&self, rng: &mut StdRng) -> &'a Effect {
        pick(rng, &self.tables.effects)
    }
}
