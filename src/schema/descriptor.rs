use serde::{Deserialize, Serialize};

/// Whether a card is an item or a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Item,
    Skill,
}

impl Kind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Skill => "Skill",
        }
    }
}

/// Whether a card does something on use or applies a standing modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    Active,
    Passive,
}

/// Item size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

/// Item rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Bronze,
    Silver,
    Gold,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Bronze,
        Rarity::Silver,
        Rarity::Gold,
        Rarity::Legendary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Legendary => "Legendary",
        }
    }
}

/// Item-only card properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    /// Cooldown in seconds. Always a multiple of 0.5; zero for passives.
    pub cooldown: f32,
    pub size: Size,
    pub rarity: Rarity,
    /// Multicast count, 0 when the item has none.
    pub multicast: u8,
}

impl ItemStats {
    /// Cooldown formatted with one decimal and a trailing unit, e.g. "4.5s".
    pub fn cooldown_label(&self) -> String {
        format!("{:.1}s", self.cooldown)
    }
}

/// A fully generated card, ready for a display sink.
///
/// `description` already carries keyword markup and has no unresolved
/// placeholders left in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub kind: Kind,
    pub activity: Activity,
    pub name: String,
    pub description: String,
    /// Present only when `kind` is `Kind::Item`.
    pub item: Option<ItemStats>,
}

impl Descriptor {
    pub fn is_item(&self) -> bool {
        self.kind == Kind::Item
    }

    pub fn is_passive(&self) -> bool {
        self.activity == Activity::Passive
    }

    /// Header line such as "Item (Passive)" or "Skill".
    pub fn heading(&self) -> String {
        match self.activity {
            Activity::Active => self.kind.label().to_string(),
            Activity::Passive => format!("{} (Passive)", self.kind.label()),
        }
    }
}
