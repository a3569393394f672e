//! Check-in item domain model.
//!
//! # Responsibility
//! - Define the habit definition users tap on every day.
//! - Own the fixed category/color catalogs and icon fallback rules.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `target_count` is always >= 1.
//! - Persisted items never carry a blank `title`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier for a check-in item.
pub type ItemId = Uuid;

/// Glyph stored when the caller leaves the icon blank.
pub const FALLBACK_ICON: &str = "star";
/// Lowest accepted daily target.
pub const TARGET_COUNT_MIN: u32 = 1;
/// Highest daily target the creation form offers.
pub const TARGET_COUNT_MAX: u32 = 20;

/// Symbol names offered by the add-item form, in picker order.
pub const ICON_SUGGESTIONS: &[&str] = &[
    "flame.fill",
    "figure.walk",
    "figure.run",
    "fork.knife",
    "book.closed.fill",
    "moon.stars.fill",
    "drop.fill",
    "heart.fill",
    "sparkles",
    "leaf.fill",
    "cross.vial.fill",
    "pills",
    "brain.head.profile",
    "figure.mind.and.body",
    "sunrise.fill",
    "bed.double.fill",
    "hourglass.bottomhalf.fill",
];

/// Habit grouping shown in the category picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Wellness,
    Fitness,
    Nutrition,
    Sleep,
    Mindfulness,
    Productivity,
    Learning,
    Social,
    Chores,
    Finance,
}

impl Category {
    /// All categories in picker order.
    pub const ALL: [Category; 10] = [
        Self::Wellness,
        Self::Fitness,
        Self::Nutrition,
        Self::Sleep,
        Self::Mindfulness,
        Self::Productivity,
        Self::Learning,
        Self::Social,
        Self::Chores,
        Self::Finance,
    ];

    /// Stable storage/wire id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wellness => "wellness",
            Self::Fitness => "fitness",
            Self::Nutrition => "nutrition",
            Self::Sleep => "sleep",
            Self::Mindfulness => "mindfulness",
            Self::Productivity => "productivity",
            Self::Learning => "learning",
            Self::Social => "social",
            Self::Chores => "chores",
            Self::Finance => "finance",
        }
    }

    /// English display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Wellness => "Wellness",
            Self::Fitness => "Fitness",
            Self::Nutrition => "Nutrition",
            Self::Sleep => "Sleep",
            Self::Mindfulness => "Mindfulness",
            Self::Productivity => "Productivity",
            Self::Learning => "Learning",
            Self::Social => "Social",
            Self::Chores => "Chores",
            Self::Finance => "Finance",
        }
    }

    /// Parses a storage id produced by [`Category::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }
}

impl FromStr for Category {
    type Err = ItemValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value.trim()).ok_or_else(|| ItemValidationError::UnknownCategory(value.into()))
    }
}

/// Accent color of an item card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeColor {
    #[default]
    Ember,
    Mint,
    Tide,
    Starlight,
    Mist,
    Blush,
    Aura,
    Grove,
}

impl ThemeColor {
    /// All colors in picker order.
    pub const ALL: [ThemeColor; 8] = [
        Self::Ember,
        Self::Mint,
        Self::Tide,
        Self::Starlight,
        Self::Mist,
        Self::Blush,
        Self::Aura,
        Self::Grove,
    ];

    /// Stable storage/wire id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ember => "ember",
            Self::Mint => "mint",
            Self::Tide => "tide",
            Self::Starlight => "starlight",
            Self::Mist => "mist",
            Self::Blush => "blush",
            Self::Aura => "aura",
            Self::Grove => "grove",
        }
    }

    /// English display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ember => "Ember",
            Self::Mint => "Mint",
            Self::Tide => "Tide",
            Self::Starlight => "Starlight",
            Self::Mist => "Mist",
            Self::Blush => "Blush",
            Self::Aura => "Aura",
            Self::Grove => "Grove",
        }
    }

    /// Parses a storage id produced by [`ThemeColor::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.as_str() == value)
    }
}

impl FromStr for ThemeColor {
    type Err = ItemValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value.trim()).ok_or_else(|| ItemValidationError::UnknownColor(value.into()))
    }
}

/// Validation errors for item invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemValidationError {
    #[error("item id must not be nil")]
    NilId,
    #[error("item title must not be blank")]
    BlankTitle,
    #[error("target_count must be >= 1, got {0}")]
    TargetCountTooLow(u32),
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("unknown color `{0}`")]
    UnknownColor(String),
}

/// A user-defined habit tracked once per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CheckInItemWire")]
pub struct CheckInItem {
    pub id: ItemId,
    pub title: String,
    pub category: Category,
    pub icon: String,
    pub color: ThemeColor,
    /// Completions per day required to count the item as done.
    pub target_count: u32,
    /// Unix epoch milliseconds. Drives display order.
    pub created_at: i64,
}

#[derive(Deserialize)]
struct CheckInItemWire {
    id: ItemId,
    title: String,
    category: Category,
    icon: String,
    color: ThemeColor,
    target_count: i64,
    created_at: i64,
}

impl TryFrom<CheckInItemWire> for CheckInItem {
    type Error = ItemValidationError;

    fn try_from(wire: CheckInItemWire) -> Result<Self, Self::Error> {
        let mut item = Self::with_id(
            wire.id,
            wire.title,
            wire.category,
            wire.icon,
            wire.color,
            wire.target_count,
            wire.created_at,
        )?;
        item.title = item.title.trim().to_string();
        item.validate()?;
        Ok(item)
    }
}

impl CheckInItem {
    /// Creates an item with a generated id.
    ///
    /// `target_count` below 1 is clamped up. Title and icon are stored as
    /// given; trimming and the icon fallback belong to the creation flow.
    pub fn new(
        title: impl Into<String>,
        category: Category,
        icon: impl Into<String>,
        color: ThemeColor,
        target_count: i64,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category,
            icon: icon.into(),
            color,
            target_count: clamp_target_count(target_count),
            created_at,
        }
    }

    /// Creates an item with a caller-provided id.
    ///
    /// # Errors
    /// - Returns `NilId` for `Uuid::nil()`.
    pub fn with_id(
        id: ItemId,
        title: impl Into<String>,
        category: Category,
        icon: impl Into<String>,
        color: ThemeColor,
        target_count: i64,
        created_at: i64,
    ) -> Result<Self, ItemValidationError> {
        if id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        Ok(Self {
            id,
            title: title.into(),
            category,
            icon: icon.into(),
            color,
            target_count: clamp_target_count(target_count),
            created_at,
        })
    }

    /// Checks persisted-state invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(ItemValidationError::BlankTitle);
        }
        if self.target_count < TARGET_COUNT_MIN {
            return Err(ItemValidationError::TargetCountTooLow(self.target_count));
        }
        Ok(())
    }
}

/// Clamps any integer input up to a valid daily target.
pub fn clamp_target_count(value: i64) -> u32 {
    u32::try_from(value.max(i64::from(TARGET_COUNT_MIN))).unwrap_or(u32::MAX)
}

/// Trims an icon name and substitutes [`FALLBACK_ICON`] when blank.
pub fn sanitize_icon(icon: &str) -> String {
    let trimmed = icon.trim();
    if trimmed.is_empty() {
        FALLBACK_ICON.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Demo items used to seed an empty board.
pub fn sample_items(created_at: i64) -> Vec<CheckInItem> {
    [
        ("Fat Burn", Category::Fitness, "flame.fill", ThemeColor::Ember),
        ("Walking", Category::Fitness, "figure.walk", ThemeColor::Mint),
        ("Reading", Category::Learning, "book.closed.fill", ThemeColor::Tide),
        ("Lights Out", Category::Sleep, "moon.stars.fill", ThemeColor::Starlight),
    ]
    .into_iter()
    .enumerate()
    .map(|(offset, (title, category, icon, color))| {
        let created_at = created_at.saturating_add(offset as i64);
        CheckInItem::new(title, category, icon, color, 1, created_at)
    })
    .collect()
}
