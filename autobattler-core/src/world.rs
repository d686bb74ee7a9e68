//! Combatant model.
//!
//! Contains the state of both sides of a battle: the player character, with
//! multi-class levels and per-battle combat modifiers, and monsters, with a
//! fixed stat block and feature tags.

use crate::items::{Weapon, WeaponType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for player characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// The three attributes shared by players and monsters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
}

impl Attributes {
    pub fn new(strength: i32, dexterity: i32, constitution: i32) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
        }
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "STR {} DEX {} CON {}",
            self.strength, self.dexterity, self.constitution
        )
    }
}

// ============================================================================
// Health
// ============================================================================

/// Hit point tracking. `current` always stays within `0..=maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub maximum: i32,
}

impl Health {
    pub fn new(maximum: i32) -> Self {
        let maximum = maximum.max(0);
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Subtract damage, flooring at zero. Negative amounts are ignored.
    pub fn take_damage(&mut self, amount: i32) -> DamageResult {
        let amount = amount.max(0);
        let before = self.current;
        self.current = (self.current - amount).max(0);
        DamageResult {
            damage_taken: before - self.current,
            dropped_to_zero: self.current == 0,
        }
    }

    pub fn restore(&mut self) {
        self.current = self.maximum;
    }

    /// Change the maximum, keeping `current` in bounds.
    pub fn set_maximum(&mut self, maximum: i32) {
        self.maximum = maximum.max(0);
        self.current = self.current.clamp(0, self.maximum);
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}

/// Result of taking damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    /// Health actually lost (less than the hit when it overkills).
    pub damage_taken: i32,
    pub dropped_to_zero: bool,
}

// ============================================================================
// Combatant
// ============================================================================

/// Anything that can take damage and be alive or dead in a battle.
pub trait Combatant {
    fn name(&self) -> &str;
    fn dexterity(&self) -> i32;
    fn health(&self) -> &Health;
    fn health_mut(&mut self) -> &mut Health;

    fn take_damage(&mut self, amount: i32) -> DamageResult {
        self.health_mut().take_damage(amount)
    }

    fn restore_health(&mut self) {
        self.health_mut().restore();
    }

    fn is_alive(&self) -> bool {
        self.health().is_alive()
    }
}

// ============================================================================
// Character Classes
// ============================================================================

/// The playable classes. A player may hold levels in several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterClass {
    Rogue,
    Warrior,
    Barbarian,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Barbarian => "Barbarian",
        }
    }

    pub fn all() -> [CharacterClass; 3] {
        [
            CharacterClass::Rogue,
            CharacterClass::Warrior,
            CharacterClass::Barbarian,
        ]
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Player
// ============================================================================

/// Combat modifiers unlocked by class tiers.
///
/// Zero means the modifier is not unlocked. They are not reset between
/// battles: poison stays escalated and the rage countdown carries over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatModifiers {
    /// Bonus poison damage, escalating by one per hit up to a cap.
    pub poison_damage: i32,
    /// Flat reduction applied while the Warrior shield is up.
    pub shield_reduction: i32,
    /// Constitution captured when stone skin was unlocked.
    pub stone_skin_reduction: i32,
    /// Remaining turns of the post-rage penalty.
    pub rage_turns: i32,
}

/// The player-controlled character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: CharacterId,
    pub name: String,
    pub attributes: Attributes,
    /// Level per class. Classes appear once chosen and never drop below 1.
    pub levels: HashMap<CharacterClass, u32>,
    pub current_weapon: Weapon,
    pub health: Health,
    /// Consecutive battle wins. Maintained by the session, not the battle loop.
    pub wins_in_row: u32,
    pub modifiers: CombatModifiers,
}

impl Player {
    /// A player with no class yet. Call [`Player::initialize`] to pick one.
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        let mut player = Self {
            id: CharacterId::new(),
            name: name.into(),
            attributes,
            levels: HashMap::new(),
            current_weapon: Weapon::Dagger,
            health: Health::new(0),
            wins_in_row: 0,
            modifiers: CombatModifiers::default(),
        };
        player.recalculate_max_health();
        player.health.restore();
        player
    }

    pub fn strength(&self) -> i32 {
        self.attributes.strength
    }

    pub fn constitution(&self) -> i32 {
        self.attributes.constitution
    }

    /// Level held in `class`, zero if never taken.
    pub fn class_level(&self, class: CharacterClass) -> u32 {
        self.levels.get(&class).copied().unwrap_or(0)
    }

    /// Whether the player holds at least `level` levels in `class`.
    pub fn has_level(&self, class: CharacterClass, level: u32) -> bool {
        self.class_level(class) >= level
    }

    pub fn total_level(&self) -> u32 {
        self.levels.values().sum()
    }

    pub fn max_health(&self) -> i32 {
        self.health.maximum
    }

    pub fn current_health(&self) -> i32 {
        self.health.current
    }

    pub fn weapon_type(&self) -> WeaponType {
        self.current_weapon.weapon_type()
    }

    /// Class levels in a stable order, e.g. "Warrior 2 / Rogue 1".
    pub fn class_summary(&self) -> String {
        let mut classes: Vec<_> = self.levels.iter().collect();
        classes.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        if classes.is_empty() {
            return "Unclassed".to_string();
        }
        classes
            .iter()
            .map(|(class, level)| format!("{class} {level}"))
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Sum of level × health-per-level over held classes, plus constitution.
    pub(crate) fn recalculate_max_health(&mut self) {
        let from_levels: i32 = self
            .levels
            .iter()
            .map(|(class, level)| *level as i32 * class.health_per_level())
            .sum();
        self.health
            .set_maximum(from_levels + self.attributes.constitution);
    }
}

impl Combatant for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn dexterity(&self) -> i32 {
        self.attributes.dexterity
    }

    fn health(&self) -> &Health {
        &self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

// ============================================================================
// Monsters
// ============================================================================

/// Special abilities a monster can carry.
///
/// Monster attacks apply the first feature whose trigger holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterFeature {
    /// Double damage against a player wielding a blunt weapon.
    DoubleBluntDamage,
    /// Against a slashing weapon, only raw strength gets through.
    ImmuneSlashing,
    /// +1 damage when faster than the player.
    HiddenAttack,
    /// Damage reduced by the player's constitution.
    StoneSkin,
    /// +3 damage on every turn divisible by `interval`.
    FireBreath { interval: u32 },
}

impl MonsterFeature {
    pub fn name(&self) -> &'static str {
        match self {
            MonsterFeature::DoubleBluntDamage => "Double Blunt Damage",
            MonsterFeature::ImmuneSlashing => "Immune to Slashing",
            MonsterFeature::HiddenAttack => "Hidden Attack",
            MonsterFeature::StoneSkin => "Stone Skin",
            MonsterFeature::FireBreath { .. } => "Fire Breath",
        }
    }
}

impl fmt::Display for MonsterFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonsterFeature::FireBreath { interval } => {
                write!(f, "{} (every {interval} turns)", self.name())
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// A battle opponent: fixed stat block plus mutable health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub weapon_damage: i32,
    pub attributes: Attributes,
    pub features: Vec<MonsterFeature>,
    /// Weapon offered to the player on victory.
    pub reward: Weapon,
    /// `maximum` is the monster's base health.
    pub health: Health,
}

impl Monster {
    pub fn base_health(&self) -> i32 {
        self.health.maximum
    }

    pub fn current_health(&self) -> i32 {
        self.health.current
    }

    pub fn strength(&self) -> i32 {
        self.attributes.strength
    }

    pub fn constitution(&self) -> i32 {
        self.attributes.constitution
    }

    pub fn has_feature(&self, feature: MonsterFeature) -> bool {
        self.features.contains(&feature)
    }
}

impl Combatant for Monster {
    fn name(&self) -> &str {
        &self.name
    }

    fn dexterity(&self) -> i32 {
        self.attributes.dexterity
    }

    fn health(&self) -> &Health {
        &self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}
