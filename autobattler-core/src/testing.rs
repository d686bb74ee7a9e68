//! Testing utilities for the battle engine.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedDice` to replay exact rolls instead of random ones
//! - `PlayerFixture` to build a player with exact attributes and levels

use crate::dice::Dice;
use crate::items::Weapon;
use crate::world::{Attributes, CharacterClass, Player};

/// Dice that replay a fixed script of rolls.
///
/// Each roll takes the next scripted value, clamped into the requested range.
/// The script repeats once exhausted; an empty script always rolls the low
/// end of the range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    script: Vec<i32>,
    index: usize,
    rolls_made: usize,
}

impl ScriptedDice {
    pub fn new(script: impl IntoIterator<Item = i32>) -> Self {
        Self {
            script: script.into_iter().collect(),
            index: 0,
            rolls_made: 0,
        }
    }

    /// Append rolls to the end of the script.
    pub fn queue(&mut self, rolls: impl IntoIterator<Item = i32>) -> &mut Self {
        self.script.extend(rolls);
        self
    }

    /// Number of rolls served so far.
    pub fn rolls_made(&self) -> usize {
        self.rolls_made
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        self.rolls_made += 1;
        if self.script.is_empty() {
            return low;
        }
        let value = self.script[self.index % self.script.len()];
        self.index = (self.index + 1) % self.script.len();
        if high <= low {
            low
        } else {
            value.clamp(low, high)
        }
    }
}

/// Builder for players in an exact state.
///
/// Class levels are reached through the real progression rules, so tier
/// unlocks are applied just as in play.
#[derive(Debug, Clone)]
pub struct PlayerFixture {
    name: String,
    attributes: Attributes,
    steps: Vec<FixtureStep>,
}

#[derive(Debug, Clone, Copy)]
enum FixtureStep {
    Initialize(CharacterClass),
    LevelTo(CharacterClass, u32),
    Weapon(Weapon),
}

impl PlayerFixture {
    pub fn new(strength: i32, dexterity: i32, constitution: i32) -> Self {
        Self {
            name: "Hero".to_string(),
            attributes: Attributes::new(strength, dexterity, constitution),
            steps: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Initialize with a starting class.
    pub fn class(mut self, class: CharacterClass) -> Self {
        self.steps.push(FixtureStep::Initialize(class));
        self
    }

    /// Level `class` up until it reaches `level`.
    pub fn levels(mut self, class: CharacterClass, level: u32) -> Self {
        self.steps.push(FixtureStep::LevelTo(class, level));
        self
    }

    /// Swap the wielded weapon.
    pub fn weapon(mut self, weapon: Weapon) -> Self {
        self.steps.push(FixtureStep::Weapon(weapon));
        self
    }

    pub fn build(self) -> Player {
        let mut player = Player::new(self.name, self.attributes);
        for step in self.steps {
            match step {
                FixtureStep::Initialize(class) => player.initialize(class),
                FixtureStep::LevelTo(class, level) => {
                    while player.class_level(class) < level {
                        player.level_up(class);
                    }
                }
                FixtureStep::Weapon(weapon) => player.current_weapon = weapon,
            }
        }
        player
    }
}
