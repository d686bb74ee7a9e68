//! Player creation.
//!
//! New characters roll each attribute uniformly from 1 to 3. The builder lets
//! callers fix the name, class, or attributes instead of rolling them.

use crate::dice::Dice;
use crate::world::{Attributes, CharacterClass, Player};
use thiserror::Error;

/// Lowest value an attribute can be rolled (or ever fall to).
pub const ATTRIBUTE_MIN: i32 = 1;

/// Highest value an attribute can be rolled at creation.
pub const ATTRIBUTE_ROLL_MAX: i32 = 3;

pub const DEFAULT_PLAYER_NAME: &str = "Hero";

/// Roll strength, dexterity and constitution, in that order.
pub fn roll_attributes(dice: &mut impl Dice) -> Attributes {
    let strength = dice.roll(ATTRIBUTE_MIN, ATTRIBUTE_ROLL_MAX);
    let dexterity = dice.roll(ATTRIBUTE_MIN, ATTRIBUTE_ROLL_MAX);
    let constitution = dice.roll(ATTRIBUTE_MIN, ATTRIBUTE_ROLL_MAX);
    Attributes::new(strength, dexterity, constitution)
}

/// A classless player with rolled attributes.
pub fn create_player(dice: &mut impl Dice) -> Player {
    Player::new(DEFAULT_PLAYER_NAME, roll_attributes(dice))
}

/// Pick a class uniformly at random.
pub fn random_class(dice: &mut impl Dice) -> CharacterClass {
    let classes = CharacterClass::all();
    classes[dice.pick(classes.len())]
}

/// Error from character building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("{attribute} must be at least 1, got {value}")]
    AttributeTooLow { attribute: &'static str, value: i32 },

    #[error("Character name cannot be empty")]
    EmptyName,
}

/// Builder for new player characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    class: Option<CharacterClass>,
    attributes: Option<Attributes>,
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Starting class. Without one the player is left classless.
    pub fn class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    /// Fixed attributes instead of rolled ones.
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Build the player, rolling anything left unspecified.
    pub fn build(self, dice: &mut impl Dice) -> Result<Player, BuilderError> {
        let name = self
            .name
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
        if name.trim().is_empty() {
            return Err(BuilderError::EmptyName);
        }

        let attributes = match self.attributes {
            Some(attributes) => {
                validate(&attributes)?;
                attributes
            }
            None => roll_attributes(dice),
        };

        let mut player = Player::new(name, attributes);
        if let Some(class) = self.class {
            player.initialize(class);
        }
        Ok(player)
    }
}

fn validate(attributes: &Attributes) -> Result<(), BuilderError> {
    for (attribute, value) in [
        ("Strength", attributes.strength),
        ("Dexterity", attributes.dexterity),
        ("Constitution", attributes.constitution),
    ] {
        if value < ATTRIBUTE_MIN {
            return Err(BuilderError::AttributeTooLow { attribute, value });
        }
    }
    Ok(())
}
