//! Turn-based auto-battler engine.
//!
//! This crate provides:
//! - Player and monster combatant models with multi-class progression
//! - Damage rules for class abilities and monster features
//! - A battle loop with hit/miss rolls and a full battle log
//! - Multi-battle sessions and JSON save files
//!
//! All randomness goes through the [`Dice`] trait, so any battle can be
//! replayed from a seed or scripted exactly.
//!
//! # Quick Start
//!
//! ```
//! use autobattler_core::{simulate_battle, CharacterBuilder, CharacterClass, Monster, RandomDice};
//!
//! let mut dice = RandomDice::seeded(7);
//! let mut player = CharacterBuilder::new()
//!     .name("Thorin")
//!     .class(CharacterClass::Warrior)
//!     .build(&mut dice)
//!     .unwrap();
//! let mut monster = Monster::random(&mut dice);
//!
//! let won = simulate_battle(&mut player, &mut monster, &mut dice).unwrap();
//! println!("{} {}", player.name, if won { "wins" } else { "falls" });
//! ```

pub mod battle;
pub mod bestiary;
pub mod character_builder;
pub mod class_data;
pub mod dice;
pub mod items;
pub mod persist;
pub mod rules;
pub mod session;
pub mod testing;
pub mod world;

// Primary public API
pub use battle::{
    play_battle, run_battle, simulate_battle, BattleConfig, BattleError, BattleEvent,
    BattleOutcome, BattleReport, Side,
};
pub use character_builder::{create_player, CharacterBuilder};
pub use class_data::TierUnlock;
pub use dice::{Dice, RandomDice};
pub use items::{Weapon, WeaponType};
pub use persist::{PersistError, SavedRun};
pub use rules::{monster_damage, player_damage};
pub use session::{ClassChoice, GameSession, RewardPolicy, SessionConfig, SessionError};
pub use world::{CharacterClass, Combatant, Monster, MonsterFeature, Player};
