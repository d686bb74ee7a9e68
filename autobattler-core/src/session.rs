//! GameSession - a run of consecutive battles.
//!
//! A session pits one player against randomly chosen monsters until they win
//! the configured number of battles in a row. Each victory heals the player,
//! may hand them the monster's weapon, and grants a class level. A defeat
//! resets the streak and replaces the player with a fresh character. A battle
//! that reaches the turn cap is a stalemate and scored as a defeat.

use crate::battle::{play_battle, BattleConfig, BattleOutcome, BattleReport};
use crate::character_builder::{random_class, BuilderError, CharacterBuilder, DEFAULT_PLAYER_NAME};
use crate::class_data::TierUnlock;
use crate::dice::Dice;
use crate::items::Weapon;
use crate::world::{CharacterClass, Combatant, Monster, Player};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Consecutive wins needed to finish a session by default.
pub const DEFAULT_WINS_TO_FINISH: u32 = 3;

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session is already complete")]
    AlreadyComplete,

    #[error("Character error: {0}")]
    Builder(#[from] BuilderError),
}

/// Whether the player takes a defeated monster's weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RewardPolicy {
    Always,
    Never,
    #[default]
    CoinFlip,
}

/// How the class gained after a victory is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassChoice {
    #[default]
    Random,
    Fixed(CharacterClass),
}

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name given to every character created by the session.
    pub player_name: String,

    /// Class for new characters. `None` picks one at random.
    pub starting_class: Option<CharacterClass>,

    /// Weapon for new characters instead of the class's starting weapon.
    #[serde(default)]
    pub starting_weapon: Option<Weapon>,

    /// Consecutive wins that complete the session.
    pub wins_to_finish: u32,

    pub reward_policy: RewardPolicy,

    pub class_choice: ClassChoice,

    pub battle: BattleConfig,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            starting_class: None,
            starting_weapon: None,
            wins_to_finish: DEFAULT_WINS_TO_FINISH,
            reward_policy: RewardPolicy::default(),
            class_choice: ClassChoice::default(),
            battle: BattleConfig::default(),
        }
    }

    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    pub fn with_starting_class(mut self, class: CharacterClass) -> Self {
        self.starting_class = Some(class);
        self
    }

    pub fn with_starting_weapon(mut self, weapon: Weapon) -> Self {
        self.starting_weapon = Some(weapon);
        self
    }

    pub fn with_wins_to_finish(mut self, wins: u32) -> Self {
        self.wins_to_finish = wins;
        self
    }

    pub fn with_reward_policy(mut self, policy: RewardPolicy) -> Self {
        self.reward_policy = policy;
        self
    }

    pub fn with_class_choice(mut self, choice: ClassChoice) -> Self {
        self.class_choice = choice;
        self
    }

    pub fn with_battle_config(mut self, battle: BattleConfig) -> Self {
        self.battle = battle;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A level gained after a victory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpSummary {
    pub class: CharacterClass,
    pub level: u32,
    pub unlock: Option<TierUnlock>,
}

/// What happened in one round of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub monster_name: String,
    pub report: BattleReport,
    /// The weapon equipped from the monster's drop, if taken.
    pub reward_taken: Option<Weapon>,
    /// The monster's drop, taken or not. Only set on a victory.
    pub reward_offered: Option<Weapon>,
    pub level_up: Option<LevelUpSummary>,
    /// A defeat or stalemate replaced the player with a new character.
    pub player_replaced: bool,
    pub wins_in_row: u32,
    pub session_complete: bool,
}

/// A play session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub player: Player,
    pub config: SessionConfig,
    pub battles_fought: u32,
    pub victories: u32,
    /// Losses, stalemates included.
    pub defeats: u32,
    #[serde(default)]
    pub stalemates: u32,
}

impl GameSession {
    /// Start a session with a freshly created character.
    pub fn new(config: SessionConfig, dice: &mut impl Dice) -> Result<Self, SessionError> {
        let player = create_character(&config, dice)?;
        Ok(Self::with_player(player, config))
    }

    /// Start a session with an existing character.
    pub fn with_player(player: Player, config: SessionConfig) -> Self {
        Self {
            player,
            config,
            battles_fought: 0,
            victories: 0,
            defeats: 0,
            stalemates: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.player.wins_in_row >= self.config.wins_to_finish
    }

    /// Fight a monster picked at random from the catalog.
    pub fn fight(&mut self, dice: &mut impl Dice) -> Result<RoundSummary, SessionError> {
        if self.is_complete() {
            return Err(SessionError::AlreadyComplete);
        }
        let monster = Monster::random(dice);
        self.fight_monster(monster, dice)
    }

    /// Fight a specific monster.
    pub fn fight_monster(
        &mut self,
        mut monster: Monster,
        dice: &mut impl Dice,
    ) -> Result<RoundSummary, SessionError> {
        if self.is_complete() {
            return Err(SessionError::AlreadyComplete);
        }

        info!(
            player = %self.player.name,
            classes = %self.player.class_summary(),
            monster = %monster.name,
            "fighting"
        );

        let report = play_battle(&mut self.player, &mut monster, dice, &self.config.battle);
        self.battles_fought += 1;

        let mut summary = RoundSummary {
            monster_name: monster.name.clone(),
            report,
            reward_taken: None,
            reward_offered: None,
            level_up: None,
            player_replaced: false,
            wins_in_row: 0,
            session_complete: false,
        };

        if summary.report.player_won() {
            self.victories += 1;
            self.player.wins_in_row += 1;
            self.player.restore_health();

            summary.reward_offered = Some(monster.reward);
            if self.takes_reward(dice) {
                self.player.current_weapon = monster.reward;
                summary.reward_taken = Some(monster.reward);
                info!(weapon = %monster.reward, "reward equipped");
            }

            let class = match self.config.class_choice {
                ClassChoice::Random => random_class(dice),
                ClassChoice::Fixed(class) => class,
            };
            let unlock = self.player.level_up(class);
            summary.level_up = Some(LevelUpSummary {
                class,
                level: self.player.class_level(class),
                unlock,
            });
        } else {
            self.defeats += 1;
            self.player.wins_in_row = 0;
            if summary.report.outcome == BattleOutcome::Stalemate {
                self.stalemates += 1;
                warn!(
                    player = %self.player.name,
                    monster = %monster.name,
                    turns = summary.report.turns,
                    "stalemate, creating a new character"
                );
            } else {
                info!(
                    player = %self.player.name,
                    monster = %monster.name,
                    "defeated, creating a new character"
                );
            }
            self.player = create_character(&self.config, dice)?;
            summary.player_replaced = true;
        }

        summary.wins_in_row = self.player.wins_in_row;
        summary.session_complete = self.is_complete();
        if summary.session_complete {
            info!(
                player = %self.player.name,
                battles = self.battles_fought,
                "session complete"
            );
        }

        Ok(summary)
    }

    /// Fight until the session completes or `max_battles` rounds have run.
    pub fn play_to_completion(
        &mut self,
        dice: &mut impl Dice,
        max_battles: u32,
    ) -> Result<Vec<RoundSummary>, SessionError> {
        let mut rounds = Vec::new();
        while !self.is_complete() && (rounds.len() as u32) < max_battles {
            rounds.push(self.fight(dice)?);
        }
        Ok(rounds)
    }

    fn takes_reward(&self, dice: &mut impl Dice) -> bool {
        match self.config.reward_policy {
            RewardPolicy::Always => true,
            RewardPolicy::Never => false,
            RewardPolicy::CoinFlip => dice.coin_flip(),
        }
    }
}

fn create_character(config: &SessionConfig, dice: &mut impl Dice) -> Result<Player, SessionError> {
    let class = match config.starting_class {
        Some(class) => class,
        None => random_class(dice),
    };
    let mut player = CharacterBuilder::new()
        .name(config.player_name.clone())
        .class(class)
        .build(dice)?;
    if let Some(weapon) = config.starting_weapon {
        player.current_weapon = weapon;
    }
    info!(
        player = %player.name,
        class = %class,
        attributes = %player.attributes,
        max_health = player.max_health(),
        "character created"
    );
    Ok(player)
}
