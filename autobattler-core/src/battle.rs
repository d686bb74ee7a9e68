//! Battle loop.
//!
//! A battle alternates attacks between a player and a monster until one of
//! them drops to zero health:
//! 1. Both sides are restored to full health
//! 2. The faster side attacks first, ties going to the player
//! 3. Each turn the attacker rolls hit chance in `1..=attacker_dex + defender_dex`
//!    and misses if the roll is at most the defender's dexterity
//! 4. A hit deals damage from [`crate::rules`]; the player is checked for
//!    defeat before the monster
//!
//! The turn counter is shared by both sides and starts at 1. Every turn is
//! recorded as a [`BattleEvent`] in the returned [`BattleReport`].

use crate::dice::Dice;
use crate::rules::{monster_damage, player_damage};
use crate::world::{Combatant, Monster, Player};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default cap on turns per battle.
pub const DEFAULT_MAX_TURNS: u32 = 10_000;

/// Errors from running a battle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("Battle did not finish within {limit} turns")]
    TurnLimitExceeded { limit: u32 },
}

/// Configuration for a single battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Turns after which the battle is abandoned with an error.
    pub max_turns: u32,
}

impl BattleConfig {
    pub fn new() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Which side of the battle is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Monster,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Monster,
            Side::Monster => Side::Player,
        }
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    PlayerWon,
    MonsterWon,
    /// The turn cap was reached with both sides still standing.
    Stalemate,
}

impl BattleOutcome {
    pub fn player_won(self) -> bool {
        self == BattleOutcome::PlayerWon
    }
}

/// One turn of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    Hit {
        turn: u32,
        attacker: Side,
        attacker_name: String,
        roll: i32,
        damage: i32,
        defender_health: i32,
    },
    Miss {
        turn: u32,
        attacker: Side,
        attacker_name: String,
        roll: i32,
    },
}

impl BattleEvent {
    pub fn turn(&self) -> u32 {
        match self {
            BattleEvent::Hit { turn, .. } | BattleEvent::Miss { turn, .. } => *turn,
        }
    }

    pub fn attacker(&self) -> Side {
        match self {
            BattleEvent::Hit { attacker, .. } | BattleEvent::Miss { attacker, .. } => *attacker,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, BattleEvent::Hit { .. })
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::Hit {
                turn,
                attacker_name,
                damage,
                defender_health,
                ..
            } if *damage > 0 => write!(
                f,
                "Turn {turn}: {attacker_name} deals {damage} damage. HP left: {defender_health}"
            ),
            BattleEvent::Hit {
                turn,
                attacker_name,
                ..
            } => write!(f, "Turn {turn}: {attacker_name} hits but deals no damage."),
            BattleEvent::Miss {
                turn,
                attacker_name,
                ..
            } => write!(f, "Turn {turn}: {attacker_name} misses!"),
        }
    }
}

/// Full record of a finished battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    /// Number of turns played, the final one included.
    pub turns: u32,
    pub first_attacker: Side,
    pub events: Vec<BattleEvent>,
    pub player_health: i32,
    pub monster_health: i32,
    pub monster_name: String,
}

impl BattleReport {
    pub fn player_won(&self) -> bool {
        self.outcome.player_won()
    }

    pub fn hits(&self) -> usize {
        self.events.iter().filter(|e| e.is_hit()).count()
    }

    pub fn misses(&self) -> usize {
        self.events.len() - self.hits()
    }
}

impl fmt::Display for BattleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{event}")?;
        }
        match self.outcome {
            BattleOutcome::PlayerWon => write!(
                f,
                "Victory over {} in {} turns ({} HP left).",
                self.monster_name, self.turns, self.player_health
            ),
            BattleOutcome::MonsterWon => write!(
                f,
                "Defeated by {} after {} turns.",
                self.monster_name, self.turns
            ),
            BattleOutcome::Stalemate => write!(
                f,
                "Stalemate with {} after {} turns.",
                self.monster_name, self.turns
            ),
        }
    }
}

/// Result of a hit-chance roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRoll {
    pub roll: i32,
    pub hit: bool,
}

/// Roll to hit: uniform in `1..=attacker_dex + defender_dex`, a miss when the
/// roll does not exceed the defender's dexterity.
pub fn roll_hit(dice: &mut impl Dice, attacker_dex: i32, defender_dex: i32) -> HitRoll {
    let roll = dice.roll(1, attacker_dex + defender_dex);
    HitRoll {
        roll,
        hit: roll > defender_dex,
    }
}

/// The side that acts on turn 1. Ties go to the player.
pub fn first_attacker(player: &Player, monster: &Monster) -> Side {
    if player.dexterity() >= monster.dexterity() {
        Side::Player
    } else {
        Side::Monster
    }
}

/// Run a battle to completion with default configuration, returning whether
/// the player won.
pub fn simulate_battle(
    player: &mut Player,
    monster: &mut Monster,
    dice: &mut impl Dice,
) -> Result<bool, BattleError> {
    run_battle(player, monster, dice, &BattleConfig::default()).map(|report| report.player_won())
}

/// Run a battle to completion and return the full report.
///
/// Both combatants are healed first. On return their health reflects the end
/// of the battle: the loser at zero, the winner at whatever remained.
/// Reaching the turn cap is an error.
pub fn run_battle(
    player: &mut Player,
    monster: &mut Monster,
    dice: &mut impl Dice,
    config: &BattleConfig,
) -> Result<BattleReport, BattleError> {
    let report = play_battle(player, monster, dice, config);
    match report.outcome {
        BattleOutcome::Stalemate => Err(BattleError::TurnLimitExceeded {
            limit: config.max_turns,
        }),
        _ => Ok(report),
    }
}

/// Like [`run_battle`], but a battle that reaches the turn cap ends as a
/// [`BattleOutcome::Stalemate`] with the log played so far.
pub fn play_battle(
    player: &mut Player,
    monster: &mut Monster,
    dice: &mut impl Dice,
    config: &BattleConfig,
) -> BattleReport {
    player.restore_health();
    monster.restore_health();

    let first = first_attacker(player, monster);
    let mut attacker = first;
    let mut turn: u32 = 1;
    let mut events = Vec::new();

    debug!(
        player = %player.name,
        monster = %monster.name,
        first = ?first,
        "battle started"
    );

    let outcome = loop {
        if turn > config.max_turns {
            warn!(
                player = %player.name,
                monster = %monster.name,
                limit = config.max_turns,
                "turn limit reached"
            );
            turn = config.max_turns;
            break BattleOutcome::Stalemate;
        }

        let (attacker_dex, defender_dex) = match attacker {
            Side::Player => (player.dexterity(), monster.dexterity()),
            Side::Monster => (monster.dexterity(), player.dexterity()),
        };
        let hit = roll_hit(dice, attacker_dex, defender_dex);

        let attacker_name = match attacker {
            Side::Player => player.name.clone(),
            Side::Monster => monster.name.clone(),
        };

        let event = if hit.hit {
            let (damage, defender_health) = match attacker {
                Side::Player => {
                    let damage = player_damage(player, monster, turn);
                    monster.take_damage(damage);
                    (damage, monster.current_health())
                }
                Side::Monster => {
                    let damage = monster_damage(monster, player, turn);
                    player.take_damage(damage);
                    (damage, player.current_health())
                }
            };
            BattleEvent::Hit {
                turn,
                attacker,
                attacker_name,
                roll: hit.roll,
                damage,
                defender_health,
            }
        } else {
            BattleEvent::Miss {
                turn,
                attacker,
                attacker_name,
                roll: hit.roll,
            }
        };
        debug!("{event}");
        events.push(event);

        if !player.is_alive() {
            break BattleOutcome::MonsterWon;
        }
        if !monster.is_alive() {
            break BattleOutcome::PlayerWon;
        }

        attacker = attacker.opponent();
        turn += 1;
    };

    info!(
        player = %player.name,
        monster = %monster.name,
        outcome = ?outcome,
        turns = turn,
        player_health = player.current_health(),
        "battle finished"
    );

    BattleReport {
        outcome,
        turns: turn,
        first_attacker: first,
        events,
        player_health: player.current_health(),
        monster_health: monster.current_health(),
        monster_name: monster.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bestiary::find_monster;
    use crate::dice::RandomDice;
    use crate::testing::{PlayerFixture, ScriptedDice};
    use crate::world::CharacterClass;

    #[test]
    fn test_roll_hit_boundary() {
        let mut dice = ScriptedDice::new([2, 3]);
        let miss = roll_hit(&mut dice, 2, 2);
        assert_eq!(miss, HitRoll { roll: 2, hit: false });
        let hit = roll_hit(&mut dice, 2, 2);
        assert_eq!(hit, HitRoll { roll: 3, hit: true });
    }

    #[test]
    fn test_tie_goes_to_player() {
        let player = PlayerFixture::new(1, 2, 1).class(CharacterClass::Rogue).build();
        let skeleton = find_monster("Skeleton").unwrap();
        assert_eq!(first_attacker(&player, &skeleton), Side::Player);

        let ghost = find_monster("Ghost").unwrap();
        assert_eq!(first_attacker(&player, &ghost), Side::Monster);
    }

    #[test]
    fn test_warrior_one_shots_goblin() {
        let mut player = PlayerFixture::new(2, 2, 2)
            .class(CharacterClass::Warrior)
            .build();
        let mut goblin = find_monster("Goblin").unwrap();
        let mut dice = ScriptedDice::new([3]);

        let report = run_battle(&mut player, &mut goblin, &mut dice, &BattleConfig::default())
            .unwrap();

        assert_eq!(report.outcome, BattleOutcome::PlayerWon);
        assert_eq!(report.turns, 1);
        assert_eq!(report.first_attacker, Side::Player);
        assert_eq!(
            report.events,
            vec![BattleEvent::Hit {
                turn: 1,
                attacker: Side::Player,
                attacker_name: "Hero".to_string(),
                roll: 3,
                damage: 10,
                defender_health: 0,
            }]
        );
        assert_eq!(goblin.current_health(), 0);
        assert_eq!(player.current_health(), 7);
    }

    #[test]
    fn test_battle_restores_health_first() {
        let mut player = PlayerFixture::new(2, 2, 2)
            .class(CharacterClass::Warrior)
            .build();
        player.take_damage(6);
        let mut goblin = find_monster("Goblin").unwrap();
        goblin.take_damage(4);
        let mut dice = ScriptedDice::new([1, 1, 3]);

        let report = run_battle(&mut player, &mut goblin, &mut dice, &BattleConfig::default())
            .unwrap();

        // miss, miss, then a turn-3 hit for 5 on a full-health goblin
        assert!(report.player_won());
        assert_eq!(report.turns, 3);
        assert_eq!(report.misses(), 2);
        assert_eq!(player.current_health(), 7);
    }

    #[test]
    fn test_turn_limit() {
        let mut player = PlayerFixture::new(1, 1, 1).class(CharacterClass::Rogue).build();
        let mut goblin = find_monster("Goblin").unwrap();
        let mut dice = ScriptedDice::new([1]);
        let config = BattleConfig::new().with_max_turns(50);

        let err = run_battle(&mut player, &mut goblin, &mut dice, &config).unwrap_err();
        assert_eq!(err, BattleError::TurnLimitExceeded { limit: 50 });
    }

    #[test]
    fn test_turn_limit_plays_out_as_stalemate() {
        let mut player = PlayerFixture::new(1, 1, 1).class(CharacterClass::Rogue).build();
        let mut goblin = find_monster("Goblin").unwrap();
        let mut dice = ScriptedDice::new([1]);
        let config = BattleConfig::new().with_max_turns(50);

        let report = play_battle(&mut player, &mut goblin, &mut dice, &config);
        assert_eq!(report.outcome, BattleOutcome::Stalemate);
        assert_eq!(report.turns, 50);
        assert_eq!(report.events.len(), 50);
        assert_eq!(report.misses(), 50);
        assert!(!report.player_won());
        assert!(player.is_alive() && goblin.is_alive());
        assert!(report.to_string().ends_with("Stalemate with Goblin after 50 turns."));
    }

    #[test]
    fn test_loser_ends_at_zero() {
        let mut dice = RandomDice::seeded(99);
        for _ in 0..20 {
            let mut player = PlayerFixture::new(1, 1, 1).class(CharacterClass::Rogue).build();
            let mut dragon = find_monster("Dragon").unwrap();
            let won = simulate_battle(&mut player, &mut dragon, &mut dice).unwrap();
            if won {
                assert_eq!(dragon.current_health(), 0);
                assert!(player.current_health() > 0);
            } else {
                assert_eq!(player.current_health(), 0);
                assert!(dragon.current_health() > 0);
            }
        }
    }

    #[test]
    fn test_report_display() {
        let mut player = PlayerFixture::new(2, 2, 2)
            .class(CharacterClass::Warrior)
            .build();
        let mut goblin = find_monster("Goblin").unwrap();
        let mut dice = ScriptedDice::new([1, 1, 3]);
        let report = run_battle(&mut player, &mut goblin, &mut dice, &BattleConfig::default())
            .unwrap();
        let text = report.to_string();
        assert!(text.contains("Turn 1: Hero misses!"));
        assert!(text.contains("Turn 2: Goblin misses!"));
        assert!(text.contains("Turn 3: Hero deals 5 damage. HP left: 0"));
        assert!(text.ends_with("Victory over Goblin in 3 turns (7 HP left)."));
    }
}
