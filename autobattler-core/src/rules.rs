//! Progression and damage rules.
//!
//! Progression mutates a player when a class is chosen or levelled. Damage is
//! computed per attack from the live state of both combatants and the shared
//! turn counter; a player's attack also advances its rage and poison state.
//!
//! Damage is always clamped to zero from below, never reported as an error.

use crate::class_data::{TierUnlock, POISON_CAP, POISON_START, SHIELD_REDUCTION};
use crate::items::WeaponType;
use crate::world::{CharacterClass, Combatant, Monster, MonsterFeature, Player};
use tracing::{debug, info, warn};

/// Multiplier of the Warrior opening-turn burst.
pub const OPENING_TURN_MULTIPLIER: i32 = 2;

/// Bonus damage while a Barbarian rages.
pub const RAGE_BONUS: i32 = 2;

/// Turns the rage lasts, and turns of penalty once it ends.
pub const RAGE_TURNS: i32 = 3;

/// Damage lost per post-rage turn.
pub const RAGE_PENALTY: i32 = 1;

/// Damage added by a monster's fire breath.
pub const FIRE_BREATH_BONUS: i32 = 3;

// ============================================================================
// Progression
// ============================================================================

impl Player {
    /// Take the first class level: sets level 1, equips the class's starting
    /// weapon, and fully heals.
    ///
    /// Meant for a classless player. Calling it again overwrites that class's
    /// level with 1 and swaps the weapon, keeping any other class levels.
    pub fn initialize(&mut self, class: CharacterClass) {
        if !self.levels.is_empty() {
            warn!(
                player = %self.name,
                class = %class,
                existing = %self.class_summary(),
                "initialize called on a player that already has class levels"
            );
        }

        self.levels.insert(class, 1);
        self.current_weapon = class.starting_weapon();
        self.recalculate_max_health();
        self.health.restore();

        info!(
            player = %self.name,
            class = %class,
            max_health = self.max_health(),
            "character initialized"
        );
    }

    /// Gain a level in `class`, multiclassing if it is new.
    ///
    /// Reaching level 2 or 3 applies that tier's one-time unlock, which is
    /// returned. Higher levels only add health. Always ends fully healed.
    pub fn level_up(&mut self, class: CharacterClass) -> Option<TierUnlock> {
        let level = {
            let entry = self.levels.entry(class).or_insert(0);
            *entry += 1;
            *entry
        };

        let unlock = class.unlock_at(level);
        if let Some(unlock) = unlock {
            self.apply_unlock(unlock);
        }

        self.recalculate_max_health();
        self.health.restore();

        info!(
            player = %self.name,
            class = %class,
            level,
            unlock = unlock.map(|u| u.name()),
            max_health = self.max_health(),
            "level up"
        );

        unlock
    }

    fn apply_unlock(&mut self, unlock: TierUnlock) {
        match unlock {
            TierUnlock::DexterityBonus => self.attributes.dexterity += 1,
            TierUnlock::Poison => self.modifiers.poison_damage = POISON_START,
            TierUnlock::Shield => self.modifiers.shield_reduction = SHIELD_REDUCTION,
            TierUnlock::StrengthBonus => self.attributes.strength += 1,
            // Captured once; later constitution gains do not raise it.
            TierUnlock::StoneSkin => {
                self.modifiers.stone_skin_reduction = self.attributes.constitution
            }
            TierUnlock::ConstitutionBonus => self.attributes.constitution += 1,
        }
    }
}

// ============================================================================
// Damage
// ============================================================================

/// Damage a player deals to a monster on `turn` (1-based).
///
/// Advances the attacker's rage countdown and poison escalation.
pub fn player_damage(attacker: &mut Player, defender: &Monster, turn: u32) -> i32 {
    let mut damage = attacker.current_weapon.damage() + attacker.strength();

    if attacker.has_level(CharacterClass::Rogue, 1) && attacker.dexterity() > defender.dexterity()
    {
        damage += 1;
    }

    if attacker.has_level(CharacterClass::Warrior, 1) && turn == 1 {
        damage *= OPENING_TURN_MULTIPLIER;
    }

    if attacker.has_level(CharacterClass::Barbarian, 1) && turn <= RAGE_TURNS as u32 {
        damage += RAGE_BONUS;
        attacker.modifiers.rage_turns = RAGE_TURNS;
    } else if attacker.modifiers.rage_turns > 0 {
        damage -= RAGE_PENALTY;
        attacker.modifiers.rage_turns -= 1;
    }

    if attacker.has_level(CharacterClass::Rogue, 3) {
        damage += attacker.modifiers.poison_damage;
        attacker.modifiers.poison_damage = (attacker.modifiers.poison_damage + 1).min(POISON_CAP);
    }

    if attacker.has_level(CharacterClass::Warrior, 2) && attacker.strength() > defender.strength()
    {
        damage -= attacker.modifiers.shield_reduction;
    }

    if attacker.has_level(CharacterClass::Barbarian, 2) {
        damage -= attacker.modifiers.stone_skin_reduction;
    }

    let damage = damage.max(0);
    debug!(attacker = %attacker.name, defender = %defender.name, turn, damage, "player damage");
    damage
}

/// Damage a monster deals to a player on `turn` (1-based).
pub fn monster_damage(attacker: &Monster, defender: &Player, turn: u32) -> i32 {
    let mut damage = attacker.weapon_damage + attacker.strength();

    if let Some(feature) = triggered_feature(attacker, defender, turn) {
        damage = match feature {
            MonsterFeature::DoubleBluntDamage => damage * 2,
            MonsterFeature::ImmuneSlashing => attacker.strength(),
            MonsterFeature::HiddenAttack => damage + 1,
            MonsterFeature::StoneSkin => damage - defender.constitution(),
            MonsterFeature::FireBreath { .. } => damage + FIRE_BREATH_BONUS,
        };
    }

    if defender.has_level(CharacterClass::Warrior, 2) && attacker.strength() < defender.strength()
    {
        damage -= SHIELD_REDUCTION;
    }

    if defender.has_level(CharacterClass::Barbarian, 2) {
        damage -= defender.constitution();
    }

    let damage = damage.max(0);
    debug!(attacker = %attacker.name, defender = %defender.name, turn, damage, "monster damage");
    damage
}

/// The first of the monster's features whose trigger holds this turn.
pub fn triggered_feature(attacker: &Monster, defender: &Player, turn: u32) -> Option<MonsterFeature> {
    attacker.features.iter().copied().find(|feature| match feature {
        MonsterFeature::DoubleBluntDamage => defender.weapon_type() == WeaponType::Blunt,
        MonsterFeature::ImmuneSlashing => defender.weapon_type() == WeaponType::Slashing,
        MonsterFeature::HiddenAttack => attacker.dexterity() > defender.dexterity(),
        MonsterFeature::StoneSkin => true,
        MonsterFeature::FireBreath { interval } => *interval > 0 && turn % interval == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bestiary::find_monster;
    use crate::items::Weapon;
    use crate::testing::PlayerFixture;
    use crate::world::Attributes;

    fn monster(name: &str) -> Monster {
        find_monster(name).unwrap()
    }

    // ------------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------------

    #[test]
    fn test_initialize_sets_level_weapon_and_health() {
        let mut player = Player::new("Test", Attributes::new(2, 2, 2));
        player.initialize(CharacterClass::Warrior);
        assert_eq!(player.class_level(CharacterClass::Warrior), 1);
        assert_eq!(player.current_weapon, Weapon::Sword);
        assert_eq!(player.max_health(), 5 + 2);
        assert_eq!(player.current_health(), 7);
    }

    #[test]
    fn test_reinitialize_resets_only_that_class() {
        let mut player = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Warrior)
            .levels(CharacterClass::Warrior, 3)
            .levels(CharacterClass::Rogue, 1)
            .weapon(Weapon::Dagger)
            .build();
        assert_eq!(player.max_health(), 3 * 5 + 4 + 1);

        player.initialize(CharacterClass::Warrior);

        assert_eq!(player.class_level(CharacterClass::Warrior), 1);
        assert_eq!(player.class_level(CharacterClass::Rogue), 1);
        assert_eq!(player.current_weapon, Weapon::Sword);
        assert_eq!(player.max_health(), 5 + 4 + 1);
        assert_eq!(player.current_health(), player.max_health());
        // unlocks already applied are kept
        assert_eq!(player.attributes.strength, 2);
        assert_eq!(player.modifiers.shield_reduction, SHIELD_REDUCTION);
    }

    #[test]
    fn test_rogue_tiers() {
        let mut player = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Rogue)
            .build();
        assert_eq!(
            player.level_up(CharacterClass::Rogue),
            Some(TierUnlock::DexterityBonus)
        );
        assert_eq!(player.attributes.dexterity, 2);
        assert_eq!(player.modifiers.poison_damage, 0);

        assert_eq!(player.level_up(CharacterClass::Rogue), Some(TierUnlock::Poison));
        assert_eq!(player.modifiers.poison_damage, POISON_START);
        assert_eq!(player.max_health(), 3 * 4 + 1);
    }

    #[test]
    fn test_warrior_tiers() {
        let mut player = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Warrior)
            .build();
        player.level_up(CharacterClass::Warrior);
        assert_eq!(player.modifiers.shield_reduction, SHIELD_REDUCTION);
        player.level_up(CharacterClass::Warrior);
        assert_eq!(player.attributes.strength, 2);
    }

    #[test]
    fn test_stone_skin_is_frozen_at_unlock() {
        let mut player = PlayerFixture::new(1, 1, 2)
            .class(CharacterClass::Barbarian)
            .build();
        player.level_up(CharacterClass::Barbarian);
        assert_eq!(player.modifiers.stone_skin_reduction, 2);
        player.level_up(CharacterClass::Barbarian);
        assert_eq!(player.attributes.constitution, 3);
        assert_eq!(player.modifiers.stone_skin_reduction, 2);
        assert_eq!(player.max_health(), 3 * 6 + 3);
    }

    #[test]
    fn test_levels_past_three_only_add_health() {
        let mut player = PlayerFixture::new(2, 2, 2)
            .class(CharacterClass::Warrior)
            .levels(CharacterClass::Warrior, 3)
            .build();
        let before = player.attributes;
        assert_eq!(player.level_up(CharacterClass::Warrior), None);
        assert_eq!(player.attributes, before);
        assert_eq!(player.class_level(CharacterClass::Warrior), 4);
        assert_eq!(player.max_health(), 4 * 5 + 2);
    }

    #[test]
    fn test_multiclass_level_up() {
        let mut player = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Warrior)
            .build();
        assert_eq!(player.level_up(CharacterClass::Rogue), None);
        assert_eq!(player.class_level(CharacterClass::Rogue), 1);
        assert_eq!(player.current_weapon, Weapon::Sword);
        assert_eq!(player.max_health(), 5 + 4 + 1);
    }

    #[test]
    fn test_level_up_heals() {
        let mut player = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Barbarian)
            .build();
        player.take_damage(5);
        player.level_up(CharacterClass::Barbarian);
        assert_eq!(player.current_health(), player.max_health());
    }

    // ------------------------------------------------------------------------
    // Player damage
    // ------------------------------------------------------------------------

    #[test]
    fn test_warrior_opening_turn_doubles() {
        let goblin = monster("Goblin");
        let mut warrior = PlayerFixture::new(2, 2, 2)
            .class(CharacterClass::Warrior)
            .build();
        assert_eq!(player_damage(&mut warrior, &goblin, 1), 10);
        assert_eq!(player_damage(&mut warrior, &goblin, 2), 5);
    }

    #[test]
    fn test_rogue_hidden_attack_needs_higher_dexterity() {
        let ghost = monster("Ghost");
        let goblin = monster("Goblin");
        let mut rogue = PlayerFixture::new(1, 2, 1)
            .class(CharacterClass::Rogue)
            .build();
        // dagger 2 + str 1
        assert_eq!(player_damage(&mut rogue, &ghost, 2), 3);
        assert_eq!(player_damage(&mut rogue, &goblin, 2), 4);
    }

    #[test]
    fn test_barbarian_rage_then_penalty() {
        let goblin = monster("Goblin");
        let mut barbarian = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Barbarian)
            .build();
        // club 3 + str 1
        let damage: Vec<i32> = (1..=8)
            .map(|turn| player_damage(&mut barbarian, &goblin, turn))
            .collect();
        assert_eq!(damage, vec![6, 6, 6, 3, 3, 3, 4, 4]);
        assert_eq!(barbarian.modifiers.rage_turns, 0);
    }

    #[test]
    fn test_poison_escalates_and_caps() {
        let golem = monster("Golem");
        let mut rogue = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Rogue)
            .levels(CharacterClass::Rogue, 3)
            .build();
        // dagger 2 + str 1, dex 2 vs golem 1 adds hidden attack
        let damage: Vec<i32> = (2..=6)
            .map(|turn| player_damage(&mut rogue, &golem, turn))
            .collect();
        assert_eq!(damage, vec![5, 6, 7, 7, 7]);
        assert_eq!(rogue.modifiers.poison_damage, POISON_CAP);
    }

    #[test]
    fn test_warrior_shield_reduces_own_damage_when_stronger() {
        let goblin = monster("Goblin");
        let mut warrior = PlayerFixture::new(2, 1, 1)
            .class(CharacterClass::Warrior)
            .levels(CharacterClass::Warrior, 2)
            .build();
        // sword 3 + str 2 - shield 3
        assert_eq!(player_damage(&mut warrior, &goblin, 2), 2);

        let golem = monster("Golem");
        assert_eq!(player_damage(&mut warrior, &golem, 2), 5);
    }

    #[test]
    fn test_player_damage_never_negative() {
        let goblin = monster("Goblin");
        let mut barbarian = PlayerFixture::new(1, 1, 3)
            .class(CharacterClass::Barbarian)
            .levels(CharacterClass::Barbarian, 2)
            .weapon(Weapon::Dagger)
            .build();
        barbarian.modifiers.stone_skin_reduction = 10;
        assert_eq!(player_damage(&mut barbarian, &goblin, 5), 0);
    }

    // ------------------------------------------------------------------------
    // Monster damage
    // ------------------------------------------------------------------------

    #[test]
    fn test_skeleton_doubles_against_blunt() {
        let skeleton = monster("Skeleton");
        let with_club = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Barbarian)
            .build();
        let with_sword = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Warrior)
            .build();
        assert_eq!(monster_damage(&skeleton, &with_club, 1), 8);
        assert_eq!(monster_damage(&skeleton, &with_sword, 1), 4);
    }

    #[test]
    fn test_slime_against_slashing_uses_strength_only() {
        let slime = monster("Slime");
        let with_sword = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Warrior)
            .build();
        let with_dagger = PlayerFixture::new(1, 1, 1)
            .class(CharacterClass::Rogue)
            .build();
        assert_eq!(monster_damage(&slime, &with_sword, 1), 3);
        assert_eq!(monster_damage(&slime, &with_dagger, 1), 4);
    }

    #[test]
    fn test_ghost_hidden_attack() {
        let ghost = monster("Ghost");
        let slow = PlayerFixture::new(1, 1, 1).class(CharacterClass::Rogue).build();
        let fast = PlayerFixture::new(1, 3, 1).class(CharacterClass::Rogue).build();
        assert_eq!(monster_damage(&ghost, &slow, 1), 5);
        assert_eq!(monster_damage(&ghost, &fast, 1), 4);
    }

    #[test]
    fn test_golem_reduced_by_constitution() {
        let golem = monster("Golem");
        let player = PlayerFixture::new(1, 1, 3).class(CharacterClass::Rogue).build();
        assert_eq!(monster_damage(&golem, &player, 1), 1);
    }

    #[test]
    fn test_dragon_fire_breath_every_third_turn() {
        let dragon = monster("Dragon");
        let player = PlayerFixture::new(1, 3, 1).class(CharacterClass::Rogue).build();
        let damage: Vec<i32> = (1..=6)
            .map(|turn| monster_damage(&dragon, &player, turn))
            .collect();
        assert_eq!(damage, vec![7, 7, 10, 7, 7, 10]);
    }

    #[test]
    fn test_defender_shield_and_stone_skin() {
        let goblin = monster("Goblin");
        let warrior = PlayerFixture::new(2, 1, 1)
            .class(CharacterClass::Warrior)
            .levels(CharacterClass::Warrior, 2)
            .build();
        // 2 + 1 - 3
        assert_eq!(monster_damage(&goblin, &warrior, 2), 0);

        let dragon = monster("Dragon");
        let barbarian = PlayerFixture::new(1, 1, 2)
            .class(CharacterClass::Barbarian)
            .levels(CharacterClass::Barbarian, 2)
            .build();
        // 4 + 3 - con 2
        assert_eq!(monster_damage(&dragon, &barbarian, 1), 5);
    }

    #[test]
    fn test_only_first_triggered_feature_applies() {
        let mut hybrid = monster("Goblin");
        hybrid.features = vec![MonsterFeature::HiddenAttack, MonsterFeature::StoneSkin];
        hybrid.attributes.dexterity = 3;
        let player = PlayerFixture::new(1, 1, 2).class(CharacterClass::Rogue).build();
        assert_eq!(
            triggered_feature(&hybrid, &player, 1),
            Some(MonsterFeature::HiddenAttack)
        );
        assert_eq!(monster_damage(&hybrid, &player, 1), 4);
    }
}
