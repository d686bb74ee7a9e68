//! Command line options for the runner.

use autobattler_core::class_data::parse_class;
use autobattler_core::items::get_weapon;
use autobattler_core::session::DEFAULT_WINS_TO_FINISH;
use autobattler_core::{CharacterClass, RewardPolicy, SessionConfig, Weapon};
use std::path::PathBuf;

/// Environment variable used to seed the dice when `--seed` is absent.
pub const SEED_ENV_VAR: &str = "AUTOBATTLER_SEED";

/// Battles played before the runner gives up on finishing the session.
pub const DEFAULT_MAX_BATTLES: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub name: Option<String>,
    pub class: Option<CharacterClass>,
    pub weapon: Option<Weapon>,
    pub seed: Option<u64>,
    pub wins: u32,
    pub max_battles: u32,
    pub reward: RewardPolicy,
    pub save: Option<PathBuf>,
    pub load: Option<PathBuf>,
    pub quiet: bool,
    pub help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            name: None,
            class: None,
            weapon: None,
            seed: None,
            wins: DEFAULT_WINS_TO_FINISH,
            max_battles: DEFAULT_MAX_BATTLES,
            reward: RewardPolicy::default(),
            save: None,
            load: None,
            quiet: false,
            help: false,
        }
    }
}

impl CliOptions {
    /// Session configuration for a new run.
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new()
            .with_wins_to_finish(self.wins)
            .with_reward_policy(self.reward);
        if let Some(name) = &self.name {
            config = config.with_player_name(name.clone());
        }
        if let Some(class) = self.class {
            config = config.with_starting_class(class);
        }
        if let Some(weapon) = self.weapon {
            config = config.with_starting_weapon(weapon);
        }
        config
    }

    /// Explicit seed, falling back to the environment.
    pub fn resolve_seed(&self, env_value: Option<String>) -> Result<Option<u64>, String> {
        if self.seed.is_some() {
            return Ok(self.seed);
        }
        match env_value {
            Some(value) => parse_number(SEED_ENV_VAR, &value).map(Some),
            None => Ok(None),
        }
    }
}

/// Parse options from command line arguments (including the program name).
pub fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => options.help = true,
            "-q" | "--quiet" => options.quiet = true,
            "--name" => options.name = Some(value(args, i, flag)?.to_string()),
            "--class" => {
                let raw = value(args, i, flag)?;
                options.class =
                    Some(parse_class(raw).ok_or_else(|| format!("unknown class: {raw}"))?);
            }
            "--weapon" => {
                let raw = value(args, i, flag)?;
                options.weapon =
                    Some(get_weapon(raw).ok_or_else(|| format!("unknown weapon: {raw}"))?);
            }
            "--seed" => options.seed = Some(parse_number(flag, value(args, i, flag)?)?),
            "--wins" => options.wins = parse_number(flag, value(args, i, flag)?)?,
            "--max-battles" => options.max_battles = parse_number(flag, value(args, i, flag)?)?,
            "--reward" => options.reward = parse_reward(value(args, i, flag)?)?,
            "--save" => options.save = Some(PathBuf::from(value(args, i, flag)?)),
            "--load" => options.load = Some(PathBuf::from(value(args, i, flag)?)),
            other => return Err(format!("unknown option: {other}")),
        }
        if takes_value(flag) {
            i += 1;
        }
        i += 1;
    }

    Ok(options)
}

fn takes_value(flag: &str) -> bool {
    !matches!(flag, "-h" | "--help" | "-q" | "--quiet")
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn parse_number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("{flag}: not a number: {raw}"))
}

fn parse_reward(s: &str) -> Result<RewardPolicy, String> {
    match s.to_lowercase().as_str() {
        "always" => Ok(RewardPolicy::Always),
        "never" => Ok(RewardPolicy::Never),
        "coin" | "coinflip" | "coin-flip" => Ok(RewardPolicy::CoinFlip),
        other => Err(format!("unknown reward policy: {other}")),
    }
}

pub fn print_help() {
    println!("autobattler - turn-based auto-battler");
    println!();
    println!("USAGE:");
    println!("  autobattler [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help             Show this help message");
    println!("  -q, --quiet            Only print the final summary");
    println!("  --name <NAME>          Character name (default: Hero)");
    println!("  --class <CLASS>        Starting class (default: random)");
    println!("  --weapon <WEAPON>      Starting weapon (default: the class's own)");
    println!("  --seed <N>             Seed the dice (or set {SEED_ENV_VAR})");
    println!("  --wins <N>             Wins in a row to finish (default: {DEFAULT_WINS_TO_FINISH})");
    println!("  --max-battles <N>      Battle budget (default: {DEFAULT_MAX_BATTLES})");
    println!("  --reward <POLICY>      always, never or coin (default: coin)");
    println!("  --save <PATH>          Save the session when done");
    println!("  --load <PATH>          Resume a saved session");
    println!();
    println!("CLASSES:");
    println!("  rogue, warrior, barbarian");
    println!();
    println!("WEAPONS:");
    println!("  sword, club, dagger, axe, spear, legendary-sword");
    println!();
    println!("EXAMPLES:");
    println!("  autobattler --seed 42");
    println!("  autobattler --class warrior --reward always --save run.json");
    println!("  autobattler --load run.json --max-battles 10");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("autobattler")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let options = parse_args(&args(&[])).unwrap();
        assert_eq!(options, CliOptions::default());
        assert_eq!(options.session_config(), SessionConfig::new());
    }

    #[test]
    fn test_all_flags() {
        let options = parse_args(&args(&[
            "--name", "Thorin", "--class", "barbarian", "--weapon", "legendary sword", "--seed",
            "7", "--wins", "5", "--max-battles", "20", "--reward", "never", "--save", "out.json",
            "--quiet",
        ]))
        .unwrap();

        assert_eq!(options.name.as_deref(), Some("Thorin"));
        assert_eq!(options.class, Some(CharacterClass::Barbarian));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.max_battles, 20);
        assert_eq!(options.save, Some(PathBuf::from("out.json")));
        assert!(options.quiet);

        let config = options.session_config();
        assert_eq!(config.player_name, "Thorin");
        assert_eq!(config.starting_class, Some(CharacterClass::Barbarian));
        assert_eq!(config.starting_weapon, Some(Weapon::LegendarySword));
        assert_eq!(config.wins_to_finish, 5);
        assert_eq!(config.reward_policy, RewardPolicy::Never);
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(parse_args(&args(&["--class", "wizard"])).is_err());
        assert!(parse_args(&args(&["--seed", "abc"])).is_err());
        assert!(parse_args(&args(&["--weapon", "bow"])).is_err());
        assert!(parse_args(&args(&["--reward", "sometimes"])).is_err());
        assert!(parse_args(&args(&["--wins"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_seed_falls_back_to_env() {
        let options = CliOptions::default();
        assert_eq!(options.resolve_seed(None), Ok(None));
        assert_eq!(options.resolve_seed(Some("12".into())), Ok(Some(12)));
        assert!(options.resolve_seed(Some("x".into())).is_err());

        let explicit = CliOptions {
            seed: Some(3),
            ..CliOptions::default()
        };
        assert_eq!(explicit.resolve_seed(Some("12".into())), Ok(Some(3)));
    }
}
