//! Headless runner: plays a full session and prints the battle log.

mod cli;

use autobattler_core::session::RoundSummary;
use autobattler_core::{GameSession, RandomDice, SavedRun};
use cli::{parse_args, print_help, SEED_ENV_VAR};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;

    if options.help {
        print_help();
        return Ok(());
    }

    init_tracing(options.quiet);

    let seed = options.resolve_seed(std::env::var(SEED_ENV_VAR).ok())?;
    let mut dice = match seed {
        Some(seed) => {
            info!(seed, "seeded dice");
            RandomDice::seeded(seed)
        }
        None => RandomDice::from_entropy(),
    };

    let mut session = match &options.load {
        Some(path) => {
            let session = SavedRun::load_json(path).await?.into_session();
            info!(path = %path.display(), player = %session.player.name, "session loaded");
            session
        }
        None => GameSession::new(options.session_config(), &mut dice)?,
    };

    println!(
        "{} ({}) | {} | HP {}",
        session.player.name,
        session.player.class_summary(),
        session.player.attributes,
        session.player.max_health()
    );
    for class in session.player.levels.keys() {
        println!("  {class}: {}", class.data().signature_ability);
    }

    let rounds = session.play_to_completion(&mut dice, options.max_battles)?;
    if !options.quiet {
        for (index, round) in rounds.iter().enumerate() {
            print_round(index + 1, round);
        }
    }

    print_summary(&session, rounds.len());

    if let Some(path) = &options.save {
        SavedRun::new(session).save_json(path).await?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}

fn init_tracing(quiet: bool) {
    let default = if quiet {
        "autobattler=warn,autobattler_core=warn"
    } else {
        "autobattler=info,autobattler_core=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_round(number: usize, round: &RoundSummary) {
    println!();
    println!("=== Battle {number}: {} ===", round.monster_name);
    println!("{}", round.report);

    if let Some(weapon) = round.reward_offered {
        match round.reward_taken {
            Some(_) => println!("Picked up the {weapon}."),
            None => println!("Left the {weapon} behind."),
        }
    }
    if let Some(level_up) = &round.level_up {
        print!("Reached {} {}", level_up.class, level_up.level);
        match level_up.unlock {
            Some(unlock) => println!(": {unlock}. {}", unlock.description()),
            None => println!(),
        }
    }
    if round.player_replaced {
        println!("A new hero steps forward.");
    }
    println!("Wins in a row: {}", round.wins_in_row);
}

fn print_summary(session: &GameSession, battles_this_run: usize) {
    println!();
    if session.is_complete() {
        println!(
            "{} won {} battles in a row. The run is complete.",
            session.player.name, session.player.wins_in_row
        );
    } else {
        println!(
            "Stopped after {} battles without finishing ({} wins in a row).",
            battles_this_run, session.player.wins_in_row
        );
    }
    println!(
        "Battles: {} | Victories: {} | Defeats: {} ({} stalemates) | Final hero: {} ({}, {})",
        session.battles_fought,
        session.victories,
        session.defeats,
        session.stalemates,
        session.player.name,
        session.player.class_summary(),
        session.player.current_weapon
    );
}
