use std::sync::Arc;

use anyhow::Context;
use game_engine::{
    build_word_source,
    config::Config,
    rewards::{AdRewardProvider, DailyBonus, SimulatedAdProvider},
    session::GameSession,
    terminal::{ClockNotifier, Reply, Terminal, parse_command},
};
use game_persistence::{
    JokerInventory, KeyValueStore, SqlKeyValueStore, StatisticsStore,
    connection::connect_and_migrate,
};
use game_types::AdRewardStatus;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::new();
    if let Err(e) = run(config).await {
        tracing::error!("kelime stopped: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!("Starting kelime...");

    let db = connect_and_migrate(&config.database_url)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;
    let store: Arc<dyn KeyValueStore> = Arc::new(SqlKeyValueStore::new(db));

    let inventory = Arc::new(JokerInventory::load(store.clone()).await);
    let statistics = Arc::new(StatisticsStore::load(store.clone()).await);
    let schedule = config.reward_schedule();

    let bonus = DailyBonus::load(store.clone(), inventory.clone(), schedule.daily_bonus).await;
    match bonus.claim(chrono::Local::now().date_naive()).await {
        Ok(Some(counts)) => println!(
            "Daily bonus: +{} of every joker ({} in total)",
            schedule.daily_bonus,
            counts.total()
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!("Daily bonus not granted: {}", e),
    }

    let word_source = build_word_source(&config)?;
    let ads: Arc<dyn AdRewardProvider> = Arc::new(SimulatedAdProvider::new(if config.simulate_ads {
        AdRewardStatus::Granted
    } else {
        AdRewardStatus::Unavailable
    }));

    let session = GameSession::new(
        word_source,
        inventory,
        statistics,
        config.session_settings(),
    );
    session.add_handler(Box::new(ClockNotifier)).await;

    let terminal = Terminal::new(session.clone(), ads, schedule, config.difficulty);
    if let Reply::Say(message) = terminal
        .execute(game_types::PlayerCommand::StartRound { level: None })
        .await
    {
        println!("{}", message);
    }
    println!("{}", terminal.board().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                None
            }
        };
        let Some(line) = line else { break };

        let commands = match parse_command(&line) {
            Ok(commands) => commands,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let mut quit = false;
        for command in commands {
            match terminal.execute(command).await {
                Reply::Quiet => {}
                Reply::Say(message) => println!("{}", message),
                Reply::Quit => {
                    quit = true;
                    break;
                }
            }
        }
        if quit {
            break;
        }
        println!("{}", terminal.board().await);
    }

    if let Err(e) = session.flush().await {
        tracing::warn!("Some progress could not be saved: {:#}", e);
    }
    info!("Goodbye.");
    Ok(())
}
