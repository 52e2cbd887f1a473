use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pocket_battle::data::DEFAULT_HP;
use pocket_battle::{util, BattleClient, Config, Database, Pokemon, PokemonStore};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "pocket-battle", version, about = "Battle your Pokemon against other players")]
struct Cli {
    /// Data directory (defaults to ~/.pocket-battle)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a Pokemon to the local pocket
    Add {
        name: String,
        #[arg(long, default_value_t = DEFAULT_HP)]
        hp: i64,
        #[arg(long, default_value_t = 0)]
        exp: i64,
    },
    /// List the Pokemon in the local pocket
    List,
    /// Send a Pokemon into a multiplayer battle and wait for the result
    Battle {
        /// Uuid of the Pokemon to send
        uuid: String,
        /// Battle server base URL (overrides config)
        #[arg(long)]
        server: Option<String>,
        /// Stop waiting for results after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir);

    // Initialize logging to file (~/.pocket-battle/logs/pocket-battle.log)
    let log_path = util::DataFile::Log.path();
    if let Some(logs_dir) = log_path.parent() {
        fs::create_dir_all(logs_dir)?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let config = Config::load().context("Failed to load configuration")?;

    match cli.command {
        Command::Add { name, hp, exp } => add(&config, name, hp, exp),
        Command::List => list(&config),
        Command::Battle {
            uuid,
            server,
            timeout,
        } => {
            let mut config = config;
            if let Some(server) = server {
                config = config.with_server_url(server);
            }
            if let Some(secs) = timeout {
                config = config.with_poll_timeout(Some(Duration::from_secs(secs)));
            }
            battle(&config, &uuid).await
        }
    }
}

fn open_store(config: &Config) -> Result<PokemonStore> {
    let db = Database::open(config.database_path.clone()).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database_path.display()
        )
    })?;
    Ok(PokemonStore::new(db))
}

fn add(config: &Config, name: String, hp: i64, exp: i64) -> Result<()> {
    if hp <= 0 {
        bail!("hp must be positive, got {hp}");
    }
    let store = open_store(config)?;
    let pokemon = Pokemon::new(name, hp).with_exp(exp);
    store.create(&pokemon)?;
    println!("{}\t{}", pokemon.uuid, pokemon.name);
    Ok(())
}

fn list(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    for pokemon in store.get_all()? {
        println!(
            "{}\t{}\thp={}\texp={}",
            pokemon.uuid, pokemon.name, pokemon.hp, pokemon.exp
        );
    }
    Ok(())
}

async fn battle(config: &Config, uuid: &str) -> Result<()> {
    let mut client = BattleClient::from_config(config)?;
    let pokemon = client
        .store()
        .get_by_uuid(uuid)?
        .with_context(|| format!("No Pokemon with uuid {uuid}"))?;

    if !client.join_battle(&pokemon).await? {
        println!("Another battle is in progress; try again later.");
        return Ok(());
    }
    println!("Joined battle, waiting for results...");

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let ticks = client
        .await_results_until(cancel)
        .await?
        .unwrap_or_default();
    println!("Battle finished after {} ticks", ticks.len());

    match client.outcome() {
        Some(outcome) if outcome.won => println!("You won! +{} exp", outcome.exp),
        _ => println!("You lost."),
    }
    if let Some(updated) = client.store().get_by_uuid(uuid)? {
        println!("{}: hp={} exp={}", updated.name, updated.hp, updated.exp);
    }
    Ok(())
}
