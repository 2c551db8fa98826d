use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use critter_core::{CritterConfig, JsonFileStore, PetState, PetStore};
use critter_sim::{
    event_display, stats_report, status_line, status_with_label, ActionOutcome, Heartbeat,
    HeartbeatConfig, Simulation, StatusView,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "critter", author, version, about = "A virtual pet that lives in your terminal", long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long, global = true, env = "CRITTER_CONFIG")]
    config: Option<PathBuf>,

    /// Where the pet is saved (overrides the config file)
    #[arg(long, global = true)]
    save_path: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Catch the pet up to the present and save, printing nothing
    Update,
    /// Print a one-line status (the default)
    Status {
        /// Spell out stat names, form and mood
        #[arg(long)]
        label: bool,
    },
    /// Print everything about the pet
    Stats {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Feed the pet
    Feed,
    /// Play with the pet
    Play,
    /// Put the pet to bed, or wake it up
    Sleep,
    /// Give the pet medicine
    Medicine,
    /// Respond to whatever the pet is going through
    Respond,
    /// Start over with a new pet
    Adopt {
        /// Name for the new pet
        #[arg(long)]
        name: Option<String>,
    },
    /// Keep the pet alive in the foreground, printing its status every tick
    Watch {
        /// Tick, decay and checkpoint more often
        #[arg(long)]
        fast: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn save(store: &JsonFileStore, pet: &PetState) -> Result<()> {
    store
        .save(pet)
        .with_context(|| format!("Failed to save pet to {}", store.path().display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config_path = args.config.clone().unwrap_or_else(CritterConfig::default_path);
    let mut config = CritterConfig::load_or_default(&config_path);
    if let Some(path) = args.save_path.clone() {
        config.pet.save_path = path;
    }
    debug!("Using save file {}", config.pet.save_path.display());

    let store = JsonFileStore::new(config.pet.save_path.clone());
    let mut sim = Simulation::system(&config);
    let command = args.command.unwrap_or(Command::Status { label: false });

    if let Command::Adopt { name } = &command {
        let name = name.clone().unwrap_or_else(|| config.pet.name.clone());
        let pet = sim.hatch(&name);
        save(&store, &pet)?;
        println!("{} {} hatched! Take good care of them.", pet.form.emoji(), pet.name);
        return Ok(());
    }

    let (mut pet, fresh) = sim.load_or_hatch(&store, &config.pet.name);
    if fresh {
        info!("Hatched {} at {}", pet.name, store.path().display());
    }

    // Status is read-only: it shows a dice-free preview so repeated polls
    // agree, and only a new pet is written out.
    if let Command::Status { label } = command {
        let view = sim.preview(&pet);
        let now = sim.now();
        if label {
            println!("{}", status_with_label(&view, now));
        } else {
            println!("{}", status_line(&view, now));
        }
        if fresh {
            save(&store, &pet)?;
        }
        return Ok(());
    }

    let report = sim.update(&mut pet);
    debug!("Update: {:?}", report);

    match command {
        Command::Update => save(&store, &pet)?,
        Command::Stats { json } => {
            let now = sim.now();
            if json {
                let view = StatusView::of(&pet, now);
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", stats_report(&pet, now));
            }
            save(&store, &pet)?;
        }
        Command::Feed => act(&store, &mut pet, |p| sim.feed(p))?,
        Command::Play => act(&store, &mut pet, |p| sim.play(p))?,
        Command::Sleep => act(&store, &mut pet, |p| sim.toggle_sleep(p))?,
        Command::Medicine => act(&store, &mut pet, |p| sim.administer_medicine(p))?,
        Command::Respond => act(&store, &mut pet, |p| sim.respond_to_event(p))?,
        Command::Watch { fast } => {
            let heartbeat = if fast {
                HeartbeatConfig::fast()
            } else {
                HeartbeatConfig::from_settings(&config.heartbeat)
            };
            watch(&mut sim, &mut pet, &store, Heartbeat::new(heartbeat)).await?;
        }
        // Handled above.
        Command::Status { .. } | Command::Adopt { .. } => {}
    }
    Ok(())
}

fn act(
    store: &JsonFileStore,
    pet: &mut PetState,
    action: impl FnOnce(&mut PetState) -> ActionOutcome,
) -> Result<()> {
    let outcome = action(pet);
    println!("{}", outcome);
    save(store, pet)
}

async fn watch(
    sim: &mut Simulation,
    pet: &mut PetState,
    store: &JsonFileStore,
    heartbeat: Heartbeat,
) -> Result<()> {
    save(store, pet)?;
    let mut interval = tokio::time::interval(heartbeat.config().interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    info!(
        "Watching {} every {:?} (Ctrl-C to stop)",
        pet.name,
        heartbeat.config().interval
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                heartbeat.tick_and_save(sim, pet, store)?;
                let now = sim.now();
                println!("{}", status_line(pet, now));
                if let Some(prompt) = event_display(pet, now) {
                    println!("{}", prompt);
                }
                if pet.dead {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted, saving {}", pet.name);
                break;
            }
        }
    }

    save(store, pet)
}
