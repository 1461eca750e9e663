//! Chess mentor terminal front end.
//!
//! Reads moves and commands from stdin, prints the board, and shows the
//! mentor's advice when the background analysis for the current position
//! finishes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chess_mentor::{
    parse_move_text, Command, Completion, Difficulty, LoadError, MentorConfig, Mentor,
    PipelineJob, PipelineOutcome, DEFAULT_CONFIG_FILE,
};
use clap::Parser;
use engine_session::{Analysis, Analyzer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chess_mentor", about = "Play chess with engine-backed strategic advice")]
struct Args {
    /// Config file (defaults to ./chess_mentor.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// UCI engine binary, overrides the config
    #[arg(long)]
    engine: Option<PathBuf>,

    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,
}

/// Progress of a background pipeline job.
enum JobEvent {
    Analyzed { generation: u64, analysis: Analysis },
    Finished(PipelineOutcome),
}

fn spawn_job(job: PipelineJob, events: mpsc::UnboundedSender<JobEvent>) {
    tokio::spawn(async move {
        let advice_job = job.analyze().await;
        let _ = events.send(JobEvent::Analyzed {
            generation: advice_job.generation(),
            analysis: advice_job.analysis().clone(),
        });
        let outcome = advice_job.advise().await;
        let _ = events.send(JobEvent::Finished(outcome));
    });
}

fn load_config(args: &Args) -> Result<MentorConfig> {
    let mut config = match &args.config {
        Some(path) => MentorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MentorConfig::load_or_default(DEFAULT_CONFIG_FILE.as_ref())
            .context("loading chess_mentor.toml")?,
    };
    if let Some(engine) = &args.engine {
        config.engine.path = engine.clone();
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    Ok(config)
}

/// Run one command. Returns `false` when the user wants to leave.
///
/// Never waits on the engine: anything slow runs on a spawned job.
fn handle(
    command: Command,
    mentor: &mut Mentor,
    events: &mpsc::UnboundedSender<JobEvent>,
) -> bool {
    match command {
        Command::Move(text) => {
            let Some(proposal) = parse_move_text(mentor.position(), &text) else {
                println!("Cannot read move '{text}'");
                return true;
            };
            match mentor.propose_move(&proposal) {
                Ok(accepted) => {
                    println!("Played {}", accepted.san);
                    if let Some(job) = accepted.job {
                        spawn_job(job, events.clone());
                    }
                    print!("{}", mentor.view());
                }
                Err(e) => println!("Illegal move: {e}"),
            }
        }
        Command::Undo => {
            if mentor.undo() {
                print!("{}", mentor.view());
            } else {
                println!("Nothing to undo");
            }
        }
        Command::Reset => {
            mentor.reset();
            print!("{}", mentor.view());
        }
        Command::Save => match mentor.save() {
            Ok(()) => println!("Game saved"),
            Err(e) => println!("Save failed: {e}"),
        },
        Command::Load => match mentor.load() {
            Ok(job) => {
                if let Some(job) = job {
                    spawn_job(job, events.clone());
                }
                println!("Game loaded");
                print!("{}", mentor.view());
            }
            Err(LoadError::NothingSaved) => println!("No saved game found"),
            Err(e) => println!("Load failed: {e}"),
        },
        Command::Difficulty(difficulty) => {
            mentor.set_difficulty(difficulty);
            println!(
                "Difficulty set to {difficulty} (search depth {})",
                difficulty.depth()
            );
        }
        Command::Show => print!("{}", mentor.view()),
        Command::Help => println!("{}", chess_mentor::command::HELP),
        Command::Quit => return false,
    }
    true
}

fn on_event(event: JobEvent, mentor: &mut Mentor) {
    match event {
        JobEvent::Analyzed {
            generation,
            analysis,
        } => {
            mentor.record_analysis(generation, &analysis);
        }
        JobEvent::Finished(outcome) => {
            if mentor.complete(outcome) == Completion::Applied {
                print!("{}", mentor.view());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let engine = Arc::new(config.build_engine());
    let advisor = config
        .build_advisor()
        .context("setting up the advice service")?;
    let mut mentor = Mentor::new(engine.clone(), advisor, Box::new(config.build_store()))
        .with_difficulty(config.difficulty)
        .with_save_key(config.storage.key.clone())
        .with_language(config.advice.language.clone());

    info!(engine = %config.engine.path.display(), difficulty = %config.difficulty, "chess mentor started");
    println!("Chess Mentor. Type 'help' for commands.");
    print!("{}", mentor.view());

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if !handle(command, &mut mentor, &events_tx) {
                            break;
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
            Some(event) = events_rx.recv() => on_event(event, &mut mentor),
        }
    }

    engine.terminate().await;
    Ok(())
}
