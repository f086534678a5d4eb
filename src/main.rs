//! notelang: render a score file to a Standard MIDI File.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use notelang::dsl::Compiler;
use notelang::eval::Interpreter;
use notelang::event::EventLog;
use notelang::midi::{write_midi_file, MidiOutputConfig};

#[derive(Debug, Parser)]
#[command(version, about = "Render a notelang score to MIDI")]
struct Cli {
    /// Score file to run.
    input: PathBuf,

    /// Where to write the MIDI file (defaults to the configured output).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// MIDI config file (defaults to ~/.notelang/midi.yaml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every emitted event.
    #[arg(long)]
    print_events: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => MidiOutputConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MidiOutputConfig::load().unwrap_or_default(),
    };
    let output = cli.output.unwrap_or(config.output);

    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let program = Compiler::parse(&source)?;

    let mut interpreter = Interpreter::new(EventLog::new());
    interpreter.run(&program)?;
    let events = interpreter.into_sink().into_events();

    if cli.print_events {
        for event in &events {
            println!("{event}");
        }
    }

    write_midi_file(&output, &events, config.ticks_per_beat)?;
    println!("Created new {}", output.display());
    println!("Successfully saved music to {}", output.display());
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
