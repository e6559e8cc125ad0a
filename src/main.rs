use anyhow::Result;
use clap::Parser;
use scrybe::cli::{Backend, Cli, Commands};
use scrybe::engine::{Collaborators, PipelineEngine, RunResult};
use scrybe::events::{EventSink, PipelineEvent, StderrSink};
use scrybe::options::ExecutionOptions;
use scrybe::stages::export;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            model,
            device,
            compute_type,
            language,
            batch_size,
            no_diarize,
            hf_token,
            output_root,
            ffmpeg,
            backend,
        } => {
            let mut options = load_options(cli.config.as_deref())?;
            if let Some(model) = model {
                options.model = model;
            }
            if let Some(device) = device {
                options.device = device;
            }
            if let Some(compute_type) = compute_type {
                options.compute_type = compute_type;
            }
            if let Some(language) = language {
                options.language = Some(language);
            }
            if let Some(batch_size) = batch_size {
                options.batch_size = batch_size;
            }
            if no_diarize {
                options.diarize = false;
            }
            if let Some(token) = hf_token {
                options.hf_token = Some(token);
            }
            if let Some(root) = output_root {
                options.output_root = root;
            }
            if let Some(ffmpeg) = ffmpeg {
                options.ffmpeg_path = Some(ffmpeg);
            }
            options.validate()?;

            let collaborators = match backend {
                Backend::Mock => Collaborators::mock(),
            };
            run_pipeline(options, collaborators, input, cli.quiet)?;
        }
        Commands::Clear { input, output_root } => {
            let options = load_options(cli.config.as_deref())?;
            let root = output_root.unwrap_or(options.output_root);
            if scrybe::clear_cache(&input, &root)? {
                println!("Cache cleared for '{}'", input.display());
            } else {
                println!("No cache found for '{}'", input.display());
            }
        }
        Commands::Format { checkpoint } => {
            let output = export::format_checkpoint(&checkpoint)?;
            println!("Transcript written to: {}", output.display());
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/scrybe/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_options(custom_path: Option<&std::path::Path>) -> Result<ExecutionOptions> {
    let options = if let Some(path) = custom_path {
        ExecutionOptions::load(path)?
    } else {
        ExecutionOptions::load_or_default(&ExecutionOptions::default_path())?
    };

    Ok(options.with_env_overrides())
}

/// Run the pipeline on a background thread, streaming its events to stderr.
fn run_pipeline(
    options: ExecutionOptions,
    collaborators: Collaborators,
    input: PathBuf,
    quiet: bool,
) -> Result<()> {
    let started = Instant::now();
    let engine = PipelineEngine::new(options, collaborators);
    let handle = engine.spawn(input);

    let sink = StderrSink;
    loop {
        match handle.poll_event(Duration::from_millis(100)) {
            Some(PipelineEvent::Log { line }) if !quiet => sink.log(&line),
            Some(PipelineEvent::Progress { fraction }) if !quiet => sink.progress(fraction),
            Some(_) => {}
            None if handle.is_finished() => break,
            None => {}
        }
    }

    let result = handle.join()?;
    print_result(&result, started.elapsed().as_secs_f64());
    Ok(())
}

fn print_result(result: &RunResult, elapsed_secs: f64) {
    for segment in &result.transcript.segments {
        if segment.text.trim().is_empty() {
            continue;
        }
        let speaker = segment.speaker.as_deref().unwrap_or("SPEAKER_??");
        println!(
            "[{:.2}s - {:.2}s] {}: {}",
            segment.start,
            segment.end,
            speaker,
            segment.text.trim()
        );
    }

    println!();
    println!("Completed in {}", export::format_timestamp(elapsed_secs));
    println!("Transcript: {}", result.transcript_txt.display());
}
