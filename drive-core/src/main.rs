//! src/main.rs
//! ============================================================================
//! # Drive Shell Entry Point
//!
//! Line-oriented front end for the drive engine. Reads commands from stdin,
//! forwards them to the event loop, and prints the listing whenever the
//! engine publishes a new snapshot. Closing stdin waits for an in-flight
//! upload to commit before exiting, so piped scripts see their uploads land.

use std::{panic::PanicHookInfo, sync::Arc};

use anyhow::{Context, Result};
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    signal,
    sync::Notify,
};
use tracing::{debug, error, info, warn};

use drive_core::{
    DriveState, Logger,
    config::Config,
    controller::{
        actions::Action,
        command_parser::{HELP_TEXT, ShellCommand, parse_command},
        event_loop::{DriveEvent, DriveHandle},
    },
    upload::ticker::IntervalTicker,
    view::{DriveSnapshot, listing},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::load().await.unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e:#}");
        Config::default()
    });

    let _log_guard = Logger::init_tracing(&config.logging).context("Failed to initialize logging")?;
    setup_panic_handler();
    info!("Starting drive shell");

    let shell = Shell::new(&config).context("Failed to initialize drive state")?;
    let final_state = shell.run().await.context("Drive shell runtime error")?;

    info!(
        entries = final_state.catalog().len(),
        uploads = final_state.upload().completed_runs(),
        "Drive shell exited cleanly"
    );
    Ok(())
}

struct Shell {
    handle: DriveHandle,
    latest: Option<Box<DriveSnapshot>>,
    /// Upload batches sent whose commit or rejection has not arrived yet.
    awaiting_uploads: usize,
    shutdown: Arc<Notify>,
}

enum Flow {
    Continue,
    Exit,
}

impl Shell {
    fn new(config: &Config) -> Result<Self> {
        let state = DriveState::new(config)?;
        let ticker = IntervalTicker::new(config.upload.tick_interval);

        Ok(Self {
            handle: DriveHandle::spawn(state, ticker),
            latest: None,
            awaiting_uploads: 0,
            shutdown: Arc::new(Notify::new()),
        })
    }

    async fn run(mut self) -> Result<DriveState> {
        self.setup_shutdown_handler();

        let mut lines: Lines<BufReader<Stdin>> = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        let shutdown = self.shutdown.clone();

        println!("drive shell, type 'help' for commands");

        loop {
            tokio::select! {
                () = shutdown.notified() => break,

                line = lines.next_line(), if stdin_open => {
                    match line.context("Failed to read stdin")? {
                        Some(line) => {
                            if matches!(self.handle_line(&line)?, Flow::Exit) {
                                break;
                            }
                        }
                        None => {
                            debug!("stdin closed");
                            stdin_open = false;
                            if self.awaiting_uploads == 0 {
                                break;
                            }
                        }
                    }
                }

                event = self.handle.events.recv() => {
                    let Some(event) = event else {
                        warn!("Event loop stopped unexpectedly");
                        break;
                    };
                    self.handle_event(event);
                    if !stdin_open && self.awaiting_uploads == 0 {
                        break;
                    }
                }
            }
        }

        Ok(self.handle.shutdown().await?)
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                println!("error: {e}");
                return Ok(Flow::Continue);
            }
        };

        match command {
            ShellCommand::Help => println!("{HELP_TEXT}"),
            ShellCommand::Json => match &self.latest {
                Some(snapshot) => println!("{}", snapshot.to_json()?),
                None => println!("{{}}"),
            },
            ShellCommand::Action(Action::Quit) => return Ok(Flow::Exit),
            ShellCommand::Action(action) => {
                if matches!(&action, Action::StartUpload(files) if !files.is_empty()) {
                    self.awaiting_uploads += 1;
                }
                self.handle.send(action)?;
            }
        }

        Ok(Flow::Continue)
    }

    fn handle_event(&mut self, event: DriveEvent) {
        match event {
            DriveEvent::Changed(snapshot) => {
                print!("{}", listing::render(&snapshot));
                self.latest = Some(snapshot);
            }
            DriveEvent::UploadProgress { progress } => println!("upload: {progress}%"),
            DriveEvent::UploadCompleted { committed } => {
                self.awaiting_uploads = self.awaiting_uploads.saturating_sub(1);
                let ids: Vec<&str> = committed.iter().map(|id| id.as_str()).collect();
                println!("upload complete: {}", ids.join(", "));
            }
            DriveEvent::Rejected { action, reason } => {
                if action == "start_upload" {
                    self.awaiting_uploads = self.awaiting_uploads.saturating_sub(1);
                }
                println!("{action}: {reason}");
            }
        }
    }

    fn setup_shutdown_handler(&self) {
        let shutdown: Arc<Notify> = self.shutdown.clone();

        tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            info!("Received Ctrl+C");
            shutdown.notify_one();
        });
    }
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
