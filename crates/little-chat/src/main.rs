//! An interactive chat panel in the terminal.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::process::ExitCode;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use little_chat::core::conversation::Sender;
use little_chat::core::{BUSY_LABEL, SubmitError};
use little_chat::render;
use little_chat::{ChatPanelBuilder, PanelView};
use little_chat_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

const DEFAULT_WIDTH: usize = 80;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return ExitCode::FAILURE;
    };
    let mut config_builder = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config_builder = config_builder.with_base_url(base_url);
    }
    if let Ok(model) = env::var("OPENAI_MODEL") {
        config_builder = config_builder.with_model(model);
    }
    let config = config_builder.build();
    debug!("using {config:?}");
    let provider = OpenAIProvider::new(config);

    let width = env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_WIDTH);

    let (view_tx, mut view_rx) = mpsc::unbounded_channel();
    let panel = ChatPanelBuilder::with_provider(provider)
        .on_update(move |view| {
            view_tx.send(view.clone()).ok();
        })
        .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let mut printer = Printer { printed: 0, width };
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdin_closed = false;

    while !stdin_closed {
        print!("{} ", ">".bright_white().bold());
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut lines).await else {
            break;
        };
        match panel.submit(&line) {
            Ok(_) => {}
            // The input field is required, blank submissions do nothing.
            Err(SubmitError::Empty) => continue,
            Err(err) => {
                println!("{}", err.bright_yellow());
                continue;
            }
        }

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message(BUSY_LABEL);
                    progress_bar
                })
                .inc(1);

            let tick = sleep(Duration::from_millis(100));
            select! {
                view = view_rx.recv() => {
                    let Some(view) = view else {
                        return ExitCode::FAILURE;
                    };
                    if let Some(progress_bar) = progress_bar.take() {
                        progress_bar.finish_and_clear();
                    }
                    printer.print_new(&view);
                    if !view.pending {
                        break;
                    }
                }
                line = lines.next_line(), if !stdin_closed => {
                    if let Some(progress_bar) = progress_bar.take() {
                        progress_bar.finish_and_clear();
                    }
                    match line {
                        Ok(Some(_)) => println!(
                            "{}",
                            "input is disabled until the reply arrives"
                                .bright_yellow()
                        ),
                        Ok(None) => stdin_closed = true,
                        Err(err) => {
                            error!("error reading input: {err}");
                            stdin_closed = true;
                        }
                    }
                }
                _ = tick => {}
            }
        }
    }

    ExitCode::SUCCESS
}

/// Prints the messages that have not been printed yet.
struct Printer {
    printed: usize,
    width: usize,
}

impl Printer {
    fn print_new(&mut self, view: &PanelView) {
        for msg in view.messages.iter().skip(self.printed) {
            for (idx, line) in
                render::render_message(msg, self.width).iter().enumerate()
            {
                match (idx, msg.sender()) {
                    (0, _) => println!("{}", line.bold()),
                    (_, Sender::User) => println!("{}", line.bright_white()),
                    (_, Sender::Bot) => println!("{}", line.bright_cyan()),
                }
            }
        }
        self.printed = view.messages.len();

        if !view.pending {
            if let Some(notice) = render::render_failure(view) {
                println!("{}", notice.bright_red());
            }
        }
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {err}");
            None
        }
    }
}
