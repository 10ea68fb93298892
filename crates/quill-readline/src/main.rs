use std::borrow::Cow::{self, Borrowed, Owned};
use std::io::Write as _;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use quill_core::SessionContext;
use quill_core::diff::{self, EditOutcome};
use quill_core::path;
use quill_core::response::{FileToEdit, StructuredResponse};
use quill_interaction::{OllamaApiAgent, run_turn};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec!["/add".to_string()],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_banner(ctx: &SessionContext, model: &str) {
    println!("{}", "=== Quill Engineer ===".bright_blue().bold());
    println!("{}", "Your AI pair programming assistant".cyan());
    println!(
        "{}",
        format!("Model: {model}  |  Session files: {}/", ctx.session_dir.display()).bright_black()
    );
    println!();
    println!("{}", "Commands:".bright_yellow().bold());
    println!(
        "{}",
        "  /add path/to/file  - Add a file to the conversation".yellow()
    );
    println!("{}", "  exit or quit       - End the session".yellow());
    println!();
}

/// Handles `/add <path>`: inject the file into the conversation without a
/// model call. Returns true if the input was an /add command.
fn try_handle_add_command(ctx: &mut SessionContext, input: &str) -> bool {
    let prefix = "/add ";
    if !input.to_lowercase().starts_with(prefix) {
        return false;
    }
    let raw_path = input[prefix.len()..].trim();

    let result = path::canonicalize(Path::new(raw_path))
        .and_then(|canonical| ctx.ensure_file_in_context(&canonical));
    match result {
        Ok(()) => {
            println!(
                "{}",
                format!("Added file '{raw_path}' to conversation.").green()
            );
        }
        Err(err) => {
            println!(
                "{}",
                format!("Could not add file '{raw_path}': {err}").red()
            );
        }
    }
    println!();
    true
}

fn create_requested_files(ctx: &mut SessionContext, response: &StructuredResponse) {
    for file in &response.files_to_create {
        match ctx.create_file(Path::new(&file.path), &file.content) {
            Ok(written) => {
                println!(
                    "{}",
                    format!("Created/updated file at '{}'", written.display()).green()
                );
            }
            Err(err) => {
                println!(
                    "{}",
                    format!("Could not create file '{}': {err}", file.path).red()
                );
            }
        }
    }
}

fn show_diff_table(edits: &[FileToEdit]) {
    println!();
    println!("{}", "Proposed Edits:".bright_blue().bold());
    println!("{}", "-".repeat(80));

    for edit in edits {
        println!("{}", format!("File: {}", edit.path).cyan());
        println!("{}", "Original:".red());
        println!("{}", edit.original_snippet);
        println!("{}", "New:".green());
        println!("{}", edit.new_snippet);
        println!("{}", "-".repeat(80));
    }
}

fn apply_confirmed_edits(ctx: &mut SessionContext, edits: &[FileToEdit]) {
    for edit in edits {
        let outcome = diff::apply_edit(
            ctx,
            Path::new(&edit.path),
            &edit.original_snippet,
            &edit.new_snippet,
        );
        match outcome {
            Ok(EditOutcome::Applied) => {
                println!(
                    "{}",
                    format!("Applied diff edit to '{}'", edit.path).green()
                );
            }
            Ok(EditOutcome::SnippetNotFound { expected, actual }) => {
                println!(
                    "{}",
                    format!("Original snippet not found in '{}'. No changes made.", edit.path)
                        .yellow()
                );
                println!("{}", "\nExpected snippet:".yellow());
                println!("{expected}");
                println!("{}", "\nActual file content:".yellow());
                println!("{actual}");
            }
            Err(err) => {
                println!(
                    "{}",
                    format!("Could not edit '{}': {err}", edit.path).red()
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let agent = OllamaApiAgent::from_env();
    let mut ctx = SessionContext::new();

    let helper = CliHelper::new();
    let mut rl: Editor<CliHelper, rustyline::history::DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(helper));

    print_banner(&ctx, agent.model());

    loop {
        let readline = rl.readline("You> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }

                if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
                    println!("{}", "Goodbye!".yellow());
                    break;
                }

                let _ = rl.add_history_entry(&line);

                if try_handle_add_command(&mut ctx, trimmed) {
                    continue;
                }

                print!("{}", "\nAssistant> ".bright_blue().bold());
                let _ = std::io::stdout().flush();

                let mut render = |fragment: &str| {
                    print!("{fragment}");
                    let _ = std::io::stdout().flush();
                };

                let response = match run_turn(&mut ctx, &agent, trimmed, &mut render).await {
                    Ok(response) => response,
                    Err(err) => {
                        println!("\n{}", format!("{err}").red());
                        continue;
                    }
                };
                println!("\n");

                create_requested_files(&mut ctx, &response);

                if !response.files_to_edit.is_empty() {
                    show_diff_table(&response.files_to_edit);
                    let confirm = rl.readline("\nDo you want to apply these changes? (y/n): ");
                    match confirm {
                        Ok(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                            apply_confirmed_edits(&mut ctx, &response.files_to_edit);
                        }
                        _ => {
                            println!("{}", "Skipped applying diff edits.".yellow());
                        }
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "Interrupted. Exiting.".yellow());
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "Exiting.".yellow());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    println!("{}", "Session finished.".blue());
    Ok(())
}
