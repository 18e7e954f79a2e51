//! Line-oriented REPL front-end.
//!
//! A plain line runs a turn: the first one generates code, later ones are
//! treated as feedback on the previous version. Colon commands manage the
//! version history. Generated code goes to stdout; everything else goes to
//! stderr so the output stays pipeable.

use std::io::{BufRead, Write, stderr, stdin};

use anyhow::Result;
use verso_core::config::Config;
use verso_core::engine::Engine;
use verso_core::events::{TurnEvent, TurnMode};
use verso_core::interrupt;
use verso_core::session::Session;

use super::exec::run_cancellable_turn;

const HELP: &str = "\
Commands:
  <text>            generate code (first line) or give feedback (later lines)
  :new <text>       discard the history and generate from scratch
  :feedback <text>  adjust the current code
  :versions         list saved versions, newest first
  :select <n>       roll back to version n
  :history          show all turns
  :help             show this help
  :quit             exit";

/// One parsed REPL line.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Turn(&'a str),
    New(&'a str),
    Feedback(&'a str),
    Versions,
    Select(usize),
    History,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> ReplCommand<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return ReplCommand::Turn(line);
    };

    let (command, arg) = match rest.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (rest, ""),
    };
    match command {
        "new" if !arg.is_empty() => ReplCommand::New(arg),
        "feedback" if !arg.is_empty() => ReplCommand::Feedback(arg),
        "versions" => ReplCommand::Versions,
        "select" => match arg.parse::<usize>() {
            Ok(version) => ReplCommand::Select(version),
            Err(_) => ReplCommand::Unknown(line),
        },
        "history" => ReplCommand::History,
        "help" => ReplCommand::Help,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line),
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let engine = Engine::new(config)?;
    let mut session = Session::new();
    let mut err = stderr();

    writeln!(err, "verso repl (model: {})", engine.model())?;
    writeln!(err, "Type :help for commands.")?;

    let stdin = stdin();
    let mut line = String::new();
    loop {
        if interrupt::is_interrupted() {
            return Err(interrupt::InterruptedError.into());
        }

        write!(err, "> ")?;
        err.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => writeln!(err, "{HELP}")?,
            ReplCommand::Turn(text) => {
                let mode = if session.is_empty() {
                    TurnMode::Initial
                } else {
                    TurnMode::Feedback
                };
                execute_turn(&engine, &mut session, mode, text).await?;
            }
            ReplCommand::New(text) => {
                if !session.is_empty() {
                    session.reset();
                }
                execute_turn(&engine, &mut session, TurnMode::Initial, text).await?;
            }
            ReplCommand::Feedback(text) => {
                if session.is_empty() {
                    writeln!(err, "Generate code before giving feedback.")?;
                } else {
                    execute_turn(&engine, &mut session, TurnMode::Feedback, text).await?;
                }
            }
            ReplCommand::Versions => {
                if session.is_empty() {
                    writeln!(err, "(no versions)")?;
                } else {
                    for label in session.version_labels() {
                        writeln!(err, "{label}")?;
                    }
                }
            }
            ReplCommand::Select(version) => match session.select_version(version) {
                Ok(code) => {
                    let code = code.to_string();
                    writeln!(err, "[Version {version}]")?;
                    print_code(&code);
                }
                Err(e) => writeln!(err, "{e}")?,
            },
            ReplCommand::History => {
                let text = session.history_text();
                if text.is_empty() {
                    writeln!(err, "(no history)")?;
                } else {
                    writeln!(err, "{text}")?;
                }
            }
            ReplCommand::Unknown(input) => {
                writeln!(err, "Unknown command: {input} (try :help)")?;
            }
        }
    }

    writeln!(err, "Goodbye!")?;
    Ok(())
}

async fn execute_turn(
    engine: &Engine,
    session: &mut Session,
    mode: TurnMode,
    text: &str,
) -> Result<()> {
    let mut err = stderr();
    writeln!(err, "Generating...")?;

    match run_cancellable_turn(engine, session, mode, text).await {
        TurnEvent::Completed {
            label,
            prompt,
            response,
        } => {
            let record = session.commit_turn(&label, prompt, response);
            writeln!(err, "[Version {}]", record.index)?;
            let code = record.code.clone();
            print_code(&code);
        }
        TurnEvent::Failed { kind, message, .. } => {
            writeln!(err, "Error ({kind}): {message}")?;
        }
        TurnEvent::Interrupted => {
            interrupt::reset();
            writeln!(err, "Canceled.")?;
        }
    }
    Ok(())
}

fn print_code(code: &str) {
    print!("{code}");
    if !code.ends_with('\n') {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_is_a_turn() {
        assert_eq!(parse_line("sort a list\n"), ReplCommand::Turn("sort a list"));
    }

    #[test]
    fn empty_line_is_ignored() {
        assert_eq!(parse_line("   \n"), ReplCommand::Empty);
    }

    #[test]
    fn select_parses_version_number() {
        assert_eq!(parse_line(":select 3"), ReplCommand::Select(3));
    }

    #[test]
    fn select_without_number_is_unknown() {
        assert!(matches!(parse_line(":select x"), ReplCommand::Unknown(_)));
        assert!(matches!(parse_line(":select"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn colon_commands_parse() {
        assert_eq!(parse_line(":versions"), ReplCommand::Versions);
        assert_eq!(parse_line(":history"), ReplCommand::History);
        assert_eq!(parse_line(":quit"), ReplCommand::Quit);
        assert_eq!(parse_line(":q"), ReplCommand::Quit);
        assert_eq!(parse_line(":new start over"), ReplCommand::New("start over"));
        assert_eq!(
            parse_line(":feedback add types"),
            ReplCommand::Feedback("add types")
        );
    }

    #[test]
    fn new_without_text_is_unknown() {
        assert!(matches!(parse_line(":new"), ReplCommand::Unknown(_)));
    }
}
