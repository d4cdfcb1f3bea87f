use clap::Parser;
use colored::Colorize;
use quill::{RunFlags, Session};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Runs a quill script, or starts an interactive prompt when no script is
/// given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run.
    file: Option<PathBuf>,

    /// Evaluate CODE instead of reading a script.
    #[arg(short, long, value_name = "CODE", conflicts_with = "file")]
    eval: Option<String>,

    /// Print the token stream.
    #[arg(long)]
    lexer: bool,

    /// Print the syntax tree.
    #[arg(long)]
    parser: bool,

    /// Print the value of the program.
    #[arg(long)]
    interpreter: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let session = Session::new(RunFlags {
        show_tokens: args.lexer,
        show_ast: args.parser,
        show_value: args.interpreter,
    });

    match (&args.eval, &args.file) {
        (Some(code), _) => run_source(&session, "<eval>", code),
        (None, Some(file)) => run_file(&session, file),
        (None, None) => run_prompt(&session),
    }
}

fn run_file(session: &Session, file: &PathBuf) -> ExitCode {
    match fs::read_to_string(file) {
        Ok(contents) => run_source(session, &file.display().to_string(), &contents),
        Err(e) => {
            eprintln!("{}", format!("{}: {}", file.display(), e).red());
            ExitCode::from(66)
        }
    }
}

fn run_source(session: &Session, name: &str, source: &str) -> ExitCode {
    match session.run(name, source) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::from(65)
        }
    }
}

fn run_prompt(session: &Session) -> ExitCode {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("{}", format!("could not start the prompt: {}", e).red());
            return ExitCode::from(74);
        }
    };
    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);
                match input {
                    ".exit" | ".quit" | ".q" => break,
                    ".env" => {
                        println!("{}", session.env.names().join(" "));
                        continue;
                    }
                    _ => (),
                }
                match session.run("<stdin>", input) {
                    Ok(value) => println!("{} {}", "->".dimmed(), value),
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}", format!("read error: {}", e).red());
                return ExitCode::from(74);
            }
        }
    }
    ExitCode::SUCCESS
}
