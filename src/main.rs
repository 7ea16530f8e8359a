mod ast;
mod builtins;
mod env;
mod error;
mod eval;
mod highlighter;
mod lexer;
mod macros;
mod modify;
mod object;
mod parser;
mod repl;
mod token;

use clap::Parser as ClapParser;
use env::Environment;
use error::WispError;
use eval::eval_program;
use lexer::Lexer;
use macros::{define_macros, expand_macros};
use parser::Parser;
use std::path::PathBuf;

/// A tree-walking interpreter for a small expression-oriented scripting
/// language with closures and compile-time AST macros.
#[derive(ClapParser, Debug)]
#[command(name = "wisp")]
#[command(version)]
#[command(about = "Run a wisp script, or start the interactive REPL")]
struct CliArgs {
    /// Script file to execute. Starts the REPL when omitted.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Disable syntax-highlighted REPL input.
    #[arg(long = "no-color")]
    no_color: bool,

    /// Path to the REPL history file.
    #[arg(long = "history", value_name = "PATH", default_value = ".wisp_history")]
    history: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    match args.script {
        Some(path) => run_script(&path)?,
        None => repl::run(&args.history, !args.no_color)?,
    }

    Ok(())
}

fn run_script(path: &PathBuf) -> Result<(), WispError> {
    let source = std::fs::read_to_string(path).map_err(|source| WispError::ScriptRead {
        path: path.clone(),
        source,
    })?;

    let (mut program, errors) = Parser::new(Lexer::new(&source)).parse_program();
    if !errors.is_empty() {
        for message in &errors {
            eprintln!("{message}");
        }
        return Ok(());
    }

    let env = Environment::new();
    let macro_env = Environment::new();
    define_macros(&mut program, &macro_env);
    let program = expand_macros(program, &macro_env);

    let result = eval_program(&program.statements, env);
    if matches!(result, object::Object::Error(_)) {
        eprintln!("{result}");
    }

    Ok(())
}
