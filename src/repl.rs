//! ABOUTME: Interactive REPL loop — read, macro-expand, evaluate, print (C9)

use crate::env::Environment;
use crate::error::WispError;
use crate::eval::eval_program;
use crate::highlighter::WispHelper;
use crate::lexer::Lexer;
use crate::macros::{define_macros, expand_macros};
use crate::object::Object;
use crate::parser::Parser;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::path::Path;

const PROMPT: &str = "wisp> ";

/// Runs the REPL until the user exits (`:quit`, `:exit`, or EOF).
/// `history_path` is loaded on start and saved on every clean exit;
/// a missing history file on load is not an error, only an empty history.
pub fn run(history_path: &Path, color: bool) -> Result<(), WispError> {
    let env = Environment::new();
    let macro_env = Environment::new();

    let config = Config::builder().auto_add_history(true).build();
    let mut editor: Editor<WispHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config).expect("terminal supports line editing");
    editor.set_helper(Some(WispHelper::new(color)));
    let _ = editor.load_history(history_path);

    println!("wisp — type :quit or :exit to leave, Ctrl-D also works");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == ":quit" || trimmed == ":exit" {
                    break;
                }

                eval_line(trimmed, &env, &macro_env);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {err}");
                break;
            }
        }
    }

    editor
        .save_history(history_path)
        .map_err(|source| WispError::HistoryAccess {
            path: history_path.to_path_buf(),
            source,
        })
}

fn eval_line(line: &str, env: &std::rc::Rc<Environment>, macro_env: &std::rc::Rc<Environment>) {
    let (mut program, errors) = Parser::new(Lexer::new(line)).parse_program();
    if !errors.is_empty() {
        for message in &errors {
            println!("    {message}");
        }
        return;
    }

    define_macros(&mut program, macro_env);
    let program = expand_macros(program, macro_env);

    let value = eval_program(&program.statements, env.clone());
    if !matches!(value, Object::Null) {
        println!("{value}");
    }
}
