pub mod ast;
pub mod builtins;
pub mod callable;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod position;
pub mod scanner;
pub mod token;
pub mod value;

pub use environment::Environment;
pub use error::{Error, Result};
pub use value::Value;

use ast::AstPrinter;
use interpreter::Interpreter;
use log::trace;

/// Optional diagnostic dumps printed to stdout while running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub show_tokens: bool,
    pub show_ast: bool,
    pub show_value: bool,
}

/// Lexes, parses and evaluates `source` against `env`. Stops at the first
/// error of any stage.
pub fn run(source_name: &str, source: &str, flags: &RunFlags, env: &Environment) -> Result<Value> {
    let tokens = scanner::tokenize(source_name, source);
    if flags.show_tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }
    let program = parser::parse(&tokens)?;
    if flags.show_ast {
        println!("{}", program.accept(&mut AstPrinter {}));
    }
    trace!("evaluating {}", source_name);
    let value = Interpreter::new().evaluate(&program, env)?;
    if flags.show_value {
        println!("{}", value);
    }
    Ok(value)
}

/// State a host keeps between inputs: the root environment, with the
/// standard built-ins declared, and the dump flags.
#[derive(Debug)]
pub struct Session {
    pub env: Environment,
    pub flags: RunFlags,
}

impl Session {
    pub fn new(flags: RunFlags) -> Session {
        let env = Environment::new();
        builtins::install(&env);
        Session { env, flags }
    }

    pub fn run(&self, source_name: &str, source: &str) -> Result<Value> {
        run(source_name, source, &self.flags, &self.env)
    }
}
