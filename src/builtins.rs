//! Native bindings a host can declare into its root environment before
//! running a program. The interpreter knows nothing about them.

use crate::callable::Function;
use crate::environment::Environment;
use crate::value::Value;
use log::warn;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Declares the standard bindings, printing to stdout.
pub fn install(env: &Environment) {
    install_with_output(env, Rc::new(RefCell::new(io::stdout())));
}

/// Declares the standard bindings, with `write`/`writeln` sending their
/// text to `out`.
pub fn install_with_output<W: Write + 'static>(env: &Environment, out: Rc<RefCell<W>>) {
    let sink = Rc::clone(&out);
    declare(
        env,
        Function::native("write", move |args, _| {
            emit(&sink, &join(args), false);
            Value::Undefined
        }),
    );
    let sink = Rc::clone(&out);
    declare(
        env,
        Function::native("writeln", move |args, _| {
            emit(&sink, &join(args), true);
            Value::Undefined
        }),
    );
    declare(
        env,
        Function::native("typeof", |args, _| {
            let tag = args.first().map_or("undefined", Value::type_name);
            Value::String(tag.to_string())
        }),
    );
    declare(
        env,
        Function::native("len", |args, _| match args.first() {
            Some(Value::String(x)) => Value::Number(x.chars().count() as f64),
            Some(Value::Array(x)) => Value::Number(x.len() as f64),
            Some(Value::Object(x)) => Value::Number(x.len() as f64),
            _ => Value::Undefined,
        }),
    );
}

fn declare(env: &Environment, function: Function) {
    let name = function.name().unwrap_or_default().to_string();
    if !env.declare(&name, Value::Function(function)) {
        warn!("built-in '{}' is already bound; keeping the existing binding", name);
    }
}

fn join(args: &[Value]) -> String {
    args.iter()
        .map(|x| x.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

fn emit<W: Write>(out: &RefCell<W>, text: &str, newline: bool) {
    let mut out = out.borrow_mut();
    let result = if newline {
        writeln!(out, "{}", text)
    } else {
        write!(out, "{}", text).and_then(|_| out.flush())
    };
    if let Err(e) = result {
        warn!("failed to write program output: {}", e);
    }
}

#[cfg(test)]
mod builtins_tests {
    use crate::builtins::install_with_output;
    use crate::environment::Environment;
    use crate::run;
    use crate::value::Value;
    use crate::RunFlags;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (Environment, Rc<RefCell<Vec<u8>>>) {
        let env = Environment::new();
        let out = Rc::new(RefCell::new(Vec::new()));
        install_with_output(&env, Rc::clone(&out));
        (env, out)
    }

    #[test]
    fn write_and_writeln() {
        let (env, out) = setup();
        run("test", "write(1, 'a'); writeln([true]); writeln()", &RunFlags::default(), &env).unwrap();
        assert_eq!(String::from_utf8(out.borrow().clone()).unwrap(), "1 a[true]\n\n");
    }

    #[test]
    fn typeof_and_len() {
        let (env, _) = setup();
        let flags = RunFlags::default();
        assert_eq!(
            run("test", "typeof({})", &flags, &env),
            Ok(Value::String("object".to_string()))
        );
        assert_eq!(
            run("test", "typeof()", &flags, &env),
            Ok(Value::String("undefined".to_string()))
        );
        assert_eq!(run("test", "len('héllo')", &flags, &env), Ok(Value::Number(5.0)));
        assert_eq!(run("test", "len([1, 2])", &flags, &env), Ok(Value::Number(2.0)));
        assert_eq!(run("test", "len(3)", &flags, &env), Ok(Value::Undefined));
    }

    #[test]
    fn builtins_are_ordinary_bindings() {
        let (env, _) = setup();
        let err = run("test", "let writeln = 1", &RunFlags::default(), &env).unwrap_err();
        assert_eq!(err.kind_name(), "RedeclarationError");
        assert_eq!(
            run("test", "writeln", &RunFlags::default(), &env).map(|v| v.to_string()),
            Ok("<native function>".to_string())
        );
    }
}
