use crate::ast::Node;
use crate::environment::Environment;
use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Host-provided behavior. Receives every evaluated argument and the
/// environment of the call site.
pub type NativeFn = Rc<dyn Fn(&[Value], &Environment) -> Value>;

#[derive(Clone)]
pub struct Function {
    data: Rc<FunctionImpl>,
}

struct FunctionImpl {
    name: Option<String>,
    params: Vec<String>,
    strategy: Strategy,
}

enum Strategy {
    Native(NativeFn),
    /// `closure` is the environment the declaration was evaluated in.
    Ast { block: Rc<Node>, closure: Environment },
}

impl Function {
    /// `closure` is held strongly, so a function stored in the scope it
    /// captures keeps that scope alive for the rest of the process.
    pub fn new(
        name: Option<String>,
        params: Vec<String>,
        block: Rc<Node>,
        closure: Environment,
    ) -> Function {
        Function {
            data: Rc::new(FunctionImpl {
                name,
                params,
                strategy: Strategy::Ast { block, closure },
            }),
        }
    }
    pub fn native<F>(name: &str, call: F) -> Function
    where
        F: Fn(&[Value], &Environment) -> Value + 'static,
    {
        Function {
            data: Rc::new(FunctionImpl {
                name: Some(name.to_string()),
                params: Vec::new(),
                strategy: Strategy::Native(Rc::new(call)),
            }),
        }
    }

    /// Runs the function. Parameters are bound positionally in a fresh child
    /// of the captured environment; missing arguments bind `undefined` and
    /// extra ones are dropped.
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        call_site: &Environment,
    ) -> Result<Value> {
        match &self.data.strategy {
            Strategy::Native(call) => Ok(call(&arguments, call_site)),
            Strategy::Ast { block, closure } => {
                let environment = closure.new_child();
                let mut arguments = arguments.into_iter();
                for param in self.params() {
                    environment.declare(param, arguments.next().unwrap_or(Value::Undefined));
                }
                interpreter.evaluate(block, &environment)
            }
        }
    }
    pub fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }
    pub fn params(&self) -> &[String] {
        &self.data.params
    }
    pub fn is_native(&self) -> bool {
        matches!(self.data.strategy, Strategy::Native(_))
    }
    pub fn equals(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_native(), self.name()) {
            (true, _) => write!(f, "<native function>"),
            (false, Some(name)) => write!(f, "<function {}>", name),
            (false, None) => write!(f, "<function>"),
        }
    }
}
