use crate::ast::{BinaryOp, LiteralKeyword, LogicalOp, Node, NodeKind, UnaryOp};
use crate::callable::Function;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::position::Span;
use crate::value::Value;
use log::{debug, trace};
use std::collections::BTreeMap;

/// Why evaluation stopped early: a failure, or a `return` travelling out to
/// the nearest call.
enum Unwind {
    Error(Error),
    Return(Value),
}

impl From<Error> for Unwind {
    fn from(e: Error) -> Unwind {
        Unwind::Error(e)
    }
}

type Flow = std::result::Result<Value, Unwind>;

pub struct Interpreter {
    depth: usize,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter { depth: 0 }
    }

    /// Evaluates `node` in `env`. A `return` reached inside `node` ends
    /// evaluation with the returned value.
    pub fn evaluate(&mut self, node: &Node, env: &Environment) -> Result<Value> {
        match self.visit(node, env) {
            Ok(value) | Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(e)) => Err(e),
        }
    }

    fn visit(&mut self, node: &Node, env: &Environment) -> Flow {
        match &node.kind {
            NodeKind::Program { body } | NodeKind::BlockStatement { body } => {
                let mut last = Value::Undefined;
                for stmt in body {
                    last = self.visit(stmt, env)?;
                }
                Ok(last)
            }
            NodeKind::NumericLiteral(x) => Ok(Value::Number(*x)),
            NodeKind::StringLiteral(x) => Ok(Value::String(x.clone())),
            NodeKind::Literal(raw) => match raw.parse::<LiteralKeyword>() {
                Ok(LiteralKeyword::Undefined) => Ok(Value::Undefined),
                Ok(LiteralKeyword::Null) => Ok(Value::Null),
                Ok(LiteralKeyword::True) => Ok(Value::Boolean(true)),
                Ok(LiteralKeyword::False) => Ok(Value::Boolean(false)),
                Err(_) => Err(unhandled(node).into()),
            },
            NodeKind::Identifier(name) => Ok(env.lookup(name).unwrap_or(Value::Undefined)),
            NodeKind::ArrayLiteral(values) => {
                let mut items: Vec<Value> = Vec::with_capacity(values.len());
                for value in values {
                    items.push(self.visit(value, env)?);
                }
                Ok(Value::Array(items))
            }
            NodeKind::ObjectLiteral(properties) => {
                let mut object: BTreeMap<String, Value> = BTreeMap::new();
                for (key, value) in properties {
                    let value = match value {
                        Some(value) => self.visit(value, env)?,
                        None => env.lookup(key).unwrap_or(Value::Undefined),
                    };
                    object.insert(key.clone(), value);
                }
                Ok(Value::Object(object))
            }
            NodeKind::VarDeclaration { ident, value } => {
                let value = self.visit(value, env)?;
                if !env.declare(ident, value.clone()) {
                    return Err(Error::Redeclaration {
                        name: ident.clone(),
                        span: node.span.clone(),
                    }
                    .into());
                }
                Ok(value)
            }
            NodeKind::VarAssignment { ident, value } => {
                let value = self.visit(value, env)?;
                if !env.assign(ident, value.clone()) {
                    return Err(Error::UndeclaredAssignment {
                        name: ident.clone(),
                        span: node.span.clone(),
                    }
                    .into());
                }
                Ok(value)
            }
            NodeKind::UnaryExpr { prefix, operand } => {
                let value = self.visit(operand, env)?;
                match (*prefix, value) {
                    (UnaryOp::Negate, Value::Number(x)) => Ok(Value::Number(-x)),
                    (UnaryOp::Negate, other) => Err(Error::type_mismatch(
                        format!("Cannot negate a {} value", other.type_name()),
                        node.span.clone(),
                    )
                    .into()),
                    (UnaryOp::Not, value) => Ok(Value::Boolean(!value.is_truthy())),
                }
            }
            NodeKind::LogicalExpr { left, op, right } => {
                let left = self.visit(left, env)?.is_truthy();
                let result = match op {
                    LogicalOp::And => left && self.visit(right, env)?.is_truthy(),
                    LogicalOp::Or => left || self.visit(right, env)?.is_truthy(),
                };
                Ok(Value::Boolean(result))
            }
            NodeKind::BinaryExpr { left, op, right } => {
                let lv = self.visit(left, env)?;
                let rv = self.visit(right, env)?;
                Ok(binary(*op, lv, rv, &node.span, &right.span)?)
            }
            NodeKind::IfStatement {
                condition,
                block,
                alternate,
            } => {
                if self.visit(condition, env)?.is_truthy() {
                    self.visit(block, env)
                } else if let Some(alternate) = alternate {
                    self.visit(alternate, env)
                } else {
                    Ok(Value::Undefined)
                }
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                block,
            } => {
                let scope = env.new_child();
                self.visit(init, &scope)?;
                let mut last = Value::Undefined;
                while self.visit(test, &scope)?.is_truthy() {
                    last = self.visit(block, &scope)?;
                    self.visit(update, &scope)?;
                }
                Ok(last)
            }
            NodeKind::WhileStatement { test, block } => {
                let mut last = Value::Undefined;
                while self.visit(test, env)?.is_truthy() {
                    last = self.visit(block, env)?;
                }
                Ok(last)
            }
            NodeKind::ReturnStatement { argument } => {
                let value = self.visit(argument, env)?;
                Err(Unwind::Return(value))
            }
            NodeKind::CallExpr { callee, args } => {
                let function = match self.visit(callee, env)? {
                    Value::Function(function) => function,
                    other => {
                        return Err(Error::NonFunctionCall {
                            value: other.repr(),
                            span: callee.span.clone(),
                        }
                        .into())
                    }
                };
                let mut arguments: Vec<Value> = Vec::with_capacity(args.len());
                for arg in args {
                    arguments.push(self.visit(arg, env)?);
                }
                self.depth += 1;
                debug!("[depth {}] calling {}", self.depth, function);
                let result = function.call(self, arguments, env);
                self.depth -= 1;
                Ok(result?)
            }
            NodeKind::FunctionDeclaration {
                name,
                params,
                block,
                is_anonymous: _,
            } => {
                let mut names: Vec<String> = Vec::with_capacity(params.len());
                for param in params {
                    match &param.kind {
                        NodeKind::Identifier(x) => names.push(x.clone()),
                        _ => return Err(unhandled(param).into()),
                    }
                }
                let function = Function::new(name.clone(), names, block.clone(), env.clone());
                if let Some(name) = name {
                    trace!("declaring function {}", name);
                    if !env.declare(name, Value::Function(function.clone())) {
                        return Err(Error::Redeclaration {
                            name: name.clone(),
                            span: node.span.clone(),
                        }
                        .into());
                    }
                }
                Ok(Value::Function(function))
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new()
    }
}

fn unhandled(node: &Node) -> Error {
    Error::UnhandledNode {
        kind: node.kind.as_ref().to_string(),
        span: node.span.clone(),
    }
}

fn binary(op: BinaryOp, lv: Value, rv: Value, span: &Span, right_span: &Span) -> Result<Value> {
    let (l, r) = match (op, lv, rv) {
        (BinaryOp::Equal, lv, rv) => return Ok(Value::Boolean(lv == rv)),
        (BinaryOp::NotEqual, lv, rv) => return Ok(Value::Boolean(lv != rv)),
        (_, Value::Number(l), Value::Number(r)) => (l, r),
        (BinaryOp::Add, Value::String(l), Value::String(r)) => {
            return Ok(Value::String(l + &r));
        }
        (_, lv, rv) => {
            return Err(Error::type_mismatch(
                format!(
                    "Operator '{}' cannot be applied to {} and {}",
                    op,
                    lv.type_name(),
                    rv.type_name()
                ),
                span.clone(),
            ))
        }
    };
    match op {
        BinaryOp::Add => Ok(Value::Number(l + r)),
        BinaryOp::Subtract => Ok(Value::Number(l - r)),
        BinaryOp::Multiply => Ok(Value::Number(l * r)),
        BinaryOp::Divide | BinaryOp::Modulo if r == 0.0 => Err(Error::DivideByZero {
            span: right_span.clone(),
        }),
        BinaryOp::Divide => Ok(Value::Number(l / r)),
        BinaryOp::Modulo => Ok(Value::Number(l % r)),
        BinaryOp::Less => Ok(Value::Boolean(l < r)),
        BinaryOp::Greater => Ok(Value::Boolean(l > r)),
        BinaryOp::LessEqual => Ok(Value::Boolean(l <= r)),
        BinaryOp::GreaterEqual => Ok(Value::Boolean(l >= r)),
        BinaryOp::Equal | BinaryOp::NotEqual => unreachable!("equality returns above"),
    }
}
