use crate::position::Span;
use std::rc::Rc;
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum UnaryOp {
    #[strum(serialize = "-")]
    Negate,
    #[strum(serialize = "!")]
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum LogicalOp {
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "||")]
    Or,
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum BinaryOp {
    #[strum(serialize = "+")] Add,
    #[strum(serialize = "-")] Subtract,
    #[strum(serialize = "*")] Multiply,
    #[strum(serialize = "/")] Divide,
    #[strum(serialize = "%")] Modulo,
    #[strum(serialize = "<")] Less,
    #[strum(serialize = ">")] Greater,
    #[strum(serialize = "<=")] LessEqual,
    #[strum(serialize = ">=")] GreaterEqual,
    #[strum(serialize = "==")] Equal,
    #[strum(serialize = "!=")] NotEqual,
}

/// The keyword literals. Stored as raw text in the tree and resolved when
/// evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LiteralKeyword {
    Undefined,
    Null,
    True,
    False,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Node {
        Node { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, AsRefStr)]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
    },
    NumericLiteral(f64),
    StringLiteral(String),
    Literal(String),
    Identifier(String),
    ArrayLiteral(Vec<Node>),
    /// `None` binds the key to the same-named variable when evaluated.
    ObjectLiteral(Vec<(String, Option<Node>)>),
    VarDeclaration {
        ident: String,
        value: Box<Node>,
    },
    VarAssignment {
        ident: String,
        value: Box<Node>,
    },
    UnaryExpr {
        prefix: UnaryOp,
        operand: Box<Node>,
    },
    LogicalExpr {
        left: Box<Node>,
        op: LogicalOp,
        right: Box<Node>,
    },
    BinaryExpr {
        left: Box<Node>,
        op: BinaryOp,
        right: Box<Node>,
    },
    IfStatement {
        condition: Box<Node>,
        block: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    ForStatement {
        init: Box<Node>,
        test: Box<Node>,
        update: Box<Node>,
        block: Box<Node>,
    },
    WhileStatement {
        test: Box<Node>,
        block: Box<Node>,
    },
    BlockStatement {
        body: Vec<Node>,
    },
    ReturnStatement {
        argument: Box<Node>,
    },
    CallExpr {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    FunctionDeclaration {
        name: Option<String>,
        params: Vec<Node>,
        block: Rc<Node>,
        is_anonymous: bool,
    },
}

pub trait Visitor<T, Output> {
    fn visit(&mut self, n: &T) -> Output;
}

impl Node {
    pub fn accept<T>(&self, v: &mut dyn Visitor<Node, T>) -> T {
        v.visit(self)
    }
}

/// Renders a tree as nested S-expressions, e.g. `(+ 1 (* 2 3))`.
pub struct AstPrinter {}

impl AstPrinter {
    fn parenthesize(&mut self, name: &str, args: Vec<&Node>) -> String {
        let mut x = String::from("(");
        x.push_str(name);
        for arg in args {
            x.push(' ');
            x.push_str(arg.accept(self).as_str());
        }
        x.push(')');
        x
    }
}

impl Visitor<Node, String> for AstPrinter {
    fn visit(&mut self, n: &Node) -> String {
        match &n.kind {
            NodeKind::Program { body } => self.parenthesize("program", body.iter().collect()),
            NodeKind::NumericLiteral(x) => format!("{}", x),
            NodeKind::StringLiteral(x) => format!("{:?}", x),
            NodeKind::Literal(x) | NodeKind::Identifier(x) => x.clone(),
            NodeKind::ArrayLiteral(values) => self.parenthesize("array", values.iter().collect()),
            NodeKind::ObjectLiteral(properties) => {
                let mut x = String::from("(object");
                for (key, value) in properties {
                    x.push(' ');
                    match value {
                        None => x.push_str(key),
                        Some(value) => x.push_str(&format!("({} {})", key, value.accept(self))),
                    }
                }
                x.push(')');
                x
            }
            NodeKind::VarDeclaration { ident, value } => {
                format!("(let {} {})", ident, value.accept(self))
            }
            NodeKind::VarAssignment { ident, value } => {
                format!("(assign {} {})", ident, value.accept(self))
            }
            NodeKind::UnaryExpr { prefix, operand } => {
                self.parenthesize(&prefix.to_string(), vec![&**operand])
            }
            NodeKind::LogicalExpr { left, op, right } => {
                self.parenthesize(&op.to_string(), vec![&**left, &**right])
            }
            NodeKind::BinaryExpr { left, op, right } => {
                self.parenthesize(&op.to_string(), vec![&**left, &**right])
            }
            NodeKind::IfStatement {
                condition,
                block,
                alternate,
            } => {
                let mut args: Vec<&Node> = vec![&**condition, &**block];
                if let Some(alternate) = alternate {
                    args.push(&**alternate);
                }
                self.parenthesize("if", args)
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                block,
            } => self.parenthesize("for", vec![&**init, &**test, &**update, &**block]),
            NodeKind::WhileStatement { test, block } => {
                self.parenthesize("while", vec![&**test, &**block])
            }
            NodeKind::BlockStatement { body } => self.parenthesize("block", body.iter().collect()),
            NodeKind::ReturnStatement { argument } => self.parenthesize("return", vec![&**argument]),
            NodeKind::CallExpr { callee, args } => {
                let mut all: Vec<&Node> = vec![&**callee];
                all.extend(args.iter());
                self.parenthesize("call", all)
            }
            NodeKind::FunctionDeclaration {
                name,
                params,
                block,
                is_anonymous: _,
            } => {
                let params: Vec<String> = params.iter().map(|p| p.accept(self)).collect();
                let mut x = String::from("(function ");
                if let Some(name) = name {
                    x.push_str(name);
                    x.push(' ');
                }
                x.push_str(&format!("({}) {})", params.join(" "), block.accept(self)));
                x
            }
        }
    }
}

#[cfg(test)]
mod ast_tests {
    use crate::ast::{AstPrinter, BinaryOp, LiteralKeyword, Node, NodeKind, UnaryOp};
    use crate::position::{Position, Span};

    fn node(kind: NodeKind) -> Node {
        Node::new(kind, Span::at(Position::new("test")))
    }

    #[test]
    fn basic_ast_test() {
        let expression = node(NodeKind::BinaryExpr {
            left: Box::new(node(NodeKind::UnaryExpr {
                prefix: UnaryOp::Negate,
                operand: Box::new(node(NodeKind::NumericLiteral(123.0))),
            })),
            op: BinaryOp::Multiply,
            right: Box::new(node(NodeKind::NumericLiteral(45.67))),
        });
        let mut visitor = AstPrinter {};
        assert_eq!(expression.accept(&mut visitor), "(* (- 123) 45.67)");
    }

    #[test]
    fn operator_text_round_trips() {
        assert_eq!("<=".parse::<BinaryOp>(), Ok(BinaryOp::LessEqual));
        assert_eq!(BinaryOp::NotEqual.to_string(), "!=");
        assert_eq!("!".parse::<UnaryOp>(), Ok(UnaryOp::Not));
        assert_eq!("null".parse::<LiteralKeyword>(), Ok(LiteralKeyword::Null));
        assert!("nil".parse::<LiteralKeyword>().is_err());
    }

    #[test]
    fn kind_names() {
        assert_eq!(node(NodeKind::Identifier("x".to_string())).kind.as_ref(), "Identifier");
        assert_eq!(
            node(NodeKind::Program { body: vec![] }).kind.as_ref(),
            "Program"
        );
    }
}
