//! Abstract Syntax Tree (AST) definitions for the Lugha programming language.
//!
//! Every node carries the span of the source text it was parsed from; the
//! interpreter stamps those spans onto runtime values and errors.

use lugha_core::Span;
use std::rc::Rc;

/// An AST node.
#[derive(Debug, Clone)]
pub enum Node {
    Number(NumberNode),
    Str(StrNode),
    List(ListNode),
    VarAccess(VarAccessNode),
    VarAssign(VarAssignNode),
    BinOp(BinOpNode),
    UnaryOp(UnaryOpNode),
    If(IfNode),
    For(ForNode),
    While(WhileNode),
    FuncDef(FuncDefNode),
    Call(CallNode),
    Return(ReturnNode),
    Block(BlockNode),
}

impl Node {
    /// Get the span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Number(n) => n.span,
            Node::Str(n) => n.span,
            Node::List(n) => n.span,
            Node::VarAccess(n) => n.span,
            Node::VarAssign(n) => n.span,
            Node::BinOp(n) => n.span,
            Node::UnaryOp(n) => n.span,
            Node::If(n) => n.span,
            Node::For(n) => n.span,
            Node::While(n) => n.span,
            Node::FuncDef(n) => n.span,
            Node::Call(n) => n.span,
            Node::Return(n) => n.span,
            Node::Block(n) => n.span,
        }
    }
}

/// A number literal.
#[derive(Debug, Clone)]
pub struct NumberNode {
    pub value: f64,
    pub span: Span,
}

/// A string literal.
#[derive(Debug, Clone)]
pub struct StrNode {
    pub value: String,
    pub span: Span,
}

/// A list literal: `[a, b, c]`.
#[derive(Debug, Clone)]
pub struct ListNode {
    pub elements: Vec<Node>,
    pub span: Span,
}

/// A variable read.
#[derive(Debug, Clone)]
pub struct VarAccessNode {
    pub name: String,
    pub span: Span,
}

/// A variable binding: `jina = expr`. Always binds in the current scope.
#[derive(Debug, Clone)]
pub struct VarAssignNode {
    pub name: String,
    pub value: Box<Node>,
    pub span: Span,
}

/// Binary operator tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
}

impl BinOp {
    /// Operator text, as written in source.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Lte => "<=",
            BinOp::Gte => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unary operator tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

/// A binary operation. Both operands are always evaluated, left to right;
/// `&&` and `||` do not short-circuit.
#[derive(Debug, Clone)]
pub struct BinOpNode {
    pub op: BinOp,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
    pub span: Span,
}

/// A unary operation.
#[derive(Debug, Clone)]
pub struct UnaryOpNode {
    pub op: UnaryOp,
    pub operand: Box<Node>,
    pub span: Span,
}

/// One `kama`/`sivyo kama` arm.
#[derive(Debug, Clone)]
pub struct IfCase {
    pub condition: Node,
    pub body: Node,
}

/// An if-expression: ordered cases, first truthy condition wins.
#[derive(Debug, Clone)]
pub struct IfNode {
    pub cases: Vec<IfCase>,
    pub else_body: Option<Box<Node>>,
    pub span: Span,
}

/// A counted loop: `kwa i = start mpaka end (hatua step)? body`.
#[derive(Debug, Clone)]
pub struct ForNode {
    pub var: String,
    pub start: Box<Node>,
    pub end: Box<Node>,
    pub step: Option<Box<Node>>,
    pub body: Box<Node>,
    pub span: Span,
}

/// A conditional loop: `wakati condition body`.
#[derive(Debug, Clone)]
pub struct WhileNode {
    pub condition: Box<Node>,
    pub body: Box<Node>,
    pub span: Span,
}

/// A function definition: `shughuli jina?(a, b) body`.
///
/// The body is reference-counted because every function value created from
/// this node shares it.
#[derive(Debug, Clone)]
pub struct FuncDefNode {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Node>,
    pub span: Span,
}

/// A call: `callee(a, b)`.
#[derive(Debug, Clone)]
pub struct CallNode {
    pub callee: Box<Node>,
    pub args: Vec<Node>,
    pub span: Span,
}

/// An early function exit: `rudisha expr?`.
#[derive(Debug, Clone)]
pub struct ReturnNode {
    pub value: Option<Box<Node>>,
    pub span: Span,
}

/// A statement sequence. Evaluates to the last statement's value
/// (Null when empty), unlike a list literal which collects all of them.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub statements: Vec<Node>,
    pub span: Span,
}
