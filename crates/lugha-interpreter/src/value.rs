//! Runtime values for the Lugha interpreter.
//!
//! Values are immutable: every operation builds a new value and never
//! mutates an operand. String and list payloads sit behind `Rc`, so the
//! shallow `copy_at` used for variable reads shares them. Each value
//! carries the span it came from and the context it was last bound in;
//! both feed error reporting only.

use crate::builtins::Builtin;
use crate::{Context, RuntimeError, RuntimeResult, Scope};
use lugha_core::Span;
use lugha_parser::{BinOp, Node};
use std::rc::Rc;

/// A user-defined function: the body it will run and the scope it closed
/// over at its `shughuli` definition site.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Node>,
    pub defining_scope: Scope,
}

impl FunctionValue {
    /// The name shown in tracebacks and arity errors.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<isiyotambuliwa>")
    }
}

/// The payload of a runtime value.
#[derive(Debug, Clone)]
pub enum ValueKind {
    Number(f64),
    Str(Rc<str>),
    Bool(bool),
    List(Rc<Vec<Value>>),
    Null,
    Function(Rc<FunctionValue>),
    Builtin(&'static Builtin),
}

/// A runtime value.
#[derive(Debug, Clone)]
pub struct Value {
    kind: ValueKind,
    span: Span,
    context: Context,
}

impl Value {
    pub fn number(value: f64, span: Span, context: &Context) -> Self {
        Self::new(ValueKind::Number(value), span, context)
    }

    pub fn str(value: impl Into<Rc<str>>, span: Span, context: &Context) -> Self {
        Self::new(ValueKind::Str(value.into()), span, context)
    }

    pub fn boolean(value: bool, span: Span, context: &Context) -> Self {
        Self::new(ValueKind::Bool(value), span, context)
    }

    pub fn list(elements: Vec<Value>, span: Span, context: &Context) -> Self {
        Self::new(ValueKind::List(Rc::new(elements)), span, context)
    }

    pub fn null(span: Span, context: &Context) -> Self {
        Self::new(ValueKind::Null, span, context)
    }

    pub fn function(function: FunctionValue, span: Span, context: &Context) -> Self {
        Self::new(ValueKind::Function(Rc::new(function)), span, context)
    }

    pub fn builtin(builtin: &'static Builtin, span: Span, context: &Context) -> Self {
        Self::new(ValueKind::Builtin(builtin), span, context)
    }

    fn new(kind: ValueKind, span: Span, context: &Context) -> Self {
        Self {
            kind,
            span,
            context: context.clone(),
        }
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Shallow clone with a fresh span and context. List and string
    /// payloads are shared, which immutability makes safe.
    pub fn copy_at(&self, span: Span, context: &Context) -> Self {
        Self {
            kind: self.kind.clone(),
            span,
            context: context.clone(),
        }
    }

    // === Accessors ===

    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ValueKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.kind {
            ValueKind::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.kind {
            ValueKind::List(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ValueKind::Function(_) | ValueKind::Builtin(_))
    }

    /// The type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Number(_) => "nambari",
            ValueKind::Str(_) => "jina",
            ValueKind::Bool(_) => "buleani",
            ValueKind::List(_) => "orodha",
            ValueKind::Null => "tupu",
            ValueKind::Function(_) | ValueKind::Builtin(_) => "shughuli",
        }
    }

    /// Truthiness: zero, empty and null are false.
    pub fn is_true(&self) -> bool {
        match &self.kind {
            ValueKind::Number(n) => *n != 0.0,
            ValueKind::Str(s) => !s.is_empty(),
            ValueKind::Bool(b) => *b,
            ValueKind::List(elements) => !elements.is_empty(),
            ValueKind::Null => false,
            ValueKind::Function(_) | ValueKind::Builtin(_) => true,
        }
    }

    /// Structural equality. Cross-variant comparison is false, never an
    /// error. Numbers follow IEEE-754 (`NaN == NaN` is false); functions
    /// compare by identity.
    pub fn equals(&self, other: &Value) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => a == b,
            (ValueKind::Str(a), ValueKind::Str(b)) => a == b,
            (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::List(a), ValueKind::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (ValueKind::Function(a), ValueKind::Function(b)) => Rc::ptr_eq(a, b),
            (ValueKind::Builtin(a), ValueKind::Builtin(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }

    // === Operation algebra ===

    /// Apply a binary operator. The supported combinations:
    ///
    /// | op | left, right | result |
    /// |---|---|---|
    /// | `+` | nambari, nambari | sum |
    /// | `+` | jina, jina | concatenation |
    /// | `+` | orodha, any | new list with the element appended |
    /// | `-` | nambari, nambari | difference |
    /// | `-` | orodha, nambari n | new list with index n removed |
    /// | `*` | nambari, nambari | product |
    /// | `*` | jina, nambari n | repetition (n a non-negative integer) |
    /// | `*` | orodha, orodha | concatenation |
    /// | `/` | nambari, nambari | quotient (zero divisor overflows) |
    /// | `/` | orodha, nambari n | element at index n |
    /// | `%` | nambari, nambari | remainder (zero divisor overflows) |
    /// | `^` | nambari, nambari | power |
    /// | `<` `>` `<=` `>=` | nambari, nambari | comparison |
    /// | `==` `!=` | any, any | structural (in)equality |
    /// | `&&` `\|\|` | any, any | combined truthiness |
    ///
    /// Anything else is an illegal operation spanning both operands.
    pub fn binary_op(&self, op: BinOp, other: &Value) -> RuntimeResult<Value> {
        let span = self.span.to(&other.span);
        let ctx = &self.context;

        // Equality and the logical operators accept every variant pair.
        match op {
            BinOp::Eq => return Ok(Value::boolean(self.equals(other), span, ctx)),
            BinOp::NotEq => return Ok(Value::boolean(!self.equals(other), span, ctx)),
            BinOp::And => {
                return Ok(Value::boolean(self.is_true() && other.is_true(), span, ctx));
            }
            BinOp::Or => {
                return Ok(Value::boolean(self.is_true() || other.is_true(), span, ctx));
            }
            _ => {}
        }

        match (op, &self.kind, &other.kind) {
            (BinOp::Add, ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(Value::number(l + r, span, ctx))
            }
            (BinOp::Add, ValueKind::Str(l), ValueKind::Str(r)) => {
                let mut joined = String::with_capacity(l.len() + r.len());
                joined.push_str(l);
                joined.push_str(r);
                Ok(Value::str(joined, span, ctx))
            }
            (BinOp::Add, ValueKind::List(elements), _) => {
                let mut appended = elements.as_ref().clone();
                appended.push(other.clone());
                Ok(Value::list(appended, span, ctx))
            }

            (BinOp::Sub, ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(Value::number(l - r, span, ctx))
            }
            (BinOp::Sub, ValueKind::List(elements), ValueKind::Number(n)) => {
                match list_index(*n, elements.len()) {
                    Some(index) => {
                        let mut removed = elements.as_ref().clone();
                        removed.remove(index);
                        Ok(Value::list(removed, span, ctx))
                    }
                    None => Err(RuntimeError::illegal_operation(
                        format!("Index {} is out of bounds for a list of {} elements", n, elements.len()),
                        span,
                        ctx,
                    )),
                }
            }

            (BinOp::Mul, ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(Value::number(l * r, span, ctx))
            }
            (BinOp::Mul, ValueKind::Str(s), ValueKind::Number(n)) => {
                if n.fract() == 0.0 && *n >= 0.0 {
                    Ok(Value::str(s.repeat(*n as usize), span, ctx))
                } else {
                    Err(RuntimeError::illegal_operation(
                        format!("Cannot repeat a string {} times", n),
                        span,
                        ctx,
                    ))
                }
            }
            (BinOp::Mul, ValueKind::List(l), ValueKind::List(r)) => {
                let mut joined = l.as_ref().clone();
                joined.extend(r.iter().cloned());
                Ok(Value::list(joined, span, ctx))
            }

            (BinOp::Div, ValueKind::Number(l), ValueKind::Number(r)) => {
                if *r == 0.0 {
                    Err(RuntimeError::overflow("Division by zero", span, ctx))
                } else {
                    Ok(Value::number(l / r, span, ctx))
                }
            }
            (BinOp::Div, ValueKind::List(elements), ValueKind::Number(n)) => {
                match list_index(*n, elements.len()) {
                    Some(index) => Ok(elements[index].copy_at(span, ctx)),
                    None => Err(RuntimeError::illegal_operation(
                        format!("Index {} is out of bounds for a list of {} elements", n, elements.len()),
                        span,
                        ctx,
                    )),
                }
            }

            (BinOp::Mod, ValueKind::Number(l), ValueKind::Number(r)) => {
                if *r == 0.0 {
                    Err(RuntimeError::overflow("Modulo by zero", span, ctx))
                } else {
                    Ok(Value::number(l % r, span, ctx))
                }
            }

            (BinOp::Pow, ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(Value::number(l.powf(*r), span, ctx))
            }

            (BinOp::Lt, ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(Value::boolean(l < r, span, ctx))
            }
            (BinOp::Gt, ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(Value::boolean(l > r, span, ctx))
            }
            (BinOp::Lte, ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(Value::boolean(l <= r, span, ctx))
            }
            (BinOp::Gte, ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(Value::boolean(l >= r, span, ctx))
            }

            _ => Err(RuntimeError::illegal_operation(
                format!(
                    "'{}' is not supported between {} and {}",
                    op,
                    self.type_name(),
                    other.type_name()
                ),
                span,
                ctx,
            )),
        }
    }

    /// Logical negation of truthiness. Defined for every variant.
    pub fn notted(&self) -> Value {
        Value::boolean(!self.is_true(), self.span, &self.context)
    }

    /// Unary minus: multiplication by -1, so it is illegal on exactly the
    /// variants that cannot be multiplied by a negative number.
    pub fn negated(&self) -> RuntimeResult<Value> {
        let minus_one = Value::number(-1.0, self.span, &self.context);
        self.binary_op(BinOp::Mul, &minus_one)
    }

    // === Display ===

    /// Unformatted text, as `andika` prints it.
    pub fn to_display_string(&self) -> String {
        match &self.kind {
            ValueKind::Number(n) => n.to_string(),
            ValueKind::Str(s) => s.to_string(),
            ValueKind::Bool(true) => "kweli".to_string(),
            ValueKind::Bool(false) => "uwongo".to_string(),
            ValueKind::List(elements) => {
                let parts: Vec<String> = elements.iter().map(|v| v.to_quoted_string()).collect();
                format!("[{}]", parts.join(", "))
            }
            ValueKind::Null => "tupu".to_string(),
            ValueKind::Function(f) => format!("<shughuli {}>", f.display_name()),
            ValueKind::Builtin(b) => format!("<shughuli {}>", b.name),
        }
    }

    /// Like `to_display_string`, but strings keep their quotes. Used for
    /// list elements and REPL echoes.
    pub fn to_quoted_string(&self) -> String {
        match &self.kind {
            ValueKind::Str(s) => format!("\"{}\"", s),
            _ => self.to_display_string(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// Map an f64 index to a valid list position: an integer in `0..len`.
fn list_index(n: f64, len: usize) -> Option<usize> {
    if n.fract() == 0.0 && n >= 0.0 && (n as usize) < len {
        Some(n as usize)
    } else {
        None
    }
}
