//! Execution contexts for the Lugha interpreter.
//!
//! A context is one activation record: the global program context, or one
//! frame per function call. Contexts chain through their *caller* for
//! tracebacks, while their scopes chain through the function's *defining*
//! scope for name lookup. The two chains are independent.

use crate::Scope;
use lugha_core::Span;
use std::rc::Rc;

struct ContextInner {
    display_name: String,
    /// Caller's context (traceback chain), None for the global context
    parent: Option<Context>,
    /// Call-site span of this activation, None for the global context
    entry_span: Option<Span>,
    scope: Scope,
}

/// An activation record. Cheap to clone; never mutated after creation
/// (binding changes happen on the scope).
#[derive(Clone)]
pub struct Context {
    inner: Rc<ContextInner>,
}

impl Context {
    /// Create the root context for a program run.
    pub fn global(display_name: impl Into<String>, scope: Scope) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                display_name: display_name.into(),
                parent: None,
                entry_span: None,
                scope,
            }),
        }
    }

    /// Create a child context for a function activation.
    ///
    /// `self` is the caller; `scope` is the activation's own scope, already
    /// parented on the callee's defining scope.
    pub fn child(&self, display_name: impl Into<String>, entry_span: Span, scope: Scope) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                display_name: display_name.into(),
                parent: Some(self.clone()),
                entry_span: Some(entry_span),
                scope,
            }),
        }
    }

    /// The name shown in tracebacks for this activation.
    pub fn display_name(&self) -> &str {
        &self.inner.display_name
    }

    /// The caller's context, if this is not the global context.
    pub fn parent(&self) -> Option<&Context> {
        self.inner.parent.as_ref()
    }

    /// The call-site span of this activation.
    pub fn entry_span(&self) -> Option<Span> {
        self.inner.entry_span
    }

    /// This activation's scope.
    pub fn scope(&self) -> &Scope {
        &self.inner.scope
    }

    /// Check if two handles refer to the same activation.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// Contexts reach values through their scope and values reach back; Debug
// prints the call chain names only.
impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = vec![self.display_name().to_string()];
        let mut current = self.parent().cloned();
        while let Some(ctx) = current {
            names.push(ctx.display_name().to_string());
            current = ctx.parent().cloned();
        }
        f.debug_struct("Context").field("chain", &names).finish()
    }
}
