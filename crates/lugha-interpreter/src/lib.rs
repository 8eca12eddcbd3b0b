//! Tree-walking interpreter for the Lugha programming language.
//!
//! This crate executes a parsed AST. Evaluation is single-threaded and
//! synchronous; operands evaluate strictly left to right, and `&&`/`||`
//! evaluate both sides before combining truthiness.

pub mod builtins;
mod context;
mod error;
mod host;
mod scope;
mod value;

pub use context::*;
pub use error::*;
pub use host::*;
pub use scope::*;
pub use value::*;

use builtins::Builtin;
use lugha_core::Span;
use lugha_parser::{
    BinOpNode, BlockNode, CallNode, ForNode, FuncDefNode, IfNode, ListNode, Node, NumberNode,
    ReturnNode, StrNode, UnaryOp, UnaryOpNode, VarAccessNode, VarAssignNode, WhileNode,
};
use std::rc::Rc;

/// Configuration for the interpreter.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Iteration bound applied to each loop activation separately
    pub max_iterations: usize,
    /// Maximum depth of nested function calls
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_call_depth: 1_000,
        }
    }
}

/// How evaluation of a node ended: with a value, or with an early
/// `rudisha` that unwinds to the enclosing function call.
#[derive(Debug)]
enum Flow {
    Value(Value),
    Return(Value),
}

impl Flow {
    fn into_value(self) -> Value {
        match self {
            Flow::Value(value) | Flow::Return(value) => value,
        }
    }
}

/// The Lugha interpreter: one global context plus the tree walker.
pub struct Interpreter {
    config: InterpreterConfig,
    io: Box<dyn HostIo>,
    global: Context,
    call_depth: usize,
}

impl Interpreter {
    /// Create a new interpreter with default configuration, on stdio.
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// Create a new interpreter with custom configuration, on stdio.
    pub fn with_config(config: InterpreterConfig) -> Self {
        Self::with_io(config, Box::new(StdIo))
    }

    /// Create a new interpreter writing and reading through `io`.
    pub fn with_io(config: InterpreterConfig, io: Box<dyn HostIo>) -> Self {
        let global = Context::global("<programu>", Scope::new());
        builtins::install(&global);

        Self {
            config,
            io,
            global,
            call_depth: 0,
        }
    }

    /// The root context. Its scope holds the builtins, the constants and
    /// every top-level binding made so far.
    pub fn global_context(&self) -> &Context {
        &self.global
    }

    /// Run a program in the global context and return its final value.
    pub fn run(&mut self, program: &Node) -> RuntimeResult<Value> {
        let ctx = self.global.clone();
        self.exec(program, &ctx).map(Flow::into_value)
    }

    /// Evaluate a node to a value in the given context.
    pub fn evaluate(&mut self, node: &Node, ctx: &Context) -> RuntimeResult<Value> {
        self.exec(node, ctx).map(Flow::into_value)
    }

    /// Dispatch on the node variant. Any sub-evaluation error aborts the
    /// enclosing visitor at once via `?` and propagates unchanged.
    fn exec(&mut self, node: &Node, ctx: &Context) -> RuntimeResult<Flow> {
        match node {
            Node::Number(n) => Ok(Flow::Value(self.eval_number(n, ctx))),
            Node::Str(n) => Ok(Flow::Value(self.eval_str(n, ctx))),
            Node::List(n) => self.eval_list(n, ctx).map(Flow::Value),
            Node::VarAccess(n) => self.eval_var_access(n, ctx).map(Flow::Value),
            Node::VarAssign(n) => self.eval_var_assign(n, ctx).map(Flow::Value),
            Node::BinOp(n) => self.eval_bin_op(n, ctx).map(Flow::Value),
            Node::UnaryOp(n) => self.eval_unary_op(n, ctx).map(Flow::Value),
            Node::If(n) => self.eval_if(n, ctx),
            Node::For(n) => self.eval_for(n, ctx),
            Node::While(n) => self.eval_while(n, ctx),
            Node::FuncDef(n) => self.eval_func_def(n, ctx).map(Flow::Value),
            Node::Call(n) => self.eval_call(n, ctx).map(Flow::Value),
            Node::Return(n) => self.eval_return(n, ctx),
            Node::Block(n) => self.eval_block(n, ctx),
        }
    }

    fn eval_number(&self, node: &NumberNode, ctx: &Context) -> Value {
        Value::number(node.value, node.span, ctx)
    }

    fn eval_str(&self, node: &StrNode, ctx: &Context) -> Value {
        Value::str(node.value.as_str(), node.span, ctx)
    }

    fn eval_list(&mut self, node: &ListNode, ctx: &Context) -> RuntimeResult<Value> {
        let mut elements = Vec::with_capacity(node.elements.len());
        for element in &node.elements {
            elements.push(self.evaluate(element, ctx)?);
        }
        Ok(Value::list(elements, node.span, ctx))
    }

    /// Reads copy the stored value and stamp it with the access site, so
    /// downstream errors point at the usage rather than the definition.
    fn eval_var_access(&mut self, node: &VarAccessNode, ctx: &Context) -> RuntimeResult<Value> {
        match ctx.scope().get(&node.name) {
            Some(value) => Ok(value.copy_at(node.span, ctx)),
            None => Err(RuntimeError::unbound_name(
                format!("'{}' is not defined", node.name),
                node.span,
                ctx,
            )),
        }
    }

    /// Assignment binds in the current scope only; a nested block assigning
    /// an outer name shadows it.
    fn eval_var_assign(&mut self, node: &VarAssignNode, ctx: &Context) -> RuntimeResult<Value> {
        let value = self.evaluate(&node.value, ctx)?;
        ctx.scope().set(node.name.as_str(), value.clone());
        Ok(value)
    }

    fn eval_bin_op(&mut self, node: &BinOpNode, ctx: &Context) -> RuntimeResult<Value> {
        let left = self.evaluate(&node.lhs, ctx)?;
        let right = self.evaluate(&node.rhs, ctx)?;
        left.binary_op(node.op, &right)
    }

    fn eval_unary_op(&mut self, node: &UnaryOpNode, ctx: &Context) -> RuntimeResult<Value> {
        let operand = self.evaluate(&node.operand, ctx)?;
        let result = match node.op {
            UnaryOp::Neg => operand.negated()?,
            UnaryOp::Not => operand.notted(),
        };
        Ok(result.copy_at(node.span, ctx))
    }

    fn eval_if(&mut self, node: &IfNode, ctx: &Context) -> RuntimeResult<Flow> {
        for case in &node.cases {
            let condition = self.evaluate(&case.condition, ctx)?;
            if condition.is_true() {
                return self.exec(&case.body, ctx);
            }
        }

        match &node.else_body {
            Some(body) => self.exec(body, ctx),
            None => Ok(Flow::Value(Value::null(node.span, ctx))),
        }
    }

    fn eval_for(&mut self, node: &ForNode, ctx: &Context) -> RuntimeResult<Flow> {
        let start = self.expect_number(&node.start, ctx, "Loop start")?;
        let end = self.expect_number(&node.end, ctx, "Loop end")?;
        let step = match &node.step {
            Some(step) => self.expect_number(step, ctx, "Loop step")?,
            None => 1.0,
        };

        let mut values = Vec::new();
        let mut iterations = 0usize;
        let mut i = start;

        loop {
            let keep_going = if step >= 0.0 { i < end } else { i > end };
            if !keep_going {
                break;
            }
            if iterations >= self.config.max_iterations {
                return Err(RuntimeError::call_stack_exceeded(
                    "Max call stack size exceeded",
                    node.span,
                    ctx,
                ));
            }
            iterations += 1;

            ctx.scope().set(node.var.as_str(), Value::number(i, node.span, ctx));
            match self.exec(&node.body, ctx)? {
                Flow::Value(value) => values.push(value),
                ret @ Flow::Return(_) => return Ok(ret),
            }

            i += step;
        }

        Ok(Flow::Value(Value::list(values, node.span, ctx)))
    }

    fn eval_while(&mut self, node: &WhileNode, ctx: &Context) -> RuntimeResult<Flow> {
        let mut values = Vec::new();
        let mut iterations = 0usize;

        loop {
            let condition = self.evaluate(&node.condition, ctx)?;
            if !condition.is_true() {
                break;
            }
            if iterations >= self.config.max_iterations {
                return Err(RuntimeError::call_stack_exceeded(
                    "Max call stack size exceeded",
                    node.span,
                    ctx,
                ));
            }
            iterations += 1;

            match self.exec(&node.body, ctx)? {
                Flow::Value(value) => values.push(value),
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }

        Ok(Flow::Value(Value::list(values, node.span, ctx)))
    }

    /// A definition captures the scope it was evaluated in; that scope
    /// becomes the parent of every activation's scope, which is all a
    /// closure is.
    fn eval_func_def(&mut self, node: &FuncDefNode, ctx: &Context) -> RuntimeResult<Value> {
        let function = FunctionValue {
            name: node.name.clone(),
            params: node.params.clone(),
            body: Rc::clone(&node.body),
            defining_scope: ctx.scope().clone(),
        };

        let value = Value::function(function, node.span, ctx);
        if let Some(name) = &node.name {
            ctx.scope().set(name.as_str(), value.clone());
        }
        Ok(value)
    }

    fn eval_call(&mut self, node: &CallNode, ctx: &Context) -> RuntimeResult<Value> {
        let callee = self.evaluate(&node.callee, ctx)?;

        let mut args = Vec::with_capacity(node.args.len());
        for arg in &node.args {
            args.push(self.evaluate(arg, ctx)?);
        }

        let result = self.call_value(&callee, args, node.span, ctx)?;
        Ok(result.copy_at(node.span, ctx))
    }

    fn eval_return(&mut self, node: &ReturnNode, ctx: &Context) -> RuntimeResult<Flow> {
        let value = match &node.value {
            Some(value) => self.evaluate(value, ctx)?,
            None => Value::null(node.span, ctx),
        };
        Ok(Flow::Return(value))
    }

    /// A block's value is its last statement's value; `rudisha` unwinds
    /// through it.
    fn eval_block(&mut self, node: &BlockNode, ctx: &Context) -> RuntimeResult<Flow> {
        let mut last = Value::null(node.span, ctx);

        for statement in &node.statements {
            match self.exec(statement, ctx)? {
                Flow::Value(value) => last = value,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }

        Ok(Flow::Value(last))
    }

    /// Invoke a callable value with already-evaluated arguments.
    pub fn call_value(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        span: Span,
        caller: &Context,
    ) -> RuntimeResult<Value> {
        match callee.kind() {
            ValueKind::Function(function) => {
                let function = Rc::clone(function);
                self.call_function(&function, callee.span(), args, span, caller)
            }
            ValueKind::Builtin(builtin) => {
                let builtin = *builtin;
                self.call_builtin(builtin, callee.span(), args, span, caller)
            }
            _ => Err(RuntimeError::illegal_operation(
                format!("Value of type {} is not callable", callee.type_name()),
                span,
                caller,
            )),
        }
    }

    fn call_function(
        &mut self,
        function: &FunctionValue,
        callee_span: Span,
        args: Vec<Value>,
        span: Span,
        caller: &Context,
    ) -> RuntimeResult<Value> {
        self.check_arity(
            function.display_name(),
            function.params.len(),
            args.len(),
            callee_span,
            caller,
        )?;
        self.check_call_depth(span, caller)?;

        // The activation scope hangs off the *defining* scope, not the
        // caller's: lexical lookup and the dynamic call chain stay apart.
        let exec_scope = function.defining_scope.child();
        let exec_ctx = caller.child(function.display_name(), span, exec_scope);

        let params: Vec<&str> = function.params.iter().map(String::as_str).collect();
        self.bind_arguments(&params, args, span, &exec_ctx);

        self.call_depth += 1;
        let result = self.exec(&function.body, &exec_ctx);
        self.call_depth -= 1;

        result.map(Flow::into_value)
    }

    fn call_builtin(
        &mut self,
        builtin: &'static Builtin,
        callee_span: Span,
        args: Vec<Value>,
        span: Span,
        caller: &Context,
    ) -> RuntimeResult<Value> {
        self.check_arity(builtin.name, builtin.params.len(), args.len(), callee_span, caller)?;
        self.check_call_depth(span, caller)?;

        // Builtins close over the global scope.
        let exec_scope = self.global.scope().child();
        let exec_ctx = caller.child(builtin.name, span, exec_scope);
        let args = self.bind_arguments(builtin.params, args, span, &exec_ctx);

        self.call_depth += 1;
        let result = (builtin.func)(&mut *self.io, &args, span, &exec_ctx);
        self.call_depth -= 1;

        result
    }

    /// Bind parameters and the implicit `__hoja` argument list into the
    /// activation scope, rehoming each argument to the new context.
    fn bind_arguments(
        &self,
        params: &[&str],
        args: Vec<Value>,
        span: Span,
        exec_ctx: &Context,
    ) -> Vec<Value> {
        let rebound: Vec<Value> = args
            .into_iter()
            .map(|arg| arg.copy_at(arg.span(), exec_ctx))
            .collect();

        let scope = exec_ctx.scope();
        for (param, arg) in params.iter().zip(rebound.iter()) {
            scope.set(*param, arg.clone());
        }
        scope.set("__hoja", Value::list(rebound.clone(), span, exec_ctx));

        rebound
    }

    fn check_arity(
        &self,
        name: &str,
        expected: usize,
        given: usize,
        span: Span,
        ctx: &Context,
    ) -> RuntimeResult<()> {
        if given == expected {
            return Ok(());
        }

        let message = if given > expected {
            format!("{} too many arguments passed into '{}'", given - expected, name)
        } else {
            format!("{} too few arguments passed into '{}'", expected - given, name)
        };
        Err(RuntimeError::arity_mismatch(message, span, ctx))
    }

    fn check_call_depth(&self, span: Span, ctx: &Context) -> RuntimeResult<()> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::call_stack_exceeded(
                "Maximum call depth exceeded",
                span,
                ctx,
            ));
        }
        Ok(())
    }

    fn expect_number(&mut self, node: &Node, ctx: &Context, what: &str) -> RuntimeResult<f64> {
        let value = self.evaluate(node, ctx)?;
        value.as_number().ok_or_else(|| {
            RuntimeError::type_error(
                format!("{} must be a number, not {}", what, value.type_name()),
                value.span(),
                ctx,
            )
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
