//! Type-test builtins.

use crate::{Context, HostIo, RuntimeResult, Value};
use lugha_core::Span;

/// `niNambari(thamani)` - is the value a number?
pub fn ni_nambari(
    _io: &mut dyn HostIo,
    args: &[Value],
    span: Span,
    ctx: &Context,
) -> RuntimeResult<Value> {
    Ok(Value::boolean(args[0].as_number().is_some(), span, ctx))
}

/// `niJina(thamani)` - is the value a string?
pub fn ni_jina(
    _io: &mut dyn HostIo,
    args: &[Value],
    span: Span,
    ctx: &Context,
) -> RuntimeResult<Value> {
    Ok(Value::boolean(args[0].as_str().is_some(), span, ctx))
}

/// `niOrodha(thamani)` - is the value a list?
pub fn ni_orodha(
    _io: &mut dyn HostIo,
    args: &[Value],
    span: Span,
    ctx: &Context,
) -> RuntimeResult<Value> {
    Ok(Value::boolean(args[0].as_list().is_some(), span, ctx))
}

/// `niShughuli(thamani)` - is the value callable (user or builtin)?
pub fn ni_shughuli(
    _io: &mut dyn HostIo,
    args: &[Value],
    span: Span,
    ctx: &Context,
) -> RuntimeResult<Value> {
    Ok(Value::boolean(args[0].is_callable(), span, ctx))
}
