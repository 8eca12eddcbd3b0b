//! Collection builtins.

use crate::{Context, HostIo, RuntimeError, RuntimeResult, Value};
use lugha_core::Span;

/// `idadi(thamani)` - length of a string or a list. String length counts
/// characters, not bytes, matching how strings compare and repeat.
pub fn idadi(
    _io: &mut dyn HostIo,
    args: &[Value],
    span: Span,
    ctx: &Context,
) -> RuntimeResult<Value> {
    let length = if let Some(text) = args[0].as_str() {
        text.chars().count()
    } else if let Some(elements) = args[0].as_list() {
        elements.len()
    } else {
        return Err(RuntimeError::type_error(
            "Cannot find length of non-iterable value",
            span,
            ctx,
        ));
    };

    Ok(Value::number(length as f64, span, ctx))
}
