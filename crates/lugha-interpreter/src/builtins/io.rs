//! Terminal builtins.

use crate::{Context, HostIo, RuntimeError, RuntimeResult, Value};
use lugha_core::Span;

/// `andika(thamani)` - print a value and a newline.
pub fn andika(
    io: &mut dyn HostIo,
    args: &[Value],
    span: Span,
    ctx: &Context,
) -> RuntimeResult<Value> {
    io.write_line(&args[0].to_display_string());
    Ok(Value::null(span, ctx))
}

/// `soma(swali)` - prompt and read one line. Closed input reads as "".
pub fn soma(io: &mut dyn HostIo, args: &[Value], span: Span, ctx: &Context) -> RuntimeResult<Value> {
    let line = io
        .read_line(&args[0].to_display_string())
        .unwrap_or_default();
    Ok(Value::str(line, span, ctx))
}

/// `somaNambari(swali)` - prompt until the answer parses as a number.
pub fn soma_nambari(
    io: &mut dyn HostIo,
    args: &[Value],
    span: Span,
    ctx: &Context,
) -> RuntimeResult<Value> {
    let prompt = args[0].to_display_string();

    loop {
        let Some(line) = io.read_line(&prompt) else {
            return Err(RuntimeError::type_error(
                "Input ended before a number was read",
                span,
                ctx,
            ));
        };

        match line.trim().parse::<f64>() {
            Ok(number) => return Ok(Value::number(number, span, ctx)),
            Err(_) => io.write_line("Jibu yako si nambari. Jaribu tena."),
        }
    }
}

/// `futa()` - clear the terminal screen.
pub fn futa(io: &mut dyn HostIo, _args: &[Value], span: Span, ctx: &Context) -> RuntimeResult<Value> {
    io.clear_screen();
    Ok(Value::null(span, ctx))
}
