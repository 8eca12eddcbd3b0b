//! Builtin functions for the Lugha programming language.
//!
//! Builtins are ordinary values: `install` binds every entry of the fixed
//! table into the root scope before any user code runs, together with the
//! constants `kweli`, `uwongo` and `tupu`. The module is split by
//! category:
//! - `io` - terminal builtins (`andika`, `soma`, `somaNambari`, `futa`)
//! - `predicates` - type tests (`niNambari`, `niJina`, `niOrodha`, `niShughuli`)
//! - `collections` - `idadi` (length)

mod collections;
mod io;
mod predicates;

use crate::{Context, HostIo, RuntimeResult, Value};
use lugha_core::Span;

/// A builtin function: a name, declared parameter names (arity comes from
/// their count), and the host handler.
#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub func: BuiltinFn,
}

/// Host handler signature. Arity is checked by the call protocol before
/// the handler runs, so `args.len() == params.len()` always holds here.
pub type BuiltinFn =
    fn(io: &mut dyn HostIo, args: &[Value], span: Span, ctx: &Context) -> RuntimeResult<Value>;

/// The fixed builtin table.
pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "andika",
        params: &["thamani"],
        func: io::andika,
    },
    Builtin {
        name: "soma",
        params: &["swali"],
        func: io::soma,
    },
    Builtin {
        name: "somaNambari",
        params: &["swali"],
        func: io::soma_nambari,
    },
    Builtin {
        name: "futa",
        params: &[],
        func: io::futa,
    },
    Builtin {
        name: "niNambari",
        params: &["thamani"],
        func: predicates::ni_nambari,
    },
    Builtin {
        name: "niJina",
        params: &["thamani"],
        func: predicates::ni_jina,
    },
    Builtin {
        name: "niOrodha",
        params: &["thamani"],
        func: predicates::ni_orodha,
    },
    Builtin {
        name: "niShughuli",
        params: &["thamani"],
        func: predicates::ni_shughuli,
    },
    Builtin {
        name: "idadi",
        params: &["thamani"],
        func: collections::idadi,
    },
];

/// Get a builtin by name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// Bind every builtin and the sentinel constants into the given root
/// context's scope. Must run before user code.
pub fn install(context: &Context) {
    let scope = context.scope();
    for builtin in BUILTINS {
        scope.set(builtin.name, Value::builtin(builtin, Span::dummy(), context));
    }

    scope.set("kweli", Value::boolean(true, Span::dummy(), context));
    scope.set("uwongo", Value::boolean(false, Span::dummy(), context));
    scope.set("tupu", Value::null(Span::dummy(), context));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, ScriptedIo, Scope};

    fn test_context() -> Context {
        let ctx = Context::global("<programu>", Scope::new());
        install(&ctx);
        ctx
    }

    #[test]
    fn test_lookup() {
        assert!(lookup("andika").is_some());
        assert!(lookup("idadi").is_some());
        assert!(lookup("haipo").is_none());
    }

    #[test]
    fn test_install_binds_builtins_and_constants() {
        let ctx = test_context();
        let scope = ctx.scope();

        assert!(scope.get("andika").unwrap().is_callable());
        assert_eq!(scope.get("kweli").unwrap().as_bool(), Some(true));
        assert_eq!(scope.get("uwongo").unwrap().as_bool(), Some(false));
        assert!(scope.get("tupu").unwrap().is_null());
    }

    #[test]
    fn test_andika_writes_display_string() {
        let ctx = test_context();
        let mut io = ScriptedIo::new();
        let value = Value::number(3.5, Span::dummy(), &ctx);

        let result = (lookup("andika").unwrap().func)(&mut io, &[value], Span::dummy(), &ctx);
        assert!(result.unwrap().is_null());
        assert_eq!(io.output(), vec!["3.5".to_string()]);
    }

    #[test]
    fn test_soma_returns_empty_string_at_eof() {
        let ctx = test_context();
        let mut io = ScriptedIo::with_inputs(&[]);
        let prompt = Value::str("jina? ", Span::dummy(), &ctx);

        let result =
            (lookup("soma").unwrap().func)(&mut io, &[prompt], Span::dummy(), &ctx).unwrap();
        assert_eq!(result.as_str(), Some(""));
    }

    #[test]
    fn test_soma_nambari_reprompts_until_number() {
        let ctx = test_context();
        let mut io = ScriptedIo::with_inputs(&["sio nambari", "", "42"]);
        let prompt = Value::str("nambari? ", Span::dummy(), &ctx);

        let result = (lookup("somaNambari").unwrap().func)(&mut io, &[prompt], Span::dummy(), &ctx)
            .unwrap();
        assert_eq!(result.as_number(), Some(42.0));
        assert_eq!(
            io.output(),
            vec![
                "Jibu yako si nambari. Jaribu tena.".to_string(),
                "Jibu yako si nambari. Jaribu tena.".to_string(),
            ]
        );
        assert_eq!(io.prompts().len(), 3);
    }

    #[test]
    fn test_soma_nambari_errors_at_eof() {
        let ctx = test_context();
        let mut io = ScriptedIo::with_inputs(&["bado sio"]);
        let prompt = Value::str("nambari? ", Span::dummy(), &ctx);

        let err = (lookup("somaNambari").unwrap().func)(&mut io, &[prompt], Span::dummy(), &ctx)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_futa_clears_screen() {
        let ctx = test_context();
        let mut io = ScriptedIo::new();

        let result = (lookup("futa").unwrap().func)(&mut io, &[], Span::dummy(), &ctx).unwrap();
        assert!(result.is_null());
        assert_eq!(io.clear_count(), 1);
    }

    #[test]
    fn test_predicates() {
        let ctx = test_context();
        let mut io = ScriptedIo::new();
        let number = Value::number(1.0, Span::dummy(), &ctx);
        let text = Value::str("x", Span::dummy(), &ctx);
        let builtin = ctx.scope().get("andika").unwrap();

        let mut check = |name: &str, value: &Value| {
            (lookup(name).unwrap().func)(&mut io, &[value.clone()], Span::dummy(), &ctx)
                .unwrap()
                .as_bool()
                .unwrap()
        };

        assert!(check("niNambari", &number));
        assert!(!check("niNambari", &text));
        assert!(check("niJina", &text));
        assert!(check("niShughuli", &builtin));
        assert!(!check("niOrodha", &number));
    }

    #[test]
    fn test_idadi() {
        let ctx = test_context();
        let mut io = ScriptedIo::new();

        let text = Value::str("hello", Span::dummy(), &ctx);
        let result = (lookup("idadi").unwrap().func)(&mut io, &[text], Span::dummy(), &ctx).unwrap();
        assert_eq!(result.as_number(), Some(5.0));

        // Characters, not bytes: "café" is 4 characters, 5 bytes.
        let text = Value::str("café", Span::dummy(), &ctx);
        let result = (lookup("idadi").unwrap().func)(&mut io, &[text], Span::dummy(), &ctx).unwrap();
        assert_eq!(result.as_number(), Some(4.0));

        let empty = Value::list(vec![], Span::dummy(), &ctx);
        let result =
            (lookup("idadi").unwrap().func)(&mut io, &[empty], Span::dummy(), &ctx).unwrap();
        assert_eq!(result.as_number(), Some(0.0));

        let number = Value::number(42.0, Span::dummy(), &ctx);
        let err =
            (lookup("idadi").unwrap().func)(&mut io, &[number], Span::dummy(), &ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(err.message, "Cannot find length of non-iterable value");
    }
}
