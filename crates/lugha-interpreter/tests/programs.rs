//! End-to-end tests: source text through the lexer, parser and interpreter,
//! with scripted host I/O.

use lugha_core::{SourceFile, SourceId};
use lugha_interpreter::{
    ErrorKind, Interpreter, InterpreterConfig, RuntimeError, ScriptedIo, Value,
};
use lugha_parser::parse;

fn run(source: &str) -> Result<Value, RuntimeError> {
    run_io(source, &[]).0
}

fn run_io(source: &str, inputs: &[&str]) -> (Result<Value, RuntimeError>, ScriptedIo) {
    let io = ScriptedIo::with_inputs(inputs);
    let program = parse(SourceId::REPL, source).expect("program should parse");
    let mut interpreter =
        Interpreter::with_io(InterpreterConfig::default(), Box::new(io.clone()));
    (interpreter.run(&program), io)
}

fn number(source: &str) -> f64 {
    run(source)
        .expect("program should evaluate")
        .as_number()
        .expect("result should be a number")
}

fn error_kind(source: &str) -> ErrorKind {
    run(source).expect_err("program should fail").kind
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(number("x = 2 + 3 * 4"), 14.0);
    assert_eq!(number("(2 + 3) * 4"), 20.0);
    // '^' is right-associative: 2 ^ (3 ^ 2).
    assert_eq!(number("2 ^ 3 ^ 2"), 512.0);
    assert_eq!(number("(2 ^ 3) ^ 2"), 64.0);
    assert_eq!(number("10 - 2 - 3"), 5.0);
    assert_eq!(number("7 % 4"), 3.0);
    assert_eq!(number("-3 + 10"), 7.0);
}

#[test]
fn named_function_call() {
    assert_eq!(number("shughuli mara(a, b) { rudisha a * b }\nmara(6, 7)"), 42.0);
}

#[test]
fn closures_capture_defining_scope() {
    let source = "
shughuli gen(n) {
    shughuli ongeza(x) { rudisha x + n }
}
gen(10)(5)
";
    assert_eq!(number(source), 15.0);
}

#[test]
fn closure_sees_later_global_bindings() {
    let source = "
x = 1
shughuli soma_x() { rudisha x }
x = 2
soma_x()
";
    assert_eq!(number(source), 2.0);
}

#[test]
fn for_loop_prints_and_collects() {
    let (result, io) = run_io("kwa i = 1 mpaka 4 { andika(i) }", &[]);
    assert_eq!(io.output(), vec!["1", "2", "3"]);

    let value = result.unwrap();
    assert_eq!(value.as_list().unwrap().len(), 3);
}

#[test]
fn for_loop_with_negative_step() {
    let (result, io) = run_io("kwa i = 3 mpaka 0 hatua -1 { andika(i) }", &[]);
    assert_eq!(io.output(), vec!["3", "2", "1"]);
    assert_eq!(result.unwrap().as_list().unwrap().len(), 3);
}

#[test]
fn for_loop_collects_body_values() {
    let value = run("kwa i = 0 mpaka 3 { i * i }").unwrap();
    let squares: Vec<f64> = value
        .as_list()
        .unwrap()
        .iter()
        .map(|v| v.as_number().unwrap())
        .collect();
    assert_eq!(squares, vec![0.0, 1.0, 4.0]);
}

#[test]
fn while_loop_collects_values() {
    let source = "
n = 0
wakati n < 3 {
    n = n + 1
}
";
    let value = run(source).unwrap();
    assert_eq!(value.as_list().unwrap().len(), 3);
}

#[test]
fn division_by_zero() {
    assert_eq!(error_kind("x = 1 / 0"), ErrorKind::Overflow);
    let err = run("1 / 0").unwrap_err();
    assert_eq!(err.message, "Division by zero");
}

#[test]
fn infinite_loop_hits_iteration_bound() {
    let err = run("wakati kweli { 1 }").unwrap_err();
    assert_eq!(err.kind, ErrorKind::CallStackExceeded);
    assert_eq!(err.message, "Max call stack size exceeded");
}

#[test]
fn iteration_bound_is_per_loop_activation() {
    // Two sequential loops of 6 000 iterations each stay under a 10 000
    // per-activation bound.
    let source = "
kwa i = 0 mpaka 6000 { i }
kwa i = 0 mpaka 6000 { i }
kweli
";
    assert!(run(source).is_ok());
}

#[test]
fn idadi_lengths_and_type_error() {
    assert_eq!(number("idadi(\"hello\")"), 5.0);
    assert_eq!(number("idadi(\"\")"), 0.0);
    // String length is in characters, not bytes.
    assert_eq!(number("idadi(\"café\")"), 4.0);
    assert_eq!(number("idadi([1, 2, 3])"), 3.0);
    assert_eq!(number("idadi([])"), 0.0);

    let err = run("idadi(42)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert_eq!(err.message, "Cannot find length of non-iterable value");
}

#[test]
fn idadi_distributes_over_concat() {
    assert_eq!(
        number("idadi(\"habari \" + \"dunia\")"),
        number("idadi(\"habari \")") + number("idadi(\"dunia\")")
    );
    assert_eq!(number("idadi([1, 2] + 9)"), 3.0);
}

#[test]
fn constants_are_bound() {
    let value = run("kweli").unwrap();
    assert_eq!(value.as_bool(), Some(true));

    let value = run("uwongo").unwrap();
    assert_eq!(value.as_bool(), Some(false));

    let value = run("tupu").unwrap();
    assert!(value.is_null());
}

#[test]
fn unbound_name_errors() {
    let err = run("haipo + 1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnboundName);
    assert_eq!(err.message, "'haipo' is not defined");
}

#[test]
fn assignment_returns_and_rebinds() {
    assert_eq!(number("x = 5\nx = x + 1\nx"), 6.0);
    // The program's value is the last statement's value.
    assert_eq!(number("y = (x = 3) + 1\ny"), 4.0);
}

#[test]
fn last_assignment_wins_for_reads() {
    let source = "
x = [1, 2]
x = \"badala\"
idadi(x)
";
    assert_eq!(number(source), 6.0);
}

#[test]
fn logical_operators_do_not_short_circuit() {
    // Both operands are always evaluated: the right side's print happens
    // even when the left side already decides the result.
    let (result, io) = run_io("uwongo && andika(\"pili\")", &[]);
    assert_eq!(result.unwrap().as_bool(), Some(false));
    assert_eq!(io.output(), vec!["pili"]);

    let (result, io) = run_io("kweli || andika(\"pili\")", &[]);
    assert_eq!(result.unwrap().as_bool(), Some(true));
    assert_eq!(io.output(), vec!["pili"]);
}

#[test]
fn logic_combines_truthiness_of_any_variants() {
    let value = run("\"jina\" && [1]").unwrap();
    assert_eq!(value.as_bool(), Some(true));

    let value = run("0 || \"\"").unwrap();
    assert_eq!(value.as_bool(), Some(false));

    let value = run("!0").unwrap();
    assert_eq!(value.as_bool(), Some(true));
}

#[test]
fn if_chains_pick_first_truthy_case() {
    let source = "
shughuli daraja(alama) {
    kama alama >= 80 { rudisha \"A\" }
    sivyo kama alama >= 50 { rudisha \"B\" }
    sivyo { rudisha \"C\" }
}
daraja(65)
";
    let value = run(source).unwrap();
    assert_eq!(value.as_str(), Some("B"));
}

#[test]
fn if_without_match_is_null() {
    let value = run("kama uwongo { 1 }").unwrap();
    assert!(value.is_null());
}

#[test]
fn arity_mismatch_messages() {
    let source = "shughuli mara(a, b) { rudisha a * b }\nmara(1)";
    let err = run(source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ArityMismatch);
    assert_eq!(err.message, "1 too few arguments passed into 'mara'");

    let source = "shughuli mara(a, b) { rudisha a * b }\nmara(1, 2, 3, 4)";
    let err = run(source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ArityMismatch);
    assert_eq!(err.message, "2 too many arguments passed into 'mara'");

    let err = run("andika()").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ArityMismatch);
}

#[test]
fn calling_a_non_function_is_illegal() {
    let err = run("x = 5\nx(1)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalOperation);
}

#[test]
fn hoja_exposes_all_arguments() {
    let source = "
shughuli f(a, b) { rudisha __hoja }
idadi(f(1, 2))
";
    assert_eq!(number(source), 2.0);

    let source = "
shughuli kwanza(a, b) { rudisha __hoja / 0 }
kwanza(\"x\", \"y\")
";
    let value = run(source).unwrap();
    assert_eq!(value.as_str(), Some("x"));
}

#[test]
fn parameters_bind_into_activation_not_defining_scope() {
    // After the call, the parameter name must not leak into the global
    // scope the function was defined in.
    let source = "
shughuli f(ndani) { rudisha ndani }
f(1)
ndani
";
    let err = run(source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnboundName);
}

#[test]
fn anonymous_functions_are_values() {
    let source = "
ongeza = shughuli (x) { rudisha x + 1 }
ongeza(41)
";
    assert_eq!(number(source), 42.0);
}

#[test]
fn recursion_works_within_depth() {
    let source = "
shughuli fib(n) {
    kama n < 2 { rudisha n }
    rudisha fib(n - 1) + fib(n - 2)
}
fib(10)
";
    assert_eq!(number(source), 55.0);
}

#[test]
fn predicates_over_program_values() {
    let value = run("niNambari(3)").unwrap();
    assert_eq!(value.as_bool(), Some(true));

    let value = run("niOrodha([])").unwrap();
    assert_eq!(value.as_bool(), Some(true));

    let value = run("niShughuli(shughuli (x) { x })").unwrap();
    assert_eq!(value.as_bool(), Some(true));

    let value = run("niJina(5)").unwrap();
    assert_eq!(value.as_bool(), Some(false));
}

#[test]
fn soma_reads_input_lines() {
    let (result, io) = run_io("jina = soma(\"jina? \")\nandika(\"habari \" + jina)", &["Asha"]);
    assert!(result.is_ok());
    assert_eq!(io.prompts(), vec!["jina? "]);
    assert_eq!(io.output(), vec!["habari Asha"]);
}

#[test]
fn soma_nambari_loops_until_numeric() {
    let (result, io) = run_io("somaNambari(\"ngapi? \") * 2", &["mengi", "21"]);
    assert_eq!(result.unwrap().as_number(), Some(42.0));
    assert_eq!(io.output(), vec!["Jibu yako si nambari. Jaribu tena."]);
}

#[test]
fn futa_clears_screen() {
    let (result, io) = run_io("futa()", &[]);
    assert!(result.unwrap().is_null());
    assert_eq!(io.clear_count(), 1);
}

#[test]
fn list_operations_in_programs() {
    assert_eq!(number("orodha = [10, 20, 30]\norodha / 2"), 30.0);
    assert_eq!(number("idadi([1, 2] * [3])"), 3.0);
    assert_eq!(number("idadi([1, 2, 3] - 1)"), 2.0);

    let err = run("[1, 2] / 5").unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalOperation);
}

#[test]
fn string_operations_in_programs() {
    let value = run("\"ha\" * 3").unwrap();
    assert_eq!(value.as_str(), Some("hahaha"));

    let err = run("\"ha\" * 2.5").unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalOperation);

    let err = run("\"a\" + 1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalOperation);
}

#[test]
fn errors_point_at_the_use_site() {
    let source = "x = tupu\n1 + x";
    let err = run(source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalOperation);
    // The error spans the addition on line 2, not the binding on line 1.
    assert_eq!(err.span.start.line, 2);
}

#[test]
fn traceback_names_the_call_chain() {
    let source = "
shughuli nje() { rudisha ndani() }
shughuli ndani() { rudisha 1 / 0 }
nje()
";
    let err = run(source).unwrap_err();
    let sources = vec![SourceFile::new(SourceId::REPL, "<stdin>", source)];
    let trace = err.traceback(&sources);

    let lines: Vec<&str> = trace.lines().collect();
    assert_eq!(lines[0], "Traceback (most recent call last):");
    assert!(lines[1].ends_with("in <programu>"));
    assert!(lines[2].ends_with("in nje"));
    assert!(lines[3].ends_with("in ndani"));
    // The innermost frame points at the division itself.
    assert!(lines[3].contains("line 3"));
}

#[test]
fn early_return_skips_rest_of_body() {
    let source = "
shughuli f() {
    rudisha 1
    andika(\"haifiki\")
}
f()
";
    let (result, io) = run_io(source, &[]);
    assert_eq!(result.unwrap().as_number(), Some(1.0));
    assert!(io.output().is_empty());
}

#[test]
fn return_unwinds_through_loops() {
    let source = "
shughuli tafuta(kikomo) {
    kwa i = 0 mpaka kikomo {
        kama i == 3 { rudisha i }
    }
    rudisha -1
}
tafuta(10)
";
    assert_eq!(number(source), 3.0);
}

#[test]
fn bare_return_yields_null() {
    let value = run("shughuli f() { rudisha }\nf()").unwrap();
    assert!(value.is_null());
}

#[test]
fn multi_statement_function_body_returns_last_value() {
    let source = "
shughuli f(x) {
    y = x + 1
    y * 2
}
f(4)
";
    assert_eq!(number(source), 10.0);
}

#[test]
fn shadowing_in_activation_does_not_touch_global() {
    let source = "
x = 1
shughuli f() {
    x = 99
    rudisha x
}
f() + x
";
    // 99 from the activation's shadow, 1 from the untouched global.
    assert_eq!(number(source), 100.0);
}

#[test]
fn left_to_right_evaluation_is_observable() {
    let source = "
shughuli kushoto() { andika(\"kushoto\")\nrudisha 1 }
shughuli kulia() { andika(\"kulia\")\nrudisha 2 }
kushoto() + kulia()
";
    let (result, io) = run_io(source, &[]);
    assert_eq!(result.unwrap().as_number(), Some(3.0));
    assert_eq!(io.output(), vec!["kushoto", "kulia"]);
}

#[test]
fn empty_program_is_null() {
    let value = run("").unwrap();
    assert!(value.is_null());

    let value = run("\n\n").unwrap();
    assert!(value.is_null());
}
