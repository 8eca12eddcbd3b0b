//! CLI for the Lugha programming language.
//!
//! Supports running from files, direct evaluation, and an interactive REPL.

use lugha_core::{LughaError, SourceFile, SourceId};
use lugha_interpreter::{Interpreter, InterpreterConfig, RuntimeError};
use lugha_parser::parse;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// CLI configuration parsed from arguments
#[derive(Debug, Default)]
struct CliConfig {
    /// Source file to run
    file: Option<PathBuf>,
    /// Code to execute directly
    eval: Option<String>,
    /// Output AST instead of running
    ast: bool,
    /// Per-loop iteration bound override
    max_iterations: Option<usize>,
    /// Show help
    help: bool,
    /// Show version
    version: bool,
    /// REPL mode
    repl: bool,
}

impl CliConfig {
    fn interpreter_config(&self) -> InterpreterConfig {
        let mut config = InterpreterConfig::default();
        if let Some(max) = self.max_iterations {
            config.max_iterations = max;
        }
        config
    }
}

fn parse_args(args: &[String]) -> CliConfig {
    let mut config = CliConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.help = true,
            "-v" | "--version" => config.version = true,
            "-e" | "--eval" => {
                i += 1;
                if i < args.len() {
                    config.eval = Some(args[i].clone());
                }
            }
            "--ast" => config.ast = true,
            "--max-iterations" => {
                i += 1;
                if i < args.len() {
                    config.max_iterations = args[i].parse().ok();
                }
            }
            "--repl" | "-i" => config.repl = true,
            arg if !arg.starts_with('-') => {
                config.file = Some(PathBuf::from(arg));
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    // Default to REPL if no file or eval specified
    if config.file.is_none() && config.eval.is_none() && !config.help && !config.version {
        config.repl = true;
    }

    config
}

fn print_help() {
    println!(
        r#"Lugha Programming Language

USAGE:
    lugha [OPTIONS] [FILE]

OPTIONS:
    -h, --help              Show this help message
    -v, --version           Show version information
    -e, --eval <CODE>       Execute code directly
    -i, --repl              Start interactive REPL
    --ast                   Output AST instead of running
    --max-iterations <N>    Per-loop iteration bound (default 10000)

EXAMPLES:
    lugha habari.lg             Run a Lugha file
    lugha habari                Run habari.lg (adds .lg extension)
    lugha -e "andika(42)"       Execute code directly
    lugha --ast habari.lg       Print the AST of a file
    lugha                       Start the REPL
"#
    );
}

fn print_version() {
    println!("Lugha Programming Language v{}", env!("CARGO_PKG_VERSION"));
}

/// Resolve a path to a source file, adding the .lg extension if needed.
fn resolve_source_path(path: &Path) -> Result<PathBuf, LughaError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let with_ext = path.with_extension("lg");
    if with_ext.is_file() {
        return Ok(with_ext);
    }

    Err(LughaError::IoError {
        message: format!("File '{}' not found", path.display()),
    })
}

fn report_parse_error(error: &LughaError, file: &SourceFile) {
    eprintln!("{}", error);
    if let Some(span) = error.span() {
        eprintln!("  File {}, line {}", file.name, span.start.line);
        if let Some(snippet) = span.format_snippet(&file.content) {
            for line in snippet.lines() {
                eprintln!("    {}", line);
            }
        }
    }
}

fn report_runtime_error(error: &RuntimeError, file: &SourceFile) {
    let sources = std::slice::from_ref(file);
    eprint!("{}", error.traceback(sources));
    eprintln!("{}", error);
    if let Some(snippet) = error.span.format_snippet(&file.content) {
        for line in snippet.lines() {
            eprintln!("    {}", line);
        }
    }
}

/// Parse and run one source. Reports errors itself; returns whether the
/// run completed cleanly.
fn run_source(file: &SourceFile, config: &CliConfig) -> bool {
    let program = match parse(file.id, &file.content) {
        Ok(program) => program,
        Err(error) => {
            report_parse_error(&error, file);
            return false;
        }
    };

    // AST mode: just print and exit
    if config.ast {
        println!("{:#?}", program);
        return true;
    }

    let mut interpreter = Interpreter::with_config(config.interpreter_config());
    match interpreter.run(&program) {
        Ok(_) => true,
        Err(error) => {
            report_runtime_error(&error, file);
            false
        }
    }
}

fn run_file(path: &PathBuf, config: &CliConfig) -> Result<bool, LughaError> {
    let path = resolve_source_path(path)?;
    let source = fs::read_to_string(&path).map_err(|e| LughaError::IoError {
        message: format!("Failed to read file '{}': {}", path.display(), e),
    })?;

    let file = SourceFile::new(SourceId(1), path.display().to_string(), source);
    Ok(run_source(&file, config))
}

fn run_repl(config: &CliConfig) {
    println!("Lugha REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'toka' or Ctrl+D to quit");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut interpreter = Interpreter::with_config(config.interpreter_config());

    // Accumulated source for multi-line input
    let mut accumulated = String::new();

    loop {
        let prompt = if accumulated.is_empty() {
            "lugha> "
        } else {
            "...... "
        };
        print!("{}", prompt);
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }

        if accumulated.is_empty() && line.trim() == "toka" {
            break;
        }

        accumulated.push_str(&line);

        let file = SourceFile::new(SourceId::REPL, "<stdin>", accumulated.clone());
        match parse(file.id, &file.content) {
            Ok(program) => {
                match interpreter.run(&program) {
                    Ok(value) => {
                        if !value.is_null() {
                            println!("{}", value.to_quoted_string());
                        }
                    }
                    Err(error) => report_runtime_error(&error, &file),
                }
                accumulated.clear();
            }
            Err(error) if error.is_incomplete_input() => {
                // Mid-construct: keep reading lines.
            }
            Err(error) => {
                report_parse_error(&error, &file);
                accumulated.clear();
            }
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    if config.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if config.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    if let Some(code) = &config.eval {
        let file = SourceFile::new(SourceId::REPL, "<eval>", code.clone());
        return if run_source(&file, &config) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    if let Some(path) = &config.file {
        return match run_file(path, &config) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(error) => {
                eprintln!("Error: {}", error);
                ExitCode::FAILURE
            }
        };
    }

    run_repl(&config);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("lugha")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args_defaults_to_repl() {
        let config = parse_args(&args(&[]));
        assert!(config.repl);
    }

    #[test]
    fn test_parse_args_eval_and_knob() {
        let config = parse_args(&args(&["-e", "andika(1)", "--max-iterations", "50"]));
        assert_eq!(config.eval.as_deref(), Some("andika(1)"));
        assert_eq!(config.max_iterations, Some(50));
        assert!(!config.repl);
        assert_eq!(config.interpreter_config().max_iterations, 50);
    }

    #[test]
    fn test_parse_args_file() {
        let config = parse_args(&args(&["habari.lg"]));
        assert_eq!(config.file.as_deref(), Some(Path::new("habari.lg")));
    }

    #[test]
    fn test_resolve_source_path_adds_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mfano.lg");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "1 + 1").unwrap();

        // Exact path resolves
        assert_eq!(resolve_source_path(&path).unwrap(), path);
        // Extension-less path resolves to the .lg file
        assert_eq!(
            resolve_source_path(&dir.path().join("mfano")).unwrap(),
            path
        );
        // Missing files error
        assert!(resolve_source_path(&dir.path().join("haipo")).is_err());
    }

    #[test]
    fn test_run_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jumla.lg");
        fs::write(&path, "x = 40 + 2\n").unwrap();

        let config = CliConfig::default();
        assert!(run_file(&path, &config).unwrap());
    }

    #[test]
    fn test_run_source_reports_runtime_error() {
        let file = SourceFile::new(SourceId::REPL, "<eval>", "1 / 0");
        let config = CliConfig::default();
        assert!(!run_source(&file, &config));
    }

    #[test]
    fn test_run_source_reports_parse_error() {
        let file = SourceFile::new(SourceId::REPL, "<eval>", "kama {");
        let config = CliConfig::default();
        assert!(!run_source(&file, &config));
    }
}
