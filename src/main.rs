use clap::Parser as ClapParser;
use rx_lang::config;
use rx_lang::eval::Interpreter;
use rx_lang::repl;
use rx_lang::run_source;
use std::path::PathBuf;
use std::process::ExitCode;

/// A tree-walking interpreter for the rx scripting language.
#[derive(ClapParser, Debug)]
#[command(name = "rx")]
#[command(version = config::VERSION)]
#[command(about = "A tree-walking interpreter for the rx scripting language")]
struct Cli {
    /// Script file to execute. Must have a .rx extension.
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Start an interactive session instead of running a file.
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.interactive {
        return match repl::run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {err}");
                ExitCode::FAILURE
            }
        };
    }

    let Some(path) = cli.script else {
        eprintln!("Usage: rx <file.rx>");
        eprintln!("       rx -i (interactive mode)");
        return ExitCode::FAILURE;
    };

    if path.extension().and_then(|ext| ext.to_str()) != Some("rx") {
        eprintln!("Error: File must have .rx extension");
        return ExitCode::FAILURE;
    }

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: Could not open file: {} ({err})", path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut interpreter = Interpreter::new();
    match run_source(&mut interpreter, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            repl::report(&err);
            ExitCode::FAILURE
        }
    }
}
