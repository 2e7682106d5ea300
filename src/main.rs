use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser as ClapParser;
use wisp::{InterpretResult, VirtualMachine};

/// A tiny bytecode-compiled scripting language.
#[derive(ClapParser, Debug)]
#[command(version, about)]
struct Args {
    /// Script to run. Omit to start a REPL.
    path: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match args.path {
        Some(path) => run_file(&path),
        None => run_repl(),
    }
}

fn run_file(path: &str) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            log::error!("could not read '{}': {}", path, err);
            return ExitCode::from(74);
        }
    };

    let mut vm = VirtualMachine::new();
    match vm.interpret(&source) {
        InterpretResult::Ok => ExitCode::SUCCESS,
        InterpretResult::CompileError => ExitCode::from(65),
        InterpretResult::RuntimeError => ExitCode::from(70),
    }
}

fn run_repl() -> ExitCode {
    let mut vm = VirtualMachine::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {
                vm.interpret(&line);
            }
            Err(err) => {
                log::error!("failed to read line: {}", err);
                break;
            }
        }
    }

    ExitCode::SUCCESS
}
