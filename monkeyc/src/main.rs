mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::path::PathBuf;

use clap::Parser;
use cli::{
    print_finished, print_running
};
use monkey_core::{
    environment::prelude::Value,
    eval::eval_from_stream
};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>
}

#[derive(clap::Subcommand)]
enum Command {
    /// Evaluates a source file and prints its result
    Run {
        /// Path of source file
        path: PathBuf,
        /// Print ast before evaluating
        #[arg(long, default_value_t = false)]
        print_ast: bool
    },
    /// Runs Read Eval Print Loop [default]
    Repl,
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl
}

fn main() {
    match Cli::parse().command {
        Some(Command::Run { path, print_ast }) => {
            let buf_writer = crate::cli::stderr_buffer_writer();
            let mut buf = buf_writer.buffer();

            print_running(path.to_string_lossy().as_ref());
            let start = std::time::Instant::now();

            match eval_from_stream(path) {
                Ok(evaluated) => {
                    if print_ast {
                        println!("{:#?}", evaluated.program);
                    }

                    println!("{}", evaluated.value);

                    print_finished(std::time::Instant::now() - start);

                    if let Value::Error { .. } = evaluated.value {
                        std::process::exit(1);
                    }
                },
                Err(err) => {
                    err.pretty(&mut buf);
                    buf_writer
                        .print(&buf)
                        .expect("Writing error to stderr");

                    std::process::exit(1);
                }
            };
        },
        Some(Command::Repl) | None => {
            let _ = repl::start();
        },
        Some(Command::Rlpl) => {
            let _ = rlpl::start();
        },
        Some(Command::Rppl) => {
            let _ = rppl::start();
        }
    };
}
