#[macro_use]
extern crate lazy_static;
extern crate unicode_segmentation;

mod error;
mod scanner;
mod token;
mod util;


use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::process;

use argparse::{ArgumentParser, Print, Store};

use crate::error::ScanError;
use crate::scanner::Scanner;

fn main() {
    let mut script_filename = "".to_string();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Lox language scanner");
        ap.add_option(
            &["--version"],
            Print(env!("CARGO_PKG_VERSION").to_string()),
            "Show version",
        );
        ap.refer(&mut script_filename)
            .add_argument("script_filename", Store,
                          "Lox file to tokenize.  Omit to run an interactive REPL.");
        ap.parse_args_or_exit();
    }
    if ! script_filename.is_empty() {
        match run_file(&script_filename) {
            Ok(()) => (),
            Err(_) => process::exit(65),
        }
    }
    else {
        run_repl();
    }
}

fn run_repl() {
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().expect("run_repl: unable to flush stdout");

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {
                // A scan error was already reported; the session continues.
                let _ = run(&input);
            }
            Err(error) => {
                println!("Error reading stdin: {:?}", error);
                break;
            }
        }
    }
}

fn run_file(file_path: &str) -> Result<(), ScanError> {
    let mut file = File::open(file_path).unwrap_or_else(|_| panic!("source file not found: {}", file_path));
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap_or_else(|_| panic!("unable to read file: {}", file_path));

    run(&contents)
}

fn run(source: &str) -> Result<(), ScanError> {
    let mut scanner = Scanner::new(source);
    match scanner.scan_tokens() {
        Ok(tokens) => {
            for token in tokens.iter() {
                println!("{}", token);
            }
            Ok(())
        }
        Err(err) => {
            util::error(err.line, &err.message);
            Err(err)
        }
    }
}
