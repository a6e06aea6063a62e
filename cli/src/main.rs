use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use flatjson::Error;

#[derive(Parser, Debug)]
#[command(name = "flatjson", version, about = "Print a JSON document as a YAML-like outline")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,
}

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        return ExitCode::from(exit_code(&err));
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), Error> {
    let args = Args::parse();
    let source = read_input(args.input.as_deref())?;
    let rendered = flatjson::to_vec(&source)?;
    write_output(args.output.as_deref(), &rendered)
}

fn read_input(input: Option<&str>) -> Result<String, Error> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(fs::read_to_string(path)?),
    }
}

fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), Error> {
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            file.write_all(data)?;
            Ok(())
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(data)?;
            Ok(())
        }
    }
}

/// One code per fatal class: clap owns 2 for usage errors, allocation
/// failure keeps the original tool's 3.
fn exit_code(err: &Error) -> u8 {
    match err {
        Error::Format { .. } => 1,
        Error::ResourceExhausted => 3,
        Error::Io(_) => 4,
    }
}
