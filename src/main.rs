use clap::Parser;
use pbc::errors::{PbcError, PbcResult};
use pbc::machine::Machine;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compiler for a tiny 8-bit accumulator language, emitting PicoBlaze-style assembly",
    long_about = "Compiler for a tiny 8-bit accumulator language, emitting PicoBlaze-style assembly.\n\
                 The language supports assignment, + and - arithmetic, equality tests,\n\
                 port I/O via $[n], and single-level conditional blocks. Variables are\n\
                 allocated automatically on the target's 256-byte scratchpad.\n\
                 \n\
                 Example usage:\n\
                 pbc input.src                     # Compile to assembly on stdout\n\
                 pbc input.src -o output.psm       # Write assembly to a file\n\
                 pbc input.src --verbose           # Verbose compilation output\n\
                 pbc                               # Interactive eval loop\n\
                 \n\
                 The emitted text is meant for a downstream assembler; no binary\n\
                 artifact is produced here."
)]
struct Cli {
    // Source file to compile; without it an interactive eval loop starts
    path: Option<PathBuf>,

    // Output file path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    // Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn compile_file(path: &PathBuf, args: &Cli) -> PbcResult<()> {
    let source = pbc::read(path)?;
    if args.verbose {
        eprintln!("read {} bytes from {}", source.len(), path.display());
    }

    // Batch mode: one fresh machine for the whole file.
    let mut machine = Machine::new();
    let assembly = pbc::compile(&source, &mut machine)?;
    if args.verbose {
        eprintln!("emitted {} instruction lines", assembly.lines().count());
    }

    match &args.output {
        Some(out_path) => {
            fs::write(out_path, &assembly).map_err(|e| {
                PbcError::FileWriteError(format!("{}: {}", out_path.display(), e))
            })?;
            if args.verbose {
                eprintln!("assembly written to {}", out_path.display());
            }
        }
        None => print!("{}", assembly),
    }
    Ok(())
}

fn repl() -> PbcResult<()> {
    // One machine for the whole session: variable addresses and label
    // numbering persist from line to line.
    let mut machine = Machine::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "eval> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // end of input
        }
        let source = line.trim();
        if source.is_empty() {
            continue;
        }
        match pbc::compile(source, &mut machine) {
            Ok(assembly) => print!("{}", assembly),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}

fn main() {
    let args = Cli::parse();
    let result = match &args.path {
        Some(path) => compile_file(path, &args),
        None => repl(),
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
