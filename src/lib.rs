use std::{fs::File, io::Read, path::Path};

pub mod ast;
pub mod codegen;
pub mod errors;
pub mod frontend;
pub mod machine;

pub const VERSION: &str = "0.1.0";

pub struct LineNumber {
    pub line: usize,
}

impl Default for LineNumber {
    fn default() -> Self {
        Self { line: 1 }
    }
}

use crate::codegen::CodeGenerator;
use crate::errors::PbcResult;
use crate::frontend::lexer;
use crate::frontend::parser::Parser;
use crate::machine::Machine;

pub fn read(filename: &Path) -> PbcResult<String> {
    // Open the path in read-only mode, returns `io::Result<File>`
    let mut file = File::open(filename)?;
    // Read the file contents into a string, returns `io::Result<usize>`
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Compile one program against the given machine state.
///
/// The caller decides the machine's lifetime: a fresh `Machine` per
/// call compiles an independent unit, while reusing one keeps variable
/// addresses and label numbering alive across calls (interactive use).
pub fn compile(source: &str, machine: &mut Machine) -> PbcResult<String> {
    let mut state = LineNumber::default();
    let tokens = lexer::scan(&mut state, source)?;
    let mut parser = Parser::new(&tokens);
    let program = parser.parse()?;
    let mut generator = CodeGenerator::new(machine);
    generator.generate(&program)?;
    Ok(generator.into_output())
}
