use pbc::errors::{PbcError, PbcResult};
use pbc::machine::Machine;

// Helper function to compile source against a fresh machine
fn compile(source: &str) -> PbcResult<String> {
    let mut machine = Machine::new();
    pbc::compile(source, &mut machine)
}

#[test]
fn test_assignment_and_output_write() -> PbcResult<()> {
    let assembly = compile("y=2+2;$[1]=y;")?;
    assert_eq!(
        assembly,
        "LOAD s0, 2\n\
         LOAD s1, 2\n\
         ADD s0, s1\n\
         STORE s0, 0 ; var y\n\
         FETCH s0, 0 ; var y\n\
         OUTPUT s0, 1\n"
    );
    Ok(())
}

#[test]
fn test_subtraction_and_address_order() -> PbcResult<()> {
    let mut machine = Machine::new();
    let assembly = pbc::compile("a=5;b=3;c=a-b;", &mut machine)?;
    assert_eq!(
        assembly,
        "LOAD s0, 5\n\
         STORE s0, 0 ; var a\n\
         LOAD s0, 3\n\
         STORE s0, 1 ; var b\n\
         FETCH s0, 0 ; var a\n\
         FETCH s1, 1 ; var b\n\
         SUB s0, s1\n\
         STORE s0, 2 ; var c\n"
    );
    // Addresses follow first reference in program order.
    assert_eq!(machine.address_of("a"), Some(0));
    assert_eq!(machine.address_of("b"), Some(1));
    assert_eq!(machine.address_of("c"), Some(2));
    Ok(())
}

#[test]
fn test_binary_op_frees_right_operand() -> PbcResult<()> {
    // s1 is reused for the second right operand, proving SUB released it.
    let assembly = compile("c=a-b+1;")?;
    assert_eq!(
        assembly,
        "FETCH s0, 0 ; var a\n\
         FETCH s1, 1 ; var b\n\
         SUB s0, s1\n\
         LOAD s1, 1\n\
         ADD s0, s1\n\
         STORE s0, 2 ; var c\n"
    );
    Ok(())
}

#[test]
fn test_lone_input_read() -> PbcResult<()> {
    let assembly = compile("$[2];")?;
    assert_eq!(assembly, "INPUT s0, 2\n");
    Ok(())
}

#[test]
fn test_input_read_in_expression() -> PbcResult<()> {
    let assembly = compile("x = $[3] - 1;")?;
    assert_eq!(
        assembly,
        "INPUT s0, 3\n\
         LOAD s1, 1\n\
         SUB s0, s1\n\
         STORE s0, 0 ; var x\n"
    );
    Ok(())
}

#[test]
fn test_conditional_block() -> PbcResult<()> {
    let assembly = compile("a=1;b=2;if a==b { x = 5; };")?;
    assert_eq!(
        assembly,
        "LOAD s0, 1\n\
         STORE s0, 0 ; var a\n\
         LOAD s0, 2\n\
         STORE s0, 1 ; var b\n\
         FETCH s0, 0 ; var a\n\
         FETCH s1, 1 ; var b\n\
         COMPARE s0, s1\n\
         JUMP NZ, label1\n\
         LOAD s0, 5\n\
         STORE s0, 2 ; var x\n\
         label1:\n"
    );
    Ok(())
}

#[test]
fn test_sequential_conditionals_get_distinct_labels() -> PbcResult<()> {
    let assembly = compile("if 1 == 1 { }; if 2 == 2 { };")?;
    assert_eq!(
        assembly,
        "LOAD s0, 1\n\
         LOAD s1, 1\n\
         COMPARE s0, s1\n\
         JUMP NZ, label1\n\
         label1:\n\
         LOAD s0, 2\n\
         LOAD s1, 2\n\
         COMPARE s0, s1\n\
         JUMP NZ, label2\n\
         label2:\n"
    );
    Ok(())
}

#[test]
fn test_labels_persist_across_compiles_on_one_machine() -> PbcResult<()> {
    let mut machine = Machine::new();
    let first = pbc::compile("if 1 == 1 { };", &mut machine)?;
    let second = pbc::compile("if 1 == 1 { };", &mut machine)?;
    assert!(first.contains("label1:"));
    assert!(second.contains("label2:"));
    Ok(())
}

#[test]
fn test_address_bindings_persist_on_one_machine() -> PbcResult<()> {
    let mut machine = Machine::new();
    pbc::compile("a=1;b=2;", &mut machine)?;
    let persistent = pbc::compile("b;", &mut machine)?;
    assert_eq!(persistent, "FETCH s0, 1 ; var b\n");

    // A fresh machine binds the same name from address zero.
    let fresh = compile("b;")?;
    assert_eq!(fresh, "FETCH s0, 0 ; var b\n");
    Ok(())
}

#[test]
fn test_identical_programs_compile_identically() -> PbcResult<()> {
    let source = "a=5;b=3;c=a-b;$[1]=c;if c==b { c = 0; };";
    let mut first_machine = Machine::new();
    let mut second_machine = Machine::new();
    let first = pbc::compile(source, &mut first_machine)?;
    let second = pbc::compile(source, &mut second_machine)?;
    assert_eq!(first, second);
    assert_eq!(first_machine.address_of("a"), second_machine.address_of("a"));
    assert_eq!(first_machine.address_of("c"), second_machine.address_of("c"));
    Ok(())
}

#[test]
fn test_registers_free_after_every_statement() -> PbcResult<()> {
    // OUTPUT leaves its operand busy, but the statement boundary resets
    // the pool, so the next statement starts at s0 again.
    let mut machine = Machine::new();
    let assembly = pbc::compile("$[1] = 7; x = 2;", &mut machine)?;
    assert_eq!(
        assembly,
        "LOAD s0, 7\n\
         OUTPUT s0, 1\n\
         LOAD s0, 2\n\
         STORE s0, 0 ; var x\n"
    );
    assert_eq!(machine.live_registers(), 0);
    Ok(())
}

#[test]
fn test_register_exhaustion_aborts_compilation() -> PbcResult<()> {
    // Ten nested right operands keep ten registers live; the eleventh
    // allocation fails.
    let source = "x = 1+(2+(3+(4+(5+(6+(7+(8+(9+(10+11)))))))));";
    let result = compile(source);
    assert!(
        matches!(result, Err(PbcError::NoRegistersAvailable)),
        "Expected NoRegistersAvailable, but got: {:?}",
        result
    );
    Ok(())
}

#[test]
fn test_scratchpad_exhaustion_aborts_compilation() -> PbcResult<()> {
    let mut source = String::new();
    for i in 0..257 {
        source.push_str(&format!("v{} = 1;", i));
    }
    let result = compile(&source);
    if let Err(PbcError::ScratchpadExhausted { name }) = result {
        assert_eq!(name, "v256");
        Ok(())
    } else {
        panic!("Expected ScratchpadExhausted, but got: {:?}", result);
    }
}

#[test]
fn test_valueless_expression_as_operand_is_an_error() -> PbcResult<()> {
    let result = compile("x = 1 == 2;");
    assert!(
        matches!(result, Err(PbcError::CodeGenError { .. })),
        "Expected a CodeGenError, but got: {:?}",
        result
    );
    Ok(())
}

#[test]
fn test_chained_assignment_is_an_error() -> PbcResult<()> {
    let result = compile("x = y = 1;");
    assert!(
        matches!(result, Err(PbcError::CodeGenError { .. })),
        "Expected a CodeGenError, but got: {:?}",
        result
    );
    Ok(())
}

#[test]
fn test_illegal_character_recovers_through_pipeline() -> PbcResult<()> {
    let assembly = compile("y@ = 2;")?;
    assert_eq!(
        assembly,
        "LOAD s0, 2\n\
         STORE s0, 0 ; var y\n"
    );
    Ok(())
}
