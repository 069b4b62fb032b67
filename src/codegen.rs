use crate::ast::{Expr, Program, Statement};
use crate::errors::{PbcError, PbcResult};
use crate::machine::Machine;
use std::fmt::Write;

/// Walks the AST once, consulting the machine for registers, scratchpad
/// addresses and labels, and accumulates one instruction per line.
///
/// Expressions evaluate to `Some(register)` holding their result, or
/// `None` for the value-less forms (assignment, output write,
/// comparison, conditional block).
pub struct CodeGenerator<'a> {
    machine: &'a mut Machine,
    output: String,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(machine: &'a mut Machine) -> Self {
        Self {
            machine,
            output: String::with_capacity(1024),
        }
    }

    pub fn generate(&mut self, program: &Program) -> PbcResult<()> {
        for statement in &program.statements {
            self.eval_statement(statement)?;
        }
        Ok(())
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn eval_statement(&mut self, statement: &Statement) -> PbcResult<()> {
        self.eval_expr(&statement.expr)?;
        // Register lifetimes never cross a statement boundary.
        self.machine.free_all_registers();
        Ok(())
    }

    fn eval_operand(&mut self, expr: &Expr) -> PbcResult<usize> {
        self.eval_expr(expr)?.ok_or_else(|| {
            PbcError::codegen_error("expression used as an operand produces no value")
        })
    }

    fn eval_expr(&mut self, expr: &Expr) -> PbcResult<Option<usize>> {
        match expr {
            Expr::Number(value) => {
                let reg = self.machine.allocate_register()?;
                writeln!(self.output, "LOAD s{}, {}", reg, value).unwrap();
                Ok(Some(reg))
            }
            Expr::Variable(name) => {
                let reg = self.machine.allocate_register()?;
                let addr = self.machine.resolve_address(name)?;
                writeln!(self.output, "FETCH s{}, {} ; var {}", reg, addr, name).unwrap();
                Ok(Some(reg))
            }
            Expr::InputRead(port) => {
                let reg = self.machine.allocate_register()?;
                writeln!(self.output, "INPUT s{}, {}", reg, port).unwrap();
                Ok(Some(reg))
            }
            Expr::Binary { op, lhs, rhs } => {
                let r1 = self.eval_operand(lhs)?;
                let r2 = self.eval_operand(rhs)?;
                // The result lands destructively in the left register.
                writeln!(self.output, "{} s{}, s{}", op.mnemonic(), r1, r2).unwrap();
                self.machine.free_register(r2);
                Ok(Some(r1))
            }
            Expr::Equality { lhs, rhs } => {
                let r1 = self.eval_operand(lhs)?;
                let r2 = self.eval_operand(rhs)?;
                // Only the machine flags carry the result. Neither operand
                // register is released here; the statement boundary
                // reclaims both.
                writeln!(self.output, "COMPARE s{}, s{}", r1, r2).unwrap();
                Ok(None)
            }
            Expr::Assign { name, value } => {
                let reg = self.eval_operand(value)?;
                let addr = self.machine.resolve_address(name)?;
                writeln!(self.output, "STORE s{}, {} ; var {}", reg, addr, name).unwrap();
                self.machine.free_register(reg);
                Ok(None)
            }
            Expr::OutputWrite { port, value } => {
                let reg = self.eval_operand(value)?;
                // The operand register stays busy until the statement
                // boundary reclaims it.
                writeln!(self.output, "OUTPUT s{}, {}", reg, port).unwrap();
                Ok(None)
            }
            Expr::Conditional { condition, body } => {
                let label = self.machine.new_label();
                self.eval_expr(condition)?;
                // The condition counts as a full statement for liveness;
                // the pool resets before the branch.
                self.machine.free_all_registers();
                writeln!(self.output, "JUMP NZ, {}", label).unwrap();
                for statement in body {
                    self.eval_statement(statement)?;
                }
                writeln!(self.output, "{}:", label).unwrap();
                Ok(None)
            }
        }
    }
}
