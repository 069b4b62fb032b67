use crate::errors::{PbcError, PbcResult};
use std::collections::HashMap;

/// Operand registers s0..s9 on the target.
pub const NUM_REGISTERS: usize = 10;

/// Addressable scratchpad locations, one byte each.
pub const SCRATCHPAD_SIZE: usize = 256;

/// Register, scratchpad and label state for one compilation session.
///
/// A fresh `Machine` per `compile` call gives independent compilation
/// units; reusing one keeps variable addresses and label numbering
/// alive across calls, which is what the interactive loop wants.
pub struct Machine {
    registers: [bool; NUM_REGISTERS],
    memmap: HashMap<String, u8>,
    next_addr: usize,
    label_index: usize,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            registers: [false; NUM_REGISTERS],
            memmap: HashMap::new(),
            next_addr: 0,
            label_index: 0,
        }
    }

    /// Marks the lowest free register busy and returns its index.
    /// There is no spill path; exhaustion is fatal for the unit.
    pub fn allocate_register(&mut self) -> PbcResult<usize> {
        for (i, busy) in self.registers.iter_mut().enumerate() {
            if !*busy {
                *busy = true;
                return Ok(i);
            }
        }
        Err(PbcError::NoRegistersAvailable)
    }

    /// Releases a register. Freeing an already-free register is a no-op.
    pub fn free_register(&mut self, reg: usize) {
        if reg < NUM_REGISTERS {
            self.registers[reg] = false;
        }
    }

    /// Statement-boundary liveness reset.
    pub fn free_all_registers(&mut self) {
        self.registers = [false; NUM_REGISTERS];
    }

    /// Returns the scratchpad address bound to `name`, binding the next
    /// sequential address on first reference. Bindings are never
    /// removed or reassigned for the lifetime of the machine.
    pub fn resolve_address(&mut self, name: &str) -> PbcResult<u8> {
        if let Some(&addr) = self.memmap.get(name) {
            return Ok(addr);
        }
        if self.next_addr >= SCRATCHPAD_SIZE {
            return Err(PbcError::ScratchpadExhausted { name: name.to_string() });
        }
        let addr = self.next_addr as u8;
        self.memmap.insert(name.to_string(), addr);
        self.next_addr += 1;
        Ok(addr)
    }

    /// Returns a session-unique jump label. The counter never resets.
    pub fn new_label(&mut self) -> String {
        self.label_index += 1;
        format!("label{}", self.label_index)
    }

    /// Address of an already-bound variable, if any.
    pub fn address_of(&self, name: &str) -> Option<u8> {
        self.memmap.get(name).copied()
    }

    /// Number of registers currently marked busy.
    pub fn live_registers(&self) -> usize {
        self.registers.iter().filter(|&&busy| busy).count()
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
