//! In-memory register bus for tests and dry runs.

use std::collections::HashMap;

use crate::bus::{BusError, RegisterBus};

/// Register transaction, recorded for test verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusTransaction {
    Read { register: u8 },
    Write { register: u8, value: u8 },
}

/// Register file with a transaction log and fault injection.
#[derive(Debug, Default)]
pub struct MockRegisterBus {
    registers: HashMap<u8, u8>,
    transactions: Vec<BusTransaction>,
    fail_register: Option<u8>,
}

impl MockRegisterBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a register.
    pub fn set_register(&mut self, register: u8, value: u8) {
        self.registers.insert(register, value);
    }

    /// Preload a big-endian signed word at `register`/`register + 1`.
    pub fn set_word(&mut self, register: u8, value: i16) {
        let [high, low] = value.to_be_bytes();
        self.set_register(register, high);
        self.set_register(register.wrapping_add(1), low);
    }

    /// Current value of a register (0 if never written).
    pub fn register(&self, register: u8) -> u8 {
        self.registers.get(&register).copied().unwrap_or(0)
    }

    /// Make every access to `register` fail.
    pub fn fail_on(&mut self, register: u8) {
        self.fail_register = Some(register);
    }

    /// Get transaction log.
    pub fn transactions(&self) -> &[BusTransaction] {
        &self.transactions
    }

    /// Clear transaction log.
    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }
}

impl RegisterBus for MockRegisterBus {
    fn read_byte(&mut self, register: u8) -> Result<u8, BusError> {
        self.transactions.push(BusTransaction::Read { register });
        if self.fail_register == Some(register) {
            return Err(BusError::Read {
                register,
                message: "injected fault".to_string(),
            });
        }
        Ok(self.register(register))
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        self.transactions
            .push(BusTransaction::Write { register, value });
        if self.fail_register == Some(register) {
            return Err(BusError::Write {
                register,
                message: "injected fault".to_string(),
            });
        }
        self.registers.insert(register, value);
        Ok(())
    }
}
