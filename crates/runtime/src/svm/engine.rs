//! The execution engine capability the pipeline delegates bytecode execution to.
//! This crate does not implement a VM; callers (typically the on-chain program
//! loader, out of scope here) provide an `ExecutionEngine`.

use std::collections::HashMap;

use validator_sdk::{Account, CompiledInstruction, PublicKey};

use super::error_metrics::ErrorKind;

#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub error_kind: Option<ErrorKind>,
    pub compute_units_consumed: u64,
    pub logs: Vec<String>,
}

impl ExecutionOutcome {
    pub fn success(compute_units_consumed: u64, logs: Vec<String>) -> Self {
        Self {
            success: true,
            error_kind: None,
            compute_units_consumed,
            logs,
        }
    }

    pub fn failure(error_kind: ErrorKind) -> Self {
        Self {
            success: false,
            error_kind: Some(error_kind),
            compute_units_consumed: 0,
            logs: Vec::new(),
        }
    }
}

pub trait ExecutionEngine {
    fn execute(
        &self,
        instructions: &[CompiledInstruction],
        accounts: &mut HashMap<PublicKey, Account>,
    ) -> ExecutionOutcome;
}

/// A no-op engine that marks every instruction executed without touching account
/// state; used by pipeline tests and as a placeholder until a real VM is wired in.
pub struct NoopEngine;

impl ExecutionEngine for NoopEngine {
    fn execute(
        &self,
        _instructions: &[CompiledInstruction],
        _accounts: &mut HashMap<PublicKey, Account>,
    ) -> ExecutionOutcome {
        ExecutionOutcome::success(0, Vec::new())
    }
}
