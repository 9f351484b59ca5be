//! Resilience Test Utilities
//!
//! This crate provides shared utilities for whole-kernel scenario tests.
//!
//! ## Test Philosophy
//!
//! - **Invariants after every step**: each scenario checks the kernel after
//!   each operation, not just at the end
//! - **Deterministic**: logical time only, so every trace replays identically
//! - **Errors change nothing**: a rejected operation leaves all state as it was

use core_types::ProcessId;
use kernel_api::{KernelApi, Syscall, SyscallResponse};
use sim_kernel::test_utils::assert_invariants;
use sim_kernel::{KernelConfig, SimulatedKernel};

/// Bootstrap helper for tests
///
/// Creates a kernel with `disks` disks and room for `frames` pages of
/// `page_size` bytes.
pub fn test_bootstrap(disks: usize, frames: u64, page_size: u64) -> SimulatedKernel {
    let config = KernelConfig::new(disks, frames * page_size, page_size);
    SimulatedKernel::with_config(config).expect("test configuration must be valid")
}

/// Runs one step and checks every invariant afterwards
pub fn step<T>(kernel: &mut SimulatedKernel, op: impl FnOnce(&mut SimulatedKernel) -> T) -> T {
    let result = op(kernel);
    assert_invariants(kernel);
    result
}

/// Creates a root process and has it fork `children` times
///
/// Returns the root and its children in fork order. The root must end up on
/// the CPU, so call this on an idle kernel.
pub fn spawn_family(kernel: &mut SimulatedKernel, children: usize) -> (ProcessId, Vec<ProcessId>) {
    let root = kernel.create_process();
    let forked = (0..children)
        .filter_map(|_| kernel.fork().ok())
        .collect();
    assert_invariants(kernel);
    (root, forked)
}

/// Parses a JSON trace and replays it step by step, checking invariants
pub fn replay_json(kernel: &mut SimulatedKernel, json: &str) -> Vec<SyscallResponse> {
    let trace = Syscall::parse_trace(json).expect("trace must be valid JSON");
    trace
        .iter()
        .flat_map(|syscall| {
            let responses = kernel.replay(std::slice::from_ref(syscall));
            assert_invariants(kernel);
            responses
        })
        .enumerate()
        .map(|(step, mut response)| {
            response.step = step;
            response
        })
        .collect()
}

/// Snapshot of the externally visible kernel state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    pub running: ProcessId,
    pub ready_queue: Vec<ProcessId>,
    pub memory: Vec<(ProcessId, u64)>,
    pub process_count: usize,
}

/// Captures what a driver would print after a step
pub fn observe(kernel: &SimulatedKernel) -> Observed {
    Observed {
        running: kernel.current_process(),
        ready_queue: kernel.ready_queue(),
        memory: kernel
            .memory()
            .iter()
            .map(|f| (f.process_id, f.page_number.as_u64()))
            .collect(),
        process_count: kernel.process_count(),
    }
}
