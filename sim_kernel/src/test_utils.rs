//! Test utilities for simulation testing
//!
//! This module provides helper functions for building kernels in a known
//! state and for checking the cross-component invariants after each step.

use crate::{KernelConfig, ProcessState, QueueTag, SimulatedKernel};
use core_types::ProcessId;
use kernel_api::KernelApi;
use std::collections::HashSet;

/// Creates a default kernel with `count` root processes
///
/// The first process is running, the rest are queued in creation order.
pub fn kernel_with_processes(count: usize) -> SimulatedKernel {
    let mut kernel = SimulatedKernel::new();
    for _ in 0..count {
        kernel.create_process();
    }
    kernel
}

/// Creates a single-disk kernel whose RAM holds exactly `frames` pages
///
/// Zero frames or a zero page size are raised to one so the configuration
/// is always valid.
pub fn kernel_with_frames(frames: u64, page_size: u64) -> SimulatedKernel {
    let page_size = page_size.max(1);
    let config = KernelConfig::new(1, frames.max(1) * page_size, page_size);
    SimulatedKernel::with_config(config).unwrap_or_default()
}

/// Checks every cross-component invariant
///
/// Returns one human-readable line per violation; an empty list means the
/// kernel is consistent.
pub fn check_invariants(kernel: &SimulatedKernel) -> Vec<String> {
    let mut violations = Vec::new();
    let running = kernel.running_process();

    // Running slot
    if let Some(process_id) = running {
        match kernel.process_state(process_id) {
            Some(ProcessState::Running) => {}
            other => violations.push(format!(
                "running {} has state {:?}",
                process_id, other
            )),
        }
    }

    // Ready queue
    let mut queued = HashSet::new();
    for entry in kernel.ready_entries() {
        let process_id = entry.process_id;
        if !queued.insert(process_id) {
            violations.push(format!("{} queued more than once", process_id));
        }
        if Some(process_id) == running {
            violations.push(format!("running {} is also queued", process_id));
        }
        match (kernel.process_state(process_id), entry.tag) {
            (Some(ProcessState::Ready), QueueTag::Ready)
            | (Some(ProcessState::Waiting), QueueTag::Waiting) => {}
            (state, tag) => violations.push(format!(
                "queued {} has state {:?} but tag {:?}",
                process_id, state, tag
            )),
        }
    }

    // Records
    for record in kernel.processes() {
        let id = record.process_id;
        match record.state {
            ProcessState::Running if running != Some(id) => {
                violations.push(format!("{} marked running but not on the CPU", id))
            }
            ProcessState::Ready | ProcessState::Waiting if !queued.contains(&id) => {
                violations.push(format!("{} is {:?} but not queued", id, record.state))
            }
            ProcessState::Blocked | ProcessState::Zombie
                if queued.contains(&id) || running == Some(id) =>
            {
                violations.push(format!("{} is {:?} but schedulable", id, record.state))
            }
            _ => {}
        }

        for &child in &record.children {
            match kernel.process(child) {
                Some(c) if c.parent == id && !c.is_zombie() => {}
                Some(_) => violations.push(format!("{} lists {} with a broken link", id, child)),
                None => violations.push(format!("{} lists missing child {}", id, child)),
            }
        }
        for &zombie in &record.zombies {
            if kernel.process_state(zombie) != Some(ProcessState::Zombie) {
                violations.push(format!("{} lists {} as zombie", id, zombie));
            }
        }
    }

    // Frames
    let mut pages = HashSet::new();
    for frame in kernel.memory() {
        if !pages.insert((frame.process_id, frame.page_number)) {
            violations.push(format!(
                "{} holds {} twice",
                frame.process_id, frame.page_number
            ));
        }
        match kernel.process(frame.process_id) {
            Some(record) if !record.is_zombie() => {}
            _ => violations.push(format!(
                "frame of {} outlived the process",
                frame.process_id
            )),
        }
    }
    if kernel.resident_bytes() > kernel.config().ram_bytes {
        violations.push(format!(
            "{} resident bytes exceed {} bytes of RAM",
            kernel.resident_bytes(),
            kernel.config().ram_bytes
        ));
    }

    violations
}

/// Panics with every violated invariant
pub fn assert_invariants(kernel: &SimulatedKernel) {
    let violations = check_invariants(kernel);
    assert!(
        violations.is_empty(),
        "kernel invariants violated:\n{}",
        violations.join("\n")
    );
}

/// Returns the process on the CPU, panicking if it is idle
pub fn expect_running(kernel: &SimulatedKernel) -> ProcessId {
    let current = kernel.current_process();
    assert!(!current.is_none(), "expected a running process, CPU is idle");
    current
}
