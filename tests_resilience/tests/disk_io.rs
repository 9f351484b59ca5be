//! Disk I/O Integration Tests
//!
//! These tests validate per-disk request queues:
//! - Requests are served in FIFO order on each disk independently
//! - Completions wake the requester
//! - Rejected requests change nothing

use core_types::{DiskId, ProcessId, NO_PROCESS};
use kernel_api::{KernelApi, KernelError};
use sim_kernel::ProcessState;
use tests_resilience::{observe, step, test_bootstrap};

fn pid(raw: u32) -> ProcessId {
    ProcessId::new(raw)
}

/// Test: two disks serve their queues independently in FIFO order
#[test]
fn test_requests_served_fifo_per_disk() {
    let mut kernel = test_bootstrap(2, 4, 64);
    for _ in 0..3 {
        kernel.create_process();
    }
    let (d0, d1) = (DiskId::new(0), DiskId::new(1));

    step(&mut kernel, |k| k.request_disk_read(d0, "a")).unwrap();
    step(&mut kernel, |k| k.request_disk_read(d0, "b")).unwrap();
    step(&mut kernel, |k| k.request_disk_read(d1, "c")).unwrap();
    assert_eq!(kernel.current_process(), NO_PROCESS);

    let names: Vec<_> = kernel
        .disk_queue(d0)
        .unwrap()
        .into_iter()
        .map(|r| (r.process_id, r.file_name))
        .collect();
    assert_eq!(names, vec![(pid(1), "a".to_string()), (pid(2), "b".to_string())]);
    assert_eq!(kernel.disk_queue(d1).unwrap().len(), 1);
    assert_eq!(kernel.pending_disk_requests(pid(3)), 1);

    // First completion finds the CPU idle
    step(&mut kernel, |k| k.complete_disk_job(d0)).unwrap();
    assert_eq!(kernel.current_process(), pid(1));
    assert_eq!(kernel.pop_disk_request(d0).unwrap().file_name, "a");

    step(&mut kernel, |k| k.complete_disk_job(d0)).unwrap();
    assert_eq!(kernel.pop_disk_request(d0).unwrap().file_name, "b");
    step(&mut kernel, |k| k.complete_disk_job(d1)).unwrap();
    assert_eq!(kernel.pop_disk_request(d1).unwrap().file_name, "c");

    assert_eq!(kernel.current_process(), pid(1));
    assert_eq!(kernel.ready_queue(), vec![pid(2), pid(3)]);
    assert_eq!(kernel.process_state(pid(3)), Some(ProcessState::Ready));
}

/// Test: popping an empty or unknown disk yields nothing
#[test]
fn test_pop_empty_and_unknown_disk() {
    let mut kernel = test_bootstrap(1, 4, 64);
    assert!(kernel.pop_disk_request(DiskId::new(0)).is_none());
    assert!(kernel.pop_disk_request(DiskId::new(5)).is_none());
    assert!(matches!(
        kernel.disk_queue(DiskId::new(5)),
        Err(KernelError::InvalidDisk { disk_count: 1, .. })
    ));
}

/// Test: a read with nothing running is rejected and nothing changes
#[test]
fn test_read_on_idle_cpu_is_rejected() {
    let mut kernel = test_bootstrap(1, 4, 64);
    let err = kernel
        .request_disk_read(DiskId::new(0), "x")
        .unwrap_err();
    assert!(err.is_cpu_idle());
    assert!(kernel.disk_queue(DiskId::new(0)).unwrap().is_empty());
    assert!(kernel.audit_log().is_empty());
}

/// Test: a read from an unknown disk leaves the requester running
#[test]
fn test_invalid_disk_leaves_state_unchanged() {
    let mut kernel = test_bootstrap(1, 4, 64);
    kernel.create_process();
    kernel.create_process();
    let before = observe(&kernel);
    let now = kernel.now();

    let err = kernel.request_disk_read(DiskId::new(3), "x").unwrap_err();
    assert_eq!(
        err,
        KernelError::InvalidDisk {
            disk: DiskId::new(3),
            disk_count: 1
        }
    );
    assert_eq!(observe(&kernel), before);
    assert_eq!(kernel.now(), now);
    assert_eq!(kernel.process_state(pid(1)), Some(ProcessState::Running));
}

/// Test: completing on an idle disk is an error
#[test]
fn test_complete_idle_disk() {
    let mut kernel = test_bootstrap(1, 4, 64);
    assert_eq!(
        kernel.complete_disk_job(DiskId::new(0)),
        Err(KernelError::DiskIdle {
            disk: DiskId::new(0)
        })
    );
}
