// Counts tape allocations to check the tape is released exactly once per run.
// Kept in its own test binary because it installs a global allocator.

use std::alloc::{GlobalAlloc, Layout, System};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use tapehost::runtime::config::HarnessConfig;
use tapehost::runtime::harness::{from_fn, Harness};

// Odd size so no other allocation in the test matches it
const TAPE_SIZE: usize = 3_999_991;

static TAPE_ALLOCS: AtomicUsize = AtomicUsize::new(0);
static TAPE_FREES: AtomicUsize = AtomicUsize::new(0);

struct CountingAllocator;

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout.size() == TAPE_SIZE {
            TAPE_ALLOCS.fetch_add(1, Ordering::SeqCst);
        }
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if layout.size() == TAPE_SIZE {
            TAPE_FREES.fetch_add(1, Ordering::SeqCst);
        }
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn counts() -> (usize, usize) {
    (
        TAPE_ALLOCS.load(Ordering::SeqCst),
        TAPE_FREES.load(Ordering::SeqCst),
    )
}

// One test function: the counters are process-wide
#[test]
fn test_tape_released_exactly_once() {
    let harness = Harness::new(HarnessConfig::new().with_tape_size(TAPE_SIZE));

    // Immediate return
    let mut during = None;
    let mut program = from_fn(|_| during = Some(counts()));
    let mut diag = Vec::new();
    harness
        .run_with(&mut program, io::empty(), Vec::new(), &mut diag)
        .unwrap();
    assert_eq!(during, Some((1, 0)));
    assert_eq!(counts(), (1, 1));

    // Extensive I/O
    let input: Vec<u8> = (0..200_000u32).map(|i| (i % 256) as u8).collect();
    let mut during = None;
    let mut program = from_fn(|session| {
        while let Some(b) = session.read_byte() {
            session.write_byte(b);
        }
        during = Some(counts());
    });
    let mut diag = Vec::new();
    let output = harness
        .run_with(&mut program, &input[..], Vec::new(), &mut diag)
        .unwrap();
    assert_eq!(output, input);
    assert_eq!(during, Some((2, 1)));
    assert_eq!(counts(), (2, 2));

    // Unwinding out of the hosted program still releases the tape
    let mut diag = Vec::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut program = from_fn(|_| panic!("hosted program crashed"));
        harness.run_with(&mut program, io::empty(), Vec::new(), &mut diag)
    }));
    assert!(result.is_err());
    assert!(diag.is_empty());
    assert_eq!(counts(), (3, 3));
}
