// Constants for the tape runtime

/// Tape size of the reference configuration, in byte cells
pub const DEFAULT_TAPE_SIZE: usize = 4_000_000;

/// Line written to the diagnostic stream after a successful teardown
pub const COMPLETION_MESSAGE: &str = "Exited successfully";

/// End-of-stream sentinel returned by the C ABI read callback (C `EOF`)
pub const EOF_SENTINEL: i32 = -1;

/// Consecutive end-of-stream reads tolerated by the opt-in EOF abort policy
pub const DEFAULT_EOF_ABORT_LIMIT: u32 = 50;
