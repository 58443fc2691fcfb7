pub mod poller;
pub mod instance_service;

// Re-export commonly used items
pub use poller::{wait_for_power_state, PollPolicy};
pub use instance_service::{ActionOutcome, InstanceController};
