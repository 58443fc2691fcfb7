// Backend API modules
pub mod client;
pub mod instances;
pub mod amis;
pub mod backend;

// Re-export commonly used items
pub use client::{api_call, set_silent, ApiClient};
pub use instances::{create_instance, get_instance_status, instance_action, load_instances};
pub use amis::load_amis;
pub use backend::InstanceBackend;
