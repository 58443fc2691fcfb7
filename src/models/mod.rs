pub mod power_state;
pub mod instance;
pub mod machine_image;
pub mod create_request;
pub mod instance_action;
pub mod notification;
pub mod view_state;
pub mod dashboard_state;

// Re-export all models
pub use power_state::PowerState;
pub use instance::Instance;
pub use machine_image::MachineImage;
pub use create_request::{ActionResponse, CreateInstanceRequest, CreatedInstance};
pub use instance_action::{ActionStage, InstanceAction, PendingAction};
pub use notification::{Notification, NotificationKind};
pub use view_state::ViewState;
pub use dashboard_state::DashboardState;
