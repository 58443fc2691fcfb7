use ec2dash::api::ApiClient;
use ec2dash::services::InstanceController;

#[derive(Clone)]
pub struct AppState {
    pub controller: InstanceController<ApiClient>,
    pub api_base_url: String,
}
