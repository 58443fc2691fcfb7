use serde::{Deserialize, Serialize};

/// Body of `POST /api/aws/create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInstanceRequest {
    pub name: String,
    pub owner: String,
    pub instance_type: String,
    pub department: String,
    #[serde(rename = "imageid")]
    pub image_id: String,
    pub is_spot: bool,
}

impl CreateInstanceRequest {
    /// Empty form as shown when the creation view opens.
    pub fn new(default_instance_type: &str) -> Self {
        Self {
            name: String::new(),
            owner: String::new(),
            instance_type: default_instance_type.to_string(),
            department: String::new(),
            image_id: String::new(),
            is_spot: true,
        }
    }

    pub fn has_image(&self) -> bool {
        !self.image_id.trim().is_empty()
    }
}

/// Descriptor returned by the backend after a successful create.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedInstance {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub instance_ip: Option<String>,
}

/// Acknowledgement returned by the start/stop/terminate endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_backend_field_names() {
        let mut req = CreateInstanceRequest::new("t2.micro");
        req.image_id = "ami-1".into();
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["imageid"], "ami-1");
        assert_eq!(body["is_spot"], true);
        assert_eq!(body["instance_type"], "t2.micro");
        assert!(body.get("image_id").is_none());
    }

    #[test]
    fn blank_image_is_not_an_image() {
        let mut req = CreateInstanceRequest::new("t2.micro");
        assert!(!req.has_image());
        req.image_id = "   ".into();
        assert!(!req.has_image());
        req.image_id = "ami-2".into();
        assert!(req.has_image());
    }
}
