use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::power_state::PowerState;

/// One row of the backend's instance listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "instance_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "imageid")]
    pub image_id: Option<String>,
    #[serde(default)]
    pub is_spot: Option<bool>,
    pub power_state: PowerState,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default, rename = "ip")]
    pub private_ip: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl Instance {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("—")
    }

    /// Department field, falling back to the `Department` tag.
    pub fn department(&self) -> Option<&str> {
        self.department
            .as_deref()
            .or_else(|| self.tags.get("Department").map(String::as_str))
    }

    pub fn public_ip_display(&self) -> &str {
        self.public_ip.as_deref().unwrap_or("—")
    }

    pub fn private_ip_display(&self) -> &str {
        self.private_ip.as_deref().unwrap_or("—")
    }

    pub fn instance_type_display(&self) -> &str {
        self.instance_type.as_deref().unwrap_or("—")
    }

    pub fn launched_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn launched_display(&self) -> String {
        self.launched_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "—".into())
    }

    pub fn is_terminated(&self) -> bool {
        self.power_state.is_terminated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_listing_row() {
        let raw = serde_json::json!({
            "instance_id": "i-123",
            "instance_type": "t2.micro",
            "created_at": "2024-05-01T10:20:30+00:00",
            "public_ip": null,
            "ip": "10.0.0.4",
            "tags": {"Name": "web", "Department": "ops"},
            "name": "web",
            "description": null,
            "owner": "ana",
            "power_state": "stopped",
            "os": "linux"
        });
        let instance: Instance = serde_json::from_value(raw).unwrap();
        assert_eq!(instance.id, "i-123");
        assert_eq!(instance.power_state, PowerState::Stopped);
        assert_eq!(instance.private_ip.as_deref(), Some("10.0.0.4"));
        assert_eq!(instance.public_ip_display(), "—");
        assert_eq!(instance.department(), Some("ops"));
        assert_eq!(instance.launched_display(), "2024-05-01 10:20 UTC");
    }

    #[test]
    fn missing_name_renders_placeholder() {
        let instance: Instance = serde_json::from_value(serde_json::json!({
            "instance_id": "i-9",
            "power_state": "pending"
        }))
        .unwrap();
        assert_eq!(instance.display_name(), "—");
        assert!(instance.launched_at().is_none());
        assert!(!instance.is_terminated());
    }
}
