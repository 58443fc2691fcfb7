use serde::{Deserialize, Serialize};

/// A machine image (AMI) offered in the creation form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineImage {
    pub image_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub architecture: Option<String>,
}

impl MachineImage {
    /// Option label, e.g. `base-ubuntu (ami-0abc)`.
    pub fn label(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => format!("{} ({})", name, self.image_id),
            _ => self.image_id.clone(),
        }
    }
}
