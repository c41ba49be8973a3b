use serde::{Deserialize, Serialize};

/// Stored account row.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: String,
}

/// The signed-in user as every consumer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

impl From<&Profile> for CurrentUser {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            email: profile.email.clone(),
            display_name: profile.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}
