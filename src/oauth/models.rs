//! Facebook Graph API payloads.

use serde::{Deserialize, Serialize};

/// Response of `/oauth/access_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Response of `/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbUserInfoResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<Picture>,
}

impl FbUserInfoResponse {
    /// Profile picture URL, if the provider returned one.
    pub fn picture_url(&self) -> Option<&str> {
        self.picture
            .as_ref()
            .and_then(|picture| picture.data.as_ref())
            .and_then(|data| data.url.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    #[serde(default)]
    pub data: Option<PictureData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureData {
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub is_silhouette: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
}
