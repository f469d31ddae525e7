//! Social login providers.

pub mod facebook;
pub mod models;

pub use facebook::FacebookClient;
pub use models::{FbTokenResponse, FbUserInfoResponse, Picture, PictureData};
