use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const FACEBOOK_ME_URL: &str = "https://graph.facebook.com/me";

/// Identity asserted by an external provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SocialProfile {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[async_trait]
pub trait SocialVerifier: Send + Sync {
    async fn verify_google(&self, id_token: &str) -> Result<SocialProfile, AppError>;
    async fn verify_facebook(&self, access_token: &str) -> Result<SocialProfile, AppError>;
}

#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacebookUser {
    email: Option<String>,
    name: Option<String>,
    picture: Option<FacebookPicture>,
}

#[derive(Debug, Deserialize)]
struct FacebookPicture {
    data: Option<FacebookPictureData>,
}

#[derive(Debug, Deserialize)]
struct FacebookPictureData {
    url: Option<String>,
}

fn google_profile(info: GoogleTokenInfo, client_id: &str) -> Result<SocialProfile, AppError> {
    if info.aud != client_id {
        return Err(AppError::unauthorized("Google authentication failed"));
    }
    let email = info
        .email
        .ok_or_else(|| AppError::unauthorized("Google authentication failed"))?;
    Ok(SocialProfile {
        email,
        name: info.name,
        picture: info.picture,
    })
}

fn facebook_profile(user: FacebookUser) -> Result<SocialProfile, AppError> {
    let email = user
        .email
        .ok_or_else(|| AppError::unauthorized("Facebook authentication failed"))?;
    Ok(SocialProfile {
        email,
        name: user.name,
        picture: user.picture.and_then(|p| p.data).and_then(|d| d.url),
    })
}

pub struct HttpSocialVerifier {
    http: reqwest::Client,
    google_client_id: Option<String>,
}

impl HttpSocialVerifier {
    pub fn new(google_client_id: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            google_client_id,
        }
    }
}

#[async_trait]
impl SocialVerifier for HttpSocialVerifier {
    async fn verify_google(&self, id_token: &str) -> Result<SocialProfile, AppError> {
        let client_id = match self.google_client_id.as_deref() {
            Some(id) => id,
            None => return Err(AppError::unauthorized("Google sign-in is not configured")),
        };

        let resp = self
            .http
            .get(GOOGLE_TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;
        if !resp.status().is_success() {
            tracing::debug!(status = %resp.status(), "google rejected id token");
            return Err(AppError::unauthorized("Google authentication failed"));
        }

        let info: GoogleTokenInfo = resp
            .json()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;
        google_profile(info, client_id)
    }

    async fn verify_facebook(&self, access_token: &str) -> Result<SocialProfile, AppError> {
        let resp = self
            .http
            .get(FACEBOOK_ME_URL)
            .query(&[
                ("fields", "id,name,email,picture"),
                ("access_token", access_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;
        if !resp.status().is_success() {
            tracing::debug!(status = %resp.status(), "facebook rejected access token");
            return Err(AppError::unauthorized("Facebook authentication failed"));
        }

        let user: FacebookUser = resp
            .json()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;
        facebook_profile(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_audience_must_match() {
        let info = GoogleTokenInfo {
            aud: "someone-else".into(),
            email: Some("a@example.com".into()),
            name: None,
            picture: None,
        };
        assert!(google_profile(info, "ours").is_err());
    }

    #[test]
    fn google_profile_carries_email() {
        let info: GoogleTokenInfo = serde_json::from_value(serde_json::json!({
            "aud": "ours",
            "email": "a@example.com",
            "email_verified": "true",
            "name": "Ada"
        }))
        .unwrap();
        let profile = google_profile(info, "ours").unwrap();
        assert_eq!(profile.email, "a@example.com");
        assert_eq!(profile.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn facebook_picture_is_nested() {
        let user: FacebookUser = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Ada",
            "email": "a@example.com",
            "picture": { "data": { "url": "https://cdn.example.com/a.png" } }
        }))
        .unwrap();
        let profile = facebook_profile(user).unwrap();
        assert_eq!(profile.picture.as_deref(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn facebook_without_email_fails() {
        let user: FacebookUser =
            serde_json::from_value(serde_json::json!({ "id": "1", "name": "Ada" })).unwrap();
        assert!(facebook_profile(user).is_err());
    }
}
