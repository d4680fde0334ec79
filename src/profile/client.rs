use super::{ProfileError, ProfileField, ProfileRecord};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

/// Reads profile attributes from the host's account settings API.
#[derive(Clone)]
pub struct ProfileClient {
    http: reqwest::Client,
}

impl ProfileClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Read name, email and mobile number concurrently.
    ///
    /// Resolves only once all three reads succeed; the first failure wins and
    /// the remaining reads are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProfileError`] any of the three reads produced.
    pub async fn fetch(
        &self,
        endpoint_base: &str,
        access_token: &str,
    ) -> Result<ProfileRecord, ProfileError> {
        let base = endpoint_base.trim_end_matches('/');
        url::Url::parse(base)
            .map_err(|e| ProfileError::InvalidEndpoint(format!("{endpoint_base}: {e}")))?;

        let (name, email_address, mobile_number) = tokio::try_join!(
            self.read::<String>(base, access_token, ProfileField::Name),
            self.read::<String>(base, access_token, ProfileField::Email),
            self.read::<serde_json::Value>(base, access_token, ProfileField::MobileNumber),
        )?;

        Ok(ProfileRecord {
            name,
            email_address,
            mobile_number,
        })
    }

    async fn read<T: DeserializeOwned>(
        &self,
        base: &str,
        access_token: &str,
        field: ProfileField,
    ) -> Result<T, ProfileError> {
        let response = self
            .http
            .get(field.url(base))
            .bearer_auth(access_token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| ProfileError::Http {
                field: field.as_str(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(ProfileError::PermissionDenied {
                field: field.as_str(),
            });
        }
        if !status.is_success() {
            return Err(ProfileError::Status {
                field: field.as_str(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|source| ProfileError::Decode {
            field: field.as_str(),
            source,
        })
    }
}
