//! Object storage operations (product images).

use tracing::instrument;

use super::{RemoteError, SupabaseClient};

impl SupabaseClient {
    /// Upload a blob into `bucket` and return its public URL.
    ///
    /// The object is stored under `products/{timestamp}_{suffix}.{ext}` so
    /// repeated uploads of the same filename never collide; `suggested_name`
    /// only contributes the extension.
    ///
    /// Callers that can degrade (product images) are expected to fall back
    /// to an inline data URL on failure instead of failing the whole
    /// operation; see `services::catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an error response.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_blob(
        &self,
        bucket: &str,
        bytes: Vec<u8>,
        suggested_name: &str,
        content_type: &str,
    ) -> Result<String, RemoteError> {
        let object_path = format!("products/{}", object_name(suggested_name));
        let mut segments = vec!["storage", "v1", "object", bucket];
        segments.extend(object_path.split('/'));
        let url = self.endpoint(&segments);

        let request = self
            .inner
            .http
            .post(url)
            .header("Content-Type", content_type)
            .body(bytes);

        let response = self.authed(request).await.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(self.public_blob_url(bucket, &object_path))
    }

    /// Publicly retrievable address of an object in `bucket`.
    #[must_use]
    pub fn public_blob_url(&self, bucket: &str, object_path: &str) -> String {
        let mut segments = vec!["storage", "v1", "object", "public", bucket];
        segments.extend(object_path.split('/'));
        self.endpoint(&segments).to_string()
    }
}

/// Time-stamped object name with a random suffix, keeping only the
/// extension of the suggested filename.
fn object_name(suggested_name: &str) -> String {
    use rand::Rng;
    use rand::distr::Alphanumeric;

    let ext = suggested_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5)
        .unwrap_or_else(|| "bin".to_string());

    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();

    format!(
        "{}_{}.{}",
        chrono::Utc::now().timestamp_millis(),
        suffix.to_lowercase(),
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_keeps_extension() {
        let name = object_name("peyek kacang.JPG");
        assert!(name.ends_with(".jpg"), "got {name}");
        assert!(name.contains('_'));
    }

    #[test]
    fn test_object_name_defaults_extension() {
        assert!(object_name("no-extension").ends_with(".bin"));
        assert!(object_name("weird.verylongext").ends_with(".bin"));
    }

    #[test]
    fn test_object_names_do_not_collide() {
        assert_ne!(object_name("a.png"), object_name("a.png"));
    }
}
