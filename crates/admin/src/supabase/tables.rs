//! Table (collection) operations over the PostgREST surface.

use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;

use super::{RemoteError, SupabaseClient};

impl SupabaseClient {
    /// Fetch every row of `table`, ordered by `order_column`.
    ///
    /// An empty table is a valid empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, an error response from the
    /// backend, or an undecodable body.
    #[instrument(skip(self))]
    pub async fn list<T: DeserializeOwned>(
        &self,
        table: &str,
        order_column: &str,
        ascending: bool,
    ) -> Result<Vec<T>, RemoteError> {
        let direction = if ascending { "asc" } else { "desc" };
        let order = format!("{order_column}.{direction}");
        let url = self.endpoint(&["rest", "v1", table]);

        let request = self
            .inner
            .http
            .get(url)
            .query(&[("select", "*"), ("order", order.as_str())]);

        let response = self.authed(request).await.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Insert one record into `table`.
    ///
    /// The record must omit server-assigned columns (`id`, `created_at`,
    /// `updated_at`); server-side validation failures surface as
    /// [`RemoteError::Api`].
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an error response.
    #[instrument(skip(self, record))]
    pub async fn insert<T: Serialize + Sync>(
        &self,
        table: &str,
        record: &T,
    ) -> Result<(), RemoteError> {
        let url = self.endpoint(&["rest", "v1", table]);

        let request = self
            .inner
            .http
            .post(url)
            .header("Prefer", "return=minimal")
            .json(record);

        let response = self.authed(request).await.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    /// Merge `patch`'s set fields into the row of `table` with the given
    /// id.
    ///
    /// PostgREST patches by filter; a filter matching no rows is not an
    /// error on this surface, so a vanished id goes undiagnosed here, the
    /// same as any other remote failure mode the panel cannot distinguish.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an error response.
    #[instrument(skip(self, patch))]
    pub async fn update<T: Serialize + Sync>(
        &self,
        table: &str,
        id: i64,
        patch: &T,
    ) -> Result<(), RemoteError> {
        let url = self.endpoint(&["rest", "v1", table]);

        let request = self
            .inner
            .http
            .patch(url)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(patch);

        let response = self.authed(request).await.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    /// Delete the row of `table` with the given id.
    ///
    /// Deleting an id that no longer exists is not specially diagnosed.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an error response.
    #[instrument(skip(self))]
    pub async fn delete(&self, table: &str, id: i64) -> Result<(), RemoteError> {
        let url = self.endpoint(&["rest", "v1", table]);

        let request = self
            .inner
            .http
            .delete(url)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal");

        let response = self.authed(request).await.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }
}
