use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{NewRecommendation, Recommendation, Results};

impl ApiClient {
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn recommendations(&self) -> Result<Vec<Recommendation>, ApiError> {
        let envelope: Results<Recommendation> = self.get("/products/recommendations/").await?;
        Ok(envelope.results)
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn create_recommendation(
        &self,
        recommendation: &NewRecommendation,
    ) -> Result<Recommendation, ApiError> {
        self.post("/products/recommendations/", recommendation)
            .await
    }
}
