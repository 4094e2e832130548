//! `ProductsApi` over HTTP/JSON.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use prodboard_core::ProductId;
use prodboard_products::{CreateProductDto, Product, UpdateProductDto};

use super::{ApiError, ProductsApi};

/// Client for the catalog endpoints under `{base_url}/products`.
#[derive(Debug, Clone)]
pub struct HttpProductsApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Error body returned by the API: `{ "error": code, "message": text }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    message: String,
}

impl HttpProductsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn item_url(&self, id: ProductId) -> String {
        format!("{}/products/{}", self.base_url, id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self.client.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(resp).await
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => {
            tracing::debug!("API rejected request with code {:?}", parsed.error);
            parsed.message
        }
        Err(_) => body,
    };

    Err(match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(message),
        _ => ApiError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl ProductsApi for HttpProductsApi {
    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.collection_url();
        tracing::debug!("GET {}", url);
        self.send_json(self.request(Method::GET, &url)).await
    }

    async fn create(&self, dto: &CreateProductDto) -> Result<Product, ApiError> {
        let url = self.collection_url();
        tracing::debug!("POST {}", url);
        self.send_json(self.request(Method::POST, &url).json(dto)).await
    }

    async fn update(&self, id: ProductId, dto: &UpdateProductDto) -> Result<Product, ApiError> {
        let url = self.item_url(id);
        tracing::debug!("PUT {}", url);
        self.send_json(self.request(Method::PUT, &url).json(dto)).await
    }

    async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        let url = self.item_url(id);
        tracing::debug!("DELETE {}", url);
        self.send(self.request(Method::DELETE, &url)).await?;
        Ok(())
    }
}
