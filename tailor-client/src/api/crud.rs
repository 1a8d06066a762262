//! List, get, create, update and delete for one resource.
//!
//! # Example
//!
//! ```ignore
//! let service = client.leaves();
//! let pending = service.list().await?;
//! let saved = service.update(&request.id, &request).await?;
//! service.delete(&saved.id).await?;
//! ```

use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::envelope::Envelope;
use crate::TailorClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Entity;

/// Typed CRUD calls against `{base}/{E::RESOURCE}`.
///
/// Owns a client handle, so futures from a service are `'static` and can be
/// spawned.
pub struct Service<E> {
    client: TailorClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Service<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Service<E> {
    pub(crate) fn new(client: TailorClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    /// `GET {base}/{resource}`
    pub async fn list(&self) -> Result<Vec<E>, Error> {
        let url = self.client.endpoint(E::RESOURCE, None)?;
        let response = self.client.request(Method::GET, url, None).await?;
        decode(response).await
    }

    /// `GET {base}/{resource}/{id}`
    pub async fn get(&self, id: &str) -> Result<E, Error> {
        let url = self.client.endpoint(E::RESOURCE, Some(id))?;
        let response = self.client.request(Method::GET, url, None).await?;
        decode(response).await
    }

    /// `POST {base}/{resource}`, returning the stored record.
    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> Result<E, Error> {
        let url = self.client.endpoint(E::RESOURCE, None)?;
        let body = serde_json::to_string(payload)?;
        let response = self.client.request(Method::POST, url, Some(body)).await?;
        decode(response).await
    }

    /// `PUT {base}/{resource}/{id}`, returning the stored record.
    pub async fn update<P: Serialize + ?Sized>(&self, id: &str, payload: &P) -> Result<E, Error> {
        let url = self.client.endpoint(E::RESOURCE, Some(id))?;
        let body = serde_json::to_string(payload)?;
        let response = self.client.request(Method::PUT, url, Some(body)).await?;
        decode(response).await
    }

    /// `DELETE {base}/{resource}/{id}`. Any response body is ignored.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let url = self.client.endpoint(E::RESOURCE, Some(id))?;
        self.client.request(Method::DELETE, url, None).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
    let body = response.text().await.map_err(ApiError::Network)?;
    serde_json::from_str::<Envelope<T>>(&body)
        .map(Envelope::into_inner)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
}
