// Route endpoints of the Admin API.
//
// Paths are built verbatim; ids are not escaped.

use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{RouteListResponse, RouteValue, route_from_envelope, route_from_mutation};

impl ApiClient {
    /// `GET /routes?page={page}&page_size={page_size}`
    pub async fn list_routes(&self, page: u32, page_size: u32) -> Result<RouteListResponse, Error> {
        let body: Option<Value> = self
            .get(&format!("/routes?page={page}&page_size={page_size}"))
            .await?;
        RouteListResponse::from_body(body)
    }

    /// `GET /routes/{id}`, unwrapping the `{ value }` envelope.
    pub async fn get_route(&self, id: &str) -> Result<RouteValue, Error> {
        let body: Option<Value> = self.get(&format!("/routes/{id}")).await?;
        route_from_envelope(body)
    }

    /// `POST /routes`; the server assigns the id.
    pub async fn post_route<B: Serialize + ?Sized>(
        &self,
        payload: &B,
    ) -> Result<Option<RouteValue>, Error> {
        let body: Option<Value> = self.post("/routes", payload).await?;
        route_from_mutation(body)
    }

    /// `PUT /routes/{id}`: creates the route under `id` or replaces it.
    pub async fn put_route<B: Serialize + ?Sized>(
        &self,
        id: &str,
        payload: &B,
    ) -> Result<Option<RouteValue>, Error> {
        let body: Option<Value> = self.put(&format!("/routes/{id}"), payload).await?;
        route_from_mutation(body)
    }

    /// `DELETE /routes/{id}`. Any response body is ignored.
    pub async fn delete_route(&self, id: &str) -> Result<(), Error> {
        let _: Option<Value> = self.delete(&format!("/routes/{id}")).await?;
        Ok(())
    }
}
