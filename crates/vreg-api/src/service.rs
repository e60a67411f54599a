// ── Entity services ──
//
// `EntityService` is the seam between the state controllers and the HTTP
// boundary. `RestService<R>` implements it once for every `Resource`, so the
// three registry collections share one request/response path.

use std::future::Future;
use std::marker::PhantomData;

use crate::body::{create_body, update_body};
use crate::client::RegistryClient;
use crate::error::Error;
use crate::model::{Driver, Entity, Resource, Vehicle, VehicleLog};
use crate::query::ListQuery;

/// Key type of a service's entity.
pub type KeyOf<S> = <<S as EntityService>::Entity as Entity>::Key;

/// CRUD operations against one backend collection.
///
/// Every failure is classified (see [`crate::classify_error`]); nothing is
/// swallowed. No timeout is applied beyond the transport's own.
pub trait EntityService: Send + Sync + 'static {
    type Entity: Entity;
    type Create: Send + Sync + 'static;
    type Update: Send + Sync + 'static;
    type Filter: Send + Sync + 'static;

    /// Create a record; returns the server-canonical form.
    fn create(
        &self,
        body: &Self::Create,
    ) -> impl Future<Output = Result<Self::Entity, Error>> + Send;

    fn get_by_id(
        &self,
        key: &KeyOf<Self>,
    ) -> impl Future<Output = Result<Self::Entity, Error>> + Send;

    /// List records in server order.
    fn list(
        &self,
        query: &ListQuery<Self::Filter>,
    ) -> impl Future<Output = Result<Vec<Self::Entity>, Error>> + Send;

    /// Update a record; returns the server-canonical form.
    fn update(
        &self,
        key: &KeyOf<Self>,
        body: &Self::Update,
    ) -> impl Future<Output = Result<Self::Entity, Error>> + Send;

    fn delete(&self, key: &KeyOf<Self>) -> impl Future<Output = Result<(), Error>> + Send;
}

// ── REST implementation ─────────────────────────────────────────────

/// [`EntityService`] backed by the `/{R::PATH}` collection.
pub struct RestService<R> {
    client: RegistryClient,
    _resource: PhantomData<fn() -> R>,
}

pub type VehicleService = RestService<Vehicle>;
pub type DriverService = RestService<Driver>;
pub type VehicleLogService = RestService<VehicleLog>;

impl<R: Resource> RestService<R> {
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &RegistryClient {
        &self.client
    }
}

impl<R> Clone for RestService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> EntityService for RestService<R> {
    type Entity = R;
    type Create = R::Create;
    type Update = R::Update;
    type Filter = R::Filter;

    async fn create(&self, body: &R::Create) -> Result<R, Error> {
        let url = self.client.resource_url(&[R::PATH])?;
        self.client.post(url, &create_body(body)?).await
    }

    async fn get_by_id(&self, key: &R::Key) -> Result<R, Error> {
        let key = key.to_string();
        let url = self.client.resource_url(&[R::PATH, key.as_str()])?;
        self.client.get(url).await
    }

    async fn list(&self, query: &ListQuery<R::Filter>) -> Result<Vec<R>, Error> {
        let url = self.client.resource_url(&[R::PATH])?;
        self.client.get_with_params(url, &query.to_params()).await
    }

    async fn update(&self, key: &R::Key, body: &R::Update) -> Result<R, Error> {
        let key = key.to_string();
        let url = self.client.resource_url(&[R::PATH, key.as_str()])?;
        self.client.put(url, &update_body(body)?).await
    }

    async fn delete(&self, key: &R::Key) -> Result<(), Error> {
        let key = key.to_string();
        let url = self.client.resource_url(&[R::PATH, key.as_str()])?;
        self.client.delete(url).await
    }
}
