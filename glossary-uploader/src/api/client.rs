//! Typed client for catalog entities
//!
//! Operations are generic over [`Entity`] and [`Payload`] types; the URL
//! suffix for each type comes from the static route table and the response
//! type of a write comes from [`Payload::Response`].

use std::sync::Arc;

use futures::stream::{self, Stream, TryStreamExt};
use log::{debug, error, info};
use serde_json::Value;

use super::auth::{AuthProvider, StaticTokenProvider};
use super::error::ApiError;
use super::models::{Entity, EntityList, EntityReference, Payload, Resource};
use super::resilience::ResilienceConfig;
use super::rest::{ClientConfig, Outcome, RestClient};
use super::routes::{self, RouteRole};
use crate::config::ServerConnection;
use crate::logging;

const VERSION_PATH: &str = "/system/version";

/// Options for listing a collection
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Extra fields to include in each entity
    pub fields: Vec<String>,
    /// Pagination cursor returned by the previous page
    pub after: Option<String>,
    /// Page size
    pub limit: u32,
    /// Extra query filters, e.g. `glossary=<name>`
    pub params: Vec<(String, String)>,
    /// Log and drop entities that fail to decode instead of failing the page
    pub skip_on_failure: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            after: None,
            limit: 100,
            params: Vec::new(),
            skip_on_failure: false,
        }
    }
}

impl ListOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn skip_on_failure(mut self, skip: bool) -> Self {
        self.skip_on_failure = skip;
        self
    }
}

/// Where the next page of a full listing starts
enum PageCursor {
    Start,
    After(String),
    Done,
}

/// Typed client over the catalog REST API
pub struct CatalogClient {
    rest: RestClient,
    connection: ServerConnection,
    log_target: &'static str,
}

impl CatalogClient {
    /// Build a client without contacting the server
    pub fn new(
        connection: ServerConnection,
        resilience: ResilienceConfig,
    ) -> Result<Self, ApiError> {
        let auth = connection.jwt_token.as_deref().map(|token| {
            Arc::new(StaticTokenProvider::create(token)) as Arc<dyn AuthProvider>
        });

        let mut config = ClientConfig::new(connection.host_port.clone());
        config.api_version = connection.api_version.clone();
        config.extra_headers = connection.extra_headers.clone().unwrap_or_default();
        config.resilience = resilience;

        let rest = RestClient::new(config, auth)?.with_log_target(logging::REST);

        Ok(Self {
            rest,
            connection,
            log_target: logging::REST,
        })
    }

    /// Build a client and, when version validation is enabled, make sure the
    /// server answers its version endpoint
    pub async fn connect(
        connection: ServerConnection,
        resilience: ResilienceConfig,
    ) -> Result<Self, ApiError> {
        let client = Self::new(connection, resilience)?;
        if client.connection.enable_version_validation && !client.health_check().await? {
            return Err(ApiError::ServerUnavailable {
                host: client.connection.host_port.clone(),
            });
        }
        Ok(client)
    }

    pub fn connection(&self) -> &ServerConnection {
        &self.connection
    }

    /// URL suffix registered for `T`
    pub fn get_suffix<T: Resource>() -> Result<&'static str, ApiError> {
        routes::lookup(T::TYPE_NAME).map(|route| route.suffix)
    }

    /// POST a create request
    pub async fn create<P: Payload>(&self, data: &P) -> Result<P::Response, ApiError> {
        self.write(data, WriteMethod::Post).await
    }

    /// PUT a create request; the server creates or updates by name
    pub async fn create_or_update<P: Payload>(&self, data: &P) -> Result<P::Response, ApiError> {
        self.write(data, WriteMethod::Put).await
    }

    async fn write<P: Payload>(
        &self,
        data: &P,
        method: WriteMethod,
    ) -> Result<P::Response, ApiError> {
        let route = routes::lookup(P::TYPE_NAME)?;
        if route.role != RouteRole::Create {
            return Err(ApiError::InvalidOperation {
                method: method.as_str(),
                type_name: P::TYPE_NAME.to_string(),
            });
        }

        let body = serde_json::to_string(data).map_err(|e| {
            ApiError::Transport(format!("Failed to encode {}: {}", P::TYPE_NAME, e))
        })?;

        let outcome = match method {
            WriteMethod::Post => self.rest.post(route.suffix, Some(body)).await?,
            WriteMethod::Put => self.rest.put(route.suffix, Some(body)).await?,
        };
        let value = require_body(outcome, method.as_str(), route.suffix)?;
        decode::<P::Response>(value)
    }

    /// Fetch an entity by fully qualified name
    ///
    /// With `nullable`, a 404 yields `Ok(None)`; otherwise it is returned as
    /// an error.
    pub async fn get_by_name<T: Entity>(
        &self,
        fqn: &str,
        fields: &[&str],
        nullable: bool,
    ) -> Result<Option<T>, ApiError> {
        let path = format!("name/{}", urlencoding::encode(fqn));
        self.get_entity(&path, fields, nullable).await
    }

    /// Fetch an entity by id
    pub async fn get_by_id<T: Entity>(
        &self,
        id: &str,
        fields: &[&str],
        nullable: bool,
    ) -> Result<Option<T>, ApiError> {
        self.get_entity(id, fields, nullable).await
    }

    async fn get_entity<T: Entity>(
        &self,
        path: &str,
        fields: &[&str],
        nullable: bool,
    ) -> Result<Option<T>, ApiError> {
        let suffix = Self::get_suffix::<T>()?;
        let mut full_path = format!("{}/{}", suffix, path);
        if !fields.is_empty() {
            full_path.push_str("?fields=");
            full_path.push_str(&fields.join(","));
        }

        let outcome = match self.rest.get(&full_path, &[]).await {
            Ok(outcome) => outcome,
            Err(err) if nullable && err.is_not_found() => return Ok(None),
            Err(err) => {
                debug!(
                    target: self.log_target,
                    "GET {} for {}. Error {:?} - {}",
                    T::TYPE_NAME,
                    path,
                    err.status_code(),
                    err
                );
                return Err(err);
            }
        };

        let value = require_body(outcome, "GET", &full_path)?;
        decode::<T>(value).map(Some)
    }

    /// Look up an entity and describe it as a reference
    pub async fn get_entity_reference<T: Entity>(
        &self,
        fqn: &str,
    ) -> Result<Option<EntityReference>, ApiError> {
        match self.get_by_name::<T>(fqn, &[], true).await? {
            Some(instance) => Ok(Some(EntityReference {
                id: instance.id().to_string(),
                entity_type: T::ENTITY_TYPE.to_string(),
                name: None,
                fully_qualified_name: instance.fully_qualified_name().map(str::to_string),
                description: instance.description().map(str::to_string),
                href: instance.href().map(str::to_string),
            })),
            None => {
                debug!(target: self.log_target, "Cannot find the Entity {}", fqn);
                Ok(None)
            }
        }
    }

    /// Fetch one page of a collection
    pub async fn list_entities<T: Entity>(
        &self,
        options: &ListOptions,
    ) -> Result<EntityList<T>, ApiError> {
        let suffix = Self::get_suffix::<T>()?;
        let mut path = format!("{}?limit={}", suffix, options.limit);
        if let Some(after) = &options.after {
            path.push_str("&after=");
            path.push_str(&urlencoding::encode(after));
        }
        if !options.fields.is_empty() {
            path.push_str("&fields=");
            path.push_str(&options.fields.join(","));
        }

        let outcome = self.rest.get(&path, &options.params).await?;
        let mut body = require_body(outcome, "GET", &path)?;

        let data = match body.get_mut("data").map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        let mut entities = Vec::with_capacity(data.len());
        for item in data {
            match serde_json::from_value::<T>(item.clone()) {
                Ok(entity) => entities.push(entity),
                Err(err) if options.skip_on_failure => {
                    error!(
                        target: self.log_target,
                        "Error creating entity [{}]. Failed with exception {}",
                        T::TYPE_NAME,
                        err
                    );
                    debug!(
                        target: self.log_target,
                        "Can't create [{}] from [{}]. Skipping.",
                        T::TYPE_NAME,
                        item
                    );
                }
                Err(source) => {
                    return Err(ApiError::Decode {
                        type_name: T::TYPE_NAME,
                        source,
                    });
                }
            }
        }

        let paging = body.get("paging");
        let total = paging
            .and_then(|p| p.get("total"))
            .and_then(Value::as_u64)
            .unwrap_or(entities.len() as u64);
        let after = paging
            .and_then(|p| p.get("after"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(EntityList {
            entities,
            total,
            after,
        })
    }

    /// Lazily stream every entity of a collection, page by page
    ///
    /// Each call starts again from the first page.
    pub fn list_all_entities<'a, T: Entity + 'a>(
        &'a self,
        options: ListOptions,
    ) -> impl Stream<Item = Result<T, ApiError>> + 'a {
        stream::try_unfold(PageCursor::Start, move |cursor| {
            let options = options.clone();
            async move {
                let after = match cursor {
                    PageCursor::Done => return Ok(None),
                    PageCursor::Start => None,
                    PageCursor::After(after) => Some(after),
                };
                let page = self
                    .list_entities::<T>(&ListOptions { after, ..options })
                    .await?;
                let next = match page.after {
                    Some(after) => PageCursor::After(after),
                    None => PageCursor::Done,
                };
                let items = stream::iter(page.entities.into_iter().map(Ok::<T, ApiError>));
                Ok::<_, ApiError>(Some((items, next)))
            }
        })
        .try_flatten()
    }

    /// Delete an entity by id
    pub async fn delete<T: Entity>(
        &self,
        id: &str,
        recursive: bool,
        hard_delete: bool,
    ) -> Result<(), ApiError> {
        let path = format!(
            "{}/{}?recursive={}&hardDelete={}",
            Self::get_suffix::<T>()?,
            id,
            recursive,
            hard_delete
        );
        match self.rest.delete(&path).await? {
            Outcome::Body(_) | Outcome::Empty => Ok(()),
            Outcome::RetryExhausted { status } => Err(ApiError::RetriesExhausted {
                method: "DELETE",
                path,
                status,
            }),
            Outcome::TransportFailed(msg) => Err(ApiError::Transport(msg)),
        }
    }

    /// `true` when the server reports its version
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let outcome = self.rest.get(VERSION_PATH, &[]).await?;
        let version = outcome
            .into_body()
            .and_then(|body| body.get("version").and_then(Value::as_str).map(str::to_string));

        match version {
            Some(version) => {
                info!(target: self.log_target, "Server version: {}", version);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Release the HTTP session
    pub fn close(self) {
        self.rest.close();
    }
}

#[derive(Debug, Clone, Copy)]
enum WriteMethod {
    Post,
    Put,
}

impl WriteMethod {
    fn as_str(self) -> &'static str {
        match self {
            WriteMethod::Post => "POST",
            WriteMethod::Put => "PUT",
        }
    }
}

/// Turn a transport outcome into a JSON body, treating anything else as a
/// failure of the call
fn require_body(outcome: Outcome, method: &'static str, path: &str) -> Result<Value, ApiError> {
    match outcome {
        Outcome::Body(value) => Ok(value),
        Outcome::Empty => Err(ApiError::EmptyResponse {
            method,
            path: path.to_string(),
        }),
        Outcome::RetryExhausted { status } => Err(ApiError::RetriesExhausted {
            method,
            path: path.to_string(),
            status,
        }),
        Outcome::TransportFailed(msg) => Err(ApiError::Transport(msg)),
    }
}

fn decode<T: Entity>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        type_name: T::TYPE_NAME,
        source,
    })
}
