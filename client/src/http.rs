//! [`RecordStore`] over the list service's REST API.

use crate::config::{ConfigError, StoreConfig};
use crate::wire::{self, Collection, CreatedItem, ErrorBody, ItemBody, ListItem, Single};
use carousel_engine::{
    error::Result, Error, ListQuery, NewRecord, Record, RecordFields, RecordId, RecordStore,
};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

/// Accept header asking for the lean JSON shape.
const ODATA_JSON: &str = "application/json;odata=nometadata";

/// Header overriding the method of a POST.
const X_HTTP_METHOD: &str = "X-HTTP-Method";

/// Store client for one site.
///
/// Cheap to clone: clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: Client,
    site_url: Url,
    access_token: Option<String>,
}

impl HttpStore {
    /// Build a client from configuration.
    pub fn init(config: StoreConfig) -> std::result::Result<Self, ConfigError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        tracing::info!(site = %config.site_url, "Store client initialized");

        Ok(Self {
            http,
            site_url: config.site_url,
            access_token: config.access_token,
        })
    }

    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    /// `{site}/_api/web/lists/GetByTitle('{list}')/items`
    pub fn items_url(&self, list: &str) -> Result<Url> {
        self.list_url(list, "items")
    }

    /// `{site}/_api/web/lists/GetByTitle('{list}')/items({id})`
    pub fn item_url(&self, list: &str, id: RecordId) -> Result<Url> {
        self.list_url(list, &format!("items({id})"))
    }

    fn list_url(&self, list: &str, tail: &str) -> Result<Url> {
        let title = by_title(list);
        let mut url = self.site_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Transport(format!("site url cannot be a base: {}", self.site_url)))?
            .pop_if_empty()
            .extend(["_api", "web", "lists", title.as_str(), tail]);
        Ok(url)
    }

    /// Attach common headers, send, and turn non-success statuses into
    /// [`Error::StoreRejection`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.header(ACCEPT, HeaderValue::from_static(ODATA_JSON));
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(from_reqwest)?;
        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "Store responded");

        if status.is_success() {
            Ok(response)
        } else {
            Err(rejection(response).await)
        }
    }

    /// POST to an item with a method override, as the list API expects for
    /// merges and deletes.
    fn item_request(&self, url: Url, method: &'static str) -> RequestBuilder {
        self.http
            .post(url)
            .header(X_HTTP_METHOD, method)
            .header("IF-MATCH", "*")
    }
}

/// `GetByTitle('...')` segment, with quotes doubled as OData requires.
fn by_title(list: &str) -> String {
    format!("GetByTitle('{}')", list.replace('\'', "''"))
}

fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_decode() {
        Error::InvalidPayload(e.to_string())
    } else {
        Error::Transport(e.to_string())
    }
}

async fn rejection(response: Response) -> Error {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => match body.details {
            Some(details) => format!("{}: {}", body.error, details),
            None => body.error,
        },
        Err(_) if !text.is_empty() => text,
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    tracing::warn!(status = status.as_u16(), %message, "Store rejected request");
    Error::rejection(status.as_u16(), message)
}

impl RecordStore for HttpStore {
    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Record>> {
        let mut url = self.items_url(collection)?;
        {
            let mut pairs = url.query_pairs_mut();
            if !query.select.is_empty() {
                let select: Vec<_> = query.select.iter().map(|f| wire::column(*f)).collect();
                pairs.append_pair("$select", &select.join(","));
            }
            if let Some(field) = query.order_by {
                pairs.append_pair("$orderby", wire::column(field));
            }
        }

        let response = self.send(self.http.get(url)).await?;
        let items: Collection<ListItem> = response.json().await.map_err(from_reqwest)?;
        items
            .into_items()
            .into_iter()
            .map(Record::try_from)
            .collect()
    }

    async fn add(&self, collection: &str, body: &NewRecord) -> Result<RecordId> {
        let url = self.items_url(collection)?;
        let response = self
            .send(self.http.post(url).json(&ItemBody::from(body)))
            .await?;
        let created: Single<CreatedItem> = response.json().await.map_err(from_reqwest)?;
        created.into_inner().id.get()
    }

    async fn update(&self, collection: &str, id: RecordId, fields: &RecordFields) -> Result<()> {
        let url = self.item_url(collection, id)?;
        let request = self.item_request(url, "MERGE").json(&ItemBody::from(fields));
        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: RecordId) -> Result<()> {
        let url = self.item_url(collection, id)?;
        self.send(self.item_request(url, "DELETE")).await?;
        Ok(())
    }
}
