use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, error, instrument};

use super::{Collection, Envelope, Fields, StoreClient};
use crate::config::{StoreConfig, WireEncoding};
use crate::error::StoreError;

/// Remote item store over HTTP, speaking whichever write encoding is configured.
#[derive(Clone)]
pub struct HttpStore {
    client: Client,
    config: StoreConfig,
}

impl HttpStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| StoreError::Transport {
                url: String::new(),
                source,
            })?;
        Ok(Self { client, config })
    }

    fn url(&self, collection: Collection, id: Option<u64>) -> String {
        let base = self.config.url_for(collection).trim_end_matches('/');
        let target = match id {
            Some(id) => format!("{}/{}", base, id),
            None => base.to_string(),
        };
        match &self.config.cors_proxy {
            Some(proxy) => format!("{}{}", proxy, target),
            None => target,
        }
    }

    fn list_url(&self, collection: Collection) -> String {
        let url = self.url(collection, None);
        if !self.config.cache_bust {
            return url;
        }
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        format!("{}?_={}", url, millis)
    }

    /// Builds a write request. Form encoding always POSTs and tunnels the
    /// real verb through `_method`.
    fn write(&self, method: Method, url: &str, body: Option<Fields>) -> RequestBuilder {
        match self.config.encoding {
            WireEncoding::Form => {
                let mut pairs = body.map(form_pairs).unwrap_or_default();
                if method != Method::POST {
                    pairs.push(("_method".to_string(), method.as_str().to_string()));
                }
                self.client.post(url).form(&pairs)
            }
            WireEncoding::Json => {
                let req = self.client.request(method, url);
                match body {
                    Some(fields) => req.json(&fields),
                    None => req.header(reqwest::header::CONTENT_TYPE, "application/json"),
                }
            }
        }
    }

    async fn send(&self, url: &str, req: RequestBuilder) -> Result<Envelope, StoreError> {
        let res = req.send().await.map_err(|source| {
            error!(error = %source, url, "store request failed");
            StoreError::Transport {
                url: url.to_string(),
                source,
            }
        })?;
        read_envelope(url, res).await
    }
}

async fn read_envelope(url: &str, res: Response) -> Result<Envelope, StoreError> {
    let status = res.status();
    let text = res.text().await.map_err(|source| StoreError::Transport {
        url: url.to_string(),
        source,
    })?;
    let body: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    if !status.is_success() {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| body.as_str().map(str::to_owned))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        error!(%status, url, message = %message, "store rejected request");
        return Err(StoreError::Status {
            status: status.as_u16(),
            message,
        });
    }

    debug!(%status, url, "store response");
    Ok(Envelope::from_body(body))
}

/// Flattens a JSON body into form fields.
pub fn form_pairs(fields: Fields) -> Vec<(String, String)> {
    fields
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::Null => String::new(),
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            };
            (k, v)
        })
        .collect()
}

#[async_trait]
impl StoreClient for HttpStore {
    #[instrument(skip(self))]
    async fn list(&self, collection: Collection) -> Result<Envelope, StoreError> {
        let url = self.list_url(collection);
        let req = self.client.get(&url);
        self.send(&url, req).await
    }

    #[instrument(skip(self, body))]
    async fn create(&self, collection: Collection, body: Fields) -> Result<Envelope, StoreError> {
        let url = self.url(collection, None);
        let req = self.write(Method::POST, &url, Some(body));
        self.send(&url, req).await
    }

    #[instrument(skip(self, body))]
    async fn update(
        &self,
        collection: Collection,
        id: u64,
        body: Fields,
    ) -> Result<Envelope, StoreError> {
        let url = self.url(collection, Some(id));
        let req = self.write(Method::PATCH, &url, Some(body));
        self.send(&url, req).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: Collection, id: u64) -> Result<Envelope, StoreError> {
        let url = self.url(collection, Some(id));
        let req = self.write(Method::DELETE, &url, None);
        self.send(&url, req).await
    }
}

#[cfg(test)]
mod http_tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Bytes,
        extract::{Path, State},
        http::{HeaderMap, Method as AxumMethod, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone)]
    struct Seen {
        method: String,
        path: String,
        content_type: String,
        body: String,
    }

    type Log = Arc<Mutex<Vec<Seen>>>;

    async fn record(
        State(log): State<Log>,
        method: AxumMethod,
        headers: HeaderMap,
        uri: axum::http::Uri,
        body: Bytes,
    ) -> Json<Value> {
        log.lock().unwrap().push(Seen {
            method: method.to_string(),
            path: uri.path().to_string(),
            content_type: headers
                .get(axum::http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string(),
            body: String::from_utf8_lossy(&body).to_string(),
        });
        Json(json!({
            "message": "ok",
            "data": { "id": 5, "name": "Beras", "weight": "2.00", "unit": "kilogram", "price": "28000" }
        }))
    }

    async fn list_items() -> Json<Value> {
        Json(json!({ "message": "ok", "data": [{ "id": 1 }, { "id": 2 }] }))
    }

    async fn broken(Path(_id): Path<u64>) -> (StatusCode, Json<Value>) {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "The name field is required." })),
        )
    }

    async fn spawn() -> (String, Log) {
        let log: Log = Arc::default();
        let app = Router::new()
            .route("/api/items/item", get(list_items).post(record))
            .route(
                "/api/items/item/:id",
                post(record).patch(record).delete(record),
            )
            .route("/api/items/inventory/:id", post(broken))
            .with_state(log.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/api/items", addr), log)
    }

    fn store(base: &str, encoding: WireEncoding) -> HttpStore {
        let mut cfg = StoreConfig::with_base(base);
        cfg.encoding = encoding;
        HttpStore::new(cfg).unwrap()
    }

    fn fields() -> Fields {
        let mut f = Fields::new();
        f.insert("name".into(), json!("Beras"));
        f.insert("weight".into(), json!(2.5));
        f
    }

    fn parse_form(body: &str) -> HashMap<String, String> {
        body.split('&')
            .filter_map(|kv| kv.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn form_update_posts_with_method_override() {
        let (base, log) = spawn().await;
        let st = store(&base, WireEncoding::Form);

        let env = st.update(Collection::Items, 5, fields()).await.unwrap();
        assert_eq!(env.message.as_deref(), Some("ok"));

        let seen = log.lock().unwrap()[0].clone();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.path, "/api/items/item/5");
        assert!(seen.content_type.starts_with("application/x-www-form-urlencoded"));
        let form = parse_form(&seen.body);
        assert_eq!(form["_method"], "PATCH");
        assert_eq!(form["name"], "Beras");
        assert_eq!(form["weight"], "2.5");
    }

    #[tokio::test]
    async fn form_delete_posts_only_method_override() {
        let (base, log) = spawn().await;
        let st = store(&base, WireEncoding::Form);

        st.delete(Collection::Items, 7).await.unwrap();

        let seen = log.lock().unwrap()[0].clone();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.path, "/api/items/item/7");
        assert_eq!(seen.body, "_method=DELETE");
    }

    #[tokio::test]
    async fn form_create_has_no_override() {
        let (base, log) = spawn().await;
        let st = store(&base, WireEncoding::Form);

        st.create(Collection::Items, fields()).await.unwrap();

        let seen = log.lock().unwrap()[0].clone();
        assert_eq!(seen.path, "/api/items/item");
        assert!(!parse_form(&seen.body).contains_key("_method"));
    }

    #[tokio::test]
    async fn json_uses_native_verbs() {
        let (base, log) = spawn().await;
        let st = store(&base, WireEncoding::Json);

        st.update(Collection::Items, 5, fields()).await.unwrap();
        st.delete(Collection::Items, 5).await.unwrap();
        st.create(Collection::Items, fields()).await.unwrap();

        let seen = log.lock().unwrap().clone();
        assert_eq!(seen[0].method, "PATCH");
        assert!(seen[0].content_type.starts_with("application/json"));
        let body: Value = serde_json::from_str(&seen[0].body).unwrap();
        assert_eq!(body, json!({ "name": "Beras", "weight": 2.5 }));
        assert_eq!(seen[1].method, "DELETE");
        assert_eq!(seen[1].path, "/api/items/item/5");
        assert_eq!(seen[2].method, "POST");
        assert_eq!(seen[2].path, "/api/items/item");
        assert!(seen[2].content_type.starts_with("application/json"));
        let body: Value = serde_json::from_str(&seen[2].body).unwrap();
        assert_eq!(body, json!({ "name": "Beras", "weight": 2.5 }));
    }

    #[tokio::test]
    async fn list_appends_cache_buster_and_unwraps_data() {
        let (base, _log) = spawn().await;
        let st = store(&base, WireEncoding::Form);

        assert!(st.list_url(Collection::Items).contains("/api/items/item?_="));
        let env = st.list(Collection::Items).await.unwrap();
        assert_eq!(env.data, json!([{ "id": 1 }, { "id": 2 }]));
    }

    #[tokio::test]
    async fn error_status_carries_store_message() {
        let (base, _log) = spawn().await;
        let st = store(&base, WireEncoding::Form);

        let err = st
            .update(Collection::Inventory, 3, fields())
            .await
            .unwrap_err();
        match err {
            StoreError::Status { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "The name field is required.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_store_is_transport_error() {
        let st = store("http://127.0.0.1:9/api/items", WireEncoding::Json);
        let err = st.list(Collection::Users).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport { .. }));
    }

    #[test]
    fn proxy_prefixes_target_url() {
        let mut cfg = StoreConfig::with_base("http://example.test/api/items");
        cfg.cors_proxy = Some("https://proxy.test/?quest=".into());
        let st = HttpStore::new(cfg).unwrap();
        assert_eq!(
            st.url(Collection::Inventory, Some(3)),
            "https://proxy.test/?quest=http://example.test/api/items/inventory/3"
        );
    }

    #[test]
    fn form_pairs_flatten_values() {
        let mut f = Fields::new();
        f.insert("a".into(), json!(null));
        f.insert("b".into(), json!(true));
        f.insert("c".into(), json!(28000));
        f.insert("d".into(), json!("🍅"));
        let pairs: HashMap<_, _> = form_pairs(f).into_iter().collect();
        assert_eq!(pairs["a"], "");
        assert_eq!(pairs["b"], "true");
        assert_eq!(pairs["c"], "28000");
        assert_eq!(pairs["d"], "🍅");
    }
}
