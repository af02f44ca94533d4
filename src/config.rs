use std::str::FromStr;

use serde::Deserialize;

use crate::store::Collection;

pub const DEFAULT_API_BASE: &str = "http://fajarseptianto.my.id/api/items";

/// How writes are put on the wire. The deployed store decides which one works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireEncoding {
    /// `application/x-www-form-urlencoded`, always POST, `_method` carries PATCH/DELETE.
    Form,
    /// JSON body with native PATCH/DELETE verbs.
    Json,
}

impl FromStr for WireEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "form" | "urlencoded" => Ok(Self::Form),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown wire encoding {other:?}, expected form or json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub users_url: String,
    pub inventory_url: String,
    pub items_url: String,
    pub cors_proxy: Option<String>,
    pub encoding: WireEncoding,
    pub cache_bust: bool,
    pub timeout_secs: u64,
}

impl StoreConfig {
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            users_url: format!("{}/{}", base, Collection::Users.path()),
            inventory_url: format!("{}/{}", base, Collection::Inventory.path()),
            items_url: format!("{}/{}", base, Collection::Items.path()),
            cors_proxy: None,
            encoding: WireEncoding::Form,
            cache_bust: true,
            timeout_secs: 30,
        }
    }

    pub fn url_for(&self, collection: Collection) -> &str {
        match collection {
            Collection::Users => &self.users_url,
            Collection::Inventory => &self.inventory_url,
            Collection::Items => &self.items_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base = std::env::var("PANTRY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());
        let mut store = StoreConfig::with_base(&base);

        if let Ok(v) = std::env::var("PANTRY_USERS_URL") {
            store.users_url = v;
        }
        if let Ok(v) = std::env::var("PANTRY_INVENTORY_URL") {
            store.inventory_url = v;
        }
        if let Ok(v) = std::env::var("PANTRY_ITEMS_URL") {
            store.items_url = v;
        }
        store.cors_proxy = std::env::var("PANTRY_CORS_PROXY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        if let Ok(v) = std::env::var("PANTRY_WIRE_ENCODING") {
            store.encoding = v.parse()?;
        }
        store.cache_bust = std::env::var("PANTRY_CACHE_BUST")
            .ok()
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);
        store.timeout_secs = std::env::var("PANTRY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self { store })
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn base_url_expands_to_collections() {
        let cfg = StoreConfig::with_base("http://localhost:8000/api/items/");
        assert_eq!(cfg.url_for(Collection::Users), "http://localhost:8000/api/items/users");
        assert_eq!(
            cfg.url_for(Collection::Inventory),
            "http://localhost:8000/api/items/inventory"
        );
        assert_eq!(cfg.url_for(Collection::Items), "http://localhost:8000/api/items/item");
        assert_eq!(cfg.encoding, WireEncoding::Form);
    }

    #[test]
    fn parses_wire_encoding() {
        assert_eq!("json".parse::<WireEncoding>().unwrap(), WireEncoding::Json);
        assert_eq!(" FORM ".parse::<WireEncoding>().unwrap(), WireEncoding::Form);
        assert!("xml".parse::<WireEncoding>().is_err());
    }
}
