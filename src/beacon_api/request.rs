use serde::Serialize;
use std::fmt::Display;

use super::error::ApiError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    Get,
    Post,
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Query parameters in insertion order. Optional filters are added one key at a time, an
/// absent filter simply never makes it in.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Query(Vec<(&'static str, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl Display) -> &mut Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn push_opt(&mut self, key: &'static str, value: Option<impl Display>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// One call against a beacon node, built fresh for every request.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Query,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::get_with_query(path, Query::new())
    }

    pub fn get_with_query(path: impl Into<String>, query: Query) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query,
            body: None,
        }
    }

    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            query: Query::new(),
            body: Some(body),
        })
    }
}
