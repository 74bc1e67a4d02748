use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::model::{CreateNoteRequest, Note, UpdateNoteRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Blocking client for the notes REST API.
///
/// Only call this from worker threads; every method performs network I/O.
#[derive(Clone, Debug)]
pub struct NotesClient {
    base_url: String,
    http: Client,
}

impl NotesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_notes(&self) -> Result<Vec<Note>> {
        self.fetch(Method::GET, "/notes/")
    }

    pub fn get_note(&self, id: &str) -> Result<Note> {
        self.fetch(Method::GET, &format!("/notes/{id}"))
    }

    pub fn create_note(&self, request: &CreateNoteRequest) -> Result<Note> {
        let builder = self.request(Method::POST, "/notes/").json(request);
        self.send(builder, "POST", "/notes/")?
            .json()
            .context("invalid note JSON from create")
    }

    pub fn update_note(&self, id: &str, request: &UpdateNoteRequest) -> Result<Note> {
        let path = format!("/notes/{id}");
        let builder = self.request(Method::PUT, &path).json(request);
        self.send(builder, "PUT", &path)?
            .json()
            .context("invalid note JSON from update")
    }

    pub fn delete_note(&self, id: &str) -> Result<()> {
        self.execute(Method::DELETE, &format!("/notes/{id}"))
    }

    pub fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        let limit = DEFAULT_SEARCH_LIMIT.to_string();
        let builder = self
            .request(Method::GET, "/notes/search/")
            .query(&[("q", query), ("limit", limit.as_str())]);
        self.send(builder, "GET", "/notes/search/")?
            .json()
            .context("invalid search results JSON")
    }

    pub fn related_notes(&self, id: &str) -> Result<Vec<Note>> {
        self.fetch(Method::GET, &format!("/notes/{id}/related"))
    }

    pub fn linked_notes(&self, id: &str) -> Result<Vec<Note>> {
        self.fetch(Method::GET, &format!("/notes/{id}/links"))
    }

    pub fn remove_link(&self, source_id: &str, target_id: &str) -> Result<()> {
        self.execute(Method::DELETE, &format!("/notes/{source_id}/link/{target_id}"))
    }

    pub fn auto_link(&self, id: &str) -> Result<Vec<Note>> {
        self.fetch(Method::POST, &format!("/notes/{id}/auto-link"))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    fn fetch<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
        let label = method.to_string();
        self.send(self.request(method, path), &label, path)?
            .json()
            .with_context(|| format!("invalid JSON from {label} {path}"))
    }

    fn execute(&self, method: Method, path: &str) -> Result<()> {
        let label = method.to_string();
        self.send(self.request(method, path), &label, path)
            .map(|_| ())
    }

    fn send(&self, builder: RequestBuilder, method: &str, path: &str) -> Result<Response> {
        debug!("event=api_request method={method} path={path}");
        let response = builder
            .send()
            .with_context(|| format!("request {method} {path} failed"))
            .inspect_err(|error| warn!("event=api_error method={method} path={path} error={error:#}"))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            warn!("event=api_error method={method} path={path} status={status}");
            Err(anyhow!("{method} {path} returned HTTP {status}"))
        }
    }
}
