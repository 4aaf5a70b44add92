//! One-shot loader for the players payload.

use crate::utils::js_error_message;
use crate::PlayerRecord;
use log::{error, info};
use std::fmt;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The request never produced a response.
    Network(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The body was not a JSON array of player objects.
    Decode(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "Could not reach the players endpoint: {}", msg),
            LoadError::Status(code) => write!(f, "Players endpoint answered with HTTP {}", code),
            LoadError::Decode(msg) => write!(f, "Players data is malformed: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

/// Decode the endpoint body into player records.
pub fn parse_players(body: &str) -> Result<Vec<PlayerRecord>, LoadError> {
    serde_json::from_str(body).map_err(|e| LoadError::Decode(e.to_string()))
}

/// Fetch and decode the players collection from `url`.
pub async fn fetch_players(url: &str) -> Result<Vec<PlayerRecord>, LoadError> {
    info!("Fetching players from {}", url);

    let result = async {
        let window = gloo_utils::window();
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| LoadError::Network(js_error_message(&e)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| LoadError::Network("fetch did not return a Response".to_string()))?;

        if !response.ok() {
            return Err(LoadError::Status(response.status()));
        }

        let text_promise = response
            .text()
            .map_err(|e| LoadError::Network(js_error_message(&e)))?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(|e| LoadError::Network(js_error_message(&e)))?
            .as_string()
            .ok_or_else(|| LoadError::Decode("response body is not text".to_string()))?;

        parse_players(&body)
    }
    .await;

    match &result {
        Ok(players) => info!("Loaded {} players", players.len()),
        Err(err) => error!("Loading players failed: {}", err),
    }
    result
}
