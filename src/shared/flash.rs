//! One-shot messages shown on the page a redirect lands on.
//!
//! The message travels in a short-lived cookie signed with the process
//! secret: `base64url(json).hex(hmac_sha256(secret, base64url(json)))`.
//! Cookies that fail verification are ignored and cleared.

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use base64::prelude::*;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::shared::constants::{FLASH_COOKIE_MAX_AGE_SECS, FLASH_COOKIE_NAME};

type HmacSha256 = Hmac<Sha256>;

/// Visual category of a flash message (maps to a CSS class in templates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub message: String,
}

impl FlashMessage {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Flash state read from an incoming request
#[derive(Debug, Default)]
pub struct IncomingFlash {
    pub message: Option<FlashMessage>,
    cookie_present: bool,
}

impl IncomingFlash {
    /// Finish a page response, clearing the flash cookie if one was sent
    pub fn finish(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.cookie_present {
            response
                .headers_mut()
                .append(header::SET_COOKIE, clear_cookie_header());
        }
        response
    }
}

/// Signs and verifies flash cookies
pub struct FlashSigner {
    key: Vec<u8>,
}

impl FlashSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> Option<HmacSha256> {
        HmacSha256::new_from_slice(&self.key).ok()
    }

    /// Encode a message into a signed cookie value
    pub fn encode(&self, flash: &FlashMessage) -> Option<String> {
        let json = serde_json::to_vec(flash).ok()?;
        let payload = BASE64_URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Some(format!("{}.{}", payload, signature))
    }

    /// Decode a signed cookie value, rejecting anything with a bad signature
    pub fn decode(&self, value: &str) -> Option<FlashMessage> {
        let (payload, signature) = value.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let json = BASE64_URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// `303 See Other` to `to`, carrying `flash` for the next page
    pub fn redirect(&self, to: &str, flash: FlashMessage) -> Response {
        let cookie = self.encode(&flash).and_then(|value| {
            HeaderValue::from_str(&format!(
                "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
                FLASH_COOKIE_NAME, value, FLASH_COOKIE_MAX_AGE_SECS
            ))
            .ok()
        });

        match cookie {
            Some(cookie) => {
                (AppendHeaders([(header::SET_COOKIE, cookie)]), Redirect::to(to)).into_response()
            }
            None => {
                tracing::warn!("Failed to encode flash message, redirecting without it");
                Redirect::to(to).into_response()
            }
        }
    }

    /// Read the flash cookie from request headers
    pub fn take(&self, headers: &HeaderMap) -> IncomingFlash {
        match find_cookie(headers, FLASH_COOKIE_NAME) {
            Some(value) => IncomingFlash {
                message: self.decode(&value),
                cookie_present: true,
            },
            None => IncomingFlash::default(),
        }
    }
}

fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn clear_cookie_header() -> HeaderValue {
    HeaderValue::from_static("takasmart_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}
