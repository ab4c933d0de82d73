//! Webhook layer for delivering payloads over HTTP.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`], [`ClientFactory`])
//! - Transport selection ([`TlsMode`], [`TransportConfig`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - One-shot delivery with response classification ([`deliver`])

mod client;
mod delivery;
mod error;
mod http;


pub use client::{ClientFactory, ReqwestClient, ReqwestFactory, TlsMode, TransportConfig};
pub use delivery::{CONTENT_TYPE_JSON, WebhookTarget, classify, deliver};
pub use error::{DeliveryError, HttpError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
