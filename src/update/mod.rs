//! Release update check.
//!
//! This module provides types and traits for:
//! - Building HTTP requests and responses ([`HttpRequest`], [`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`], [`ReqwestClient`])
//! - Comparing this build with the latest release ([`UpdateChecker`])

mod checker;
mod client;
mod error;
mod http;

pub use checker::{
    CURRENT_VERSION, DEFAULT_RELEASES_API_URL, DEFAULT_UPDATE_TIMEOUT, RELEASES_PAGE_URL,
    UpdateChecker, UpdateStatus, compare_versions,
};
pub use client::ReqwestClient;
pub use error::{HttpError, UpdateError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
