//! Core library for Cirrus.
//!
//! Holds the pieces of the media library that are independent of any HTTP
//! framework: upload signing and access to the hosted media provider.
#![allow(missing_docs)]

pub mod error;
pub mod provider;
pub mod signing;

pub use error::{ProviderError, ProviderResult, SignError};
pub use provider::{
    CloudinaryCredentials, CloudinaryProvider, DEFAULT_API_BASE,
    DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT, MediaProvider,
};
pub use signing::{SignatureAlgorithm, sign_params, string_to_sign};
