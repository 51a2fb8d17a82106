//! JWT validation and issuance.
//!
//! [`Validator`] runs the strict parse → admit → resolve → verify →
//! decode → validate pipeline over a compact token; [`Issuer`] assembles
//! and signs tokens. Both are state-free services: configuration, key
//! store and codecs are injected once at construction, and concurrent
//! calls are independent.
//!
//! # HTTP middleware contract
//!
//! This crate deliberately ships no framework adapter. A conforming
//! middleware extracts `Authorization: Bearer <token>`, responds
//! `401 Unauthorized` with `WWW-Authenticate: Bearer realm="Access"`
//! when the header is absent, malformed, or when [`Validator::validate`]
//! returns any error, and otherwise exposes the decoded token as
//! request-scoped context before invoking the downstream handler.

#![forbid(unsafe_code)]

mod issue;
mod validate;

pub use issue::{IssueOptions, Issuer};
pub use validate::{AllowedAlgorithms, ValidationOptions, Validator};
