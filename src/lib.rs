//! # Mission Control Backend
//!
//! CRUD backend for scientists, planets and the missions that link them.
//!
//! A thin layer over a relational store: request routing, field validation
//! and object-relational mapping, exposed as a REST API via axum.
//!
//! ## Architecture
//!
//! - [`api`]: domain records, typed ids, validators and serialization views
//! - [`db`]: repository pattern, service layer and storage backends
//! - [`http`]: axum-based HTTP server and request handlers

// Allow large error types - RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;

#[cfg(feature = "http-server")]
pub mod http;
