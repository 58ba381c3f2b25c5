//! Integration tests for the LLM proxy
//!
//! These tests run the production router against mock backends and verify
//! the complete request/response flow through the proxy.

mod chat_completions;
mod routes;
