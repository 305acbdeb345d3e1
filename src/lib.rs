//! `rpc-certify` - Conformance test harness for JSON-RPC 2.0 HTTP servers
//!
//! Turns a YAML fixture file of request/response pairs into a matrix of
//! canonical and deliberately malformed requests, sends each one to a
//! server-under-test, and checks the reply against what the JSON-RPC 2.0
//! transport rules require.

pub mod case;
pub mod cli;
pub mod config;
pub mod error;
pub mod exchange;
pub mod jsonrpc;
pub mod observability;
pub mod report;
pub mod runner;
pub mod validate;
