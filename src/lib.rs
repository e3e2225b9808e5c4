//! Agent tools for to-do management and network ACL audits.
//!
//! Two integration components sit behind a common tool surface: the
//! [`orchestrator`] launches a job template on a remote automation
//! platform, polls it to completion, and extracts a named artifact; the
//! [`todo`] engine queries and mutates a remote to-do service, with a
//! multi-predicate filter chain and project-name resolution. The agent
//! layer that decides *which* tool to call is someone else's problem —
//! [`tools`] only promises string-renderable results for whoever calls.

pub mod client;
pub mod config;
pub mod consts;
pub mod error;
pub mod orchestrator;
pub mod todo;
pub mod tools;

pub use error::{Error, Result};
