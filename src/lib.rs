//! # github-code-search
//!
//! A Rust web application for browsing and searching remote source-code
//! repositories without managing checkouts yourself: name an owner/repo and
//! the server materializes a local, shallow, read-only checkout on first
//! access, then answers file reads, file listings, and pattern searches
//! against it.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────┐      ┌────────────────────────────┐
//!   │ query (owner,│      │ RepoCache                  │
//!   │ repo, ...)   ├─────▶│  single-flight shallow git │
//!   └──────────────┘      │  fetch, handles never      │
//!                         │  evicted                   │
//!                         └─────────────┬──────────────┘
//!                                       │ Arc<RepoHandle>
//!               ┌───────────────────────┼───────────────────────┐
//!               ▼                       ▼                       ▼
//!     ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//!     │ FileReader       │   │ rg --files       │   │ rg --json search │
//!     │ bounded reads,   │   │ (FindStream)     │   │ (SearchStream)   │
//!     │ path containment │   └────────┬─────────┘   └────────┬─────────┘
//!     └──────────────────┘            │                      │
//!                                     ▼                      ▼
//!                           ┌──────────────────┐   ┌──────────────────┐
//!                           │ ResultLimiter    │   │ ContextAssembler │
//!                           │ early stop at cap│   │ before/match/    │
//!                           └──────────────────┘   │ after windows    │
//!                                                  └──────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration (clone root, bind address)
//! - [`error`] - The `ServerError` taxonomy surfaced to callers
//! - [`models`] - Wire model: `LineMap`, `MatchWindow`, `FileContent`, requests
//! - [`git`] - Shallow single-branch clone via the git CLI
//! - [`repo`] - Repository identities, handles, bounded file reads, and the
//!   single-flight [`repo::cache::RepoCache`]
//! - [`search`] - ripgrep engine boundary, filter building, context assembly,
//!   and result limiting
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod error;
pub mod git;
pub mod models;
pub mod repo;
pub mod search;
pub mod state;
