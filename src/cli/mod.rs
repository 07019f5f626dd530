//! # CLI Module
//!
//! Developer tooling behind the `cable` binary. Both commands answer "what
//! would the dispatcher do" without starting a server.
//!
//! ## Commands
//!
//! ### `resolve`
//!
//! Build a throwaway router and resolve one request against it:
//!
//! ```bash
//! cable resolve --route "GET /persons" --route "DELETE /persons/[0-9]+" \
//!     --filter "/.*" POST /persons
//! ```
//!
//! Prints the filters that would run, then the matched route, or the 404, or
//! the 405 with its `Allow` header.
//!
//! ### `negotiate`
//!
//! Rank `Accept` values and show which of the built-in codecs would encode
//! the response and decode the request body:
//!
//! ```bash
//! cable negotiate --accept "application/json;q=0.1, application/xml" \
//!     --content-type "application/json; charset=utf-8"
//! ```
//!
//! `--rfc` switches to RFC 9110 quality values. `--config <FILE>` (or
//! `CABLE_CONFIG`) reads dispatch settings from TOML; otherwise they come from
//! the `CABLE_*` environment variables.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};
