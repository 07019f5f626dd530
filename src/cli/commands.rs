use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};

use crate::config::DispatchConfig;
use crate::dispatcher::{RequestEntity, ResponseEntity};
use crate::negotiation::{self, CodecRegistry, QualityParsing};
use crate::router::{Resolution, Router};

/// Command-line interface for cable
#[derive(Parser, Debug)]
#[command(name = "cable")]
#[command(about = "Inspect route resolution and content negotiation", long_about = None)]
pub struct Cli {
    /// TOML file with dispatch settings
    #[arg(long, global = true, env = "CABLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a request against a set of routes
    Resolve {
        /// Handler registration, "<METHOD> <PATTERN>" (repeatable)
        #[arg(long = "route", value_name = "METHOD PATTERN", required = true)]
        routes: Vec<String>,

        /// Filter pattern (repeatable)
        #[arg(long = "filter", value_name = "PATTERN")]
        filters: Vec<String>,

        /// Request method
        method: String,

        /// Request path
        path: String,
    },
    /// Rank Accept values and pick codecs
    Negotiate {
        /// Accept header value (repeatable)
        #[arg(long)]
        accept: Vec<String>,

        /// Content-Type header value
        #[arg(long)]
        content_type: Option<String>,

        /// Use RFC 9110 quality values
        #[arg(long, default_value_t = false)]
        rfc: bool,
    },
}

/// Execute `cli`, writing the report to `out`.
///
/// # Errors
///
/// Fails on an unreadable configuration file, a malformed `--route`, an
/// invalid pattern or method, or a failed write.
pub fn run_cli(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => DispatchConfig::load(path)?,
        None => DispatchConfig::from_env(),
    };

    match &cli.command {
        Commands::Resolve {
            routes,
            filters,
            method,
            path,
        } => resolve(routes, filters, method, path, out),
        Commands::Negotiate {
            accept,
            content_type,
            rfc,
        } => {
            let config = if *rfc {
                DispatchConfig {
                    quality_parsing: QualityParsing::Rfc,
                    ..config
                }
            } else {
                config
            };
            negotiate(&config, accept, content_type.as_deref(), out)
        }
    }
}

fn parse_method(raw: &str) -> anyhow::Result<Method> {
    Method::from_bytes(raw.trim().to_uppercase().as_bytes())
        .with_context(|| format!("invalid method '{raw}'"))
}

fn noop_handler(_req: &RequestEntity, _res: &mut ResponseEntity) {}

fn resolve(
    routes: &[String],
    filters: &[String],
    method: &str,
    path: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut router = Router::new();
    for route in routes {
        let (route_method, pattern) = route
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| anyhow!("route '{route}' is not of the form \"<METHOD> <PATTERN>\""))?;
        router
            .register_handler(parse_method(route_method)?, pattern.trim(), noop_handler)
            .with_context(|| format!("cannot register route '{route}'"))?;
    }
    for pattern in filters {
        router
            .filter(pattern, |_req: &RequestEntity| None)
            .with_context(|| format!("cannot register filter '{pattern}'"))?;
    }

    let method = parse_method(method)?;
    writeln!(out, "{method} {path}")?;

    let matching = router.resolve_filters(path);
    if matching.is_empty() {
        writeln!(out, "filters: none")?;
    } else {
        for filter in &matching {
            writeln!(out, "filter:  {}", filter.pattern().template())?;
        }
    }

    match router.resolve_handler(path, &method) {
        Resolution::Matched { route, matched } => writeln!(
            out,
            "matched: {} {} (span \"{matched}\")",
            route.method(),
            route.pattern().template()
        )?,
        Resolution::MethodNotAllowed { allow } => {
            writeln!(out, "405 Method Not Allowed")?;
            writeln!(out, "Allow: {allow}")?;
        }
        Resolution::NotFound => writeln!(out, "404 Not Found")?,
    }
    Ok(())
}

fn negotiate(
    config: &DispatchConfig,
    accept: &[String],
    content_type: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut headers = HeaderMap::new();
    for value in accept {
        let value =
            HeaderValue::from_str(value).with_context(|| format!("invalid Accept '{value}'"))?;
        headers.append(ACCEPT, value);
    }
    if let Some(value) = content_type {
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("invalid Content-Type '{value}'"))?;
        headers.insert(CONTENT_TYPE, value);
    }

    let registry = CodecRegistry::with_defaults();

    writeln!(out, "accept candidates:")?;
    let candidates = negotiation::resolve_accept(&headers, config);
    for candidate in &candidates {
        writeln!(out, "  {} q={}", candidate.media_type, candidate.quality)?;
    }

    match registry.select_for_encode(&candidates) {
        Ok((codec, matched)) => writeln!(
            out,
            "encode: {} as {} (matched {matched})",
            codec.name(),
            codec.content_type_for(matched)
        )?,
        Err(e) => writeln!(out, "encode: {} {e}", e.status().as_u16())?,
    }

    let decoded = negotiation::resolve_content_type(&headers, &config.default_content_type)
        .and_then(|media_type| {
            registry
                .select_for_decode(&media_type)
                .map(|codec| (codec.name(), media_type))
        });
    match decoded {
        Ok((codec, media_type)) => writeln!(out, "decode: {codec} for {media_type}")?,
        Err(e) => writeln!(out, "decode: {} {e}", e.status().as_u16())?,
    }
    Ok(())
}
