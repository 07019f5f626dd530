//! Media type parsing and quality-value ranking of `Accept` candidates.

use serde::{Deserialize, Serialize};

use super::error::MediaTypeError;

/// How the `q` parameter of an `Accept` entry is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityParsing {
    /// `q` is honoured only when it is a 3-character numeric token such as
    /// `0.8`; anything else (`1`, `0.85`) counts as the default 1.0.
    #[default]
    Strict,
    /// RFC 9110 qvalues: `0` or `1`, optionally followed by `.` and up to three
    /// digits, within [0, 1]. Malformed values count as 1.0 and `q=0`
    /// entries are dropped as not acceptable.
    Rfc,
}

impl QualityParsing {
    /// Parse a mode name, defaulting to [`QualityParsing::Strict`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "rfc" | "standard" => QualityParsing::Rfc,
            _ => QualityParsing::Strict,
        }
    }
}

/// Quality assumed when an entry carries no usable `q` parameter.
pub const DEFAULT_QUALITY: f32 = 1.0;

/// One parsed `Accept` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaTypeCandidate {
    /// Lower-cased `type/subtype`
    pub media_type: String,
    /// Parameters in declaration order, names lower-cased
    pub params: Vec<(String, String)>,
    /// Declared preference
    pub quality: f32,
}

impl MediaTypeCandidate {
    /// Parse a single `Accept` entry.
    ///
    /// # Errors
    ///
    /// Returns a [`MediaTypeError`] when the entry is not a valid media type.
    pub fn parse(entry: &str, mode: QualityParsing) -> Result<Self, MediaTypeError> {
        let (media_type, params) = parse_media_type(entry)?;
        let quality = quality_of(&params, mode);
        Ok(Self {
            media_type,
            params,
            quality,
        })
    }

    /// Look up a parameter by (lower-case) name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse `type/subtype; name=value; ...`.
///
/// Type, subtype and parameter names are lower-cased; quoted parameter values
/// are unquoted; a trailing `;` is tolerated.
///
/// # Errors
///
/// Fails on an empty input, a missing or invalid `type/subtype`, a parameter
/// without `=` or with an invalid name, and a repeated parameter name.
pub fn parse_media_type(input: &str) -> Result<(String, Vec<(String, String)>), MediaTypeError> {
    let mut parts = input.split(';');
    let essence = parts.next().unwrap_or_default().trim();
    if essence.is_empty() {
        return Err(MediaTypeError::Empty);
    }

    let (kind, subtype) = essence
        .split_once('/')
        .ok_or_else(|| MediaTypeError::InvalidMediaType(essence.to_string()))?;
    if !is_token(kind) || !is_token(subtype) {
        return Err(MediaTypeError::InvalidMediaType(essence.to_string()));
    }

    let mut params: Vec<(String, String)> = Vec::new();
    for raw in parts {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| MediaTypeError::InvalidParameter(raw.to_string()))?;
        let name = name.trim().to_lowercase();
        if !is_token(&name) {
            return Err(MediaTypeError::InvalidParameter(raw.to_string()));
        }
        if params.iter().any(|(existing, _)| *existing == name) {
            return Err(MediaTypeError::DuplicateParameter(name));
        }
        params.push((name, unquote(value.trim()).to_string()));
    }

    Ok((essence.to_lowercase(), params))
}

/// Parse every `Accept` header occurrence into candidates.
///
/// Occurrences are concatenated and split on `,`. Entries that fail to parse
/// are dropped.
pub fn parse_accept<'a, I>(values: I, mode: QualityParsing) -> Vec<MediaTypeCandidate>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .flat_map(|value| value.split(','))
        .filter_map(|entry| MediaTypeCandidate::parse(entry, mode).ok())
        .filter(|candidate| mode == QualityParsing::Strict || candidate.quality > 0.0)
        .collect()
}

/// Order candidates by descending quality. Stable for equal qualities.
pub fn rank_by_quality(candidates: &mut [MediaTypeCandidate]) {
    candidates.sort_by(|a, b| b.quality.total_cmp(&a.quality));
}

/// [`parse_accept`] followed by [`rank_by_quality`].
pub fn ranked_accept<'a, I>(values: I, mode: QualityParsing) -> Vec<MediaTypeCandidate>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidates = parse_accept(values, mode);
    rank_by_quality(&mut candidates);
    candidates
}

fn quality_of(params: &[(String, String)], mode: QualityParsing) -> f32 {
    let Some(q) = params.iter().find(|(k, _)| k == "q").map(|(_, v)| v.as_str()) else {
        return DEFAULT_QUALITY;
    };

    let parsed = match mode {
        QualityParsing::Strict => (q.len() == 3)
            .then(|| q.parse::<f32>().ok())
            .flatten()
            .filter(|v| v.is_finite()),
        QualityParsing::Rfc => parse_qvalue(q),
    };
    parsed.unwrap_or(DEFAULT_QUALITY)
}

/// `qvalue = ( "0" [ "." 0*3DIGIT ] ) / ( "1" [ "." 0*3("0") ] )`
fn parse_qvalue(q: &str) -> Option<f32> {
    let (int, frac) = match q.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (q, ""),
    };
    if frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match int {
        "0" => q.parse().ok(),
        "1" if frac.bytes().all(|b| b == b'0') => Some(1.0),
        _ => None,
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
                        | b'_' | b'`' | b'|' | b'~'
                )
        })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
