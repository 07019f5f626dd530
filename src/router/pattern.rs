//! Route template compilation and longest-match evaluation.
//!
//! A route template is a regular expression written against the request path.
//! Before compilation it is normalized:
//!
//! 1. A start anchor (`^`) is prepended unless present.
//! 2. Unless the template already ends in `$`, an optional trailing slash
//!    group `(/)?` is appended, followed by an end anchor (`$`) when the
//!    template does not end in a repetition token (`*` or `+`).
//!
//! So `/persons` becomes `^/persons(/)?$` and matches `/persons` and
//! `/persons/`, while `/bikes/*` becomes `^/bikes/*(/)?` and accepts any suffix.
//!
//! Matching reports the *longest* span starting at the leftmost match position.
//! The `regex` crate is leftmost-first, so it only locates that position. The
//! span is then grown by a dense DFA built with `MatchKind::All`, run anchored
//! at the start position: one forward scan reports the last offset at which
//! any alternative matched. That span is what the specificity ranking compares.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use regex_automata::dfa::{dense, Automaton, StartKind};
use regex_automata::{Anchored, Input, MatchKind};

use super::error::RouteError;

/// A compiled, normalized route pattern.
///
/// Patterns are compiled once at registration and are immutable afterwards.
#[derive(Clone)]
pub struct RoutePattern {
    template: Arc<str>,
    /// Normalized pattern, used to find the leftmost match position.
    matcher: Regex,
    /// All-matches DFA over the same pattern, used to grow the match to its
    /// longest span.
    longest: dense::DFA<Vec<u32>>,
}

impl RoutePattern {
    /// Compile a route template.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] when the normalized template is
    /// not a valid regular expression.
    pub fn compile(template: &str) -> Result<Self, RouteError> {
        let normalized = normalize(template);
        let invalid = |source: Box<dyn std::error::Error + Send + Sync>| {
            RouteError::InvalidPattern {
                template: template.to_string(),
                source,
            }
        };

        let matcher = Regex::new(&normalized).map_err(|e| invalid(Box::new(e)))?;
        let longest = dense::Builder::new()
            .configure(
                dense::Config::new()
                    .match_kind(MatchKind::All)
                    .start_kind(StartKind::Anchored)
                    .unicode_word_boundary(true),
            )
            .build(&normalized)
            .map_err(|e| invalid(Box::new(e)))?;

        Ok(Self {
            template: Arc::from(template),
            matcher,
            longest,
        })
    }

    /// The template as it was registered.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The normalized regular expression.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.matcher.as_str()
    }

    /// Whether the pattern is left open at the end (template ends in `*` or `+`).
    #[must_use]
    pub fn is_open_ended(&self) -> bool {
        !self.template.ends_with('$') && ends_with_repetition(&self.template)
    }

    /// Find the longest span of `path` matched by this pattern.
    ///
    /// Returns `None` when the pattern does not match, or only matches the
    /// empty string.
    #[must_use]
    pub fn find<'p>(&self, path: &'p str) -> Option<&'p str> {
        let first = self.matcher.find(path)?;
        let start = first.start();

        let input = Input::new(path).range(start..).anchored(Anchored::Yes);
        let end = match self.longest.try_search_fwd(&input) {
            Ok(Some(m)) => m.offset().max(first.end()),
            // `\b` quits on non-ASCII input; keep the leftmost-first span
            Ok(None) | Err(_) => first.end(),
        };

        let longest = path.get(start..end).unwrap_or(first.as_str());
        (!longest.is_empty()).then_some(longest)
    }

    /// Whether `path` is matched by this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.find(path).is_some()
    }
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePattern")
            .field("template", &self.template)
            .field("regex", &self.matcher.as_str())
            .finish()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn ends_with_repetition(template: &str) -> bool {
    template.ends_with('*') || template.ends_with('+')
}

/// Apply the anchoring rules to a template.
pub(crate) fn normalize(template: &str) -> String {
    let mut pattern = String::with_capacity(template.len() + 6);
    if !template.starts_with('^') {
        pattern.push('^');
    }
    pattern.push_str(template);

    if !template.ends_with('$') {
        pattern.push_str("(/)?");
        if !ends_with_repetition(template) {
            pattern.push('$');
        }
    }
    pattern
}
