//! Candidate sets.
//!
//! Every grammar rule returns all the ways it can read the input from a given
//! position. A dead end is not an exception: a candidate may carry a hint
//! describing why it could not be extended, and the hint of the
//! farthest-reaching candidate becomes the diagnostic if nothing reaches the
//! end of the input.

use super::error::ParseError;

/// One way of reading a prefix of the remaining input.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub value: T,
    /// Position just after the consumed text.
    pub next: usize,
    pub how_to_continue: Option<ParseError>,
}

impl<T> Parsed<T> {
    pub fn new(value: T, next: usize) -> Self {
        Parsed {
            value,
            next,
            how_to_continue: None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            next: self.next,
            how_to_continue: self.how_to_continue,
        }
    }
}

/// All candidates of a rule, or the reason there are none.
pub type ParseResultSet<T> = Result<Vec<Parsed<T>>, ParseError>;

/// Collects the farthest-reaching explanation among several failures.
#[derive(Debug, Default)]
pub struct Farthest(Option<ParseError>);

impl Farthest {
    pub fn new() -> Self {
        Farthest(None)
    }

    pub fn record(&mut self, error: ParseError) {
        self.0 = Some(match self.0.take() {
            Some(current) => current.furthest(error),
            None => error,
        });
    }

    pub fn record_hint<T>(&mut self, parsed: &Parsed<T>) {
        if let Some(hint) = &parsed.how_to_continue {
            self.record(hint.clone());
        }
    }

    pub fn take(&mut self) -> Option<ParseError> {
        self.0.take()
    }

    /// Succeed with `candidates`, or fail with the recorded error (or
    /// `fallback` when nothing was recorded).
    pub fn into_result<T>(
        self,
        candidates: Vec<Parsed<T>>,
        fallback: impl FnOnce() -> ParseError,
    ) -> ParseResultSet<T> {
        if candidates.is_empty() {
            Err(self.0.unwrap_or_else(fallback))
        } else {
            Ok(candidates)
        }
    }
}

/// Only the candidates that got furthest.
pub fn longest<T>(candidates: Vec<Parsed<T>>) -> Vec<Parsed<T>> {
    let Some(max) = candidates.iter().map(|c| c.next).max() else {
        return candidates;
    };
    candidates.into_iter().filter(|c| c.next == max).collect()
}

/// Continue every candidate with `then`, pooling the results.
///
/// Candidates that cannot be continued contribute their failure to the
/// returned error when no continuation succeeds at all.
pub fn and_then<T, U>(
    candidates: Vec<Parsed<T>>,
    mut then: impl FnMut(Parsed<T>) -> ParseResultSet<U>,
    fallback: impl FnOnce() -> ParseError,
) -> ParseResultSet<U> {
    let mut farthest = Farthest::new();
    let mut results = Vec::new();
    for candidate in candidates {
        farthest.record_hint(&candidate);
        match then(candidate) {
            Ok(more) => results.extend(more),
            Err(err) => farthest.record(err),
        }
    }
    farthest.into_result(results, fallback)
}
