use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Encode,
    Decode,
    Io,
}

/// Upper bound on stored input snippets, in bytes before the ellipsis.
pub const MAX_SNIPPET_BYTES: usize = 64;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    snippet: Option<String>,
    hint: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            snippet: None,
            hint: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches a truncated copy of the offending input for diagnostics.
    pub fn with_snippet(mut self, input: &str) -> Self {
        self.snippet = Some(truncate_snippet(input, MAX_SNIPPET_BYTES));
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(snippet) = &self.snippet {
            write!(f, " (input: {snippet})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Encode => 3,
        ErrorKind::Decode => 4,
        ErrorKind::Io => 5,
    }
}

fn truncate_snippet(input: &str, max: usize) -> String {
    let mut snippet = String::new();
    if input.len() <= max {
        snippet.push_str(input);
        return snippet;
    }
    let suffix = "...";
    if max <= suffix.len() {
        snippet.push_str(&suffix[..max]);
        return snippet;
    }
    // Back off to a char boundary so multi-byte input cannot split.
    let mut take = max - suffix.len();
    while !input.is_char_boundary(take) {
        take -= 1;
    }
    snippet.push_str(&input[..take]);
    snippet.push_str(suffix);
    snippet
}

#[cfg(test)]
mod tests {
    use super::{to_exit_code, truncate_snippet, Error, ErrorKind, MAX_SNIPPET_BYTES};

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::Encode, 3),
            (ErrorKind::Decode, 4),
            (ErrorKind::Io, 5),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn display_includes_message_and_snippet() {
        let err = Error::new(ErrorKind::Decode)
            .with_message("invalid record json")
            .with_snippet("{ nope");
        assert_eq!(err.to_string(), "Decode: invalid record json (input: { nope)");
    }

    #[test]
    fn short_input_is_kept_verbatim() {
        assert_eq!(truncate_snippet("{\"a\":1}", MAX_SNIPPET_BYTES), "{\"a\":1}");
    }

    #[test]
    fn long_input_is_truncated_with_ellipsis() {
        let input = "x".repeat(200);
        let snippet = truncate_snippet(&input, MAX_SNIPPET_BYTES);
        assert_eq!(snippet.len(), MAX_SNIPPET_BYTES);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let input = "é".repeat(100);
        let snippet = truncate_snippet(&input, MAX_SNIPPET_BYTES);
        assert!(snippet.ends_with("..."));
        assert!(snippet.len() <= MAX_SNIPPET_BYTES);
    }

    #[test]
    fn hint_survives_builder_chain() {
        let err = Error::new(ErrorKind::Usage)
            .with_message("missing value")
            .with_hint("Pass a value argument or pipe one on stdin.");
        assert_eq!(err.hint(), Some("Pass a value argument or pipe one on stdin."));
        assert_eq!(err.message(), Some("missing value"));
    }
}
