use thiserror::Error;

use crate::types::parse_type;

use super::{IdentifierTyper, Pattern, TypingRule};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ConventionsError {
    pub line: usize,
    pub message: String,
}

impl ConventionsError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        ConventionsError {
            line,
            message: message.into(),
        }
    }
}

impl IdentifierTyper {
    /// Read typing conventions from text, one declaration per line:
    ///
    /// ```text
    /// # entities
    /// constants of type e: a-e, john, mary
    /// variables of type <e,t>: U-Z
    /// ```
    ///
    /// An entry `X-Y` between two single letters is a range, anything else names
    /// one identifier. `#` starts a comment. Rules apply in order, so a later
    /// line overrides an earlier one.
    pub fn from_conventions(text: &str) -> Result<Self, ConventionsError> {
        let mut typer = IdentifierTyper::empty();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let Some((header, entries)) = content.split_once(':') else {
                return Err(ConventionsError::new(
                    line,
                    "expected '<constants|variables> of type <type>: <identifiers>'",
                ));
            };

            let header = header.trim();
            let (is_variable, rest) = if let Some(rest) = header
                .strip_prefix("constants")
                .or_else(|| header.strip_prefix("constant"))
            {
                (false, rest)
            } else if let Some(rest) = header
                .strip_prefix("variables")
                .or_else(|| header.strip_prefix("variable"))
            {
                (true, rest)
            } else {
                return Err(ConventionsError::new(
                    line,
                    format!("a declaration starts with 'constants' or 'variables', not '{}'", header),
                ));
            };

            let Some(type_text) = rest.trim().strip_prefix("of type") else {
                return Err(ConventionsError::new(line, "expected 'of type' after the kind"));
            };
            let ty = parse_type(type_text.trim())
                .map_err(|err| ConventionsError::new(line, format!("bad type: {}", err)))?;

            let mut any = false;
            for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                typer.add_rule(TypingRule::new(parse_pattern(entry, line)?, is_variable, ty.clone()));
                any = true;
            }
            if !any {
                return Err(ConventionsError::new(line, "no identifiers listed"));
            }
        }
        Ok(typer)
    }
}

fn parse_pattern(entry: &str, line: usize) -> Result<Pattern, ConventionsError> {
    let chars: Vec<char> = entry.chars().collect();
    if let &[start, '-', end] = chars.as_slice() {
        if start.is_alphabetic() && end.is_alphabetic() {
            if start > end {
                return Err(ConventionsError::new(
                    line,
                    format!("the range {} is empty", entry),
                ));
            }
            return Ok(Pattern::Range(start, end));
        }
    }
    if entry.chars().any(char::is_whitespace) {
        return Err(ConventionsError::new(
            line,
            format!("'{}' is not an identifier", entry),
        ));
    }
    Ok(Pattern::Exact(entry.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{E, T, Type};

    #[test]
    fn test_read_conventions() {
        let typer = IdentifierTyper::from_conventions(
            "# basics\nconstants of type e: a-e, john\nvariables of type <e,t>: U-Z\n",
        )
        .unwrap();
        assert_eq!(typer.rules().len(), 3);
        assert_eq!(typer.type_of("john"), Some(&E));
        assert_eq!(typer.is_variable("V"), Some(true));
        assert_eq!(typer.type_of("V"), Some(&Type::composite(E, T)));
    }

    #[test]
    fn test_singular_keywords_and_comments() {
        let typer =
            IdentifierTyper::from_conventions("variable of type t: p  # propositions").unwrap();
        assert_eq!(typer.lookup("p").map(|r| r.pattern.clone()), Some(Pattern::Exact("p".into())));
    }

    #[test]
    fn test_default_conventions_reparse() {
        let text = IdentifierTyper::default().to_string();
        assert_eq!(
            IdentifierTyper::from_conventions(&text).unwrap(),
            IdentifierTyper::default()
        );
    }

    #[test]
    fn test_errors_name_the_line() {
        let err = IdentifierTyper::from_conventions("constants of type e: a\nfunctions: f").unwrap_err();
        assert_eq!(err.line, 2);

        let err = IdentifierTyper::from_conventions("constants of type <e,: a").unwrap_err();
        assert!(err.message.starts_with("bad type"));

        let err = IdentifierTyper::from_conventions("variables of type e: z-u").unwrap_err();
        assert!(err.message.contains("empty"));

        let err = IdentifierTyper::from_conventions("variables of type e:").unwrap_err();
        assert_eq!(err.message, "no identifiers listed");
    }
}
