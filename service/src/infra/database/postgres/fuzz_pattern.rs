//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// `SIMILAR TO` pattern for fuzzy searching.
///
/// Matches values containing any whitespace-separated word of the input.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Creates a new [`FuzzPattern`] out of the given `input`.
    ///
    /// Characters special to `SIMILAR TO` are escaped, so the input always
    /// matches literally.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "({})",
            input.split_ascii_whitespace().format_with("|", |word, f| {
                f(&format_args!(
                    "%{}%",
                    word.replace('\\', r"\\")
                        .replace('%', r"\%")
                        .replace('|', r"\|")
                        .replace('*', r"\*")
                        .replace('+', r"\+")
                        .replace('?', r"\?")
                        .replace('{', r"\{")
                        .replace('}', r"\}")
                        .replace('(', r"\(")
                        .replace(')', r"\)")
                        .replace('[', r"\[")
                        .replace(']', r"\]")
                        .replace('_', r"\_")
                ))
            }),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn matches_any_word() {
        assert_eq!(
            FuzzPattern::new("Toyota Vios").to_string(),
            "(%Toyota%|%Vios%)",
        );
        assert_eq!(FuzzPattern::new("Civic").to_string(), "(%Civic%)");
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(FuzzPattern::new("100%").to_string(), r"(%100\%%)");
        assert_eq!(FuzzPattern::new("a|b").to_string(), r"(%a\|b%)");
        assert_eq!(FuzzPattern::new("C(RV)").to_string(), r"(%C\(RV\)%)");
    }
}
