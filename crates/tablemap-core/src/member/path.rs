use crate::error::MappingError;
use std::fmt;

///
/// MemberPath
///
/// Validated, non-empty chain of member names inside an entity.
/// Rendered dotted (`customer.address.city`); the dotted form is the
/// canonical key used to deduplicate mapper registrations.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MemberPath {
    segments: Vec<String>,
}

impl MemberPath {
    /// Parse a member-access expression.
    ///
    /// Only a direct chain of member names is accepted; calls, indexing,
    /// arithmetic and any other computed form are rejected.
    pub fn parse(expr: &str) -> Result<Self, MappingError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(MappingError::expression(expr, "empty member expression"));
        }

        let segments = trimmed
            .split('.')
            .map(|segment| check_segment(expr, segment).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Final member name.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Default column name: segments joined with `_`.
    #[must_use]
    pub fn column_name(&self) -> String {
        self.segments.join("_")
    }

    /// Append another path below this one.
    #[must_use]
    pub fn join(&self, child: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(child.segments.iter().cloned());

        Self { segments }
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

// Classify the first offending character so the error says what the
// expression was, not only that it was wrong.
fn check_segment<'a>(expr: &str, segment: &'a str) -> Result<&'a str, MappingError> {
    if segment.is_empty() {
        return Err(MappingError::expression(expr, "empty path segment"));
    }

    for c in segment.chars() {
        let reason = match c {
            '(' | ')' => "method calls are not member access",
            '[' | ']' => "indexing is not member access",
            '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '!' | '<' | '>' | '=' => {
                "operators are not member access"
            }
            c if c.is_whitespace() => "whitespace inside a member name",
            c if c.is_alphanumeric() || c == '_' => continue,
            _ => "not a member name",
        };

        return Err(MappingError::expression(expr, reason));
    }

    if segment.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(MappingError::expression(
            expr,
            "member names cannot start with a digit",
        ));
    }

    Ok(segment)
}
