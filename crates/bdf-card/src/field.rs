//! Scalar values stored in the fields of a bulk-data card.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A single bulk-data field.
///
/// Nastran distinguishes integers from reals by the presence of a decimal
/// point, so `1` and `1.` parse to different variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Field {
    /// Empty field (all spaces, or nothing between two commas)
    #[default]
    Blank,
    Integer(i32),
    Real(f64),
    /// Character value, stored upper-case
    Text(String),
}

impl Field {
    /// Parse the raw text of one field.
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim();
        if token.is_empty() {
            return Field::Blank;
        }
        if let Ok(value) = token.parse::<i32>() {
            return Field::Integer(value);
        }
        if let Some(value) = parse_real(token) {
            return Field::Real(value);
        }
        Field::Text(token.to_ascii_uppercase())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Field::Blank)
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Field::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short description of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Field::Blank => "blank",
            Field::Integer(_) => "integer",
            Field::Real(_) => "real",
            Field::Text(_) => "text",
        }
    }
}

impl From<i32> for Field {
    fn from(value: i32) -> Self {
        Field::Integer(value)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Real(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_ascii_uppercase())
    }
}

impl From<Option<i32>> for Field {
    fn from(value: Option<i32>) -> Self {
        value.map_or(Field::Blank, Field::Integer)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Blank => Ok(()),
            Field::Integer(v) => write!(f, "{v}"),
            Field::Real(v) => write!(f, "{v:?}"),
            Field::Text(s) => f.write_str(s),
        }
    }
}

/// Parse a Nastran real, including the exponent shorthand `7.85+3` / `1.-4`
/// and Fortran `D` exponents.
///
/// A real must carry a decimal point or an exponent letter.
fn parse_real(token: &str) -> Option<f64> {
    let normalized = token.to_ascii_uppercase().replace('D', "E");
    if !normalized.contains('.') && !normalized.contains('E') {
        return None;
    }
    if !normalized.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Ok(value) = normalized.parse::<f64>() {
        return Some(value);
    }

    // Implicit exponent: a sign after the first character that is not
    // already preceded by 'E'.
    let bytes = normalized.as_bytes();
    let split = (1..bytes.len())
        .find(|&i| (bytes[i] == b'+' || bytes[i] == b'-') && bytes[i - 1] != b'E')?;
    let expanded = format!("{}E{}", &normalized[..split], &normalized[split..]);
    expanded.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers_and_blanks() {
        assert_eq!(Field::parse("  12 "), Field::Integer(12));
        assert_eq!(Field::parse("-3"), Field::Integer(-3));
        assert_eq!(Field::parse("        "), Field::Blank);
        assert_eq!(Field::parse(""), Field::Blank);
    }

    #[test]
    fn parses_reals_with_nastran_shorthand() {
        assert_eq!(Field::parse("1."), Field::Real(1.0));
        assert_eq!(Field::parse("7.85+3"), Field::Real(7850.0));
        assert_eq!(Field::parse("1.-4"), Field::Real(1.0e-4));
        assert_eq!(Field::parse("-2.5-1"), Field::Real(-0.25));
        assert_eq!(Field::parse("2.1E+11"), Field::Real(2.1e11));
        assert_eq!(Field::parse("3.0D2"), Field::Real(300.0));
    }

    #[test]
    fn non_numeric_tokens_become_upper_case_text() {
        assert_eq!(Field::parse("chexa"), Field::Text("CHEXA".to_string()));
        assert_eq!(Field::parse("+"), Field::Text("+".to_string()));
        assert_eq!(Field::parse("."), Field::Text(".".to_string()));
    }

    #[test]
    fn optional_integer_maps_to_blank() {
        assert_eq!(Field::from(None::<i32>), Field::Blank);
        assert_eq!(Field::from(Some(4)), Field::Integer(4));
    }

    #[test]
    fn serializes_as_tagged_json() {
        let fields = vec![Field::from("CTETRA"), Field::Integer(1), Field::Blank];
        let json = serde_json::to_string(&fields).expect("serialize");
        let back: Vec<Field> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back[0].as_text(), Some("CTETRA"));
        assert_eq!(back[1].as_integer(), Some(1));
        assert!(back[2].is_blank());
    }
}
