//! Bulk-data deck reader.
//!
//! Supports free-field (comma separated) and small-field (8 column) entries
//! with continuation lines. Every physical line contributes exactly eight
//! data slots, so a field keeps its position on the card even when the
//! fields before it are blank.

use std::fs;
use std::path::Path;

use crate::error::{CardError, Result};
use crate::field::Field;

/// Data fields carried by one physical line.
pub const FIELDS_PER_LINE: usize = 8;

/// Width of a small-field column.
pub const SMALL_FIELD_WIDTH: usize = 8;

static BLANK: Field = Field::Blank;

/// One bulk-data entry. Field 0 is the card name, continuation markers are
/// not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    name: String,
    fields: Vec<Field>,
    pub line_start: usize,
}

impl Card {
    /// Build a card from already-split fields, e.g. the output of an
    /// element's `raw_fields`.
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        let name = match fields.first() {
            Some(Field::Text(name)) => name.clone(),
            Some(other) => {
                return Err(CardError::Field {
                    card: "<unnamed>".to_string(),
                    index: 0,
                    expected: "card name",
                    found: other.kind().to_string(),
                });
            }
            None => {
                return Err(CardError::Parse {
                    line: 0,
                    message: "card has no fields".to_string(),
                });
            }
        };
        let mut card = Self {
            name,
            fields,
            line_start: 0,
        };
        card.trim_trailing_blanks();
        Ok(card)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of fields including the name and any interior blanks.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.len() <= 1
    }

    pub fn all_fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field at position `i`; positions past the end read as blank.
    pub fn field(&self, i: usize) -> &Field {
        self.fields.get(i).unwrap_or(&BLANK)
    }

    /// Fields over `[start, stop)`, padded with blanks.
    pub fn fields(&self, start: usize, stop: usize) -> Vec<Field> {
        (start..stop).map(|i| self.field(i).clone()).collect()
    }

    pub fn integer(&self, i: usize) -> Result<i32> {
        match self.field(i) {
            Field::Integer(v) => Ok(*v),
            other => Err(self.field_error(i, "integer", other)),
        }
    }

    pub fn integer_or_blank(&self, i: usize) -> Result<Option<i32>> {
        match self.field(i) {
            Field::Integer(v) => Ok(Some(*v)),
            Field::Blank => Ok(None),
            other => Err(self.field_error(i, "integer or blank", other)),
        }
    }

    /// Real value; integers are accepted and widened.
    pub fn real_or_blank(&self, i: usize) -> Result<Option<f64>> {
        match self.field(i) {
            Field::Real(v) => Ok(Some(*v)),
            Field::Integer(v) => Ok(Some(f64::from(*v))),
            Field::Blank => Ok(None),
            other => Err(self.field_error(i, "real or blank", other)),
        }
    }

    fn field_error(&self, index: usize, expected: &'static str, found: &Field) -> CardError {
        CardError::Field {
            card: self.name.clone(),
            index,
            expected,
            found: found.kind().to_string(),
        }
    }

    fn trim_trailing_blanks(&mut self) {
        while self.fields.len() > 1 && self.fields.last().is_some_and(Field::is_blank) {
            self.fields.pop();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&raw)
    }

    pub fn parse_str(raw: &str) -> Result<Self> {
        let mut cards: Vec<Card> = Vec::new();
        let mut current: Option<Card> = None;

        for (i, line) in raw.lines().enumerate() {
            let line_no = i + 1;
            let line = expand_tabs(strip_comment(line));

            if line.trim().is_empty() || is_section_marker(&line) {
                continue;
            }

            if is_continuation(&line) {
                let card = current.as_mut().ok_or_else(|| CardError::Parse {
                    line: line_no,
                    message: "continuation line without a parent card".to_string(),
                })?;
                let tokens = split_line(&line, line_no)?;
                card.fields.extend(data_slots(&tokens, line_no)?);
                continue;
            }

            if let Some(mut done) = current.take() {
                done.trim_trailing_blanks();
                cards.push(done);
            }

            let tokens = split_line(&line, line_no)?;
            let name = tokens[0].trim().to_ascii_uppercase();
            if name.ends_with('*') {
                return Err(CardError::Parse {
                    line: line_no,
                    message: format!("large-field entry '{name}' is not supported"),
                });
            }

            let mut fields = vec![Field::Text(name.clone())];
            fields.extend(data_slots(&tokens, line_no)?);
            current = Some(Card {
                name,
                fields,
                line_start: line_no,
            });
        }

        if let Some(mut done) = current {
            done.trim_trailing_blanks();
            cards.push(done);
        }

        Ok(Deck { cards })
    }

    /// Cards with the given name, in deck order.
    pub fn cards_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Card> + 'a {
        self.cards.iter().filter(move |c| c.name.eq_ignore_ascii_case(name))
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('$') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn is_section_marker(line: &str) -> bool {
    let upper = line.trim().to_ascii_uppercase();
    upper.starts_with("BEGIN BULK") || upper.starts_with("ENDDATA")
}

fn is_continuation(line: &str) -> bool {
    matches!(line.chars().next(), Some('+' | ',' | ' '))
}

/// Tab stops every eight characters. Columns count chars, matching the
/// fixed-width split in `split_line`.
fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = SMALL_FIELD_WIDTH - column % SMALL_FIELD_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Split a physical line into its leading name/marker token followed by the
/// data tokens (and an optional trailing continuation marker).
fn split_line(line: &str, line_no: usize) -> Result<Vec<String>> {
    let tokens: Vec<String> = if line.contains(',') {
        line.split(',').map(|t| t.trim().to_string()).collect()
    } else {
        let chars: Vec<char> = line.trim_end().chars().collect();
        chars
            .chunks(SMALL_FIELD_WIDTH)
            .map(|chunk| chunk.iter().collect::<String>().trim().to_string())
            .collect()
    };

    if tokens.len() > FIELDS_PER_LINE + 2 {
        return Err(CardError::Parse {
            line: line_no,
            message: format!(
                "{} fields on one line, at most {} allowed",
                tokens.len(),
                FIELDS_PER_LINE + 2
            ),
        });
    }
    Ok(tokens)
}

/// The eight data slots of a line, padded with blanks. Token 0 (name or
/// continuation marker) and token 9 (trailing continuation marker) are
/// dropped.
fn data_slots(tokens: &[String], line_no: usize) -> Result<Vec<Field>> {
    if tokens.is_empty() {
        return Err(CardError::Parse {
            line: line_no,
            message: "empty line".to_string(),
        });
    }
    let mut slots: Vec<Field> = tokens
        .iter()
        .skip(1)
        .take(FIELDS_PER_LINE)
        .map(|t| Field::parse(t))
        .collect();
    slots.resize(FIELDS_PER_LINE, Field::Blank);
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_small_field_card_with_continuation() {
        let src = "\
$ comment line
BEGIN BULK
CHEXA          1      10       1       2       3       4       5       6+
+              7       8
ENDDATA
";
        let deck = Deck::parse_str(src).expect("parser should succeed");
        assert_eq!(deck.cards.len(), 1);

        let card = &deck.cards[0];
        assert_eq!(card.name(), "CHEXA");
        assert_eq!(card.len(), 11);
        assert_eq!(card.integer(1).unwrap(), 1);
        assert_eq!(card.integer(2).unwrap(), 10);
        let nodes: Vec<Option<i32>> = card.fields(3, 11).iter().map(Field::as_integer).collect();
        assert_eq!(nodes, (1..=8).map(Some).collect::<Vec<_>>());
    }

    #[test]
    fn parses_free_field_cards() {
        let src = "GRID,1,,0.,1.5,-2.\nCTETRA,5,1,1,2,3,4\n";
        let deck = Deck::parse_str(src).expect("parser should succeed");
        assert_eq!(deck.cards.len(), 2);
        assert_eq!(deck.cards[0].field(2), &Field::Blank);
        assert_eq!(deck.cards[0].real_or_blank(4).unwrap(), Some(1.5));
        assert_eq!(deck.cards[1].line_start, 2);
        assert_eq!(deck.cards[1].len(), 7);
    }

    #[test]
    fn blank_slots_keep_their_position() {
        let src = "CTETRA,1,1,1,2,3,4,,6\n,,8\n";
        let deck = Deck::parse_str(src).expect("parser should succeed");
        let card = &deck.cards[0];
        assert_eq!(card.integer_or_blank(7).unwrap(), None);
        assert_eq!(card.integer_or_blank(8).unwrap(), Some(6));
        assert_eq!(card.integer_or_blank(9).unwrap(), None);
        assert_eq!(card.integer_or_blank(10).unwrap(), Some(8));
        assert_eq!(card.len(), 11);
    }

    #[test]
    fn reading_past_the_end_is_blank() {
        let card = Card::from_fields(vec!["PSOLID".into(), 1.into(), 2.into()]).unwrap();
        assert!(card.field(40).is_blank());
        assert_eq!(card.fields(2, 5), vec![Field::Integer(2), Field::Blank, Field::Blank]);
    }

    #[test]
    fn from_fields_trims_trailing_blanks() {
        let card = Card::from_fields(vec!["CTETRA".into(), 1.into(), Field::Blank, Field::Blank])
            .unwrap();
        assert_eq!(card.len(), 2);
    }

    #[test]
    fn typed_access_reports_the_offending_field() {
        let card = Card::from_fields(vec!["CHEXA".into(), 1.5.into()]).unwrap();
        let err = card.integer(1).expect_err("real is not an integer");
        assert!(err.to_string().contains("CHEXA field 1"));
    }

    #[test]
    fn fails_on_orphan_continuation() {
        let err = Deck::parse_str("+       1       2\n").expect_err("should fail");
        assert!(matches!(err, CardError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_large_field_entries() {
        let err = Deck::parse_str("GRID*   1\n").expect_err("should fail");
        assert!(err.to_string().contains("large-field"));
    }

    #[test]
    fn expands_tabs_to_small_field_columns() {
        let deck = Deck::parse_str("PSOLID\t1\t2\n").expect("parser should succeed");
        assert_eq!(deck.cards[0].integer(1).unwrap(), 1);
        assert_eq!(deck.cards[0].integer(2).unwrap(), 2);
    }

    #[test]
    fn tab_stops_count_characters_not_bytes() {
        let deck = Deck::parse_str("PSOLID\tÉ\t2\n").expect("parser should succeed");
        assert_eq!(deck.cards[0].field(1).as_text(), Some("É"));
        assert_eq!(deck.cards[0].integer(2).unwrap(), 2);
    }
}
