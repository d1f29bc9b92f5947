//! Small-field card writer.

use crate::deck::{FIELDS_PER_LINE, SMALL_FIELD_WIDTH};
use crate::error::{CardError, Result};
use crate::field::Field;

/// Format `fields` (name first) as a small-field entry.
///
/// Eight data fields go on each line; continuation lines start with `+`.
/// Interior blanks are written as empty columns so positions survive a
/// re-read, trailing blanks are dropped.
pub fn print_card(fields: &[Field]) -> Result<String> {
    let end = fields
        .iter()
        .rposition(|f| !f.is_blank())
        .map_or(0, |last| last + 1);
    let fields = &fields[..end];

    let Some((name, data)) = fields.split_first() else {
        return Ok(String::new());
    };

    let mut out = String::new();
    let mut line = format_field(name, 0)?;
    for (chunk_index, chunk) in data.chunks(FIELDS_PER_LINE).enumerate() {
        if chunk_index > 0 {
            out.push_str(line.trim_end());
            out.push('\n');
            line = format!("{:<width$}", "+", width = SMALL_FIELD_WIDTH);
        }
        for (offset, field) in chunk.iter().enumerate() {
            let index = 1 + chunk_index * FIELDS_PER_LINE + offset;
            line.push_str(&format_field(field, index)?);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
    Ok(out)
}

fn format_field(field: &Field, index: usize) -> Result<String> {
    let text = match field {
        Field::Blank => String::new(),
        Field::Integer(v) => v.to_string(),
        Field::Real(v) => format_real(*v, index)?,
        Field::Text(s) => s.clone(),
    };
    if text.len() > SMALL_FIELD_WIDTH {
        return Err(CardError::Width { index, value: text });
    }
    let padded = match field {
        Field::Text(_) | Field::Blank => format!("{text:<width$}", width = SMALL_FIELD_WIDTH),
        _ => format!("{text:>width$}", width = SMALL_FIELD_WIDTH),
    };
    Ok(padded)
}

/// Shortest representation of `value` that fits in one small field, using
/// the Nastran exponent shorthand when the plain form is too long.
fn format_real(value: f64, index: usize) -> Result<String> {
    if value == 0.0 {
        return Ok("0.".to_string());
    }
    if !value.is_finite() {
        return Err(CardError::Width {
            index,
            value: value.to_string(),
        });
    }

    let plain = value.to_string();
    if !plain.contains(['e', 'E']) {
        let plain = if plain.contains('.') { plain } else { format!("{plain}.") };
        if plain.len() <= SMALL_FIELD_WIDTH {
            return Ok(plain);
        }
    }

    for precision in (0..=SMALL_FIELD_WIDTH).rev() {
        let sci = format!("{value:.precision$e}");
        let Some((mantissa, exponent)) = sci.split_once('e') else {
            continue;
        };
        let Ok(exponent) = exponent.parse::<i32>() else {
            continue;
        };
        let mantissa = if mantissa.contains('.') {
            mantissa.trim_end_matches('0').to_string()
        } else {
            format!("{mantissa}.")
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        let candidate = format!("{mantissa}{sign}{}", exponent.abs());
        if candidate.len() <= SMALL_FIELD_WIDTH {
            return Ok(candidate);
        }
    }

    Err(CardError::Width {
        index,
        value: value.to_string(),
    })
}
