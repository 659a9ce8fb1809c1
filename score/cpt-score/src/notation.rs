//! The line-oriented text notation: header fields (`X:`, `T:`, `M:`,
//! `L:`, `K:`, `V:`, `Q:`), `%%`-prefixed directives, `%` comments, and
//! whitespace-separated body tokens terminated by `|`.

use cpt_pitch::{halftone, Halftone, Key};
use tracing::warn;

use crate::bar::BarObjectKind;
use crate::errors::NotationError;
use crate::fraction::Fraction;
use crate::meter::Meter;
use crate::tune::Tune;

/// Parse a full text score into a [`Tune`].
///
/// # Errors
/// Returns [`NotationError`] on an unknown header field, an ill-formed
/// token, or a body line referencing an undeclared voice.
pub fn parse(text: &str) -> Result<Tune, NotationError> {
    let mut meter = Meter { numerator: 4, denominator: 4 };
    let mut key = Key::new(0);
    let mut unit = Fraction::new(1, 8);
    let mut comment = String::new();
    let mut voice_order: Vec<String> = Vec::new();
    let mut voice_props: Vec<(String, Vec<(String, String)>)> = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        if line.starts_with("%%") || line.starts_with('%') {
            continue;
        }
        if line.starts_with('[') {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let Some((field, rest)) = line.split_once(':') else { continue };
        let rest = rest.trim();
        match field.trim() {
            "X" => {}
            "T" => {
                if !comment.is_empty() {
                    comment.push('\n');
                }
                comment.push_str(rest);
            }
            "M" => meter = Meter::parse(rest)?,
            "L" => unit = parse_unit(rest)?,
            "K" => key = Key::parse(rest).map_or_else(|_| Key::new(0), |k| k),
            "V" => {
                let mut parts = rest.split_whitespace();
                let id = parts.next().unwrap_or_default().to_string();
                let mut props = Vec::new();
                for tok in parts {
                    if let Some((k, v)) = tok.split_once('=') {
                        props.push((k.to_string(), v.trim_matches('"').to_string()));
                    }
                }
                voice_order.push(id.clone());
                voice_props.push((id, props));
            }
            "Q" => {}
            other => {
                let c = other.chars().next().unwrap_or('?');
                return Err(NotationError::UnknownField(c, lineno + 1));
            }
        }
    }

    let mut tune = Tune::new(meter, key.clone(), unit);
    for (id, props) in &voice_props {
        let idx = tune.add_voice(id.clone());
        for (k, v) in props {
            tune.voices_mut()[idx].set_property(k.clone(), v.clone());
        }
    }
    tune.set_comment(comment);

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if !line.starts_with('[') {
            continue;
        }
        let Some(close) = line.find(']') else {
            return Err(NotationError::IllFormedToken(line.to_string(), lineno + 1));
        };
        let header = &line[1..close];
        let Some(vid) = header.strip_prefix("V:") else {
            return Err(NotationError::IllFormedToken(line.to_string(), lineno + 1));
        };
        let voice_idx = voice_order.iter().position(|v| v == vid)
            .ok_or_else(|| NotationError::UndeclaredVoice(vid.to_string(), lineno + 1))?;
        let body = line[close + 1..].trim();
        parse_body_line(&mut tune, voice_idx, body, &key, lineno + 1)?;
    }

    Ok(tune)
}

fn parse_unit(s: &str) -> Result<Fraction, NotationError> {
    let (n, d) = s.split_once('/').ok_or_else(|| NotationError::IllFormedMeter(s.to_string()))?;
    let num: i64 = n.trim().parse().map_err(|_| NotationError::IllFormedMeter(s.to_string()))?;
    let den: i64 = d.trim().parse().map_err(|_| NotationError::IllFormedMeter(s.to_string()))?;
    Ok(Fraction::new(num, den))
}

fn parse_body_line(tune: &mut Tune, voice_idx: usize, body: &str, key: &Key, lineno: usize) -> Result<(), NotationError> {
    let mut bar_idx = None;
    for group in body.split('|') {
        let group = group.trim();
        if bar_idx.is_none() {
            bar_idx = Some(tune.voices_mut()[voice_idx].add_bar(u32::MAX));
        }
        let bar = bar_idx.expect("assigned above");
        for tok in group.split_whitespace() {
            let (kind, duration, bind) = parse_token(tok, key, lineno)?;
            tune.voices_mut()[voice_idx].add(bar, kind, duration, bind)?;
        }
        if !group.is_empty() || body.contains('|') {
            bar_idx = None;
        }
    }
    Ok(())
}

fn parse_token(tok: &str, key: &Key, lineno: usize) -> Result<(BarObjectKind, u32, bool), NotationError> {
    let bind = tok.ends_with('-');
    let tok = tok.strip_suffix('-').unwrap_or(tok);
    let digit_start = tok.find(|c: char| c.is_ascii_digit()).unwrap_or(tok.len());
    let (pitch_part, digits) = tok.split_at(digit_start);
    let duration: u32 = if digits.is_empty() { 1 } else {
        digits.parse().map_err(|_| NotationError::IllFormedToken(tok.to_string(), lineno))?
    };

    if pitch_part == "z" {
        return Ok((BarObjectKind::Pause, duration, bind));
    }

    let (marker, letter_and_octave) = match pitch_part.chars().next() {
        Some(c @ ('^' | '_' | '=')) => (Some(c), &pitch_part[1..]),
        _ => (None, pitch_part),
    };
    let stem_char = letter_and_octave.chars().next()
        .ok_or_else(|| NotationError::IllFormedToken(tok.to_string(), lineno))?;
    if !stem_char.is_ascii_alphabetic() {
        return Err(NotationError::IllFormedToken(tok.to_string(), lineno));
    }
    let stem = stem_char.to_ascii_lowercase().to_string();
    let octave_marks = &letter_and_octave[1..];
    if !octave_marks.chars().all(|c| c == ',' || c == '\'') {
        return Err(NotationError::IllFormedToken(tok.to_string(), lineno));
    }

    let prefix = match marker {
        Some('^') => "^",
        Some('_') => "_",
        Some('=') => "",
        _ => implied_accidental(key, &stem),
    };
    let name = format!("{prefix}{stem_char}{octave_marks}");
    let ht = Halftone::parse(&name)?;
    Ok((BarObjectKind::Tone(ht), duration, bind))
}

fn implied_accidental(key: &Key, stem: &str) -> &'static str {
    for acc in key.accidentals() {
        if acc.stem() == stem {
            return if acc.prefix() == "^" { "^" } else { "_" };
        }
    }
    ""
}

/// Emit a [`Tune`] back to the text notation. `parse(emit(t)) == t` for
/// every tune built through the public API.
#[must_use]
pub fn emit(tune: &Tune) -> String {
    let mut out = String::new();
    out.push_str("X:1\n");
    if !tune.comment().is_empty() {
        for line in tune.comment().lines() {
            out.push_str("T:");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(&format!("M:{}\n", tune.meter()));
    out.push_str(&format!("L:{}\n", tune.unit()));
    out.push_str(&format!("K:{}\n", tune.key()));
    for voice in tune.voices() {
        out.push_str(&format!("V:{}", voice.id()));
        for (k, v) in voice.properties() {
            out.push_str(&format!(" {k}=\"{v}\""));
        }
        out.push('\n');
    }
    for voice in tune.voices() {
        out.push_str(&format!("[V:{}] ", voice.id()));
        let mut first_in_bar = true;
        for bar in voice.bars() {
            for obj in bar.objects() {
                if !first_in_bar {
                    out.push(' ');
                }
                first_in_bar = false;
                out.push_str(&emit_token(obj, tune.key()));
            }
            out.push_str("| ");
            first_in_bar = true;
        }
        out.push('\n');
    }
    out
}

fn emit_token(obj: &crate::bar::BarObject, key: &Key) -> String {
    let mut s = String::new();
    match obj.kind() {
        BarObjectKind::Pause => s.push('z'),
        BarObjectKind::Tone(h) => {
            let stem = h.stem();
            let implied = implied_accidental(key, stem);
            let actual = h.prefix();
            if actual == implied {
                // suppressed: the key signature already implies this accidental
            } else if actual.is_empty() {
                s.push('=');
                warn!(tone = %h, "explicit natural override against key signature");
            } else {
                s.push_str(actual);
            }
            let rest = h.name().trim_start_matches(['^', '_']);
            s.push_str(rest);
        }
    }
    s.push_str(&obj.duration().to_string());
    if obj.bind() {
        s.push('-');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_simple_two_voice_tune() {
        let mut tune = Tune::new(Meter { numerator: 4, denominator: 4 }, Key::new(0), Fraction::new(1, 4));
        let cf = tune.add_voice("1");
        tune.voices_mut()[cf].add_bar(4);
        tune.voices_mut()[cf].add(0, BarObjectKind::Tone(halftone("D")), 4, false).unwrap();

        let text = emit(&tune);
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.voices().len(), tune.voices().len());
        assert_eq!(parsed.voices()[0].bars()[0].objects()[0].halftone(), tune.voices()[0].bars()[0].objects()[0].halftone());
    }
}
