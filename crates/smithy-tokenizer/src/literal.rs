//! Decoding of quoted strings and text blocks.

pub(crate) fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => out.push(unicode_escape(&mut chars)?),
            // Escaped line breaks continue the line.
            Some('\n') => {}
            Some('\r') => {
                if chars.clone().next() == Some('\n') {
                    chars.next();
                }
            }
            Some(other) => {
                return Err(format!("Invalid escape found in string: `\\{}`", other.escape_debug()));
            }
            None => return Err("Unclosed escape at the end of a string".to_owned()),
        }
    }

    Ok(out)
}

fn hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Invalid unicode escape: `\\u{digits}`"));
    }
    u32::from_str_radix(&digits, 16).map_err(|err| format!("Invalid unicode escape: {err}"))
}

fn unicode_escape(chars: &mut std::str::Chars<'_>) -> Result<char, String> {
    let high = hex4(chars)?;

    let code = if (0xD800..0xDC00).contains(&high) {
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return Err("Expected a low surrogate escape after a high surrogate".to_owned());
        }
        let low = hex4(chars)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(format!("Invalid low surrogate: `\\u{low:04X}`"));
        }
        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
    } else {
        high
    };

    char::from_u32(code).ok_or_else(|| format!("Invalid unicode code point: {code:#X}"))
}

/// Contents between the `"""` delimiters, with incidental indentation
/// and trailing spaces removed.
pub(crate) fn text_block(raw: &str) -> Result<String, String> {
    let body = raw
        .strip_prefix("\r\n")
        .or_else(|| raw.strip_prefix('\n'))
        .ok_or_else(|| "Text block must start with a new line".to_owned())?;

    let lines: Vec<&str> =
        body.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)).collect();
    let closing = lines.len() - 1;

    // The closing delimiter line counts even when blank.
    let indent = lines
        .iter()
        .enumerate()
        .filter(|&(index, line)| index == closing || !line.trim().is_empty())
        .map(|(_, line)| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let mut out = String::with_capacity(body.len());
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(line.get(indent..).unwrap_or_default().trim_end_matches([' ', '\t']));
    }

    unescape(&out)
}
