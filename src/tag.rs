//! Struct tag parsing.
//!
//! A Go struct tag is a space-separated list of `key:"value"` pairs. Parsing
//! stops at the first malformed pair; everything before it is kept, which
//! matches how `reflect.StructTag.Lookup` treats bad input.

/// Parsed key/value pairs of one field tag, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTag {
    pairs: Vec<(String, String)>,
}

impl StructTag {
    pub fn parse(raw: &str) -> Self {
        let mut pairs = Vec::new();
        let mut rest = raw;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            let key_len = rest
                .bytes()
                .position(|b| b <= b' ' || b == b':' || b == b'"' || b == 0x7f)
                .unwrap_or(rest.len());
            let bytes = rest.as_bytes();
            if key_len == 0
                || key_len + 1 >= rest.len()
                || bytes[key_len] != b':'
                || bytes[key_len + 1] != b'"'
            {
                break;
            }
            let key = &rest[..key_len];
            rest = &rest[key_len + 1..];

            let Some(close) = closing_quote(rest) else {
                break;
            };
            let Some(value) = unquote(&rest[1..close]) else {
                break;
            };
            pairs.push((key.to_string(), value));
            rest = &rest[close + 1..];
        }

        Self { pairs }
    }

    /// Value of the first pair with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Template name for `key`: the tag value up to the first comma.
    ///
    /// `mapstructure:"port,omitempty"` names the key `port`. A missing key or
    /// an empty value yields the empty string.
    pub fn name_for(&self, key: &str) -> String {
        self.get(key)
            .and_then(|v| v.split(',').next())
            .unwrap_or_default()
            .to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Index of the quote closing the string that opens at `s[0]`.
fn closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Some(i),
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    None
}

/// Resolve the escapes of a double-quoted Go string body.
pub(crate) fn unquote(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{7}'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                out.push(char::from(u8::from_str_radix(&hex, 16).ok()?));
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            'U' => {
                let hex: String = chars.by_ref().take(8).collect();
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            _ => return None,
        }
    }
    Some(out)
}
