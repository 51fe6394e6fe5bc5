//! Compose in browser
//!
//! Hands the current text to an external chat page as a query parameter.
//! An empty document sends a starter prompt instead.

/// Sent in place of an empty document
pub const EMPTY_PROMPT: &str = "start with one sentence";

/// The text to compose with: the content, or [`EMPTY_PROMPT`] when empty
pub fn compose_prompt(content: &str) -> &str {
    if content.is_empty() {
        EMPTY_PROMPT
    } else {
        content
    }
}

/// `base` followed by the percent-encoded prompt
///
/// `base` is expected to end with the parameter name, e.g.
/// `https://chat.openai.com/?q=`.
pub fn compose_url(base: &str, content: &str) -> String {
    let prompt = compose_prompt(content);
    let mut url = String::with_capacity(base.len() + prompt.len() * 3);
    url.push_str(base);
    encode_query_value(prompt, &mut url);
    url
}

/// Percent-encode `value` for use as a single query parameter value
///
/// Unreserved characters and the sub-delimiters that cannot end the value
/// pass through; `&`, `=`, `+`, `#`, spaces and all non-ASCII bytes are
/// escaped.
fn encode_query_value(value: &str, out: &mut String) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    for &byte in value.as_bytes() {
        let keep = byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'-' | b'.'
                    | b'_'
                    | b'~'
                    | b'!'
                    | b'$'
                    | b'\''
                    | b'('
                    | b')'
                    | b'*'
                    | b','
                    | b'/'
                    | b':'
                    | b';'
                    | b'?'
                    | b'@'
            );

        if keep {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX[usize::from(byte >> 4)] as char);
            out.push(HEX[usize::from(byte & 0x0F)] as char);
        }
    }
}
