//! Acupuncture point-code canonicalization.
//!
//! Point references arrive in several house styles ("HE-9 Shaochong", "Ren-12", "LIV-3"). They
//! are canonicalized once, when a knowledge base is loaded, so every syndrome uses the same codes.

/// Prefix rewrites applied to the start of a point code, compared case-insensitively.
const PREFIX_REWRITES: &[(&str, &str)] = &[
    ("HE-", "HT"),
    ("LIV-", "LR"),
    ("REN-", "CV"),
    ("DU-", "GV"),
    ("P-", "PC"),
];

/// Canonicalize a raw point reference.
///
/// Keeps the first whitespace-delimited word, rewrites known channel prefixes, removes hyphens and
/// upper-cases channel codes. Extra points without a channel number (e.g. `Taiyang`) are returned
/// unchanged. Returns `None` for blank input.
pub fn canonical_point_code(raw: &str) -> Option<String> {
    let word = raw.split_whitespace().next()?;

    let rewritten = PREFIX_REWRITES
        .iter()
        .find_map(|(from, to)| {
            let head = word.get(..from.len())?;
            let tail = word.get(from.len()..)?;
            head.eq_ignore_ascii_case(from).then(|| format!("{to}{tail}"))
        })
        .unwrap_or_else(|| word.to_string());

    let code: String = rewritten.chars().filter(|c| *c != '-').collect();

    if is_channel_code(&code) {
        Some(code.to_uppercase())
    } else {
        Some(code)
    }
}

/// Letters followed by digits, e.g. `st36` or `CV12`.
fn is_channel_code(code: &str) -> bool {
    let split = code
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit())
        .map(|(i, _)| i);

    match split {
        Some(i) if i > 0 => {
            code[..i].chars().all(|c| c.is_ascii_alphabetic())
                && code[i..].chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}
