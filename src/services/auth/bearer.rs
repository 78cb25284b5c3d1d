/*
 * Responsibility
 * - Authorization ヘッダ値が Bearer 形式かどうかの判定 (検証はしない)
 * - "Bearer " を取り除いて生の token を取り出す
 */
use std::borrow::Cow;

pub const BEARER_MARKER: &str = "Bearer";
pub const BEARER_PREFIX: &str = "Bearer ";

/// Cheap structural probe: does `raw` start with the case-sensitive `Bearer` marker?
pub fn is_bearer(raw: &str) -> bool {
    raw.starts_with(BEARER_MARKER)
}

/// Remove the first occurrence of `"Bearer "`; anything else is returned untouched.
///
/// Lenient on purpose: callers normally check [`is_bearer`] first, but stripping a value
/// without the marker is a no-op.
pub fn strip_bearer(raw: &str) -> Cow<'_, str> {
    if let Some(rest) = raw.strip_prefix(BEARER_PREFIX) {
        return Cow::Borrowed(rest);
    }

    match raw.find(BEARER_PREFIX) {
        Some(idx) => {
            let mut out = String::with_capacity(raw.len() - BEARER_PREFIX.len());
            out.push_str(&raw[..idx]);
            out.push_str(&raw[idx + BEARER_PREFIX.len()..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(raw),
    }
}
