//! Domain name normalization.
//!
//! A domain is accepted when, after trimming and lowercasing, it ends with
//! `.` followed by the top-level label. The part before the label is the
//! lookup key the contract is queried with.

/// Top-level label of the Abstract Name Service.
pub const TLD: &str = "abs";

/// Extracts the canonical name part of `domain` under the label `tld`.
///
/// Returns `None` when the input does not end in `.<tld>` (case-insensitive),
/// or when the remaining name part is empty or ends with `.` (which rejects
/// inputs such as `a..abs`).
#[must_use]
pub fn normalize_name_part(domain: &str, tld: &str) -> Option<String> {
    let lower = domain.trim().to_lowercase();
    let name_part = lower
        .strip_suffix(tld.to_lowercase().as_str())?
        .strip_suffix('.')?;
    if name_part.is_empty() || name_part.ends_with('.') {
        return None;
    }
    Some(name_part.to_owned())
}

/// Appends the lowercased top-level label to a name part.
#[must_use]
pub fn with_tld(name_part: &str, tld: &str) -> String {
    format!("{name_part}.{}", tld.to_lowercase())
}

/// Returns `true` if `name` looks like a domain under `tld`.
///
/// This is a cheap suffix test used to decide whether resolution is worth
/// attempting; it does not validate the name part.
#[must_use]
pub fn is_ans_domain(name: &str, tld: &str) -> bool {
    let lower = name.trim().to_lowercase();
    lower
        .strip_suffix(tld.to_lowercase().as_str())
        .is_some_and(|rest| rest.ends_with('.'))
}
