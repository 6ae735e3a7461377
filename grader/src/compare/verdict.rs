use serde::{Deserialize, Serialize};

/// Exit status the comparator uses when it cannot read its inputs (`-1` in C).
pub const COMPARATOR_ERROR_CODE: i32 = 255;

/// Meaning of a comparator exit code.
///
/// The course comparator returns 1 for identical files, 2 for different
/// files, and 3 for files that only differ in case or whitespace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    Identical,
    Different,
    Similar,
    ComparatorError,
    Unknown { code: i32 },
    /// Killed by a signal or the timeout; there is no exit code.
    Aborted,
}

pub fn classify_exit(exit_code: Option<i32>) -> Verdict {
    match exit_code {
        Some(1) => Verdict::Identical,
        Some(2) => Verdict::Different,
        Some(3) => Verdict::Similar,
        Some(COMPARATOR_ERROR_CODE) => Verdict::ComparatorError,
        Some(code) => Verdict::Unknown { code },
        None => Verdict::Aborted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_documented_codes() {
        assert_eq!(classify_exit(Some(1)), Verdict::Identical);
        assert_eq!(classify_exit(Some(2)), Verdict::Different);
        assert_eq!(classify_exit(Some(3)), Verdict::Similar);
        assert_eq!(classify_exit(Some(255)), Verdict::ComparatorError);
    }

    #[test]
    fn unknown_and_missing_codes() {
        assert_eq!(classify_exit(Some(0)), Verdict::Unknown { code: 0 });
        assert_eq!(classify_exit(None), Verdict::Aborted);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&Verdict::Unknown { code: 7 }).expect("json");
        assert_eq!(json, r#"{"kind":"unknown","code":7}"#);
    }
}
