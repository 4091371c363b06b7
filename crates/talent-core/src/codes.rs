//! Public code generation for assessments and submissions.

use uuid::Uuid;

/// A short uppercase code such as `ASS_3F9A21C07B4D`.
pub fn assessment_code() -> String {
    prefixed("ASS")
}

/// A short uppercase code such as `SUB_0C81D2E4A95F`.
pub fn submission_code() -> String {
    prefixed("SUB")
}

fn prefixed(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", id[..12].to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_carry_prefix_and_fixed_length() {
        let code = submission_code();
        assert!(code.starts_with("SUB_"));
        assert_eq!(code.len(), 16);
        assert_ne!(code, submission_code());
        assert!(assessment_code().starts_with("ASS_"));
    }
}
