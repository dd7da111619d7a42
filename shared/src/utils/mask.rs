//! Log-safe rendering of OTP subjects

/// Mask a subject for logging, keeping only the last four characters.
///
/// Subjects are opaque (usually phone numbers), so this works on characters
/// rather than bytes and never assumes a particular format.
pub fn mask_subject(subject: &str) -> String {
    let count = subject.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = subject.chars().skip(count - 4).collect();
    format!("***{}", tail)
}
