use crate::classifier::classify_or_other;
use crate::error::Result;

/// Print the classified record. Malformed bodies are shown as `other`
/// with a warning, the same way `parse` and `add` record them.
pub fn run(body: &str) -> Result<()> {
    let (parsed, error) = classify_or_other(body);
    if let Some(e) = error {
        tracing::warn!(error = %e, "malformed message recorded as other");
    }
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
