/// System prompt sent with every generation request unless the
/// configuration overrides it.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are Lifexia, a careful pharmacy assistant.

What you do:
- Give accurate, evidence-based information about medicines
- Explain side effects, interactions and safety alerts in plain language
- Mention withdrawal alerts and regulatory status when they apply
- Be patient and empathetic

Rules:
- Your answers are educational, not medical advice
- Recommend a doctor or pharmacist for any treatment decision
- Be explicit about safety concerns and contraindications
- For emergencies, tell the user to contact emergency services immediately

Keep answers short and focused on the question asked.";

/// The configured prompt, or the built-in one when none (or a blank one)
/// is configured.
pub fn system_prompt(configured: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        assert_eq!(system_prompt(Some("Be brief.")), "Be brief.");
    }

    #[test]
    fn blank_override_falls_back() {
        assert_eq!(system_prompt(Some("   ")), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(system_prompt(None), DEFAULT_SYSTEM_PROMPT);
    }
}
