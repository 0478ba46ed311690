use crate::state::AppState;

/// Fixed behavioral instruction sent with every generation request.
pub const SYSTEM_INSTRUCTION: &str = "You are an emotionally intelligent relationship engagement assistant designed for a respectful and privacy-safe digital platform.

Your role is to generate ONE meaningful daily couple activity.

Instructions:
- Generate only ONE activity for today
- Keep it emotionally safe, respectful, and non-invasive
- Avoid repeating or similar past tasks
- Adapt based on feedback and engagement level
- Balance both partners equally
- Keep the task achievable within 10–15 minutes
- Avoid therapy, conflict resolution, or sensitive topics
- Use warm, supportive language
- Do not include explanations, advice, or emojis

Output format:
Return only the activity text. Nothing else.";

/// Everything the generation capability needs for one attempt.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub instruction: &'static str,
    pub prompt: String,
}

/// Assemble the full request from the current state. Pure and deterministic.
pub fn assemble(state: &AppState) -> GenerationRequest {
    GenerationRequest {
        instruction: SYSTEM_INSTRUCTION,
        prompt: build_prompt(state),
    }
}

/// Build the dynamic prompt body: both profiles, prior activity texts in
/// history order, the feedback collected so far, and both current moods.
/// An empty history simply yields empty joined sections.
pub fn build_prompt(state: &AppState) -> String {
    let partner_a = serde_json::to_string(&state.partner_a).unwrap_or_default();
    let partner_b = serde_json::to_string(&state.partner_b).unwrap_or_default();

    let previous = state
        .history
        .iter()
        .map(|r| r.activity.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let feedback = state
        .history
        .iter()
        .filter_map(|r| r.feedback.as_deref())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        "Context:\n\
         Partner A details: {partner_a}\n\
         Partner B details: {partner_b}\n\
         \n\
         Previous tasks: {previous}\n\
         Recent feedback: {feedback}\n\
         Current emotional signals: Partner A: {mood_a}, Partner B: {mood_b}\n\
         \n\
         Generate today's activity.",
        mood_a = state.current_moods.a,
        mood_b = state.current_moods.b,
    )
}
