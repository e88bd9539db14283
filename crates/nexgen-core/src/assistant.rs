use chrono::Utc;

use crate::llm::LlmService;
use crate::model::Reservation;

/// Chat context is capped so a busy month of reservations does not blow
/// the prompt budget.
const CHAT_CONTEXT_LIMIT: usize = 20;

/// AI assistant features for the reservation side of the dashboard.
///
/// These never return `Err`: the UI shows whatever string comes back, so
/// failures are folded into fixed user-facing messages. The `Option` on
/// the service is the "no API key configured" state.
pub struct Assistant<'a> {
    llm: Option<&'a LlmService>,
}

impl<'a> Assistant<'a> {
    pub fn new(llm: Option<&'a LlmService>) -> Self {
        Self { llm }
    }

    /// Generate a pre-shift briefing from today's reservations.
    pub async fn shift_briefing(&self, reservations: &[Reservation]) -> String {
        let Some(llm) = self.llm else {
            return "Error: API Key missing. Unable to generate briefing.".to_string();
        };

        let today = Utc::now().date_naive().to_string();
        let todays: Vec<&Reservation> =
            reservations.iter().filter(|r| r.date == today).collect();

        let data = serde_json::to_string_pretty(&todays).unwrap_or_else(|_| "[]".to_string());

        let prompt = format!(
            r#"You are an expert Restaurant Manager Assistant.
Analyze the following list of reservations for today ({today}) and provide a "Pre-Shift Briefing" for the owner.

Data:
{data}

Structure your response in Markdown with these sections:
1. **Summary**: Total covers, peak time, and general vibe.
2. **Critical Alerts**: Large groups (6+), dietary restrictions, or VIPs.
3. **Kitchen Prep**: Specific dishes to prep based on requests or general volume.
4. **Staffing Advice**: Where to allocate servers (e.g., "Need strong server for Table 12").
5. **Action Items**: 3 bullet points of what the owner needs to do right now.

Tone: Professional, concise, and actionable."#
        );

        match llm.generate(&prompt, None).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "No briefing generated.".to_string(),
            Err(e) => {
                tracing::error!("briefing generation failed: {}", e);
                "Failed to generate shift briefing. Please check your connection or API key."
                    .to_string()
            }
        }
    }

    /// Free-form chat about the reservation book.
    pub async fn chat(&self, message: &str, context: &[Reservation]) -> String {
        let Some(llm) = self.llm else {
            return "Error: API Key missing.".to_string();
        };

        let system = "You are RestoBot, a helpful AI assistant for a restaurant owner.\n\
                      You have access to the current reservations list.\n\
                      Answer questions about the schedule, guests, or general restaurant management.\n\
                      Be concise and helpful.";

        let capped = &context[..context.len().min(CHAT_CONTEXT_LIMIT)];
        let context_json = serde_json::to_string(capped).unwrap_or_else(|_| "[]".to_string());
        let prompt = format!("Current Reservations Context: {context_json}\n\nUser: {message}");

        match llm.generate(&prompt, Some(system)).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "I'm not sure how to answer that.".to_string(),
            Err(e) => {
                tracing::error!("assistant chat failed: {}", e);
                "Sorry, I'm having trouble connecting to the brain.".to_string()
            }
        }
    }
}
