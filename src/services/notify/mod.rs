pub mod telegram;

use async_trait::async_trait;

/// Best-effort sink for lead/booking summaries. Delivery failure is logged
/// and surfaced as a soft warning, never an error for the submitting flow.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn send_lead(&self, text: &str) -> anyhow::Result<()>;
}

/// Used when no sink is configured.
pub struct NoopSink;

#[async_trait]
impl LeadSink for NoopSink {
    async fn send_lead(&self, _text: &str) -> anyhow::Result<()> {
        tracing::debug!("lead sink not configured, dropping notification");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LeadSummary {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub car_brand: String,
    pub car_model: String,
    pub year: String,
    pub problem: String,
    pub preferred_date: String,
    pub preferred_time: String,
}

pub fn format_lead_message(lead: &LeadSummary) -> String {
    let or_dash = |s: &str| {
        if s.trim().is_empty() {
            "-".to_string()
        } else {
            s.trim().to_string()
        }
    };
    [
        "Новая заявка с сайта Автопапа".to_string(),
        String::new(),
        format!("Имя: {}", lead.name),
        format!("Телефон: {}", lead.phone),
        format!("Email: {}", or_dash(&lead.email)),
        format!("Авто: {} {}", or_dash(&lead.car_brand), or_dash(&lead.car_model)),
        format!("Год: {}", or_dash(&lead.year)),
        format!("Проблема: {}", lead.problem),
        format!("Желаемая дата: {}", or_dash(&lead.preferred_date)),
        format!("Желаемое время: {}", or_dash(&lead.preferred_time)),
    ]
    .join("\n")
}
