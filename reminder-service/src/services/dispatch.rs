//! Simulated reminder dispatch.
//!
//! A run picks the due reminders and describes what would be sent. Nothing
//! leaves the process; each dispatch is only logged.

use serde::Serialize;

use crate::models::{PerSubSetting, ReminderEvent};
use crate::services::engine::due_now;
use crate::services::money::format_price;

/// Delivery channels enabled for one reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Channels {
    pub email: bool,
    pub whatsapp: bool,
}

impl Channels {
    pub fn is_empty(&self) -> bool {
        !self.email && !self.whatsapp
    }

    /// Enabled channels joined with ` & `; empty when none is enabled.
    pub fn describe(&self) -> String {
        let mut names = Vec::with_capacity(2);
        if self.email {
            names.push("Email");
        }
        if self.whatsapp {
            names.push("WhatsApp");
        }
        names.join(" & ")
    }
}

impl From<&PerSubSetting> for Channels {
    fn from(setting: &PerSubSetting) -> Self {
        Self {
            email: setting.email,
            whatsapp: setting.whatsapp,
        }
    }
}

/// One reminder that a run would have sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedDispatch {
    pub subscription_id: String,
    pub name: String,
    pub amount: String,
    pub channels: Channels,
}

impl SimulatedDispatch {
    pub fn line(&self) -> String {
        format!(
            "• {} — {} — via {}",
            self.name,
            self.amount,
            self.channels.describe()
        )
    }
}

/// Outcome of a simulated run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchReport {
    pub dispatched: Vec<SimulatedDispatch>,
}

impl DispatchReport {
    pub fn is_empty(&self) -> bool {
        self.dispatched.is_empty()
    }

    /// Text shown to the user after a manual run.
    pub fn message(&self) -> String {
        if self.is_empty() {
            return "No reminders due now.".to_string();
        }
        let lines: Vec<String> = self.dispatched.iter().map(|d| d.line()).collect();
        format!("Simulate sending reminders:\n\n{}", lines.join("\n"))
    }
}

/// Simulate sending every due reminder in `events`.
pub fn simulate_run(events: &[ReminderEvent<'_>]) -> DispatchReport {
    let dispatched: Vec<SimulatedDispatch> = due_now(events)
        .into_iter()
        .map(|event| {
            let channels = Channels::from(&event.setting_for_sub);
            let dispatch = SimulatedDispatch {
                subscription_id: event.subscription.id.clone(),
                name: event.subscription.name.clone(),
                amount: format_price(event.subscription.price, &event.subscription.currency),
                channels,
            };

            if channels.is_empty() {
                tracing::warn!(
                    subscription_id = %dispatch.subscription_id,
                    "Reminder due with no delivery channel enabled"
                );
            } else {
                tracing::info!(
                    subscription_id = %dispatch.subscription_id,
                    channels = %channels.describe(),
                    trigger_date = %event.trigger_date,
                    "Simulated reminder dispatch"
                );
            }
            dispatch
        })
        .collect();

    tracing::info!(due = dispatched.len(), "Reminder run complete");

    DispatchReport { dispatched }
}
