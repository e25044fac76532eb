use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Exhibition,
    Conference,
    TradeShow,
    Corporate,
    Retail,
    Museum,
    Showroom,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Exhibition,
        EventType::Conference,
        EventType::TradeShow,
        EventType::Corporate,
        EventType::Retail,
        EventType::Museum,
        EventType::Showroom,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Exhibition => "exhibition",
            EventType::Conference => "conference",
            EventType::TradeShow => "trade_show",
            EventType::Corporate => "corporate",
            EventType::Retail => "retail",
            EventType::Museum => "museum",
            EventType::Showroom => "showroom",
            EventType::Other => "other",
        }
    }

    /// Accepts `trade_show`, `tradeShow` and the older `eventTypes.tradeShow`
    /// translation keys the site used to post.
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim();
        let key = key.strip_prefix("eventTypes.").unwrap_or(key);
        let normalized: String = key
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "exhibition" => Some(EventType::Exhibition),
            "conference" => Some(EventType::Conference),
            "tradeshow" => Some(EventType::TradeShow),
            "corporate" => Some(EventType::Corporate),
            "retail" => Some(EventType::Retail),
            "museum" => Some(EventType::Museum),
            "showroom" => Some(EventType::Showroom),
            "other" => Some(EventType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeField {
    Name,
    Company,
    Phone,
    Email,
    EventType,
    EventDate,
    Description,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeForm {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub event_type: Option<EventType>,
    pub event_date: Option<NaiveDate>,
    pub description: String,
}

impl IntakeForm {
    /// The backend's single `contact` column: phone first, then email.
    pub fn contact(&self) -> &str {
        if !self.phone.is_empty() {
            &self.phone
        } else {
            &self.email
        }
    }

    pub fn event_date_string(&self) -> String {
        self.event_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Per-field messages for the intake form. `form` holds the banner message
/// that is not tied to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        [
            &self.name,
            &self.company,
            &self.phone,
            &self.email,
            &self.event_type,
            &self.description,
            &self.form,
        ]
        .iter()
        .filter(|e| e.is_some())
        .count()
    }

    pub fn get(&self, field: IntakeField) -> Option<&str> {
        match field {
            IntakeField::Name => self.name.as_deref(),
            IntakeField::Company => self.company.as_deref(),
            IntakeField::Phone => self.phone.as_deref(),
            IntakeField::Email => self.email.as_deref(),
            IntakeField::EventType => self.event_type.as_deref(),
            IntakeField::EventDate => None,
            IntakeField::Description => self.description.as_deref(),
        }
    }

    pub fn clear(&mut self, field: IntakeField) {
        match field {
            IntakeField::Name => self.name = None,
            IntakeField::Company => self.company = None,
            IntakeField::Phone => self.phone = None,
            IntakeField::Email => self.email = None,
            IntakeField::EventType => self.event_type = None,
            IntakeField::EventDate => {}
            IntakeField::Description => self.description = None,
        }
    }
}
