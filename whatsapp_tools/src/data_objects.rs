use serde::{Deserialize, Serialize};

/// The envelope posted to `/{phone_number_id}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub messaging_product: String,
    /// Recipient phone number in international format, without a leading `+`.
    pub to: String,
    #[serde(flatten)]
    pub content: MessageContent,
}

impl OutboundMessage {
    pub fn text<S: Into<String>>(to: S, body: S) -> Self {
        let text = TextBody { preview_url: false, body: body.into() };
        Self { messaging_product: "whatsapp".into(), to: to.into(), content: MessageContent::Text { text } }
    }

    pub fn template<S: Into<String>>(to: S, name: S, language: S, params: &[String]) -> Self {
        let parameters =
            params.iter().map(|p| TemplateParameter { kind: "text".into(), text: p.clone() }).collect::<Vec<_>>();
        let template = TemplateBody {
            name: name.into(),
            language: Language { code: language.into() },
            components: vec![TemplateComponent { kind: "body".into(), parameters }],
        };
        Self { messaging_product: "whatsapp".into(), to: to.into(), content: MessageContent::Template { template } }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: TextBody },
    Template { template: TemplateBody },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBody {
    pub preview_url: bool,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateBody {
    pub name: String,
    pub language: Language,
    pub components: Vec<TemplateComponent>,
}

/// The language code must be exactly the one the template was approved with (e.g. `es`, `es_CO`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateComponent {
    #[serde(rename = "type")]
    pub kind: String,
    pub parameters: Vec<TemplateParameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateParameter {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub messaging_product: String,
    #[serde(default)]
    pub contacts: Vec<WhatsAppContact>,
    #[serde(default)]
    pub messages: Vec<SentMessage>,
}

impl MessageResponse {
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhatsAppContact {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub wa_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: String,
    #[serde(default)]
    pub message_status: Option<String>,
}
