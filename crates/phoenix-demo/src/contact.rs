//! Outbound WhatsApp contact link.
//!
//! The landing page links to a chat with the sales line. Mobile devices get
//! the app scheme, everything else gets the web client.

use serde::Serialize;
use url::Url;
use urlencoding::encode;

use crate::error::DemoError;

pub const DEFAULT_PHONE: &str = "542255605257";
pub const DEFAULT_MESSAGE: &str =
    "Hola Phoenix IA, me interesa el Paquete de Impulso con IA para mi negocio.";

const MOBILE_MARKERS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Mobile,
    Desktop,
}

impl Platform {
    /// Classify a browser user agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }
}

/// Chat link for `platform`, with the phone and message percent-encoded.
///
/// Spaces become `%20`, never `+`: the app scheme does not decode `+`.
pub fn contact_link(platform: Platform, phone: &str, message: &str) -> Result<Url, DemoError> {
    let base = match platform {
        Platform::Mobile => "whatsapp://send",
        Platform::Desktop => "https://web.whatsapp.com/send",
    };
    let mut url = Url::parse(base)?;
    let query = format!("phone={}&text={}", encode(phone), encode(message));
    url.set_query(Some(&query));
    Ok(url)
}

/// Link used before the platform is known.
pub fn fallback_link(phone: &str) -> Result<Url, DemoError> {
    Ok(Url::parse("https://wa.me/")?.join(phone)?)
}
