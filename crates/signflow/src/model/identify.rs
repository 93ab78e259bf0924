//! Identify methods: how a signer is recognised and reached.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifyMethodKind {
    Account,
    Email,
    Sms,
    Signal,
    Telegram,
    Whatsapp,
    Xmpp,
}

impl IdentifyMethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifyMethodKind::Account => "account",
            IdentifyMethodKind::Email => "email",
            IdentifyMethodKind::Sms => "sms",
            IdentifyMethodKind::Signal => "signal",
            IdentifyMethodKind::Telegram => "telegram",
            IdentifyMethodKind::Whatsapp => "whatsapp",
            IdentifyMethodKind::Xmpp => "xmpp",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "account" => Some(IdentifyMethodKind::Account),
            "email" => Some(IdentifyMethodKind::Email),
            "sms" => Some(IdentifyMethodKind::Sms),
            "signal" => Some(IdentifyMethodKind::Signal),
            "telegram" => Some(IdentifyMethodKind::Telegram),
            "whatsapp" => Some(IdentifyMethodKind::Whatsapp),
            "xmpp" => Some(IdentifyMethodKind::Xmpp),
            _ => None,
        }
    }

    /// Normalizes and validates a raw value for this kind.
    fn normalize(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        match self {
            IdentifyMethodKind::Email => {
                let value = value.to_ascii_lowercase();
                let (local, domain) = value.split_once('@')?;
                if local.is_empty() || domain.is_empty() || domain.contains('@') {
                    return None;
                }
                Some(value)
            }
            IdentifyMethodKind::Sms | IdentifyMethodKind::Signal | IdentifyMethodKind::Whatsapp => {
                let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                let number = digits.strip_prefix('+').unwrap_or(&digits);
                if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                Some(digits)
            }
            IdentifyMethodKind::Account
            | IdentifyMethodKind::Telegram
            | IdentifyMethodKind::Xmpp => Some(value.to_string()),
        }
    }
}

/// A raw identify method as submitted by a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyMethodInput {
    pub method: String,
    pub value: String,
    #[serde(default = "default_mandatory")]
    pub mandatory: bool,
}

fn default_mandatory() -> bool {
    true
}

impl IdentifyMethodInput {
    pub fn new(method: &str, value: &str) -> Self {
        Self {
            method: method.to_string(),
            value: value.to_string(),
            mandatory: true,
        }
    }
}

/// A resolved identify method instance bound (once saved) to a sign request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifyMethod {
    pub id: Option<i64>,
    pub sign_request_id: Option<i64>,
    pub kind: IdentifyMethodKind,
    pub value: String,
    pub mandatory: bool,
    pub notify: bool,
}

impl IdentifyMethod {
    pub fn new(kind: IdentifyMethodKind, value: &str) -> Self {
        Self {
            id: None,
            sign_request_id: None,
            kind,
            value: value.to_string(),
            mandatory: true,
            notify: false,
        }
    }

    pub fn set_notify(&mut self, notify: bool) {
        self.notify = notify;
    }

    /// Name shown to other participants when no display name was given.
    pub fn display_name(&self) -> &str {
        &self.value
    }
}

/// Resolves raw inputs into identify method instances.
///
/// Entries with an unknown method or an invalid value are skipped; the
/// caller decides whether an empty result is an error. Duplicate
/// `(kind, value)` pairs collapse to the first occurrence.
pub fn resolve_identify_methods(inputs: &[IdentifyMethodInput]) -> Vec<IdentifyMethod> {
    let mut resolved: Vec<IdentifyMethod> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let Some(kind) = IdentifyMethodKind::parse(&input.method) else {
            log::debug!("Skipping unknown identify method '{}'", input.method);
            continue;
        };
        let Some(value) = kind.normalize(&input.value) else {
            log::debug!("Skipping invalid {} identify value", kind.as_str());
            continue;
        };
        if resolved.iter().any(|m| m.kind == kind && m.value == value) {
            continue;
        }
        let mut method = IdentifyMethod::new(kind, &value);
        method.mandatory = input.mandatory;
        resolved.push(method);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_skips_unknown_and_invalid() {
        let inputs = vec![
            IdentifyMethodInput::new("carrier-pigeon", "coo"),
            IdentifyMethodInput::new("email", "not-an-email"),
            IdentifyMethodInput::new("Email", " Alice@Example.com "),
        ];
        let resolved = resolve_identify_methods(&inputs);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind, IdentifyMethodKind::Email);
        assert_eq!(resolved[0].value, "alice@example.com");
        assert!(resolved[0].mandatory);
        assert!(!resolved[0].notify);
    }

    #[test]
    fn test_resolve_phone_kinds() {
        let inputs = vec![
            IdentifyMethodInput::new("sms", "+55 21 99999 0000"),
            IdentifyMethodInput::new("whatsapp", "call me"),
        ];
        let resolved = resolve_identify_methods(&inputs);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].value, "+5521999990000");
    }

    #[test]
    fn test_resolve_collapses_duplicates() {
        let inputs = vec![
            IdentifyMethodInput::new("account", "bob"),
            IdentifyMethodInput::new("account", " bob "),
        ];
        assert_eq!(resolve_identify_methods(&inputs).len(), 1);
    }

    #[test]
    fn test_resolve_empty_input() {
        assert!(resolve_identify_methods(&[]).is_empty());
    }

    #[test]
    fn test_input_deserializes_with_default_mandatory() {
        let input: IdentifyMethodInput =
            serde_json::from_str(r#"{"method":"email","value":"a@b.c"}"#).unwrap();
        assert!(input.mandatory);
    }
}
