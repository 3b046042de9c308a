use serde::{Deserialize, Serialize};

use crate::error::CommonError;

pub const DEFAULT_MAP_LATITUDE: f64 = -23.5284;
pub const DEFAULT_MAP_LONGITUDE: f64 = -46.3437;
pub const DEFAULT_MAP_ZOOM: i32 = 15;

/// The single `site_config` row (id = 1). Field names on the wire match the
/// columns the admin UI already uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub id: i32,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub email: String,
    pub instagram: String,
    pub whatsapp: String,
    #[serde(rename = "mapa_latitude")]
    pub map_latitude: f64,
    #[serde(rename = "mapa_longitude")]
    pub map_longitude: f64,
    #[serde(rename = "mapa_zoom")]
    pub map_zoom: i32,
}

/// Validated replacement values for the config row.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfigUpdate {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub instagram: String,
    pub whatsapp: String,
    pub map_latitude: f64,
    pub map_longitude: f64,
    pub map_zoom: i32,
}

/// `PUT /api/config` body as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfigPayload {
    pub nome: Option<String>,
    pub endereco: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub whatsapp: Option<String>,
    pub mapa_latitude: Option<f64>,
    pub mapa_longitude: Option<f64>,
    pub mapa_zoom: Option<i32>,
}

impl SiteConfigPayload {
    /// All six contact fields are required and must be non-blank.
    /// Map settings fall back to the clinic's location.
    pub fn validate(self) -> Result<SiteConfigUpdate, CommonError> {
        let required = [
            ("nome", &self.nome),
            ("endereco", &self.endereco),
            ("telefone", &self.telefone),
            ("email", &self.email),
            ("instagram", &self.instagram),
            ("whatsapp", &self.whatsapp),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, v)| is_blank(v))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(CommonError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(SiteConfigUpdate {
            name: self.nome.unwrap_or_default(),
            address: self.endereco.unwrap_or_default(),
            phone: self.telefone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            instagram: self.instagram.unwrap_or_default(),
            whatsapp: self.whatsapp.unwrap_or_default(),
            map_latitude: self.mapa_latitude.unwrap_or(DEFAULT_MAP_LATITUDE),
            map_longitude: self.mapa_longitude.unwrap_or(DEFAULT_MAP_LONGITUDE),
            map_zoom: self.mapa_zoom.unwrap_or(DEFAULT_MAP_ZOOM),
        })
    }
}

/// A message left through the contact form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPayload {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub mensagem: Option<String>,
}

impl ContactPayload {
    pub fn validate(self) -> Result<ContactMessage, CommonError> {
        match (self.nome, self.email, self.mensagem) {
            (Some(name), Some(email), Some(message))
                if !name.trim().is_empty()
                    && !email.trim().is_empty()
                    && !message.trim().is_empty() =>
            {
                Ok(ContactMessage {
                    name,
                    email,
                    message,
                })
            }
            _ => Err(CommonError::Validation(
                "Incomplete data: nome, email and mensagem are required".to_string(),
            )),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> SiteConfigPayload {
        SiteConfigPayload {
            nome: Some("Cerqueira Psicologia".into()),
            endereco: Some("Rua das Flores, 100".into()),
            telefone: Some("(11) 4000-0000".into()),
            email: Some("contato@example.com".into()),
            instagram: Some("@cerqueira.psicologia".into()),
            whatsapp: Some("5511999999999".into()),
            ..Default::default()
        }
    }

    #[test]
    fn complete_payload_validates_with_map_defaults() {
        let update = full_payload().validate().unwrap();
        assert_eq!(update.name, "Cerqueira Psicologia");
        assert_eq!(update.map_latitude, DEFAULT_MAP_LATITUDE);
        assert_eq!(update.map_longitude, DEFAULT_MAP_LONGITUDE);
        assert_eq!(update.map_zoom, DEFAULT_MAP_ZOOM);
    }

    #[test]
    fn missing_fields_are_listed_in_order() {
        let payload = SiteConfigPayload {
            endereco: None,
            whatsapp: Some("   ".into()),
            ..full_payload()
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: endereco, whatsapp");
    }

    #[test]
    fn explicit_map_values_are_kept() {
        let payload = SiteConfigPayload {
            mapa_latitude: Some(-22.9),
            mapa_zoom: Some(12),
            ..full_payload()
        };
        let update = payload.validate().unwrap();
        assert_eq!(update.map_latitude, -22.9);
        assert_eq!(update.map_zoom, 12);
    }

    #[test]
    fn contact_requires_all_fields() {
        let ok = ContactPayload {
            nome: Some("Ana".into()),
            email: Some("ana@example.com".into()),
            mensagem: Some("Gostaria de agendar".into()),
        };
        assert!(ok.validate().is_ok());

        let missing = ContactPayload {
            nome: Some("Ana".into()),
            email: None,
            mensagem: Some("Oi".into()),
        };
        assert!(matches!(missing.validate(), Err(CommonError::Validation(_))));
    }
}
