//! Response templates
//!
//! Every canned reply lives here. Defaults are compiled in; a YAML file can
//! override any subset of them. Variables use `{variable_name}` syntax.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Names of the canned replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    Welcome,
    PricingRedirect,
    ProductDetail,
    FruitOverview,
    Shipping,
    Quality,
    Company,
    Contact,
    Consultation,
    Fallback,
}

/// Template set, one field per [`TemplateKey`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTemplates {
    pub welcome: String,
    pub pricing_redirect: String,
    pub product_detail: String,
    pub fruit_overview: String,
    pub shipping: String,
    pub quality: String,
    pub company: String,
    pub contact: String,
    pub consultation: String,
    pub fallback: String,
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            welcome: "Hello! Welcome to {company}. I can tell you about our olive oil, rapeseed oil \
                      and fresh Tunisian produce, shipping, quality standards, or help you get a \
                      quote. What would you like to know?"
                .to_string(),
            pricing_redirect: "Our prices depend on volume, packaging, destination and season, so \
                               every offer is prepared individually. I'm opening the quote request \
                               form for you: tell us the product, quantity and destination port and \
                               our sales team will reply within 24 hours."
                .to_string(),
            product_detail: "{name}\n\nOrigin: {origin}\nSeason: {season}\n\nSpecifications:\n\
                             {specs}\n\n{description}{details}\n\nAsk me about pricing if you'd \
                             like a quote."
                .to_string(),
            fruit_overview: "We export fresh Tunisian produce through the season:\n{products}\n\n\
                             Which one would you like to know more about?"
                .to_string(),
            shipping: "We ship worldwide from the ports of Sfax and Radès. Oils travel in \
                       bottles, drums, IBCs or flexitanks; fresh produce moves in reefer \
                       containers at controlled temperature. Typical transit is 3 to 7 days to \
                       European ports and 2 to 4 weeks to the Americas and Asia. We work FOB, CFR \
                       and CIF, and handle phytosanitary certificates, certificates of origin and \
                       all export paperwork."
                .to_string(),
            quality: "Every lot is traceable to its grove or orchard. Our oils are tested by \
                      accredited laboratories for acidity, peroxide value and UV absorbance, and \
                      we work under ISO 22000 with GlobalG.A.P. certified growers for fresh \
                      produce. Lab reports and certificates are supplied with each shipment, and \
                      organic certification is available on request."
                .to_string(),
            company: "{company} is an agricultural trading house based in Sfax, Tunisia. We \
                      source extra virgin olive oil directly from local mills, trade refined \
                      rapeseed oil, and export seasonal fruit and vegetables to importers, \
                      distributors and food manufacturers in over 20 countries."
                .to_string(),
            contact: "You can reach our sales office at {email} or {phone}, {hours}. Our \
                      address is {address}. I'm opening the contact form so you can send us a \
                      message directly."
                .to_string(),
            consultation: "Happy to set up a call with one of our trade specialists. I'm opening \
                           the scheduler so you can pick a day and time that suits you."
                .to_string(),
            fallback: "I can help with our products (olive oil, rapeseed oil, oranges, apples, \
                       peaches, pears, artichokes), pricing and quotes, shipping, quality \
                       standards, our company, or setting up a call. What would you like to \
                       know?"
                .to_string(),
        }
    }
}

impl ResponseTemplates {
    /// Load overrides from a YAML file on top of the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Templates {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let templates: ResponseTemplates =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Templates {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(path = %path.display(), "Loaded response template overrides");
        Ok(templates)
    }

    pub fn get(&self, key: TemplateKey) -> &str {
        match key {
            TemplateKey::Welcome => &self.welcome,
            TemplateKey::PricingRedirect => &self.pricing_redirect,
            TemplateKey::ProductDetail => &self.product_detail,
            TemplateKey::FruitOverview => &self.fruit_overview,
            TemplateKey::Shipping => &self.shipping,
            TemplateKey::Quality => &self.quality,
            TemplateKey::Company => &self.company,
            TemplateKey::Contact => &self.contact,
            TemplateKey::Consultation => &self.consultation,
            TemplateKey::Fallback => &self.fallback,
        }
    }

    /// Render a template with variable substitution
    pub fn render(&self, key: TemplateKey, vars: &[(&str, &str)]) -> String {
        substitute_variables(self.get(key), vars)
    }
}

/// Replace `{name}` placeholders; unknown placeholders are left as-is
pub fn substitute_variables(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{}}}", key), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_template_substitution() {
        let result = substitute_variables(
            "Welcome to {company}, call {phone}",
            &[("company", "Harvest"), ("phone", "123")],
        );
        assert_eq!(result, "Welcome to Harvest, call 123");
    }

    #[test]
    fn test_unknown_placeholder_left_alone() {
        assert_eq!(substitute_variables("Hi {name}", &[]), "Hi {name}");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let yaml = r#"
shipping: "We ship by sea."
"#;
        let templates: ResponseTemplates = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(templates.get(TemplateKey::Shipping), "We ship by sea.");
        assert_eq!(templates.quality, ResponseTemplates::default().quality);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fallback: \"Sorry, ask me something else.\"").unwrap();

        let templates = ResponseTemplates::load(file.path()).unwrap();
        assert_eq!(templates.fallback, "Sorry, ask me something else.");
    }

    #[test]
    fn test_load_missing_file() {
        let result = ResponseTemplates::load("/nonexistent/templates.yaml");
        assert!(matches!(result, Err(ConfigError::Templates { .. })));
    }
}
