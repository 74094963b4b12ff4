//! SSO report display model

use serde::Serialize;
use tabled::Tabled;

use super::common::{EMPTY, format_optional, truncate_string};
use crate::audit::OwningObject;

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// One service principal per row with its SSO classification
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SsoDisplay {
    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "APP ID")]
    pub app_id: String,

    #[tabled(rename = "SSO TYPE")]
    pub sso_type: String,

    #[tabled(rename = "SOURCE")]
    pub source: String,

    #[tabled(rename = "SIGNING CERT")]
    pub signing_certificate: String,

    #[tabled(rename = "SAML HINTS")]
    pub saml_indicators: String,

    #[tabled(rename = "EMAILS")]
    pub notification_emails: usize,

    #[tabled(rename = "LOGIN URL")]
    pub login_url: String,

    #[tabled(rename = "LOGOUT URL")]
    pub logout_url: String,

    #[tabled(rename = "REPLY URLS")]
    pub reply_urls: usize,

    #[tabled(rename = "MANAGED APP")]
    pub managed_app: String,
}

impl From<&OwningObject> for SsoDisplay {
    fn from(object: &OwningObject) -> Self {
        let managed_app = format_optional(object.managed_app.as_deref());
        let name = truncate_string(&object.display_name, 40);

        match &object.sso {
            Some(sso) => Self {
                name,
                app_id: object.app_id.clone(),
                sso_type: sso.sso_type.to_string(),
                source: sso.source.to_string(),
                signing_certificate: yes_no(sso.has_signing_certificate),
                saml_indicators: yes_no(sso.has_saml_indicators),
                notification_emails: sso.notification_email_count,
                login_url: truncate_string(&format_optional(sso.login_url.as_deref()), 50),
                logout_url: truncate_string(&format_optional(sso.logout_url.as_deref()), 50),
                reply_urls: sso.reply_url_count,
                managed_app,
            },
            None => Self {
                name,
                app_id: object.app_id.clone(),
                sso_type: EMPTY.to_string(),
                source: EMPTY.to_string(),
                signing_certificate: EMPTY.to_string(),
                saml_indicators: EMPTY.to_string(),
                notification_emails: 0,
                login_url: EMPTY.to_string(),
                logout_url: EMPTY.to_string(),
                reply_urls: 0,
                managed_app,
            },
        }
    }
}
