//! Handlebars page templates, compiled into the binary.

use actix_web::HttpResponse;
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::FrontendError;

const PARTIALS: [(&str, &str); 2] = [
    ("header", include_str!("../templates/header.hbs")),
    ("footer", include_str!("../templates/footer.hbs")),
];

const PAGES: [(&str, &str); 7] = [
    ("index", include_str!("../templates/index.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    ("apitest", include_str!("../templates/apitest.hbs")),
    ("account", include_str!("../templates/account.hbs")),
    ("noaccount", include_str!("../templates/noaccount.hbs")),
    ("bene", include_str!("../templates/bene.hbs")),
    ("claims", include_str!("../templates/claims.hbs")),
];

pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, FrontendError> {
        let mut registry = Handlebars::new();

        for (name, source) in PARTIALS {
            registry
                .register_partial(name, source)
                .map_err(Box::new)?;
        }
        for (name, source) in PAGES {
            registry
                .register_template_string(name, source)
                .map_err(Box::new)?;
        }

        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, FrontendError> {
        Ok(self.registry.render(name, data)?)
    }

    /// Render `name` as a 200 HTML response.
    pub fn page<T: Serialize>(&self, name: &str, data: &T) -> Result<HttpResponse, FrontendError> {
        let html = self.render(name, data)?;
        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_all_pages_render() {
        let templates = Templates::new().unwrap();
        let data = json!({
            "user_name": "Ada",
            "auth_url": "https://idp.test/authorize?state=abc",
            "result": "ok",
            "account": { "email": "a@x.com", "beneficiary": "B1" },
            "csrf_token": "t",
            "claims": "{}",
        });

        for (name, _) in PAGES {
            let html = templates.render(name, &data).unwrap();
            assert!(html.contains("</html>"), "page {name}");
        }
    }

    #[test]
    fn test_values_are_escaped() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render(
                "account",
                &json!({ "user_name": "Ada", "account": { "beneficiary": "<b>x</b>" } }),
            )
            .unwrap();

        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains("Signed in as Ada"));
    }
}
