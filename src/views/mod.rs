// Server-rendered pages. Templates are compiled once per process.
use axum::response::Html;
use once_cell::sync::Lazy;
use tera::{Context, Tera};

use crate::error::WebError;

static TEMPLATES: Lazy<Result<Tera, String>> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("templates/base.html")),
        ("login.html", include_str!("templates/login.html")),
        ("hoa_create.html", include_str!("templates/hoa_create.html")),
        ("hoa_user_create.html", include_str!("templates/hoa_user_create.html")),
        ("manage_hoa.html", include_str!("templates/manage_hoa.html")),
        ("hoa_users.html", include_str!("templates/hoa_users.html")),
        ("hoa_edit.html", include_str!("templates/hoa_edit.html")),
        ("security.html", include_str!("templates/security.html")),
        ("delete_confirm.html", include_str!("templates/delete_confirm.html")),
        ("recycle_bin.html", include_str!("templates/recycle_bin.html")),
        ("permanent_delete.html", include_str!("templates/permanent_delete.html")),
        ("error.html", include_str!("templates/error.html")),
    ])
    .map_err(|e| format!("{:?}", e))?;
    Ok(tera)
});

/// Context pre-populated with the signed-in administrator (drives the nav bar)
pub fn page(admin: Option<&str>) -> Context {
    let mut context = Context::new();
    if let Some(admin) = admin {
        context.insert("admin", admin);
    }
    context
}

pub fn render(template: &str, context: &Context) -> Result<Html<String>, WebError> {
    let tera = TEMPLATES.as_ref().map_err(|e| {
        tracing::error!("Template compilation failed: {}", e);
        WebError::internal_server_error("Templates unavailable")
    })?;

    tera.render(template, context).map(Html).map_err(|e| {
        tracing::error!("Template render error in {}: {:?}", template, e);
        WebError::internal_server_error("Failed to render page")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_templates_compile() {
        assert!(TEMPLATES.is_ok(), "{:?}", TEMPLATES.as_ref().err());
    }

    #[test]
    fn login_page_has_no_navigation() {
        let html = render("login.html", &page(None)).unwrap().0;
        assert!(html.contains("Management Login"));
        assert!(!html.contains("/dashboard/security"));
    }

    #[test]
    fn navigation_shown_for_admin() {
        let mut context = page(Some("admin"));
        context.insert("hoas", &Vec::<serde_json::Value>::new());
        let html = render("manage_hoa.html", &context).unwrap().0;
        assert!(html.contains("/dashboard/recycle-bin"));
        assert!(html.contains("No HOAs yet."));
    }

    #[test]
    fn tenant_names_are_escaped() {
        let mut context = page(Some("admin"));
        context.insert(
            "hoas",
            &vec![json!({
                "id": 7,
                "name": "<script>alert(1)</script>",
                "schema_name": "hoa_script_alert_1_script_",
                "subscription_start": "2024-01-01",
                "subscription_end": "2024-12-31",
                "status": "Active"
            })],
        );
        let html = render("manage_hoa.html", &context).unwrap().0;
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("/toggle-hoa/7"));
    }

    #[test]
    fn error_page_renders_message() {
        let mut context = page(None);
        context.insert("status", &404);
        context.insert("message", "HOA not found");
        let html = render("error.html", &context).unwrap().0;
        assert!(html.contains("HOA not found"));
    }
}
