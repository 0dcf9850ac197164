//! Embedded static resources.
//!
//! - `template` - typed placeholder substitution
//! - `admin` - admin dashboard page

mod template;

pub use template::{Template, TemplateVars};

pub mod admin {
    use super::{Template, TemplateVars};
    use crate::utils::html::escape;

    /// Variables for dashboard.html.
    pub struct DashboardVars {
        pub site_name: String,
        pub ui_lang: String,
        /// Mount point of the admin app, e.g. `/admin`.
        pub admin_root: String,
        pub view: &'static str,
    }

    impl TemplateVars for DashboardVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__SITE_NAME__", &escape(&self.site_name))
                .replace("__UI_LANG__", &escape(&self.ui_lang))
                .replace("__ADMIN_ROOT__", &escape(&self.admin_root))
                .replace("__VIEW__", &escape(self.view))
        }
    }

    /// Single page shell shared by all dashboard views.
    pub const DASHBOARD_HTML: Template<DashboardVars> =
        Template::new(include_str!("admin/dashboard.html"));
}
