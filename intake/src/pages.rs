//! Server-rendered form page.

use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::config::FormConfig;
use crate::form::{FormController, FormField, InputHints, controller::SUBMITTING_LABEL};

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("form.html", include_str!("../templates/form.html"))
        .expect("form template should parse");
    env
});

#[derive(Debug, Serialize)]
struct FieldView {
    name: &'static str,
    label: &'static str,
    #[serde(flatten)]
    hints: InputHints,
    value: String,
}

/// Render the form page for a controller's current fields and status.
pub fn render_form(page: &FormConfig, controller: &FormController) -> Result<String, minijinja::Error> {
    let form = controller.form();
    let fields: Vec<FieldView> = FormField::ALL
        .into_iter()
        .map(|field| FieldView {
            name: field.name(),
            label: field.label(),
            hints: field.hints(),
            value: form.value(field),
        })
        .collect();
    let status = controller.status();

    TEMPLATES.get_template("form.html")?.render(context! {
        title => &page.title,
        heading => &page.heading,
        fields => fields,
        banner => status.banner(),
        submitting => status.is_submitting(),
        submit_label => controller.submit_label(),
        submitting_label => SUBMITTING_LABEL,
    })
}
