use crate::clock::Clock;
use notify_core::templates::{TemplateSource, fill_template};
use std::sync::Arc;
use tracing::warn;

/// Renders an event's template key and arguments into final display text.
///
/// Returns an empty string when the template is missing; callers treat empty
/// output as "do not send".
pub struct MessageFormatter {
    templates: Arc<dyn TemplateSource>,
    clock: Arc<dyn Clock>,
}

impl MessageFormatter {
    pub fn new(templates: Arc<dyn TemplateSource>, clock: Arc<dyn Clock>) -> Self {
        Self { templates, clock }
    }

    pub fn render(&self, key: &str, args: &[String]) -> String {
        let Some(template) = self.templates.template(key) else {
            warn!(key, "no template registered for event");
            return String::new();
        };

        fill_template(&template, &self.clock.short_time(), args)
    }

    /// Looks up a bare template with no substitutions (difficulty labels).
    pub fn label(&self, key: &str) -> Option<String> {
        self.templates.template(key)
    }
}
