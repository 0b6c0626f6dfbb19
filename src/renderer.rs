//! Placeholder template rendering for fragments.
//! Supports flat `{{#if name}}...{{/if}}` conditionals and `{{dotted.path}}`
//! variables resolved against a JSON context.
use regex::{Captures, Regex};
use serde_json::Value;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// Rendering never fails: unresolved placeholders are left in the output.
    fn render(&self, template: &str, context: &Value) -> String;
}

/// Renderer for the fragment placeholder grammar.
pub struct PlaceholderRenderer {
    conditional: Regex,
    variable: Regex,
}

impl PlaceholderRenderer {
    /// Creates a renderer with the conditional and variable patterns compiled.
    pub fn new() -> Self {
        Self {
            conditional: Regex::new(r"\{\{#if\s+([\w.]+)\}\}((?s:.*?))\{\{/if\}\}")
                .expect("conditional pattern is valid"),
            variable: Regex::new(r"\{\{([a-zA-Z0-9_.]+)\}\}").expect("variable pattern is valid"),
        }
    }
}

impl Default for PlaceholderRenderer {
    fn default() -> Self {
        PlaceholderRenderer::new()
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    /// Runs the conditional pass, then the variable pass.
    ///
    /// Content kept by a truthy conditional is not re-scanned for conditionals,
    /// but its variables are resolved by the second pass.
    fn render(&self, template: &str, context: &Value) -> String {
        let kept = self.conditional.replace_all(template, |caps: &Captures| {
            if is_truthy(lookup(context, &caps[1])) {
                caps[2].to_string()
            } else {
                String::new()
            }
        });

        self.variable
            .replace_all(&kept, |caps: &Captures| match lookup(context, &caps[1]) {
                Some(value) if !value.is_null() => display_value(value),
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Expands `template` against `context` with a fresh [`PlaceholderRenderer`].
pub fn expand(template: &str, context: &Value) -> String {
    PlaceholderRenderer::new().render(template, context)
}

/// Resolves a dotted path such as `site.title` against `context`.
///
/// Returns `None` as soon as a segment is missing or the current value is not
/// an object.
pub fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(context, |current, key| current.as_object()?.get(key))
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
