//! Message formatters and the built-in placeholder formatter.

use crate::config::Config;
use anyhow::Result;
use std::sync::Arc;

/// Registry name of the built-in [`SimpleFormatter`].
pub const SIMPLE_FORMATTER: &str = "simple";

/// Named arguments passed to a formatter.
pub type FormatArgs = serde_json::Map<String, serde_json::Value>;

/// Renders a message template into final text.
pub trait Formatter: Send + Sync {
    fn format(&self, template: &str, locale: &str, args: &FormatArgs) -> Result<String>;
}

/// Builds the formatter selected by `translations_format`.
pub type FormatterFactory = Arc<dyn Fn(Arc<Config>) -> Arc<dyn Formatter> + Send + Sync>;

/// Wrap a closure as a [`FormatterFactory`].
pub fn formatter_factory<F, T>(factory: F) -> FormatterFactory
where
    F: Fn(Arc<Config>) -> T + Send + Sync + 'static,
    T: Formatter + 'static,
{
    Arc::new(move |config: Arc<Config>| -> Arc<dyn Formatter> { Arc::new(factory(config)) })
}

/// Replaces `{name}` placeholders with the matching argument.
///
/// String arguments are inserted as-is, other JSON values use their JSON
/// rendering. Placeholders without an argument are left untouched, and
/// `{{` / `}}` produce literal braces.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleFormatter;

impl SimpleFormatter {
    pub fn factory() -> FormatterFactory {
        formatter_factory(|_config| SimpleFormatter)
    }
}

impl Formatter for SimpleFormatter {
    fn format(&self, template: &str, _locale: &str, args: &FormatArgs) -> Result<String> {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(['{', '}']) {
            output.push_str(&rest[..start]);
            let tail = &rest[start..];

            if tail.starts_with("{{") {
                output.push('{');
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with("}}") {
                output.push('}');
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with('}') {
                output.push('}');
                rest = &tail[1..];
                continue;
            }

            // tail starts with '{'
            match tail[1..].find('}') {
                Some(end) => {
                    let name = tail[1..=end].trim();
                    match args.get(name) {
                        Some(serde_json::Value::String(value)) => output.push_str(value),
                        Some(value) => output.push_str(&value.to_string()),
                        None => output.push_str(&tail[..=end + 1]),
                    }
                    rest = &tail[end + 2..];
                }
                None => {
                    output.push_str(tail);
                    rest = "";
                }
            }
        }

        output.push_str(rest);
        Ok(output)
    }
}
