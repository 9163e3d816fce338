use std::collections::HashMap;

/// `{name}` substitution for picker command arguments.
///
/// Unknown placeholders and `{{` are copied through untouched.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    variables: HashMap<String, String>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn render(&self, template: &str) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            result.push_str(&rest[..open]);
            let tail = &rest[open..];

            if tail.starts_with("{{") {
                result.push_str("{{");
                rest = &tail[2..];
                continue;
            }

            match tail[1..].find('}') {
                Some(close) => {
                    let name = &tail[1..close + 1];
                    match self.variables.get(name) {
                        Some(value) => result.push_str(value),
                        None => result.push_str(&tail[..close + 2]),
                    }
                    rest = &tail[close + 2..];
                }
                None => {
                    result.push_str(tail);
                    rest = "";
                }
            }
        }

        result.push_str(rest);
        result
    }

    pub fn render_args(&self, args: &[String]) -> Vec<String> {
        args.iter().map(|arg| self.render(arg)).collect()
    }
}
