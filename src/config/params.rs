use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Values for `${name}` placeholders in a scenario file.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    /// Create empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse CLI args of the form `key=value`.
    pub fn from_args(args: &[String]) -> Result<Self> {
        args.iter().try_fold(Self::new(), |params, arg| {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                Error::Config(format!("invalid param '{}', expected key=value", arg))
            })?;
            if key.is_empty() {
                return Err(Error::Config(format!("invalid param '{}', empty key", arg)));
            }
            Ok(params.set(key, value))
        })
    }
}

/// Declared parameter in the scenario's `params:` block.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDef {
    /// Whether this parameter is required.
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided.
    pub default: Option<String>,

    /// Description shown by `--check`.
    pub description: Option<String>,
}

/// Expand every `${name}` in `template`.
///
/// Lookup order is explicit params, then the declared default. A declared
/// optional param with no default expands to nothing; an undeclared name is
/// left verbatim.
pub fn substitute(
    template: &str,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after.find('}').ok_or_else(|| {
            Error::Config(format!("unterminated '${{' in '{}'", template))
        })?;
        let name = &after[..close];

        match (params.get(name), defs.get(name)) {
            (Some(value), _) => out.push_str(value),
            (None, Some(def)) => match (&def.default, def.required) {
                (Some(default), _) => out.push_str(default),
                (None, true) => {
                    return Err(Error::Config(format!(
                        "missing required parameter: {}",
                        name
                    )))
                }
                (None, false) => {}
            },
            (None, None) => {
                out.push_str("${");
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Apply [`substitute`] to every string in a YAML tree.
pub fn substitute_value(
    value: &mut serde_yaml::Value,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<()> {
    match value {
        serde_yaml::Value::String(s) => {
            *s = substitute(s, params, defs)?;
        }
        serde_yaml::Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        serde_yaml::Value::Sequence(seq) => {
            for v in seq.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        _ => {}
    }
    Ok(())
}
