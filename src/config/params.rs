use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Runtime parameter values, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    /// An empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder-style.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Look up a value by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from repeated `key=value` CLI arguments.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let values = args
            .iter()
            .map(|arg| {
                arg.split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .ok_or_else(|| {
                        Error::Config(format!("invalid param '{arg}', expected key=value"))
                    })
            })
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self { values })
    }
}

/// A parameter a config declares under its `params:` key.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDef {
    /// Fail the load when no value is supplied.
    #[serde(default)]
    pub required: bool,

    /// Value used when none is supplied.
    pub default: Option<String>,

    /// Shown in the CLI config summary.
    pub description: Option<String>,
}

/// Expand `${var}` references in a template string.
///
/// References to names declared in `defs` resolve through the provided
/// value, the declared default, or (if optional with no default) the empty
/// string. An undeclared reference is kept literally, as is a `${` with no
/// closing brace. Expanded values are not rescanned.
pub fn expand(template: &str, params: &Params, defs: &HashMap<String, ParamDef>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 2..];
        let Some(close) = tail.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(out);
        };
        let name = &tail[..close];
        match resolve(name, params, defs)? {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[open..open + close + 3]),
        }
        rest = &tail[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn resolve(
    name: &str,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<Option<String>> {
    if let Some(value) = params.get(name) {
        return Ok(Some(value.to_string()));
    }
    let Some(def) = defs.get(name) else {
        return Ok(None);
    };
    match def.default {
        Some(ref default) => Ok(Some(default.clone())),
        None if def.required => Err(Error::Config(format!(
            "missing required parameter: {name}"
        ))),
        None => Ok(Some(String::new())),
    }
}

/// Expand params in every string of a YAML document.
pub fn expand_tree(
    value: &mut serde_yaml::Value,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<()> {
    use serde_yaml::Value;
    match value {
        Value::String(s) => *s = expand(s, params, defs)?,
        Value::Sequence(items) => {
            for item in items {
                expand_tree(item, params, defs)?;
            }
        }
        Value::Mapping(entries) => {
            for (_, item) in entries.iter_mut() {
                expand_tree(item, params, defs)?;
            }
        }
        _ => {}
    }
    Ok(())
}
