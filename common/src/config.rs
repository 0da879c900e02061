use std::{collections::HashMap, path::Path};

use anyhow::{bail, Context, Result};
use hocon::{Hocon, HoconLoader};

/// Loads typed options from a HOCON document. Environment variables
/// take precedence over document keys, and keys are looked up in the
/// named scope before the document root, so one file can configure
/// several components.
#[derive(Debug)]
pub struct ConfigLoader {
    hocon: Hocon,
    env: HashMap<String, String>,
    scope: String,
}

impl ConfigLoader {
    pub fn new(path: impl AsRef<Path>, scope: String) -> Result<Self> {
        let path = path.as_ref();
        let loaded = HoconLoader::new()
            .load_file(path)
            .with_context(|| format!("Failed to find or load config file at: {:?}", path))?;

        Self::build(loaded, scope)
    }

    /// Parses an in-memory document.
    pub fn from_str(document: &str, scope: String) -> Result<Self> {
        let loaded = HoconLoader::new()
            .load_str(document)
            .context("Failed to parse config document")?;

        Self::build(loaded, scope)
    }

    fn build(loaded: HoconLoader, scope: String) -> Result<Self> {
        Ok(Self {
            hocon: loaded.hocon()?,
            env: std::env::vars().collect(),
            scope,
        })
    }

    /// Looks `name` up as an environment variable, then inside the
    /// scope block, then at the document root.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.env.get(name) {
            return Some(Value::String(value.clone()));
        }

        let scope = &self.hocon[self.scope.as_str()];
        if matches!(scope, Hocon::Hash(_)) {
            if let Some(value) = Self::value_at(scope, name) {
                return Some(value);
            }
        }

        Self::value_at(&self.hocon, name)
    }

    /// Like [`Self::get`], but a missing key is an error naming the
    /// scope that was searched.
    pub fn require(&self, name: &str) -> Result<Value> {
        match self.get(name) {
            Some(value) => Ok(value),
            None => bail!(
                "Config key {:?} not found in scope {:?} or at the document root",
                name,
                self.scope
            ),
        }
    }

    pub fn load<T: Config>(&self) -> Result<T> {
        T::load(self)
    }

    fn value_at(hocon: &Hocon, name: &str) -> Option<Value> {
        match &hocon[name] {
            Hocon::Real(val) => Some(Value::Float(*val as f32)),
            Hocon::Integer(val) => Some(Value::Integer(*val as usize)),
            Hocon::String(val) => Some(Value::String(val.clone())),
            Hocon::Boolean(val) => Some(Value::Boolean(*val)),
            _ => None,
        }
    }
}

/// An options struct that knows how to populate itself from a loader,
/// falling back to its own defaults for absent keys.
pub trait Config: Sized {
    fn load(config: &ConfigLoader) -> Result<Self>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(usize),
    Float(f32),
    Boolean(bool),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(val) => Some(*val),
            Value::String(val) => val.parse().ok(),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Value::Integer(val) => Some(*val),
            Value::String(val) => val.parse().ok(),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(val) => Some(*val),
            Value::Integer(val) => Some(*val as f32),
            Value::String(val) => val.parse().ok(),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::String(val) => Some(val.clone()),
            Value::Integer(val) => Some(val.to_string()),
            Value::Float(val) => Some(val.to_string()),
            Value::Boolean(val) => Some(val.to_string()),
        }
    }
}
