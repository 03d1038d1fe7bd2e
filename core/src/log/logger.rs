use ::log::LevelFilter;
use log4rs::config::Logger;
use std::{collections::BTreeMap, env};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LogError {
    #[error("invalid logging spec '{0}'")]
    InvalidSpec(String),
}

/// Root level and per-module levels parsed from `RUST_LOG`-like expressions
pub(super) struct Loggers {
    modules: BTreeMap<String, LevelFilter>,
    root_level: LevelFilter,
}

impl Loggers {
    pub fn root_level(&self) -> LevelFilter {
        self.root_level
    }

    pub fn items(&self) -> impl Iterator<Item = Logger> + '_ {
        self.modules.iter().map(|(name, level)| Logger::builder().build(name.clone(), *level))
    }
}

#[derive(Default)]
pub(super) struct Builder {
    modules: BTreeMap<String, LevelFilter>,
    root_level: Option<LevelFilter>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_level(mut self, level: LevelFilter) -> Self {
        self.root_level = Some(level);
        self
    }

    pub fn parse_env(self, var: &str) -> Self {
        match env::var(var) {
            Ok(expression) => self.parse_expression(&expression),
            Err(_) => self,
        }
    }

    /// Applies a comma separated list of `level`, `module` or `module=level` specs.
    /// Invalid specs are reported and skipped.
    pub fn parse_expression(mut self, expression: &str) -> Self {
        for spec in expression.split(',').map(str::trim).filter(|x| !x.is_empty()) {
            match parse_spec(spec) {
                Ok((None, level)) => self.root_level = Some(level),
                Ok((Some(module), level)) => {
                    self.modules.insert(module.to_string(), level);
                }
                Err(err) => eprintln!("Ignoring {}", err),
            }
        }
        self
    }

    pub fn build(self) -> Loggers {
        Loggers { modules: self.modules, root_level: self.root_level.unwrap_or(LevelFilter::Error) }
    }
}

/// A lone token is a root level if it parses as one, a module enabled at every level otherwise
fn parse_spec(spec: &str) -> Result<(Option<&str>, LevelFilter), LogError> {
    match spec.split('=').map(str::trim).collect::<Vec<_>>().as_slice() {
        [single] => Ok(match single.parse() {
            Ok(level) => (None, level),
            Err(_) => (Some(*single), LevelFilter::max()),
        }),
        [module, ""] => Ok((Some(*module), LevelFilter::max())),
        [module, level] => level.parse().map(|level| (Some(*module), level)).map_err(|_| LogError::InvalidSpec(spec.to_string())),
        _ => Err(LogError::InvalidSpec(spec.to_string())),
    }
}
