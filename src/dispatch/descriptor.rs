//! Command descriptor types
//!
//! A command is declared to the dispatcher as an immutable descriptor
//! record: name, human title, return type name, syntax templates, method,
//! endpoint template, and the handler to invoke. Descriptors are built once
//! at startup, collected into a [`ModuleRegistration`], and handed to the
//! dispatcher's registration function; nothing mutates them afterwards.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::handler::CommandHandler;

/// HTTP-like method a command endpoint is bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    /// Lowercase wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named type the module adds to the dispatcher's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDecl {
    /// Type name as commands refer to it
    pub name: &'static str,

    /// Definition in the dispatcher's type language
    #[serde(rename = "type")]
    pub definition: &'static str,
}

/// One registered command.
///
/// Endpoint templates mark request-bound segments with `{param}`; the names
/// inside the braces must match the parameter names the handler reads.
#[derive(Clone, Serialize)]
pub struct CommandDescriptor {
    /// Command name, unique within the module
    pub name: &'static str,

    /// Human-readable title
    pub title: &'static str,

    /// Name of the declared return type
    pub returns: &'static str,

    /// Syntax templates, listed in the order the dispatcher should try them
    pub syntax: &'static [&'static str],

    /// Method the endpoint is served under
    pub method: Method,

    /// Endpoint template with `{param}` placeholders
    pub endpoint: &'static str,

    /// Handler invoked when the dispatcher matches this command
    #[serde(skip)]
    pub handler: CommandHandler,
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("returns", &self.returns)
            .field("syntax", &self.syntax)
            .field("method", &self.method)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Registration payload for one module, handed to the dispatcher at startup.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRegistration {
    /// Module name the dispatcher mounts commands under
    pub name: &'static str,

    /// Type vocabulary the module declares
    pub types: Vec<TypeDecl>,

    /// Commands the module exposes
    pub commands: Vec<CommandDescriptor>,
}

impl ModuleRegistration {
    /// Look up a command by name
    pub fn command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|cmd| cmd.name == name)
    }

    /// Serializable view of the registration (handlers omitted).
    ///
    /// What a dispatcher sees when this module registers; also what the
    /// diagnostic binary prints.
    pub fn manifest(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Extract the parameter names bound by an endpoint template.
///
/// Both `{dbname}` and the spaced `{ dbname }` style are accepted.
///
/// # Arguments
/// * `endpoint` - Endpoint template string
///
/// # Returns
/// * `Vec<&str>` - Placeholder names in order of appearance
pub fn endpoint_params(endpoint: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut rest = endpoint;

    while let Some(open) = rest.find('{') {
        match rest[open + 1..].find('}') {
            Some(close) => {
                params.push(rest[open + 1..open + 1 + close].trim());
                rest = &rest[open + close + 2..];
            }
            None => break,
        }
    }

    params
}
