//! Serde-backed configuration records.
//!
//! Lets a container be configured from data instead of code: parameters,
//! definition records and aliases deserialize from JSON, and a
//! [`TypeCatalog`] maps each record's type name to a compiled-in
//! [`ServiceType`](crate::ServiceType).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::TypeCatalog;
use crate::collection::ServiceCollection;
use crate::definition::{Argument, ArgumentKey, ServiceDefinition};
use crate::error::{DiError, DiResult};
use crate::key::ServiceId;
use crate::lifetime::Lifetime;
use crate::parameters::ParameterStore;
use crate::value::ParameterValue;

/// Reference to another service, written `{"service": "id"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceRef {
    pub service: String,
}

/// Tagged collection, written `{"tagged": "tag"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaggedRef {
    pub tagged: String,
}

/// One configured constructor argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentRecord {
    Service(ServiceRef),
    Tagged(TaggedRef),
    Value(ParameterValue),
}

impl From<ArgumentRecord> for Argument {
    fn from(record: ArgumentRecord) -> Self {
        match record {
            ArgumentRecord::Service(reference) => Argument::Service(ServiceId::from(reference.service)),
            ArgumentRecord::Tagged(reference) => Argument::Tagged(reference.tagged),
            ArgumentRecord::Value(value) => Argument::Value(value),
        }
    }
}

/// A service definition as data.
///
/// Argument keys made of digits address parameters by position; any other
/// key addresses a parameter by name, with an optional leading `$`.
///
/// ```json
/// {
///   "id": "mailer",
///   "type": "app.Mailer",
///   "arguments": { "$sender": "%admin_email%", "1": { "service": "transport" } },
///   "autowire": true,
///   "lifetime": "singleton",
///   "tags": ["notifier"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub arguments: BTreeMap<String, ArgumentRecord>,
    #[serde(default)]
    pub autowire: bool,
    #[serde(default)]
    pub lifetime: Lifetime,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DefinitionRecord {
    /// Builds the definition, looking the type up in `catalog`.
    pub fn into_definition(self, catalog: &TypeCatalog) -> DiResult<ServiceDefinition> {
        let id = ServiceId::from(self.id);
        let service_type = catalog.resolve(&id, &self.type_name)?.clone();

        let mut definition = ServiceDefinition::new(id, service_type)
            .autowire(self.autowire)
            .with_lifetime(self.lifetime);
        for (key, argument) in self.arguments {
            definition = definition.arg(parse_key(&key), Argument::from(argument));
        }
        for tag in self.tags {
            definition = definition.tag(tag);
        }
        Ok(definition)
    }
}

/// A whole configuration: parameters, services and aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
    #[serde(default)]
    pub services: Vec<DefinitionRecord>,
    /// Alias id → target id
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl ConfigDocument {
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(invalid)
    }
}

impl ServiceCollection {
    /// Loads a JSON [`ConfigDocument`] into the collection.
    ///
    /// ```rust
    /// use wiring::{Param, ServiceCollection, ServiceType, TypeCatalog};
    ///
    /// struct Mailer {
    ///     sender: String,
    /// }
    ///
    /// let mut catalog = TypeCatalog::new();
    /// catalog.add(
    ///     "app.Mailer",
    ///     ServiceType::of::<Mailer>()
    ///         .param(Param::new("sender"))
    ///         .construct(|args| Ok(Mailer { sender: args.string("sender")?.to_string() })),
    /// );
    ///
    /// let mut services = ServiceCollection::new();
    /// services
    ///     .load_json(
    ///         r#"{
    ///             "parameters": { "admin_email": "admin@example.com" },
    ///             "services": [
    ///                 { "id": "mailer", "type": "app.Mailer", "arguments": { "sender": "%admin_email%" } }
    ///             ],
    ///             "aliases": { "app.mailer": "mailer" }
    ///         }"#,
    ///         &catalog,
    ///     )
    ///     .unwrap();
    ///
    /// let container = services.build().unwrap();
    /// assert_eq!(container.get::<Mailer>("app.mailer").unwrap().sender, "admin@example.com");
    /// ```
    pub fn load_json(&mut self, json: &str, catalog: &TypeCatalog) -> DiResult<&mut Self> {
        let document = ConfigDocument::from_json(json)?;
        self.load_document(document, catalog)
    }

    /// Loads an already parsed [`ConfigDocument`].
    pub fn load_document(&mut self, document: ConfigDocument, catalog: &TypeCatalog) -> DiResult<&mut Self> {
        tracing::debug!(
            parameters = document.parameters.len(),
            services = document.services.len(),
            aliases = document.aliases.len(),
            "loading configuration document"
        );
        for (name, value) in document.parameters {
            self.set_parameter(name, value);
        }
        for record in document.services {
            self.register(record.into_definition(catalog)?)?;
        }
        for (alias, target) in document.aliases {
            self.alias(alias, target)?;
        }
        Ok(self)
    }
}

impl ParameterStore {
    /// Reads a flat JSON object of parameters. Values are stored raw, to be
    /// resolved later.
    pub fn from_json(json: &str) -> DiResult<Self> {
        let values: BTreeMap<String, ParameterValue> = serde_json::from_str(json).map_err(invalid)?;
        Ok(values.into_iter().collect())
    }
}

fn parse_key(raw: &str) -> ArgumentKey {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(position) = raw.parse() {
            return ArgumentKey::Index(position);
        }
    }
    ArgumentKey::Name(raw.strip_prefix('$').unwrap_or(raw).to_string())
}

fn invalid(err: serde_json::Error) -> DiError {
    DiError::InvalidConfig(err.to_string())
}
