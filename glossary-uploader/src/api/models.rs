//! Catalog entity models and create request payloads
//!
//! Entities mirror what the server returns; create requests mirror what the
//! `PUT`/`POST` endpoints accept. Each create request names the entity it
//! produces through [`Payload::Response`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A type registered in the route table
pub trait Resource {
    /// Key into the route table
    const TYPE_NAME: &'static str;
}

/// A server-side entity
pub trait Entity: Resource + DeserializeOwned {
    /// Entity type as used in entity references (e.g. "glossaryTerm")
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> &str;
    fn fully_qualified_name(&self) -> Option<&str>;
    fn description(&self) -> Option<&str>;
    fn href(&self) -> Option<&str>;
}

/// A body that can be written with `POST`/`PUT`
pub trait Payload: Resource + Serialize {
    /// Entity returned by the server for this payload
    type Response: Entity;
}

/// Reference to another catalog entity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityReference {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Classification tag attached to a glossary or term
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagLabel {
    #[serde(rename = "tagFQN")]
    pub tag_fqn: String,
    pub source: String,
    pub label_type: String,
    pub state: String,
}

impl TagLabel {
    /// Manually applied, confirmed classification tag
    pub fn classification(tag_fqn: impl Into<String>) -> Self {
        Self {
            tag_fqn: tag_fqn.into(),
            source: "Classification".to_string(),
            label_type: "Manual".to_string(),
            state: "Confirmed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Glossary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fully_qualified_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub version: Option<f64>,
}

impl Glossary {
    /// FQN to reference this glossary by; a glossary's FQN is its name
    pub fn fqn(&self) -> &str {
        self.fully_qualified_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fully_qualified_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub glossary: Option<EntityReference>,
    #[serde(default)]
    pub related_terms: Vec<EntityReference>,
    #[serde(default)]
    pub href: Option<String>,
}

/// Body for `PUT /glossaries`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateGlossaryRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutually_exclusive: Option<bool>,
}

/// Body for `PUT /glossaryTerms`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateGlossaryTermRequest {
    /// FQN of the owning glossary
    pub glossary: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// FQN of the parent term, for nested terms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagLabel>,
}

/// One page of a collection listing
#[derive(Debug, Clone)]
pub struct EntityList<T> {
    pub entities: Vec<T>,
    pub total: u64,
    /// Cursor for the next page, absent on the last page
    pub after: Option<String>,
}

impl Resource for Glossary {
    const TYPE_NAME: &'static str = "Glossary";
}

impl Resource for GlossaryTerm {
    const TYPE_NAME: &'static str = "GlossaryTerm";
}

impl Resource for CreateGlossaryRequest {
    const TYPE_NAME: &'static str = "CreateGlossaryRequest";
}

impl Resource for CreateGlossaryTermRequest {
    const TYPE_NAME: &'static str = "CreateGlossaryTermRequest";
}

impl Entity for Glossary {
    const ENTITY_TYPE: &'static str = "glossary";

    fn id(&self) -> &str {
        &self.id
    }

    fn fully_qualified_name(&self) -> Option<&str> {
        self.fully_qualified_name.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

impl Entity for GlossaryTerm {
    const ENTITY_TYPE: &'static str = "glossaryTerm";

    fn id(&self) -> &str {
        &self.id
    }

    fn fully_qualified_name(&self) -> Option<&str> {
        self.fully_qualified_name.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

impl Payload for CreateGlossaryRequest {
    type Response = Glossary;
}

impl Payload for CreateGlossaryTermRequest {
    type Response = GlossaryTerm;
}

// Entities can be serialized back, but the route table rejects them as write
// payloads; only create requests may be PUT or POSTed.
impl Payload for Glossary {
    type Response = Glossary;
}

impl Payload for GlossaryTerm {
    type Response = GlossaryTerm;
}
