//! Scene descriptors supplied by the host's resource subsystem.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a scene descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SceneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Declarative record describing a scene.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    /// Unique identifier within a descriptor set.
    pub id: SceneId,
    /// Whether the scene is spawned automatically during `init`.
    #[serde(default)]
    pub instanced_at_startup: bool,
    /// Scene source the spawn service resolves (resource path or key).
    #[serde(default)]
    pub source: String,
}

impl SceneDescriptor {
    /// Create a descriptor that is not instanced at startup.
    pub fn new(id: impl Into<SceneId>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            instanced_at_startup: false,
            source: source.into(),
        }
    }

    /// Set the "instance at startup" flag.
    #[must_use]
    pub fn instanced(mut self, instanced: bool) -> Self {
        self.instanced_at_startup = instanced;
        self
    }

    /// Check that the descriptor can be handed to a spawn service.
    pub fn validate(&self) -> Result<()> {
        let id = self.id.as_str();
        let reason = if id.is_empty() {
            Some("empty identifier")
        } else if id.chars().any(char::is_whitespace) {
            Some("identifier contains whitespace")
        } else if self.source.trim().is_empty() {
            Some("empty scene source")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidDescriptor {
                scene: self.id.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Read-only, ordered collection of scene descriptors.
///
/// Descriptors keep insertion order, which is the order scenes are spawned in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneDescriptorSet {
    descriptors: Vec<SceneDescriptor>,
}

#[derive(Deserialize)]
struct DescriptorFile {
    #[serde(default, rename = "scene")]
    scenes: Vec<SceneDescriptor>,
}

impl SceneDescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from descriptors, rejecting duplicate identifiers.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = SceneDescriptor>) -> Result<Self> {
        let mut set = Self::new();
        for descriptor in descriptors {
            set.push(descriptor)?;
        }
        Ok(set)
    }

    /// Parse a descriptor file.
    ///
    /// ```toml
    /// [[scene]]
    /// id = "main"
    /// instanced_at_startup = true
    /// source = "scenes/main.scene"
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: DescriptorFile =
            toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        Self::from_descriptors(file.scenes)
    }

    /// Append a descriptor. Fails if its identifier is already present.
    pub fn push(&mut self, descriptor: SceneDescriptor) -> Result<()> {
        if self.get(&descriptor.id).is_some() {
            return Err(Error::InvalidDescriptor {
                scene: descriptor.id,
                reason: "duplicate identifier".to_string(),
            });
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn get(&self, id: &SceneId) -> Option<&SceneDescriptor> {
        self.descriptors.iter().find(|d| &d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneDescriptor> {
        self.descriptors.iter()
    }

    /// Descriptors flagged for spawning at startup, in set order.
    pub fn initially_instanced(&self) -> impl Iterator<Item = &SceneDescriptor> {
        self.descriptors.iter().filter(|d| d.instanced_at_startup)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a SceneDescriptorSet {
    type Item = &'a SceneDescriptor;
    type IntoIter = std::slice::Iter<'a, SceneDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}
