//! Property inheritance along a sitemap path.
//!
//! ```text
//! root     own {A: 1}           computed {A: 1}          flows {A: 1}
//!  └ news  own {B: 2}           computed {A: 1, B: 2}    flows {A: 1, B: 2}
//!     └ a  own {A: (3, inh 4)}  computed {A: 3, B: 2}    flows {A: 4, B: 2}
//!        └ b                    computed {A: 4, B: 2}
//! ```

use std::sync::Arc;

use super::{ComputedProperties, PropertyDefinitions, PropertyMap};
use crate::core::RootPath;

/// Immutable inheritance snapshot valid at one tree depth.
///
/// [`update`](Self::update) derives the child state; the parent state is
/// never mutated, so siblings can all be derived from the same parent.
#[derive(Debug, Clone)]
pub struct PropertyInheritanceState {
    /// Active property definitions (replaced when entering a sub-sitemap).
    definitions: Arc<PropertyDefinitions>,
    /// Values handed down to descendants.
    inherited: Arc<ComputedProperties>,
    /// Resolved values of the node this state belongs to.
    computed: Arc<ComputedProperties>,
    /// Depth of the node (0 = root entry).
    depth: usize,
    /// Path of the node, `None` above the root.
    path: Option<RootPath>,
}

impl PropertyInheritanceState {
    /// State above a root entry: nothing inherited yet.
    pub fn root(definitions: Arc<PropertyDefinitions>) -> Self {
        Self {
            definitions,
            inherited: Arc::default(),
            computed: Arc::default(),
            depth: 0,
            path: None,
        }
    }

    /// Derive the state of a child node carrying `own` properties.
    pub fn update(&self, own: &PropertyMap, path: &RootPath) -> Self {
        let mut computed = (*self.inherited).clone();
        let mut inherited = (*self.inherited).clone();

        for (name, value) in own {
            if let Some(v) = value.effective() {
                computed.insert(name.clone(), v.to_string());
            }
            if let Some(v) = value.for_descendants() {
                inherited.insert(name.clone(), v.to_string());
            }
        }

        Self {
            definitions: Arc::clone(&self.definitions),
            inherited: Arc::new(inherited),
            computed: Arc::new(computed),
            depth: if self.path.is_some() { self.depth + 1 } else { 0 },
            path: Some(path.clone()),
        }
    }

    /// Same values, different active definitions (entering a sub-sitemap).
    pub fn with_definitions(&self, definitions: Arc<PropertyDefinitions>) -> Self {
        Self {
            definitions,
            ..self.clone()
        }
    }

    /// Resolved value of a property, falling back to the definition default.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.computed
            .get(name)
            .map(String::as_str)
            .or_else(|| self.definitions.default_value(name))
    }

    /// Resolved values of this node (without definition defaults).
    pub fn computed(&self) -> &ComputedProperties {
        &self.computed
    }

    /// Values descendants will see unless they override them.
    pub fn inherited(&self) -> &ComputedProperties {
        &self.inherited
    }

    pub fn definitions(&self) -> &Arc<PropertyDefinitions> {
        &self.definitions
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn path(&self) -> Option<&RootPath> {
        self.path.as_ref()
    }
}
