//! Data-driven entity construction.
//!
//! Each kind of entity (a fish species, a hook, a plant) is described by an
//! immutable prototype record in a registration table, and entities are
//! built by an explicit factory call keyed on the kind identifier. Behavior
//! differences between kinds live in the records, not in a type hierarchy.

use std::collections::HashMap;

use glam::IVec2;
use thiserror::Error;

use crate::api::types::EntityId;
use crate::assets::manifest::{ManifestError, SpriteManifest};
use crate::assets::registry::PixmapRegistry;
use crate::components::entity::Entity;
use crate::components::layer::RenderLayer;

/// Immutable settings record for one kind of entity.
#[derive(Debug, Clone)]
pub struct EntityPrototype {
    /// Logical image name resolved through the pixmap registry at spawn.
    pub image: String,
    /// Layer every entity of this kind renders on.
    pub layer: RenderLayer,
    /// Pivot override; None keeps the image's geometric center.
    pub center: Option<IVec2>,
    /// Tag stamped on spawned entities.
    pub tag: String,
}

/// Spawning failures — always caller/configuration mistakes, never
/// something to retry.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("unknown entity kind {0:?}")]
    UnknownKind(String),
    #[error("kind {kind:?} needs image {image:?} which is not registered")]
    MissingImage { kind: String, image: String },
}

/// Registration table: kind identifier → prototype.
pub struct PrototypeRegistry {
    prototypes: HashMap<String, EntityPrototype>,
}

impl PrototypeRegistry {
    pub fn new() -> Self {
        Self {
            prototypes: HashMap::new(),
        }
    }

    /// Build the table from a manifest, validating layers and image
    /// references against the manifest's own sprites. Tags default to the
    /// kind identifier.
    pub fn from_manifest(manifest: &SpriteManifest) -> Result<Self, ManifestError> {
        let mut prototypes = HashMap::with_capacity(manifest.prototypes.len());
        for (kind, desc) in &manifest.prototypes {
            let layer =
                RenderLayer::from_u8(desc.layer).ok_or_else(|| ManifestError::BadLayer {
                    kind: kind.clone(),
                    layer: desc.layer,
                })?;
            if !manifest.sprites.contains_key(&desc.image) {
                return Err(ManifestError::UnknownImage {
                    kind: kind.clone(),
                    image: desc.image.clone(),
                });
            }
            prototypes.insert(
                kind.clone(),
                EntityPrototype {
                    image: desc.image.clone(),
                    layer,
                    center: desc.center.map(|[x, y]| IVec2::new(x, y)),
                    tag: desc.tag.clone().unwrap_or_else(|| kind.clone()),
                },
            );
        }
        Ok(Self { prototypes })
    }

    /// Add or replace a prototype.
    pub fn register(&mut self, kind: impl Into<String>, prototype: EntityPrototype) {
        self.prototypes.insert(kind.into(), prototype);
    }

    pub fn get(&self, kind: &str) -> Option<&EntityPrototype> {
        self.prototypes.get(kind)
    }

    /// Factory: build a ready-to-spawn entity of the given kind.
    pub fn build(
        &self,
        kind: &str,
        id: EntityId,
        images: &PixmapRegistry,
    ) -> Result<Entity, SpawnError> {
        let prototype = self
            .prototypes
            .get(kind)
            .ok_or_else(|| SpawnError::UnknownKind(kind.to_string()))?;
        let image = images
            .get(&prototype.image)
            .ok_or_else(|| SpawnError::MissingImage {
                kind: kind.to_string(),
                image: prototype.image.clone(),
            })?;

        let mut entity = Entity::new(id, prototype.layer)
            .with_tag(prototype.tag.clone())
            .with_image(image.clone());
        if let Some(center) = prototype.center {
            entity.set_center_of_rotation(center.x, center.y);
        }
        Ok(entity)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

impl Default for PrototypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r##"{
        "palette": { ".": "transparent", "o": "#E86A17" },
        "sprites": { "perch_body": { "rows": ["oo.", "ooo"] } },
        "prototypes": {
            "perch": { "image": "perch_body", "layer": 3, "center": [0, 1] }
        }
    }"##;

    #[test]
    fn builds_an_entity_from_a_manifest_prototype() {
        let manifest = SpriteManifest::from_json(MANIFEST).unwrap();
        let images = PixmapRegistry::from_manifest(&manifest).unwrap();
        let registry = PrototypeRegistry::from_manifest(&manifest).unwrap();

        let entity = registry.build("perch", EntityId(7), &images).unwrap();
        assert_eq!(entity.layer(), RenderLayer::Fish);
        assert_eq!(entity.tag, "perch");
        assert_eq!(entity.center_of_rotation(), Some(IVec2::new(0, 1)));
        assert_eq!(entity.image().unwrap().size(), glam::UVec2::new(3, 2));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let registry = PrototypeRegistry::new();
        let images = PixmapRegistry::new();
        assert!(matches!(
            registry.build("kraken", EntityId(1), &images),
            Err(SpawnError::UnknownKind(_))
        ));
    }

    #[test]
    fn bad_layer_in_manifest_is_rejected() {
        let manifest = SpriteManifest::from_json(
            r##"{
                "palette": { "o": "#FFFFFF" },
                "sprites": { "s": { "rows": ["o"] } },
                "prototypes": { "ghost": { "image": "s", "layer": 9 } }
            }"##,
        )
        .unwrap();
        assert!(matches!(
            PrototypeRegistry::from_manifest(&manifest),
            Err(ManifestError::BadLayer { layer: 9, .. })
        ));
    }

    #[test]
    fn missing_image_reference_is_rejected() {
        let manifest = SpriteManifest::from_json(
            r##"{
                "palette": { "o": "#FFFFFF" },
                "sprites": { "s": { "rows": ["o"] } },
                "prototypes": { "ghost": { "image": "nope", "layer": 1 } }
            }"##,
        )
        .unwrap();
        assert!(matches!(
            PrototypeRegistry::from_manifest(&manifest),
            Err(ManifestError::UnknownImage { .. })
        ));
    }
}
