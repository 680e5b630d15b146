//! Asset import.
//!
//! Importers turn interchange files into the runtime's own types: a
//! [`Skeleton`](crate::scene::Skeleton), a list of
//! [`Clip`](crate::animation::Clip)s and the skinned
//! [`Mesh`](crate::resources::Mesh)es. Every joint of an imported document is
//! addressed by the same index in all three.

#[cfg(feature = "gltf")]
pub mod loaders;

#[cfg(feature = "gltf")]
pub use loaders::GltfImporter;
