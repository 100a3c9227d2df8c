//! 3D asset format registry.
//!
//! Canonical extension / MIME mapping for the formats the platform can
//! serve. The effective allow-list is configuration; this registry supplies
//! the MIME plausibility check for declared content types.

use serde::{Deserialize, Serialize};

/// A recognized 3D scene file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Binary glTF container.
    Glb,
    /// JSON glTF scene.
    Gltf,
    /// Wavefront OBJ.
    Obj,
    /// Autodesk FBX.
    Fbx,
    /// Apple USDZ archive.
    Usdz,
    /// Stereolithography mesh.
    Stl,
}

impl ModelFormat {
    /// Resolve a format from a lowercase file extension (without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "glb" => Some(Self::Glb),
            "gltf" => Some(Self::Gltf),
            "obj" => Some(Self::Obj),
            "fbx" => Some(Self::Fbx),
            "usdz" => Some(Self::Usdz),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    /// The canonical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Glb => "glb",
            Self::Gltf => "gltf",
            Self::Obj => "obj",
            Self::Fbx => "fbx",
            Self::Usdz => "usdz",
            Self::Stl => "stl",
        }
    }

    /// The canonical MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Glb => "model/gltf-binary",
            Self::Gltf => "model/gltf+json",
            Self::Obj => "model/obj",
            Self::Fbx => "application/octet-stream",
            Self::Usdz => "model/vnd.usdz+zip",
            Self::Stl => "model/stl",
        }
    }

    /// Whether a declared content type is plausible for this format.
    ///
    /// Browsers and upload tools frequently fall back to a generic binary
    /// type, so octet-stream is accepted for every format.
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        content_type == self.mime_type() || content_type == "application/octet-stream"
    }
}
