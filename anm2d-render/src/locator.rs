//! Mapping from animation identifiers to files under the game root.

use crate::RenderError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The closed set of animation categories shipped by the game.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AnimationType {
    Npcs,
    Dynamics,
    Equipments,
    Gui,
    Interactives,
    Pets,
    Players,
    Resources,
}

impl AnimationType {
    pub const ALL: [AnimationType; 8] = [
        AnimationType::Npcs,
        AnimationType::Dynamics,
        AnimationType::Equipments,
        AnimationType::Gui,
        AnimationType::Interactives,
        AnimationType::Pets,
        AnimationType::Players,
        AnimationType::Resources,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationType::Npcs => "npcs",
            AnimationType::Dynamics => "dynamics",
            AnimationType::Equipments => "equipments",
            AnimationType::Gui => "gui",
            AnimationType::Interactives => "interactives",
            AnimationType::Pets => "pets",
            AnimationType::Players => "players",
            AnimationType::Resources => "resources",
        }
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationType {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| RenderError::UnknownAnimationType {
                value: s.to_string(),
            })
    }
}

/// The game root configured once at startup. All asset paths derive from it.
#[derive(Clone, Debug)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `animations/<type>/<id>.anm`
    pub fn animation_path(&self, ty: AnimationType, id: &str) -> PathBuf {
        self.root
            .join("animations")
            .join(ty.as_str())
            .join(format!("{id}.anm"))
    }

    /// `animations/<type>/Atlas/<name>.png`
    pub fn atlas_path(&self, ty: AnimationType, name: &str) -> PathBuf {
        self.root
            .join("animations")
            .join(ty.as_str())
            .join("Atlas")
            .join(format!("{name}.png"))
    }
}
