use crate::{Error, Transform2D};
use std::collections::HashMap;

/// Root aggregate produced by [`crate::decode`]. Immutable after decode.
#[derive(Clone, Debug)]
pub struct Animation {
    pub version: u8,
    pub frame_rate: u8,
    pub index: Option<LocalIndex>,
    pub texture: Option<TextureRef>,
    pub shapes: Vec<Shape>,
    pub transform: Option<TransformTable>,
    pub sprites: Vec<Sprite>,
    pub imports: Vec<Import>,

    /// Sprite position by id. The first occurrence of a duplicated id wins.
    pub sprite_index: HashMap<i16, usize>,
    /// Shape position by id. The first occurrence of a duplicated id wins.
    pub shape_index: HashMap<i32, usize>,
}

impl Animation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        version: u8,
        frame_rate: u8,
        index: Option<LocalIndex>,
        texture: Option<TextureRef>,
        shapes: Vec<Shape>,
        transform: Option<TransformTable>,
        sprites: Vec<Sprite>,
        imports: Vec<Import>,
    ) -> Self {
        let mut sprite_index = HashMap::with_capacity(sprites.len());
        for (i, sprite) in sprites.iter().enumerate() {
            sprite_index.entry(sprite.id).or_insert(i);
        }
        let mut shape_index = HashMap::with_capacity(shapes.len());
        for (i, shape) in shapes.iter().enumerate() {
            shape_index.entry(shape.id).or_insert(i);
        }
        Self {
            version,
            frame_rate,
            index,
            texture,
            shapes,
            transform,
            sprites,
            imports,
            sprite_index,
            shape_index,
        }
    }

    pub fn has_flag(&self, flag: u8) -> bool {
        self.version & flag != 0
    }

    pub fn sprite(&self, id: i16) -> Option<&Sprite> {
        self.sprite_index.get(&id).map(|&i| &self.sprites[i])
    }

    pub fn shape(&self, id: i32) -> Option<&Shape> {
        self.shape_index.get(&id).map(|&i| &self.shapes[i])
    }

    pub fn sprite_named(&self, name: &str) -> Option<(usize, &Sprite)> {
        self.sprites
            .iter()
            .enumerate()
            .find(|(_, s)| s.name.as_deref() == Some(name))
    }

    pub fn import(&self, id: i16) -> Option<&Import> {
        self.imports.iter().find(|i| i.id == id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureRef {
    pub name: String,
    pub crc: i32,
}

/// Atlas sub-rectangle, the leaf of every render. Texture coordinate extents
/// are normalised to [0, 1] at decode.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub id: i32,
    pub texture_index: i32,
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub width: u16,
    pub height: u16,
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationFileRef {
    pub name: String,
    pub crc: i32,
    pub file_index: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalIndex {
    pub scale: Option<f32>,
    pub render_radius: Option<f32>,
    /// Names of sibling animation files to preload.
    pub file_names: Vec<String>,
    pub parts_hidden_by: HashMap<i32, i32>,
    pub parts_to_be_hidden: HashMap<i32, i32>,
    /// Decoded values carry the stored byte plus one.
    pub heights: HashMap<i32, i32>,
    pub highlight: Option<[f32; 4]>,
    pub animation_files: Vec<AnimationFileRef>,
}

/// Flat float arrays addressed by offsets embedded in frame streams, plus the
/// preserved action list. Elements are referenced by offset, never by element
/// index: a rotation offset reads four consecutive floats, a translation two,
/// a color four.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformTable {
    pub colors: Vec<f32>,
    pub rotations: Vec<f32>,
    pub translations: Vec<f32>,
    pub actions: Vec<Action>,
}

impl TransformTable {
    pub(crate) const EMPTY: TransformTable = TransformTable {
        colors: Vec::new(),
        rotations: Vec::new(),
        translations: Vec::new(),
        actions: Vec::new(),
    };

    pub fn rotation_at(&self, offset: usize) -> Result<Transform2D, Error> {
        let s = self.rotations.get(offset..offset + 4).ok_or_else(|| {
            Error::InvalidValue {
                message: format!(
                    "rotation offset {offset} out of range ({} floats)",
                    self.rotations.len()
                ),
            }
        })?;
        Ok(Transform2D::rotate(s[0], s[1], s[2], s[3]))
    }

    pub fn translation_at(&self, offset: usize) -> Result<Transform2D, Error> {
        let s = self.translations.get(offset..offset + 2).ok_or_else(|| {
            Error::InvalidValue {
                message: format!(
                    "translation offset {offset} out of range ({} floats)",
                    self.translations.len()
                ),
            }
        })?;
        Ok(Transform2D::translate(s[0], s[1]))
    }

    pub fn color_at(&self, offset: usize) -> Result<[f32; 4], Error> {
        let s = self
            .colors
            .get(offset..offset + 4)
            .ok_or_else(|| Error::InvalidValue {
                message: format!(
                    "color offset {offset} out of range ({} floats)",
                    self.colors.len()
                ),
            })?;
        Ok([s[0], s[1], s[2], s[3]])
    }
}

/// A named, tagged record whose payload references shapes or other sprites by
/// id, and whose frame data stream encodes per-child transforms.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub id: i16,
    pub flags: u8,
    pub name: Option<String>,
    pub name_crc: i32,
    pub base_name_crc: i32,
    pub payload: SpritePayload,
    pub frame_data: FrameData,
}

impl Sprite {
    /// Number of distinct frames: 1 except for `Frames` payloads, which hold
    /// `frame_pos.len() / mult` frames (`mult` is 2 without action info, 3
    /// with).
    pub fn frame_count(&self) -> usize {
        match &self.payload {
            SpritePayload::Frames {
                frame_pos,
                action_info,
                ..
            } => frame_pos.len() / frames_mult(action_info),
            _ => 1,
        }
    }
}

pub(crate) fn frames_mult(action_info: &[i16]) -> usize {
    if action_info.is_empty() {
        2
    } else {
        3
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SpritePayload {
    Single {
        sprite_id: i16,
        action_info: Vec<i16>,
    },
    SingleNoAction {
        sprite_id: i16,
    },
    SingleFrame {
        sprite_ids: Vec<i16>,
        action_info: Vec<i16>,
    },
    Frames {
        frame_pos: Vec<i32>,
        sprite_info: Vec<i16>,
        action_info: Vec<i16>,
    },
}

/// Packed frame opcode buffer. The element width only affects storage; the
/// interpreter sees every element widened to `u32`.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameData {
    Bytes(Vec<u8>),
    Shorts(Vec<u16>),
    Ints(Vec<u32>),
}

impl FrameData {
    pub fn len(&self) -> usize {
        match self {
            FrameData::Bytes(v) => v.len(),
            FrameData::Shorts(v) => v.len(),
            FrameData::Ints(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        match self {
            FrameData::Bytes(v) => v.get(index).map(|&b| u32::from(b)),
            FrameData::Shorts(v) => v.get(index).map(|&s| u32::from(s)),
            FrameData::Ints(v) => v.get(index).copied(),
        }
    }
}

/// Parsed action list entry. Preserved for downstream consumers; rendering
/// does not interpret actions.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    GoTo {
        name: String,
        percent: Option<u8>,
    },
    GoToStatic,
    RunScript {
        name: String,
    },
    GoToRandom {
        names: Vec<String>,
        percents: Option<Vec<u8>>,
    },
    Hit,
    Delete,
    End,
    GoToIfPrevious {
        previous: Vec<String>,
        next: Vec<String>,
        default: Option<String>,
    },
    AddParticle {
        particle_id: i16,
        offset_x: Option<i16>,
        offset_y: Option<i16>,
        offset_z: Option<i16>,
    },
    SetRadius {
        radius: f32,
    },
}

/// Declarative import record; not used by the baseline render path.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    pub id: i16,
    pub name: String,
    pub file_index: i32,
}
