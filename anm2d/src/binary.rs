//! `.anm` (binary container) loader.
//!
//! The loader is IO-free: it operates on an in-memory byte slice. All
//! multi-byte integers are little-endian; floats are IEEE-754 32-bit.

use crate::{
    Action, Animation, AnimationFileRef, BinaryCursor, Error, FrameData, Import, LocalIndex, Shape,
    Sprite, SpritePayload, TextureRef, TransformTable, VERSION_USE_LOCAL_INDEX,
    VERSION_USE_TRANSFORM_INDEX,
};
use std::collections::HashMap;

const SPRITE_SINGLE: i8 = 1;
const SPRITE_SINGLE_NO_ACTION: i8 = 2;
const SPRITE_SINGLE_FRAME: i8 = 3;
const SPRITE_FRAMES: i8 = 4;

const SPRITE_HAS_NAME: u8 = 0x40;

const FRAME_DATA_BYTES: u8 = 1;
const FRAME_DATA_SHORTS: u8 = 2;
const FRAME_DATA_INTS: u8 = 4;

const ACTION_GO_TO: u8 = 1;
const ACTION_GO_TO_STATIC: u8 = 2;
const ACTION_RUN_SCRIPT: u8 = 3;
const ACTION_GO_TO_RANDOM: u8 = 4;
const ACTION_HIT: u8 = 5;
const ACTION_DELETE: u8 = 6;
const ACTION_END: u8 = 7;
const ACTION_GO_TO_IF_PREVIOUS: u8 = 8;
const ACTION_ADD_PARTICLE: u8 = 9;

const OPTIMIZED_SENTINEL: &str = "#optimized";

const INDEX_SCALE: u8 = 0x1;
const INDEX_RENDER_RADIUS: u8 = 0x2;
const INDEX_FILE_NAMES: u8 = 0x4;
const INDEX_PART_TABLES: u8 = 0x8;
const INDEX_EXTENSION: u8 = 0x10;

const EXTENSION_HEIGHTS: u8 = 0x1;
const EXTENSION_HIGHLIGHT: u8 = 0x2;

/// Decodes an animation file. Residual bytes after the import table are
/// tolerated with a warning; every other malformation is an error.
pub fn decode(bytes: &[u8]) -> Result<Animation, Error> {
    let mut input = BinaryCursor::new(bytes);

    let version = input.read_u8()?;
    // A signed 16-bit word of unknown purpose sits between the version and
    // the frame rate in every file. Consumed and discarded.
    let _ = input.read_i16()?;
    let frame_rate = input.read_u8()?;

    let index = input.read_if(version & VERSION_USE_LOCAL_INDEX != 0, read_local_index)?;

    let texture_count = input.read_u16()?;
    let texture = input.read_if(texture_count == 1, |i| {
        Ok(TextureRef {
            name: i.read_string()?,
            crc: i.read_i32()?,
        })
    })?;

    let shapes = input.read_array_u16(read_shape)?;

    let transform = input.read_if(
        version & VERSION_USE_TRANSFORM_INDEX != 0,
        read_transform_table,
    )?;

    let sprites = input.read_array_u16(read_sprite)?;
    let imports = input.read_array_u16(read_import)?;

    if !input.is_at_end() {
        tracing::warn!(
            residual = input.remaining(),
            offset = input.position(),
            "animation decoded with trailing bytes"
        );
    }

    Ok(Animation::new(
        version, frame_rate, index, texture, shapes, transform, sprites, imports,
    ))
}

fn read_shape(input: &mut BinaryCursor<'_>) -> Result<Shape, Error> {
    let id = input.read_i32()?;
    let texture_index = input.read_i32()?;
    // Stored extents are u16 fractions of the atlas; normalise here so the
    // model carries [0, 1] floats.
    let top = f32::from(input.read_u16()?) / 65535.0;
    let left = f32::from(input.read_u16()?) / 65535.0;
    let bottom = f32::from(input.read_u16()?) / 65535.0;
    let right = f32::from(input.read_u16()?) / 65535.0;
    let width = input.read_u16()?;
    let height = input.read_u16()?;
    let offset_x = input.read_f32()?;
    let offset_y = input.read_f32()?;
    Ok(Shape {
        id,
        texture_index,
        top,
        left,
        bottom,
        right,
        width,
        height,
        offset_x,
        offset_y,
    })
}

fn read_local_index(input: &mut BinaryCursor<'_>) -> Result<LocalIndex, Error> {
    let flags = input.read_u8()?;

    let scale = input.read_if(flags & INDEX_SCALE != 0, |i| i.read_f32())?;
    let render_radius = input.read_if(flags & INDEX_RENDER_RADIUS != 0, |i| i.read_f32())?;

    let file_names = if flags & INDEX_FILE_NAMES != 0 {
        input.read_array_u16(|i| i.read_string())?
    } else {
        Vec::new()
    };

    let (parts_hidden_by, parts_to_be_hidden) = if flags & INDEX_PART_TABLES != 0 {
        let hidden_by = input.read_map_u32(|i| i.read_i32(), |i| i.read_i32())?;
        let to_be_hidden = input.read_map_u32(|i| i.read_i32(), |i| i.read_i32())?;
        (hidden_by, to_be_hidden)
    } else {
        (HashMap::new(), HashMap::new())
    };

    let mut heights = HashMap::new();
    let mut highlight = None;
    if flags & INDEX_EXTENSION != 0 {
        let extension = input.read_u8()?;
        if extension & EXTENSION_HEIGHTS != 0 {
            // Stored bytes are off by one; the decoded value is the height.
            heights =
                input.read_map_u32(|i| i.read_i32(), |i| Ok(i32::from(i.read_i8()?) + 1))?;
        }
        highlight = input.read_if(extension & EXTENSION_HIGHLIGHT != 0, |i| {
            Ok([i.read_f32()?, i.read_f32()?, i.read_f32()?, i.read_f32()?])
        })?;
    }

    let animation_files = input.read_array_u16(|i| {
        Ok(AnimationFileRef {
            name: i.read_string()?,
            crc: i.read_i32()?,
            file_index: i.read_i32()?,
        })
    })?;

    Ok(LocalIndex {
        scale,
        render_radius,
        file_names,
        parts_hidden_by,
        parts_to_be_hidden,
        heights,
        highlight,
        animation_files,
    })
}

fn read_transform_table(input: &mut BinaryCursor<'_>) -> Result<TransformTable, Error> {
    let colors = input.read_array_u32(|i| i.read_f32())?;
    let rotations = input.read_array_u32(|i| i.read_f32())?;
    let translations = input.read_array_u32(|i| i.read_f32())?;
    let actions = input.read_array_u32(read_action)?;
    Ok(TransformTable {
        colors,
        rotations,
        translations,
        actions,
    })
}

fn read_action(input: &mut BinaryCursor<'_>) -> Result<Action, Error> {
    let id = input.read_u8()?;
    let params = input.read_u8()?;

    Ok(match id {
        ACTION_GO_TO => Action::GoTo {
            name: input.read_string()?,
            percent: input.read_if(params > 1, |i| i.read_u8())?,
        },
        ACTION_GO_TO_STATIC => Action::GoToStatic,
        ACTION_RUN_SCRIPT => Action::RunScript {
            name: input.read_string()?,
        },
        ACTION_GO_TO_RANDOM => read_go_to_random(input, params)?,
        ACTION_HIT => Action::Hit,
        ACTION_DELETE => Action::Delete,
        ACTION_END => Action::End,
        ACTION_GO_TO_IF_PREVIOUS => read_go_to_if_previous(input, params)?,
        ACTION_ADD_PARTICLE => Action::AddParticle {
            particle_id: input.read_i16()?,
            offset_x: input.read_if(params > 1, |i| i.read_i16())?,
            offset_y: input.read_if(params > 2, |i| i.read_i16())?,
            offset_z: input.read_if(params > 3, |i| i.read_i16())?,
        },
        // Id 10 and every unrecognised id decode the same way.
        _ => Action::SetRadius {
            radius: input.read_f32()?,
        },
    })
}

fn read_go_to_random(input: &mut BinaryCursor<'_>, params: u8) -> Result<Action, Error> {
    let first = input.read_string()?;
    if first == OPTIMIZED_SENTINEL {
        let count = (params as usize).saturating_sub(1) / 2;
        let mut names = Vec::with_capacity(count);
        for _ in 0..count {
            names.push(input.read_string()?);
        }
        let mut percents = Vec::with_capacity(count);
        for _ in 0..count {
            percents.push(input.read_u8()?);
        }
        Ok(Action::GoToRandom {
            names,
            percents: Some(percents),
        })
    } else {
        // Non-optimized form: the string already read is the first name and
        // counts toward the `params - 1` total. No percents follow.
        let count = (params as usize).saturating_sub(1);
        let mut names = Vec::with_capacity(count.max(1));
        names.push(first);
        for _ in 1..count {
            names.push(input.read_string()?);
        }
        Ok(Action::GoToRandom {
            names,
            percents: None,
        })
    }
}

fn read_go_to_if_previous(input: &mut BinaryCursor<'_>, params: u8) -> Result<Action, Error> {
    let count = (params as usize).saturating_sub(1) / 2;
    let mut previous = Vec::with_capacity(count);
    let mut next = Vec::with_capacity(count);
    for _ in 0..count {
        previous.push(input.read_string()?);
        next.push(input.read_string()?);
    }
    let default = input.read_if(params % 2 == 1, |i| i.read_string())?;
    Ok(Action::GoToIfPrevious {
        previous,
        next,
        default,
    })
}

fn read_sprite(input: &mut BinaryCursor<'_>) -> Result<Sprite, Error> {
    let tag = input.read_i8()?;
    let id = input.read_i16()?;
    let flags = input.read_u8()?;

    let name = input.read_if(flags & SPRITE_HAS_NAME != 0, |i| i.read_string())?;
    let name_crc = input.read_i32()?;
    let base_name_crc = input.read_i32()?;

    let payload = match tag {
        SPRITE_SINGLE => SpritePayload::Single {
            sprite_id: input.read_i16()?,
            action_info: input.read_array_u16(|i| i.read_i16())?,
        },
        SPRITE_SINGLE_NO_ACTION => SpritePayload::SingleNoAction {
            sprite_id: input.read_i16()?,
        },
        SPRITE_SINGLE_FRAME => SpritePayload::SingleFrame {
            sprite_ids: input.read_array_u16(|i| i.read_i16())?,
            action_info: input.read_array_u16(|i| i.read_i16())?,
        },
        SPRITE_FRAMES => SpritePayload::Frames {
            frame_pos: input.read_array_u16(|i| i.read_i32())?,
            sprite_info: input.read_array_u16(|i| i.read_i16())?,
            action_info: input.read_array_u16(|i| i.read_i16())?,
        },
        other => {
            return Err(Error::InvalidValue {
                message: format!("unknown sprite payload tag {other}"),
            });
        }
    };

    let frame_data = read_frame_data(input)?;

    Ok(Sprite {
        id,
        flags,
        name,
        name_crc,
        base_name_crc,
        payload,
        frame_data,
    })
}

fn read_frame_data(input: &mut BinaryCursor<'_>) -> Result<FrameData, Error> {
    let tag = input.read_u8()?;
    Ok(match tag {
        FRAME_DATA_BYTES => FrameData::Bytes(input.read_array_u32(|i| i.read_u8())?),
        FRAME_DATA_SHORTS => FrameData::Shorts(input.read_array_u32(|i| i.read_u16())?),
        FRAME_DATA_INTS => FrameData::Ints(input.read_array_u32(|i| i.read_u32())?),
        other => {
            return Err(Error::InvalidValue {
                message: format!("unknown frame data tag {other}"),
            });
        }
    })
}

fn read_import(input: &mut BinaryCursor<'_>) -> Result<Import, Error> {
    Ok(Import {
        id: input.read_i16()?,
        name: input.read_string()?,
        file_index: input.read_i32()?,
    })
}
