//! Recursive interpreter over sprites, shapes, and frame streams.
//!
//! The walker is parameterised by a [`BlitSink`], so the same walk serves
//! measurement ([`BoundsSink`]) and rasterisation (an external canvas sink).

use crate::{
    frames_mult, Animation, Box2D, ColorTransform, Error, FrameData, Shape, Sprite, SpritePayload,
    SpriteTransform, Transform2D, TransformTable,
};

const OP_ROTATION: u32 = 0x1;
const OP_TRANSLATION: u32 = 0x2;
const OP_COLOR_MULTIPLY: u32 = 0x4;
const OP_COLOR_ADD: u32 = 0x8;
const OP_MAX: u32 = 0xF;

static EMPTY_TABLE: TransformTable = TransformTable::EMPTY;

/// Receives one call per shape reached by a walk, with the fully combined
/// transform for that shape.
pub trait BlitSink {
    fn draw_shape(&mut self, shape: &Shape, transform: &SpriteTransform);
}

/// Sequential opcode interpreter over a sprite's frame data.
///
/// The position advances across recursive walk calls; one reader is shared by
/// all children of a sprite and is intentionally single-threaded.
pub struct FrameReader<'a> {
    data: &'a FrameData,
    table: &'a TransformTable,
    position: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a FrameData, table: &'a TransformTable) -> Self {
        Self {
            data,
            table,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    fn next(&mut self) -> Result<u32, Error> {
        let value = self
            .data
            .get(self.position)
            .ok_or_else(|| Error::InvalidValue {
                message: format!("frame stream exhausted at position {}", self.position),
            })?;
        self.position += 1;
        Ok(value)
    }

    /// Reads one opcode and its component offsets and returns the composed
    /// transform. The low four opcode bits select rotation, translation,
    /// color-multiply, and color-add; components are read and combined in the
    /// order color-multiply, color-add, rotation, translation. Opcode 0 is
    /// the identity; anything above 15 is unrecognised.
    pub fn read(&mut self) -> Result<SpriteTransform, Error> {
        let opcode = self.next()?;
        if opcode > OP_MAX {
            return Err(Error::MissingTransform { opcode });
        }

        let mut color: Option<ColorTransform> = None;
        if opcode & OP_COLOR_MULTIPLY != 0 {
            let offset = self.next()? as usize;
            color = Some(ColorTransform::Multiply(self.table.color_at(offset)?));
        }
        if opcode & OP_COLOR_ADD != 0 {
            let offset = self.next()? as usize;
            let add = ColorTransform::Add(self.table.color_at(offset)?);
            color = Some(match color {
                Some(current) => current.combine(add),
                None => add,
            });
        }

        let mut position = Transform2D::IDENTITY;
        if opcode & OP_ROTATION != 0 {
            let offset = self.next()? as usize;
            position = self.table.rotation_at(offset)?;
        }
        if opcode & OP_TRANSLATION != 0 {
            let offset = self.next()? as usize;
            position = position.mult(&self.table.translation_at(offset)?);
        }

        Ok(SpriteTransform {
            position,
            color: color.unwrap_or_else(ColorTransform::identity),
        })
    }
}

/// Recursive, single-threaded walk over a sprite graph.
pub struct RenderWalker<'s, S: BlitSink> {
    sink: &'s mut S,
}

impl<'s, S: BlitSink> RenderWalker<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self { sink }
    }

    /// Walks `sprite` (owned by `animation`) for `frame`, blitting every
    /// reached shape into the sink. `parent` is the animation one level up,
    /// consulted for ids that do not resolve locally.
    pub fn render_sprite(
        &mut self,
        animation: &Animation,
        parent: Option<&Animation>,
        sprite: &Sprite,
        transform: &SpriteTransform,
        frame: usize,
    ) -> Result<(), Error> {
        let table = animation.transform.as_ref().unwrap_or(&EMPTY_TABLE);
        let mut reader = FrameReader::new(&sprite.frame_data, table);

        match &sprite.payload {
            SpritePayload::Single { sprite_id, .. }
            | SpritePayload::SingleNoAction { sprite_id } => {
                self.render_by_id(animation, parent, *sprite_id, transform, &mut reader, frame)
            }
            SpritePayload::SingleFrame { sprite_ids, .. } => {
                // The reader is shared across children; each child consumes
                // one opcode from the stream.
                for &id in sprite_ids {
                    self.render_by_id(animation, parent, id, transform, &mut reader, frame)?;
                }
                Ok(())
            }
            SpritePayload::Frames {
                frame_pos,
                sprite_info,
                action_info,
            } => {
                let mult = frames_mult(action_info);
                let frame_count = frame_pos.len() / mult;
                if frame_count == 0 {
                    return Err(Error::InvalidValue {
                        message: "sprite has an empty frame table".to_string(),
                    });
                }
                let index = (frame % frame_count) * mult;
                let offset = usize::try_from(frame_pos[index]).map_err(|_| Error::InvalidValue {
                    message: format!("negative frame offset {}", frame_pos[index]),
                })?;
                let current =
                    usize::try_from(frame_pos[index + 1]).map_err(|_| Error::InvalidValue {
                        message: format!("negative sprite info index {}", frame_pos[index + 1]),
                    })?;
                let count = sprite_info
                    .get(current)
                    .copied()
                    .ok_or_else(|| Error::InvalidValue {
                        message: format!("sprite info index {current} out of range"),
                    })?;
                let count = usize::try_from(count).map_err(|_| Error::InvalidValue {
                    message: format!("negative child count {count}"),
                })?;

                reader.seek(offset);
                for i in 0..count {
                    let id = sprite_info.get(current + 1 + i).copied().ok_or_else(|| {
                        Error::InvalidValue {
                            message: format!("sprite info index {} out of range", current + 1 + i),
                        }
                    })?;
                    self.render_by_id(animation, parent, id, transform, &mut reader, frame)?;
                }
                Ok(())
            }
        }
    }

    fn render_by_id(
        &mut self,
        animation: &Animation,
        parent: Option<&Animation>,
        id: i16,
        parent_transform: &SpriteTransform,
        reader: &mut FrameReader<'_>,
        frame: usize,
    ) -> Result<(), Error> {
        let child = reader.read()?;
        let transform = child.combine(parent_transform);

        if let Some(sprite) = animation.sprite(id) {
            return self.render_sprite(animation, parent, sprite, &transform, frame);
        }
        if let Some(parent_animation) = parent {
            if let Some(sprite) = parent_animation.sprite(id) {
                // The sprite is owned by the parent, so its own references
                // resolve there. The lookup never climbs more than one level.
                return self.render_sprite(parent_animation, None, sprite, &transform, frame);
            }
        }
        if let Some(shape) = animation.shape(i32::from(id)) {
            self.sink.draw_shape(shape, &transform);
            return Ok(());
        }
        Err(Error::UnresolvedId { id: i32::from(id) })
    }
}

/// Sink that accumulates the axis-aligned box of every blit instead of
/// drawing it.
#[derive(Debug, Default)]
pub struct BoundsSink {
    bounds: Box2D,
}

impl BoundsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self) -> Box2D {
        self.bounds
    }
}

impl BlitSink for BoundsSink {
    fn draw_shape(&mut self, shape: &Shape, transform: &SpriteTransform) {
        let rect = Box2D::from_rect(
            shape.offset_x,
            shape.offset_y,
            f32::from(shape.width),
            f32::from(shape.height),
        );
        self.bounds = self
            .bounds
            .union(&transform.position.outer_transformed_box(&rect));
    }
}

/// Measures the box a raster sink would touch: one frame, or the union across
/// all frames when `frame` is `None`.
pub fn measure_sprite(
    animation: &Animation,
    parent: Option<&Animation>,
    sprite: &Sprite,
    transform: &SpriteTransform,
    frame: Option<usize>,
) -> Result<Box2D, Error> {
    let mut sink = BoundsSink::new();
    let mut walker = RenderWalker::new(&mut sink);
    match frame {
        Some(frame) => walker.render_sprite(animation, parent, sprite, transform, frame)?,
        None => {
            for frame in 0..sprite.frame_count().max(1) {
                walker.render_sprite(animation, parent, sprite, transform, frame)?;
            }
        }
    }
    Ok(sink.bounds())
}
