use crate::{
    measure_sprite, Animation, BlitSink, Box2D, ColorTransform, Error, FrameData, FrameReader,
    RenderWalker, Shape, Sprite, SpritePayload, SpriteTransform, Transform2D, TransformTable,
};

fn shape(id: i32, width: u16, height: u16, offset_x: f32, offset_y: f32) -> Shape {
    Shape {
        id,
        texture_index: 0,
        top: 0.0,
        left: 0.0,
        bottom: 1.0,
        right: 1.0,
        width,
        height,
        offset_x,
        offset_y,
    }
}

fn sprite(id: i16, payload: SpritePayload, frame_data: FrameData) -> Sprite {
    Sprite {
        id,
        flags: 0,
        name: None,
        name_crc: 0,
        base_name_crc: 0,
        payload,
        frame_data,
    }
}

fn animation(
    shapes: Vec<Shape>,
    transform: Option<TransformTable>,
    sprites: Vec<Sprite>,
) -> Animation {
    Animation::new(0, 24, None, None, shapes, transform, sprites, Vec::new())
}

fn table() -> TransformTable {
    TransformTable {
        colors: vec![0.5, 0.5, 0.5, 0.5, 0.1, 0.2, 0.3, 0.4],
        rotations: vec![0.0, 1.0, -1.0, 0.0],
        translations: vec![10.0, 20.0, -5.0, 5.0],
        actions: Vec::new(),
    }
}

#[derive(Default)]
struct RecordingSink {
    draws: Vec<(i32, SpriteTransform)>,
}

impl BlitSink for RecordingSink {
    fn draw_shape(&mut self, shape: &Shape, transform: &SpriteTransform) {
        self.draws.push((shape.id, transform.clone()));
    }
}

#[test]
fn opcode_zero_is_identity() {
    let table = table();
    let data = FrameData::Bytes(vec![0]);
    let mut reader = FrameReader::new(&data, &table);
    let transform = reader.read().expect("read");
    assert_eq!(transform, SpriteTransform::identity());
    assert_eq!(reader.position(), 1);
}

#[test]
fn opcode_three_reads_rotation_then_translation() {
    let table = table();
    let data = FrameData::Bytes(vec![3, 0, 0]);
    let mut reader = FrameReader::new(&data, &table);
    let transform = reader.read().expect("read");
    let expected = Transform2D::rotate(0.0, 1.0, -1.0, 0.0)
        .mult(&Transform2D::translate(10.0, 20.0));
    assert_eq!(transform.position, expected);
    assert_eq!(transform.color, ColorTransform::identity());
    assert_eq!(reader.position(), 3);
}

#[test]
fn opcode_twelve_combines_multiply_then_add() {
    let table = table();
    let data = FrameData::Bytes(vec![12, 0, 4]);
    let mut reader = FrameReader::new(&data, &table);
    let transform = reader.read().expect("read");
    assert_eq!(transform.position, Transform2D::IDENTITY);
    // Multiply on the left, add folded first: 0.5 * (1 + add).
    let color = transform.color.to_color();
    assert!((color[0] - 0.55).abs() < 1.0e-5);
    assert!((color[1] - 0.6).abs() < 1.0e-5);
    assert!((color[2] - 0.65).abs() < 1.0e-5);
    assert!((color[3] - 0.7).abs() < 1.0e-5);
}

#[test]
fn opcode_above_fifteen_is_missing_transform() {
    let table = table();
    let data = FrameData::Bytes(vec![16]);
    let mut reader = FrameReader::new(&data, &table);
    let err = reader.read().unwrap_err();
    assert!(matches!(err, Error::MissingTransform { opcode: 16 }));
}

#[test]
fn exhausted_frame_stream_fails() {
    let table = table();
    let data = FrameData::Bytes(vec![2]);
    let mut reader = FrameReader::new(&data, &table);
    // Tag 2 wants a translation offset that is not there.
    assert!(reader.read().is_err());
}

#[test]
fn opcode_wider_than_a_byte_needs_wide_storage() {
    let table = table();
    let data = FrameData::Ints(vec![2, 2]);
    let mut reader = FrameReader::new(&data, &table);
    let transform = reader.read().expect("read");
    assert_eq!(
        transform.position,
        Transform2D::translate(-5.0, 5.0)
    );
}

#[test]
fn single_no_action_draws_one_shape_with_identity() {
    let animation = animation(
        vec![shape(99, 10, 10, 0.0, 0.0)],
        None,
        vec![sprite(
            1,
            SpritePayload::SingleNoAction { sprite_id: 99 },
            FrameData::Bytes(vec![0]),
        )],
    );
    let mut sink = RecordingSink::default();
    RenderWalker::new(&mut sink)
        .render_sprite(
            &animation,
            None,
            &animation.sprites[0],
            &SpriteTransform::identity(),
            0,
        )
        .expect("walk");
    assert_eq!(sink.draws.len(), 1);
    assert_eq!(sink.draws[0].0, 99);
    assert_eq!(sink.draws[0].1, SpriteTransform::identity());
}

#[test]
fn single_frame_children_consume_the_shared_reader_in_order() {
    let animation = animation(
        vec![shape(50, 4, 4, 0.0, 0.0), shape(51, 4, 4, 0.0, 0.0)],
        Some(table()),
        vec![sprite(
            1,
            SpritePayload::SingleFrame {
                sprite_ids: vec![50, 51],
                action_info: Vec::new(),
            },
            FrameData::Bytes(vec![2, 0, 2, 2]),
        )],
    );
    let mut sink = RecordingSink::default();
    RenderWalker::new(&mut sink)
        .render_sprite(
            &animation,
            None,
            &animation.sprites[0],
            &SpriteTransform::identity(),
            0,
        )
        .expect("walk");
    assert_eq!(sink.draws.len(), 2);
    assert_eq!(sink.draws[0].0, 50);
    assert_eq!(
        sink.draws[0].1.position,
        Transform2D::translate(10.0, 20.0)
    );
    assert_eq!(sink.draws[1].0, 51);
    assert_eq!(sink.draws[1].1.position, Transform2D::translate(-5.0, 5.0));
}

fn two_frame_animation() -> Animation {
    // Frame 0 seeks offset 0 (translation 10,20), frame 1 offset 2 (-5,5).
    animation(
        vec![shape(99, 10, 10, 0.0, 0.0)],
        Some(table()),
        vec![sprite(
            1,
            SpritePayload::Frames {
                frame_pos: vec![0, 0, 2, 2],
                sprite_info: vec![1, 99, 1, 99],
                action_info: Vec::new(),
            },
            FrameData::Bytes(vec![2, 0, 2, 2]),
        )],
    )
}

#[test]
fn frames_sprite_renders_frame_modulo_frame_count() {
    let animation = two_frame_animation();
    let sprite = &animation.sprites[0];
    assert_eq!(sprite.frame_count(), 2);

    let root = SpriteTransform::identity();
    let frame0 = measure_sprite(&animation, None, sprite, &root, Some(0)).expect("frame 0");
    let frame1 = measure_sprite(&animation, None, sprite, &root, Some(1)).expect("frame 1");
    let frame2 = measure_sprite(&animation, None, sprite, &root, Some(2)).expect("frame 2");
    let frame7 = measure_sprite(&animation, None, sprite, &root, Some(7)).expect("frame 7");

    assert_eq!(frame0, Box2D::from_rect(10.0, 20.0, 10.0, 10.0));
    assert_eq!(frame1, Box2D::from_rect(-5.0, 5.0, 10.0, 10.0));
    assert_eq!(frame2, frame0);
    assert_eq!(frame7, frame1);
}

#[test]
fn measure_across_all_frames_unions_every_frame() {
    let animation = two_frame_animation();
    let bounds = measure_sprite(
        &animation,
        None,
        &animation.sprites[0],
        &SpriteTransform::identity(),
        None,
    )
    .expect("measure");
    assert_eq!(bounds, Box2D::new([-5.0, 5.0], [20.0, 30.0]));
}

#[test]
fn measure_applies_the_root_transform() {
    let animation = two_frame_animation();
    let root = SpriteTransform::from_position(Transform2D::scale(2.0, 2.0));
    let bounds =
        measure_sprite(&animation, None, &animation.sprites[0], &root, Some(0)).expect("measure");
    assert_eq!(bounds, Box2D::from_rect(20.0, 40.0, 20.0, 20.0));
}

#[test]
fn unresolved_id_aborts_the_walk() {
    let animation = animation(
        Vec::new(),
        None,
        vec![sprite(
            1,
            SpritePayload::SingleNoAction { sprite_id: 42 },
            FrameData::Bytes(vec![0]),
        )],
    );
    let mut sink = RecordingSink::default();
    let err = RenderWalker::new(&mut sink)
        .render_sprite(
            &animation,
            None,
            &animation.sprites[0],
            &SpriteTransform::identity(),
            0,
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedId { id: 42 }));
}

#[test]
fn ids_resolve_in_the_parent_animation() {
    let parent = animation(
        vec![shape(7, 8, 8, 1.0, 2.0)],
        None,
        vec![sprite(
            5,
            SpritePayload::SingleNoAction { sprite_id: 7 },
            FrameData::Bytes(vec![0]),
        )],
    );
    let child = animation(
        Vec::new(),
        None,
        vec![sprite(
            1,
            SpritePayload::SingleNoAction { sprite_id: 5 },
            FrameData::Bytes(vec![0]),
        )],
    );

    let mut sink = RecordingSink::default();
    RenderWalker::new(&mut sink)
        .render_sprite(
            &child,
            Some(&parent),
            &child.sprites[0],
            &SpriteTransform::identity(),
            0,
        )
        .expect("walk");
    assert_eq!(sink.draws.len(), 1);
    assert_eq!(sink.draws[0].0, 7);
}

#[test]
fn own_sprites_shadow_parent_sprites() {
    let parent = animation(
        vec![shape(30, 8, 8, 0.0, 0.0)],
        None,
        vec![sprite(
            5,
            SpritePayload::SingleNoAction { sprite_id: 30 },
            FrameData::Bytes(vec![0]),
        )],
    );
    let child = animation(
        vec![shape(31, 8, 8, 0.0, 0.0)],
        None,
        vec![
            sprite(
                1,
                SpritePayload::SingleNoAction { sprite_id: 5 },
                FrameData::Bytes(vec![0]),
            ),
            sprite(
                5,
                SpritePayload::SingleNoAction { sprite_id: 31 },
                FrameData::Bytes(vec![0]),
            ),
        ],
    );

    let mut sink = RecordingSink::default();
    RenderWalker::new(&mut sink)
        .render_sprite(
            &child,
            Some(&parent),
            &child.sprites[0],
            &SpriteTransform::identity(),
            0,
        )
        .expect("walk");
    assert_eq!(sink.draws.len(), 1);
    assert_eq!(sink.draws[0].0, 31);
}

#[test]
fn sprites_take_precedence_over_shapes() {
    // Id 5 names both a sprite and a shape; the sprite wins.
    let animation = animation(
        vec![shape(5, 8, 8, 0.0, 0.0), shape(6, 2, 2, 0.0, 0.0)],
        None,
        vec![
            sprite(
                1,
                SpritePayload::SingleNoAction { sprite_id: 5 },
                FrameData::Bytes(vec![0]),
            ),
            sprite(
                5,
                SpritePayload::SingleNoAction { sprite_id: 6 },
                FrameData::Bytes(vec![0]),
            ),
        ],
    );
    let mut sink = RecordingSink::default();
    RenderWalker::new(&mut sink)
        .render_sprite(
            &animation,
            None,
            &animation.sprites[0],
            &SpriteTransform::identity(),
            0,
        )
        .expect("walk");
    assert_eq!(sink.draws.len(), 1);
    assert_eq!(sink.draws[0].0, 6);
}

#[test]
fn empty_frame_table_is_invalid() {
    let animation = animation(
        Vec::new(),
        None,
        vec![sprite(
            1,
            SpritePayload::Frames {
                frame_pos: Vec::new(),
                sprite_info: Vec::new(),
                action_info: Vec::new(),
            },
            FrameData::Bytes(Vec::new()),
        )],
    );
    let mut sink = RecordingSink::default();
    let err = RenderWalker::new(&mut sink)
        .render_sprite(
            &animation,
            None,
            &animation.sprites[0],
            &SpriteTransform::identity(),
            0,
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));
}

#[test]
fn child_transforms_compose_onto_the_parent_transform() {
    let animation = animation(
        vec![shape(99, 10, 10, 0.0, 0.0)],
        Some(table()),
        vec![sprite(
            1,
            SpritePayload::SingleNoAction { sprite_id: 99 },
            FrameData::Bytes(vec![2, 0]),
        )],
    );
    let root = SpriteTransform::from_position(Transform2D::scale(2.0, 2.0));
    let mut sink = RecordingSink::default();
    RenderWalker::new(&mut sink)
        .render_sprite(&animation, None, &animation.sprites[0], &root, 0)
        .expect("walk");
    // Child translation applies first, then the parent scale.
    assert_eq!(
        sink.draws[0].1.position,
        Transform2D::translate(10.0, 20.0).mult(&Transform2D::scale(2.0, 2.0))
    );
}
