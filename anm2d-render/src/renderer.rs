//! Loading and export façade over the core walker.

use crate::{load_texture, AnimationType, AssetRoot, Canvas, CanvasSink, RenderError, WebmEncoder};
use anm2d::{
    decode, measure_sprite, Animation, Box2D, RenderWalker, Sprite, SpriteTransform, Transform2D,
};

/// Baseline display scale applied on top of the file's own scale.
pub const DEFAULT_DISPLAY_SCALE: f32 = 2.0;

/// Pixels added around the measured box before allocating a canvas.
const BOUNDS_MARGIN: f32 = 16.0;

struct NamePattern {
    needle: &'static str,
    anchored: bool,
}

impl NamePattern {
    const fn suffix(needle: &'static str) -> Self {
        Self {
            needle,
            anchored: true,
        }
    }

    const fn contains(needle: &'static str) -> Self {
        Self {
            needle,
            anchored: false,
        }
    }

    fn matches(&self, name: &str) -> bool {
        if self.anchored {
            name.ends_with(self.needle)
        } else {
            name.contains(self.needle)
        }
    }
}

/// Ordered name patterns for the default ("static") sprite. Earlier patterns
/// win over later ones regardless of sprite order.
const STATIC_NAME_PATTERNS: [NamePattern; 7] = [
    NamePattern::suffix("1_AnimStatique-Boucle"),
    NamePattern::suffix("1_AnimStatic-Boucle"),
    NamePattern::suffix("1_AnimStatique"),
    NamePattern::suffix("1_AnimStatic"),
    NamePattern::contains("1_AnimStatique"),
    NamePattern::contains("1_AnimStatic"),
    NamePattern::contains("1_AnimMarche"),
];

/// Result of static-sprite discovery: the sprite position, plus the child
/// renderer it was found in (`reference`) when it is not local.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StaticSpriteRef {
    pub reference: Option<usize>,
    pub sprite_index: usize,
}

/// Owns a decoded animation, its atlas texture, and one child renderer per
/// preloaded sibling file. The tree has a single owning root; child walks
/// look up unresolved ids in the parent animation only, never higher.
pub struct AnimationRenderer {
    animation: Animation,
    texture: Option<Canvas>,
    children: Vec<AnimationRenderer>,
}

impl AnimationRenderer {
    /// Loads `animations/<type>/<id>.anm` under `root`, then every sibling
    /// named by its local index, then the atlas texture if one is declared.
    pub fn load(root: &AssetRoot, ty: AnimationType, id: &str) -> Result<Self, RenderError> {
        let path = root.animation_path(ty, id);
        tracing::debug!(path = %path.display(), "loading animation");
        let bytes = std::fs::read(&path)?;
        let animation = decode(&bytes)?;

        let mut children = Vec::new();
        if let Some(index) = &animation.index {
            for name in &index.file_names {
                children.push(AnimationRenderer::load(root, ty, name)?);
            }
        }

        let texture = match &animation.texture {
            Some(texture_ref) => Some(load_texture(&root.atlas_path(ty, &texture_ref.name))?),
            None => None,
        };

        Ok(Self {
            animation,
            texture,
            children,
        })
    }

    /// Assembles a renderer from already-decoded parts.
    pub fn from_parts(
        animation: Animation,
        texture: Option<Canvas>,
        children: Vec<AnimationRenderer>,
    ) -> Self {
        Self {
            animation,
            texture,
            children,
        }
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn texture(&self) -> Option<&Canvas> {
        self.texture.as_ref()
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    pub fn children(&self) -> &[AnimationRenderer] {
        &self.children
    }

    /// The file's own scale (1 when absent) times the display scale.
    pub fn effective_scale(&self) -> f32 {
        let file_scale = self
            .animation
            .index
            .as_ref()
            .and_then(|index| index.scale)
            .unwrap_or(1.0);
        file_scale * DEFAULT_DISPLAY_SCALE
    }

    /// Finds the default sprite: local sprites first, then each child in
    /// order, carrying the child position as `reference`.
    pub fn find_static_sprite(&self) -> Result<StaticSpriteRef, RenderError> {
        if let Some(sprite_index) = self.find_local_static_sprite() {
            return Ok(StaticSpriteRef {
                reference: None,
                sprite_index,
            });
        }
        for (reference, child) in self.children.iter().enumerate() {
            if let Some(sprite_index) = child.find_local_static_sprite() {
                return Ok(StaticSpriteRef {
                    reference: Some(reference),
                    sprite_index,
                });
            }
        }
        Err(RenderError::NoStaticSprite)
    }

    fn find_local_static_sprite(&self) -> Option<usize> {
        for pattern in &STATIC_NAME_PATTERNS {
            let hit = self.animation.sprites.iter().position(|sprite| {
                sprite
                    .name
                    .as_deref()
                    .is_some_and(|name| pattern.matches(name))
            });
            if hit.is_some() {
                return hit;
            }
        }
        None
    }

    fn target(&self, sprite_ref: &StaticSpriteRef) -> (&AnimationRenderer, Option<&Animation>) {
        match sprite_ref.reference {
            None => (self, None),
            Some(reference) => (&self.children[reference], Some(&self.animation)),
        }
    }

    fn target_sprite<'a>(
        &'a self,
        sprite_ref: &StaticSpriteRef,
    ) -> (&'a Sprite, &'a AnimationRenderer, Option<&'a Animation>) {
        let (target, parent) = self.target(sprite_ref);
        (
            &target.animation.sprites[sprite_ref.sprite_index],
            target,
            parent,
        )
    }

    pub fn frame_count(&self, sprite_ref: &StaticSpriteRef) -> usize {
        let (sprite, _, _) = self.target_sprite(sprite_ref);
        sprite.frame_count().max(1)
    }

    /// Measures the sprite at the effective scale: one frame, or the union
    /// across all frames when `frame` is `None`.
    pub fn measure(
        &self,
        sprite_ref: &StaticSpriteRef,
        frame: Option<usize>,
    ) -> Result<Box2D, RenderError> {
        let (sprite, target, parent) = self.target_sprite(sprite_ref);
        let scale = target.effective_scale();
        let root = SpriteTransform::from_position(Transform2D::scale(scale, scale));
        Ok(measure_sprite(
            &target.animation,
            parent,
            sprite,
            &root,
            frame,
        )?)
    }

    /// Renders one frame to PNG bytes, cropped to that frame's measured box
    /// plus the margin.
    pub fn render_frame(
        &self,
        sprite_ref: &StaticSpriteRef,
        frame: usize,
    ) -> Result<Vec<u8>, RenderError> {
        let bounds = self
            .measure(sprite_ref, Some(frame))?
            .inflate(BOUNDS_MARGIN, BOUNDS_MARGIN);
        self.render_canvas(sprite_ref, frame, &bounds)?.to_png()
    }

    /// Renders every frame at a fixed box (measured once across all frames)
    /// and hands the PNG sequence to the external VP9/WebM encoder.
    pub fn render_video(&self, sprite_ref: &StaticSpriteRef) -> Result<Vec<u8>, RenderError> {
        let bounds = self
            .measure(sprite_ref, None)?
            .inflate(BOUNDS_MARGIN, BOUNDS_MARGIN);
        let frame_count = self.frame_count(sprite_ref);
        let (_, target, _) = self.target_sprite(sprite_ref);

        // Frames are staged under a scoped directory that is removed on
        // every exit path, the encoder failing included.
        let staging = tempfile::tempdir()?;
        for frame in 0..frame_count {
            let canvas = self.render_canvas(sprite_ref, frame, &bounds)?;
            std::fs::write(
                staging.path().join(format!("img_{frame:04}.png")),
                canvas.to_png()?,
            )?;
        }

        let output = staging.path().join("animation.webm");
        WebmEncoder::encode(staging.path(), target.animation.frame_rate, &output)?;
        Ok(std::fs::read(&output)?)
    }

    fn render_canvas(
        &self,
        sprite_ref: &StaticSpriteRef,
        frame: usize,
        bounds: &Box2D,
    ) -> Result<Canvas, RenderError> {
        let (sprite, target, parent) = self.target_sprite(sprite_ref);
        let texture = target.texture.as_ref().ok_or(RenderError::MissingTexture)?;

        let width = bounds.width().ceil().max(1.0) as u32;
        let height = bounds.height().ceil().max(1.0) as u32;
        let mut canvas = Canvas::new(width, height);

        let scale = target.effective_scale();
        let center = bounds.center();
        let position = Transform2D::scale(scale, scale).mult(&Transform2D::translate(
            width as f32 / 2.0 - center[0],
            height as f32 / 2.0 - center[1],
        ));
        let root = SpriteTransform::from_position(position);

        let mut sink = CanvasSink::new(&mut canvas, texture);
        RenderWalker::new(&mut sink).render_sprite(&target.animation, parent, sprite, &root, frame)?;
        Ok(canvas)
    }
}
