//! Affine, color, and box algebra shared by the decoder and the walker.

/// Row-major 2D affine matrix. Points transform as row vectors, so
/// `a.mult(&b)` applies `a` first, then `b`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform2D {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub m31: f32,
    pub m32: f32,
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        m31: 0.0,
        m32: 0.0,
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            m11: 1.0,
            m12: 0.0,
            m21: 0.0,
            m22: 1.0,
            m31: x,
            m32: y,
        }
    }

    pub fn scale(x: f32, y: f32) -> Self {
        Self {
            m11: x,
            m12: 0.0,
            m21: 0.0,
            m22: y,
            m31: 0.0,
            m32: 0.0,
        }
    }

    /// The four rotation floats come straight from the transform table; they
    /// are not derived from an angle.
    pub fn rotate(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            m11: x0,
            m12: y0,
            m21: x1,
            m22: y1,
            m31: 0.0,
            m32: 0.0,
        }
    }

    pub fn mult(&self, other: &Self) -> Self {
        Self {
            m11: self.m11 * other.m11 + self.m12 * other.m21,
            m12: self.m11 * other.m12 + self.m12 * other.m22,
            m21: self.m21 * other.m11 + self.m22 * other.m21,
            m22: self.m21 * other.m12 + self.m22 * other.m22,
            m31: self.m31 * other.m11 + self.m32 * other.m21 + other.m31,
            m32: self.m31 * other.m12 + self.m32 * other.m22 + other.m32,
        }
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.m11 + y * self.m21 + self.m31,
            x * self.m12 + y * self.m22 + self.m32,
        )
    }

    /// Transforms all four corners of `b` and returns their axis-aligned
    /// bounding box.
    pub fn outer_transformed_box(&self, b: &Box2D) -> Box2D {
        let corners = [
            self.transform_point(b.min[0], b.min[1]),
            self.transform_point(b.max[0], b.min[1]),
            self.transform_point(b.min[0], b.max[1]),
            self.transform_point(b.max[0], b.max[1]),
        ];
        let mut min = corners[0];
        let mut max = corners[0];
        for &(x, y) in &corners[1..] {
            min.0 = min.0.min(x);
            min.1 = min.1.min(y);
            max.0 = max.0.max(x);
            max.1 = max.1.max(y);
        }
        Box2D {
            min: [min.0, min.1],
            max: [max.0, max.1],
        }
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Color transform over (r, g, b, a) in [0, 1].
///
/// Combining two transforms of the same kind folds them eagerly; mixed kinds
/// build a `Combine` node that folds inner-first.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorTransform {
    Multiply([f32; 4]),
    Add([f32; 4]),
    Combine(Box<ColorTransform>, Box<ColorTransform>),
}

impl ColorTransform {
    pub fn identity() -> Self {
        ColorTransform::Multiply([1.0, 1.0, 1.0, 1.0])
    }

    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (ColorTransform::Multiply(a), ColorTransform::Multiply(b)) => {
                ColorTransform::Multiply(mul4(a, b))
            }
            (ColorTransform::Add(a), ColorTransform::Add(b)) => ColorTransform::Add(add4(a, b)),
            (a, b) => ColorTransform::Combine(Box::new(a), Box::new(b)),
        }
    }

    pub fn fold(&self, color: [f32; 4]) -> [f32; 4] {
        match self {
            ColorTransform::Multiply(v) => mul4(*v, color),
            ColorTransform::Add(v) => add4(*v, color),
            ColorTransform::Combine(a, b) => a.fold(b.fold(color)),
        }
    }

    pub fn to_color(&self) -> [f32; 4] {
        self.fold([1.0, 1.0, 1.0, 1.0])
    }
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::identity()
    }
}

fn mul4(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2], a[3] * b[3]]
}

fn add4(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]]
}

/// An affine matrix paired with a color transform; combination combines each
/// field independently, left operand applied first.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SpriteTransform {
    pub position: Transform2D,
    pub color: ColorTransform,
}

impl SpriteTransform {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_position(position: Transform2D) -> Self {
        Self {
            position,
            color: ColorTransform::identity(),
        }
    }

    pub fn combine(&self, other: &Self) -> Self {
        Self {
            position: self.position.mult(&other.position),
            color: self.color.clone().combine(other.color.clone()),
        }
    }
}

/// Axis-aligned box. A box is empty unless both extents are strictly
/// positive; `union` treats empty boxes as the identity.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Box2D {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Box2D {
    pub const EMPTY: Self = Self {
        min: [0.0, 0.0],
        max: [0.0, 0.0],
    };

    pub fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: [x, y],
            max: [x + width, y + height],
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.max[0] > self.min[0] && self.max[1] > self.min[1])
    }

    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: [
                self.min[0].min(other.min[0]),
                self.min[1].min(other.min[1]),
            ],
            max: [
                self.max[0].max(other.max[0]),
                self.max[1].max(other.max[1]),
            ],
        }
    }

    /// Expands by `w` on x and `h` on y, on both sides.
    pub fn inflate(&self, w: f32, h: f32) -> Self {
        Self {
            min: [self.min[0] - w, self.min[1] - h],
            max: [self.max[0] + w, self.max[1] + h],
        }
    }

    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }
}
