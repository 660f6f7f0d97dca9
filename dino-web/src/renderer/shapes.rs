//! Shape primitives - triangle-list vertices for rects, ellipses and lines
//!
//! Builders work in canvas pixels (origin top-left, y down). `ShapeBatch`
//! collects them and converts to clip space once per frame.

/// RGBA, each channel in [0, 1]
pub type Color = [f32; 4];

/// Vertex structure for rendering colored shapes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Axis-aligned rectangle as two triangles
pub fn create_rect_vertices(x: f32, y: f32, width: f32, height: f32, color: Color) -> Vec<Vertex> {
    create_gradient_rect_vertices(x, y, width, height, color, color)
}

/// Rectangle shaded from `top` to `bottom`
pub fn create_gradient_rect_vertices(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    top: Color,
    bottom: Color,
) -> Vec<Vertex> {
    if width <= 0.0 || height <= 0.0 {
        return vec![];
    }
    let (x2, y2) = (x + width, y + height);
    vec![
        Vertex { position: [x, y], color: top },
        Vertex { position: [x2, y], color: top },
        Vertex { position: [x2, y2], color: bottom },
        Vertex { position: [x, y], color: top },
        Vertex { position: [x2, y2], color: bottom },
        Vertex { position: [x, y2], color: bottom },
    ]
}

/// Filled ellipse (triangle fan), rotated by `rotation` radians
pub fn create_ellipse_vertices(
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
    rotation: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let (sin_r, cos_r) = rotation.sin_cos();
    let point = |i: u32| {
        let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
        let (ex, ey) = (rx * angle.cos(), ry * angle.sin());
        [cx + ex * cos_r - ey * sin_r, cy + ex * sin_r + ey * cos_r]
    };

    for i in 0..segments {
        vertices.push(Vertex { position: [cx, cy], color });
        vertices.push(Vertex { position: point(i), color });
        vertices.push(Vertex { position: point(i + 1), color });
    }

    vertices
}

/// Filled circle (triangle fan)
pub fn create_circle_vertices(cx: f32, cy: f32, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    create_ellipse_vertices(cx, cy, radius, radius, 0.0, color, segments)
}

/// Line segment rendered as a quad of total thickness `2 * width`
pub fn create_line_vertices(x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color) -> Vec<Vertex> {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len = (dx * dx + dy * dy).sqrt();

    if len < 0.001 {
        return vec![];
    }

    // Perpendicular direction for line thickness
    let px = -dy / len * width;
    let py = dx / len * width;

    vec![
        Vertex { position: [x1 - px, y1 - py], color },
        Vertex { position: [x1 + px, y1 + py], color },
        Vertex { position: [x2 + px, y2 + py], color },
        Vertex { position: [x1 - px, y1 - py], color },
        Vertex { position: [x2 + px, y2 + py], color },
        Vertex { position: [x2 - px, y2 - py], color },
    ]
}

/// Stroked arc from `start` to `end` radians, as a chain of line quads
pub fn create_arc_vertices(
    cx: f32,
    cy: f32,
    radius: f32,
    start: f32,
    end: f32,
    width: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let point = |i: u32| {
        let angle = start + (end - start) * i as f32 / segments as f32;
        (cx + radius * angle.cos(), cy + radius * angle.sin())
    };
    (0..segments)
        .flat_map(|i| {
            let (x1, y1) = point(i);
            let (x2, y2) = point(i + 1);
            create_line_vertices(x1, y1, x2, y2, width, color)
        })
        .collect()
}

/// Canvas size used for the pixel -> clip space conversion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Canvas pixels to clip space (-1 to 1), flip Y
    pub fn to_clip(&self, x: f32, y: f32) -> [f32; 2] {
        [x / self.width * 2.0 - 1.0, 1.0 - y / self.height * 2.0]
    }
}

/// Vertices for one frame, in draw order
#[derive(Default)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, vertices: Vec<Vertex>) {
        self.vertices.extend(vertices);
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.extend(create_rect_vertices(x, y, width, height, color));
    }

    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32, color: Color) {
        self.extend(create_ellipse_vertices(cx, cy, rx, ry, rotation, color, 24));
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        self.extend(create_circle_vertices(cx, cy, radius, color, 16));
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color) {
        self.extend(create_line_vertices(x1, y1, x2, y2, width, color));
    }

    /// Outline of a rectangle
    pub fn frame(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32, color: Color) {
        let (x2, y2) = (x + width, y + height);
        self.line(x, y, x2, y, line_width, color);
        self.line(x2, y, x2, y2, line_width, color);
        self.line(x2, y2, x, y2, line_width, color);
        self.line(x, y2, x, y, line_width, color);
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Pixel-space vertices, as built
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Convert everything to clip space for upload
    pub fn into_clip_space(self, viewport: Viewport) -> Vec<Vertex> {
        self.vertices
            .into_iter()
            .map(|v| Vertex {
                position: viewport.to_clip(v.position[0], v.position[1]),
                color: v.color,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_vertex_counts() {
        let white = [1.0; 4];
        assert_eq!(create_rect_vertices(0.0, 0.0, 10.0, 10.0, white).len(), 6);
        assert!(create_rect_vertices(0.0, 0.0, 0.0, 10.0, white).is_empty());
        assert_eq!(create_circle_vertices(0.0, 0.0, 5.0, white, 12).len(), 36);
        assert!(create_line_vertices(1.0, 1.0, 1.0, 1.0, 2.0, white).is_empty());
        assert_eq!(create_arc_vertices(0.0, 0.0, 8.0, 0.0, 3.0, 1.0, white, 4).len(), 24);
    }

    #[test]
    fn test_rotated_ellipse_stays_within_major_axis() {
        let verts = create_ellipse_vertices(50.0, 50.0, 10.0, 5.0, 0.785, [0.0, 0.0, 0.0, 1.0], 16);
        for v in verts {
            let (dx, dy) = (v.position[0] - 50.0, v.position[1] - 50.0);
            assert!((dx * dx + dy * dy).sqrt() <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn test_clip_space_corners() {
        let vp = Viewport::new(800.0, 400.0);
        assert_eq!(vp.to_clip(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(vp.to_clip(800.0, 400.0), [1.0, -1.0]);
        assert_eq!(vp.to_clip(400.0, 200.0), [0.0, 0.0]);
    }
}
