//! Small vector helpers. The scene only ever needs a handful of 2D and 3D
//! operations so these stay as plain arrays, which is also what the GPU
//! vertex layout wants.

pub type Vec2 = [f32; 2];
pub type Vec3 = [f32; 3];
pub type Rgba = [f32; 4];

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

/// Rotate `v` about the Y axis by `ry`, then about the X axis by `rx`.
pub fn rotate_xy(v: Vec3, rx: f32, ry: f32) -> Vec3 {
    let (sy, cy) = ry.sin_cos();
    let x1 = v[0] * cy + v[2] * sy;
    let z1 = -v[0] * sy + v[2] * cy;
    let y1 = v[1];

    let (sx, cx) = rx.sin_cos();
    let y2 = y1 * cx - z1 * sx;
    let z2 = y1 * sx + z1 * cx;

    [x1, y2, z2]
}

/// HSL to RGB with all components in `[0, 1]`. Hue wraps.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let (p, q, h) = (p as f64, q as f64, h as f64);

    [
        hue_to_rgb(p, q, h + 1.0 / 3.0) as f32,
        hue_to_rgb(p, q, h) as f32,
        hue_to_rgb(p, q, h - 1.0 / 3.0) as f32,
    ]
}

// f64 so the sector boundaries land exactly on the primaries.
fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);

    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}
