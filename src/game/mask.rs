/// A 1-bit collision shape
///
/// Collisions are decided per pixel so that irregular outlines (a round bird,
/// a pipe with a wider lip) only collide where they actually touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    /// Create an empty mask
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    /// Create a mask by evaluating `solid` at every pixel
    pub fn from_fn(width: usize, height: usize, solid: impl Fn(usize, usize) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.bits[y * width + x] = solid(x, y);
            }
        }
        mask
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at (x, y) is solid; out of range is empty
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.bits[y as usize * self.width + x as usize]
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// Mirror the mask top to bottom
    pub fn flipped_vertical(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.bits[(self.height - 1 - y) * self.width + x]
        })
    }

    /// First solid pixel shared with `other` placed at `offset`
    ///
    /// `offset` is the position of `other`'s top-left corner in this mask's
    /// coordinates. The returned point is in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (dx, dy) = offset;

        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (self.width as i32).min(dx + other.width as i32);
        let y_end = (self.height as i32).min(dy + other.height as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x, y));
                }
            }
        }

        None
    }

    /// Whether any solid pixels are shared with `other` placed at `offset`
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }
}
