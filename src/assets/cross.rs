//! Cut a horizontal-cross cubemap image into its six faces.
//!
//! Layout, in face-sized cells on a 4x3 grid:
//!
//! ```text
//!       [up]
//! [left][front][right][back]
//!       [down]
//! ```

use image::{imageops, RgbaImage};

/// Grid cell `(column, row)` of each face, in +X, -X, +Y, -Y, +Z, -Z order.
const FACE_CELLS: [(u32, u32); 6] = [(2, 1), (0, 1), (1, 0), (1, 2), (1, 1), (3, 1)];

/// Split `cross` into cubemap faces.
///
/// Returns `None` unless the image is exactly four faces wide and three
/// faces tall with square, non-empty faces.
#[must_use]
pub fn split_cross(cross: &RgbaImage) -> Option<[RgbaImage; 6]> {
    let (width, height) = cross.dimensions();
    if width == 0 || width % 4 != 0 || height % 3 != 0 {
        return None;
    }
    let face = width / 4;
    if height / 3 != face {
        return None;
    }

    Some(FACE_CELLS.map(|(column, row)| {
        imageops::crop_imm(cross, column * face, row * face, face, face).to_image()
    }))
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn cross(face: u32) -> RgbaImage {
        // Tag each cell with its (column, row) in the red/green channels.
        RgbaImage::from_fn(face * 4, face * 3, |x, y| {
            Rgba([(x / face) as u8, (y / face) as u8, 0, 255])
        })
    }

    #[test]
    fn faces_come_from_their_cells() {
        let faces = split_cross(&cross(8)).unwrap();
        for (face, (column, row)) in faces.iter().zip(FACE_CELLS) {
            assert_eq!(face.dimensions(), (8, 8));
            assert!(face
                .pixels()
                .all(|p| p.0 == [column as u8, row as u8, 0, 255]));
        }
    }

    #[test]
    fn wrong_proportions_are_rejected() {
        assert!(split_cross(&RgbaImage::new(0, 0)).is_none());
        assert!(split_cross(&RgbaImage::new(32, 32)).is_none());
        assert!(split_cross(&RgbaImage::new(30, 24)).is_none());
        assert!(split_cross(&RgbaImage::new(32, 12)).is_none());
    }
}
