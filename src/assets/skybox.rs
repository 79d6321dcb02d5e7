//! Skybox face naming and selection.

/// Suffixes of the six face files, in cubemap layer order.
pub const FACE_SUFFIXES: [&str; 6] = ["rt", "lf", "up", "dn", "ft", "bk"];

/// Paths of the six cubemap faces in +X, -X, +Y, -Y, +Z, -Z order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubemapPaths {
    /// +X face.
    pub right: String,
    /// -X face.
    pub left: String,
    /// +Y face.
    pub up: String,
    /// -Y face.
    pub down: String,
    /// +Z face.
    pub front: String,
    /// -Z face.
    pub back: String,
}

impl CubemapPaths {
    /// Faces of a skybox stored as `{name}_{rt,lf,up,dn,ft,bk}.{ext}`.
    ///
    /// ```
    /// use vista::assets::CubemapPaths;
    ///
    /// let paths = CubemapPaths::from_skybox("skybox/dusk", "png");
    /// assert_eq!(paths.up, "skybox/dusk_up.png");
    /// ```
    #[must_use]
    pub fn from_skybox(name: &str, ext: &str) -> Self {
        let [right, left, up, down, front, back] =
            FACE_SUFFIXES.map(|suffix| format!("{name}_{suffix}.{ext}"));
        Self {
            right,
            left,
            up,
            down,
            front,
            back,
        }
    }

    /// Faces in layer order.
    #[must_use]
    pub fn as_array(&self) -> [&str; 6] {
        [
            &self.right,
            &self.left,
            &self.up,
            &self.down,
            &self.front,
            &self.back,
        ]
    }
}

/// Wrapping selection over a fixed number of skyboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyboxCycle {
    count: usize,
    selected: usize,
}

impl SkyboxCycle {
    /// Cycle over `count` skyboxes starting at the first.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self { count, selected: 0 }
    }

    /// Index of the selected skybox, `None` when there are none.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        (self.count > 0).then_some(self.selected)
    }

    /// Number of skyboxes cycled over.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether there is nothing to cycle over.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Select the next skybox, wrapping to the first.
    pub fn next(&mut self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        self.selected = (self.selected + 1) % self.count;
        Some(self.selected)
    }

    /// Select the previous skybox, wrapping to the last.
    pub fn previous(&mut self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        self.selected = (self.selected + self.count - 1) % self.count;
        Some(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_follow_cubemap_order() {
        let paths = CubemapPaths::from_skybox("sky/night", "jpg");
        assert_eq!(
            paths.as_array(),
            [
                "sky/night_rt.jpg",
                "sky/night_lf.jpg",
                "sky/night_up.jpg",
                "sky/night_dn.jpg",
                "sky/night_ft.jpg",
                "sky/night_bk.jpg",
            ]
        );
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let mut cycle = SkyboxCycle::new(3);
        assert_eq!(cycle.selected(), Some(0));
        assert_eq!(cycle.previous(), Some(2));
        assert_eq!(cycle.next(), Some(0));
        assert_eq!(cycle.next(), Some(1));
        assert_eq!(cycle.next(), Some(2));
        assert_eq!(cycle.next(), Some(0));
    }

    #[test]
    fn empty_cycle_selects_nothing() {
        let mut cycle = SkyboxCycle::new(0);
        assert!(cycle.is_empty());
        assert_eq!(cycle.selected(), None);
        assert_eq!(cycle.next(), None);
        assert_eq!(cycle.previous(), None);
    }
}
