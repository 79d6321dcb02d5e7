use crate::input::KeyCode;

/// One axis-aligned movement direction in camera space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Along `front`.
    Forward,
    /// Against `front`.
    Backward,
    /// Against `right`.
    Left,
    /// Along `right`.
    Right,
    /// Along the camera `up`.
    Up,
    /// Against the camera `up`.
    Down,
}

impl MoveDirection {
    /// Every direction, in flag order.
    pub const ALL: [Self; 6] = [
        Self::Forward,
        Self::Backward,
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
    ];

    /// Fixed fly-camera layout: W/S/A/D for the horizontal plane, Q/Z for
    /// vertical movement.
    #[must_use]
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(Self::Forward),
            KeyCode::KeyS => Some(Self::Backward),
            KeyCode::KeyA => Some(Self::Left),
            KeyCode::KeyD => Some(Self::Right),
            KeyCode::KeyQ => Some(Self::Up),
            KeyCode::KeyZ => Some(Self::Down),
            _ => None,
        }
    }
}

/// Movement intent flags, set and cleared by key events and consumed every
/// frame by [`Camera::update`](super::Camera::update).
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    /// Move along `front`.
    pub forward: bool,
    /// Move against `front`.
    pub backward: bool,
    /// Move against `right`.
    pub left: bool,
    /// Move along `right`.
    pub right: bool,
    /// Move along `up`.
    pub up: bool,
    /// Move against `up`.
    pub down: bool,
}

impl MovementIntent {
    /// Set or clear the flag for one direction.
    pub fn set(&mut self, direction: MoveDirection, active: bool) {
        let flag = match direction {
            MoveDirection::Forward => &mut self.forward,
            MoveDirection::Backward => &mut self.backward,
            MoveDirection::Left => &mut self.left,
            MoveDirection::Right => &mut self.right,
            MoveDirection::Up => &mut self.up,
            MoveDirection::Down => &mut self.down,
        };
        *flag = active;
    }

    /// Read the flag for one direction.
    #[must_use]
    pub fn is_active(&self, direction: MoveDirection) -> bool {
        match direction {
            MoveDirection::Forward => self.forward,
            MoveDirection::Backward => self.backward,
            MoveDirection::Left => self.left,
            MoveDirection::Right => self.right,
            MoveDirection::Up => self.up,
            MoveDirection::Down => self.down,
        }
    }

    /// `true` when no direction is held.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_flags_read_back_per_direction() {
        let mut intent = MovementIntent::default();
        intent.set(MoveDirection::Up, true);
        intent.set(MoveDirection::Left, true);
        intent.set(MoveDirection::Left, false);

        let active: Vec<MoveDirection> = MoveDirection::ALL
            .into_iter()
            .filter(|d| intent.is_active(*d))
            .collect();
        assert_eq!(active, vec![MoveDirection::Up]);
        assert!(intent.up);
        assert!(!intent.is_idle());
    }

    #[test]
    fn only_fly_keys_map_to_directions() {
        assert_eq!(MoveDirection::from_key(KeyCode::KeyZ), Some(MoveDirection::Down));
        assert_eq!(MoveDirection::from_key(KeyCode::KeyE), None);
    }
}
