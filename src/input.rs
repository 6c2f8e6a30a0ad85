/// Per-tick input signals. How they are polled is up to the frame loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_forward: bool,
    pub move_back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub quit: bool,
}

impl InputState {
    /// +1 forward, -1 back, 0 when neither or both are held.
    #[inline]
    pub fn walk_axis(&self) -> f32 {
        axis(self.move_forward, self.move_back)
    }

    /// +1 right, -1 left.
    #[inline]
    pub fn strafe_axis(&self) -> f32 {
        axis(self.strafe_right, self.strafe_left)
    }

    /// +1 turns clockwise on screen (heading increases).
    #[inline]
    pub fn turn_axis(&self) -> f32 {
        axis(self.rotate_right, self.rotate_left)
    }
}

#[inline]
fn axis(pos: bool, neg: bool) -> f32 {
    pos as i8 as f32 - neg as i8 as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        let input = InputState {
            move_forward: true,
            move_back: true,
            strafe_left: true,
            rotate_right: true,
            ..Default::default()
        };
        assert_eq!(input.walk_axis(), 0.0);
        assert_eq!(input.strafe_axis(), -1.0);
        assert_eq!(input.turn_axis(), 1.0);
    }
}
