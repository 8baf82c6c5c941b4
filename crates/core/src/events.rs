use crate::types::StripIndex;

/// Operator intent, at most one per control cycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    /// Switch the selected strip to the next animation.
    AdvanceAnimation,
    /// Stop animation on every strip and reset the selection.
    ClearAll,
    /// Make the given strip the target of the following events.
    SelectStrip(StripIndex),
}

pub trait InputSource {
    fn next_event(&mut self) -> Option<InputEvent>;
}

impl InputSource for () {
    fn next_event(&mut self) -> Option<InputEvent> {
        None
    }
}

impl<T: ?Sized + InputSource> InputSource for &mut T {
    fn next_event(&mut self) -> Option<InputEvent> {
        T::next_event(self)
    }
}

/// Buttons pressed on the game controller since the previous cycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ControllerButtons {
    pub left_bumper: bool,
    pub right_bumper: bool,
    pub y: bool,
    pub b: bool,
    pub a: bool,
    pub x: bool,
}

impl ControllerButtons {
    /// Decodes the snapshot into a single event, the first pressed button in priority order wins.
    pub fn event(&self) -> Option<InputEvent> {
        let event = if self.left_bumper {
            InputEvent::AdvanceAnimation
        } else if self.right_bumper {
            InputEvent::ClearAll
        } else if self.y {
            InputEvent::SelectStrip(StripIndex(0))
        } else if self.b {
            InputEvent::SelectStrip(StripIndex(1))
        } else if self.a {
            InputEvent::SelectStrip(StripIndex(2))
        } else if self.x {
            InputEvent::SelectStrip(StripIndex(3))
        } else {
            return None;
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_buttons_no_event() {
        assert_eq!(ControllerButtons::default().event(), None);
    }

    #[test]
    fn test_first_pressed_button_wins() {
        let buttons = ControllerButtons {
            left_bumper: true,
            right_bumper: true,
            x: true,
            ..ControllerButtons::default()
        };
        assert_eq!(buttons.event(), Some(InputEvent::AdvanceAnimation));

        let buttons = ControllerButtons {
            right_bumper: true,
            y: true,
            ..ControllerButtons::default()
        };
        assert_eq!(buttons.event(), Some(InputEvent::ClearAll));

        let buttons = ControllerButtons {
            a: true,
            x: true,
            ..ControllerButtons::default()
        };
        assert_eq!(buttons.event(), Some(InputEvent::SelectStrip(StripIndex(2))));
    }

    #[test]
    fn test_face_buttons_select_strips() {
        let presses = [
            (ControllerButtons { y: true, ..Default::default() }, 0),
            (ControllerButtons { b: true, ..Default::default() }, 1),
            (ControllerButtons { a: true, ..Default::default() }, 2),
            (ControllerButtons { x: true, ..Default::default() }, 3),
        ];
        for (buttons, strip) in presses {
            assert_eq!(
                buttons.event(),
                Some(InputEvent::SelectStrip(StripIndex(strip)))
            );
        }
    }
}
