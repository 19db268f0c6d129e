use shoal_macros::Event;

/// Mouse buttons reported by the input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Middle,
}

/// A click already mapped from screen to logical coordinates.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ClickWorld {
    pub x: f32,
    pub y: f32,
    pub button: Button,
}
