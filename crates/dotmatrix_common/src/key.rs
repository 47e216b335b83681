/// Frontend-neutral key identifiers.
///
/// Frontends translate their native key codes into this enum so emulator
/// crates never depend on a windowing library.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    A,
    S,
    X,
    Z,
    Enter,
    Escape,
}
