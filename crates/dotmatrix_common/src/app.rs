use anyhow::Result;

use crate::key::Key;

/// Contract between a frontend (window, headless runner, test harness) and
/// an emulator wrapper.
///
/// `update` advances the emulator by one displayed frame and writes RGB24
/// pixels into `screen`. Errors are fatal to the current run.
pub trait App {
    fn init(&mut self);
    fn update(&mut self, screen: &mut [u8]) -> Result<()>;
    fn handle_key_event(&mut self, key: Key, is_down: bool);
    fn should_exit(&self) -> bool;
    fn exit(&mut self);

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn scale(&self) -> u32;
    fn title(&self) -> String;
}
