use winit::keyboard::{KeyCode, PhysicalKey};

use crate::sim::Channel;

pub const QUIT_KEY: KeyCode = KeyCode::Escape;

const KEY_BINDINGS: [(KeyCode, Channel); 9] = [
    (KeyCode::KeyW, Channel::Forward),
    (KeyCode::ArrowUp, Channel::Forward),
    (KeyCode::KeyS, Channel::Backward),
    (KeyCode::ArrowDown, Channel::Backward),
    (KeyCode::KeyA, Channel::Left),
    (KeyCode::ArrowLeft, Channel::Left),
    (KeyCode::KeyD, Channel::Right),
    (KeyCode::ArrowRight, Channel::Right),
    (KeyCode::Space, Channel::Handbrake),
];

pub fn channel_for_key(key: PhysicalKey) -> Option<Channel> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == code)
        .map(|(_, channel)| *channel)
}
