// tween/listener.rs
//
// Per-animation observers for custom float/color tweens. Invoked
// synchronously from `Tweener::advance` on the host's thread.

use std::fmt;
use crate::api::types::Color;

pub type FloatListener = Box<dyn FnMut(f32)>;
pub type ColorListener = Box<dyn FnMut(Color)>;

/// Listeners registered for one animation.
#[derive(Default)]
pub struct ValueListeners {
    float: Vec<FloatListener>,
    color: Vec<ColorListener>,
}

impl ValueListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_float(&mut self, listener: FloatListener) {
        self.float.push(listener);
    }

    pub fn add_color(&mut self, listener: ColorListener) {
        self.color.push(listener);
    }

    pub fn emit_float(&mut self, value: f32) {
        for listener in self.float.iter_mut() {
            listener(value);
        }
    }

    pub fn emit_color(&mut self, value: Color) {
        for listener in self.color.iter_mut() {
            listener(value);
        }
    }
}

impl fmt::Debug for ValueListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueListeners")
            .field("float", &self.float.len())
            .field("color", &self.color.len())
            .finish()
    }
}
