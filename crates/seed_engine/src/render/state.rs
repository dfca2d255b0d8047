//! Render state bookkeeping
//!
//! Tracks the fixed-function state a frame wants for its color, depth and
//! stencil buffers. Nothing here talks to a graphics API; a backend reads
//! these values when it records commands.
//!
//! Every buffer can be locked. While locked, setters leave the state alone
//! so a pass can pin a configuration that nested draws cannot override.

bitflags::bitflags! {
    /// Color channels that may be written
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        /// Red channel
        const RED = 1 << 0;
        /// Green channel
        const GREEN = 1 << 1;
        /// Blue channel
        const BLUE = 1 << 2;
        /// Alpha channel
        const ALPHA = 1 << 3;
    }
}

/// Comparison used by depth and stencil tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunc {
    /// Never passes
    Never,
    /// Passes if the incoming value is less
    Less,
    /// Passes if the values are equal
    Equal,
    /// Passes if the incoming value is less or equal
    #[default]
    LessEqual,
    /// Passes if the incoming value is greater
    Greater,
    /// Passes if the values differ
    NotEqual,
    /// Passes if the incoming value is greater or equal
    GreaterEqual,
    /// Always passes
    Always,
}

/// Action applied to the stencil buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOp {
    /// Keep the current value
    #[default]
    Keep,
    /// Set to zero
    Zero,
    /// Set to the reference value
    Replace,
    /// Increment, clamping at the maximum
    Increment,
    /// Decrement, clamping at zero
    Decrement,
    /// Bitwise invert
    Invert,
}

/// Color buffer state
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer {
    mask: ColorMask,
    clear_color: [f32; 4],
    locked: bool,
}

impl ColorBuffer {
    /// Set the write mask
    pub fn set_mask(&mut self, mask: ColorMask) {
        if !self.locked {
            self.mask = mask;
        }
    }

    /// Write mask
    pub fn mask(&self) -> ColorMask {
        self.mask
    }

    /// Set the clear color; `premultiplied_alpha` scales RGB by alpha
    pub fn set_clear(&mut self, r: f32, g: f32, b: f32, a: f32, premultiplied_alpha: bool) {
        if self.locked {
            return;
        }
        self.clear_color = if premultiplied_alpha {
            [r * a, g * a, b * a, a]
        } else {
            [r, g, b, a]
        };
    }

    /// Clear color as RGBA
    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Lock or unlock the buffer state
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Whether setters are currently ignored
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Back to defaults, unlocked
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for ColorBuffer {
    fn default() -> Self {
        Self {
            mask: ColorMask::all(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            locked: false,
        }
    }
}

/// Depth buffer state
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    test: bool,
    mask: bool,
    func: CompareFunc,
    clear_depth: f32,
    locked: bool,
}

impl DepthBuffer {
    /// Enable or disable the depth test
    pub fn set_test(&mut self, enabled: bool) {
        if !self.locked {
            self.test = enabled;
        }
    }

    /// Whether the depth test is enabled
    pub fn test(&self) -> bool {
        self.test
    }

    /// Enable or disable depth writes
    pub fn set_mask(&mut self, write: bool) {
        if !self.locked {
            self.mask = write;
        }
    }

    /// Whether depth writes are enabled
    pub fn mask(&self) -> bool {
        self.mask
    }

    /// Set the depth comparison
    pub fn set_func(&mut self, func: CompareFunc) {
        if !self.locked {
            self.func = func;
        }
    }

    /// Depth comparison
    pub fn func(&self) -> CompareFunc {
        self.func
    }

    /// Set the value the depth buffer is cleared to
    pub fn set_clear(&mut self, depth: f32) {
        if !self.locked {
            self.clear_depth = depth;
        }
    }

    /// Depth clear value
    pub fn clear_depth(&self) -> f32 {
        self.clear_depth
    }

    /// Lock or unlock the buffer state
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Back to defaults, unlocked
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for DepthBuffer {
    fn default() -> Self {
        Self {
            test: true,
            mask: true,
            func: CompareFunc::LessEqual,
            clear_depth: 1.0,
            locked: false,
        }
    }
}

/// Stencil buffer state
#[derive(Debug, Clone, PartialEq)]
pub struct StencilBuffer {
    test: bool,
    write_mask: u32,
    func: CompareFunc,
    reference: i32,
    func_mask: u32,
    fail: StencilOp,
    depth_fail: StencilOp,
    depth_pass: StencilOp,
    clear_value: i32,
    locked: bool,
}

impl StencilBuffer {
    /// Enable or disable the stencil test
    pub fn set_test(&mut self, enabled: bool) {
        if !self.locked {
            self.test = enabled;
        }
    }

    /// Whether the stencil test is enabled
    pub fn test(&self) -> bool {
        self.test
    }

    /// Bits of the stencil buffer that may be written
    pub fn set_mask(&mut self, write_mask: u32) {
        if !self.locked {
            self.write_mask = write_mask;
        }
    }

    /// Stencil write mask
    pub fn mask(&self) -> u32 {
        self.write_mask
    }

    /// Set comparison, reference value and compare mask
    pub fn set_func(&mut self, func: CompareFunc, reference: i32, mask: u32) {
        if !self.locked {
            self.func = func;
            self.reference = reference;
            self.func_mask = mask;
        }
    }

    /// `(comparison, reference, compare mask)`
    pub fn func(&self) -> (CompareFunc, i32, u32) {
        (self.func, self.reference, self.func_mask)
    }

    /// Set the actions for stencil fail, depth fail and depth pass
    pub fn set_op(&mut self, fail: StencilOp, depth_fail: StencilOp, depth_pass: StencilOp) {
        if !self.locked {
            self.fail = fail;
            self.depth_fail = depth_fail;
            self.depth_pass = depth_pass;
        }
    }

    /// `(stencil fail, depth fail, depth pass)` actions
    pub fn op(&self) -> (StencilOp, StencilOp, StencilOp) {
        (self.fail, self.depth_fail, self.depth_pass)
    }

    /// Set the value the stencil buffer is cleared to
    pub fn set_clear(&mut self, value: i32) {
        if !self.locked {
            self.clear_value = value;
        }
    }

    /// Stencil clear value
    pub fn clear_value(&self) -> i32 {
        self.clear_value
    }

    /// Lock or unlock the buffer state
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Back to defaults, unlocked
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for StencilBuffer {
    fn default() -> Self {
        Self {
            test: false,
            write_mask: 0xFF,
            func: CompareFunc::Always,
            reference: 0,
            func_mask: 0xFF,
            fail: StencilOp::Keep,
            depth_fail: StencilOp::Keep,
            depth_pass: StencilOp::Keep,
            clear_value: 0,
            locked: false,
        }
    }
}

/// Color, depth and stencil state for one render target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderState {
    /// Color buffer state
    pub color_buffer: ColorBuffer,
    /// Depth buffer state
    pub depth_buffer: DepthBuffer,
    /// Stencil buffer state
    pub stencil_buffer: StencilBuffer,
}

impl RenderState {
    /// Default state for every buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all three buffers to their defaults
    pub fn reset(&mut self) {
        log::trace!("Render state reset");
        self.color_buffer.reset();
        self.depth_buffer.reset();
        self.stencil_buffer.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = RenderState::new();
        assert_eq!(state.color_buffer.mask(), ColorMask::all());
        assert!(state.depth_buffer.test());
        assert_eq!(state.depth_buffer.func(), CompareFunc::LessEqual);
        assert!(!state.stencil_buffer.test());
        assert_eq!(state.stencil_buffer.func(), (CompareFunc::Always, 0, 0xFF));
    }

    #[test]
    fn test_locked_buffers_ignore_setters() {
        let mut state = RenderState::new();

        state.depth_buffer.set_func(CompareFunc::Greater);
        state.depth_buffer.set_locked(true);
        state.depth_buffer.set_func(CompareFunc::Never);
        state.depth_buffer.set_test(false);
        assert_eq!(state.depth_buffer.func(), CompareFunc::Greater);
        assert!(state.depth_buffer.test());

        state.color_buffer.set_locked(true);
        state.color_buffer.set_mask(ColorMask::RED);
        assert!(state.color_buffer.is_locked());
        assert_eq!(state.color_buffer.mask(), ColorMask::all());

        state.color_buffer.set_locked(false);
        state.color_buffer.set_mask(ColorMask::RED | ColorMask::ALPHA);
        assert_eq!(state.color_buffer.mask(), ColorMask::RED | ColorMask::ALPHA);
    }

    #[test]
    fn test_premultiplied_clear_color() {
        let mut color = ColorBuffer::default();
        color.set_clear(1.0, 0.5, 0.25, 0.5, true);
        assert_eq!(color.clear_color(), [0.5, 0.25, 0.125, 0.5]);

        color.set_clear(1.0, 0.5, 0.25, 0.5, false);
        assert_eq!(color.clear_color(), [1.0, 0.5, 0.25, 0.5]);
    }

    #[test]
    fn test_stencil_configuration() {
        let mut stencil = StencilBuffer::default();
        stencil.set_test(true);
        stencil.set_func(CompareFunc::Equal, 1, 0x0F);
        stencil.set_op(StencilOp::Keep, StencilOp::Increment, StencilOp::Replace);
        stencil.set_clear(3);

        assert!(stencil.test());
        assert_eq!(stencil.func(), (CompareFunc::Equal, 1, 0x0F));
        assert_eq!(stencil.op(), (StencilOp::Keep, StencilOp::Increment, StencilOp::Replace));
        assert_eq!(stencil.clear_value(), 3);
    }

    #[test]
    fn test_reset_unlocks_and_restores_defaults() {
        let mut state = RenderState::new();
        state.stencil_buffer.set_mask(0x01);
        state.stencil_buffer.set_locked(true);
        state.depth_buffer.set_clear(0.0);
        state.depth_buffer.set_mask(false);

        state.reset();

        assert_eq!(state, RenderState::default());
        state.stencil_buffer.set_mask(0x02);
        assert_eq!(state.stencil_buffer.mask(), 0x02);
    }
}
