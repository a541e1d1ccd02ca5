//=========================================================================
// Input Event Types
//
// Portable representation of the keyboard input delivered by
// the surface service.
//
// Responsibilities:
// - Represent keys and modifier state independently of winit
// - Give every key a stable integer code so it can travel as a `Value`
// - Describe a key transition (press, repeat, release) as one record
//
// Event Flow:
// ```text
// Platform Layer (winit / headless)
//         ↓
//    KeyInput (this module)
//         ↓
//    Surface key callbacks
//         ↓
//    KeyboardManipulatorNode → "keyAction" property cascade
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Discriminants follow the common desktop key-code table (printable keys
/// use their ASCII code, control keys start at 256), so `key as i32` is a
/// stable value to publish through properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum KeyCode {
    //--- Special Keys -----------------------------------------------------

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified = -1,

    Space = 32,

    //--- Numeric Keys -----------------------------------------------------

    Digit0 = 48, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA = 65, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Control Keys -----------------------------------------------------

    Escape = 256,
    Enter = 257,
    Tab = 258,
    Backspace = 259,
    Delete = 261,

    //--- Arrow Keys -------------------------------------------------------

    ArrowRight = 262,
    ArrowLeft = 263,
    ArrowDown = 264,
    ArrowUp = 265,
}

impl KeyCode {
    /// Integer code published by keyboard nodes.
    pub fn code(self) -> i32 {
        self as i32
    }
}

//=== KeyAction ===========================================================

/// Transition reported for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum KeyAction {
    Release = 0,
    Press = 1,

    /// Key held long enough for the OS to auto-repeat.
    Repeat = 2,
}

impl KeyAction {
    pub fn code(self) -> i32 {
        self as i32
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key held (either left or right).
    pub shift: bool,

    /// Ctrl key held (either left or right, Command on macOS).
    pub ctrl: bool,

    /// Alt key held (either left or right, Option on macOS).
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

//=== KeyInput ============================================================

/// One keyboard transition as delivered to key callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: KeyCode,
    pub action: KeyAction,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: KeyCode, action: KeyAction) -> Self {
        Self {
            key,
            action,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
