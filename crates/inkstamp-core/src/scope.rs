//! Epoch-scoped lifetimes for input bindings and in-flight work.
//!
//! Every tab activation gets a fresh epoch. Anything registered during that
//! epoch holds an [`AbortToken`]; renewing or aborting the scope flips the
//! token, so stale handlers and late async results can be recognized and
//! dropped.

use std::cell::Cell;
use std::rc::Rc;

/// Handle shared by everything registered during one epoch.
#[derive(Debug, Clone)]
pub struct AbortToken {
    aborted: Rc<Cell<bool>>,
    epoch: u64,
}

impl AbortToken {
    pub fn is_aborted(&self) -> bool {
        self.aborted.get()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Owner of the current epoch.
#[derive(Debug)]
pub struct ListenerScope {
    current: AbortToken,
}

impl Default for ListenerScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerScope {
    pub fn new() -> Self {
        Self {
            current: AbortToken {
                aborted: Rc::new(Cell::new(false)),
                epoch: 0,
            },
        }
    }

    /// Token for work registered in the current epoch.
    pub fn token(&self) -> AbortToken {
        self.current.clone()
    }

    pub fn epoch(&self) -> u64 {
        self.current.epoch
    }

    /// Abort the current epoch and start the next one.
    pub fn renew(&mut self) -> AbortToken {
        self.current.aborted.set(true);
        self.current = AbortToken {
            aborted: Rc::new(Cell::new(false)),
            epoch: self.current.epoch + 1,
        };
        self.token()
    }
}

/// Input channels a tab can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Keystrokes in the type tab's text field.
    TypeInput,
    /// Pointer down/move/up on the drawing surface.
    Pointer,
    /// Stroke thickness slider.
    Thickness,
    /// File picker selection.
    FilePicker,
    /// Drag-over and drop on the image tab.
    Drop,
}

/// A live input binding.
#[derive(Debug, Clone)]
pub struct Binding {
    pub input: InputKind,
    token: AbortToken,
}

impl Binding {
    pub fn new(input: InputKind, token: AbortToken) -> Self {
        Self { input, token }
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_aborted()
    }
}
