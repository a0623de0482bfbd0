// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Keyboard bindings for the roll.
//!
//! Maps terminal key presses onto [`ControlAction`]s and renders the
//! status-line key help from the same table, so the two never drift apart.

use crossterm::event::{KeyCode, KeyModifiers};

use super::ControlAction;

/// Tempo change per key press, in BPM
pub const TEMPO_STEP: f64 = 5.0;

/// A key together with the modifiers held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Short label used in the key help
    pub fn label(&self) -> String {
        let key = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Home => "Home".to_string(),
            other => format!("{:?}", other),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", key)
        } else {
            key
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    press: KeyPress,
    action: ControlAction,
    /// Aliases (shifted keys, second quit keys) stay out of the help line
    in_help: bool,
}

/// Ordered key-to-action table
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Keymap {
    /// The roll's standard bindings
    pub fn new() -> Self {
        use ControlAction::*;

        let none = KeyModifiers::NONE;
        let mut keymap = Self {
            bindings: Vec::new(),
        };
        keymap.bind(KeyCode::Char(' '), none, TogglePlay, true);
        keymap.bind(KeyCode::Home, none, SeekStart, true);
        keymap.bind(KeyCode::Left, none, SeekBars(-1.0), true);
        keymap.bind(KeyCode::Right, none, SeekBars(1.0), true);
        keymap.bind(KeyCode::Up, none, AdjustTempo(TEMPO_STEP), true);
        keymap.bind(KeyCode::Down, none, AdjustTempo(-TEMPO_STEP), true);
        keymap.bind(KeyCode::Char('+'), none, AdjustZoom(1), true);
        keymap.bind(KeyCode::Char('-'), none, AdjustZoom(-1), true);
        // '+' arrives shifted on most layouts
        keymap.bind(KeyCode::Char('+'), KeyModifiers::SHIFT, AdjustZoom(1), false);
        keymap.bind(KeyCode::Char('='), none, AdjustZoom(1), false);
        keymap.bind(KeyCode::Char('['), none, AdjustResolution(-1), true);
        keymap.bind(KeyCode::Char(']'), none, AdjustResolution(1), true);
        keymap.bind(KeyCode::Char('q'), none, Quit, true);
        keymap.bind(KeyCode::Esc, none, Quit, false);
        keymap.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, Quit, false);
        keymap
    }

    /// Bind a key, replacing any earlier binding of the same press
    pub fn bind(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        action: ControlAction,
        in_help: bool,
    ) {
        let press = KeyPress::new(code, modifiers);
        self.bindings.retain(|b| b.press != press);
        self.bindings.push(Binding {
            press,
            action,
            in_help,
        });
    }

    /// Action bound to a key press
    pub fn action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<&ControlAction> {
        let press = KeyPress::new(code, modifiers);
        self.bindings
            .iter()
            .find(|b| b.press == press)
            .map(|b| &b.action)
    }

    /// One-line key help: keys sharing a hint are joined with `/`, in
    /// binding order (`Space: Play/Pause | ←/→: Bar | ...`)
    pub fn help_line(&self) -> String {
        let mut groups: Vec<(&'static str, Vec<String>)> = Vec::new();
        for binding in self.bindings.iter().filter(|b| b.in_help) {
            let hint = binding.action.hint();
            let label = binding.press.label();
            match groups.iter_mut().find(|(h, _)| *h == hint) {
                Some((_, keys)) => keys.push(label),
                None => groups.push((hint, vec![label])),
            }
        }
        groups
            .iter()
            .map(|(hint, keys)| format!("{}: {}", keys.join("/"), hint))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}
