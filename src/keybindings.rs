use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NewWindow,
    CloseWindow,
    ToggleMaximize,
    Minimize,
    Restore,
    SnapLeft,
    SnapRight,
    // Focus cycling
    FocusNext,
    FocusPrev,
    ToggleTouchLayout,
    ToggleMouseCapture,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::NewWindow => "New window",
            Action::CloseWindow => "Close focused window",
            Action::ToggleMaximize => "Maximize / restore",
            Action::Minimize => "Minimize",
            Action::Restore => "Restore focused or last minimized window",
            Action::SnapLeft => "Snap left",
            Action::SnapRight => "Snap right",
            Action::FocusNext => "Focus next (Tab)",
            Action::FocusPrev => "Focus previous (BackTab)",
            Action::ToggleTouchLayout => "Toggle touch layout",
            Action::ToggleMouseCapture => "Toggle mouse capture",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// The desktop's stock bindings.
    pub fn desktop() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::ctrl('q'));
        kb.add(NewWindow, KeyCombo::ctrl('n'));
        kb.add(CloseWindow, KeyCombo::ctrl('w'));
        kb.add(ToggleMaximize, KeyCombo::ctrl('m'));
        kb.add(ToggleMaximize, KeyCombo::new(KeyCode::Up, KeyModifiers::ALT));
        kb.add(Minimize, KeyCombo::ctrl('h'));
        kb.add(Minimize, KeyCombo::new(KeyCode::Down, KeyModifiers::ALT));
        kb.add(Restore, KeyCombo::ctrl('r'));
        kb.add(SnapLeft, KeyCombo::new(KeyCode::Left, KeyModifiers::ALT));
        kb.add(SnapRight, KeyCombo::new(KeyCode::Right, KeyModifiers::ALT));
        kb.add(FocusNext, KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE));
        kb.add(FocusPrev, KeyCombo::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        kb.add(FocusPrev, KeyCombo::new(KeyCode::BackTab, KeyModifiers::NONE));
        kb.add(ToggleTouchLayout, KeyCombo::new(KeyCode::F(2), KeyModifiers::NONE));
        kb.add(ToggleMouseCapture, KeyCombo::new(KeyCode::F(3), KeyModifiers::NONE));
        kb
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(act, _)| *act)
    }

    /// Display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}
