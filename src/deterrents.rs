//! Best-effort access deterrents.
//!
//! Cancels context-menu, drag-start, selection-start, a fixed set of
//! keyboard shortcuts, and the PrintScreen key-up. None of this prevents
//! access through browser mechanisms outside script control.
//!
//! The shortcut table is the single source of truth: [`classify`] answers for
//! hosts that route events through Rust, and [`deterrent_script`] emits the
//! equivalent listener script for the static page.

use serde::Serialize;

/// Why an event was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Blocked {
    ContextMenu,
    Drag,
    Selection,
    DevTools,
    InspectElement,
    Console,
    ViewSource,
    Save,
    SelectAll,
    Print,
    PrintScreen,
}

/// A key combination to cancel on key-down.
///
/// `ctrl`/`shift` are required modifiers; other modifiers are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shortcut {
    pub key_code: u32,
    pub ctrl: bool,
    pub shift: bool,
    pub blocks: Blocked,
}

const fn key(key_code: u32, ctrl: bool, shift: bool, blocks: Blocked) -> Shortcut {
    Shortcut {
        key_code,
        ctrl,
        shift,
        blocks,
    }
}

pub const F12: u32 = 123;
pub const PRINT_SCREEN: u32 = 44;

/// Key-down combinations that are cancelled.
pub const BLOCKED_SHORTCUTS: &[Shortcut] = &[
    key(F12, false, false, Blocked::DevTools),
    key(73, true, true, Blocked::DevTools), // Ctrl+Shift+I
    key(67, true, true, Blocked::InspectElement), // Ctrl+Shift+C
    key(74, true, true, Blocked::Console), // Ctrl+Shift+J
    key(85, true, false, Blocked::ViewSource), // Ctrl+U
    key(83, true, false, Blocked::Save),   // Ctrl+S
    key(65, true, false, Blocked::SelectAll), // Ctrl+A
    key(80, true, false, Blocked::Print),  // Ctrl+P
];

/// A keyboard event as the page sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub key_code: u32,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn plain(key_code: u32) -> Self {
        Self {
            key_code,
            ..Self::default()
        }
    }

    pub fn ctrl(key_code: u32) -> Self {
        Self {
            key_code,
            ctrl: true,
            shift: false,
        }
    }

    pub fn ctrl_shift(key_code: u32) -> Self {
        Self {
            key_code,
            ctrl: true,
            shift: true,
        }
    }
}

/// Page-wide events the deterrents listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    ContextMenu,
    DragStart,
    SelectStart,
    KeyDown(KeyPress),
    KeyUp(KeyPress),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Cancel(Blocked),
}

impl Shortcut {
    fn matches(&self, press: &KeyPress) -> bool {
        press.key_code == self.key_code
            && (!self.ctrl || press.ctrl)
            && (!self.shift || press.shift)
    }
}

/// Decide whether the page should cancel `event`.
pub fn classify(event: &PageEvent) -> Verdict {
    match event {
        PageEvent::ContextMenu => Verdict::Cancel(Blocked::ContextMenu),
        PageEvent::DragStart => Verdict::Cancel(Blocked::Drag),
        PageEvent::SelectStart => Verdict::Cancel(Blocked::Selection),
        PageEvent::KeyDown(press) => BLOCKED_SHORTCUTS
            .iter()
            .find(|s| s.matches(press))
            .map_or(Verdict::Allow, |s| Verdict::Cancel(s.blocks)),
        PageEvent::KeyUp(press) if press.key_code == PRINT_SCREEN => {
            Verdict::Cancel(Blocked::PrintScreen)
        }
        PageEvent::KeyUp(_) => Verdict::Allow,
    }
}

/// Listener script for the static page, generated from [`BLOCKED_SHORTCUTS`].
pub fn deterrent_script() -> String {
    let table = serde_json::to_string(
        &BLOCKED_SHORTCUTS
            .iter()
            .map(|s| (s.key_code, s.ctrl, s.shift))
            .collect::<Vec<_>>(),
    )
    .unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"(function () {{
  var keys = {table};
  function cancel(e) {{ e.preventDefault(); return false; }}
  document.addEventListener('contextmenu', cancel);
  document.addEventListener('dragstart', cancel);
  document.addEventListener('selectstart', cancel);
  document.addEventListener('keydown', function (e) {{
    for (var i = 0; i < keys.length; i++) {{
      var k = keys[i];
      if (e.keyCode === k[0] && (!k[1] || e.ctrlKey) && (!k[2] || e.shiftKey)) {{
        return cancel(e);
      }}
    }}
  }});
  document.addEventListener('keyup', function (e) {{
    if (e.keyCode === {PRINT_SCREEN}) {{ return cancel(e); }}
  }});
  console.log('%cImage Download Protection Active', 'color: red; font-size: 16px; font-weight: bold;');
  console.log('%cImages in this gallery are protected. Unauthorized downloading is not permitted.', 'color: orange; font-size: 12px;');
}})();"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancels(event: PageEvent) -> bool {
        matches!(classify(&event), Verdict::Cancel(_))
    }

    #[test]
    fn pointer_events_are_cancelled() {
        assert_eq!(
            classify(&PageEvent::ContextMenu),
            Verdict::Cancel(Blocked::ContextMenu)
        );
        assert!(cancels(PageEvent::DragStart));
        assert!(cancels(PageEvent::SelectStart));
    }

    #[test]
    fn devtools_shortcuts() {
        assert_eq!(
            classify(&PageEvent::KeyDown(KeyPress::plain(F12))),
            Verdict::Cancel(Blocked::DevTools)
        );
        assert_eq!(
            classify(&PageEvent::KeyDown(KeyPress::ctrl_shift(73))),
            Verdict::Cancel(Blocked::DevTools)
        );
        assert_eq!(
            classify(&PageEvent::KeyDown(KeyPress::ctrl_shift(67))),
            Verdict::Cancel(Blocked::InspectElement)
        );
        assert_eq!(
            classify(&PageEvent::KeyDown(KeyPress::ctrl_shift(74))),
            Verdict::Cancel(Blocked::Console)
        );
    }

    #[test]
    fn shift_is_required_for_devtools_combos() {
        // Ctrl+I alone is italic in editors, not devtools.
        assert!(!cancels(PageEvent::KeyDown(KeyPress::ctrl(73))));
        assert!(!cancels(PageEvent::KeyDown(KeyPress::plain(73))));
    }

    #[test]
    fn ctrl_shortcuts_ignore_shift() {
        for code in [85, 83, 65, 80] {
            assert!(cancels(PageEvent::KeyDown(KeyPress::ctrl(code))));
            assert!(cancels(PageEvent::KeyDown(KeyPress::ctrl_shift(code))));
            assert!(!cancels(PageEvent::KeyDown(KeyPress::plain(code))));
        }
        assert_eq!(
            classify(&PageEvent::KeyDown(KeyPress::ctrl(83))),
            Verdict::Cancel(Blocked::Save)
        );
    }

    #[test]
    fn ordinary_keys_pass() {
        for code in [37, 39, 27, 32] {
            assert_eq!(
                classify(&PageEvent::KeyDown(KeyPress::plain(code))),
                Verdict::Allow
            );
        }
    }

    #[test]
    fn print_screen_only_on_key_up() {
        assert_eq!(
            classify(&PageEvent::KeyUp(KeyPress::plain(PRINT_SCREEN))),
            Verdict::Cancel(Blocked::PrintScreen)
        );
        assert_eq!(
            classify(&PageEvent::KeyDown(KeyPress::plain(PRINT_SCREEN))),
            Verdict::Allow
        );
        assert_eq!(classify(&PageEvent::KeyUp(KeyPress::plain(65))), Verdict::Allow);
    }

    #[test]
    fn script_embeds_shortcut_table() {
        let script = deterrent_script();
        assert!(script.contains("[123,false,false]"));
        assert!(script.contains("[73,true,true]"));
        assert!(script.contains("[80,true,false]"));
        assert!(script.contains("e.keyCode === 44"));
        assert!(script.contains("'contextmenu'"));
    }
}
