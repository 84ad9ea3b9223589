//! System-wide hotkeys using the global-hotkey crate
//!
//! The manager lives on a dedicated thread that also polls the crate's
//! event channel, so no GUI event loop is needed on X11. Presses are
//! forwarded to async code through a tokio channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::domain::hotkey::{HotkeyBinding, Key};

/// How often the listener thread checks for shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Buffered presses before new ones are dropped
const ACTION_BUFFER: usize = 16;

/// What a registered hotkey asks the service to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Run the correction workflow
    Correct,
    /// Show or hide the text panel
    TogglePanel,
}

impl HotkeyAction {
    /// Only the correction hotkey is required to start
    const fn is_required(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

#[derive(Debug, Clone, Error)]
pub enum HotkeyError {
    #[error("Global hotkeys unavailable: {0}")]
    ManagerUnavailable(String),

    #[error("Failed to register hotkey {binding}: {message}")]
    RegisterFailed { binding: String, message: String },

    #[error("Hotkey {0} uses a key that cannot be registered")]
    UnsupportedKey(String),

    #[error("Hotkey listener already started")]
    AlreadyStarted,

    #[error("Hotkey listener thread stopped unexpectedly")]
    ThreadStopped,
}

/// `None` for values the parser never produces
fn key_code(key: Key) -> Option<Code> {
    let code = match key {
        Key::Letter(c) => match c {
            'a' => Code::KeyA,
            'b' => Code::KeyB,
            'c' => Code::KeyC,
            'd' => Code::KeyD,
            'e' => Code::KeyE,
            'f' => Code::KeyF,
            'g' => Code::KeyG,
            'h' => Code::KeyH,
            'i' => Code::KeyI,
            'j' => Code::KeyJ,
            'k' => Code::KeyK,
            'l' => Code::KeyL,
            'm' => Code::KeyM,
            'n' => Code::KeyN,
            'o' => Code::KeyO,
            'p' => Code::KeyP,
            'q' => Code::KeyQ,
            'r' => Code::KeyR,
            's' => Code::KeyS,
            't' => Code::KeyT,
            'u' => Code::KeyU,
            'v' => Code::KeyV,
            'w' => Code::KeyW,
            'x' => Code::KeyX,
            'y' => Code::KeyY,
            'z' => Code::KeyZ,
            _ => return None,
        },
        Key::Digit(c) => match c {
            '0' => Code::Digit0,
            '1' => Code::Digit1,
            '2' => Code::Digit2,
            '3' => Code::Digit3,
            '4' => Code::Digit4,
            '5' => Code::Digit5,
            '6' => Code::Digit6,
            '7' => Code::Digit7,
            '8' => Code::Digit8,
            '9' => Code::Digit9,
            _ => return None,
        },
        Key::Function(n) => match n {
            1 => Code::F1,
            2 => Code::F2,
            3 => Code::F3,
            4 => Code::F4,
            5 => Code::F5,
            6 => Code::F6,
            7 => Code::F7,
            8 => Code::F8,
            9 => Code::F9,
            10 => Code::F10,
            11 => Code::F11,
            12 => Code::F12,
            _ => return None,
        },
        Key::Space => Code::Space,
        Key::Enter => Code::Enter,
        Key::Tab => Code::Tab,
        Key::Escape => Code::Escape,
        Key::Backspace => Code::Backspace,
        Key::Insert => Code::Insert,
        Key::Delete => Code::Delete,
        Key::Home => Code::Home,
        Key::End => Code::End,
        Key::PageUp => Code::PageUp,
        Key::PageDown => Code::PageDown,
        Key::Up => Code::ArrowUp,
        Key::Down => Code::ArrowDown,
        Key::Left => Code::ArrowLeft,
        Key::Right => Code::ArrowRight,
    };
    Some(code)
}

/// Translate a parsed binding into the crate's hotkey type
pub(crate) fn to_hotkey(binding: &HotkeyBinding) -> Result<HotKey, HotkeyError> {
    let code =
        key_code(binding.key).ok_or_else(|| HotkeyError::UnsupportedKey(binding.to_string()))?;
    let m = &binding.modifiers;
    let mut modifiers = Modifiers::empty();
    if m.ctrl {
        modifiers |= Modifiers::CONTROL;
    }
    if m.alt {
        modifiers |= Modifiers::ALT;
    }
    if m.shift {
        modifiers |= Modifiers::SHIFT;
    }
    if m.super_key {
        modifiers |= Modifiers::SUPER;
    }
    let modifiers = (!modifiers.is_empty()).then_some(modifiers);
    Ok(HotKey::new(modifiers, code))
}

/// Listener for a fixed set of hotkey → action registrations
pub struct GlobalHotkeyListener {
    bindings: Vec<(HotkeyBinding, HotkeyAction)>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl GlobalHotkeyListener {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            stop: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Queue a binding; registration with the OS happens in [`start`](Self::start)
    pub fn register(&mut self, binding: HotkeyBinding, action: HotkeyAction) {
        self.bindings.push((binding, action));
    }

    /// Register all bindings and start forwarding presses.
    ///
    /// Fails if the correction hotkey cannot be registered. Other bindings
    /// that fail only log a warning.
    pub fn start(&mut self) -> Result<mpsc::Receiver<HotkeyAction>, HotkeyError> {
        if self.thread.is_some() {
            return Err(HotkeyError::AlreadyStarted);
        }

        let (action_tx, action_rx) = mpsc::channel(ACTION_BUFFER);
        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);
        let bindings = self.bindings.clone();
        let stop = Arc::clone(&self.stop);
        stop.store(false, Ordering::SeqCst);

        let thread = thread::Builder::new()
            .name("texta-hotkeys".into())
            .spawn(move || listen(bindings, stop, action_tx, ready_tx))
            .map_err(|e| HotkeyError::ManagerUnavailable(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                self.thread = Some(thread);
                Ok(action_rx)
            }
            Ok(Err(err)) => {
                let _ = thread.join();
                Err(err)
            }
            Err(_) => {
                let _ = thread.join();
                Err(HotkeyError::ThreadStopped)
            }
        }
    }

    /// Unregister everything and stop the listener thread
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Hotkey listener thread panicked");
            }
            debug!("Hotkey listener stopped");
        }
    }
}

impl Default for GlobalHotkeyListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GlobalHotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of the listener thread
fn listen(
    bindings: Vec<(HotkeyBinding, HotkeyAction)>,
    stop: Arc<AtomicBool>,
    actions: mpsc::Sender<HotkeyAction>,
    ready: std_mpsc::SyncSender<Result<(), HotkeyError>>,
) {
    let manager = match GlobalHotKeyManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            let _ = ready.send(Err(HotkeyError::ManagerUnavailable(e.to_string())));
            return;
        }
    };

    let mut registered: Vec<(HotKey, HotkeyAction)> = Vec::new();
    for (binding, action) in &bindings {
        let result = to_hotkey(binding).and_then(|hotkey| {
            manager
                .register(hotkey)
                .map(|()| hotkey)
                .map_err(|e| HotkeyError::RegisterFailed {
                    binding: binding.to_string(),
                    message: e.to_string(),
                })
        });
        match result {
            Ok(hotkey) => {
                info!(hotkey = %binding, ?action, "Registered global hotkey");
                registered.push((hotkey, *action));
            }
            Err(err) if action.is_required() => {
                for (hotkey, _) in &registered {
                    let _ = manager.unregister(*hotkey);
                }
                let _ = ready.send(Err(err));
                return;
            }
            Err(err) => {
                warn!(hotkey = %binding, error = %err, "Failed to register optional hotkey");
            }
        }
    }

    if ready.send(Ok(())).is_err() {
        return;
    }

    let events = GlobalHotKeyEvent::receiver();
    while !stop.load(Ordering::SeqCst) {
        let event = match events.recv_timeout(POLL_INTERVAL) {
            Ok(event) => event,
            Err(e) if e.is_timeout() => continue,
            Err(_) => break,
        };

        if event.state != HotKeyState::Pressed {
            continue;
        }

        let Some(&(_, action)) = registered.iter().find(|(hotkey, _)| hotkey.id() == event.id) else {
            continue;
        };

        debug!(?action, "Hotkey pressed");
        match actions.try_send(action) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(?action, "Hotkey presses piling up, dropping one");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => break,
        }
    }

    for (hotkey, _) in &registered {
        let _ = manager.unregister(*hotkey);
    }
}
