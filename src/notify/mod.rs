//! Change notification and reload signalling
//!
//! The panel reports its dirty state to an observer after every check, and
//! after a successful save tells the window manager and the widget style to
//! re-read their configuration. Both are fire-and-forget.

use crossbeam_channel::Sender;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Events emitted by the panel to its observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// Whether the form differs from the saved configuration
    Changed(bool),
}

/// Reports the dirty flag to an optional observer
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    observer: Option<Sender<PanelEvent>>,
    last: bool,
}

impl ChangeNotifier {
    pub fn new(observer: Option<Sender<PanelEvent>>) -> Self {
        Self {
            observer,
            last: false,
        }
    }

    /// Record and emit the dirty flag. Emits even when unchanged.
    pub fn set_changed(&mut self, changed: bool) {
        self.last = changed;
        if let Some(tx) = &self.observer {
            if tx.send(PanelEvent::Changed(changed)).is_err() {
                debug!("Change observer went away");
            }
        }
    }

    /// Last emitted value
    pub fn is_changed(&self) -> bool {
        self.last
    }
}

/// A session-bus signal without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSignal {
    pub path: &'static str,
    pub interface: &'static str,
    pub member: &'static str,
}

/// Tells the window manager to reload its configuration
pub const KWIN_RELOAD: ReloadSignal = ReloadSignal {
    path: "/KWin",
    interface: "org.kde.KWin",
    member: "reloadConfig",
};

/// Tells the widget style to reload its shadows
pub const STYLE_REPARSE: ReloadSignal = ReloadSignal {
    path: "/BreezeDecoration",
    interface: "org.kde.Breeze.Style",
    member: "reparseConfiguration",
};

/// Signals sent after every successful save, in order
pub const RELOAD_SIGNALS: [ReloadSignal; 2] = [KWIN_RELOAD, STYLE_REPARSE];

impl ReloadSignal {
    /// Arguments for `dbus-send`
    pub fn dbus_send_args(&self) -> Vec<String> {
        vec![
            "--session".to_string(),
            "--type=signal".to_string(),
            self.path.to_string(),
            format!("{}.{}", self.interface, self.member),
        ]
    }
}

/// Delivery of reload signals to other processes
pub trait ReloadNotifier {
    /// Send one signal. Must not block and must not fail the caller.
    fn send(&self, signal: &ReloadSignal);
}

/// Emits signals on the session bus through `dbus-send`
#[derive(Debug, Default)]
pub struct SessionBusNotifier;

impl ReloadNotifier for SessionBusNotifier {
    fn send(&self, signal: &ReloadSignal) {
        let spawned = Command::new("dbus-send")
            .args(signal.dbus_send_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                info!("Sent {}.{} to {}", signal.interface, signal.member, signal.path);
                // Reap in the background so the caller never waits
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => warn!(
                "Failed to send {}.{} (is dbus-send installed?): {}",
                signal.interface, signal.member, e
            ),
        }
    }
}

/// Drops every signal
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl ReloadNotifier for NoopNotifier {
    fn send(&self, signal: &ReloadSignal) {
        debug!("Not sending {}.{}", signal.interface, signal.member);
    }
}

/// Forwards signals over a channel
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: Sender<ReloadSignal>,
}

#[cfg(test)]
impl ChannelNotifier {
    pub fn new(tx: Sender<ReloadSignal>) -> Self {
        Self { tx }
    }
}

#[cfg(test)]
impl ReloadNotifier for ChannelNotifier {
    fn send(&self, signal: &ReloadSignal) {
        let _ = self.tx.send(*signal);
    }
}
