//! Herald - Console Output and Notification Events
//!
//! Shared output layer for the Meridian dashboard tools: leveled console
//! logging plus the typed notification events the refresh and export
//! machinery emits toward whatever notification surface is attached.
//!
//! ## Features
//!
//! - Standard logging levels (info, warn, error, debug, success)
//! - Multi-line message support with consistent formatting
//! - Typed `Notification` events (refresh/export outcomes)
//! - Pluggable `Notifier` sink with console and in-memory implementations
//! - All log output to stderr

use chrono::{DateTime, Local};
use colored::*;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Core logging function that handles the actual output
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Format a colored prefix for log messages
fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7 - prefix.len() - 2)
}

/// Info level logging - general information
pub fn info(message: &str) {
  let prefix = format_prefix(Color::Blue, "info");
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Warning level logging - something needs attention
pub fn warn(message: &str) {
  let prefix = format_prefix(Color::Yellow, "warn");
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  let prefix = format_prefix(Color::Red, "error");
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Debug level logging - detailed diagnostic information
pub fn debug(message: &str) {
  let prefix = format_prefix(Color::Magenta, "debug");
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Success level logging - something completed successfully
pub fn success(message: &str) {
  let prefix = format_prefix(Color::Green, "sccs");
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Create a banner line of the specified length and character
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

/// Display a message with a banner around it
pub fn as_banner<F>(log_fn: F, message: &str, width: Option<usize>, border_char: Option<char>)
where
  F: Fn(&str),
{
  let width = width.unwrap_or(50);
  let border_char = border_char.unwrap_or('=');

  let banner = banner_line(width, border_char);

  log_fn(&banner);
  log_fn(message);
  log_fn(&banner);
}

/// What happened, from the notification surface's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
  RefreshSuccess,
  RefreshFailure,
  ExportSuccess,
}

/// One event destined for the attached notification surface (toast UI,
/// console, test buffer). The core emits these; it never renders them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub kind: NotificationKind,
  pub message: String,
  pub timestamp: DateTime<Local>,
}

impl Notification {
  pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
    Self { kind, message: message.into(), timestamp: Local::now() }
  }

  /// Human-readable local time, e.g. "02:41 PM"
  pub fn local_time(&self) -> String {
    self.timestamp.format("%I:%M %p").to_string()
  }
}

/// Sink for notification events. Implemented by the console sink below, by
/// the in-memory buffer used in tests, and by whatever toast surface a host
/// application attaches.
pub trait Notifier: Send + Sync {
  fn notify(&self, notification: Notification);
}

/// Console implementation - renders events through the leveled loggers
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
  fn notify(&self, notification: Notification) {
    match notification.kind {
      NotificationKind::RefreshSuccess | NotificationKind::ExportSuccess => {
        success(&notification.message)
      }
      NotificationKind::RefreshFailure => warn(&notification.message),
    }
  }
}

/// In-memory implementation - collects events for later inspection
#[derive(Debug, Default)]
pub struct MemoryNotifier {
  events: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of everything received so far, in arrival order
  pub fn events(&self) -> Vec<Notification> {
    self.events.lock().map(|events| events.clone()).unwrap_or_default()
  }
}

impl Notifier for MemoryNotifier {
  fn notify(&self, notification: Notification) {
    if let Ok(mut events) = self.events.lock() {
      events.push(notification);
    }
  }
}
