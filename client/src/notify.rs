//! Operator notifications
//!
//! Stand-in for the toast layer of the original dashboard: the controller and
//! composer report outcomes through this trait, the binary prints them to the
//! terminal, and tests record them.

use std::sync::Arc;

/// Sink for user-facing notifications.
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn success(&self, message: &str) {
        (**self).success(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }

    fn warning(&self, message: &str) {
        (**self).warning(message);
    }

    fn info(&self, message: &str) {
        (**self).info(message);
    }
}

/// Prints notifications to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TermNotifier;

impl Notifier for TermNotifier {
    fn success(&self, message: &str) {
        println!("[ok] {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("[error] {}", message);
        tracing::error!("{}", message);
    }

    fn warning(&self, message: &str) {
        println!("[warn] {}", message);
        tracing::warn!("{}", message);
    }

    fn info(&self, message: &str) {
        println!("{}", message);
    }
}
