use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Default duration for toast notifications.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);

/// Most toasts kept at once; older ones are dropped first.
pub const MAX_TOASTS: usize = 5;

/// Message shown for any failed network call.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    /// Short tag for text rendering.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "ok",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }
}

/// A toast notification.
///
/// # Example
///
/// ```ignore
/// cx.toasts.push(Toast::success("Employee saved"));
/// cx.toasts.push(Toast::error("Connection failed").with_duration(Duration::from_secs(8)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    /// How long to show the toast.
    pub duration: Duration,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.tag(), self.message)
    }
}

impl From<String> for Toast {
    fn from(message: String) -> Self {
        Toast::info(message)
    }
}

impl From<&str> for Toast {
    fn from(message: &str) -> Self {
        Toast::info(message)
    }
}

/// Queue of shown toasts, oldest first.
#[derive(Debug, Default)]
pub struct Toasts {
    entries: VecDeque<(Toast, Instant)>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: impl Into<Toast>) {
        self.push_at(toast.into(), Instant::now());
    }

    pub fn push_at(&mut self, toast: Toast, now: Instant) {
        log::debug!("toast: {}", toast);
        if self.entries.len() == MAX_TOASTS {
            self.entries.pop_front();
        }
        self.entries.push_back((toast, now));
    }

    /// Drop toasts whose duration has run out by `now`.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|(toast, shown)| now.saturating_duration_since(*shown) < toast.duration);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.entries.iter().map(|(toast, _)| toast)
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.entries.back().map(|(toast, _)| toast)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_drops_old_toasts() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.push_at(Toast::info("short").with_duration(Duration::from_secs(1)), start);
        toasts.push_at(Toast::error("long"), start);

        assert_eq!(toasts.expire(start + Duration::from_secs(2)), 1);
        assert_eq!(toasts.latest().map(|t| t.message.as_str()), Some("long"));
        assert_eq!(toasts.expire(start + DEFAULT_TOAST_DURATION), 1);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut toasts = Toasts::new();
        for i in 0..MAX_TOASTS + 2 {
            toasts.push(format!("toast {}", i));
        }
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts.iter().next().unwrap().message, "toast 2");
    }

    #[test]
    fn test_display() {
        assert_eq!(Toast::warning("Low stock").to_string(), "[warn] Low stock");
    }
}
