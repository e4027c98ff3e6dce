//! Base trait for messages (user/system events) handled by programs.

/// Marker trait for message types.
///
/// Messages represent:
/// - User actions (form input, button presses)
/// - System events (API responses, route changes)
/// - Shared state notifications (viewer changes)
///
/// Messages are processed one at a time by a program's `update`.
pub trait Message: Send + 'static {}

impl Message for () {}
