//! Visible-notification capability contract.

/// Where tapping a notification should land the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapDestination {
    /// The calendar screen focused on one local date.
    CalendarDay { year: i32, month: u32, day: u32 },
    /// The activity/notification feed.
    ActivityFeed,
}

/// System notification delivery capability.
///
/// Delivery is fire-and-forget from the core's perspective; presentation
/// failures are the platform's concern.
pub trait NotificationPresenter {
    /// Shows one visible notification. Reusing `notification_id` replaces
    /// a still-visible notification instead of stacking a duplicate.
    fn show(&self, notification_id: i32, title: &str, body: &str, tap: TapDestination);
}
