//! Channel-name helpers.

/// Extension trait for telling channel names apart from nicknames.
pub trait ChannelExt {
    /// Whether this target names a channel rather than a user.
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        self.starts_with(['#', '&', '+', '!'])
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }
}
