/// Lifecycle state of a tracked tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Announced by the detector, no frame reported yet
    #[default]
    Unseen,
    /// Reported present in the latest frame
    Active,
    /// Absent from the latest frame but still rendered
    MissingGrace,
    /// Detector gave up on it; removal is scheduled
    Gone,
    /// Removed from the renderer; late callbacks ignore it
    Removed,
}

impl TrackState {
    /// Whether a tag in this state is still drawn.
    pub fn is_displayed(&self) -> bool {
        matches!(self, Self::Active | Self::MissingGrace | Self::Gone)
    }
}
