use exam_core::clock::ClockState;

/// Aggregated view of a live session, useful for the in-test sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestProgress {
    pub total: usize,
    pub attempted: usize,
    pub attempted_percent: u8,
    /// One flag per question position, `true` where a choice is recorded.
    pub answered: Vec<bool>,
    pub remaining_seconds: u32,
    pub clock_state: ClockState,
}

/// Rounded share of questions attempted, 0 for an empty paper.
#[must_use]
pub fn attempted_percent(attempted: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (attempted as f64 / total as f64 * 100.0).round() as u8
}
