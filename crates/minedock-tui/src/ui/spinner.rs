pub const DOTS_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn frame(tick: usize) -> &'static str {
    DOTS_SPINNER[tick % DOTS_SPINNER.len()]
}
