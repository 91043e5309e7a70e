/// Format a whole number of seconds as `H:MM:SS`, prefixed by a day count
/// once the duration reaches 24 hours (`"1 day, 2:03:04"`).
pub fn format_eta(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = total_secs / 3_600 % 24;
    let minutes = total_secs / 60 % 60;
    let seconds = total_secs % 60;

    match days {
        0 => format!("{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("1 day, {hours}:{minutes:02}:{seconds:02}"),
        _ => format!("{days} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}
