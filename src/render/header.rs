use std::io::{self, Write};

use chrono::NaiveDateTime;

use super::Theme;

pub const RULE_WIDTH: usize = 70;
const TITLE: &str = "Process Tree";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn render_rule<W: Write>(sink: &mut W, theme: &Theme) -> io::Result<()> {
    writeln!(sink, "{}", theme.banner.apply_to("=".repeat(RULE_WIDTH)))
}

/// Summary printed above a full tree.
pub fn render_banner<W: Write>(
    sink: &mut W,
    theme: &Theme,
    total_processes: usize,
    timestamp: NaiveDateTime,
) -> io::Result<()> {
    render_rule(sink, theme)?;
    writeln!(sink, "{}", theme.banner.apply_to(TITLE))?;
    writeln!(
        sink,
        "{}",
        theme
            .header
            .apply_to(format!("Timestamp: {}", timestamp.format(TIMESTAMP_FORMAT)))
    )?;
    writeln!(
        sink,
        "{}",
        theme
            .header
            .apply_to(format!("Total Processes: {total_processes}"))
    )?;
    render_rule(sink, theme)?;
    writeln!(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_render_banner() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap();
        let mut output = Vec::new();
        render_banner(&mut output, &Theme::plain(), 128, timestamp).unwrap();

        let rule = "=".repeat(RULE_WIDTH);
        let expected = format!(
            "{rule}\nProcess Tree\nTimestamp: 2024-03-09 07:05:00\nTotal Processes: 128\n{rule}\n\n"
        );
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }
}
