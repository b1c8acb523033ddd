use crate::libs::formatter::{format_duration, format_hours};
use crate::libs::session::Session;
use chrono::Duration;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn sessions(sessions: &[Session]) {
        let mut table = Table::new();

        table.add_row(row!["DATE", "CLOCK IN", "CLOCK OUT", "TOTAL", "IDLE", "PRODUCTIVE", "APPROVAL"]);
        for session in sessions {
            table.add_row(row![
                session.date,
                session.clock_in.format("%H:%M"),
                session.clock_out.map_or_else(|| "-".to_string(), |t| t.format("%H:%M").to_string()),
                format_duration(&Duration::minutes(session.total_minutes as i64)),
                format!("{} min", session.idle_minutes),
                format_hours(session.productive_hours),
                session.approval_status.map_or("-", |status| status.as_str())
            ]);
        }
        table.printstd();
    }

    pub fn session_summary(session: &Session) {
        let mut table = Table::new();

        table.add_row(row!["DATE", session.date]);
        table.add_row(row!["CLOCK IN", session.clock_in.format("%H:%M:%S")]);
        table.add_row(row![
            "CLOCK OUT",
            session.clock_out.map_or_else(|| "-".to_string(), |t| t.format("%H:%M:%S").to_string())
        ]);
        table.add_row(row!["TOTAL", format_duration(&Duration::minutes(session.total_minutes as i64))]);
        table.add_row(row!["IDLE", format!("{} min", session.idle_minutes)]);
        table.add_row(row!["PRODUCTIVE", format_hours(session.productive_hours)]);
        table.printstd();
    }
}
