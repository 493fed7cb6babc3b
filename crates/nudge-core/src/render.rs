use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::NaiveDate;
use nudge_shared::dropdown::{
    EMPTY_PLACEHOLDER, delete_task_href, edit_task_href, schedule_suffix,
};
use nudge_shared::notify::{NotificationPermission, NotificationView, REMINDER_TITLE, Reminder};
use nudge_shared::task::{NotificationSnapshot, Priority, Statistics, Task};
use nudge_shared::theme::{ThemeDefinition, themes_by_category};
use tracing::warn;
use unicode_width::UnicodeWidthStr;

use crate::config::{Config, parse_bool};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = parse_bool(&color_cfg)
            .ok_or_else(|| anyhow!("invalid color setting: {color_cfg}"))?;
        Ok(Self {
            color: color && io::stdout().is_terminal(),
        })
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn write_reminder<W: Write>(&self, mut out: W, reminder: &Reminder) -> io::Result<()> {
        writeln!(out, "🔔 {}", self.paint(REMINDER_TITLE, "1"))?;
        writeln!(out, "   {}", self.paint(&reminder.title, "1"))?;
        writeln!(out, "   {}", reminder.description)?;
        writeln!(
            out,
            "   Priority: {}",
            self.paint(reminder.priority.as_str(), priority_color(reminder.priority))
        )?;
        if let Some(time) = reminder.due_time.as_deref() {
            writeln!(out, "   Due: {time}")?;
        }
        Ok(())
    }

    pub fn write_badge<W: Write>(&self, mut out: W, count: u64) -> io::Result<()> {
        let noun = if count == 1 { "task" } else { "tasks" };
        writeln!(out, "🔔 {} {noun} due", self.paint(&count.to_string(), "33"))
    }

    pub fn write_task_table<W: Write>(
        &self,
        out: W,
        tasks: &[Task],
        filter: &str,
    ) -> io::Result<()> {
        if tasks.is_empty() {
            let mut out = out;
            return writeln!(out, "{EMPTY_PLACEHOLDER}");
        }

        let headers = vec![
            "ID".to_string(),
            "Title".to_string(),
            "When".to_string(),
            "Priority".to_string(),
            "Edit".to_string(),
            "Delete".to_string(),
        ];

        let rows = tasks
            .iter()
            .map(|task| {
                vec![
                    self.paint(&task.id.to_string(), "33"),
                    task.title.clone(),
                    schedule_suffix(task)
                        .map(|s| s.trim().to_string())
                        .unwrap_or_default(),
                    self.paint(task.priority.as_str(), priority_color(task.priority)),
                    edit_task_href(task.id, filter),
                    delete_task_href(task.id, filter),
                ]
            })
            .collect();

        write_table(out, headers, rows)
    }

    pub fn write_themes<W: Write>(&self, mut out: W, active: &str) -> io::Result<()> {
        for (category, themes) in themes_by_category() {
            writeln!(out, "{} {}", category.icon(), self.paint(category.label(), "1"))?;
            for theme in themes {
                let marker = if theme.id == active { "✓" } else { " " };
                writeln!(out, "  {marker} {:<10} {}", theme.id, theme.name)?;
            }
        }
        Ok(())
    }

    pub fn write_theme_applied<W: Write>(
        &self,
        mut out: W,
        theme: &ThemeDefinition,
    ) -> io::Result<()> {
        writeln!(
            out,
            "Theme set to {} ({})",
            self.paint(theme.name, "1"),
            theme.category.label()
        )
    }

    pub fn write_statistics<W: Write>(&self, out: W, stats: &Statistics) -> io::Result<()> {
        let headers = vec!["Completed".to_string(), "Count".to_string()];
        let rows = vec![
            vec!["Today".to_string(), stats.tasks_completed_today.to_string()],
            vec![
                "This week".to_string(),
                stats.tasks_completed_this_week.to_string(),
            ],
            vec!["All time".to_string(), stats.total_completed.to_string()],
        ];
        write_table(out, headers, rows)
    }

    pub fn write_word<W: Write>(
        &self,
        mut out: W,
        date: NaiveDate,
        message: &str,
    ) -> io::Result<()> {
        writeln!(
            out,
            "{}",
            self.paint(&format!("Word of the day, {}", date.format("%A %B %-d")), "1")
        )?;
        writeln!(out, "{message}")
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "31",
        Priority::Medium => "33",
        Priority::Low => "32",
    }
}

/// Terminal stand-in for the page: reminders and badge changes are
/// printed, the dropdown becomes a table (or its markup with `html`).
#[derive(Debug)]
pub struct TerminalView<W> {
    renderer: Renderer,
    out: W,
    filter: String,
    html: bool,
    permission: NotificationPermission,
    last_badge: Option<u64>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(renderer: Renderer, out: W, filter: &str) -> Self {
        Self {
            renderer,
            out,
            filter: filter.to_string(),
            html: false,
            permission: NotificationPermission::Unsupported,
            last_badge: None,
        }
    }

    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    /// Desktop mirroring starts undecided when enabled, so the startup
    /// request flow can grant it.
    pub fn with_desktop(mut self, enabled: bool) -> Self {
        self.permission = if enabled {
            NotificationPermission::Default
        } else {
            NotificationPermission::Denied
        };
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn report(&self, what: &str, result: io::Result<()>) {
        if let Err(err) = result {
            warn!(error = %err, "failed writing {what}");
        }
    }
}

impl<W: Write> NotificationView for TerminalView<W> {
    fn show_reminder(&mut self, reminder: &Reminder) {
        let result = self.renderer.write_reminder(&mut self.out, reminder);
        self.report("reminder", result);
    }

    fn set_badge(&mut self, count: u64) {
        if self.last_badge == Some(count) {
            return;
        }
        self.last_badge = Some(count);
        let result = self.renderer.write_badge(&mut self.out, count);
        self.report("badge", result);
    }

    fn render_dropdown(&mut self, snapshot: &NotificationSnapshot, markup: &str) {
        let result = if self.html {
            writeln!(self.out, "{markup}")
        } else {
            self.renderer
                .write_task_table(&mut self.out, &snapshot.tasks, &self.filter)
        };
        self.report("dropdown", result);
    }

    fn close_dropdown(&mut self) {}

    fn current_filter(&self) -> String {
        self.filter.clone()
    }

    fn desktop_permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_desktop_permission(&mut self) {
        // Terminals have no prompt; enabling it in the config is consent.
        self.permission = NotificationPermission::Granted;
    }

    fn mirror_to_desktop(&mut self, reminder: &Reminder) -> Result<(), String> {
        // OSC 9: desktop notification in terminals that support it.
        write!(self.out, "\x1b]9;{REMINDER_TITLE}: {}\x07", reminder.message())
            .and_then(|()| self.out.flush())
            .map_err(|err| err.to_string())
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> io::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use nudge_shared::notify::{NotificationView, Reminder};
    use nudge_shared::task::{NotificationSnapshot, Priority, Task};

    use super::{Renderer, TerminalView, strip_ansi};

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).expect("utf8")
    }

    #[test]
    fn table_aligns_wide_titles() {
        let mut task = Task::new(3, "会議の準備", Priority::High);
        task.due_date = NaiveDate::from_ymd_opt(2026, 10, 17);
        let mut out = Vec::new();
        Renderer::plain()
            .write_task_table(&mut out, &[task, Task::new(12, "Gym", Priority::Low)], "today")
            .expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[0].starts_with("ID Title      When"));
        assert!(lines[2].contains("会議の準備 on 2026-10-17"));
        assert!(lines[2].contains("/edit/3/?filter=today"));
        assert!(lines[2].contains("/delete/3/?filter=today"));
        assert!(lines[3].contains("Gym       "));
    }

    #[test]
    fn badge_is_printed_only_on_change() {
        let mut view = TerminalView::new(Renderer::plain(), Vec::new(), "today");
        view.set_badge(2);
        view.set_badge(2);
        view.set_badge(1);
        assert_eq!(output(view), "🔔 2 tasks due\n🔔 1 task due\n");
    }

    #[test]
    fn html_mode_prints_markup() {
        let mut view = TerminalView::new(Renderer::plain(), Vec::new(), "today").with_html(true);
        view.render_dropdown(&NotificationSnapshot::default(), "<ul></ul>");
        assert_eq!(output(view), "<ul></ul>\n");
    }

    #[test]
    fn reminder_uses_fallback_description() {
        let mut view = TerminalView::new(Renderer::plain(), Vec::new(), "today");
        let reminder = Reminder::from_task(&Task::new(7, "Pay bills", Priority::High));
        view.show_reminder(&reminder);
        let text = output(view);
        assert!(text.contains("Pay bills"));
        assert!(text.contains("No description"));
        assert!(text.contains("Priority: High"));
    }

    #[test]
    fn strip_ansi_removes_color_codes() {
        assert_eq!(strip_ansi("\x1b[33m12\x1b[0m"), "12");
    }
}
