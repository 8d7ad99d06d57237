use std::fmt::Write;

use dashboard_core::{AppViewModel, Notice, NoticeLevel, Phase, Record};

const COLUMNS: [(&str, usize); 7] = [
    ("Title", 24),
    ("Phone", 14),
    ("Fax", 14),
    ("Website", 22),
    ("Address", 30),
    ("Activity", 20),
    ("Manager", 18),
];
const PROGRESS_BAR_WIDTH: usize = 40;

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let phase = match view.phase {
        Phase::Idle | Phase::Complete => "Ready",
        Phase::Running => "Scraping",
    };
    let _ = writeln!(
        out,
        "== {phase} | {} of {} records{} ==",
        view.rows.len(),
        view.total_records,
        if view.loading { " | loading..." } else { "" }
    );

    if view.show_progress {
        let _ = writeln!(out, "Scraping Progress: {}%", view.progress);
        let _ = writeln!(out, "{}", progress_bar(view.progress));
    }

    let _ = writeln!(
        out,
        "[{}] [{}] [Search{}]{}",
        control(view.controls.scrape_label, view.controls.scrape_enabled),
        control(view.controls.drop_label, view.controls.drop_enabled),
        if view.controls.search_enabled { "" } else { " (disabled)" },
        match &view.active_filter {
            Some(filter) => format!(" filtered by {filter:?}"),
            None if view.query.is_empty() => String::new(),
            None => format!(" query {:?} not applied", view.query),
        }
    );

    let header: Vec<String> = COLUMNS
        .iter()
        .map(|(name, width)| cell(name, *width))
        .collect();
    let _ = writeln!(out, "{:>4} {}", "#", header.join(" "));
    for record in &view.rows {
        let _ = writeln!(out, "{:>4} {}", record.id, row(record));
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let label = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("[{label}] {}", notice.text)
}

fn control(label: &str, enabled: bool) -> String {
    if enabled {
        label.to_string()
    } else {
        format!("{label} (disabled)")
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * PROGRESS_BAR_WIDTH / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

fn row(record: &Record) -> String {
    let fields = [
        &record.title,
        &record.phone,
        &record.fax,
        &record.website,
        &record.address,
        &record.activity,
        &record.manager,
    ];
    fields
        .iter()
        .zip(COLUMNS.iter())
        .map(|(value, (_, width))| cell(value, *width))
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        format!("{value:<width$}")
    } else {
        let truncated: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{truncated}~")
    }
}
