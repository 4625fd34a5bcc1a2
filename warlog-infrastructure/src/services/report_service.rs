use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{FixedOffset, NaiveDate};
use tokio::fs;
use tracing::info;

use warlog_application::queries::daily_report;
use warlog_application::AppState;
use warlog_domain::{DailyReport, ReportLanguage};

/// Fixed strings of one report language.
#[derive(Debug, Clone, Copy)]
pub struct ReportLabels {
    pub lang: &'static str,
    pub title: &'static str,
    pub day: &'static str,
    pub timeline: &'static str,
    pub leaderboard: &'static str,
    pub time: &'static str,
    pub killed: &'static str,
    pub killer: &'static str,
    pub weapon: &'static str,
    pub body_part: &'static str,
    pub rank: &'static str,
    pub player: &'static str,
    pub kills: &'static str,
    pub deaths: &'static str,
    pub search: &'static str,
    pub empty: &'static str,
}

const EN: ReportLabels = ReportLabels {
    lang: "en",
    title: "Kill Report",
    day: "Day",
    timeline: "Kill timeline",
    leaderboard: "Leaderboard",
    time: "Time",
    killed: "Killed",
    killer: "Killer",
    weapon: "Weapon",
    body_part: "Body part",
    rank: "#",
    player: "Player",
    kills: "Kills",
    deaths: "Deaths",
    search: "Search",
    empty: "No kills recorded for this day.",
};

const RU: ReportLabels = ReportLabels {
    lang: "ru",
    title: "Отчёт об убийствах",
    day: "Дата",
    timeline: "Хронология убийств",
    leaderboard: "Рейтинг",
    time: "Время",
    killed: "Убит",
    killer: "Убийца",
    weapon: "Оружие",
    body_part: "Часть тела",
    rank: "№",
    player: "Игрок",
    kills: "Убийства",
    deaths: "Смерти",
    search: "Поиск",
    empty: "За этот день убийств нет.",
};

impl ReportLabels {
    pub fn for_language(language: ReportLanguage) -> &'static ReportLabels {
        match language {
            ReportLanguage::En => &EN,
            ReportLanguage::Ru => &RU,
        }
    }
}

/// `<server>_<DD.MM.YYYY>.html` under `report_dir`.
pub fn report_path(report_dir: &str, server: &str, day: NaiveDate) -> PathBuf {
    Path::new(report_dir).join(format!("{}_{}.html", server, day.format("%d.%m.%Y")))
}

/// A rendered report on disk together with the data it was rendered from.
#[derive(Debug)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub report: DailyReport,
}

pub async fn generate_daily_report(state: &AppState, day: NaiveDate) -> Result<GeneratedReport> {
    let report = daily_report(state, day).await?;
    let labels = ReportLabels::for_language(state.config.report_language);
    let html = render_report(
        &report,
        labels,
        &state.config.unknown_label,
        state.config.utc_offset(),
    );

    let report_dir = Path::new(&state.config.report_dir);
    fs::create_dir_all(report_dir).await?;
    let path = report_path(&state.config.report_dir, &report.server_name, day);
    fs::write(&path, html).await?;
    info!(
        path = %path.display(),
        kills = report.timeline.len(),
        "report written"
    );
    Ok(GeneratedReport { path, report })
}

pub fn render_report(
    report: &DailyReport,
    labels: &ReportLabels,
    unknown_label: &str,
    offset: FixedOffset,
) -> String {
    let mut timeline_rows = String::new();
    for row in &report.timeline {
        let _ = write!(
            timeline_rows,
            "<tr>\
            <td class=\"time\">{time}</td>\
            <td class=\"player\">{killed}</td>\
            <td class=\"player\">{killer}</td>\
            <td class=\"dim\">{weapon}</td>\
            <td class=\"dim\">{body_part}</td>\
            </tr>",
            time = row.occurred_at.with_timezone(&offset).format("%H:%M:%S"),
            killed = escape_html(&row.killed_name),
            killer = escape_html(&row.killer_name),
            weapon = escape_html(row.weapon.label(unknown_label)),
            body_part = escape_html(row.body_part.label(unknown_label)),
        );
    }

    let mut leaderboard_rows = String::new();
    for row in &report.leaderboard {
        let _ = write!(
            leaderboard_rows,
            "<tr>\
            <td class=\"count\">{rank}</td>\
            <td class=\"player\">{name}</td>\
            <td class=\"count\">{kills}</td>\
            <td class=\"count\">{deaths}</td>\
            </tr>",
            rank = row.rank,
            name = escape_html(&row.name),
            kills = row.kills,
            deaths = row.deaths,
        );
    }

    let empty_style = if report.timeline.is_empty() {
        ""
    } else {
        " style=\"display:none;\""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{title} · {server} · {day}</title>
<style>
:root {{
  --ink: #0f172a;
  --muted: #64748b;
  --border: #e2e8f0;
  --shadow: rgba(15, 23, 42, 0.14);
}}
* {{ box-sizing: border-box; }}
body {{
  margin: 0;
  font-family: "IBM Plex Sans", "Source Sans 3", "Noto Sans", sans-serif;
  background: radial-gradient(circle at top, #1e293b 0%, #0f172a 55%, #0b1220 100%);
  color: #e2e8f0;
}}
.page {{ max-width: 1100px; margin: 0 auto; padding: 32px 20px 48px; }}
.hero {{
  background: linear-gradient(135deg, rgba(220,38,38,0.18), rgba(15,23,42,0.95));
  border-radius: 20px;
  padding: 28px;
  box-shadow: 0 18px 40px rgba(15, 23, 42, 0.35);
}}
.hero h1 {{ margin: 0 0 6px; font-size: 28px; }}
.hero p {{ margin: 0; color: var(--muted); font-size: 14px; }}
h2 {{ margin: 28px 0 12px; font-size: 18px; }}
.search {{
  display: flex;
  gap: 8px;
  align-items: center;
  background: #f8fafc;
  border: 1px solid var(--border);
  border-radius: 12px;
  padding: 10px 12px;
  margin: 18px 0 12px;
  color: var(--ink);
}}
.search input {{ border: none; outline: none; width: 100%; font-size: 14px; background: transparent; }}
.table-wrap {{
  background: #ffffff;
  color: var(--ink);
  border-radius: 16px;
  overflow: hidden;
  box-shadow: 0 12px 28px var(--shadow);
}}
.table {{ width: 100%; border-collapse: collapse; font-size: 14px; }}
.table thead th {{
  text-align: left;
  font-size: 11px;
  letter-spacing: 0.12em;
  text-transform: uppercase;
  color: var(--muted);
  background: #f1f5f9;
  padding: 12px 14px;
}}
.table tbody td {{ padding: 10px 14px; border-bottom: 1px solid var(--border); }}
.table tbody tr:nth-child(even) {{ background: #f8fafc; }}
.table .count, .table .time {{
  font-variant-numeric: tabular-nums;
  font-family: "IBM Plex Mono", "JetBrains Mono", monospace;
}}
.table .count {{ text-align: right; }}
.empty {{ padding: 20px; text-align: center; color: var(--muted); }}
</style>
</head>
<body>
<div class="page">
  <section class="hero">
    <h1>{title}: {server}</h1>
    <p>{day_label}: {day}</p>
  </section>

  <h2>{timeline_label}</h2>
  <label class="search"><span>{search_label}</span><input id="search" type="search" /></label>
  <div class="table-wrap">
    <table class="table">
      <thead><tr>
        <th>{time_label}</th>
        <th>{killed_label}</th>
        <th>{killer_label}</th>
        <th>{weapon_label}</th>
        <th>{body_part_label}</th>
      </tr></thead>
      <tbody id="timeline">
      {timeline_rows}
      </tbody>
    </table>
    <div class="empty"{empty_style}>{empty_label}</div>
  </div>

  <h2>{leaderboard_label}</h2>
  <div class="table-wrap">
    <table class="table">
      <thead><tr>
        <th>{rank_label}</th>
        <th>{player_label}</th>
        <th>{kills_label}</th>
        <th>{deaths_label}</th>
      </tr></thead>
      <tbody>
      {leaderboard_rows}
      </tbody>
    </table>
  </div>
</div>
<script>
  const search = document.getElementById('search');
  const rows = Array.from(document.querySelectorAll('#timeline tr'));
  search.addEventListener('input', () => {{
    const keyword = search.value.trim().toLowerCase();
    rows.forEach(row => {{
      const show = !keyword || row.textContent.toLowerCase().includes(keyword);
      row.style.display = show ? '' : 'none';
    }});
  }});
</script>
</body>
</html>"#,
        lang = labels.lang,
        title = labels.title,
        server = escape_html(&report.server_full_name),
        day = report.day.format("%d.%m.%Y"),
        day_label = labels.day,
        timeline_label = labels.timeline,
        leaderboard_label = labels.leaderboard,
        search_label = labels.search,
        time_label = labels.time,
        killed_label = labels.killed,
        killer_label = labels.killer,
        weapon_label = labels.weapon,
        body_part_label = labels.body_part,
        rank_label = labels.rank,
        player_label = labels.player,
        kills_label = labels.kills,
        deaths_label = labels.deaths,
        empty_label = labels.empty,
        empty_style = empty_style,
        timeline_rows = timeline_rows,
        leaderboard_rows = leaderboard_rows,
    )
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
