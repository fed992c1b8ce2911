//! HTML rendering of dashboard snapshots.
//!
//! Everything here is a pure function of its inputs so a page can be
//! produced and inspected without any I/O.

use std::fmt::Write;

use crate::models::{format_clock, DashboardSnapshot, GameCard, Moneyline, OddsTable, Side, TeamCard};

const NOT_AVAILABLE: &str = "N/A";

/// Display mode selected from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Live,
    Historical,
}

impl DisplayMode {
    fn label(&self) -> &'static str {
        match self {
            DisplayMode::Live => "Live Data",
            DisplayMode::Historical => "Historical Data",
        }
    }

    fn path(&self) -> &'static str {
        match self {
            DisplayMode::Live => "/",
            DisplayMode::Historical => "/historical",
        }
    }
}

pub fn format_moneyline(moneyline: Option<Moneyline>) -> String {
    moneyline
        .map(|m| m.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_probability(probability: Option<f64>) -> String {
    probability
        .map(|p| format!("{:.4}", p))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_price(price: Option<f64>) -> String {
    price
        .map(|p| format!("{:.2}", p))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Positive lines are underdogs (green), the rest favorites (red)
fn moneyline_color(moneyline: Option<Moneyline>) -> &'static str {
    match moneyline {
        None => "#ffffff",
        Some(m) if m.is_underdog() => "#4CAF50",
        Some(_) => "#FF5252",
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Live scores page: one card per game and the sportsbook table
pub fn render_live_page(snapshot: &DashboardSnapshot, refresh_secs: u64) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<div class="subtitle">Stay updated with <strong>real-time NBA game updates</strong>! Data refreshes {}.</div>"#,
        refresh_interval_text(refresh_secs)
    );

    if snapshot.has_games() {
        body.push_str(r#"<div class="matchup-header"><strong>Home Team &nbsp;Vs&nbsp; Away Team</strong></div>"#);
        for card in &snapshot.cards {
            render_card(&mut body, card);
        }
        render_odds_table(&mut body, &snapshot.odds_table);
    } else {
        body.push_str(r#"<div class="empty"><h4>No live NBA games available right now.</h4></div>"#);
    }

    if !snapshot.errors.is_empty() {
        body.push_str(r#"<div class="errors">"#);
        for error in &snapshot.errors {
            let _ = write!(body, "<p>{}</p>", escape_html(error));
        }
        body.push_str("</div>");
    }

    let _ = write!(
        body,
        r#"<div class="footer">Last updated {}</div>"#,
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    page(DisplayMode::Live, Some(refresh_secs), &body)
}

fn refresh_interval_text(secs: u64) -> String {
    match secs {
        1 => "every second".to_string(),
        60 => "every minute".to_string(),
        s if s % 60 == 0 => format!("every {} minutes", s / 60),
        s => format!("every {} seconds", s),
    }
}

/// Shown until the first poll cycle finishes
pub fn render_loading_page(refresh_secs: u64) -> String {
    page(
        DisplayMode::Live,
        Some(refresh_secs.min(5)),
        r#"<div class="empty"><h4>Loading live games...</h4></div>"#,
    )
}

/// Placeholder for the historical view
pub fn render_historical_page() -> String {
    page(
        DisplayMode::Historical,
        None,
        r#"<div class="empty"><h4>Historical Data is Coming Soon!</h4></div>"#,
    )
}

fn render_card(out: &mut String, card: &GameCard) {
    let mut center = format!(r#"<p class="status">{}</p>"#, escape_html(&card.status));
    if card.seconds_remaining > 0 {
        let _ = write!(
            center,
            r#"<p class="clock">{} left</p>"#,
            format_clock(card.seconds_remaining)
        );
    }
    if let Some(total) = card.total {
        let _ = write!(center, r#"<p class="total">O/U {:.1}</p>"#, total);
    }

    out.push_str(r#"<div class="card"><div class="card-row">"#);
    render_team(out, &card.home);
    let _ = write!(out, r#"<div class="center">{}</div>"#, center);
    render_team(out, &card.away);
    out.push_str("</div></div>");
}

fn render_team(out: &mut String, team: &TeamCard) {
    let book = team
        .sportsbook
        .as_deref()
        .map(|b| format!(r#" <span class="book">({})</span>"#, escape_html(b)))
        .unwrap_or_default();

    let lead = match team.points_differential {
        d if d > 0 => format!(" (+{})", d),
        _ => String::new(),
    };

    let _ = write!(
        out,
        r#"<div class="team {side}"><h4>{name} <span class="tricode">{tricode}</span></h4><p>Score: {score}{lead}</p><p>Moneyline: <span style="color: {color};">{moneyline}</span>{book}</p><p>Implied Probability: {probability}</p><p>Price: {price}</p></div>"#,
        side = team.side.as_str(),
        name = escape_html(&team.full_name),
        tricode = escape_html(&team.tricode),
        score = team.score,
        lead = lead,
        color = moneyline_color(team.moneyline),
        moneyline = format_moneyline(team.moneyline),
        book = book,
        probability = format_probability(team.implied_probability()),
        price = format_price(team.price()),
    );
}

fn render_odds_table(out: &mut String, table: &OddsTable) {
    out.push_str(r#"<h3 class="table-title">Sportsbook Moneylines</h3>"#);

    if table.is_empty() {
        out.push_str(r#"<p class="empty">No sportsbook odds available.</p>"#);
        return;
    }

    out.push_str("<table class=\"odds\"><thead><tr><th>Team</th>");
    for book in &table.sportsbooks {
        let _ = write!(out, "<th>{}</th>", escape_html(book));
    }
    out.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        let _ = write!(out, "<tr><td>{}</td>", escape_html(&row.team));
        for book in &table.sportsbooks {
            match row.line(book) {
                Some(m) => {
                    let _ = write!(
                        out,
                        r#"<td style="color: {};">{}</td>"#,
                        moneyline_color(Some(m)),
                        m
                    );
                }
                None => {
                    let _ = write!(out, r#"<td class="na">{}</td>"#, NOT_AVAILABLE);
                }
            }
        }
        out.push_str("</tr>");
    }

    out.push_str("</tbody></table>");
}

fn page(mode: DisplayMode, refresh_secs: Option<u64>, body: &str) -> String {
    let refresh = refresh_secs
        .map(|s| format!(r#"<meta http-equiv="refresh" content="{}">"#, s))
        .unwrap_or_default();

    let mut nav = String::new();
    for option in [DisplayMode::Live, DisplayMode::Historical] {
        let class = if option == mode { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            r#"<li><a href="{}"{}>{}</a></li>"#,
            option.path(),
            class,
            option.label()
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}
<title>NBA Live Scores</title>
<style>{style}</style>
</head>
<body>
<nav class="sidebar"><h2>Select your Data</h2><ul>{nav}</ul></nav>
<main>
<div class="centered-title">&#127936; NBA Live Scores</div>
{body}
</main>
</body>
</html>
"#,
        refresh = refresh,
        style = STYLE,
        nav = nav,
        body = body,
    )
}

const STYLE: &str = "
body { margin: 0; display: flex; background: #0e1117; color: #fafafa; font-family: sans-serif; }
.sidebar { width: 220px; min-height: 100vh; padding: 16px; background: #262730; }
.sidebar ul { list-style: none; padding: 0; }
.sidebar a { display: block; padding: 8px; color: #fafafa; text-decoration: none; border-radius: 6px; }
.sidebar a.active { background: #ff4b4b; }
main { flex: 1; padding: 24px; }
.centered-title { text-align: center; font-size: 36px; font-weight: bold; }
.subtitle { text-align: center; color: #999; font-size: 16px; margin-bottom: 20px; }
.matchup-header { text-align: center; font-size: 24px; margin-bottom: 20px; }
.card { border: 1px solid #555; border-radius: 10px; padding: 10px; margin: 0 auto 15px; background: #000; max-width: 600px; }
.card-row { display: flex; justify-content: space-between; align-items: center; }
.card p { margin: 5px 0; font-size: 14px; color: #ddd; }
.team.home { text-align: left; } .team.home h4 { color: #4CAF50; margin: 5px 0; }
.team.away { text-align: right; } .team.away h4 { color: #FF5722; margin: 5px 0; }
.center { text-align: center; } .center .status { font-weight: bold; color: #bbb; }
.book, .tricode { color: #888; font-size: 12px; }
.empty { text-align: center; margin-top: 30px; }
table.odds { margin: 0 auto; border-collapse: collapse; }
table.odds th, table.odds td { border: 1px solid #444; padding: 6px 12px; text-align: center; }
td.na { color: #777; }
.errors { margin-top: 20px; color: #ff8a80; font-size: 12px; text-align: center; }
.footer { margin-top: 20px; color: #777; font-size: 12px; text-align: center; }
";
