//! playstats-wrapped - Listening History Year in Review CLI
//!
//! Generate Spotify Wrapped-style summaries from a streaming history export.

mod input;

use anyhow::{Context, Result};
use clap::Parser;
use playstats_core::analytics::{ListeningTotals, SongRow};
use playstats_core::format::{count_display, duration_display, month_display, percent_display};
use playstats_core::{generate_report, Config, Report};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "playstats-wrapped")]
#[command(about = "Listening Wrapped - Your Streaming History in Review")]
#[command(version)]
struct Args {
    /// History files or directories (default: input.history_dir from config)
    paths: Vec<PathBuf>,

    /// Disable fun mode (no emoji)
    #[arg(long)]
    serious: bool,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Length of each top list (overrides report.top_count)
    #[arg(long)]
    top: Option<usize>,

    /// Songs per month in the monthly table (overrides report.monthly_top_count)
    #[arg(long)]
    monthly_top: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = playstats_core::logging::init(&config.logging).ok();

    let paths = if !args.paths.is_empty() {
        args.paths.clone()
    } else if let Some(dir) = &config.input.history_dir {
        vec![dir.clone()]
    } else {
        anyhow::bail!("No history paths given and input.history_dir is not configured");
    };

    let mut report_config = config.report.clone();
    if let Some(top) = args.top {
        report_config.top_count = top;
    }
    if let Some(monthly_top) = args.monthly_top {
        report_config.monthly_top_count = monthly_top;
    }

    let files = input::discover_files(&paths, &config.input.file_pattern)?;
    let records = input::load_records(&files)?;

    let report =
        generate_report(&records, &report_config).context("failed to generate listening report")?;

    match args.export.as_deref() {
        Some("json") => print_json(&report)?,
        Some("md") => print_markdown(&report, !args.serious),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&report, !args.serious),
    }

    Ok(())
}

fn heading(fun_mode: bool, emoji: &str, title: &str) {
    if fun_mode {
        println!("{} {}", emoji, title);
    } else {
        println!("{}", title);
    }
}

fn rank_label(i: usize, fun_mode: bool) -> String {
    match i {
        0 if fun_mode => "🥇".to_string(),
        1 if fun_mode => "🥈".to_string(),
        2 if fun_mode => "🥉".to_string(),
        _ => format!("{}.", i + 1),
    }
}

fn print_song_list(rows: &[SongRow], fun_mode: bool, detail: impl Fn(&SongRow) -> String) {
    for (i, row) in rows.iter().enumerate() {
        println!(
            "   {} {} - {}  ({})",
            rank_label(i, fun_mode),
            row.song,
            row.artist,
            detail(row)
        );
    }
    println!();
}

fn print_terminal(report: &Report, fun_mode: bool) {
    let title = if fun_mode {
        "🎧 YOUR LISTENING WRAPPED 🎧".to_string()
    } else {
        "Listening Summary".to_string()
    };

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("│{:^60}│", report.data_range);
    println!("╰{}╯", "─".repeat(60));
    println!();

    // The Numbers
    heading(fun_mode, "📊", "THE NUMBERS");
    println!(
        "   Total Time: {:<16} Unique Songs: {}",
        duration_display(report.total_ms),
        report.unique_songs
    );
    println!(
        "   Minutes:    {:<16} Hours: {:.1}",
        format!("{:.0}", report.total_minutes()),
        report.total_hours()
    );
    println!(
        "   Records:    {:<16} Used: {}",
        count_display(report.provenance.total_records_read),
        count_display(report.provenance.song_records_used)
    );
    println!(
        "   Ignored:    {} non-song, {} bad timestamp",
        report.provenance.ignored_non_song, report.provenance.ignored_bad_timestamp
    );
    println!();

    if !report.top_by_plays.is_empty() {
        heading(fun_mode, "🏆", "TOP SONGS BY PLAYS");
        print_song_list(&report.top_by_plays, fun_mode, |row| {
            format!("{} plays", row.play_count)
        });
    }

    if !report.top_by_time.is_empty() {
        heading(fun_mode, "⏱️", "TOP SONGS BY TIME");
        print_song_list(&report.top_by_time, fun_mode, |row| {
            duration_display(row.total_ms)
        });
    }

    if !report.top_artists.is_empty() {
        heading(fun_mode, "🎤", "TOP ARTISTS");
        for (i, artist) in report.top_artists.iter().enumerate() {
            println!(
                "   {} {:<30} {:>10}  {} plays",
                rank_label(i, fun_mode),
                artist.artist,
                duration_display(artist.total_ms),
                artist.play_count
            );
        }
        println!();
    }

    if !report.top_skipped.is_empty() {
        heading(fun_mode, "⏭️", "MOST SKIPPED");
        print_song_list(&report.top_skipped, false, |row| {
            format!(
                "{} skips, {} of plays",
                row.skip_count,
                percent_display(row.skip_rate())
            )
        });
    }

    // Peaks
    heading(fun_mode, "🔥", "PEAKS");
    if let Some(peak) = &report.peak_month {
        println!(
            "   Peak month: {} ({})",
            month_display(peak.key),
            duration_display(peak.total_ms)
        );
    }
    if let Some(peak) = &report.peak_year {
        println!(
            "   Peak year:  {} ({})",
            peak.key,
            duration_display(peak.total_ms)
        );
    }
    println!();

    // Yearly series
    heading(fun_mode, "📅", "BY YEAR");
    for year in &report.yearly {
        println!("   {}  {:>10}", year.key, duration_display(year.total_ms));
    }
    println!();

    // Monthly top table
    if !report.monthly_top.is_empty() {
        heading(fun_mode, "🗓️", "MONTHLY TOP SONGS");
        let mut current = None;
        for entry in &report.monthly_top {
            if current != Some(entry.month) {
                println!("   {}", month_display(entry.month));
                current = Some(entry.month);
            }
            println!(
                "      {}. {} - {} ({} plays)",
                entry.rank, entry.song, entry.artist, entry.play_count
            );
        }
        println!();
    }
}

fn print_markdown(report: &Report, fun_mode: bool) {
    let title = if fun_mode {
        "🎧 Listening Wrapped 🎧"
    } else {
        "Listening Summary"
    };

    println!("# {}", title);
    println!();
    println!("*{}*", report.data_range);
    println!();

    // Summary table
    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Total Time | {} |", duration_display(report.total_ms));
    println!("| Minutes | {:.0} |", report.total_minutes());
    println!("| Hours | {:.1} |", report.total_hours());
    println!("| Unique Songs | {} |", report.unique_songs);
    println!("| Records Read | {} |", report.provenance.total_records_read);
    println!("| Song Records Used | {} |", report.provenance.song_records_used);
    println!("| Ignored (non-song) | {} |", report.provenance.ignored_non_song);
    println!(
        "| Ignored (bad timestamp) | {} |",
        report.provenance.ignored_bad_timestamp
    );
    if let Some(peak) = &report.peak_month {
        println!("| Peak Month | {} |", month_display(peak.key));
    }
    if let Some(peak) = &report.peak_year {
        println!("| Peak Year | {} |", peak.key);
    }
    println!();

    markdown_song_table("Top Songs by Plays", &report.top_by_plays);
    markdown_song_table("Top Songs by Time", &report.top_by_time);
    markdown_song_table("Most Skipped", &report.top_skipped);

    if !report.top_artists.is_empty() {
        println!("## Top Artists");
        println!();
        println!("| # | Artist | Plays | Minutes |");
        println!("|---|--------|-------|---------|");
        for (i, artist) in report.top_artists.iter().enumerate() {
            println!(
                "| {} | {} | {} | {:.1} |",
                i + 1,
                artist.artist,
                artist.play_count,
                artist.minutes()
            );
        }
        println!();
    }

    if !report.monthly_top.is_empty() {
        println!("## Monthly Top Songs");
        println!();
        println!("| Month | # | Song | Artist | Plays | Minutes |");
        println!("|-------|---|------|--------|-------|---------|");
        for entry in &report.monthly_top {
            println!(
                "| {} | {} | {} | {} | {} | {:.1} |",
                entry.month,
                entry.rank,
                entry.song,
                entry.artist,
                entry.play_count,
                entry.minutes()
            );
        }
        println!();
    }

    println!("## Listening by Month");
    println!();
    println!("| Month | Minutes |");
    println!("|-------|---------|");
    for month in &report.monthly {
        println!("| {} | {:.1} |", month.key, month.minutes());
    }
    println!();

    println!("---");
    println!("*Generated by playstats-wrapped*");
}

fn markdown_song_table(title: &str, rows: &[SongRow]) {
    if rows.is_empty() {
        return;
    }
    println!("## {}", title);
    println!();
    println!("| # | Song | Artist | Plays | Minutes | Skips | Skip Rate |");
    println!("|---|------|--------|-------|---------|-------|-----------|");
    for (i, row) in rows.iter().enumerate() {
        println!(
            "| {} | {} | {} | {} | {:.1} | {} | {} |",
            i + 1,
            row.song,
            row.artist,
            row.play_count,
            row.minutes(),
            row.skip_count,
            percent_display(row.skip_rate())
        );
    }
    println!();
}

fn song_json(row: &SongRow) -> serde_json::Value {
    serde_json::json!({
        "song": row.song,
        "artist": row.artist,
        "album": row.album,
        "track_uri": row.track_uri,
        "play_count": row.play_count,
        "skip_count": row.skip_count,
        "skip_rate": row.skip_rate(),
        "total_ms": row.total_ms,
        "minutes": row.minutes(),
        "hours": row.hours(),
    })
}

fn print_json(report: &Report) -> Result<()> {
    // Derived fields (rates, minutes, hours) are added alongside the stored ones
    let json = serde_json::json!({
        "data_range": report.data_range,
        "provenance": report.provenance,
        "totals": {
            "unique_songs": report.unique_songs,
            "total_ms": report.total_ms,
            "minutes": report.total_minutes(),
            "hours": report.total_hours(),
        },
        "songs": report.songs.iter().map(song_json).collect::<Vec<_>>(),
        "top_by_plays": report.top_by_plays.iter().map(song_json).collect::<Vec<_>>(),
        "top_by_time": report.top_by_time.iter().map(song_json).collect::<Vec<_>>(),
        "top_skipped": report.top_skipped.iter().map(song_json).collect::<Vec<_>>(),
        "top_artists": report.top_artists.iter().map(|a| serde_json::json!({
            "artist": a.artist,
            "play_count": a.play_count,
            "skip_count": a.skip_count,
            "skip_rate": a.skip_rate(),
            "total_ms": a.total_ms,
            "minutes": a.minutes(),
            "hours": a.hours(),
        })).collect::<Vec<_>>(),
        "monthly_top": report.monthly_top.iter().map(|e| serde_json::json!({
            "month": e.month.to_string(),
            "rank": e.rank,
            "song": e.song,
            "artist": e.artist,
            "play_count": e.play_count,
            "total_ms": e.total_ms,
            "minutes": e.minutes(),
        })).collect::<Vec<_>>(),
        "monthly": report.monthly.iter().map(|m| serde_json::json!({
            "month": m.key.to_string(),
            "total_ms": m.total_ms,
            "minutes": m.minutes(),
        })).collect::<Vec<_>>(),
        "yearly": report.yearly.iter().map(|y| serde_json::json!({
            "year": y.key,
            "total_ms": y.total_ms,
            "hours": y.hours(),
        })).collect::<Vec<_>>(),
        "peak_month": report.peak_month.map(|p| serde_json::json!({
            "month": p.key.to_string(),
            "total_ms": p.total_ms,
            "minutes": p.minutes(),
        })),
        "peak_year": report.peak_year.map(|p| serde_json::json!({
            "year": p.key,
            "total_ms": p.total_ms,
            "hours": p.hours(),
        })),
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
