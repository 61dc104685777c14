use crate::analyzer::Analysis;
use serde::Serialize;
use std::borrow::Cow;
use std::io::{self, Write};

/// Width of the widest console bar.
const BAR_WIDTH: usize = 30;

/// One flattened result row: the sole output contract of an [`Analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Row<'a> {
    pub source: &'a str,
    pub word: &'a str,
    pub count: usize,
    pub percentage: f64,
}

impl Analysis {
    /// Rows in source-major, target-word order. Every registered source
    /// contributes one row per target word, zero counts included.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.tallies.iter().flat_map(move |tally| {
            self.words
                .iter()
                .zip(tally.counts())
                .map(move |(word, &count)| Row {
                    source: &tally.name,
                    word,
                    count,
                    percentage: percentage(count, tally.total_words),
                })
        })
    }
}

fn percentage(count: usize, total_words: usize) -> f64 {
    if total_words == 0 {
        0.0
    } else {
        count as f64 / total_words as f64 * 100.0
    }
}

/// Per-word statistics across all sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordSummary {
    pub word: String,
    pub total: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 when there are fewer than two sources.
    pub std_dev: f64,
    pub max: usize,
    pub min: usize,
}

pub fn summarize(analysis: &Analysis) -> Vec<WordSummary> {
    let n = analysis.tallies().len();
    analysis
        .words()
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let counts: Vec<usize> = analysis.tallies().iter().map(|t| t.counts()[i]).collect();
            let total: usize = counts.iter().sum();
            let mean = total as f64 / n as f64;
            let std_dev = if n < 2 {
                0.0
            } else {
                let var = counts
                    .iter()
                    .map(|&c| {
                        let d = c as f64 - mean;
                        d * d
                    })
                    .sum::<f64>()
                    / (n - 1) as f64;
                var.sqrt()
            };
            WordSummary {
                word: word.clone(),
                total,
                mean,
                std_dev,
                max: counts.iter().copied().max().unwrap_or(0),
                min: counts.iter().copied().min().unwrap_or(0),
            }
        })
        .collect()
}

/// Sources ranked by total target-word hits, descending; ties break by name.
pub fn top_sources(analysis: &Analysis, n: usize) -> Vec<(&str, usize)> {
    let mut totals: Vec<(&str, usize)> = analysis
        .tallies()
        .iter()
        .map(|t| (t.name.as_str(), t.counts().iter().sum()))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    totals.truncate(n);
    totals
}

/// Per-source listing: total word count, then one line per target word.
pub fn render_report<W: Write>(analysis: &Analysis, mut out: W) -> io::Result<()> {
    for tally in analysis.tallies() {
        writeln!(out, "{} ({} words)", tally.name, tally.total_words)?;
        for (word, &count) in analysis.words().iter().zip(tally.counts()) {
            writeln!(
                out,
                "  {}: {} occurrences ({:.2}%)",
                word,
                count,
                percentage(count, tally.total_words)
            )?;
        }
    }
    Ok(())
}

/// Aligned columns, one row per (source, word).
pub fn render_table<W: Write>(analysis: &Analysis, mut out: W) -> io::Result<()> {
    let source_w = analysis
        .tallies()
        .iter()
        .map(|t| t.name.len())
        .chain(Some("source".len()))
        .max()
        .unwrap_or(0);
    let word_w = analysis
        .words()
        .iter()
        .map(|w| w.len())
        .chain(Some("word".len()))
        .max()
        .unwrap_or(0);

    writeln!(
        out,
        "{:<source_w$}  {:<word_w$}  {:>7}  {:>8}",
        "source", "word", "count", "percent"
    )?;
    for row in analysis.rows() {
        writeln!(
            out,
            "{:<source_w$}  {:<word_w$}  {:>7}  {:>7.2}%",
            row.source, row.word, row.count, row.percentage
        )?;
    }
    Ok(())
}

/// Console bar chart of per-word totals across all sources, descending.
pub fn render_bars<W: Write>(analysis: &Analysis, mut out: W) -> io::Result<()> {
    let mut totals: Vec<(&str, usize)> = analysis
        .words()
        .iter()
        .enumerate()
        .map(|(i, word)| {
            (
                word.as_str(),
                analysis.tallies().iter().map(|t| t.counts()[i]).sum(),
            )
        })
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let max = totals.first().map(|&(_, n)| n).unwrap_or(0).max(1);
    let word_w = totals.iter().map(|&(w, _)| w.len()).max().unwrap_or(0);
    for (word, total) in totals {
        let w1 = (BAR_WIDTH as f64 * total as f64 / max as f64).round() as usize;
        writeln!(
            out,
            "{:<word_w$} {}{} ({})",
            word,
            "#".repeat(w1),
            " ".repeat(BAR_WIDTH - w1),
            total
        )?;
    }
    Ok(())
}

pub fn render_summary<W: Write>(analysis: &Analysis, mut out: W) -> io::Result<()> {
    let word_w = analysis
        .words()
        .iter()
        .map(|w| w.len())
        .chain(Some("word".len()))
        .max()
        .unwrap_or(0);
    writeln!(
        out,
        "{:<word_w$}  {:>7}  {:>8}  {:>8}  {:>5}  {:>5}",
        "word", "total", "mean", "std", "max", "min"
    )?;
    for s in summarize(analysis) {
        writeln!(
            out,
            "{:<word_w$}  {:>7}  {:>8.2}  {:>8.2}  {:>5}  {:>5}",
            s.word, s.total, s.mean, s.std_dev, s.max, s.min
        )?;
    }
    Ok(())
}

/// CSV with header `source,word,count,percentage`; two-decimal percentages.
pub fn write_csv<W: Write>(analysis: &Analysis, mut out: W) -> io::Result<()> {
    writeln!(out, "source,word,count,percentage")?;
    for row in analysis.rows() {
        writeln!(
            out,
            "{},{},{},{:.2}",
            csv_field(row.source),
            csv_field(row.word),
            row.count,
            row.percentage
        )?;
    }
    Ok(())
}

const QUOTE_TRIGGERS: &[char] = &[',', '"', '\n', '\r'];

fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains(QUOTE_TRIGGERS) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// The same rows as [`write_csv`], as a JSON array.
pub fn write_json<W: Write>(analysis: &Analysis, mut out: W) -> io::Result<()> {
    let rows: Vec<Row<'_>> = analysis.rows().collect();
    serde_json::to_writer_pretty(&mut out, &rows)?;
    writeln!(out)?;
    Ok(())
}
