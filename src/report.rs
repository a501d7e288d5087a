//! Ranking and output of per-profile scores.
//!
//! Supports a bordered text block per profile and CSV export.

use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::score::ScoreTable;

const NAME_WIDTH: usize = 50;
const SCORE_WIDTH: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub plan: String,
    pub score: f64,
}

/// One line of the CSV export.
#[derive(Debug, Serialize)]
pub struct ScoreRow<'a> {
    pub profile: &'a str,
    pub rank: usize,
    pub plan: &'a str,
    pub score: f64,
}

/// Sorts plans cheapest first. Equal scores are ordered by plan name.
pub fn rank(table: &ScoreTable) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = table
        .iter()
        .map(|(plan, &score)| Ranked {
            plan: plan.clone(),
            score,
        })
        .collect();
    ranked.sort_by(|a, b| a.score.total_cmp(&b.score).then_with(|| a.plan.cmp(&b.plan)));
    ranked
}

/// Renders one profile's ranking as a bordered block.
pub fn render(profile: &str, ranked: &[Ranked]) -> String {
    let width = NAME_WIDTH + SCORE_WIDTH;
    let border = "=".repeat(width);
    let mut out = format!("{border}\n{profile}\n{}\n", "-".repeat(width));
    for r in ranked {
        out.push_str(&format!(
            "{:<nw$}{:>sw$.3}\n",
            r.plan,
            r.score,
            nw = NAME_WIDTH,
            sw = SCORE_WIDTH
        ));
    }
    out.push_str(&border);
    out.push('\n');
    out
}

/// Writes every ranking to a CSV file, replacing any existing file.
pub fn write_csv<'a, I>(path: &Path, rankings: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a [Ranked])>,
{
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    let mut rows = 0usize;

    for (profile, ranked) in rankings {
        for (i, r) in ranked.iter().enumerate() {
            writer.serialize(ScoreRow {
                profile,
                rank: i + 1,
                plan: &r.plan,
                score: r.score,
            })?;
            rows += 1;
        }
    }
    writer.flush()?;

    debug!(path = %path.display(), rows, "Wrote CSV report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn table() -> ScoreTable {
        ScoreTable::from([
            ("Expensive".to_string(), 41.25),
            ("Cheap".to_string(), 28.0),
            ("AlsoCheap".to_string(), 28.0),
        ])
    }

    #[test]
    fn test_rank_lowest_first() {
        let ranked = rank(&table());
        let names: Vec<_> = ranked.iter().map(|r| r.plan.as_str()).collect();
        assert_eq!(names, ["AlsoCheap", "Cheap", "Expensive"]);
    }

    #[test]
    fn test_render_layout() {
        let ranked = rank(&ScoreTable::from([("Flat10".to_string(), 28.0)]));
        let block = render("House1", &ranked);
        let lines: Vec<_> = block.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "=".repeat(65));
        assert_eq!(lines[1], "House1");
        assert_eq!(lines[3].len(), 65);
        assert!(lines[3].starts_with("Flat10 "));
        assert!(lines[3].ends_with("28.000"));
        assert_eq!(lines[4], lines[0]);
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let ranked = rank(&table());

        write_csv(&path, [("House1", ranked.as_slice())]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "profile,rank,plan,score");
        assert_eq!(lines[1], "House1,1,AlsoCheap,28.0");
        assert_eq!(lines.len(), 4);
    }
}
