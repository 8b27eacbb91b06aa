//! Parameter tables per data resolution.
//!
//! Each resolution names a price file and the stop-loss and take-profit
//! candidates to sweep over it. The built-in tables can be replaced by a JSON
//! file holding an array of resolutions:
//!
//! ```json
//! [{"name": "daily", "file": "daily.csv",
//!   "stop_losses": ["0.03", "0.02"], "take_profits": ["0.07", "0.05"]}]
//! ```

use anyhow::{Context, Result, bail};
use pbt_optimization::ParameterGrid;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sweep settings for one price file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub name: String,
    /// Price file, relative to the data directory.
    pub file: String,
    pub stop_losses: Vec<Decimal>,
    pub take_profits: Vec<Decimal>,
}

impl Resolution {
    fn new(name: &str, file: &str, stop_losses: &[Decimal], take_profits: &[Decimal]) -> Self {
        Self {
            name: name.to_string(),
            file: file.to_string(),
            stop_losses: stop_losses.to_vec(),
            take_profits: take_profits.to_vec(),
        }
    }

    /// Grid of this resolution's candidates with the given windows.
    #[must_use]
    pub fn grid(&self, short_window: usize, long_window: usize) -> ParameterGrid {
        ParameterGrid::new(short_window, long_window)
            .with_stop_losses(self.stop_losses.clone())
            .with_take_profits(self.take_profits.clone())
    }

    /// Name of the results file written for this resolution.
    #[must_use]
    pub fn output_file_name(&self) -> String {
        format!("{}_backtest_results.csv", self.name)
    }
}

/// Built-in tables, in run order.
#[must_use]
pub fn default_resolutions() -> Vec<Resolution> {
    let bp = |basis_points: i64| Decimal::new(basis_points, 4);

    let wide_stops = [bp(300), bp(250), bp(200), bp(150), bp(100), bp(50)];
    let fine = [bp(250), bp(200), bp(150), bp(100), bp(50), bp(25)];

    vec![
        Resolution::new(
            "daily",
            "daily.csv",
            &wide_stops,
            &[bp(700), bp(600), bp(500), bp(400), bp(300), bp(200)],
        ),
        Resolution::new(
            "hourly",
            "hourly.csv",
            &wide_stops,
            &[bp(600), bp(500), bp(400), bp(300), bp(200), bp(100)],
        ),
        Resolution::new("5m", "five_minutely.csv", &fine, &fine),
    ]
}

/// Reads resolution tables from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid table list.
pub fn load_resolutions(path: &Path) -> Result<Vec<Resolution>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read grid config {}", path.display()))?;
    parse_resolutions(&text).with_context(|| format!("invalid grid config {}", path.display()))
}

/// Parses resolution tables from JSON.
///
/// # Errors
/// Returns an error on malformed JSON, an empty list or duplicate names.
pub fn parse_resolutions(json: &str) -> Result<Vec<Resolution>> {
    let resolutions: Vec<Resolution> = serde_json::from_str(json)?;
    if resolutions.is_empty() {
        bail!("no resolutions defined");
    }
    for (index, resolution) in resolutions.iter().enumerate() {
        if resolutions[..index]
            .iter()
            .any(|earlier| earlier.name == resolution.name)
        {
            bail!("duplicate resolution '{}'", resolution.name);
        }
    }
    Ok(resolutions)
}

/// Keeps the resolutions named in `names`, in table order.
///
/// An empty `names` keeps everything.
///
/// # Errors
/// Returns an error if a name matches no resolution.
pub fn select(resolutions: Vec<Resolution>, names: &[String]) -> Result<Vec<Resolution>> {
    if names.is_empty() {
        return Ok(resolutions);
    }
    if let Some(unknown) = names
        .iter()
        .find(|name| !resolutions.iter().any(|r| &r.name == *name))
    {
        let known: Vec<&str> = resolutions.iter().map(|r| r.name.as_str()).collect();
        bail!("unknown resolution '{unknown}' (known: {})", known.join(", "));
    }
    Ok(resolutions
        .into_iter()
        .filter(|r| names.contains(&r.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_default_tables() {
        let tables = default_resolutions();
        let names: Vec<&str> = tables.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["daily", "hourly", "5m"]);

        let daily = &tables[0];
        assert_eq!(daily.file, "daily.csv");
        assert_eq!(daily.stop_losses[0], dec!(0.03));
        assert_eq!(daily.stop_losses[5], dec!(0.005));
        assert_eq!(daily.take_profits[0], dec!(0.07));

        assert_eq!(tables[1].take_profits[5], dec!(0.01));

        let five_minute = &tables[2];
        assert_eq!(five_minute.file, "five_minutely.csv");
        assert_eq!(five_minute.stop_losses[5], dec!(0.0025));
        assert_eq!(five_minute.stop_losses, five_minute.take_profits);
    }

    #[test]
    fn test_every_default_grid_has_36_runs() {
        for resolution in default_resolutions() {
            let grid = resolution.grid(20, 50);
            assert_eq!(grid.build().len(), 36, "{}", resolution.name);
        }
    }

    #[test]
    fn test_output_file_name() {
        let tables = default_resolutions();
        assert_eq!(tables[2].output_file_name(), "5m_backtest_results.csv");
    }

    #[test]
    fn test_parse_resolutions() {
        let json = r#"[
            {"name": "weekly", "file": "weekly.csv",
             "stop_losses": ["0.04", "0.02"], "take_profits": ["0.1"]}
        ]"#;

        let tables = parse_resolutions(json).unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "weekly");
        assert_eq!(tables[0].stop_losses, vec![dec!(0.04), dec!(0.02)]);
        assert_eq!(tables[0].grid(5, 10).len(), 2);
    }

    #[test]
    fn test_parse_rejects_empty_and_duplicates() {
        assert!(parse_resolutions("[]").is_err());

        let json = r#"[
            {"name": "a", "file": "a.csv", "stop_losses": [], "take_profits": []},
            {"name": "a", "file": "b.csv", "stop_losses": [], "take_profits": []}
        ]"#;
        let err = parse_resolutions(json).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let json = r#"[{"name": "a", "stop_losses": [], "take_profits": []}]"#;
        assert!(parse_resolutions(json).is_err());
    }

    #[test]
    fn test_load_resolutions_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "x", "file": "x.csv",
                  "stop_losses": ["0.01"], "take_profits": ["0.02"]}}]"#
        )
        .unwrap();
        file.flush().unwrap();

        let tables = load_resolutions(file.path()).unwrap();
        assert_eq!(tables[0].take_profits, vec![dec!(0.02)]);
    }

    #[test]
    fn test_select_keeps_table_order() {
        let names = vec!["5m".to_string(), "daily".to_string()];
        let selected = select(default_resolutions(), &names).unwrap();
        let selected: Vec<&str> = selected.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(selected, ["daily", "5m"]);
    }

    #[test]
    fn test_select_all_when_no_names() {
        assert_eq!(select(default_resolutions(), &[]).unwrap().len(), 3);
    }

    #[test]
    fn test_select_unknown_name() {
        let err = select(default_resolutions(), &["weekly".to_string()]).unwrap_err();
        assert!(err.to_string().contains("weekly"));
    }
}
