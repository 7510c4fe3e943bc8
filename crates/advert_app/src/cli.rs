use std::path::PathBuf;
use std::time::Duration;

use advert_core::RowWindow;
use advert_engine::{BatchOptions, ScraperConfig, DEFAULT_OUTPUT_DIR};
use advert_logging::{LogDestination, DEFAULT_LOG_FILE};
use clap::Parser;
use log::LevelFilter;

/// Scrape job adverts listed in a spreadsheet, saving pages, extracted content
/// and attachments.
#[derive(Parser, Debug)]
#[command(name = "scrape_jobs", author, version, about)]
pub struct Args {
    /// Excel workbook or CSV file with one job per row
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Maximum number of rows to process (0 means all)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Zero-based row to start from
    #[arg(short, long, default_value_t = 0)]
    pub start: usize,

    /// Seconds to wait between jobs
    #[arg(short, long, default_value = "1.5", value_parser = parse_delay)]
    pub delay: Duration,

    /// Column holding the advert URL
    #[arg(long, default_value = "Job URL")]
    pub url_column: String,

    /// Column holding the job title
    #[arg(long, default_value = "Job Title")]
    pub title_column: String,

    /// Log file written alongside terminal output
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log to the terminal only
    #[arg(long, default_value_t = false)]
    pub no_log_file: bool,

    /// Include debug output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    pub fn log_destination(&self) -> LogDestination {
        if self.no_log_file {
            LogDestination::Terminal
        } else {
            LogDestination::Both(self.log_file.clone())
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn scraper_config(&self) -> ScraperConfig {
        ScraperConfig::default_with_output(&self.output)
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            window: RowWindow::new(self.start, self.limit),
            request_delay: self.delay,
        }
    }
}

fn parse_delay(raw: &str) -> Result<Duration, String> {
    let seconds: f64 = raw
        .parse()
        .map_err(|_| format!("{raw:?} is not a number of seconds"))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("delay must be a non-negative number of seconds, got {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("scrape_jobs").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_documented_values() {
        let args = parse(&["jobs.csv"]);
        assert_eq!(args.output, PathBuf::from("scraped_jobs"));
        assert_eq!(args.limit, None);
        assert_eq!(args.start, 0);
        assert_eq!(args.url_column, "Job URL");
        assert_eq!(args.title_column, "Job Title");
        assert_eq!(args.log_level(), LevelFilter::Info);

        let options = args.batch_options();
        assert_eq!(options.request_delay, Duration::from_millis(1500));
        assert_eq!(options.window, RowWindow::new(0, None));
        assert!(matches!(args.log_destination(), LogDestination::Both(path) if path == PathBuf::from("scraper.log")));
    }

    #[test]
    fn short_flags_select_a_window() {
        let args = parse(&["jobs.csv", "-o", "out", "-l", "5", "-s", "10", "-d", "0", "-v"]);
        let options = args.batch_options();
        assert_eq!(options.window, RowWindow::new(10, Some(5)));
        assert_eq!(options.request_delay, Duration::ZERO);
        assert_eq!(args.scraper_config().output_dir, PathBuf::from("out"));
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn fractional_delays_are_kept() {
        let args = parse(&["jobs.csv", "--delay", "0.25"]);
        assert_eq!(args.batch_options().request_delay, Duration::from_millis(250));
    }

    #[test]
    fn no_log_file_logs_to_terminal() {
        let args = parse(&["jobs.csv", "--no-log-file"]);
        assert!(matches!(args.log_destination(), LogDestination::Terminal));
    }

    #[test]
    fn invalid_delays_are_rejected() {
        for bad in ["-1", "NaN", "inf", "1e20", "soon"] {
            let result = Args::try_parse_from(["scrape_jobs", "jobs.csv", "--delay", bad]);
            assert!(result.is_err(), "accepted delay {bad}");
        }
    }

    #[test]
    fn input_is_required() {
        assert!(Args::try_parse_from(["scrape_jobs"]).is_err());
    }
}
