use clap::Parser;
use std::path::PathBuf;

/// Every flag is optional: unset flags fall back to `BAZOS_*` environment
/// variables and then to built-in defaults.
#[derive(Parser, Debug, Default)]
#[command(name = "bazos-sniper", version, about = "Scrapes bazos.cz for MacBook listings")]
pub struct Cli {
    #[arg(long, help = "Search phrase - e.g. macbook")]
    pub query: Option<String>,
    #[arg(long, help = "Zip code - e.g. 10500")]
    pub zip_code: Option<u32>,
    #[arg(long, help = "Distance in km from zip code - e.g. 50")]
    pub dist: Option<u32>,
    #[arg(long, help = "Minimum price in CZK - e.g. 10000")]
    pub min_price: Option<u64>,
    #[arg(long, help = "Maximum price in CZK - e.g. 50000")]
    pub max_price: Option<u64>,
    #[arg(long, help = "Number of ads to go through - e.g. 100")]
    pub n_ads: Option<usize>,
    #[arg(long, num_args = 1.., help = "Wanted model years - e.g. 2019 2020")]
    pub years: Option<Vec<u16>>,
    #[arg(long, help = "Send the HTML report to Telegram")]
    pub send_report: bool,
    #[arg(long, help = "Listing pages fetched concurrently")]
    pub workers: Option<usize>,
    #[arg(long, help = "Directory for the CSV tables")]
    pub data_dir: Option<PathBuf>,
    #[arg(long, help = "SQLite database file")]
    pub db_path: Option<PathBuf>,
    #[arg(long, help = "HTML report template containing #tables")]
    pub template: Option<PathBuf>,
    #[arg(long, help = "JSON file with Telegram credentials")]
    pub notifier_config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "bazos-sniper",
            "--zip-code",
            "10500",
            "--years",
            "2019",
            "2020",
            "--send-report",
        ])
        .unwrap();

        assert_eq!(cli.zip_code, Some(10500));
        assert_eq!(cli.years, Some(vec![2019, 2020]));
        assert!(cli.send_report);
        assert_eq!(cli.dist, None);
    }
}
