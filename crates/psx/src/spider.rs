use crate::cli::Commands;
use psx_spider::stock::{analysis, crawl, extract, tickers};
use psx_spider::Config;
use tracing::info;

/// Run the requested pipeline stage(s).
pub(crate) async fn run(command: Commands, mut config: Config, tui: bool) -> anyhow::Result<()> {
    let time = std::time::Instant::now();

    use Commands::*;
    match command {
        // `psx tickers`: raw listing -> ticker universe
        Tickers { paths } => {
            paths.apply(&mut config);
            let tickers = tickers::filter(&config).await?;
            if tui {
                println!(
                    "{} tickers saved to {}",
                    tickers.len(),
                    config.tickers_path.display()
                );
            }
        }

        // `psx crawl`: ticker universe -> saved company pages
        Crawl { paths, no_skip } => {
            paths.apply(&mut config);
            config.skip_duplicates = !no_skip;
            let summary = crawl::scrape(&config, tui).await?;
            if tui {
                println!(
                    "{} pages saved, {} failed, {} already saved",
                    summary.saved, summary.failed, summary.skipped
                );
            }
        }

        // `psx extract`: saved company pages -> financial records
        Extract { paths } => {
            paths.apply(&mut config);
            extract::extract(&config, tui).await?;
            println!("data saved to {}", config.scraped_path.display());
        }

        // `psx analyze`: financial records -> ranked CAGR table
        Analyze { paths, top } => {
            paths.apply(&mut config);
            config.top = top.unwrap_or(config.top);
            analysis::analyze(&config).await?;
            println!("data saved to {}", config.output_path.display());
        }

        // `psx run`: extract, then analyze
        Run { paths, top } => {
            paths.apply(&mut config);
            config.top = top.unwrap_or(config.top);
            extract::extract(&config, tui).await?;
            analysis::analyze(&config).await?;
            println!("data saved to {}", config.output_path.display());
        }
    }

    info!("psx finished, time elapsed: {:?}", time.elapsed());

    Ok(())
}
