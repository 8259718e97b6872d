use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use slideshow_widget::{Page, SlideshowHost, Surface};

#[derive(Parser, Debug)]
#[command(name = "slideshow-widget", about = "Run declarative slideshows against a page fixture")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a page headlessly, advancing virtual time and logging every slide change
    Simulate {
        /// Page fixture (JSON)
        page: PathBuf,

        /// Containers to boot (`#id`, `.class` or tag); defaults to every `data-slideshow` element
        #[arg(long = "select")]
        selectors: Vec<String>,

        /// Total virtual time to run
        #[arg(long, default_value_t = 10_000)]
        duration_ms: u64,

        /// Granularity of the virtual clock
        #[arg(long, default_value_t = 100)]
        step_ms: u64,

        /// Click a trigger element at a given time, e.g. `1500:next-button`
        #[arg(long = "click", value_parser = parse_click)]
        clicks: Vec<Click>,

        /// Print each container's element tree when done
        #[arg(long)]
        outline: bool,
    },

    /// Open a window showing the page's slideshows
    #[cfg(feature = "viewer")]
    View {
        /// Page fixture (JSON)
        page: PathBuf,

        /// Containers to boot; defaults to every `data-slideshow` element
        #[arg(long = "select")]
        selectors: Vec<String>,
    },
}

#[derive(Debug, Clone)]
struct Click {
    at_ms: u64,
    element_id: String,
}

fn parse_click(raw: &str) -> Result<Click, String> {
    let (at, element_id) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected MS:ELEMENT_ID, got '{raw}'"))?;
    let at_ms = at.trim().parse().map_err(|e| format!("invalid time '{at}': {e}"))?;
    Ok(Click { at_ms, element_id: element_id.trim().to_string() })
}

fn boot(page_path: &PathBuf, selectors: &[String]) -> Result<(SlideshowHost<Page>, Vec<String>)> {
    let page = Page::load(page_path).with_context(|| format!("loading {}", page_path.display()))?;
    let mut host = SlideshowHost::new(page);

    let ids = if selectors.is_empty() {
        host.init_declared()
    } else {
        let mut ids = Vec::new();
        for selector in selectors {
            match host.select(selector) {
                Some(api) => ids.push(api.id().to_string()),
                None => log::warn!("Selector '{selector}' matched nothing"),
            }
        }
        ids
    };

    if ids.is_empty() {
        bail!("no slideshow containers found in {}", page_path.display());
    }
    Ok((host, ids))
}

fn simulate(
    mut host: SlideshowHost<Page>,
    ids: &[String],
    duration_ms: u64,
    step_ms: u64,
    mut clicks: Vec<Click>,
    outline: bool,
) -> Result<()> {
    let step_ms = step_ms.max(1);
    clicks.sort_by_key(|c| c.at_ms);
    let mut pending = clicks.into_iter().peekable();
    let mut last_seen: BTreeMap<String, Option<usize>> = BTreeMap::new();

    report(&host, ids, &mut last_seen);
    while host.now() < duration_ms {
        let next_stop = (host.now() + step_ms).min(duration_ms);
        let until_click = pending.peek().map(|c| c.at_ms).filter(|at| *at < next_stop);
        host.tick(until_click.unwrap_or(next_stop).saturating_sub(host.now()));

        while let Some(click) = pending.next_if(|c| c.at_ms <= host.now()) {
            let dispatched = host
                .surface()
                .element_by_id(&click.element_id)
                .is_some_and(|el| host.click(el));
            if dispatched {
                println!("[{:>6}ms] click {}", host.now(), click.element_id);
            } else {
                log::warn!("Click on '{}' at {}ms hit no trigger", click.element_id, click.at_ms);
            }
        }
        report(&host, ids, &mut last_seen);
    }

    for id in ids {
        let Some(show) = host.slideshow(id.as_str()) else {
            continue;
        };
        println!(
            "{id}: {} slides, showing {}, effect {}, every {}ms",
            show.slide_count(),
            show.current_slide(),
            show.config().fx,
            show.config().timeout_ms,
        );
        if outline {
            println!("{}", host.surface().outline(show.container()));
        }
    }
    Ok(())
}

/// Prints slideshows whose visible slide changed since the last report.
fn report(host: &SlideshowHost<Page>, ids: &[String], last_seen: &mut BTreeMap<String, Option<usize>>) {
    for id in ids {
        let current = host.slideshow(id.as_str()).map(|s| s.current_slide());
        if last_seen.get(id) == Some(&current) {
            continue;
        }
        match current {
            Some(index) => {
                let caption = host
                    .slideshow(id.as_str())
                    .and_then(|s| s.slide_meta(host.surface()))
                    .and_then(|meta| meta.caption)
                    .map(|c| format!(" \"{c}\""))
                    .unwrap_or_default();
                println!("[{:>6}ms] {id}: slide {index}{caption}", host.now());
            }
            None => println!("[{:>6}ms] {id}: gone", host.now()),
        }
        last_seen.insert(id.clone(), current);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate { page, selectors, duration_ms, step_ms, clicks, outline } => {
            let (host, ids) = boot(&page, &selectors)?;
            simulate(host, &ids, duration_ms, step_ms, clicks, outline)
        }
        #[cfg(feature = "viewer")]
        Command::View { page, selectors } => {
            let (host, ids) = boot(&page, &selectors)?;
            slideshow_widget::viewer::run(host, ids)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_click_events() {
        let click = parse_click("1500:gallery-next").unwrap();
        assert_eq!(click.at_ms, 1500);
        assert_eq!(click.element_id, "gallery-next");
        assert!(parse_click("gallery-next").is_err());
        assert!(parse_click("soon:gallery-next").is_err());
    }
}
