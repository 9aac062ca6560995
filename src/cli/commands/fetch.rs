//! Fetch command - read a collection through the cache

use crate::cli::args::{Collection, FetchArgs, OutputFormat};
use crate::client::DashboardClient;
use crate::domain::{Company, Country, Post};
use crate::error::SyncacheResult;
use crate::mutation::Record;
use crate::ui::{self, TaskSpinner, UiContext};
use console::style;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, client: &DashboardClient) -> SyncacheResult<()> {
    let ctx = UiContext::detect();

    match args.collection {
        Collection::Countries => {
            let countries = with_spinner(&ctx, args.format, "countries", client.load_countries()).await?;
            render(&ctx, args.format, countries.as_slice(), print_countries)
        }
        Collection::Companies => {
            let companies = with_spinner(&ctx, args.format, "companies", client.load_companies()).await?;
            render(&ctx, args.format, companies.as_slice(), print_companies)
        }
        Collection::Posts => {
            let posts = with_spinner(&ctx, args.format, "posts", client.load_posts()).await?;
            render(&ctx, args.format, posts.as_slice(), print_posts)
        }
    }
}

/// Await a load, showing a spinner for table output only
async fn with_spinner<T, F>(
    ctx: &UiContext,
    format: OutputFormat,
    label: &str,
    load: F,
) -> SyncacheResult<Arc<Vec<T>>>
where
    F: Future<Output = SyncacheResult<Arc<Vec<T>>>>,
{
    if format != OutputFormat::Table {
        return load.await;
    }

    let mut spinner = TaskSpinner::new(ctx);
    spinner.start(&format!("Fetching {}...", label));
    match load.await {
        Ok(records) => {
            spinner.stop(&format!("Loaded {} {}", records.len(), label));
            Ok(records)
        }
        Err(e) => {
            spinner.stop_error(&format!("Could not load {}", label));
            Err(e)
        }
    }
}

fn render<T: Record + Serialize>(
    ctx: &UiContext,
    format: OutputFormat,
    records: &[T],
    print_table: fn(&UiContext, &[T]),
) -> SyncacheResult<()> {
    match format {
        OutputFormat::Table if records.is_empty() => ui::step_info(ctx, "Nothing to show"),
        OutputFormat::Table => print_table(ctx, records),
        OutputFormat::Json => print_json(records)?,
        OutputFormat::Plain => print_plain(records),
    }
    Ok(())
}

fn print_countries(ctx: &UiContext, countries: &[Country]) {
    ui::intro(ctx, "Countries");

    println!(
        "{:<6} {:<20} {:<20}",
        style("CODE").bold(),
        style("NAME").bold(),
        style("REGION").bold()
    );
    println!("{}", "-".repeat(48));

    for country in countries {
        println!("{:<6} {:<20} {:<20}", country.code, country.name, country.region);
    }
}

fn print_companies(ctx: &UiContext, companies: &[Company]) {
    ui::intro(ctx, "Companies");

    println!(
        "{:<6} {:<22} {:<8} {:>12}",
        style("ID").bold(),
        style("NAME").bold(),
        style("COUNTRY").bold(),
        style("TCO2E").bold()
    );
    println!("{}", "-".repeat(51));

    for company in companies {
        println!(
            "{:<6} {:<22} {:<8} {:>12.1}",
            company.id,
            company.name,
            company.country,
            company.total_emissions()
        );
    }
}

fn print_posts(ctx: &UiContext, posts: &[Post]) {
    ui::intro(ctx, "Posts");

    println!(
        "{:<14} {:<8} {:<8} {:<30}",
        style("ID").bold(),
        style("MONTH").bold(),
        style("COMPANY").bold(),
        style("TITLE").bold()
    );
    println!("{}", "-".repeat(63));

    for post in posts {
        println!(
            "{:<14} {:<8} {:<8} {:<30}",
            post.id,
            post.date_time,
            post.resource_uid,
            post.title
        );
    }

    println!();
    println!("{} post(s)", posts.len());
}

fn print_json<T: Serialize>(records: &[T]) -> SyncacheResult<()> {
    let json = serde_json::to_string_pretty(records)?;
    println!("{}", json);
    Ok(())
}

fn print_plain<T: Record>(records: &[T]) {
    for record in records {
        println!("{}", record.id());
    }
}
