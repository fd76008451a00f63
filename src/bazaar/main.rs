use bazaar::api::{CmdMessage, MarketApi, MessageLevel};
use bazaar::commands::category::CategoryPatch;
use bazaar::commands::search::{DateRange, SearchCriteria, SortOrder};
use bazaar::commands::CmdResult;
use bazaar::config::MarketConfig;
use bazaar::error::{MarketError, Result};
use bazaar::model::{Category, Listing, ListingDraft, Specifications, TemplateField};
use bazaar::store::fs::FileStore;
use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use serde_json::Value;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{CategoryCommands, Cli, Commands, SinceArg, SortArg};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut api = init_api(&cli)?;

    match cli.command {
        Commands::Category(cmd) => handle_category(&mut api, cmd),
        Commands::Submit {
            title,
            description,
            price,
            category,
            sub_category,
            city,
            condition,
            images,
            specs,
            seller,
            nonce,
            currency,
        } => {
            let draft = ListingDraft {
                title,
                description,
                price,
                currency,
                category_slug: category,
                sub_category_slug: sub_category,
                city,
                condition,
                images,
                specifications: parse_specs(&specs)?,
                seller_id: seller,
                client_nonce: nonce,
            };
            let result = api.submit_listing(draft)?;
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Approve { number } => print_result(api.approve_listing(number)?),
        Commands::Reject { number } => print_result(api.reject_listing(number)?),
        Commands::Suspend { number } => print_result(api.suspend_listing(number)?),
        Commands::Delete { number, actor } => print_result(api.delete_listing(number, &actor)?),
        Commands::Restore { number } => print_result(api.restore_listing(number)?),
        Commands::Purge { number, force } => print_result(api.purge_listing(number, force)?),
        Commands::PurgeExpired => print_result(api.purge_expired()?),
        Commands::Promote { number, tier, days } => {
            print_result(api.promote_listing(number, &tier, days)?)
        }
        Commands::Demote { number } => print_result(api.demote_listing(number)?),
        Commands::Quote { tier } => {
            let result = api.quote(&tier)?;
            if let Some(q) = &result.quote {
                println!(
                    "{}: {:.2} {} net + {:.2} VAT = {} {}",
                    q.tier.bold(),
                    q.net,
                    q.currency,
                    q.vat,
                    format!("{:.2}", q.gross).green(),
                    q.currency
                );
            }
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Search {
            category,
            sub_category,
            min_price,
            max_price,
            city,
            condition,
            since,
            filters,
            number,
            query,
            sort,
        } => {
            let criteria = SearchCriteria {
                category,
                sub_category,
                price_min: min_price,
                price_max: max_price,
                city,
                condition,
                date_range: since.map(|s| match s {
                    SinceArg::Today => DateRange::Today,
                    SinceArg::ThreeDays => DateRange::ThreeDays,
                    SinceArg::SevenDays => DateRange::SevenDays,
                }),
                dynamic_filters: parse_filters(&filters)?,
                listing_number: number,
                query,
                sort: match sort {
                    SortArg::Newest => SortOrder::Newest,
                    SortArg::Oldest => SortOrder::Oldest,
                    SortArg::PriceAsc => SortOrder::PriceAsc,
                    SortArg::PriceDesc => SortOrder::PriceDesc,
                },
                include_statuses: None,
            };
            let result = api.search(&criteria)?;
            print_listings(&result.listed_listings);
            print_messages(&result.messages);
            Ok(())
        }
        Commands::View { number } => {
            let result = api.listing(number)?;
            print_full_listings(&result.listed_listings);
            Ok(())
        }
        Commands::Pending => {
            let result = api.pending_listings()?;
            print_listings(&result.listed_listings);
            Ok(())
        }
        Commands::Deleted => {
            let result = api.deleted_listings()?;
            print_listings(&result.listed_listings);
            Ok(())
        }
        Commands::Export { out } => {
            let out_dir = out.unwrap_or_else(|| PathBuf::from("."));
            print_result(api.export(&out_dir)?)
        }
        Commands::Config => {
            let result = api.show_config()?;
            if let Some(config) = &result.config {
                println!("currency = {}", config.currency);
                println!("vat-rate = {}", config.vat_rate);
                println!("retention-days = {}", config.retention_days);
                for p in &config.packages {
                    println!(
                        "package {} — {} ({:.2} {}, {} days{})",
                        p.tier.bold(),
                        p.name,
                        p.price,
                        config.currency,
                        p.duration_days,
                        if p.is_active { "" } else { ", inactive" }
                    );
                }
            }
            Ok(())
        }
    }
}

fn init_api(cli: &Cli) -> Result<MarketApi<FileStore>> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => match std::env::var_os("BAZAAR_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => ProjectDirs::from("com", "bazaar", "bazaar")
                .map(|d| d.data_dir().to_path_buf())
                .ok_or_else(|| MarketError::Api("Could not determine data dir".into()))?,
        },
    };

    let config = MarketConfig::load(&data_dir).unwrap_or_default();
    let store = FileStore::new(data_dir);
    Ok(MarketApi::new(store, config))
}

fn handle_category(api: &mut MarketApi<FileStore>, cmd: CategoryCommands) -> Result<()> {
    match cmd {
        CategoryCommands::Create { name, slug, parent } => {
            print_result(api.create_category(name, slug, parent.as_deref())?)
        }
        CategoryCommands::Update {
            slug,
            name,
            new_slug,
            parent,
            root,
            active,
            featured,
        } => {
            let parent_id = if root {
                Some(None)
            } else if let Some(parent_slug) = &parent {
                Some(Some(api.category_id(parent_slug)?))
            } else {
                None
            };
            let patch = CategoryPatch {
                name,
                slug: new_slug,
                parent_id,
                is_active: active,
                is_featured: featured,
            };
            print_result(api.update_category(&slug, patch)?)
        }
        CategoryCommands::Delete { slug } => print_result(api.delete_category(&slug)?),
        CategoryCommands::Roots => {
            let result = api.category_roots()?;
            print_categories(&result.categories);
            Ok(())
        }
        CategoryCommands::Children { slug } => {
            let result = api.category_children(&slug)?;
            print_categories(&result.categories);
            Ok(())
        }
        CategoryCommands::Template { slug, file } => {
            let content = std::fs::read_to_string(&file).map_err(MarketError::Io)?;
            let fields: Vec<TemplateField> =
                serde_json::from_str(&content).map_err(MarketError::Serialization)?;
            print_result(api.set_template(&slug, fields)?)
        }
    }
}

/// Parse `key=value` pairs into specifications. Values are taken as JSON
/// when they parse as such (numbers stay numbers), strings otherwise.
fn parse_specs(specs: &[String]) -> Result<Specifications> {
    let mut map = Specifications::new();
    for spec in specs {
        let (key, raw) = spec
            .split_once('=')
            .ok_or_else(|| MarketError::Api(format!("Invalid spec (want key=value): {}", spec)))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(map)
}

/// Parse `key=value` filter pairs; comma-separated values become an "any
/// of" array.
fn parse_filters(filters: &[String]) -> Result<std::collections::BTreeMap<String, Value>> {
    let mut map = std::collections::BTreeMap::new();
    for filter in filters {
        let (key, raw) = filter.split_once('=').ok_or_else(|| {
            MarketError::Api(format!("Invalid filter (want key=value): {}", filter))
        })?;
        let value = if raw.contains(',') {
            Value::Array(
                raw.split(',')
                    .map(|v| Value::String(v.trim().to_string()))
                    .collect(),
            )
        } else {
            Value::String(raw.to_string())
        };
        map.insert(key.to_string(), value);
    }
    Ok(map)
}

fn print_result(result: CmdResult) -> Result<()> {
    print_messages(&result.messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories found.");
        return;
    }
    for category in categories {
        let mut line = format!("{}  ({})", category.name.bold(), category.slug);
        if !category.is_active {
            line.push_str(&format!("  {}", "inactive".dimmed()));
        }
        if category.is_featured {
            line.push_str(&format!("  {}", "featured".yellow()));
        }
        if category.template.is_some() {
            line.push_str(&format!("  {}", "[template]".dimmed()));
        }
        println!("{}", line);
    }
}

const TIME_WIDTH: usize = 14;
const PROMO_MARKER: &str = "★";

fn print_listings(listings: &[Listing]) {
    if listings.is_empty() {
        println!("No listings found.");
        return;
    }

    let line_width = console::Term::stdout().size().1.clamp(60, 120) as usize;
    let now = Utc::now();

    for listing in listings {
        let promoted = listing.is_effectively_promoted(now);
        let left_prefix = if promoted {
            format!("  {} ", PROMO_MARKER)
        } else {
            "    ".to_string()
        };

        let number = format!("#{:<5} ", listing.listing_number);
        let price = format!("{:>10.2} {} ", listing.price, listing.currency);
        let time_ago = format_time_ago(listing.created_at);

        let label = format!("{} — {}", listing.title, listing.city);
        let fixed = left_prefix.width() + number.width() + price.width() + TIME_WIDTH;
        let available = line_width.saturating_sub(fixed);
        let label_display = truncate_to_width(&label, available);
        let padding = available.saturating_sub(label_display.width());

        let number_colored = match listing.status {
            bazaar::model::ListingStatus::Active => number.normal(),
            bazaar::model::ListingStatus::PendingApproval => number.yellow(),
            bazaar::model::ListingStatus::Rejected => number.red(),
            bazaar::model::ListingStatus::SoftDeleted => number.dimmed(),
        };

        println!(
            "{}{}{}{}{}{}",
            left_prefix,
            number_colored,
            label_display,
            " ".repeat(padding),
            price,
            time_ago.dimmed()
        );
    }
}

fn print_full_listings(listings: &[Listing]) {
    for (i, listing) in listings.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {}  [{}]",
            format!("#{}", listing.listing_number).yellow(),
            listing.title.bold(),
            listing.status
        );
        println!("--------------------------------");
        println!("{:.2} {} — {}", listing.price, listing.currency, listing.city);
        println!("Category: {}", listing.bound_slug());
        if let Some(condition) = &listing.condition {
            println!("Condition: {}", condition);
        }
        if let Some(tier) = &listing.promotion_tier {
            println!("Promotion: {}", tier);
        }
        for (key, value) in &listing.specifications {
            println!("{}: {}", key, value);
        }
        if !listing.description.is_empty() {
            println!("\n{}", listing.description);
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
