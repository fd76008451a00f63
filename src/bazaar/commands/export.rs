//! Admin backup: a tar.gz snapshot of the category tree and every listing,
//! one JSON document per collection.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MarketError, Result};
use crate::model::{Category, Listing};
use crate::store::DataStore;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn run<S: DataStore>(store: &S, out_dir: &Path) -> Result<CmdResult> {
    let categories = store.list_categories()?;
    let listings = store.list_listings()?;

    let now = Utc::now();
    let filename = format!("bazaar-{}.tar.gz", now.format("%Y-%m-%d_%H:%M:%S"));
    let path = out_dir.join(&filename);
    let file = File::create(&path).map_err(MarketError::Io)?;

    write_archive(file, &categories, &listings)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} categories and {} listings to {}",
        categories.len(),
        listings.len(),
        path.display()
    )));
    Ok(result)
}

fn write_archive<W: Write>(
    writer: W,
    categories: &[Category],
    listings: &[Listing],
) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    append_json(&mut tar, "bazaar/categories.json", categories)?;
    append_json(&mut tar, "bazaar/listings.json", listings)?;

    tar.finish().map_err(MarketError::Io)?;
    Ok(())
}

fn append_json<W: Write, T: serde::Serialize + ?Sized>(
    tar: &mut tar::Builder<W>,
    entry_name: &str,
    value: &T,
) -> Result<()> {
    let content = serde_json::to_vec_pretty(value).map_err(MarketError::Serialization)?;

    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();

    tar.append_data(&mut header, entry_name, content.as_slice())
        .map_err(MarketError::Io)?;
    Ok(())
}
